/// Name of the browser cookie that remembers the referring affiliate.
pub const AFFILIATE_COOKIE: &str = "aff";

/// Request-scoped affiliate attribution, resolved from the `aff` cookie by the
/// attribution middleware and inserted as a typed request extension.
///
/// Handlers read this instead of re-parsing cookies or relying on ad hoc
/// request mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffiliateContext(pub Option<String>);

impl AffiliateContext {
    pub fn from_cookie(value: Option<&str>) -> Self {
        Self(value.map(|v| v.trim().to_lowercase()).filter(|v| !v.is_empty()))
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cookie_lowercases_and_trims() {
        assert_eq!(
            AffiliateContext::from_cookie(Some(" PartnerXYZ ")),
            AffiliateContext(Some("partnerxyz".to_string()))
        );
    }

    #[test]
    fn from_cookie_empty_is_none() {
        assert_eq!(AffiliateContext::from_cookie(Some("  ")), AffiliateContext(None));
        assert_eq!(AffiliateContext::from_cookie(None), AffiliateContext(None));
    }
}
