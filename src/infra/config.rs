use std::{net::SocketAddr, path::PathBuf};

use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;

use crate::domain::entities::checkout::{CheckoutMode, CheckoutPlan};

pub struct AppConfig {
    pub stripe_secret_key: SecretString,
    pub stripe_webhook_secret: SecretString,
    pub bind_addr: SocketAddr,
    /// The apex domain (e.g. "myndmatterspack.com"). The canonical host is
    /// its "www" form; the attribution cookie is scoped to ".<domain>".
    pub primary_domain: String,
    /// Whether to trust X-Forwarded-Proto. Set to true when behind a reverse
    /// proxy that terminates TLS.
    pub trust_proxy: bool,
    /// Attribution cookie retention in days.
    pub affiliate_cookie_ttl_days: i64,
    /// Directory the static marketing site is served from.
    pub static_dir: PathBuf,
    /// The single product sold through checkout.
    pub plan: CheckoutPlan,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let stripe_secret_key: SecretString =
            SecretString::new(get_env::<String>("STRIPE_SECRET_KEY").into());
        let stripe_webhook_secret: SecretString =
            SecretString::new(get_env::<String>("STRIPE_WEBHOOK_SECRET").into());

        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3000".parse().unwrap());
        let primary_domain: String =
            get_env_default("PRIMARY_DOMAIN", "myndmatterspack.com".to_string());
        let trust_proxy: bool = get_env_default("TRUST_PROXY", false);
        let affiliate_cookie_ttl_days: i64 = get_env_default("AFF_COOKIE_TTL_DAYS", 365);
        let static_dir = PathBuf::from(get_env_default("STATIC_DIR", "public".to_string()));

        let mode: CheckoutMode = get_env_default("CHECKOUT_MODE", "subscription".to_string())
            .parse()
            .expect("CHECKOUT_MODE must be 'subscription' or 'payment'");

        let plan = CheckoutPlan {
            product_name: get_env_default("CHECKOUT_PRODUCT_NAME", "Mynd Matters Pack".to_string()),
            unit_amount: get_env_default("CHECKOUT_UNIT_AMOUNT", 25800),
            currency: get_env_default("CHECKOUT_CURRENCY", "usd".to_string()),
            mode,
            billing_interval: get_env_default("CHECKOUT_BILLING_INTERVAL", "month".to_string()),
            min_quantity: get_env_default("CHECKOUT_MIN_QUANTITY", 1),
            max_quantity: get_env_default("CHECKOUT_MAX_QUANTITY", 10),
        };

        Self {
            stripe_secret_key,
            stripe_webhook_secret,
            bind_addr,
            primary_domain,
            trust_proxy,
            affiliate_cookie_ttl_days,
            static_dir,
            plan,
        }
    }
}
