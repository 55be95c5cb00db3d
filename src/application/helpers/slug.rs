//! Classifies the first path segment of a GET request: affiliate slug,
//! reserved page, or static asset.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Outcome of classifying a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathClass {
    /// Root, reserved page, or file-like path. Never triggers attribution.
    NotASlug,
    /// An affiliate slug (already lowercased).
    Slug(String),
}

/// Path segments that must never be captured as affiliate slugs: the home
/// document, known static pages, asset folders, and the API endpoints.
static RESERVED_SEGMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "index.html",
        "success",
        "cancel",
        "privacy",
        "terms",
        "css",
        "js",
        "img",
        "images",
        "fonts",
        "media",
        "videos",
        "assets",
        "favicon.ico",
        "robots.txt",
        "sitemap.xml",
        "create-checkout-session",
        "stripe",
    ])
});

/// Extensions that mark a path as a static asset rather than a slug.
const STATIC_EXTENSIONS: &[&str] = &[
    "css", "js", "mjs", "map", "html", "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "woff",
    "woff2", "ttf", "otf", "eot", "mp4", "webm", "mp3", "wav", "pdf", "txt", "xml", "json",
];

/// Decide whether `path` names an affiliate slug.
///
/// Rules, in order: extract the first non-empty segment and lowercase it;
/// absent (root) is not a slug; a path ending in a known file extension is
/// not a slug; a reserved segment is not a slug; anything else is a slug.
/// Ambiguous segments default to slug; a false positive only costs an
/// unnecessary cookie and a redirect to the home page.
pub fn classify_path(path: &str) -> PathClass {
    let first_segment = match path.split('/').find(|s| !s.is_empty()) {
        Some(segment) => segment.to_lowercase(),
        None => return PathClass::NotASlug,
    };

    if ends_with_static_extension(path) {
        return PathClass::NotASlug;
    }

    if RESERVED_SEGMENTS.contains(first_segment.as_str()) {
        return PathClass::NotASlug;
    }

    PathClass::Slug(first_segment)
}

fn ends_with_static_extension(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    match last_segment.rsplit_once('.') {
        Some((name, ext)) if !name.is_empty() => {
            let ext = ext.to_lowercase();
            STATIC_EXTENSIONS.iter().any(|known| *known == ext)
        }
        _ => false,
    }
}
