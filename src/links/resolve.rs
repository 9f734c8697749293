// src/links/resolve.rs
// =============================================================================
// Resolves a raw href (as found on a page) to an absolute URL.
//
// Policy, in order:
// 1. Already starts with "https"  -> used as-is
// 2. Protocol-relative "//host/x" -> prefixed with the current page's scheme
// 3. Anything else                -> joined onto the current page URL
//                                    (standard relative-URL resolution)
//
// Resolution happens BEFORE normalization and validation, so this function
// does not care whether the result is crawlable. "mailto:" or "javascript:"
// links resolve fine here and get rejected later by `is_valid`.
// =============================================================================

use url::Url;

/// Turns `href` into an absolute URL relative to `page_url`.
///
/// Returns `None` only when resolution is impossible, i.e. `page_url` does not
/// parse or the join itself fails.
pub fn resolve_link(page_url: &str, href: &str) -> Option<String> {
    if href.starts_with("https") {
        return Some(href.to_string());
    }

    let base = Url::parse(page_url).ok()?;

    if href.starts_with("//") {
        return Some(format!("{}:{}", base.scheme(), href));
    }

    base.join(href).ok().map(String::from)
}
