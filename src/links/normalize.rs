// src/links/normalize.rs
// =============================================================================
// Canonical URL form, validation, and domain membership.
//
// A normalized URL has:
// - lower-cased scheme and host
// - no query string and no fragment
// - no trailing slash on the path
//
// Two URLs that normalize to the same string are the same crawl unit.
// =============================================================================

use url::Url;

// Marker sequences that show up in unrendered server-side templates
// (`<%= link %>`). The percent-encoded spellings are what survives after
// `Url` has serialized the path.
const TEMPLATE_MARKERS: [&str; 4] = ["<%", "%>", "%3c%", "%%3e"];

/// Returns the canonical form of `url`.
///
/// Input that does not parse as an absolute URL is normalized textually, so
/// this never fails and `normalize(normalize(u)) == normalize(u)` holds for
/// every input.
///
/// ```
/// use site_crawler::links::normalize;
///
/// assert_eq!(normalize("HTTPS://Example.COM/Docs/?q=1#top"), "https://example.com/Docs");
/// ```
pub fn normalize(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            // With query and fragment gone the serialized form ends with the
            // path, so trimming the string trims the path.
            trim_trailing_slashes(parsed.as_str()).to_string()
        }
        Err(_) => normalize_text(url),
    }
}

// Fallback for strings the URL parser rejects (relative paths, garbage).
fn normalize_text(url: &str) -> String {
    let end = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
    let trimmed = trim_trailing_slashes(&url[..end]);

    // Lower-case "scheme://host" when we can find it
    match trimmed.find("://") {
        Some(scheme_end) => {
            let rest = &trimmed[scheme_end + 3..];
            let host_end = rest.find('/').map_or(trimmed.len(), |i| scheme_end + 3 + i);
            format!(
                "{}{}",
                trimmed[..host_end].to_lowercase(),
                &trimmed[host_end..]
            )
        }
        None => trimmed.to_string(),
    }
}

// Strips every trailing slash after the authority. Stripping only one would
// leave "/a//" -> "/a/" and break idempotence.
fn trim_trailing_slashes(url: &str) -> &str {
    let path_start = url.find("://").map_or(0, |i| i + 3);

    let mut end = url.len();
    while end > path_start && url[..end].ends_with('/') {
        end -= 1;
    }
    &url[..end]
}

/// Returns true when `url` is an absolute `https` URL free of template
/// markers. Malformed input is simply not valid.
pub fn is_valid(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    if parsed.scheme() != "https" {
        return false;
    }

    let lowered = url.to_ascii_lowercase();
    !TEMPLATE_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Case-insensitive host comparison. Ports and everything else are ignored.
pub fn is_same_domain(a: &str, b: &str) -> bool {
    match (host_of(a), host_of(b)) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(&b),
        _ => false,
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
}
