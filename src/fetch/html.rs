// src/fetch/html.rs
// =============================================================================
// This module pulls raw hrefs out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, so broken markup is repaired the same way a
//   browser would repair it instead of failing
//
// The hrefs are returned exactly as written in the page. Resolving,
// normalizing and filtering them is the coordinator's job.
// =============================================================================

use scraper::{Html, Selector};

// Extracts the href of every <a> element that has a non-empty one
//
// Parameters:
//   html: the HTML content to parse
//
// Returns: hrefs in document order, duplicates kept
//
// Example:
//   html = "<a href='/docs'>Docs</a><a>no link</a><a href='/docs'>Again</a>"
//   result = ["/docs", "/docs"]
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // "a[href]" is a constant selector; parsing it cannot fail in practice
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why no deduplication here?
//    - The same href can appear many times on a page (header + footer)
//    - Two different hrefs can also point at the same page ("/a" and "/a/")
//    - Only the normalized form tells us whether two links are the same, so
//      dedup happens after normalization, in one place
//
// 2. What does document order mean?
//    - select() walks the DOM tree top to bottom
//    - So the first link in the page source comes first in the Vec
//    - The coordinator schedules children in this order
//
// 3. What happens with malformed HTML?
//    - html5ever never fails to parse; it fixes up the tree like a browser
//    - Worst case we simply find no <a> elements and return an empty Vec
// -----------------------------------------------------------------------------
