// src/links/mod.rs
// =============================================================================
// URL handling for the crawler.
//
// Submodules:
// - normalize: canonical form used as the dedup key, scheme/safety validation,
//   same-domain test
// - resolve: turns a raw href from a page into an absolute URL
//
// Everything here is a pure function of its input strings. None of these
// functions return errors: a URL that cannot be parsed is simply not valid,
// not same-domain, or not resolvable.
// =============================================================================

mod normalize;
mod resolve;

pub use normalize::{is_same_domain, is_valid, normalize};
pub use resolve::resolve_link;
