//! Author and entry id helpers.
//!
//! Ids travel around as full URLs (`http://node/api/authors/<uuid>/`) but the
//! REST routes want only the trailing uuid, while page links want the full id
//! percent-encoded into a single path segment.

use std::borrow::Cow;

/// Last non-empty `/`-separated segment of an id.
///
/// `"http://node/api/authors/abc/"` → `"abc"`, `"abc"` → `"abc"`.
pub fn last_segment(id: &str) -> &str {
    id.split('/').rfind(|s| !s.is_empty()).unwrap_or("")
}

/// Percent-encode a value so it fits in one path segment.
pub fn encode_component(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Author uuid from a page path shaped like `/authors/<encoded author id>/...`.
pub fn author_from_page_path(pathname: &str) -> Option<String> {
    let encoded = pathname.split('/').nth(2).filter(|s| !s.is_empty())?;
    let decoded = urlencoding::decode(encoded).ok()?;
    let author = last_segment(&decoded);
    (!author.is_empty()).then(|| author.to_string())
}

/// Page showing a single entry.
pub fn entry_page_path(author_id: &str, entry_id: &str) -> String {
    format!(
        "/authors/{}/entries/{}/",
        last_segment(author_id),
        encode_component(entry_id)
    )
}

/// Page editing a single entry.
pub fn entry_edit_page_path(author_id: &str, entry_id: &str) -> String {
    format!("{}edit/", entry_page_path(author_id, entry_id))
}

/// Profile page of an author; the full id is kept, encoded.
pub fn author_page_path(author_id: &str) -> String {
    format!("/authors/{}/", encode_component(author_id))
}

/// New-post page for the signed-in author.
pub fn new_post_page_path(author_id: &str) -> String {
    format!("/feed/{}/newpost/", encode_component(author_id))
}
