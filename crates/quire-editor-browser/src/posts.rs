//! Stored entries rendered into feed and profile pages.

use quire_editor_core::{MarkdownRenderer, StoredContent, WeaverMarkdown, render_stored};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::dom::DomError;

/// Fill every `[data-contenttype]` element from its `data-content`.
///
/// Returns how many elements were rendered.
pub fn render_posts(document: &Document) -> Result<usize, DomError> {
    render_posts_with(document, &WeaverMarkdown::new())
}

pub fn render_posts_with<R: MarkdownRenderer>(
    document: &Document,
    renderer: &R,
) -> Result<usize, DomError> {
    let nodes = document.query_selector_all("[data-contenttype]")?;
    let mut rendered = 0;
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let dataset = el.dataset();
        let content_type = dataset.get("contenttype").unwrap_or_default();
        let content = dataset.get("content").unwrap_or_default();
        match render_stored(renderer, &content_type, &content) {
            StoredContent::Html(html) => el.set_inner_html(&html),
            StoredContent::Text(text) => el.set_text_content(Some(&text)),
            StoredContent::Blank => el.set_text_content(Some("")),
        }
        rendered += 1;
    }
    tracing::debug!(rendered, "stored posts rendered");
    Ok(rendered)
}
