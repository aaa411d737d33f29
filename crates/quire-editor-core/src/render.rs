//! Markdown rendering for the preview pane.
//!
//! The editor only needs `text in, HTML out`. [`WeaverMarkdown`] is the
//! default; tests and embedders can pass any `Fn(&str) -> String`.

use markdown_weaver::{Options, Parser};

use crate::draft::{BASE64_FALLBACK, ImagePayload};
use crate::mode;

/// Turns Markdown source into HTML.
///
/// Implementations must be deterministic and total: malformed input degrades
/// to best-effort HTML rather than failing.
pub trait MarkdownRenderer {
    fn render(&self, source: &str) -> String;
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, source: &str) -> String {
        self(source)
    }
}

/// CommonMark rendering via markdown-weaver.
#[derive(Clone, Copy, Debug)]
pub struct WeaverMarkdown {
    options: Options,
}

impl WeaverMarkdown {
    /// Plain CommonMark, no extensions.
    pub fn new() -> Self {
        Self {
            options: Options::empty(),
        }
    }

    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl Default for WeaverMarkdown {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for WeaverMarkdown {
    fn render(&self, source: &str) -> String {
        if source.is_empty() {
            return String::new();
        }
        let parser = Parser::new_ext(source, self.options);
        let mut html_buf = String::with_capacity(source.len() * 3 / 2);
        markdown_weaver::html::push_html(&mut html_buf, parser);
        html_buf
    }
}

/// Render Markdown with the default renderer.
pub fn render_markdown(source: &str) -> String {
    WeaverMarkdown::new().render(source)
}

/// Preview markup for an attached image.
pub fn image_preview_html(image: &ImagePayload) -> String {
    format!(
        r#"<img src="{}" style="max-width:100%;">"#,
        image.data_url()
    )
}

/// How a stored entry's content appears in a list of posts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoredContent {
    /// Rendered Markdown, for `innerHTML`
    Html(String),
    /// Shown verbatim as text
    Text(String),
    /// Image entries: the server-rendered `<img>` stands on its own
    Blank,
}

/// Render stored content by its wire content type.
pub fn render_stored<R>(renderer: &R, content_type: &str, content: &str) -> StoredContent
where
    R: MarkdownRenderer + ?Sized,
{
    if content_type == mode::MARKDOWN {
        StoredContent::Html(renderer.render(content))
    } else if content_type.starts_with("image") || content_type == BASE64_FALLBACK {
        StoredContent::Blank
    } else {
        StoredContent::Text(content.to_string())
    }
}
