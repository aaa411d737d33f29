//! Editor/preview controller.
//!
//! `EditorController` owns a [`PostDraft`] and the preview it implies. The
//! platform layer forwards user input to it and renders [`ViewState`]; it
//! never reads state back out of the page.
//!
//! Mode transitions go through [`EditorController::set_content_type`] only:
//!
//! | mode     | edit pane | preview pane          |
//! |----------|-----------|-----------------------|
//! | plain    | shown     | hidden                |
//! | markdown | shown     | shown, rendered text  |
//! | image    | hidden    | shown, attached image |

use quire_common::{EntryPayload, ValidationError};

use crate::draft::{ImagePayload, PostDraft, Visibility};
use crate::mode::{EditorMode, PaneLayout};
use crate::render::{MarkdownRenderer, WeaverMarkdown, image_preview_html};

/// Everything the platform layer needs to draw the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewState<'a> {
    pub mode: EditorMode,
    pub layout: PaneLayout,
    /// Raw content-type selector value
    pub selector: &'a str,
    /// HTML for the preview pane
    pub preview_html: &'a str,
    /// Current text body, for syncing the textarea after the controller clears it
    pub text: &'a str,
}

/// Owns one draft and keeps its preview in sync.
pub struct EditorController<R = WeaverMarkdown> {
    draft: PostDraft,
    mode: EditorMode,
    preview_html: String,
    renderer: R,
}

impl EditorController<WeaverMarkdown> {
    /// Editor for a brand new post.
    pub fn new() -> Self {
        Self::with_renderer(PostDraft::new(), WeaverMarkdown::new())
    }

    /// Editor for an existing (hydrated) draft.
    pub fn from_draft(draft: PostDraft) -> Self {
        Self::with_renderer(draft, WeaverMarkdown::new())
    }
}

impl Default for EditorController<WeaverMarkdown> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: MarkdownRenderer> EditorController<R> {
    /// Wrap a draft as-is. Unlike a mode switch, a hydrated image payload
    /// survives construction.
    pub fn with_renderer(draft: PostDraft, renderer: R) -> Self {
        let mode = draft.mode();
        let mut editor = Self {
            draft,
            mode,
            preview_html: String::new(),
            renderer,
        };
        match mode {
            EditorMode::Image => editor.draft.body.clear(),
            EditorMode::Plain | EditorMode::Markdown => editor.draft.image = None,
        }
        editor.refresh_preview();
        editor
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    pub fn into_draft(self) -> PostDraft {
        self.draft
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn preview_html(&self) -> &str {
        &self.preview_html
    }

    pub fn view(&self) -> ViewState<'_> {
        ViewState {
            mode: self.mode,
            layout: self.mode.layout(),
            selector: &self.draft.content_type,
            preview_html: &self.preview_html,
            text: &self.draft.body,
        }
    }

    /// Switch authoring mode from a selector value.
    ///
    /// Always drops any held image. Entering image mode also drops the text
    /// body. Unknown values behave as plain text.
    pub fn set_content_type(&mut self, value: &str) {
        let mode = EditorMode::from_selector(value);
        self.draft.content_type = value.to_string();
        self.draft.image = None;
        if mode == EditorMode::Image {
            self.draft.body.clear();
        }
        self.mode = mode;
        self.refresh_preview();
        tracing::debug!(?mode, content_type = value, "content type changed");
    }

    /// Text area changed. Ignored while in image mode.
    pub fn on_text_changed(&mut self, text: &str) {
        if self.mode == EditorMode::Image {
            tracing::trace!("text change ignored in image mode");
            return;
        }
        self.draft.body.clear();
        self.draft.body.push_str(text);
        self.refresh_preview();
    }

    /// Attach the chosen file as the post's image.
    ///
    /// Returns whether anything changed: outside image mode, or with no file,
    /// this is a no-op.
    pub fn attach_image_file(&mut self, file: Option<&[u8]>, declared_mime: &str) -> bool {
        if self.mode != EditorMode::Image {
            tracing::debug!(mode = ?self.mode, "image attach ignored outside image mode");
            return false;
        }
        let Some(bytes) = file else {
            return false;
        };
        let image = ImagePayload::from_bytes(bytes, declared_mime);
        tracing::debug!(
            declared_mime,
            mime = image.mime.as_str(),
            len = bytes.len(),
            "image attached"
        );
        self.draft.image = Some(image);
        self.refresh_preview();
        true
    }

    /// Append `![alt](url)` to the Markdown body.
    ///
    /// Only in Markdown mode, and only with a non-empty url. Returns whether
    /// the body changed.
    ///
    /// The separator is always `\n\n`; text the user typed, trailing
    /// newlines included, is left as is.
    pub fn insert_markdown_image_link(&mut self, url: &str, alt: &str) -> bool {
        if self.mode != EditorMode::Markdown || url.is_empty() {
            return false;
        }
        if !self.draft.body.is_empty() {
            self.draft.body.push_str("\n\n");
        }
        self.draft.body.push_str(&format!("![{alt}]({url})"));
        self.refresh_preview();
        true
    }

    pub fn set_title(&mut self, title: &str) {
        self.draft.title = title.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.draft.description = description.to_string();
    }

    pub fn set_visibility(&mut self, visibility: &str) {
        self.draft.visibility = Visibility::parse(visibility);
    }

    /// Package the draft for the create/update request.
    ///
    /// Image mode sends the base64 payload under its wire content type;
    /// text modes send the trimmed body under the raw selector value.
    pub fn build_submission_payload(&self) -> Result<EntryPayload, ValidationError> {
        let (content_type, content) = match self.mode {
            EditorMode::Image => {
                let image = self
                    .draft
                    .image
                    .as_ref()
                    .ok_or(ValidationError::NoImageSelected)?;
                (image.mime.wire_content_type(), image.base64.clone())
            }
            EditorMode::Plain | EditorMode::Markdown => (
                self.draft.content_type.clone(),
                self.draft.body.trim().to_string(),
            ),
        };

        Ok(EntryPayload {
            title: self.draft.title.trim().to_string(),
            description: self.draft.description.trim().to_string(),
            visibility: self.draft.visibility.as_str().to_uppercase(),
            content_type,
            content,
        })
    }

    fn refresh_preview(&mut self) {
        self.preview_html = match self.mode {
            EditorMode::Plain => String::new(),
            EditorMode::Markdown => self.renderer.render(&self.draft.body),
            EditorMode::Image => self
                .draft
                .image
                .as_ref()
                .map(image_preview_html)
                .unwrap_or_default(),
        };
    }
}
