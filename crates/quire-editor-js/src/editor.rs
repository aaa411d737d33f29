//! JsEditor - headless editor controller for JavaScript hosts.
//!
//! For pages that render their own UI: feed it input events, read back the
//! view state and the submission payload.

use wasm_bindgen::prelude::*;

use quire_editor_core::{EditorController, PostDraft};

use crate::types::{JsEntryPayload, JsInitialEntry, JsViewState};

/// The editor instance exposed to JavaScript.
#[wasm_bindgen]
pub struct JsEditor {
    inner: EditorController,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor for a new post.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: EditorController::new(),
        }
    }

    /// Create an editor for an existing entry.
    #[wasm_bindgen(js_name = fromInitial)]
    pub fn from_initial(initial: JsInitialEntry) -> Self {
        Self {
            inner: EditorController::from_draft(PostDraft::hydrate(initial.into())),
        }
    }

    #[wasm_bindgen(js_name = setContentType)]
    pub fn set_content_type(&mut self, value: &str) {
        self.inner.set_content_type(value);
    }

    #[wasm_bindgen(js_name = onTextChanged)]
    pub fn on_text_changed(&mut self, text: &str) {
        self.inner.on_text_changed(text);
    }

    /// Attach image bytes. `bytes` may be `undefined` when no file was chosen.
    ///
    /// Returns whether the image was taken (only in image mode).
    #[wasm_bindgen(js_name = attachImage)]
    pub fn attach_image(&mut self, bytes: Option<Vec<u8>>, mime: &str) -> bool {
        self.inner.attach_image_file(bytes.as_deref(), mime)
    }

    /// Append `![alt](url)` to the Markdown body.
    #[wasm_bindgen(js_name = insertImageLink)]
    pub fn insert_image_link(&mut self, url: &str, alt: Option<String>) -> bool {
        self.inner
            .insert_markdown_image_link(url, alt.as_deref().unwrap_or_default())
    }

    #[wasm_bindgen(js_name = setTitle)]
    pub fn set_title(&mut self, title: &str) {
        self.inner.set_title(title);
    }

    #[wasm_bindgen(js_name = setDescription)]
    pub fn set_description(&mut self, description: &str) {
        self.inner.set_description(description);
    }

    #[wasm_bindgen(js_name = setVisibility)]
    pub fn set_visibility(&mut self, visibility: &str) {
        self.inner.set_visibility(visibility);
    }

    /// Current selector value.
    #[wasm_bindgen(getter, js_name = contentType)]
    pub fn content_type(&self) -> String {
        self.inner.draft().content_type.clone()
    }

    /// Current text body.
    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.inner.draft().body.clone()
    }

    #[wasm_bindgen(js_name = previewHtml)]
    pub fn preview_html(&self) -> String {
        self.inner.preview_html().to_string()
    }

    #[wasm_bindgen(js_name = getView)]
    pub fn get_view(&self) -> JsViewState {
        self.inner.view().into()
    }

    /// Build the create/update body, or throw with a user-facing message.
    #[wasm_bindgen(js_name = buildPayload)]
    pub fn build_payload(&self) -> Result<JsEntryPayload, JsError> {
        self.inner
            .build_submission_payload()
            .map(Into::into)
            .map_err(|e| JsError::new(&e.user_message()))
    }
}

impl Default for JsEditor {
    fn default() -> Self {
        Self::new()
    }
}
