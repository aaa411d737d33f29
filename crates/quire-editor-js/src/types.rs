//! Types exposed to JavaScript via wasm-bindgen.

use quire_editor_core::{EntryPayload, InitialEntry, ViewState};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Stored entry used to start an edit session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase", default)]
pub struct JsInitialEntry {
    pub title: String,
    pub description: String,
    pub visibility: String,
    /// Stored wire content type, e.g. `text/markdown` or `image/png;base64`
    pub content_type: String,
    pub content: String,
    pub mime: Option<String>,
}

impl From<JsInitialEntry> for InitialEntry {
    fn from(js: JsInitialEntry) -> Self {
        InitialEntry {
            title: js.title,
            description: js.description,
            visibility: js.visibility,
            content_type: js.content_type,
            content: js.content,
            mime: js.mime,
        }
    }
}

/// What a host page should show for the editor's current state.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsViewState {
    /// `plain`, `markdown` or `image`
    pub mode: String,
    pub content_type: String,
    pub show_edit_pane: bool,
    pub show_preview_pane: bool,
    pub show_choose_file: bool,
    pub show_insert_image_link: bool,
    pub preview_html: String,
    pub text: String,
}

impl From<ViewState<'_>> for JsViewState {
    fn from(view: ViewState<'_>) -> Self {
        let mode = match view.mode {
            quire_editor_core::EditorMode::Plain => "plain",
            quire_editor_core::EditorMode::Markdown => "markdown",
            quire_editor_core::EditorMode::Image => "image",
        };
        Self {
            mode: mode.to_string(),
            content_type: view.selector.to_string(),
            show_edit_pane: view.layout.edit_pane,
            show_preview_pane: view.layout.preview_pane,
            show_choose_file: view.layout.choose_file,
            show_insert_image_link: view.layout.insert_image_link,
            preview_html: view.preview_html.to_string(),
            text: view.text.to_string(),
        }
    }
}

/// Request body for creating or updating an entry.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsEntryPayload {
    pub title: String,
    pub description: String,
    pub visibility: String,
    pub content_type: String,
    pub content: String,
}

impl From<EntryPayload> for JsEntryPayload {
    fn from(p: EntryPayload) -> Self {
        Self {
            title: p.title,
            description: p.description,
            visibility: p.visibility,
            content_type: p.content_type,
            content: p.content,
        }
    }
}
