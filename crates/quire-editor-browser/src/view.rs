//! Editor page elements and rendering of the controller's [`ViewState`].
//!
//! The page is a render target only. Every write here comes from a
//! `ViewState`; nothing reads editor state back out of the DOM except the
//! input handlers, which forward the new value to the controller.

use quire_editor_core::ViewState;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

use crate::dom::{DomError, by_id, checked_radio_value, form_value, query, set_shown};

/// Handles to the editor page's elements, looked up once at mount.
#[derive(Clone)]
pub struct EditorElements {
    pub textarea: HtmlTextAreaElement,
    pub preview: HtmlElement,
    /// First child of `.editor-container`
    pub edit_box: HtmlElement,
    /// Last child of `.editor-container`
    pub preview_box: HtmlElement,
    pub content_type: HtmlSelectElement,
    pub image_input: HtmlInputElement,
    pub upload_button: HtmlElement,
    pub insert_image_button: HtmlElement,
    pub post_button: HtmlButtonElement,
    pub cancel_button: HtmlElement,
    pub title: Element,
    pub description: Element,
}

impl EditorElements {
    /// Find every element the editor needs. A missing one is an error.
    pub fn locate(document: &Document) -> Result<Self, DomError> {
        let container: Element = query(document, ".editor-container")?;
        let edit_box = container
            .first_element_child()
            .ok_or(".editor-container has no children")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| "edit box is not an HtmlElement")?;
        let preview_box = container
            .last_element_child()
            .ok_or(".editor-container has no children")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| "preview box is not an HtmlElement")?;

        Ok(Self {
            textarea: query(document, "#content")?,
            preview: by_id(document, "preview")?,
            edit_box,
            preview_box,
            content_type: query(document, "#contentType")?,
            image_input: query(document, "#image")?,
            upload_button: by_id(document, "uploadImageBtn")?,
            insert_image_button: by_id(document, "insertImageBtn")?,
            post_button: query(document, ".post-btn")?,
            cancel_button: query(document, ".cancel-btn")?,
            title: query(document, "#title")?,
            description: query(document, "#description")?,
        })
    }

    pub fn title_value(&self) -> String {
        form_value(&self.title).unwrap_or_default()
    }

    pub fn description_value(&self) -> String {
        form_value(&self.description).unwrap_or_default()
    }

    /// Checked `visibility` radio, if any.
    pub fn visibility_value(&self, document: &Document) -> Option<String> {
        checked_radio_value(document, "visibility")
    }
}

/// Write a view state into the page.
///
/// Form values are only touched when they differ, so typing never loses the
/// caret.
pub fn apply_view(elements: &EditorElements, view: &ViewState<'_>) -> Result<(), DomError> {
    let layout = view.layout;
    set_shown(&elements.edit_box, layout.edit_pane)?;
    set_shown(&elements.preview_box, layout.preview_pane)?;
    set_shown(&elements.upload_button, layout.choose_file)?;
    set_shown(&elements.insert_image_button, layout.insert_image_link)?;

    if elements.preview.inner_html() != view.preview_html {
        elements.preview.set_inner_html(view.preview_html);
    }
    if elements.textarea.value() != view.text {
        elements.textarea.set_value(view.text);
    }
    if elements.content_type.value() != view.selector {
        elements.content_type.set_value(view.selector);
    }

    tracing::trace!(mode = ?view.mode, "editor view applied");
    Ok(())
}
