//! What the server rendered into the page: ids, CSRF token, initial entry.

use quire_common::ids::author_from_page_path;
use quire_common::{ApiClient, Entry, EntryPayload, QuireError, SubmitTarget};
use quire_editor_core::{EntryPublisher, InitialEntry};
use web_sys::Document;

use crate::dom::{DomError, body_data, document, window};
use crate::view::EditorElements;

/// `<meta name="csrf-token" content="...">`.
pub fn csrf_token(document: &Document) -> Option<String> {
    document
        .query_selector(r#"meta[name="csrf-token"]"#)
        .ok()??
        .get_attribute("content")
}

/// API client for the page's own origin, carrying the page's current CSRF token.
pub fn page_client(document: &Document) -> Result<ApiClient, DomError> {
    let origin = window()?.location().origin()?;
    ApiClient::for_origin(&origin, csrf_token(document))
        .map_err(|e| DomError(format!("bad page origin {origin}: {e}")))
}

/// Ids rendered into `<body data-*>` and the page path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// `data-author-id`: the entry's author
    pub author_id: Option<String>,
    /// `data-entry-id`: full id of the entry shown or edited
    pub entry_id: Option<String>,
    /// `data-current-user-id`: the signed-in author
    pub current_user_id: Option<String>,
    pub pathname: String,
}

impl PageContext {
    pub fn from_document(document: &Document) -> Result<Self, DomError> {
        Ok(Self {
            author_id: body_data(document, "authorId").filter(|s| !s.is_empty()),
            entry_id: body_data(document, "entryId").filter(|s| !s.is_empty()),
            current_user_id: body_data(document, "currentUserId").filter(|s| !s.is_empty()),
            pathname: window()?.location().pathname()?,
        })
    }

    /// Author from `data-author-id`, else from `/authors/<id>/...` in the path.
    pub fn author(&self) -> Result<String, DomError> {
        self.author_id
            .clone()
            .or_else(|| author_from_page_path(&self.pathname))
            .ok_or_else(|| "page has no author id".into())
    }

    pub fn entry(&self) -> Result<&str, DomError> {
        self.entry_id
            .as_deref()
            .ok_or_else(|| "page has no entry id".into())
    }

    pub fn current_user(&self) -> Result<&str, DomError> {
        self.current_user_id
            .as_deref()
            .ok_or_else(|| "page has no signed-in author".into())
    }
}

/// Stored entry for the edit page.
///
/// Text fields come from the prefilled inputs. Image content comes from
/// `data-initial-*`; text content from `data-initial-content` when present,
/// else from the server-filled textarea.
pub fn initial_entry(document: &Document, elements: &EditorElements) -> InitialEntry {
    let mut entry = InitialEntry {
        title: elements.title_value(),
        description: elements.description_value(),
        visibility: elements.visibility_value(document).unwrap_or_default(),
        content_type: body_data(document, "initialContentType")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| elements.content_type.value()),
        content: String::new(),
        mime: body_data(document, "initialMime"),
    };
    let stored = body_data(document, "initialContent");
    entry.content = if entry.is_image() {
        stored.unwrap_or_default()
    } else {
        stored.unwrap_or_else(|| elements.textarea.value())
    };
    entry
}

/// Publishes through a client built per request, so the CSRF token is read
/// fresh from the page each time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PagePublisher;

impl EntryPublisher for PagePublisher {
    async fn publish(
        &self,
        target: &SubmitTarget,
        payload: &EntryPayload,
    ) -> Result<Entry, QuireError> {
        let client = page_client(&document()?)?;
        client.submit_entry(target, payload).await
    }
}
