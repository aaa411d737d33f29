//! Entry detail page: owner menu, delete, comments and comment likes.

use std::rc::Rc;

use gloo_events::EventListener;
use quire_common::ids::{entry_edit_page_path, last_segment};
use quire_common::{CommentActivity, LikeActivity, QuireError};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlTextAreaElement};

use crate::comments::{
    LIKE_BUTTON_CLASS, LIKE_COUNT_CLASS, LOAD_FAILED_HTML, comments_html, like_label,
    next_like_label,
};
use crate::dom::{self, DomError, optional_by_id, query};
use crate::page::{PageContext, page_client};

const DELETE_FAILED: &str = "Failed to delete the post.";
const COMMENT_FAILED: &str = "Fail to post a comment";
const LIKE_FAILED: &str = "Failed to like this comment again";

struct CommentForm {
    show_button: HtmlElement,
    form: HtmlElement,
    cancel_button: HtmlElement,
    send_button: HtmlButtonElement,
    text: HtmlTextAreaElement,
}

impl CommentForm {
    fn locate(document: &Document) -> Option<Self> {
        Some(Self {
            show_button: optional_by_id(document, "show-comment-form-btn")?,
            form: optional_by_id(document, "comment-form")?,
            cancel_button: optional_by_id(document, "cancel-comment-btn")?,
            send_button: optional_by_id(document, "send-comment-btn")?,
            text: optional_by_id(document, "comment-text")?,
        })
    }

    fn open(&self) -> Result<(), DomError> {
        dom::set_display(&self.form, "block")?;
        dom::set_display(&self.show_button, "none")
    }

    fn close(&self) -> Result<(), DomError> {
        self.text.set_value("");
        dom::set_display(&self.form, "none")?;
        dom::set_display(&self.show_button, "inline-block")
    }
}

struct DetailState {
    document: Document,
    context: PageContext,
    comments: Option<HtmlElement>,
    comment_form: Option<CommentForm>,
}

/// Keeps the detail page's listeners alive.
pub struct EntryDetailHandle {
    listeners: Vec<EventListener>,
}

impl EntryDetailHandle {
    pub fn forget(self) {
        for listener in self.listeners {
            listener.forget();
        }
    }
}

/// Wire up the entry detail page and load its comments.
///
/// Every widget is optional: a page without an owner menu or comment form
/// simply gets fewer listeners.
pub fn mount_entry_detail() -> Result<EntryDetailHandle, DomError> {
    let document = dom::document()?;
    let context = PageContext::from_document(&document)?;
    // Required up front so every later handler can rely on them.
    context.author()?;
    context.entry()?;

    let state = Rc::new(DetailState {
        comments: query::<HtmlElement>(&document, ".comments-section").ok(),
        comment_form: CommentForm::locate(&document),
        document,
        context,
    });
    let mut listeners = Vec::new();

    if let (Some(toggle), Some(menu)) = (
        optional_by_id::<Element>(&state.document, "dropdown-toggle"),
        optional_by_id::<Element>(&state.document, "dropdown-menu"),
    ) {
        let menu_for_toggle = menu.clone();
        listeners.push(EventListener::new(&toggle, "click", move |_| {
            let _ = menu_for_toggle.class_list().toggle("hidden");
        }));
        listeners.push(EventListener::new(&state.document, "click", move |event| {
            let inside = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
                .is_some_and(|node| toggle.contains(Some(&node)) || menu.contains(Some(&node)));
            if !inside {
                let _ = menu.class_list().add_1("hidden");
            }
        }));
    }

    if let Some(delete) = optional_by_id::<Element>(&state.document, "delete-entry-btn") {
        let state = state.clone();
        listeners.push(EventListener::new(&delete, "click", move |_| {
            let state = state.clone();
            spawn_local(async move {
                if let Err(e) = state.delete_entry().await {
                    tracing::error!(error = %e, "delete handler failed");
                }
            });
        }));
    }

    if let Some(edit) = optional_by_id::<Element>(&state.document, "edit-entry-btn") {
        let state = state.clone();
        listeners.push(EventListener::new(&edit, "click", move |_| {
            if let Err(e) = state.open_editor() {
                tracing::error!(error = %e, "edit navigation failed");
            }
        }));
    }

    if let Some(form) = &state.comment_form {
        let for_open = state.clone();
        listeners.push(EventListener::new(&form.show_button, "click", move |_| {
            if let Some(form) = &for_open.comment_form {
                let _ = form.open();
            }
        }));
        let for_close = state.clone();
        listeners.push(EventListener::new(&form.cancel_button, "click", move |_| {
            if let Some(form) = &for_close.comment_form {
                let _ = form.close();
            }
        }));
        let for_send = state.clone();
        listeners.push(EventListener::new(&form.send_button, "click", move |_| {
            let state = for_send.clone();
            spawn_local(async move {
                if let Err(e) = state.send_comment().await {
                    tracing::error!(error = %e, "comment handler failed");
                }
            });
        }));
    }

    if let Some(section) = &state.comments {
        // Delegated, so re-rendered comment lists need no re-wiring.
        let for_likes = state.clone();
        listeners.push(EventListener::new(section, "click", move |event| {
            let Some(button) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(&format!(".{LIKE_BUTTON_CLASS}")).ok().flatten())
                .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            else {
                return;
            };
            let state = for_likes.clone();
            spawn_local(async move {
                if let Err(e) = state.like_comment(button).await {
                    tracing::error!(error = %e, "like handler failed");
                }
            });
        }));

        let state = state.clone();
        spawn_local(async move {
            state.load_comments().await;
        });
    }

    tracing::info!(listeners = listeners.len(), "entry detail mounted");
    Ok(EntryDetailHandle { listeners })
}

impl DetailState {
    fn author(&self) -> Result<String, DomError> {
        self.context.author()
    }

    fn entry(&self) -> Result<&str, DomError> {
        self.context.entry()
    }

    fn open_editor(&self) -> Result<(), DomError> {
        dom::navigate(&entry_edit_page_path(&self.author()?, self.entry()?))
    }

    async fn delete_entry(&self) -> Result<(), DomError> {
        if !dom::confirm("Are you sure you want to delete this post?")? {
            return Ok(());
        }
        let client = page_client(&self.document)?;
        match client.delete_entry(&self.author()?, self.entry()?).await {
            Ok(()) => {
                dom::alert("Post deleted successfully.")?;
                dom::navigate("/")
            }
            Err(QuireError::Forbidden) => {
                dom::alert("You are not authorized to delete this post.")
            }
            Err(QuireError::Transport(e)) => {
                tracing::error!(error = %e, "delete request failed");
                dom::alert("An error occurred while deleting the post.")
            }
            Err(e) => {
                tracing::error!(error = %e, "delete rejected");
                dom::alert(DELETE_FAILED)
            }
        }
    }

    async fn load_comments(&self) {
        let Some(section) = &self.comments else {
            return;
        };
        let result = async {
            let client = page_client(&self.document)?;
            Ok::<_, QuireError>(client.list_comments(&self.author()?, self.entry()?).await?)
        }
        .await;
        match result {
            Ok(comments) => {
                tracing::debug!(count = comments.len(), "comments loaded");
                section.set_inner_html(&comments_html(&comments, dom::locale_datetime));
            }
            Err(e) => {
                tracing::error!(error = %e, "comments fetch failed");
                section.set_inner_html(LOAD_FAILED_HTML);
            }
        }
    }

    async fn send_comment(&self) -> Result<(), DomError> {
        let Some(form) = &self.comment_form else {
            return Ok(());
        };
        let text = form.text.value();
        let text = text.trim();
        if text.is_empty() {
            let err = quire_common::ValidationError::EmptyField("comment");
            return dom::alert(&err.user_message());
        }
        if form.send_button.disabled() {
            return Ok(());
        }
        form.send_button.set_disabled(true);

        let entry = self.entry()?.to_string();
        let activity = CommentActivity {
            comment: text.to_string(),
            content_type: "text/plain".to_string(),
            object: entry.clone(),
            published: dom::now_iso(),
        };
        let result = async {
            let client = page_client(&self.document)?;
            client.post_comment(&self.author()?, &entry, activity).await
        }
        .await;
        form.send_button.set_disabled(false);

        match result {
            Ok(()) => {
                form.close()?;
                self.load_comments().await;
                Ok(())
            }
            Err(e) => dom::alert(&e.user_message(COMMENT_FAILED)),
        }
    }

    /// Like a comment on behalf of the signed-in author.
    ///
    /// The count shown is bumped locally on success rather than re-fetched.
    async fn like_comment(&self, button: HtmlButtonElement) -> Result<(), DomError> {
        if button.disabled() {
            return Ok(());
        }
        let comment_id = button.get_attribute("data-comment-id").unwrap_or_default();
        let comment_author = button.get_attribute("data-author-id").unwrap_or_default();
        let current_user = self.context.current_user()?.to_string();
        let client = page_client(&self.document)?;

        let author = match client.fetch_author(last_segment(&current_user)).await {
            Ok(author) => author,
            Err(e) => {
                tracing::warn!(error = %e, "author fetch failed");
                return dom::alert("Failed to fetch author info.");
            }
        };
        let like = LikeActivity {
            id: LikeActivity::like_id(&current_user, &dom::random_uuid()?),
            author,
            object: comment_id,
            published: dom::now_iso(),
        };

        match client.send_like(&comment_author, like).await {
            Ok(()) => {
                if let Some(label) = button.query_selector(&format!(".{LIKE_COUNT_CLASS}"))? {
                    let text = label.text_content().unwrap_or_default();
                    label.set_text_content(Some(next_like_label(&text, like_label).as_str()));
                }
                button.set_disabled(true);
                Ok(())
            }
            Err(QuireError::Transport(e)) => {
                tracing::error!(error = %e, "like request failed");
                dom::alert("Network error")
            }
            Err(e) => dom::alert(&e.user_message(LIKE_FAILED)),
        }
    }
}
