//! New-post and edit-post pages.
//!
//! Both pages run the same [`EditorController`]; they differ only in how the
//! draft starts out, where it is submitted and what "cancel" does.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use quire_common::{Entry, SubmitTarget};
use quire_common::ids::entry_page_path;
use quire_editor_core::{EditorController, EditorMode, PostDraft, SubmitError, Submission};
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use crate::dom::{self, DomError};
use crate::file::{read_file_bytes, selected_file};
use crate::page::{PageContext, PagePublisher, initial_entry};
use crate::view::{EditorElements, apply_view};

const SAVE_FAILED: &str = "Failed to save the post.";

/// Which editor page is being mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorPage {
    New,
    Edit,
}

struct EditorState {
    document: Document,
    elements: EditorElements,
    editor: RefCell<EditorController>,
    submission: Submission<PagePublisher>,
    page: EditorPage,
}

/// Keeps a mounted editor's listeners alive. Dropping it detaches them.
pub struct EditorHandle {
    state: Rc<EditorState>,
    listeners: Vec<EventListener>,
}

impl EditorHandle {
    pub fn mode(&self) -> EditorMode {
        self.state.editor.borrow().mode()
    }

    /// Snapshot of the current draft.
    pub fn draft(&self) -> PostDraft {
        self.state.editor.borrow().draft().clone()
    }

    /// Whether the post button's submission is still running.
    pub fn is_submitting(&self) -> bool {
        self.state.submission.is_in_flight()
    }

    /// Submit the draft as the post button does, without the dialogs and
    /// navigation that follow it.
    pub fn submit(&self) -> impl Future<Output = Result<Entry, SubmitError>> + 'static {
        let state = self.state.clone();
        async move { state.try_submit().await }
    }

    /// Leave the listeners attached for the life of the page.
    pub fn forget(self) {
        for listener in self.listeners {
            listener.forget();
        }
    }
}

/// Wire up the editor on the current page.
pub fn mount_editor(page: EditorPage) -> Result<EditorHandle, DomError> {
    let document = dom::document()?;
    let elements = EditorElements::locate(&document)?;
    let context = PageContext::from_document(&document)?;

    let (editor, target) = match page {
        EditorPage::New => {
            // Start from whatever the form shows, as after a back-navigation.
            let mut editor = EditorController::new();
            editor.set_content_type(&elements.content_type.value());
            editor.on_text_changed(&elements.textarea.value());
            (editor, SubmitTarget::create(context.author()?))
        }
        EditorPage::Edit => {
            let draft = PostDraft::hydrate(initial_entry(&document, &elements));
            let target = SubmitTarget::update(context.author()?, context.entry()?);
            (EditorController::from_draft(draft), target)
        }
    };
    tracing::info!(?page, mode = ?editor.mode(), path = %target.path(), "editor mounted");

    let state = Rc::new(EditorState {
        document,
        elements,
        editor: RefCell::new(editor),
        submission: Submission::new(PagePublisher, target),
        page,
    });
    state.render();

    let listeners = vec![
        listen(&state, &state.elements.content_type, "change", |state, _| {
            let value = state.elements.content_type.value();
            state.editor.borrow_mut().set_content_type(&value);
            state.render();
        }),
        listen(&state, &state.elements.textarea, "input", |state, _| {
            let text = state.elements.textarea.value();
            state.editor.borrow_mut().on_text_changed(&text);
            state.render();
        }),
        listen(&state, &state.elements.upload_button, "click", |state, _| {
            state.elements.image_input.click();
        }),
        listen(&state, &state.elements.image_input, "change", |state, _| {
            spawn_local(async move {
                if let Err(e) = state.attach_selected_image().await {
                    tracing::error!(error = %e, "failed to attach image");
                }
            });
        }),
        listen(&state, &state.elements.insert_image_button, "click", |state, _| {
            if let Err(e) = state.insert_image_link() {
                tracing::error!(error = %e, "failed to insert image link");
            }
        }),
        {
            let button = state.elements.post_button.clone();
            let state = state.clone();
            EventListener::new_with_options(
                &button,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    let state = state.clone();
                    spawn_local(async move {
                        if let Err(e) = state.submit().await {
                            tracing::error!(error = %e, "submit handler failed");
                        }
                    });
                },
            )
        },
        listen(&state, &state.elements.cancel_button, "click", |state, _| {
            if let Err(e) = state.cancel() {
                tracing::error!(error = %e, "cancel failed");
            }
        }),
    ];

    Ok(EditorHandle { state, listeners })
}

/// Attach `handler` to `target`, giving it its own reference to the state.
fn listen<F>(
    state: &Rc<EditorState>,
    target: &web_sys::EventTarget,
    event: &'static str,
    handler: F,
) -> EventListener
where
    F: Fn(Rc<EditorState>, &web_sys::Event) + 'static,
{
    let state = state.clone();
    EventListener::new(target, event, move |e| handler(state.clone(), e))
}

impl EditorState {
    fn render(&self) {
        let editor = self.editor.borrow();
        if let Err(e) = apply_view(&self.elements, &editor.view()) {
            tracing::error!(error = %e, "failed to render editor view");
        }
    }

    async fn attach_selected_image(&self) -> Result<(), DomError> {
        let input = &self.elements.image_input;
        if self.editor.borrow().mode() != EditorMode::Image {
            return Ok(());
        }
        let Some(file) = selected_file(input) else {
            return Ok(());
        };
        let bytes = read_file_bytes(&file).await?;
        let changed = self
            .editor
            .borrow_mut()
            .attach_image_file(Some(&bytes), &file.type_());
        if changed {
            self.render();
        }
        // Choosing the same file again must fire `change` again.
        input.set_value("");
        Ok(())
    }

    fn insert_image_link(&self) -> Result<(), DomError> {
        let Some(url) = dom::prompt("Enter image URL:", "")?.filter(|u| !u.is_empty()) else {
            return Ok(());
        };
        let alt = dom::prompt("Enter alt text (optional):", "")?.unwrap_or_default();
        if self
            .editor
            .borrow_mut()
            .insert_markdown_image_link(&url, &alt)
        {
            self.render();
        }
        Ok(())
    }

    /// Copy the free-text fields into the draft.
    fn read_fields(&self) {
        let mut editor = self.editor.borrow_mut();
        editor.set_title(&self.elements.title_value());
        editor.set_description(&self.elements.description_value());
        if let Some(visibility) = self.elements.visibility_value(&self.document) {
            editor.set_visibility(&visibility);
        }
    }

    /// Send the draft with the post button disabled for the duration.
    ///
    /// A second call while one is running leaves the button alone.
    async fn try_submit(&self) -> Result<Entry, SubmitError> {
        if self.submission.is_in_flight() {
            return Err(SubmitError::AlreadyInFlight);
        }
        self.read_fields();

        let button = &self.elements.post_button;
        button.set_disabled(true);
        let result = self
            .submission
            .submit_with(|| self.editor.borrow().build_submission_payload())
            .await;
        button.set_disabled(false);
        result
    }

    async fn submit(&self) -> Result<(), DomError> {
        match self.try_submit().await {
            Ok(_) => {
                let target = self.submission.target();
                dom::alert(target.success_message())?;
                dom::navigate(&target.redirect_path())
            }
            Err(SubmitError::AlreadyInFlight) => Ok(()),
            Err(e) => dom::alert(&e.user_message(SAVE_FAILED)),
        }
    }

    fn cancel(&self) -> Result<(), DomError> {
        match (self.page, self.submission.target()) {
            (EditorPage::Edit, SubmitTarget::Update { author, entry }) => {
                dom::navigate(&entry_page_path(author, entry))
            }
            _ => dom::history_back(),
        }
    }
}
