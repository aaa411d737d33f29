//! Sending a finished draft to the server.
//!
//! A [`Submission`] pairs a publisher with a [`SubmitTarget`] and allows at
//! most one request in flight. There is no retry, timeout or cancellation:
//! one attempt runs to completion and its outcome goes back to the caller.

use std::cell::Cell;
use std::future::Future;

use miette::Diagnostic;
use quire_common::{ApiClient, Entry, EntryPayload, QuireError, SubmitTarget, ValidationError};

use crate::controller::EditorController;
use crate::render::MarkdownRenderer;

/// Something that can create or update an entry.
///
/// Futures are not required to be `Send`, so browser fetch futures qualify.
pub trait EntryPublisher {
    fn publish(
        &self,
        target: &SubmitTarget,
        payload: &EntryPayload,
    ) -> impl Future<Output = Result<Entry, QuireError>>;
}

impl EntryPublisher for ApiClient {
    async fn publish(
        &self,
        target: &SubmitTarget,
        payload: &EntryPayload,
    ) -> Result<Entry, QuireError> {
        self.submit_entry(target, payload).await
    }
}

impl<P: EntryPublisher> EntryPublisher for &P {
    fn publish(
        &self,
        target: &SubmitTarget,
        payload: &EntryPayload,
    ) -> impl Future<Output = Result<Entry, QuireError>> {
        (*self).publish(target, payload)
    }
}

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum SubmitError {
    /// Another submission from the same draft has not finished yet
    #[error("a submission is already in progress")]
    #[diagnostic(code(quire::submit::in_flight))]
    AlreadyInFlight,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Failed(#[from] QuireError),
}

impl From<ValidationError> for SubmitError {
    fn from(err: ValidationError) -> Self {
        SubmitError::Failed(QuireError::Validation(err))
    }
}

impl SubmitError {
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            SubmitError::AlreadyInFlight => "Your post is already being submitted.".to_string(),
            SubmitError::Failed(err) => err.user_message(fallback),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SubmitError::Failed(err) if err.is_validation())
    }
}

/// At-most-one-in-flight flag for a single draft.
#[derive(Debug, Default)]
pub struct SubmitGuard {
    in_flight: Cell<bool>,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard, or `None` if a submission is already running.
    pub fn try_begin(&self) -> Option<InFlight<'_>> {
        if self.in_flight.replace(true) {
            None
        } else {
            Some(InFlight { guard: self })
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }
}

/// Held for the duration of one submission; releases the guard on drop.
#[derive(Debug)]
pub struct InFlight<'a> {
    guard: &'a SubmitGuard,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.guard.in_flight.set(false);
    }
}

/// Submission strategy for one editor: a publisher, a target and the guard.
pub struct Submission<P> {
    publisher: P,
    target: SubmitTarget,
    guard: SubmitGuard,
}

impl<P: EntryPublisher> Submission<P> {
    pub fn new(publisher: P, target: SubmitTarget) -> Self {
        Self {
            publisher,
            target,
            guard: SubmitGuard::new(),
        }
    }

    pub fn target(&self) -> &SubmitTarget {
        &self.target
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn is_in_flight(&self) -> bool {
        self.guard.is_in_flight()
    }

    /// Validate and send the editor's draft.
    pub async fn submit<R: MarkdownRenderer>(
        &self,
        editor: &EditorController<R>,
    ) -> Result<Entry, SubmitError> {
        self.submit_with(|| editor.build_submission_payload()).await
    }

    /// Claim the guard, build the payload, send it.
    ///
    /// `build` runs synchronously before any await, so callers holding the
    /// editor in a `RefCell` can borrow it just for the closure. A validation
    /// failure releases the guard without touching the network.
    pub async fn submit_with<F>(&self, build: F) -> Result<Entry, SubmitError>
    where
        F: FnOnce() -> Result<EntryPayload, ValidationError>,
    {
        let Some(_in_flight) = self.guard.try_begin() else {
            tracing::debug!("submit ignored, already in flight");
            return Err(SubmitError::AlreadyInFlight);
        };
        let payload = build().inspect_err(|e| {
            tracing::debug!(error = %e, "draft failed validation");
        })?;

        tracing::info!(
            method = %self.target.method(),
            path = %self.target.path(),
            content_type = %payload.content_type,
            "submitting entry"
        );
        let entry = self
            .publisher
            .publish(&self.target, &payload)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "entry submission failed"))?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records payloads; answers with the canned result.
    struct FakePublisher {
        sent: RefCell<Vec<(SubmitTarget, EntryPayload)>>,
        fail_with: Option<u16>,
    }

    impl FakePublisher {
        fn ok() -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                fail_with: Some(status),
            }
        }
    }

    impl EntryPublisher for FakePublisher {
        async fn publish(
            &self,
            target: &SubmitTarget,
            payload: &EntryPayload,
        ) -> Result<Entry, QuireError> {
            self.sent
                .borrow_mut()
                .push((target.clone(), payload.clone()));
            match self.fail_with {
                Some(status) => Err(QuireError::Server {
                    status,
                    detail: Some("Invalid visibility".to_string()),
                }),
                None => Ok(Entry {
                    id: Some("http://node/api/authors/1/entries/2".to_string()),
                    title: Some(payload.title.clone()),
                    content_type: Some(payload.content_type.clone()),
                    extra: Default::default(),
                }),
            }
        }
    }

    fn markdown_editor(body: &str) -> EditorController {
        let mut ed = EditorController::new();
        ed.set_content_type("text/markdown");
        ed.set_title("Title");
        ed.on_text_changed(body);
        ed
    }

    #[tokio::test]
    async fn test_submit_sends_payload_to_target() {
        let submission = Submission::new(FakePublisher::ok(), SubmitTarget::create("1"));
        let ed = markdown_editor("hello");

        let entry = submission.submit(&ed).await.unwrap();
        assert_eq!(entry.title.as_deref(), Some("Title"));

        let sent = submission.publisher().sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.path(), "/api/authors/1/entries/");
        assert_eq!(sent[0].1.content, "hello");
        assert!(!submission.is_in_flight());
    }

    #[tokio::test]
    async fn test_validation_failure_issues_no_request() {
        let submission = Submission::new(FakePublisher::ok(), SubmitTarget::create("1"));
        let mut ed = EditorController::new();
        ed.set_content_type("image");

        let err = submission.submit(&ed).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.user_message("x"), "Please choose an image.");
        assert!(submission.publisher().sent.borrow().is_empty());
        assert!(!submission.is_in_flight());
    }

    #[tokio::test]
    async fn test_server_failure_keeps_draft_and_releases_guard() {
        let submission = Submission::new(
            FakePublisher::failing(400),
            SubmitTarget::update("1", "http://node/api/authors/1/entries/2"),
        );
        let ed = markdown_editor("keep me");

        let err = submission.submit(&ed).await.unwrap_err();
        assert_eq!(err.user_message("Failed"), "Invalid visibility");
        assert_eq!(ed.draft().body, "keep me");
        assert!(!submission.is_in_flight());

        // A retry goes through once the first attempt has settled.
        assert!(submission.submit(&ed).await.is_err());
        assert_eq!(submission.publisher().sent.borrow().len(), 2);
    }

    #[test]
    fn test_guard_allows_one_in_flight() {
        let guard = SubmitGuard::new();
        let first = guard.try_begin();
        assert!(first.is_some());
        assert!(guard.is_in_flight());
        assert!(guard.try_begin().is_none());
        drop(first);
        assert!(!guard.is_in_flight());
        assert!(guard.try_begin().is_some());
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_rejected() {
        let submission = Submission::new(FakePublisher::ok(), SubmitTarget::create("1"));
        let ed = markdown_editor("x");

        let held = submission.guard.try_begin();
        assert!(held.is_some());
        let err = submission.submit(&ed).await.unwrap_err();
        assert!(matches!(err, SubmitError::AlreadyInFlight));
        assert!(submission.publisher().sent.borrow().is_empty());
        drop(held);

        assert!(submission.submit(&ed).await.is_ok());
    }
}
