//! quire-editor-core: post drafting logic without framework dependencies.
//!
//! This crate provides:
//! - `PostDraft` - the in-progress entry, owned by one editor
//! - `EditorMode` - plain / Markdown / image authoring modes
//! - `EditorController` - the editor/preview state machine
//! - `MarkdownRenderer` - the preview rendering seam
//! - `Submission` - create/update with at most one request in flight

pub mod controller;
pub mod draft;
pub mod mode;
pub mod render;
pub mod submit;

pub use controller::{EditorController, ViewState};
pub use draft::{BASE64_FALLBACK, ImageMime, ImagePayload, InitialEntry, PostDraft, Visibility};
pub use mode::{EditorMode, PaneLayout};
pub use quire_common::{EntryPayload, SubmitTarget, ValidationError};
pub use render::{
    MarkdownRenderer, StoredContent, WeaverMarkdown, image_preview_html, render_markdown,
    render_stored,
};
pub use submit::{EntryPublisher, InFlight, SubmitError, SubmitGuard, Submission};
