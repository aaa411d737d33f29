//! Browser DOM layer for the quire post editor and entry pages.
//!
//! This crate drives the `quire-editor-core` controller from page events and
//! renders its view state back into the page. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`: element lookup, dialogs, navigation
//! - `view`: editor elements and applying a `ViewState`
//! - `file`: reading chosen files
//! - `page`: CSRF token, `data-*` ids, the page's API client
//! - `editor`: new-post and edit-post pages
//! - `entry_detail`: delete, comments and likes on an entry page
//! - `posts`: stored entries rendered by content type
//! - `feed`: post links, entry likes and the new-post button
//! - `navbar`: profile menu, logout and author search
//! - `relationships`: follow requests and follow management
//!
//! # Re-exports
//!
//! This crate re-exports `quire-editor-core` for convenience, so consumers
//! only need to depend on `quire-editor-browser`.

// Re-export core crate
pub use quire_editor_core;
pub use quire_editor_core::*;

pub mod comments;
pub mod dom;
pub mod editor;
pub mod entry_detail;
pub mod feed;
pub mod file;
pub mod navbar;
pub mod page;
pub mod posts;
pub mod relationships;
pub mod view;

pub use dom::DomError;
pub use editor::{EditorHandle, EditorPage, mount_editor};
pub use entry_detail::{EntryDetailHandle, mount_entry_detail};
pub use feed::{FeedHandle, mount_feed};
pub use navbar::{NavbarHandle, mount_navbar};
pub use page::{PageContext, PagePublisher, csrf_token};
pub use posts::render_posts;
pub use view::{EditorElements, apply_view};
