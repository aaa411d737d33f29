//! Shared pieces of the quire client: wire model, errors, the REST client,
//! id helpers and configuration.

pub mod api;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use crate::api::{ApiClient, SubmitTarget};
pub use crate::config::Config;
pub use crate::error::{QuireError, ValidationError};
pub use crate::model::{
    Activity, Author, AuthorSuggestion, AuthorSuggestions, Comment, CommentActivity, Entry, EntryPayload, FollowActivity, FollowPair,
    LikeActivity,
};
