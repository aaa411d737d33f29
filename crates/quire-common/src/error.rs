//! Error types for quire.
//!
//! Every failure a user can hit while composing or managing entries lands in
//! [`QuireError`]. None of them corrupt the draft, so callers surface the
//! message and let the user try again.

use miette::Diagnostic;

/// Main error type for quire operations
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum QuireError {
    /// Input rejected before any request was made
    #[error(transparent)]
    #[diagnostic_source]
    Validation(#[from] ValidationError),

    /// The request never produced a response (fetch rejected, connection refused, ...)
    #[error("request failed: {0}")]
    #[diagnostic(
        code(quire::transport),
        help("check that the server is reachable and try again")
    )]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the API
    #[error("server responded with status {status}")]
    #[diagnostic(code(quire::server))]
    Server {
        status: u16,
        /// Message extracted from the JSON error body, if any
        detail: Option<String>,
    },

    /// 403 from an endpoint that distinguishes authorization failures
    #[error("not authorized")]
    #[diagnostic(code(quire::forbidden))]
    Forbidden,

    #[error(transparent)]
    #[diagnostic(code(quire::url))]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    #[diagnostic(code(quire::serde))]
    Serde(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    #[diagnostic(code(quire::config))]
    Config(String),
}

impl QuireError {
    /// Message suitable for showing to a person.
    ///
    /// Server-supplied messages are passed through verbatim. Anything without a
    /// better description collapses to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            QuireError::Validation(v) => v.user_message(),
            QuireError::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            QuireError::Forbidden => "You are not authorized to perform this action.".to_string(),
            _ => fallback.to_string(),
        }
    }

    /// True for failures that happened before the network was touched.
    pub fn is_validation(&self) -> bool {
        matches!(self, QuireError::Validation(_))
    }
}

/// Input problems caught locally.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ValidationError {
    #[error("no image selected")]
    #[diagnostic(
        code(quire::validation::no_image),
        help("choose an image file before posting")
    )]
    NoImageSelected,

    #[error("{0} is required")]
    #[diagnostic(code(quire::validation::empty_field))]
    EmptyField(&'static str),
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::NoImageSelected => "Please choose an image.".to_string(),
            ValidationError::EmptyField(field) => format!("Please enter your {field}"),
        }
    }
}

/// Pull a human-readable message out of an API error body.
///
/// The backend answers with `{"detail": "..."}` most of the time; `message`
/// and `error` keys are accepted too, as is a bare JSON string.
pub fn server_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Object(map) => ["detail", "message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}
