//! REST client for the entry/comment/like/follow API.
//!
//! One [`ApiClient`] serves both the browser (reqwest over `fetch`, with
//! credentials included) and native tools. Every call is a single attempt:
//! there is no retry or timeout policy here, failures go back to the caller.

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{Config, with_trailing_slash};
use crate::error::{QuireError, server_detail};
use crate::ids::{encode_component, last_segment};
use crate::model::{
    Activity, Author, AuthorSuggestion, AuthorSuggestions, Comment, CommentActivity, CommentList, Entry, EntryPayload, FollowActivity,
    FollowPair, LikeActivity,
};

const CSRF_HEADER: &str = "X-CSRFToken";

/// Where a finished draft goes: a new entry or an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitTarget {
    Create {
        author: String,
    },
    Update {
        author: String,
        /// Full entry id as rendered into the page
        entry: String,
    },
}

impl SubmitTarget {
    pub fn create(author: impl Into<String>) -> Self {
        SubmitTarget::Create {
            author: author.into(),
        }
    }

    pub fn update(author: impl Into<String>, entry: impl Into<String>) -> Self {
        SubmitTarget::Update {
            author: author.into(),
            entry: entry.into(),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            SubmitTarget::Create { .. } => Method::POST,
            SubmitTarget::Update { .. } => Method::PUT,
        }
    }

    /// API path, with full-URL ids reduced to their uuid.
    pub fn path(&self) -> String {
        match self {
            SubmitTarget::Create { author } => {
                format!("/api/authors/{}/entries/", last_segment(author))
            }
            SubmitTarget::Update { author, entry } => format!(
                "/api/authors/{}/entries/{}/",
                last_segment(author),
                last_segment(entry)
            ),
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            SubmitTarget::Create { .. } => "Post created successfully!",
            SubmitTarget::Update { .. } => "Post updated successfully!",
        }
    }

    /// Page to navigate to once the entry is saved.
    pub fn redirect_path(&self) -> String {
        match self {
            SubmitTarget::Create { .. } => "/".to_string(),
            SubmitTarget::Update { author, entry } => crate::ids::entry_page_path(author, entry),
        }
    }
}

/// HTTP client bound to one API endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    csrf_token: Option<String>,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Result<Self, QuireError> {
        let base = config.endpoint_url()?;
        let http = build_http_client(config)?;
        Ok(Self {
            http,
            base,
            csrf_token: config.csrf_token.clone(),
        })
    }

    /// Client with an existing reqwest client, e.g. the page origin in the browser.
    pub fn with_client(http: reqwest::Client, base: Url) -> Self {
        Self {
            http,
            base: with_trailing_slash(base),
            csrf_token: None,
        }
    }

    pub fn with_csrf_token(mut self, token: Option<String>) -> Self {
        self.csrf_token = token;
        self
    }

    /// Client for a page served from the API host itself; the browser
    /// supplies cookies.
    pub fn for_origin(origin: &str, csrf_token: Option<String>) -> Result<Self, QuireError> {
        let base = Url::parse(origin)?;
        Ok(Self::with_client(reqwest::Client::new(), base).with_csrf_token(csrf_token))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve an API path under the base URL, keeping any path prefix.
    pub fn url(&self, path: &str) -> Result<Url, QuireError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, QuireError> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "api request");
        let mut req = self.http.request(method, url);
        if let Some(token) = &self.csrf_token {
            req = req.header(CSRF_HEADER, token);
        }
        #[cfg(all(target_family = "wasm", target_os = "unknown"))]
        {
            req = req.fetch_credentials_include();
        }
        Ok(req)
    }

    async fn send_json<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Response, QuireError> {
        let resp = self.request(method, path)?.json(body).send().await?;
        check_status(resp).await
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, QuireError> {
        let resp = self.request(Method::GET, path)?.send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    /// Create or update an entry.
    pub async fn submit_entry(
        &self,
        target: &SubmitTarget,
        payload: &EntryPayload,
    ) -> Result<Entry, QuireError> {
        let resp = self
            .send_json(target.method(), &target.path(), payload)
            .await?;
        let entry: Entry = resp.json().await?;
        tracing::info!(id = ?entry.id, "entry saved");
        Ok(entry)
    }

    /// Delete an entry. 403 is reported as [`QuireError::Forbidden`].
    pub async fn delete_entry(&self, author: &str, entry: &str) -> Result<(), QuireError> {
        let path = format!(
            "/api/authors/{}/entries/{}/",
            last_segment(author),
            last_segment(entry)
        );
        let resp = self.request(Method::DELETE, &path)?.send().await?;
        if resp.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(QuireError::Forbidden);
        }
        check_status(resp).await?;
        tracing::info!(entry = %last_segment(entry), "entry deleted");
        Ok(())
    }

    pub async fn fetch_author(&self, author: &str) -> Result<Author, QuireError> {
        self.get_json(&format!("/api/authors/{}/", last_segment(author)))
            .await
    }

    pub async fn list_comments(&self, author: &str, entry: &str) -> Result<Vec<Comment>, QuireError> {
        let list: CommentList = self
            .get_json(&format!(
                "/api/authors/{}/entries/{}/comments/",
                last_segment(author),
                last_segment(entry)
            ))
            .await?;
        Ok(list.src)
    }

    /// Post a comment. `entry` is the full entry id; the route takes it encoded.
    pub async fn post_comment(
        &self,
        author: &str,
        entry: &str,
        comment: CommentActivity,
    ) -> Result<(), QuireError> {
        let path = format!(
            "/api/authors/{}/entries/{}/commented/",
            last_segment(author),
            encode_component(entry)
        );
        self.send_json(Method::POST, &path, &Activity::Comment(comment))
            .await?;
        Ok(())
    }

    /// Deliver a like to the inbox of the liked object's author.
    pub async fn send_like(&self, target_author: &str, like: LikeActivity) -> Result<(), QuireError> {
        self.send_json(Method::POST, &inbox_path(target_author), &Activity::Like(like))
            .await?;
        Ok(())
    }

    /// Ask to follow `object`. The server handles remote delivery.
    pub async fn send_follow_request(&self, actor: Author, object: Author) -> Result<(), QuireError> {
        let path = inbox_path(&object.id);
        self.send_json(
            Method::POST,
            &path,
            &Activity::Follow(FollowActivity::new(actor, object)),
        )
        .await?;
        Ok(())
    }

    pub async fn accept_follow(&self, pair: &FollowPair) -> Result<(), QuireError> {
        self.send_json(Method::PATCH, "/api/follow/", pair).await?;
        Ok(())
    }

    /// Unfollow, or decline a pending request; the server treats both the same.
    pub async fn remove_follow(&self, pair: &FollowPair) -> Result<(), QuireError> {
        self.send_json(Method::DELETE, "/api/follow/", pair).await?;
        Ok(())
    }

    /// End the browser session.
    pub async fn logout(&self) -> Result<(), QuireError> {
        let resp = self.request(Method::POST, "/api/logout/")?.send().await?;
        check_status(resp).await?;
        Ok(())
    }

    /// Up to a handful of authors whose display name contains `query`.
    pub async fn author_autocomplete(
        &self,
        query: &str,
    ) -> Result<Vec<AuthorSuggestion>, QuireError> {
        let list: AuthorSuggestions = self.get_json(&autocomplete_path(query)).await?;
        Ok(list.results)
    }

    /// Ask the server to refresh its copy of remote authors. Returns once the
    /// server has queued the sync.
    pub async fn sync_remote_authors(&self) -> Result<(), QuireError> {
        let resp = self
            .request(Method::GET, "/api/sync_remote_authors/")?
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}

fn autocomplete_path(query: &str) -> String {
    format!("/api/author_autocomplete/?q={}", encode_component(query))
}

fn inbox_path(author: &str) -> String {
    format!("/api/authors/{}/inbox/", last_segment(author))
}

async fn check_status(resp: Response) -> Result<Response, QuireError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let detail = server_detail(&body);
    tracing::warn!(status = status.as_u16(), ?detail, "api request rejected");
    Err(QuireError::Server {
        status: status.as_u16(),
        detail,
    })
}

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
fn build_http_client(config: &Config) -> Result<reqwest::Client, QuireError> {
    use reqwest::header::{COOKIE, HeaderMap, HeaderValue};

    let mut headers = HeaderMap::new();
    if let Some(session) = &config.session_cookie {
        let value = HeaderValue::from_str(&format!("sessionid={session}"))
            .map_err(|e| QuireError::Config(format!("invalid session cookie: {e}")))?;
        headers.insert(COOKIE, value);
    }
    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

/// The browser owns cookies; nothing to configure.
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
fn build_http_client(_config: &Config) -> Result<reqwest::Client, QuireError> {
    Ok(reqwest::Client::new())
}
