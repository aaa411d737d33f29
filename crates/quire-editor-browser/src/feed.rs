//! Feed page: post links, entry likes and the new-post button.
//!
//! Clicks are handled by one delegated listener on the document, so cards
//! added after mounting work without re-wiring.

use std::rc::Rc;

use gloo_events::EventListener;
use quire_common::ids::{author_page_path, entry_page_path, last_segment, new_post_page_path};
use quire_common::LikeActivity;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlElement};

use crate::comments::{LIKE_COUNT_CLASS, entry_like_label, next_like_label};
use crate::dom::{self, DomError, body_data, optional_by_id};
use crate::page::page_client;
use crate::posts::render_posts;

const LIKE_FAILED: &str = "You've liked this post already";

/// What a click on a feed card asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedAction {
    /// Like the entry `post` written by `author`
    Like { author: String, post: String },
    /// Open the entry page
    OpenEntry { author: String, post: String },
    /// Open the author's profile
    OpenAuthor { author: String },
}

struct FeedState {
    document: Document,
    authenticated: bool,
    current_user: Option<String>,
}

/// Keeps the feed's listeners alive.
pub struct FeedHandle {
    listeners: Vec<EventListener>,
}

impl FeedHandle {
    pub fn forget(self) {
        for listener in self.listeners {
            listener.forget();
        }
    }
}

/// Wire up the feed on the current page and render its stored posts.
///
/// Likes, comments and the new-post button need `data-authenticated="1"`;
/// avatar and title links work for everyone.
pub fn mount_feed() -> Result<FeedHandle, DomError> {
    let document = dom::document()?;
    let state = Rc::new(FeedState {
        authenticated: body_data(&document, "authenticated").as_deref() == Some("1"),
        current_user: body_data(&document, "currentUserId").filter(|s| !s.is_empty()),
        document,
    });
    render_posts(&state.document)?;

    let mut listeners = Vec::new();

    if state.authenticated {
        if let Some(button) = optional_by_id::<Element>(&state.document, "new-post-btn") {
            let state = state.clone();
            listeners.push(EventListener::new(&button, "click", move |_| {
                let Some(user) = &state.current_user else {
                    return;
                };
                if let Err(e) = dom::navigate(&new_post_page_path(user)) {
                    tracing::error!(error = %e, "new-post navigation failed");
                }
            }));
        }
    }

    let for_clicks = state.clone();
    listeners.push(EventListener::new(&state.document, "click", move |event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let Some((action, element)) = feed_action(&target, for_clicks.authenticated) else {
            return;
        };
        let state = for_clicks.clone();
        spawn_local(async move {
            if let Err(e) = state.run(action, element).await {
                tracing::error!(error = %e, "feed action failed");
            }
        });
    }));

    tracing::info!(authenticated = state.authenticated, "feed mounted");
    Ok(FeedHandle { listeners })
}

/// The action for a click on `target`, with the element that carries it.
pub fn feed_action(target: &Element, authenticated: bool) -> Option<(FeedAction, HtmlElement)> {
    let closest = |selector: &str| -> Option<HtmlElement> {
        target
            .closest(selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    };
    let post_of = |el: &HtmlElement| {
        let data = el.dataset();
        Some((data.get("authorId")?, data.get("postId")?))
    };

    if authenticated {
        if let Some(el) = closest(".like-btn") {
            let (author, post) = post_of(&el)?;
            let post = post.trim_end_matches('/').to_string();
            return Some((FeedAction::Like { author, post }, el));
        }
        if let Some(el) = closest(".comment-btn") {
            let (author, post) = post_of(&el)?;
            return Some((FeedAction::OpenEntry { author, post }, el));
        }
    }
    if let Some(el) = closest(".post-title-link") {
        let (author, post) = post_of(&el)?;
        return Some((FeedAction::OpenEntry { author, post }, el));
    }
    if let Some(el) = closest(".post-avatar") {
        let author = el.dataset().get("authorId").filter(|s| !s.is_empty())?;
        return Some((FeedAction::OpenAuthor { author }, el));
    }
    None
}

impl FeedState {
    async fn run(&self, action: FeedAction, element: HtmlElement) -> Result<(), DomError> {
        match action {
            FeedAction::Like { author, post } => self.like_entry(&element, &author, post).await,
            FeedAction::OpenEntry { author, post } => {
                dom::navigate(&entry_page_path(&author, &post))
            }
            FeedAction::OpenAuthor { author } => dom::navigate(&author_page_path(&author)),
        }
    }

    /// Like an entry as the signed-in author and bump its count locally.
    async fn like_entry(
        &self,
        button: &HtmlElement,
        entry_author: &str,
        entry: String,
    ) -> Result<(), DomError> {
        let Some(current_user) = self.current_user.as_deref() else {
            return Ok(());
        };
        let client = page_client(&self.document)?;

        let author = match client.fetch_author(last_segment(current_user)).await {
            Ok(author) => author,
            Err(e) => {
                tracing::warn!(error = %e, "author fetch failed");
                return dom::alert("Failed to fetch author info.");
            }
        };
        let like = LikeActivity {
            id: LikeActivity::like_id(current_user, &dom::random_uuid()?),
            author,
            object: entry,
            published: dom::now_iso(),
        };

        match client.send_like(entry_author, like).await {
            Ok(()) => {
                if let Some(label) = button.query_selector(&format!(".{LIKE_COUNT_CLASS}"))? {
                    let text = label.text_content().unwrap_or_default();
                    label.set_text_content(Some(next_like_label(&text, entry_like_label).as_str()));
                }
                Ok(())
            }
            // A repeat like is rejected like any other failure.
            Err(e) => {
                tracing::warn!(error = %e, "like rejected");
                dom::alert(&e.user_message(LIKE_FAILED))
            }
        }
    }
}
