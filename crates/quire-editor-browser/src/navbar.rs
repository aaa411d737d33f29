//! Navigation bar: profile menu, logout and author search suggestions.

use std::cell::Cell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use markdown_weaver_escape::escape_html;
use quire_common::{AuthorSuggestion, QuireError};
use quire_common::ids::author_page_path;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Node};

use crate::dom::{self, DomError, body_data, optional_by_id};
use crate::page::page_client;

/// List items for the search dropdown. Each `li` carries the author id.
pub fn suggestions_html(suggestions: &[AuthorSuggestion]) -> String {
    let mut out = String::with_capacity(suggestions.len() * 256);
    for author in suggestions {
        out.push_str(r#"<li data-author-id=""#);
        let _ = escape_html(&mut out, &author.id);
        out.push_str(
            r#""><div class="suggestion-entry"><div class="suggestion-icon">👤</div><div class="suggestion-text"><div class="display-name">"#,
        );
        let _ = escape_html(&mut out, &author.display_name);
        out.push_str(r#"</div><div class="author-id">"#);
        let _ = escape_html(&mut out, &author.id);
        out.push_str("</div></div></div></li>");
    }
    out
}

struct Search {
    input: HtmlInputElement,
    suggestions: HtmlElement,
    /// Bumped per keystroke; answers to older queries are dropped.
    generation: Cell<u64>,
}

/// Keeps the navbar's listeners alive.
pub struct NavbarHandle {
    listeners: Vec<EventListener>,
}

impl NavbarHandle {
    pub fn forget(self) {
        for listener in self.listeners {
            listener.forget();
        }
    }
}

/// Wire up whichever navbar widgets the page has.
pub fn mount_navbar() -> Result<NavbarHandle, DomError> {
    let document = dom::document()?;
    let authenticated = body_data(&document, "authenticated").as_deref() == Some("1");
    let mut listeners = Vec::new();

    if let (Some(toggle), Some(menu)) = (
        optional_by_id::<Element>(&document, "profile-toggle"),
        optional_by_id::<HtmlElement>(&document, "profile-menu"),
    ) {
        let for_toggle = menu.clone();
        listeners.push(EventListener::new(&toggle, "click", move |event| {
            event.stop_propagation();
            let open = for_toggle
                .style()
                .get_property_value("display")
                .is_ok_and(|d| d == "block");
            let _ = dom::set_display(&for_toggle, if open { "none" } else { "block" });
        }));
        listeners.push(EventListener::new(&document, "click", move |_| {
            let _ = dom::set_display(&menu, "none");
        }));
    }

    let logout = optional_by_id::<Element>(&document, "logout-btn").filter(|_| authenticated);
    if let Some(logout) = logout {
        let document = document.clone();
        listeners.push(EventListener::new_with_options(
            &logout,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                event.stop_propagation();
                let document = document.clone();
                spawn_local(async move {
                    if let Err(e) = log_out(&document).await {
                        tracing::error!(error = %e, "logout handler failed");
                    }
                });
            },
        ));
    }

    if let (Some(input), Some(suggestions)) = (
        optional_by_id::<HtmlInputElement>(&document, "author-search-input"),
        optional_by_id::<HtmlElement>(&document, "search-suggestions"),
    ) {
        let search = Rc::new(Search {
            input,
            suggestions,
            generation: Cell::new(0),
        });
        wire_search(&document, &search, &mut listeners);
    }

    tracing::info!(listeners = listeners.len(), "navbar mounted");
    Ok(NavbarHandle { listeners })
}

async fn log_out(document: &Document) -> Result<(), DomError> {
    let client = page_client(document)?;
    match client.logout().await {
        Ok(()) => dom::navigate("/"),
        Err(e) => {
            tracing::warn!(error = %e, "logout failed");
            dom::alert("Logout failed")
        }
    }
}

fn wire_search(document: &Document, search: &Rc<Search>, listeners: &mut Vec<EventListener>) {
    // Opening the search box refreshes remote authors in the background.
    let for_sync = document.clone();
    listeners.push(EventListener::new(&search.input, "click", move |_| {
        let document = for_sync.clone();
        spawn_local(async move {
            let result = async {
                let client = page_client(&document)?;
                client.sync_remote_authors().await?;
                Ok::<_, QuireError>(())
            }
            .await;
            if let Err(e) = result {
                tracing::debug!(error = %e, "remote author sync failed");
            }
        });
    }));

    let for_input = (document.clone(), search.clone());
    listeners.push(EventListener::new(&search.input, "input", move |_| {
        let (document, search) = for_input.clone();
        spawn_local(async move {
            search.suggest(&document).await;
        });
    }));

    let for_pick = search.clone();
    listeners.push(EventListener::new(&search.suggestions, "click", move |event| {
        let Some(item) = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("li[data-author-id]").ok().flatten())
        else {
            return;
        };
        let Some(id) = item.get_attribute("data-author-id") else {
            return;
        };
        let _ = dom::set_display(&for_pick.suggestions, "none");
        if let Err(e) = dom::navigate(&author_page_path(&id)) {
            tracing::error!(error = %e, "author navigation failed");
        }
    }));

    let for_outside = search.clone();
    listeners.push(EventListener::new(document, "click", move |event| {
        let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
        let inside = target.as_ref().is_some_and(|node| {
            for_outside.suggestions.contains(Some(node))
                || for_outside.input.is_same_node(Some(node))
        });
        if !inside {
            let _ = dom::set_display(&for_outside.suggestions, "none");
        }
    }));
}

impl Search {
    async fn suggest(&self, document: &Document) {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let query = self.input.value();
        let query = query.trim();
        if query.is_empty() {
            let _ = dom::set_display(&self.suggestions, "none");
            return;
        }

        let result = async {
            let client = page_client(document)?;
            Ok::<_, QuireError>(client.author_autocomplete(query).await?)
        }
        .await;
        if self.generation.get() != generation {
            return;
        }
        match result {
            Ok(found) => {
                self.suggestions.set_inner_html(&suggestions_html(&found));
                let display = if found.is_empty() { "none" } else { "block" };
                let _ = dom::set_display(&self.suggestions, display);
            }
            Err(e) => {
                tracing::warn!(error = %e, "author autocomplete failed");
                let _ = dom::set_display(&self.suggestions, "none");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(id: &str, name: &str) -> AuthorSuggestion {
        AuthorSuggestion {
            id: id.to_string(),
            display_name: name.to_string(),
        }
    }

    #[test]
    fn test_suggestions_html_escapes() {
        let html = suggestions_html(&[suggestion("http://node/api/authors/1/", "<b>Ada</b>")]);
        assert!(html.starts_with(r#"<li data-author-id="http://node/api/authors/1/">"#));
        assert!(html.contains("&lt;b&gt;Ada&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_suggestions_html_one_item_each() {
        let html = suggestions_html(&[suggestion("1", "A"), suggestion("2", "B")]);
        assert_eq!(html.matches("<li ").count(), 2);
        assert_eq!(suggestions_html(&[]), "");
    }
}
