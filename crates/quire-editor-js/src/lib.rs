//! WASM bindings for the quire post editor and entry pages.
//!
//! Pages call one mount function after load; everything else is wired from
//! Rust. `JsEditor` is there for hosts that draw their own editor UI.

mod editor;
mod types;

pub use editor::*;
pub use types::*;

use quire_editor_browser::{
    EditorPage, dom, mount_editor, mount_entry_detail, mount_feed, mount_navbar, relationships,
};
use wasm_bindgen::prelude::*;
use web_sys::HtmlButtonElement;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let _ = set_global_default(Registry::default().with(wasm_layer));
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Wire the new-post page.
#[wasm_bindgen(js_name = mountNewPost)]
pub fn mount_new_post() -> Result<(), JsError> {
    mount_editor(EditorPage::New).map_err(js_error)?.forget();
    Ok(())
}

/// Wire the edit-post page.
#[wasm_bindgen(js_name = mountEditPost)]
pub fn mount_edit_post() -> Result<(), JsError> {
    mount_editor(EditorPage::Edit).map_err(js_error)?.forget();
    Ok(())
}

/// Wire the entry detail page and load its comments.
#[wasm_bindgen(js_name = mountEntryDetail)]
pub fn mount_entry_detail_page() -> Result<(), JsError> {
    mount_entry_detail().map_err(js_error)?.forget();
    Ok(())
}

/// Wire the feed page and render its posts.
#[wasm_bindgen(js_name = mountFeed)]
pub fn mount_feed_page() -> Result<(), JsError> {
    mount_feed().map_err(js_error)?.forget();
    Ok(())
}

/// Wire the navigation bar present on every page.
#[wasm_bindgen(js_name = mountNavbar)]
pub fn mount_navbar_widgets() -> Result<(), JsError> {
    mount_navbar().map_err(js_error)?.forget();
    Ok(())
}

/// Render every `[data-contenttype]` element on the page. Returns the count.
#[wasm_bindgen(js_name = renderPosts)]
pub fn render_posts() -> Result<usize, JsError> {
    let document = dom::document().map_err(js_error)?;
    quire_editor_browser::render_posts(&document).map_err(js_error)
}

/// Markdown to HTML with the same renderer as the editor preview.
#[wasm_bindgen(js_name = renderMarkdown)]
pub fn render_markdown(text: &str) -> String {
    quire_editor_core::render_markdown(text)
}

#[wasm_bindgen(js_name = sendFollowRequest)]
pub async fn send_follow_request(
    button: HtmlButtonElement,
    from_id: String,
    to_id: String,
) -> Result<(), JsError> {
    relationships::send_follow_request(&button, &from_id, &to_id)
        .await
        .map_err(js_error)
}

/// Resolves to whether the server accepted the change.
#[wasm_bindgen(js_name = acceptFollow)]
pub async fn accept_follow(from_id: String, current_user_id: String) -> Result<bool, JsError> {
    relationships::accept_follow(&from_id, &current_user_id)
        .await
        .map_err(js_error)
}

#[wasm_bindgen(js_name = removeFollow)]
pub async fn remove_follow(from_id: String, to_id: String) -> Result<bool, JsError> {
    relationships::remove_follow(&from_id, &to_id)
        .await
        .map_err(js_error)
}

#[wasm_bindgen]
pub async fn unfriend(a: String, b: String) -> Result<bool, JsError> {
    relationships::unfriend(&a, &b).await.map_err(js_error)
}
