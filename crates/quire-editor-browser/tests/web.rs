//! WASM browser tests for quire-editor-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use quire_editor_browser::feed::{FeedAction, feed_action};
use quire_editor_browser::{
    EditorElements, EditorMode, EditorPage, PageContext, SubmitError, apply_view, csrf_token,
    mount_editor, render_posts,
};
use quire_editor_core::EditorController;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

const EDITOR_HTML: &str = r#"
<meta name="csrf-token" content="tok123">
<input id="title" value="  Hello  ">
<textarea id="description"></textarea>
<input type="radio" name="visibility" value="friends" checked>
<select id="contentType">
  <option value="text/plain">Plain</option>
  <option value="text/markdown">Markdown</option>
  <option value="image">Image</option>
</select>
<div class="editor-container">
  <div><textarea id="content"></textarea></div>
  <div><div id="preview"></div></div>
</div>
<input type="file" id="image">
<button id="uploadImageBtn">Choose file</button>
<button id="insertImageBtn">Insert image</button>
<button class="post-btn">Post</button>
<button class="cancel-btn">Cancel</button>
"#;

const BODY_DATA: &[&str] = &[
    "data-author-id",
    "data-entry-id",
    "data-initial-content-type",
    "data-initial-content",
    "data-initial-mime",
];

/// Page fixture; removed again on drop.
struct Fixture {
    document: Document,
    root: Element,
}

impl Fixture {
    fn new(data: &[(&str, &str)]) -> Self {
        let document = web_sys::window().unwrap().document().unwrap();
        let body = document.body().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(EDITOR_HTML);
        body.append_child(&root).unwrap();
        for (name, value) in data {
            body.set_attribute(name, value).unwrap();
        }
        Self { document, root }
    }

    fn by_id<T: JsCast>(&self, id: &str) -> T {
        self.document
            .get_element_by_id(id)
            .unwrap()
            .dyn_into::<T>()
            .unwrap()
    }

    fn display(&self, id: &str) -> String {
        self.by_id::<HtmlElement>(id)
            .style()
            .get_property_value("display")
            .unwrap()
    }

    fn preview_box_display(&self) -> String {
        let container = self
            .document
            .query_selector(".editor-container")
            .unwrap()
            .unwrap();
        container
            .last_element_child()
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap()
            .style()
            .get_property_value("display")
            .unwrap()
    }

    fn post_button(&self) -> HtmlButtonElement {
        self.document
            .query_selector(".post-btn")
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap()
    }

    fn fire(&self, id: &str, event: &str) {
        let target: Element = self.by_id(id);
        target.dispatch_event(&Event::new(event).unwrap()).unwrap();
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.root.remove();
        if let Some(body) = self.document.body() {
            for name in BODY_DATA {
                let _ = body.remove_attribute(name);
            }
        }
    }
}

// === Page data ===

#[wasm_bindgen_test]
fn test_csrf_token_from_meta() {
    let fx = Fixture::new(&[]);
    assert_eq!(csrf_token(&fx.document).as_deref(), Some("tok123"));
}

#[wasm_bindgen_test]
fn test_page_context_reads_body_data() {
    let fx = Fixture::new(&[
        ("data-author-id", "http://node/api/authors/42/"),
        ("data-entry-id", "http://node/api/authors/42/entries/7"),
    ]);
    let ctx = PageContext::from_document(&fx.document).unwrap();
    assert_eq!(ctx.author().unwrap(), "http://node/api/authors/42/");
    assert_eq!(ctx.entry().unwrap(), "http://node/api/authors/42/entries/7");
    assert!(ctx.current_user().is_err());
}

// === Element lookup and rendering ===

#[wasm_bindgen_test]
fn test_locate_finds_all_elements() {
    let fx = Fixture::new(&[]);
    let elements = EditorElements::locate(&fx.document).unwrap();
    assert_eq!(elements.title_value(), "  Hello  ");
    assert_eq!(
        elements.visibility_value(&fx.document).as_deref(),
        Some("friends")
    );
}

#[wasm_bindgen_test]
fn test_locate_reports_missing_element() {
    let fx = Fixture::new(&[]);
    fx.by_id::<Element>("insertImageBtn").remove();
    assert!(EditorElements::locate(&fx.document).is_err());
}

#[wasm_bindgen_test]
fn test_apply_view_markdown_layout() {
    let fx = Fixture::new(&[]);
    let elements = EditorElements::locate(&fx.document).unwrap();
    let mut editor = EditorController::new();
    editor.set_content_type("text/markdown");
    editor.on_text_changed("*hi*");

    apply_view(&elements, &editor.view()).unwrap();

    assert_eq!(fx.display("uploadImageBtn"), "none");
    assert_eq!(fx.display("insertImageBtn"), "");
    assert_eq!(fx.preview_box_display(), "");
    assert!(fx.by_id::<Element>("preview").inner_html().contains("<em>hi</em>"));
    assert_eq!(fx.by_id::<HtmlTextAreaElement>("content").value(), "*hi*");
    assert_eq!(
        fx.by_id::<HtmlSelectElement>("contentType").value(),
        "text/markdown"
    );
}

// === Mounted editor ===

#[wasm_bindgen_test]
fn test_new_post_follows_selector_and_typing() {
    let fx = Fixture::new(&[("data-author-id", "42")]);
    let handle = mount_editor(EditorPage::New).unwrap();
    assert_eq!(handle.mode(), EditorMode::Plain);
    assert_eq!(fx.preview_box_display(), "none");

    fx.by_id::<HtmlSelectElement>("contentType")
        .set_value("text/markdown");
    fx.fire("contentType", "change");
    assert_eq!(handle.mode(), EditorMode::Markdown);
    assert_eq!(fx.preview_box_display(), "");

    fx.by_id::<HtmlTextAreaElement>("content").set_value("# Hi");
    fx.fire("content", "input");
    assert_eq!(handle.draft().body, "# Hi");
    assert!(fx.by_id::<Element>("preview").inner_html().contains("<h1"));

    fx.by_id::<HtmlSelectElement>("contentType").set_value("image");
    fx.fire("contentType", "change");
    assert_eq!(handle.mode(), EditorMode::Image);
    assert_eq!(fx.by_id::<HtmlTextAreaElement>("content").value(), "");
    assert_eq!(fx.by_id::<Element>("preview").inner_html(), "");
    assert_eq!(fx.display("uploadImageBtn"), "");
}

#[wasm_bindgen_test]
fn test_typing_is_ignored_in_image_mode() {
    let fx = Fixture::new(&[("data-author-id", "42")]);
    let handle = mount_editor(EditorPage::New).unwrap();
    fx.by_id::<HtmlSelectElement>("contentType").set_value("image");
    fx.fire("contentType", "change");

    fx.by_id::<HtmlTextAreaElement>("content").set_value("stray");
    fx.fire("content", "input");
    assert!(handle.draft().body.is_empty());
}

#[wasm_bindgen_test]
fn test_edit_page_hydrates_image_entry() {
    let fx = Fixture::new(&[
        ("data-author-id", "42"),
        ("data-entry-id", "http://node/api/authors/42/entries/7"),
        ("data-initial-content-type", "image/png;base64"),
        ("data-initial-content", "AAAA"),
    ]);
    let handle = mount_editor(EditorPage::Edit).unwrap();

    assert_eq!(handle.mode(), EditorMode::Image);
    assert_eq!(
        fx.by_id::<HtmlSelectElement>("contentType").value(),
        "image"
    );
    assert!(
        fx.by_id::<Element>("preview")
            .inner_html()
            .contains("data:image/png;base64,AAAA")
    );
    assert_eq!(handle.draft().title, "  Hello  ");
}

#[wasm_bindgen_test]
fn test_edit_page_keeps_prefilled_text() {
    let fx = Fixture::new(&[
        ("data-author-id", "42"),
        ("data-entry-id", "http://node/api/authors/42/entries/7"),
        ("data-initial-content-type", "text/markdown"),
    ]);
    fx.by_id::<HtmlTextAreaElement>("content")
        .set_value("# Kept");
    let handle = mount_editor(EditorPage::Edit).unwrap();

    assert_eq!(handle.mode(), EditorMode::Markdown);
    assert_eq!(handle.draft().body, "# Kept");
    assert_eq!(fx.by_id::<HtmlTextAreaElement>("content").value(), "# Kept");
    assert!(fx.by_id::<Element>("preview").inner_html().contains("Kept</h1>"));
}

#[wasm_bindgen_test]
fn test_edit_page_prefers_initial_content() {
    let fx = Fixture::new(&[
        ("data-author-id", "42"),
        ("data-entry-id", "7"),
        ("data-initial-content-type", "text/plain"),
        ("data-initial-content", "stored"),
    ]);
    fx.by_id::<HtmlTextAreaElement>("content").set_value("stale");
    let handle = mount_editor(EditorPage::Edit).unwrap();

    assert_eq!(handle.mode(), EditorMode::Plain);
    assert_eq!(handle.draft().body, "stored");
    assert_eq!(fx.by_id::<HtmlTextAreaElement>("content").value(), "stored");
}

#[wasm_bindgen_test]
fn test_edit_page_requires_entry_id() {
    let _fx = Fixture::new(&[("data-author-id", "42")]);
    assert!(mount_editor(EditorPage::Edit).is_err());
}

// === Submission ===

/// Let queued tasks run up to their first real await.
async fn yield_to_tasks() {
    for _ in 0..3 {
        JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL))
            .await
            .unwrap();
    }
}

#[wasm_bindgen_test]
async fn test_submit_without_image_reenables_button() {
    let fx = Fixture::new(&[("data-author-id", "42")]);
    let handle = mount_editor(EditorPage::New).unwrap();
    fx.by_id::<HtmlSelectElement>("contentType").set_value("image");
    fx.fire("contentType", "change");
    let before = handle.draft();

    let err = handle.submit().await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.user_message("fallback"), "Please choose an image.");

    assert!(!fx.post_button().disabled());
    assert!(!handle.is_submitting());
    let after = handle.draft();
    assert_eq!(after.content_type, before.content_type);
    assert_eq!(after.body, before.body);
    assert_eq!(after.image, None);
}

#[wasm_bindgen_test]
async fn test_post_button_disabled_while_in_flight() {
    let fx = Fixture::new(&[("data-author-id", "42")]);
    let handle = mount_editor(EditorPage::New).unwrap();
    fx.by_id::<HtmlTextAreaElement>("content").set_value("hello");
    fx.fire("content", "input");

    let first = handle.submit();
    spawn_local(async move {
        let _ = first.await;
    });
    yield_to_tasks().await;

    assert!(handle.is_submitting());
    assert!(fx.post_button().disabled());
    assert!(matches!(
        handle.submit().await,
        Err(SubmitError::AlreadyInFlight)
    ));
    assert!(fx.post_button().disabled());
}

// === Feed ===

const FEED_HTML: &str = r#"
<div class="post-card">
  <div class="post-avatar" data-author-id="http://node/api/authors/7/"><img id="avatar-img"></div>
  <div id="md" data-contenttype="text/markdown" data-content="*hi*"></div>
  <div id="plain" data-contenttype="text/plain" data-content="<b>raw</b>"></div>
  <div id="img" data-contenttype="image/png;base64" data-content="AAAA">stale</div>
  <button class="like-btn" data-author-id="7" data-post-id="http://node/api/authors/7/entries/9/">
    <span id="like-icon">❤️</span><span class="like-count">0 Likes</span>
  </button>
</div>
"#;

fn feed_fixture() -> (Document, Element) {
    let document = web_sys::window().unwrap().document().unwrap();
    let root = document.create_element("div").unwrap();
    root.set_inner_html(FEED_HTML);
    document.body().unwrap().append_child(&root).unwrap();
    (document, root)
}

#[wasm_bindgen_test]
fn test_render_posts_by_content_type() {
    let (document, root) = feed_fixture();
    assert_eq!(render_posts(&document).unwrap(), 3);

    let el = |id: &str| document.get_element_by_id(id).unwrap();
    assert!(el("md").inner_html().contains("<em>hi</em>"));
    assert_eq!(el("plain").text_content().unwrap(), "<b>raw</b>");
    assert_eq!(el("plain").child_element_count(), 0);
    assert_eq!(el("img").text_content().unwrap(), "");
    root.remove();
}

#[wasm_bindgen_test]
fn test_feed_click_targets() {
    let (document, root) = feed_fixture();
    let icon = document.get_element_by_id("like-icon").unwrap();

    let (action, _) = feed_action(&icon, true).unwrap();
    assert_eq!(
        action,
        FeedAction::Like {
            author: "7".into(),
            post: "http://node/api/authors/7/entries/9".into(),
        }
    );
    assert!(feed_action(&icon, false).is_none());

    let avatar = document.get_element_by_id("avatar-img").unwrap();
    let (action, _) = feed_action(&avatar, false).unwrap();
    assert_eq!(
        action,
        FeedAction::OpenAuthor {
            author: "http://node/api/authors/7/".into()
        }
    );
    root.remove();
}
