//! WASM browser tests for the JS bindings.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use quire_editor_js::{JsEditor, JsInitialEntry, render_markdown};

#[wasm_bindgen_test]
fn test_render_markdown() {
    assert!(render_markdown("*x*").contains("<em>x</em>"));
    assert_eq!(render_markdown(""), "");
}

#[wasm_bindgen_test]
fn test_markdown_session() {
    let mut ed = JsEditor::new();
    ed.set_content_type("text/markdown");
    ed.on_text_changed("hello");
    assert!(ed.insert_image_link("http://x/y.png", Some("cat".into())));
    assert_eq!(ed.text(), "hello\n\n![cat](http://x/y.png)");

    let view = ed.get_view();
    assert_eq!(view.mode, "markdown");
    assert!(view.show_preview_pane && view.show_insert_image_link);
    assert!(!view.show_choose_file);

    ed.set_title("  T ");
    ed.set_visibility("unlisted");
    let payload = ed.build_payload().ok().unwrap();
    assert_eq!(payload.title, "T");
    assert_eq!(payload.visibility, "UNLISTED");
    assert_eq!(payload.content_type, "text/markdown");
}

#[wasm_bindgen_test]
fn test_image_session() {
    let mut ed = JsEditor::new();
    ed.set_content_type("image");
    assert!(ed.build_payload().is_err());
    assert!(!ed.attach_image(None, "image/png"));
    assert!(ed.attach_image(Some(b"\x89PNG".to_vec()), "image/png"));

    let payload = ed.build_payload().ok().unwrap();
    assert_eq!(payload.content_type, "image/png;base64");
    assert_eq!(payload.content, "iVBORw==");
    assert!(ed.preview_html().contains("data:image/png;base64,iVBORw=="));
}

#[wasm_bindgen_test]
fn test_from_initial_markdown() {
    let ed = JsEditor::from_initial(JsInitialEntry {
        title: "Old".into(),
        content_type: "text/markdown".into(),
        content: "# old".into(),
        ..Default::default()
    });
    assert_eq!(ed.content_type(), "text/markdown");
    assert!(ed.preview_html().contains("old</h1>"));
}
