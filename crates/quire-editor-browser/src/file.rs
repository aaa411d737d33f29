//! Reading user-chosen files.

use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement};

use crate::dom::DomError;

/// First file selected in a file input, if any.
pub fn selected_file(input: &HtmlInputElement) -> Option<File> {
    input.files()?.get(0)
}

/// Whole file contents via `Blob.arrayBuffer()`.
pub async fn read_file_bytes(file: &File) -> Result<Vec<u8>, DomError> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    tracing::debug!(name = %file.name(), len = bytes.len(), "file read");
    Ok(bytes)
}
