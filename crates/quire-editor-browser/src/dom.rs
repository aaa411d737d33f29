//! Thin wrappers over the handful of DOM calls the page controllers make.

use quire_common::QuireError;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
    Window,
};

/// Error type for DOM lookups and calls.
#[derive(Debug, Clone)]
pub struct DomError(pub String);

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for DomError {}

impl From<&str> for DomError {
    fn from(s: &str) -> Self {
        DomError(s.to_string())
    }
}

impl From<String> for DomError {
    fn from(s: String) -> Self {
        DomError(s)
    }
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(s) => DomError(s),
            None => DomError(format!("{:?}", value)),
        }
    }
}

impl From<DomError> for QuireError {
    fn from(err: DomError) -> Self {
        QuireError::Config(format!("page error: {}", err.0))
    }
}

pub fn window() -> Result<Window, DomError> {
    Ok(web_sys::window().ok_or("no window")?)
}

pub fn document() -> Result<Document, DomError> {
    Ok(window()?.document().ok_or("no document")?)
}

/// Required element by id, cast to `T`.
pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, DomError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| format!("element not found: #{id}"))?
        .dyn_into::<T>()
        .map_err(|_| format!("#{id} has an unexpected element type").into())
}

/// Element by id if it exists and has the expected type.
pub fn optional_by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// Required element by CSS selector, cast to `T`.
pub fn query<T: JsCast>(document: &Document, selector: &str) -> Result<T, DomError> {
    document
        .query_selector(selector)?
        .ok_or_else(|| format!("element not found: {selector}"))?
        .dyn_into::<T>()
        .map_err(|_| format!("{selector} has an unexpected element type").into())
}

/// Show with the stylesheet's own display value, or hide.
pub fn set_shown(element: &HtmlElement, shown: bool) -> Result<(), DomError> {
    element
        .style()
        .set_property("display", if shown { "" } else { "none" })?;
    Ok(())
}

/// Show as a specific display value (`block`, `inline-block`, ...).
pub fn set_display(element: &HtmlElement, display: &str) -> Result<(), DomError> {
    element.style().set_property("display", display)?;
    Ok(())
}

/// Current value of a form control; `None` for anything else.
pub fn form_value(element: &Element) -> Option<String> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        Some(input.value())
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        Some(area.value())
    } else {
        element.dyn_ref::<HtmlSelectElement>().map(|s| s.value())
    }
}

/// Value of the checked radio in a group.
pub fn checked_radio_value(document: &Document, name: &str) -> Option<String> {
    let selector = format!(r#"input[name="{name}"]:checked"#);
    let input = document.query_selector(&selector).ok()??;
    form_value(&input)
}

/// `data-*` value from `<body>`, with the camelCase key the dataset uses.
pub fn body_data(document: &Document, key: &str) -> Option<String> {
    document.body()?.dataset().get(key)
}

pub fn alert(message: &str) -> Result<(), DomError> {
    window()?.alert_with_message(message)?;
    Ok(())
}

pub fn confirm(message: &str) -> Result<bool, DomError> {
    Ok(window()?.confirm_with_message(message)?)
}

/// `None` when the user cancels the prompt.
pub fn prompt(message: &str, default: &str) -> Result<Option<String>, DomError> {
    Ok(window()?.prompt_with_message_and_default(message, default)?)
}

pub fn navigate(path: &str) -> Result<(), DomError> {
    tracing::debug!(path, "navigating");
    window()?.location().set_href(path)?;
    Ok(())
}

pub fn history_back() -> Result<(), DomError> {
    window()?.history()?.back()?;
    Ok(())
}

/// Fresh random UUID from `crypto.randomUUID()`.
pub fn random_uuid() -> Result<String, DomError> {
    Ok(window()?.crypto()?.random_uuid())
}

/// Current time as an RFC 3339 string.
pub fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

/// Locale rendering of an RFC 3339 timestamp, as the browser would show it.
pub fn locale_datetime(iso: &str) -> String {
    js_sys::Date::new(&JsValue::from_str(iso))
        .to_locale_string("default", &JsValue::UNDEFINED)
        .into()
}
