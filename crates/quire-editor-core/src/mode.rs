//! Authoring modes and the pane layout each one implies.

/// Selector value for plain text.
pub const PLAIN_TEXT: &str = "text/plain";
/// Selector value for Markdown.
pub const MARKDOWN: &str = "text/markdown";
/// Selector value for a single image. UI-only, never sent on the wire.
pub const IMAGE: &str = "image";

/// Which authoring mode the content-type selector puts the editor in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EditorMode {
    #[default]
    Plain,
    Markdown,
    Image,
}

impl EditorMode {
    /// Parse a selector value. Anything unrecognized behaves as plain text.
    pub fn from_selector(value: &str) -> Self {
        match value {
            MARKDOWN => EditorMode::Markdown,
            IMAGE => EditorMode::Image,
            _ => EditorMode::Plain,
        }
    }

    /// Canonical selector value for this mode.
    pub fn selector(self) -> &'static str {
        match self {
            EditorMode::Plain => PLAIN_TEXT,
            EditorMode::Markdown => MARKDOWN,
            EditorMode::Image => IMAGE,
        }
    }

    pub fn layout(self) -> PaneLayout {
        match self {
            EditorMode::Plain => PaneLayout {
                edit_pane: true,
                preview_pane: false,
                choose_file: false,
                insert_image_link: false,
            },
            EditorMode::Markdown => PaneLayout {
                edit_pane: true,
                preview_pane: true,
                choose_file: false,
                insert_image_link: true,
            },
            EditorMode::Image => PaneLayout {
                edit_pane: false,
                preview_pane: true,
                choose_file: true,
                insert_image_link: false,
            },
        }
    }
}

/// Visibility of the editor's panes and mode-specific affordances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaneLayout {
    pub edit_pane: bool,
    pub preview_pane: bool,
    /// "Choose file" button, image mode only
    pub choose_file: bool,
    /// "Insert image" button, Markdown only
    pub insert_image_link: bool,
}
