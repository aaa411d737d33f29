//! The post draft: everything the user has entered, owned by one editor.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::mode::{self, EditorMode};

/// Wire content type for images whose format could not be pinned down.
pub const BASE64_FALLBACK: &str = "application/base64";

/// Entry visibility.
///
/// The server decides what values are valid; the client only normalizes
/// case. Unknown values are carried through upper-cased.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Friends,
    Unlisted,
    Other(String),
}

impl Visibility {
    /// Case-insensitive parse of a radio/select value.
    pub fn parse(value: &str) -> Self {
        let upper = value.trim().to_uppercase();
        match upper.as_str() {
            "PUBLIC" => Visibility::Public,
            "FRIENDS" => Visibility::Friends,
            "UNLISTED" => Visibility::Unlisted,
            _ => Visibility::Other(upper),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Friends => "FRIENDS",
            Visibility::Unlisted => "UNLISTED",
            Visibility::Other(s) => s,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MIME classification of an attached image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageMime {
    Png,
    Jpeg,
    /// Anything other than PNG or JPEG
    Base64Fallback,
}

impl ImageMime {
    /// Classify a declared MIME type. Only exact `image/png` and `image/jpeg` are recognized.
    pub fn classify(declared: &str) -> Self {
        match declared {
            "image/png" => ImageMime::Png,
            "image/jpeg" => ImageMime::Jpeg,
            _ => ImageMime::Base64Fallback,
        }
    }

    /// Classify a stored wire content type such as `image/png;base64`.
    pub fn from_wire(content_type: &str) -> Self {
        Self::classify(content_type.strip_suffix(";base64").unwrap_or(content_type))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Base64Fallback => BASE64_FALLBACK,
        }
    }

    /// Content type sent to the server for an image in this format.
    pub fn wire_content_type(self) -> String {
        match self {
            ImageMime::Base64Fallback => BASE64_FALLBACK.to_string(),
            mime => format!("{};base64", mime.as_str()),
        }
    }
}

/// A base64-encoded image and its classified MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePayload {
    pub base64: String,
    pub mime: ImageMime,
}

impl ImagePayload {
    pub fn from_bytes(bytes: &[u8], declared_mime: &str) -> Self {
        Self {
            base64: STANDARD.encode(bytes),
            mime: ImageMime::classify(declared_mime),
        }
    }

    /// `data:` URL for inline display.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime.as_str(), self.base64)
    }
}

/// Server-rendered values used to hydrate the edit page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitialEntry {
    pub title: String,
    pub description: String,
    pub visibility: String,
    /// Stored wire content type, e.g. `text/markdown` or `image/png;base64`
    pub content_type: String,
    pub content: String,
    /// Explicit image MIME, when the page provides one
    pub mime: Option<String>,
}

impl InitialEntry {
    /// Whether the stored content is an image rather than text.
    pub fn is_image(&self) -> bool {
        let ct = self.content_type.as_str();
        ct == mode::IMAGE || ct == BASE64_FALLBACK || ct.starts_with("image/")
    }
}

/// In-progress state of an entry being composed or edited.
///
/// At most one of `body` and `image` carries content; the editor clears the
/// other whenever the mode changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    /// Raw selector value; `image` selects image mode
    pub content_type: String,
    pub body: String,
    pub image: Option<ImagePayload>,
}

impl PostDraft {
    /// Empty draft for a new post.
    pub fn new() -> Self {
        Self {
            content_type: mode::PLAIN_TEXT.to_string(),
            ..Default::default()
        }
    }

    /// Draft for editing an existing entry.
    pub fn hydrate(initial: InitialEntry) -> Self {
        let is_image = initial.is_image();
        let InitialEntry {
            title,
            description,
            visibility,
            content_type,
            content,
            mime,
        } = initial;

        let mut draft = Self {
            title,
            description,
            visibility: Visibility::parse(&visibility),
            ..Self::new()
        };

        if is_image {
            draft.content_type = mode::IMAGE.to_string();
            if !content.is_empty() {
                let mime = match mime.as_deref().filter(|m| !m.is_empty()) {
                    Some(explicit) => ImageMime::classify(explicit),
                    None => ImageMime::from_wire(&content_type),
                };
                draft.image = Some(ImagePayload {
                    base64: content,
                    mime,
                });
            }
        } else {
            if !content_type.is_empty() {
                draft.content_type = content_type;
            }
            draft.body = content;
        }
        draft
    }

    pub fn mode(&self) -> EditorMode {
        EditorMode::from_selector(&self.content_type)
    }
}
