//! The post content model.
//!
//! `ContentVariant` is the closed set of content kinds a post can hold. It is
//! the single registry of variants: encoding, decoding, validation and
//! derived-field computation all match on it exhaustively, so adding a kind
//! here forces every call site to handle it.

use async_graphql::Enum;

use super::error::{ContentError, FieldError};

/// Discriminator names for the content kinds, as stored in the serialized
/// payload's `"type"` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Image,
    Link,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::Link => "link",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(ContentKind::Text),
            "image" => Some(ContentKind::Image),
            "link" => Some(ContentKind::Link),
            _ => None,
        }
    }
}

/// Rendering format of a text body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Enum)]
pub enum TextFormat {
    Markdown,
    #[default]
    Plain,
}

impl TextFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            TextFormat::Markdown => "markdown",
            TextFormat::Plain => "plain",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "markdown" => Some(TextFormat::Markdown),
            "plain" => Some(TextFormat::Plain),
            _ => None,
        }
    }
}

/// Pixel dimensions of an image. Construction guarantees both sides are
/// positive, so downstream math (aspect ratio reduction) never sees zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    width: i32,
    height: i32,
}

impl ImageDimensions {
    pub fn new(width: i32, height: i32) -> Result<Self, ContentError> {
        let mut errors = Vec::new();
        if width <= 0 {
            errors.push(FieldError::new(
                "dimensions.width",
                "must be greater than zero",
            ));
        }
        if height <= 0 {
            errors.push(FieldError::new(
                "dimensions.height",
                "must be greater than zero",
            ));
        }
        if errors.is_empty() {
            Ok(Self { width, height })
        } else {
            Err(ContentError::validation(errors))
        }
    }

    pub fn width(self) -> i32 {
        self.width
    }

    pub fn height(self) -> i32 {
        self.height
    }
}

/// One validated content value. Immutable once constructed; a post's content
/// is replaced wholesale, never edited field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentVariant {
    Text {
        body: String,
        format: TextFormat,
    },
    Image {
        url: String,
        caption: Option<String>,
        dimensions: Option<ImageDimensions>,
    },
    Link {
        url: String,
        title: String,
        description: Option<String>,
    },
}

impl ContentVariant {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentVariant::Text { .. } => ContentKind::Text,
            ContentVariant::Image { .. } => ContentKind::Image,
            ContentVariant::Link { .. } => ContentKind::Link,
        }
    }
}
