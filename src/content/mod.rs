//! Post content subsystem.
//!
//! A post's content is a tagged union of text, image and link payloads. This
//! module owns the whole lifecycle of such a value: validation of untyped
//! input, the serialized storage form, and the read-time derived attributes.
//! Everything here is pure and stateless; callers may use it from any number
//! of tasks without coordination.

pub mod codec;
pub mod derive;
mod error;
mod model;
pub mod validate;

pub use error::{ContentError, FieldError, FieldErrors};
pub use model::{ContentKind, ContentVariant, ImageDimensions, TextFormat};
