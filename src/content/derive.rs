//! Derived content attributes, recomputed on every read.
//!
//! Nothing here is cached or stored, so derived values can never drift out of
//! sync with the canonical fields they are computed from.

use super::model::ImageDimensions;

/// Number of whitespace-delimited tokens in a text body.
pub fn word_count(body: &str) -> i32 {
    body.split_whitespace().count() as i32
}

/// Aspect ratio as `"W:H"` reduced by the greatest common divisor.
///
/// Both sides are positive by construction, so the GCD is never zero.
pub fn aspect_ratio(dimensions: &ImageDimensions) -> String {
    let divisor = gcd(dimensions.width(), dimensions.height());
    format!(
        "{}:{}",
        dimensions.width() / divisor,
        dimensions.height() / divisor
    )
}

fn gcd(mut a: i32, mut b: i32) -> i32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
