//! Reference parsing for the class/member shorthand used after a prefix.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Reference;

/// `[\]Class[\Path][::[$]member[()]][#hash]`, anchored at both ends.
/// Word characters are ASCII only.
#[allow(clippy::expect_used, reason = "pattern is a compile-time constant")]
static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(
        r"^\\?([A-Za-z0-9_\\]+)(?:::\$?([A-Za-z0-9_]+)(\(\))?)?(?:#([A-Za-z0-9_\-]+))?$",
    )
    .expect("valid regex");
});

/// Parse prefix-stripped link text into a [`Reference`].
/// Returns `None` when the text doesn't follow the shorthand grammar.
///
/// # Panics
///
/// Panics if the hardcoded reference regex is invalid (compile-time invariant).
pub fn parse_reference(stripped: &str) -> Option<Reference> {
    let cap = REFERENCE_PATTERN.captures(stripped)?;

    return Some(Reference {
        class_name: cap.get(1)?.as_str().to_string(),
        hash: cap.get(4).map(|m| return m.as_str().to_string()),
        is_method: cap.get(3).is_some(),
        subject: cap.get(2).map(|m| return m.as_str().to_string()),
    });
}
