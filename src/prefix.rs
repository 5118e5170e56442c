//! Prefix extraction: split `<prefix>:<rest>` links and match the prefix
//! against the registry.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::config::PrefixRegistry;
use crate::types::PrefixMatch;

/// Bare, unversioned prefixes from older docs. They never resolve; every
/// occurrence is reported so authors can switch to a versioned prefix.
const LEGACY_PREFIXES: [&str; 2] = ["api", "config"];

/// Text before the first `:`, or `None` when the link has no colon.
fn candidate_prefix(link: &str) -> Option<&str> {
    return link.split_once(':').map(|(prefix, _)| return prefix);
}

/// Percent-decode a link. Falls back to the raw text when the decoded
/// bytes are not valid UTF-8.
pub fn decode_link(link: &str) -> Cow<'_, str> {
    return percent_decode_str(link).decode_utf8().unwrap_or(Cow::Borrowed(link));
}

/// Decode a raw `href` and find its registered prefix.
///
/// Returns `None` when the link has no colon or the text before it is not a
/// registered key. The legacy `api` and `config` prefixes log a warning on
/// the way; they never affect the result.
pub fn extract_prefix<'r>(link: &str, registry: &'r PrefixRegistry) -> Option<PrefixMatch<'r>> {
    let decoded = decode_link(link);
    let candidate = candidate_prefix(&decoded)?;

    if LEGACY_PREFIXES.contains(&candidate) {
        tracing::warn!("broken legacy '{candidate}' link: \"{decoded}\"");
    }

    let (prefix, rule) = registry.get_key_value(candidate)?;
    return Some(PrefixMatch {
        decoded: decoded.into_owned(),
        prefix,
        rule,
    });
}

/// Remove the leading `<prefix>:` from a link (`foo:bar` → `bar`).
/// Links without a colon come back unchanged.
pub fn remove_prefix(link: &str) -> String {
    return match link.split_once(':') {
        None => link.to_string(),
        Some((_, rest)) => rest.to_string(),
    };
}
