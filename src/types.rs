/// Core domain types for prefixed links and the references parsed from them.
use std::path::PathBuf;

use crate::config::PrefixRule;

/// A prefixed link found while scanning markdown files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSite {
    /// Link target as written in the markdown.
    pub href: String,
    /// One-based line number of the link in the source file.
    pub line: u32,
    /// Markdown file containing the link, relative to the scan root.
    pub source: PathBuf,
}

/// A link whose prefix is a registered key.
/// Borrows the prefix and rule from the registry it was matched against.
#[derive(Debug, Clone)]
pub struct PrefixMatch<'r> {
    /// The link with percent-encoding decoded.
    pub decoded: String,
    /// The registered prefix, without the trailing colon.
    pub prefix: &'r str,
    /// Formatting rule registered for the prefix.
    pub rule: &'r PrefixRule,
}

/// Parsed from the prefix-stripped part of a link, e.g.
/// `yii\base\Model::validate()#top`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Class or module path, backslashes preserved, leading backslash dropped.
    pub class_name: String,
    /// Explicit `#fragment`, without the `#`.
    pub hash: Option<String>,
    /// Whether the member was written with a trailing `()`.
    pub is_method: bool,
    /// Member name after `::`, without any `$` sigil.
    pub subject: Option<String>,
}
