/// Crate-level error types for anchor-prefixes diagnostics.
use std::path::PathBuf;

/// Every error names the file, prefix, link, or rule that failed, so a
/// diagnostic can be rendered without a debugger.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A markdown file passed on the command line does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// A link registered under a `config` format rule does not carry the
    /// `config2:` / `config3:` shape the rule expects.
    #[error("malformed config link: \"{link}\" (expected `config2:<setting>` or `config3:<setting>`)")]
    MalformedConfigLink {
        /// The decoded link that failed to match.
        link: String,
    },

    /// A config file exists but cannot be parsed as an editable document.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// No registered prefix matches the given name.
    #[error("unknown prefix: `{name}`")]
    UnknownPrefix {
        /// Prefix identifier that was not found.
        name: String,
    },

    /// A core rule was inserted relative to a rule the pipeline doesn't have.
    #[error("unknown core rule: `{name}`")]
    UnknownRule {
        /// Name of the missing anchor rule.
        name: String,
    },
}
