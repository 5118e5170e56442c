use std::collections::HashMap;
use std::path::Path;

use crate::error::Error;

/// Name of the project config file, looked up in the working directory.
pub const CONFIG_FILE: &str = ".anchor-prefixes.toml";

/// Project configuration loaded from `.anchor-prefixes.toml`.
/// Include/exclude patterns are path prefixes applied to markdown source files.
pub struct Config {
    /// Path prefixes of markdown files to skip.
    exclude: Vec<String>,
    /// Path prefixes of markdown files to scan; empty means everything.
    include: Vec<String>,
    /// Registered link prefixes and their formatting rules.
    pub prefixes: PrefixRegistry,
}

/// Output dialect selected by a prefix rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Config-setting pages keyed by a lowercased setting name.
    Config,
    /// Plain string substitution of `prefix:` with the base URL.
    Generic,
    /// The project's own class reference docs.
    Internal,
    /// Yii framework API docs, 1.1 or 2.0 generation.
    Yii,
}

/// Immutable map from prefix to formatting rule.
/// Built once per process and shared read-only by every resolution.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(transparent)]
pub struct PrefixRegistry(
    /// Rules keyed by prefix, without the trailing colon.
    HashMap<String, PrefixRule>,
);

/// Formatting rule for one registered prefix.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct PrefixRule {
    /// URL every resolved link starts with.
    pub base: String,
    /// Raw dialect name as written in the config; see [`PrefixRule::dialect`].
    #[serde(default)]
    pub format: Option<String>,
}

/// Raw TOML structure for `.anchor-prefixes.toml`.
#[derive(serde::Deserialize)]
struct AnchorPrefixesToml {
    /// Path prefixes to skip.
    #[serde(default)]
    exclude: Vec<String>,
    /// Path prefixes to scan.
    #[serde(default)]
    include: Vec<String>,
    /// `[prefixes.<name>]` tables.
    #[serde(default)]
    prefixes: PrefixRegistry,
}

impl Config {
    /// Load config from `.anchor-prefixes.toml` in the given root directory.
    /// Returns an empty registry that scans everything if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; a config the user
    /// wrote is never silently replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::scan_everything_by_default());
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Parse config from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: AnchorPrefixesToml = toml::from_str(content)?;
        return Ok(Self {
            exclude: raw.exclude,
            include: raw.include,
            prefixes: raw.prefixes,
        });
    }

    /// Default config that includes everything, excludes nothing, and
    /// registers no prefixes.
    fn scan_everything_by_default() -> Self {
        return Self {
            exclude: Vec::new(),
            include: Vec::new(),
            prefixes: PrefixRegistry::default(),
        };
    }

    /// Check whether a markdown file path should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}

impl Format {
    /// The name used for this format in config files.
    pub const fn as_str(self) -> &'static str {
        return match self {
            Self::Config => "config",
            Self::Generic => "generic",
            Self::Internal => "internal",
            Self::Yii => "yii",
        };
    }

    /// Look up a format by its config name. Unknown names have no format.
    pub fn from_name(name: &str) -> Option<Self> {
        return match name {
            "config" => Some(Self::Config),
            "generic" => Some(Self::Generic),
            "internal" => Some(Self::Internal),
            "yii" => Some(Self::Yii),
            _ => None,
        };
    }
}

impl FromIterator<(String, PrefixRule)> for PrefixRegistry {
    fn from_iter<I: IntoIterator<Item = (String, PrefixRule)>>(iter: I) -> Self {
        return Self(iter.into_iter().collect());
    }
}

impl PrefixRegistry {
    /// Find the registered key and rule for a candidate prefix.
    pub fn get_key_value(&self, prefix: &str) -> Option<(&str, &PrefixRule)> {
        return self.0.get_key_value(prefix).map(|(k, v)| return (k.as_str(), v));
    }

    /// Whether no prefixes are registered.
    pub fn is_empty(&self) -> bool {
        return self.0.is_empty();
    }

    /// All entries, sorted by prefix.
    pub fn sorted(&self) -> Vec<(&str, &PrefixRule)> {
        let mut entries: Vec<(&str, &PrefixRule)> =
            self.0.iter().map(|(k, v)| return (k.as_str(), v)).collect();
        entries.sort_by_key(|(name, _)| return *name);
        return entries;
    }
}

impl PrefixRule {
    /// Build a rule for the given base URL and format.
    #[cfg(test)]
    pub fn new(base: &str, format: Format) -> Self {
        return Self {
            base: base.to_string(),
            format: Some(format.as_str().to_string()),
        };
    }

    /// The dialect this rule formats links in. `None` when the rule has no
    /// format or names one this crate doesn't know.
    pub fn dialect(&self) -> Option<Format> {
        return self.format.as_deref().and_then(Format::from_name);
    }
}
