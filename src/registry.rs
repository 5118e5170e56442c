use std::path::{Path, PathBuf};

use crate::config::{self, Format};
use crate::error;

// ── CLI commands ──────────────────────────────────────────────────────

/// Register a prefix in the config file.
///
/// # Errors
///
/// Returns errors from config reading or writing.
pub fn cmd_add(name: &str, base: &str, format: Option<Format>) -> Result<(), error::Error> {
    let root = PathBuf::from(".");
    add_to_config(&root, name, base, format)?;
    println!("Added prefix: {name}: -> {base}");
    return Ok(());
}

/// List all registered prefixes, sorted alphabetically.
///
/// # Errors
///
/// Returns errors from config loading.
pub fn cmd_list() -> Result<(), error::Error> {
    let root = PathBuf::from(".");
    let config = config::Config::load(&root)?;

    if config.prefixes.is_empty() {
        println!("No prefixes registered.");
        return Ok(());
    }

    for (name, rule) in config.prefixes.sorted() {
        let format = rule.format.as_deref().unwrap_or("(none)");
        println!("{name}: -> {} [{format}]", rule.base);
    }

    return Ok(());
}

/// Remove a prefix from the config file.
///
/// # Errors
///
/// Returns `Error::UnknownPrefix` if the prefix isn't registered,
/// or errors from config reading or writing.
pub fn cmd_remove(name: &str) -> Result<(), error::Error> {
    let root = PathBuf::from(".");
    remove_from_config(&root, name)?;
    println!("Removed prefix: {name}");
    return Ok(());
}

// ── Config file editing ───────────────────────────────────────────────

/// Add (or replace) a `[prefixes.<name>]` table.
/// Creates the `prefixes` table if it doesn't exist.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the config can't be parsed or its
/// `prefixes` key isn't a table, or `Error::Io` if writing fails.
fn add_to_config(
    root: &Path,
    name: &str,
    base: &str,
    format: Option<Format>,
) -> Result<(), error::Error> {
    let (config_path, mut doc) = read_config_doc(root)?;

    let mut implicit = toml_edit::Table::new();
    implicit.set_implicit(true);
    let prefixes = doc
        .entry("prefixes")
        .or_insert(toml_edit::Item::Table(implicit))
        .as_table_like_mut()
        .ok_or_else(|| return prefixes_not_a_table(&config_path))?;

    let mut rule = toml_edit::Table::new();
    rule["base"] = toml_edit::value(base);
    if let Some(format) = format {
        rule["format"] = toml_edit::value(format.as_str());
    }
    prefixes.insert(name, toml_edit::Item::Table(rule));

    std::fs::write(&config_path, doc.to_string())?;
    return Ok(());
}

/// Error for a `prefixes` key holding something other than a table.
fn prefixes_not_a_table(config_path: &Path) -> error::Error {
    return error::Error::ParseFailed {
        file: config_path.to_path_buf(),
        reason: "`prefixes` must be a table".to_string(),
    };
}

/// Parse `.anchor-prefixes.toml` into a format-preserving document.
/// Returns an empty document if the file doesn't exist.
///
/// # Errors
///
/// Returns `Error::Io` on read failure or `Error::ParseFailed` on parse failure.
fn read_config_doc(root: &Path) -> Result<(PathBuf, toml_edit::DocumentMut), error::Error> {
    let config_path = root.join(config::CONFIG_FILE);
    let content = match std::fs::read_to_string(&config_path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(error::Error::Io(e)),
        Ok(c) => c,
    };

    let doc: toml_edit::DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
        return error::Error::ParseFailed {
            file: config_path.clone(),
            reason: e.to_string(),
        };
    })?;

    return Ok((config_path, doc));
}

/// Remove a `[prefixes.<name>]` table.
///
/// # Errors
///
/// Returns `Error::UnknownPrefix` if the name isn't found.
fn remove_from_config(root: &Path, name: &str) -> Result<(), error::Error> {
    let (config_path, mut doc) = read_config_doc(root)?;

    let prefixes = doc
        .get_mut("prefixes")
        .and_then(toml_edit::Item::as_table_like_mut)
        .ok_or_else(|| return error::Error::UnknownPrefix { name: name.to_string() })?;

    if prefixes.remove(name).is_none() {
        return Err(error::Error::UnknownPrefix { name: name.to_string() });
    }

    std::fs::write(&config_path, doc.to_string())?;
    return Ok(());
}
