//! Core CLI commands for anchor-prefixes: resolve, render, scan, info.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use rayon::prelude::*;

use crate::config;
use crate::error;
use crate::pipeline::Pipeline;
use crate::resolver;
use crate::scanner;
use crate::tokens;
use crate::walker;

/// Output a comprehensive reference document for anchor-prefixes.
pub fn info(json: bool) {
    return crate::info::run(json);
}

/// Render markdown files to HTML on stdout, prefixed links rewritten.
/// Files render in parallel; output keeps argument order.
///
/// # Errors
///
/// Returns errors from config loading, `Error::FileNotFound` for a missing
/// file, or `Error::Io` for one that can't be read.
pub fn render(files: &[PathBuf]) -> Result<(), error::Error> {
    let root = PathBuf::from(".");
    let config = config::Config::load(&root)?;

    let mut pipeline = Pipeline::new(tokens::markdown_options());
    walker::replace_prefixes(&mut pipeline, Arc::new(config.prefixes))?;

    let rendered = files
        .par_iter()
        .map(|path| return render_file(&pipeline, path))
        .collect::<Result<Vec<String>, error::Error>>()?;

    for html in rendered {
        print!("{html}");
    }

    return Ok(());
}

/// Read and render a single markdown file.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the file doesn't exist, or `Error::Io`
/// if it exists but can't be read as UTF-8 text.
fn render_file(pipeline: &Pipeline, path: &Path) -> Result<String, error::Error> {
    let markdown = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            return error::Error::FileNotFound { path: path.to_path_buf() };
        }
        return error::Error::Io(e);
    })?;
    tracing::debug!(file = %path.display(), "rendering");
    return Ok(pipeline.render(&markdown));
}

/// Resolve one link and print the URL. Exits 1 when the link isn't rewritten.
///
/// # Errors
///
/// Returns errors from config loading.
pub fn resolve(link: &str) -> Result<ExitCode, error::Error> {
    let root = PathBuf::from(".");
    let config = config::Config::load(&root)?;

    return match resolver::replace_prefix(link, &config.prefixes) {
        None => {
            eprintln!("no rewrite: {link}");
            Ok(ExitCode::from(1))
        },
        Some(url) => {
            println!("{url}");
            Ok(ExitCode::SUCCESS)
        },
    };
}

/// List every prefixed link in the scanned markdown and how it resolves.
/// Exits 1 if any link doesn't resolve.
///
/// # Errors
///
/// Returns errors from config loading or markdown scanning.
pub fn scan() -> Result<ExitCode, error::Error> {
    let root = PathBuf::from(".");
    let config = config::Config::load(&root)?;
    let sites = scanner::scan(&root, &config)?;

    let mut unresolved = 0_u32;
    for site in &sites {
        let location = format!("{}:{}", site.source.display(), site.line);
        match resolver::replace_prefix(&site.href, &config.prefixes) {
            None => {
                unresolved = unresolved.saturating_add(1);
                println!("UNRESOLVED  {location}  {}", site.href);
            },
            Some(url) => println!("RESOLVED    {location}  {} -> {url}", site.href),
        }
    }

    let total = sites.len();
    if unresolved > 0 {
        println!();
        println!("{unresolved} of {total} prefixed links unresolved");
        return Ok(ExitCode::from(1));
    }

    println!("All {total} prefixed links resolved");
    return Ok(ExitCode::SUCCESS);
}

#[cfg(test)]
mod tests {
    use pulldown_cmark::Options;

    use super::*;

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.md");
        let result = render_file(&Pipeline::new(Options::empty()), &missing);
        assert!(matches!(result, Err(error::Error::FileNotFound { path }) if path == missing));
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("binary.md");
        std::fs::write(&binary, [0xFF, 0xFE, 0x00]).unwrap();

        let pipeline = Pipeline::new(Options::empty());
        assert!(matches!(render_file(&pipeline, &binary), Err(error::Error::Io(_))));
        assert!(matches!(render_file(&pipeline, dir.path()), Err(error::Error::Io(_))));
    }

    #[test]
    fn readable_file_renders() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.md");
        std::fs::write(&page, "Hello\n").unwrap();
        let html = render_file(&Pipeline::new(Options::empty()), &page).unwrap();
        assert_eq!(html, "<p>Hello</p>\n");
    }
}
