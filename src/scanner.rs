use std::path::Path;

use pulldown_cmark::{Event, Parser, Tag};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::prefix;
use crate::tokens;
use crate::types::LinkSite;

/// Collect every link in `content` whose target looks like `<prefix>:<rest>`.
fn extract_prefixed_links(content: &str, source: &Path, sites: &mut Vec<LinkSite>) {
    for (event, range) in Parser::new_ext(content, tokens::markdown_options()).into_offset_iter() {
        let Event::Start(Tag::Link { dest_url, .. }) = event else {
            continue;
        };
        if !looks_prefixed(&dest_url) {
            continue;
        }
        sites.push(LinkSite {
            href: dest_url.to_string(),
            line: line_number_at(content, range.start),
            source: source.to_path_buf(),
        });
    }
}

/// One-based line number of a byte offset.
fn line_number_at(content: &str, offset: usize) -> u32 {
    let before = content.get(..offset).unwrap_or(content);
    let newlines = before.matches('\n').count();
    return u32::try_from(newlines).unwrap_or(u32::MAX).saturating_add(1);
}

/// A colon outside of a `scheme://` URL or `mailto:` address.
fn looks_prefixed(href: &str) -> bool {
    let decoded = prefix::decode_link(href);
    return decoded.contains(':') && !decoded.contains("://") && !decoded.starts_with("mailto:");
}

/// Scan all markdown files under `root` for prefixed links.
/// Applies the config's include/exclude filters to control which markdown files are scanned.
/// Files are visited in name order so output is stable.
///
/// # Errors
///
/// Returns `Error::Io` if any markdown file cannot be read.
pub fn scan(root: &Path, config: &Config) -> Result<Vec<LinkSite>, Error> {
    let mut sites = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| return e.path().extension().is_some_and(|ext| return ext == "md"))
    {
        let md_path = entry.path();
        let relative_source = md_path.strip_prefix(root).unwrap_or(md_path);

        if !config.should_scan(&relative_source.to_string_lossy()) {
            continue;
        }

        let content = std::fs::read_to_string(md_path)?;
        extract_prefixed_links(&content, relative_source, &mut sites);
    }

    return Ok(sites);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn finds_prefixed_links_with_line_numbers() {
        let content = "# Guide\n\nSee [Model](yii2:yii\\base\\Model).\n\nAnd [home](https://example.com/).\n\n[mail](mailto:a@b.c) [api](api:Entry)\n";
        let mut sites = Vec::new();
        extract_prefixed_links(content, Path::new("docs/guide.md"), &mut sites);

        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].href, "yii2:yii\\base\\Model");
        assert_eq!(sites[0].line, 3);
        assert_eq!(sites[0].source, PathBuf::from("docs/guide.md"));
        assert_eq!(sites[1].href, "api:Entry");
        assert_eq!(sites[1].line, 7);
    }

    #[test]
    fn links_in_tables_and_footnotes_are_found() {
        let content = "| Class | Notes |\n|-------|-------|\n| [Model](yii2:Model) | ~~old~~ |\n\nSee[^1].\n\n[^1]: Also [View](yii2:View).\n";
        let mut sites = Vec::new();
        extract_prefixed_links(content, Path::new("docs/table.md"), &mut sites);

        let found: Vec<(&str, u32)> = sites.iter().map(|s| (s.href.as_str(), s.line)).collect();
        assert_eq!(found, vec![("yii2:Model", 3), ("yii2:View", 7)]);
    }

    #[test]
    fn relative_links_are_ignored() {
        let mut sites = Vec::new();
        extract_prefixed_links("[next](./next.md#intro)", Path::new("a.md"), &mut sites);
        assert!(sites.is_empty());
    }

    #[test]
    fn scan_applies_include_filter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/a.md"), "[x](yii2:Model)\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "[y](yii2:Other)\n").unwrap();

        let config = Config::parse("include = [\"docs/\"]").unwrap();
        let sites = scan(dir.path(), &config).unwrap();

        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].source, PathBuf::from("docs/a.md"));
    }
}
