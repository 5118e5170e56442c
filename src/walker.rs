//! Token-tree walker: rewrites prefixed link targets and the display text
//! right after them.

use std::sync::Arc;

use crate::config::PrefixRegistry;
use crate::error::Error;
use crate::pipeline::{CoreRule, INLINE_RULE, Pipeline};
use crate::prefix;
use crate::resolver;
use crate::tokens::{Token, TokenKind};

/// Name the walker is registered under in the pipeline.
pub const REPLACE_LINK_RULE: &str = "replace-link";

/// Rewrite every prefixed link in a document, in place.
///
/// For each link-open token inside an inline token, the first `href`
/// attribute is resolved. On a rewrite, the `href` gets the new URL and a
/// text token directly after the link loses its prefix. Links that don't
/// resolve are left exactly as they were.
pub fn replace_links(tokens: &mut [Token<'_>], registry: &PrefixRegistry) {
    for block in tokens.iter_mut() {
        if block.kind != TokenKind::Inline {
            continue;
        }
        let Some(children) = block.children.as_mut() else {
            continue;
        };
        replace_links_in_children(children, registry);
    }
}

/// Rewrite links among the children of one inline token.
fn replace_links_in_children(children: &mut [Token<'_>], registry: &PrefixRegistry) {
    for idx in 0..children.len() {
        let Some(token) = children.get_mut(idx) else {
            continue;
        };
        if token.kind != TokenKind::LinkOpen {
            continue;
        }
        let Some(href) = token.attr_mut("href") else {
            continue;
        };
        let Some(replacement) = resolver::replace_prefix(href.as_str(), registry) else {
            continue;
        };
        *href = replacement;

        if let Some(next) = children.get_mut(idx.saturating_add(1))
            && next.kind == TokenKind::Text
        {
            next.content = prefix::remove_prefix(&next.content);
        }
    }
}

/// Register the walker as a core rule that runs right after inline parsing.
///
/// # Errors
///
/// Returns `Error::UnknownRule` if the pipeline has no `inline` rule.
pub fn replace_prefixes(pipeline: &mut Pipeline, registry: Arc<PrefixRegistry>) -> Result<(), Error> {
    let rule: CoreRule = Box::new(move |tokens: &mut Vec<Token<'_>>| replace_links(tokens, &registry));
    return pipeline.add_rule_after(INLINE_RULE, REPLACE_LINK_RULE, rule);
}

#[cfg(test)]
mod tests {
    use pulldown_cmark::Options;

    use super::*;
    use crate::config::{Format, PrefixRule};

    fn registry() -> PrefixRegistry {
        return [
            ("craft3".to_string(), PrefixRule::new("/docs/api/v3/", Format::Internal)),
            ("yii2".to_string(), PrefixRule::new("/doc/api/2.0/", Format::Yii)),
        ]
        .into_iter()
        .collect();
    }

    #[test]
    fn rewrites_href_and_following_text() {
        let mut tokens = vec![Token::inline(vec![
            Token::link_open("yii2:yii\\base\\Model::validate()"),
            Token::text("yii2:Model::validate()"),
            Token::link_close(),
        ])];
        replace_links(&mut tokens, &registry());

        let children = tokens[0].children.as_ref().unwrap();
        assert_eq!(children[0].attr("href"), Some("/doc/api/2.0/yii-base-model#validate()-detail"));
        assert_eq!(children[1].content, "Model::validate()");
    }

    #[test]
    fn unresolved_link_is_untouched() {
        let mut tokens = vec![Token::inline(vec![
            Token::link_open("yii1:CModel"),
            Token::text("yii1:CModel"),
            Token::link_close(),
        ])];
        replace_links(&mut tokens, &registry());

        let children = tokens[0].children.as_ref().unwrap();
        assert_eq!(children[0].attr("href"), Some("yii1:CModel"));
        assert_eq!(children[1].content, "yii1:CModel");
    }

    #[test]
    fn non_text_successor_is_left_alone() {
        let mut tokens = vec![Token::inline(vec![
            Token::link_open("craft3:craft\\elements\\Entry"),
            Token::link_close(),
            Token::text("craft3:after"),
        ])];
        replace_links(&mut tokens, &registry());

        let children = tokens[0].children.as_ref().unwrap();
        assert_eq!(children[0].attr("href"), Some("/docs/api/v3/craft-elements-entry.html"));
        assert_eq!(children[2].content, "craft3:after");
    }

    #[test]
    fn link_at_end_of_children() {
        let mut tokens = vec![Token::inline(vec![Token::link_open("craft3:craft\\Foo")])];
        replace_links(&mut tokens, &registry());
        let children = tokens[0].children.as_ref().unwrap();
        assert_eq!(children[0].attr("href"), Some("/docs/api/v3/craft-foo.html"));
    }

    #[test]
    fn display_text_without_prefix_is_kept() {
        let mut tokens = vec![Token::inline(vec![
            Token::link_open("craft3:craft\\elements\\Entry"),
            Token::text("Entry"),
            Token::link_close(),
        ])];
        replace_links(&mut tokens, &registry());
        assert_eq!(tokens[0].children.as_ref().unwrap()[1].content, "Entry");
    }

    #[test]
    fn pipeline_renders_rewritten_links() {
        let mut pipeline = Pipeline::new(Options::empty());
        replace_prefixes(&mut pipeline, Arc::new(registry())).unwrap();
        assert_eq!(pipeline.rule_names(), vec!["inline", "replace-link"]);

        let html = pipeline.render("See [craft3:craft\\elements\\Entry](craft3:craft\\elements\\Entry).");
        assert_eq!(
            html,
            "<p>See <a href=\"/docs/api/v3/craft-elements-entry.html\">craft\\elements\\Entry</a>.</p>\n"
        );
    }

    #[test]
    fn pipeline_leaves_ordinary_links_alone() {
        let mut pipeline = Pipeline::new(Options::empty());
        replace_prefixes(&mut pipeline, Arc::new(registry())).unwrap();

        let html = pipeline.render("[home](https://example.com/)");
        assert_eq!(html, "<p><a href=\"https://example.com/\">home</a></p>\n");
    }
}
