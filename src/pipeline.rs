//! Markdown-to-HTML pipeline with an ordered list of named core rules.

use pulldown_cmark::Options;

use crate::error::Error;
use crate::tokens::{self, Token};

/// A transform run over a document's token tree.
pub type CoreRule = Box<dyn Fn(&mut Vec<Token<'_>>) + Send + Sync>;

/// Name of the built-in rule that groups inline tokens.
pub const INLINE_RULE: &str = "inline";

/// Tokenizes markdown, runs each core rule in order, renders HTML.
/// Rules only read shared state, so one pipeline can render many documents
/// in parallel.
pub struct Pipeline {
    /// pulldown-cmark extensions enabled while tokenizing.
    options: Options,
    /// Core rules in run order, keyed by name.
    rules: Vec<(String, CoreRule)>,
}

impl Pipeline {
    /// Insert a rule directly after the rule named `anchor`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownRule` if no rule is named `anchor`.
    pub fn add_rule_after(&mut self, anchor: &str, name: &str, rule: CoreRule) -> Result<(), Error> {
        let position = self
            .rules
            .iter()
            .position(|(existing, _)| return existing == anchor)
            .ok_or_else(|| return Error::UnknownRule { name: anchor.to_string() })?;

        self.rules.insert(position.saturating_add(1), (name.to_string(), rule));
        return Ok(());
    }

    /// A pipeline with only the built-in `inline` rule.
    pub fn new(options: Options) -> Self {
        let inline: CoreRule = Box::new(tokens::group_inline_runs);
        return Self {
            options,
            rules: vec![(INLINE_RULE.to_string(), inline)],
        };
    }

    /// Render one markdown document to HTML.
    pub fn render(&self, markdown: &str) -> String {
        let mut tokens = tokens::parse(markdown, self.options);
        for (_, rule) in &self.rules {
            rule(&mut tokens);
        }
        return tokens::render(tokens);
    }

    /// Rule names in run order.
    #[cfg(test)]
    pub fn rule_names(&self) -> Vec<&str> {
        return self.rules.iter().map(|(name, _)| return name.as_str()).collect();
    }
}
