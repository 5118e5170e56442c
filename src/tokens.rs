//! Document token tree built from pulldown-cmark events.
//!
//! The tree is flat at block level. After the `inline` core rule runs, each
//! run of inline-level events sits under one [`TokenKind::Inline`] token as
//! its `children`, which is the shape the link walker works on.

use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream};

/// What a token represents to the core rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Container for a run of inline tokens.
    Inline,
    /// Start of a link; carries `href` (and `title`) in `attrs`.
    LinkOpen,
    /// Anything the core rules pass through untouched.
    Other,
    /// Plain text; carries its text in `content`.
    Text,
}

/// One node of the document token tree.
#[derive(Debug, Clone)]
pub struct Token<'a> {
    /// `(name, value)` attributes. Only link-open tokens have any.
    pub attrs: Vec<(String, String)>,
    /// Child tokens of an inline token.
    pub children: Option<Vec<Token<'a>>>,
    /// Text of a text token.
    pub content: String,
    /// The event this token was parsed from, replayed on render.
    event: Option<Event<'a>>,
    /// Token kind.
    pub kind: TokenKind,
}

impl<'a> Token<'a> {
    /// Value of the first attribute with the given name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        return self
            .attrs
            .iter()
            .find(|(key, _)| return key == name)
            .map(|(_, value)| return value.as_str());
    }

    /// Mutable access to the value of the first attribute with the given name.
    pub fn attr_mut(&mut self, name: &str) -> Option<&mut String> {
        return self
            .attrs
            .iter_mut()
            .find(|(key, _)| return key == name)
            .map(|(_, value)| return value);
    }

    /// Wrap a pulldown-cmark event.
    pub fn from_event(event: Event<'a>) -> Self {
        return match event {
            Event::Start(Tag::Link { .. }) => Self::link_from_event(event),
            Event::Text(text) => Self::text(&text),
            other => Self {
                attrs: Vec::new(),
                children: None,
                content: String::new(),
                event: Some(other),
                kind: TokenKind::Other,
            },
        };
    }

    /// An inline token holding the given children.
    pub fn inline(children: Vec<Self>) -> Self {
        return Self {
            attrs: Vec::new(),
            children: Some(children),
            content: String::new(),
            event: None,
            kind: TokenKind::Inline,
        };
    }

    /// Flatten back into pulldown-cmark events, picking up any rewritten
    /// `href` or text content.
    fn into_events(self, out: &mut Vec<Event<'a>>) {
        match self.kind {
            TokenKind::Inline => {
                for child in self.children.unwrap_or_default() {
                    child.into_events(out);
                }
            },
            TokenKind::LinkOpen => out.push(Event::Start(self.into_link_tag())),
            TokenKind::Other => out.extend(self.event),
            TokenKind::Text => out.push(Event::Text(CowStr::from(self.content))),
        }
    }

    /// Rebuild the link tag from the current attributes, keeping the link
    /// type and reference id of the original event.
    fn into_link_tag(self) -> Tag<'a> {
        let href = self.attr("href").unwrap_or_default().to_string();
        let title = self.attr("title").unwrap_or_default().to_string();
        let (link_type, id) = match self.event {
            Some(Event::Start(Tag::Link { link_type, id, .. })) => (link_type, id),
            _ => (LinkType::Inline, CowStr::Borrowed("")),
        };
        return Tag::Link {
            dest_url: CowStr::from(href),
            id,
            link_type,
            title: CowStr::from(title),
        };
    }

    /// Whether the token belongs inside an inline run.
    fn is_inline_level(&self) -> bool {
        return match self.kind {
            TokenKind::Inline => false,
            TokenKind::LinkOpen | TokenKind::Text => true,
            TokenKind::Other => matches!(
                self.event,
                Some(
                    Event::Start(Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Image { .. })
                        | Event::End(
                            TagEnd::Emphasis
                                | TagEnd::Strong
                                | TagEnd::Strikethrough
                                | TagEnd::Link
                                | TagEnd::Image
                        )
                        | Event::Code(_)
                        | Event::InlineHtml(_)
                        | Event::InlineMath(_)
                        | Event::FootnoteReference(_)
                        | Event::SoftBreak
                        | Event::HardBreak
                )
            ),
        };
    }

    /// A closing link token.
    #[cfg(test)]
    pub fn link_close() -> Self {
        return Self {
            attrs: Vec::new(),
            children: None,
            content: String::new(),
            event: Some(Event::End(TagEnd::Link)),
            kind: TokenKind::Other,
        };
    }

    /// Link-open token for a `Tag::Link` start event.
    fn link_from_event(event: Event<'a>) -> Self {
        let attrs = match &event {
            Event::Start(Tag::Link { dest_url, title, .. }) => {
                let mut attrs = vec![("href".to_string(), dest_url.to_string())];
                if !title.is_empty() {
                    attrs.push(("title".to_string(), title.to_string()));
                }
                attrs
            },
            _ => Vec::new(),
        };
        return Self {
            attrs,
            children: None,
            content: String::new(),
            event: Some(event),
            kind: TokenKind::LinkOpen,
        };
    }

    /// A link-open token with the given `href`.
    #[cfg(test)]
    pub fn link_open(href: &str) -> Self {
        return Self {
            attrs: vec![("href".to_string(), href.to_string())],
            children: None,
            content: String::new(),
            event: None,
            kind: TokenKind::LinkOpen,
        };
    }

    /// A text token.
    pub fn text(content: &str) -> Self {
        return Self {
            attrs: Vec::new(),
            children: None,
            content: content.to_string(),
            event: None,
            kind: TokenKind::Text,
        };
    }
}

/// Core rule: collapse each run of inline-level tokens into one inline token.
pub fn group_inline_runs(tokens: &mut Vec<Token<'_>>) {
    let flat = std::mem::take(tokens);
    let mut run = Vec::new();

    for token in flat {
        if token.is_inline_level() {
            run.push(token);
            continue;
        }
        if !run.is_empty() {
            tokens.push(Token::inline(std::mem::take(&mut run)));
        }
        tokens.push(token);
    }

    if !run.is_empty() {
        tokens.push(Token::inline(run));
    }
}

/// Markdown extensions enabled wherever documents are parsed.
pub fn markdown_options() -> Options {
    return Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
}

/// Tokenize markdown into a flat stream, one token per event.
/// Adjacent text events are merged so link text arrives as a single token.
pub fn parse(markdown: &str, options: Options) -> Vec<Token<'_>> {
    return TextMergeStream::new(Parser::new_ext(markdown, options))
        .map(Token::from_event)
        .collect();
}

/// Render a token tree to HTML.
pub fn render(tokens: Vec<Token<'_>>) -> String {
    let mut events = Vec::new();
    for token in tokens {
        token.into_events(&mut events);
    }

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    return html;
}
