//! Tree inspection helpers for downstream consumers.
//!
//! Generators that scan parsed pages for specific template calls and read
//! their parameters by key live outside this crate; these helpers give them
//! stable accessors over the span-based node model.

use crate::{
    Node, Parameter, Span, Spanned, Tree,
    visit::{self, Visitor},
};
use core::{convert::Infallible, fmt};
use unicase::UniCase;

/// Extracts the plain text of a node tree.
///
/// Comments are transparent and contribute nothing; escape tag interiors
/// are literal text and are emitted as-is. Markup delimiters are dropped.
pub struct TextContent<'tt, W>
where
    W: fmt::Write,
{
    /// The accumulated text.
    content: W,
    /// The node tree source.
    source: &'tt str,
}

impl<'tt, W> TextContent<'tt, W>
where
    W: fmt::Write,
{
    /// Creates a new text content extractor with the given source and
    /// output.
    pub fn new(source: &'tt str, content: W) -> Self {
        Self { content, source }
    }

    /// Returns the text content, consuming the extractor.
    pub fn finish(self) -> W {
        self.content
    }
}

impl<'tt, W> Visitor<'tt, fmt::Error> for TextContent<'tt, W>
where
    W: fmt::Write,
{
    fn source(&self) -> &'tt str {
        self.source
    }

    fn visit_text(&mut self, _span: Span, text: &'tt str) -> fmt::Result {
        self.content.write_str(text)
    }

    fn visit_nowiki(&mut self, _span: Span, _name: Span, content: Span) -> fmt::Result {
        self.content.write_str(&self.source[content.into_range()])
    }
}

/// Extracts the plain text of a whole tree into a `String`.
pub fn text_content(tree: &Tree<'_>) -> String {
    let mut extractor = TextContent::new(tree.source(), String::new());
    // writing to a String is infallible
    extractor.visit_tree(tree).unwrap();
    extractor.finish()
}

/// A borrowed view of one template call found in a tree.
#[derive(Clone, Copy, Debug)]
pub struct TemplateRef<'tt> {
    /// The tree source.
    source: &'tt str,
    /// The span of the whole call, braces included.
    pub span: Span,
    /// The template name nodes.
    pub name: &'tt [Spanned<Node>],
    /// The template parameters, in source order.
    pub parameters: &'tt [Spanned<Parameter>],
}

impl<'tt> TemplateRef<'tt> {
    /// The raw name text, exactly as written.
    pub fn name_raw(&self) -> &'tt str {
        raw(self.source, self.name)
    }

    /// Looks up a parameter by key.
    ///
    /// A named parameter matches when its trimmed key text equals `key`; a
    /// positional parameter matches when `key` is its 1-based ordinal, the
    /// same addressing templates themselves use.
    pub fn parameter(&self, key: &str) -> Option<&'tt Spanned<Parameter>> {
        let ordinal_key = key.parse::<usize>().ok();
        let mut ordinal = 0;

        for parameter in self.parameters {
            match parameter.name() {
                Some(name) => {
                    if raw(self.source, name).trim() == key {
                        return Some(parameter);
                    }
                }
                None => {
                    ordinal += 1;
                    if ordinal_key == Some(ordinal) {
                        return Some(parameter);
                    }
                }
            }
        }
        None
    }

    /// Looks up a parameter by key and returns its trimmed raw value.
    pub fn value(&self, key: &str) -> Option<&'tt str> {
        self.parameter(key)
            .map(|parameter| raw(self.source, parameter.value()).trim())
    }
}

/// Collects every template call in a tree, in document order.
pub fn templates<'tt>(tree: &'tt Tree<'_>) -> Vec<TemplateRef<'tt>> {
    collect(tree, None)
}

/// Collects every template call whose trimmed name matches `name`,
/// case-insensitively, in document order.
pub fn templates_named<'tt>(tree: &'tt Tree<'_>, name: &str) -> Vec<TemplateRef<'tt>> {
    collect(tree, Some(UniCase::new(name)))
}

/// Returns the merged span of a node list, if it is not empty.
pub fn raw_span(nodes: &[Spanned<Node>]) -> Option<Span> {
    match (nodes.first(), nodes.last()) {
        (Some(first), Some(last)) => Some(first.span.merge(last.span)),
        _ => None,
    }
}

/// Resolves a node list to the raw source text it covers.
pub fn raw<'s>(source: &'s str, nodes: &[Spanned<Node>]) -> &'s str {
    raw_span(nodes).map_or("", |span| &source[span.into_range()])
}

/// Splits an external link interior into its URL and display text.
///
/// The URL is the first whitespace-delimited token; the display text is the
/// raw remainder after the first whitespace run, or `None` when nothing but
/// whitespace follows the URL.
pub fn split_external_link(target: &str) -> (&str, Option<&str>) {
    match target.find(char::is_whitespace) {
        Some(pos) => {
            let display = target[pos..].trim_start();
            (&target[..pos], (!display.is_empty()).then_some(display))
        }
        None => (target, None),
    }
}

/// A visitor that accumulates [`TemplateRef`]s, optionally filtered by
/// name.
struct TemplateCollector<'tt, 'q> {
    /// The tree source.
    source: &'tt str,
    /// The name filter, if any.
    name: Option<UniCase<&'q str>>,
    /// The collected calls.
    found: Vec<TemplateRef<'tt>>,
}

impl<'tt> Visitor<'tt, Infallible> for TemplateCollector<'tt, '_> {
    fn source(&self) -> &'tt str {
        self.source
    }

    fn visit_template(
        &mut self,
        span: Span,
        name: &'tt [Spanned<Node>],
        parameters: &'tt [Spanned<Parameter>],
    ) -> Result<(), Infallible> {
        let matched = self
            .name
            .is_none_or(|query| query == UniCase::new(raw(self.source, name).trim()));
        if matched {
            self.found.push(TemplateRef {
                source: self.source,
                span,
                name,
                parameters,
            });
        }

        // nested calls inside parameter values are collected too
        visit::visit_template(self, span, name, parameters)
    }
}

fn collect<'tt>(tree: &'tt Tree<'_>, name: Option<UniCase<&str>>) -> Vec<TemplateRef<'tt>> {
    let mut collector = TemplateCollector {
        source: tree.source(),
        name,
        found: Vec::new(),
    };
    let _ = collector.visit_tree(tree);
    collector.found
}
