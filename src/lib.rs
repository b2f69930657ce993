//! A round-tripping parser for MediaWiki-style template markup.
//!
//! The parser converts a wikitext string into a tree of [`Node`]s covering
//! templates, parameters, internal and external links, comments, and escape
//! tags. Every node records the byte span of its source text, and
//! [`Tree::serialize`] reconstructs the input exactly: for any input `s`,
//! `parse(s).serialize() == s`.
//!
//! Parsing is total. Unterminated constructs degrade to plain text instead
//! of failing, because the dialect is applied to loosely structured wiki
//! prose where strict grammar violations are routine.

pub use codemap::{FileMap, LineCol, Span, Spanned};
pub use config::Configuration;
use core::fmt;

mod codemap;
mod config;
pub mod helpers;
pub mod inspectors;
mod parser;
mod serializer;
#[cfg(test)]
mod tests;
pub mod visit;

/// Parses `source` into a node tree using the stock [`Configuration`].
pub fn parse(source: &str) -> Tree<'_> {
    Parser::new(&Configuration::DEFAULT).parse(source)
}

/// A wikitext parser.
#[derive(Clone, Copy, Debug)]
pub struct Parser<'a> {
    /// The configuration for the parser.
    config: &'a Configuration,
}

impl<'a> Parser<'a> {
    /// Creates a new parser with the given configuration.
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Parses wikitext from `source` into a node tree.
    pub fn parse<'s>(&self, source: &'s str) -> Tree<'s> {
        Tree {
            root: parser::parse_document(source, self.config),
            source,
        }
    }
}

/// The result of a parse: a root node list plus the source it was parsed
/// from.
#[derive(Clone, Debug)]
pub struct Tree<'a> {
    /// The source string the spans of `root` point into.
    source: &'a str,
    /// The root node list. Concatenating the serialization of every node
    /// reproduces `source` exactly.
    root: Vec<Spanned<Node>>,
}

impl<'a> Tree<'a> {
    /// The source string this tree was parsed from.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The root node list.
    pub fn root(&self) -> &[Spanned<Node>] {
        &self.root
    }

    /// Serializes the whole tree back to wikitext.
    ///
    /// The result is byte-identical to [`Tree::source`]; the value of this
    /// method over cloning the source is that it is computed structurally
    /// from the nodes, so trees remain serializable under programmatic
    /// inspection and node-level extraction.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        // writing to a String is infallible
        self.serialize_nodes(&self.root, &mut out).unwrap();
        out
    }

    /// Serializes a single node into `out`, reproducing its exact source
    /// span.
    pub fn serialize_node(&self, node: &Spanned<Node>, out: &mut impl fmt::Write) -> fmt::Result {
        let mut serializer = serializer::Serializer::new(self.source, out);
        visit::visit_node(&mut serializer, node)
    }

    /// Serializes a node list into `out`.
    pub fn serialize_nodes(
        &self,
        nodes: &[Spanned<Node>],
        out: &mut impl fmt::Write,
    ) -> fmt::Result {
        let mut serializer = serializer::Serializer::new(self.source, out);
        visit::visit_nodes(&mut serializer, nodes)
    }

    /// Resolves a span against the tree's source.
    pub fn raw(&self, span: Span) -> &'a str {
        &self.source[span.into_range()]
    }
}

/// A wikitext node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    /// A run of plain text. The characters live in the span of the
    /// surrounding [`Spanned`].
    Text,
    /// An HTML comment.
    ///
    /// ```wikitext
    /// <!-- note to editors -->
    /// ```
    ///
    /// Comments are semantically transparent but must survive the round
    /// trip, so they stay in the tree wherever they appear, including inside
    /// template names and between parameters.
    Comment {
        /// The raw contents of the comment.
        content: Span,
        /// Whether the comment ran to the end of input without `-->`.
        unclosed: bool,
    },
    /// An escape tag whose interior is never parsed.
    ///
    /// ```wikitext
    /// <nowiki>{{not a template}}</nowiki>
    /// ```
    Nowiki {
        /// The tag name as written in the open tag.
        name: Span,
        /// The raw interior.
        content: Span,
    },
    /// A template call or parser function.
    ///
    /// ```wikitext
    /// {{Template name|numbered argument|key=value}}
    /// ```
    ///
    /// Parser functions (`{{#if: ...}}`, `{{#DPL: ...}}`) and prefix forms
    /// (`{{subst:...}}`, `{{ns:...}}`) are ordinary templates here; the
    /// whole segment before the first top-level `|` is the name, colons and
    /// conditions included. The magic tokens `{{=}}` and `{{!}}` are
    /// zero-parameter templates named `=` and `!`; substituting the literal
    /// character is a semantic-layer concern, so they serialize with their
    /// braces intact.
    Template {
        /// The template name, preserved verbatim including surrounding
        /// whitespace, newlines, and embedded comments.
        name: Vec<Spanned<Node>>,
        /// The template parameters, in source order.
        parameters: Vec<Spanned<Parameter>>,
    },
    /// An internal link or file embed.
    ///
    /// ```wikitext
    /// [[Target|display]]
    /// [[File:Image.png|thumb|30px|caption]]
    /// ```
    ///
    /// Trailing segments are stored without reinterpretation: they are never
    /// split on `=`, and classifying `thumb`, `30px`, `alt=...` and friends
    /// is the consumer's job.
    Link {
        /// The link target.
        target: Vec<Spanned<Node>>,
        /// The pipe-separated segments after the target, in source order.
        segments: Vec<Spanned<Parameter>>,
    },
    /// An external link.
    ///
    /// ```wikitext
    /// [https://example.com/ display text]
    /// ```
    ExternalLink {
        /// The raw interior of the brackets. Use
        /// [`helpers::split_external_link`] to separate the URL from the
        /// display text.
        target: Span,
    },
}

impl Node {
    /// The discriminator for this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Text => NodeKind::Text,
            Node::Comment { .. } => NodeKind::Comment,
            Node::Nowiki { .. } => NodeKind::Nowiki,
            Node::Template { .. } => NodeKind::Template,
            Node::Link { .. } => NodeKind::Link,
            Node::ExternalLink { .. } => NodeKind::ExternalLink,
        }
    }
}

/// The closed set of node discriminators, for filtering without matching
/// full variant payloads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeKind {
    /// A [`Node::Text`].
    Text,
    /// A [`Node::Comment`].
    Comment,
    /// A [`Node::Nowiki`].
    Nowiki,
    /// A [`Node::Template`].
    Template,
    /// A [`Node::Link`].
    Link,
    /// A [`Node::ExternalLink`].
    ExternalLink,
}

/// A template parameter or link segment.
///
/// Template parameters are key-value pairs; link segments are scalar. Both
/// use the same layout so that the serializer and visitors treat them
/// uniformly.
///
/// ```wikitext
/// {{Template|name=value}}
///            ^^^^^^^^^^
///
/// [[File:Image.png|thumb]]
///                  ^^^^^
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parameter {
    /// The parameter body: the name nodes, the `=` delimiter as a
    /// one-character text node, and the value nodes, in source order. For a
    /// positional parameter or link segment, the whole body is the value.
    pub content: Vec<Spanned<Node>>,
    /// The index of the `=` delimiter node in `content`, if one exists. If
    /// present, the value starts at `delimiter + 1`. Otherwise, it starts
    /// at 0.
    pub delimiter: Option<usize>,
}

impl Parameter {
    /// The name part of the parameter, if one exists. Raw: surrounding
    /// whitespace is preserved.
    #[inline]
    pub fn name(&self) -> Option<&[Spanned<Node>]> {
        self.delimiter.map(|delimiter| &self.content[..delimiter])
    }

    /// The value part of the parameter.
    #[inline]
    pub fn value(&self) -> &[Spanned<Node>] {
        let start = self
            .delimiter
            .map_or(0, |delimiter| (delimiter + 1).min(self.content.len()));
        &self.content[start..]
    }

    /// The whole parameter body, delimiter included, in source order.
    #[inline]
    pub fn combined(&self) -> &[Spanned<Node>] {
        &self.content
    }

    /// Returns true if the parameter has a `key=value` shape.
    #[inline]
    pub fn is_named(&self) -> bool {
        self.delimiter.is_some()
    }
}
