//! Exact-reconstruction serialization of parsed trees.
//!
//! Every construct is re-emitted from its structural pieces and the raw
//! separators captured at parse time, so the output of a full-tree walk is
//! byte-identical to the original input.

use crate::{
    Node, Parameter,
    codemap::{Span, Spanned},
    visit::{self, Visitor},
};
use core::fmt;

/// A visitor that writes nodes back out as wikitext.
pub(crate) struct Serializer<'tt, W> {
    /// The source the tree's spans point into.
    source: &'tt str,
    /// The serialization target.
    out: W,
}

impl<'tt, W> Serializer<'tt, W>
where
    W: fmt::Write,
{
    /// Creates a new serializer writing to `out`.
    pub fn new(source: &'tt str, out: W) -> Self {
        Self { source, out }
    }
}

impl<'tt, W> Visitor<'tt, fmt::Error> for Serializer<'tt, W>
where
    W: fmt::Write,
{
    fn source(&self) -> &'tt str {
        self.source
    }

    fn visit_text(&mut self, _span: Span, text: &'tt str) -> fmt::Result {
        self.out.write_str(text)
    }

    fn visit_comment(&mut self, _span: Span, content: &'tt str, unclosed: bool) -> fmt::Result {
        self.out.write_str("<!--")?;
        self.out.write_str(content)?;
        if !unclosed {
            self.out.write_str("-->")?;
        }
        Ok(())
    }

    fn visit_nowiki(&mut self, span: Span, _name: Span, content: Span) -> fmt::Result {
        // the open and close tags are the parts of the node span around the
        // content, which keeps their original case and spacing
        self.out.write_str(&self.source[span.start..content.start])?;
        self.out.write_str(&self.source[content.into_range()])?;
        self.out.write_str(&self.source[content.end..span.end])
    }

    fn visit_template(
        &mut self,
        _span: Span,
        name: &'tt [Spanned<Node>],
        parameters: &'tt [Spanned<Parameter>],
    ) -> fmt::Result {
        self.out.write_str("{{")?;
        visit::visit_nodes(self, name)?;
        for parameter in parameters {
            self.out.write_char('|')?;
            visit::visit_nodes(self, &parameter.content)?;
        }
        self.out.write_str("}}")
    }

    fn visit_link(
        &mut self,
        _span: Span,
        target: &'tt [Spanned<Node>],
        segments: &'tt [Spanned<Parameter>],
    ) -> fmt::Result {
        self.out.write_str("[[")?;
        visit::visit_nodes(self, target)?;
        for segment in segments {
            self.out.write_char('|')?;
            visit::visit_nodes(self, &segment.content)?;
        }
        self.out.write_str("]]")
    }

    fn visit_external_link(&mut self, _span: Span, target: &'tt str) -> fmt::Result {
        self.out.write_char('[')?;
        self.out.write_str(target)?;
        self.out.write_char(']')
    }
}
