//! Helpers for improved debug formatting of node trees.
//!
//! The default `Debug` output of a spanned tree is all byte offsets; these
//! inspectors resolve spans against a [`FileMap`] so that dumps show the
//! actual source text and line/column positions.

use crate::{
    Node, Parameter,
    codemap::{FileMap, Spanned},
};
use core::fmt::{self, Write as _};

/// Returns a debug inspector for a node list using the given source code.
pub fn inspect<'a>(
    input: &'a FileMap<'a>,
    tree: &'a [Spanned<Node>],
) -> VInspector<'a, NodeInspector<'a>> {
    VInspector(input, tree)
}

/// A trait for debug formatting of various parser items.
pub trait TInspector<'a>: fmt::Debug {
    /// The type to be inspected.
    type Inspectee;
    /// Creates a debug formatter for the given object.
    fn inspect(input: &'a FileMap<'a>, object: &'a Self::Inspectee) -> Self
    where
        Self: Sized;
}

/// A debug formatter for slices of parser items.
pub struct VInspector<'a, T>(&'a FileMap<'a>, &'a [T::Inspectee])
where
    T: TInspector<'a>;

impl<'a, T> fmt::Debug for VInspector<'a, T>
where
    T: TInspector<'a>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.1.iter().map(|item| T::inspect(self.0, item)))
            .finish()
    }
}

/// A debug formatter for [`Spanned<Node>`].
pub struct NodeInspector<'a>(&'a FileMap<'a>, &'a Spanned<Node>);

impl<'a> TInspector<'a> for NodeInspector<'a> {
    type Inspectee = Spanned<Node>;

    fn inspect(input: &'a FileMap<'a>, object: &'a Self::Inspectee) -> Self {
        Self(input, object)
    }
}

impl fmt::Debug for NodeInspector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.1.node {
            Node::Text => fmt::Debug::fmt(&&self.0[self.1.span.into_range()], f),
            Node::Comment { content, unclosed } => f
                .debug_struct(&span_name("Comment", self.0, self.1))
                .field("content", &&self.0[content.into_range()])
                .field("unclosed", unclosed)
                .finish(),
            Node::Nowiki { name, content } => f
                .debug_struct(&span_name("Nowiki", self.0, self.1))
                .field("name", &&self.0[name.into_range()])
                .field("content", &&self.0[content.into_range()])
                .finish(),
            Node::Template { name, parameters } => f
                .debug_struct(&span_name("Template", self.0, self.1))
                .field("name", &VInspector::<NodeInspector<'_>>(self.0, name))
                .field(
                    "parameters",
                    &VInspector::<ParameterInspector<'_>>(self.0, parameters),
                )
                .finish(),
            Node::Link { target, segments } => f
                .debug_struct(&span_name("Link", self.0, self.1))
                .field("target", &VInspector::<NodeInspector<'_>>(self.0, target))
                .field(
                    "segments",
                    &VInspector::<ParameterInspector<'_>>(self.0, segments),
                )
                .finish(),
            Node::ExternalLink { target } => f
                .debug_struct(&span_name("ExternalLink", self.0, self.1))
                .field("target", &&self.0[target.into_range()])
                .finish(),
        }
    }
}

/// A debug formatter for [`Parameter`].
pub struct ParameterInspector<'a>(&'a FileMap<'a>, &'a Parameter);

impl<'a> TInspector<'a> for ParameterInspector<'a> {
    type Inspectee = Spanned<Parameter>;

    fn inspect(input: &'a FileMap<'a>, object: &'a Self::Inspectee) -> Self {
        Self(input, object)
    }
}

impl fmt::Debug for ParameterInspector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entry(
                &self
                    .1
                    .name()
                    .map(|name| VInspector::<NodeInspector<'_>>(self.0, name)),
                &VInspector::<NodeInspector<'_>>(self.0, self.1.value()),
            )
            .finish()
    }
}

/// Decorates an item name with the line and column information of the object
/// in the source code.
fn span_name<T>(name: &str, input: &FileMap<'_>, spanned: &Spanned<T>) -> String {
    let start = input.find_line_col(spanned.span.start);
    let end = input.find_line_col(spanned.span.end);
    let mut out = format!("{name} @ {start}..");
    if start.line == end.line {
        write!(out, "{}", end.column)
    } else {
        write!(out, "{}:{}", end.line, end.column)
    }
    .unwrap();
    out
}
