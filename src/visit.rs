//! Helper trait for implementing node tree visitors.
//!
//! Default methods walk the whole tree, so an implementation only needs to
//! override the node kinds it cares about. Each default delegates to a free
//! function of the same name so that an override can still descend into its
//! children afterwards.

use crate::{
    Node, Parameter, Tree,
    codemap::{Span, Spanned},
};

/// A trait for visiting the nodes of a parsed tree.
pub trait Visitor<'tt, E> {
    /// Returns the source code of the node tree.
    fn source(&self) -> &'tt str;

    /// Visits every root node of a [`Tree`].
    #[inline]
    fn visit_tree(&mut self, tree: &'tt Tree<'_>) -> Result<(), E> {
        self.visit_nodes(tree.root())
    }

    /// Visits a node list in order.
    #[inline]
    fn visit_nodes(&mut self, nodes: &'tt [Spanned<Node>]) -> Result<(), E> {
        visit_nodes(self, nodes)
    }

    /// Visits a single node, dispatching on its kind.
    #[inline]
    fn visit_node(&mut self, node: &'tt Spanned<Node>) -> Result<(), E> {
        visit_node(self, node)
    }

    /// Visits a [`Node::Text`].
    #[inline]
    fn visit_text(&mut self, _span: Span, _text: &'tt str) -> Result<(), E> {
        Ok(())
    }

    /// Visits a [`Node::Comment`].
    #[inline]
    fn visit_comment(&mut self, _span: Span, _content: &'tt str, _unclosed: bool) -> Result<(), E> {
        Ok(())
    }

    /// Visits a [`Node::Nowiki`]. The name and content are passed as spans
    /// so implementations can recover the raw open and close tags from the
    /// node span.
    #[inline]
    fn visit_nowiki(&mut self, _span: Span, _name: Span, _content: Span) -> Result<(), E> {
        Ok(())
    }

    /// Visits a [`Node::Template`].
    #[inline]
    fn visit_template(
        &mut self,
        span: Span,
        name: &'tt [Spanned<Node>],
        parameters: &'tt [Spanned<Parameter>],
    ) -> Result<(), E> {
        visit_template(self, span, name, parameters)
    }

    /// Visits one [`Parameter`] of a template or link.
    #[inline]
    fn visit_parameter(&mut self, span: Span, parameter: &'tt Parameter) -> Result<(), E> {
        visit_parameter(self, span, parameter)
    }

    /// Visits a [`Node::Link`].
    #[inline]
    fn visit_link(
        &mut self,
        span: Span,
        target: &'tt [Spanned<Node>],
        segments: &'tt [Spanned<Parameter>],
    ) -> Result<(), E> {
        visit_link(self, span, target, segments)
    }

    /// Visits a [`Node::ExternalLink`].
    #[inline]
    fn visit_external_link(&mut self, _span: Span, _target: &'tt str) -> Result<(), E> {
        Ok(())
    }
}

/// Visits a node list in order.
pub fn visit_nodes<'tt, E, V>(visitor: &mut V, nodes: &'tt [Spanned<Node>]) -> Result<(), E>
where
    V: Visitor<'tt, E> + ?Sized,
{
    for node in nodes {
        visitor.visit_node(node)?;
    }
    Ok(())
}

/// Dispatches a single node to the matching visitor method.
pub fn visit_node<'tt, E, V>(visitor: &mut V, node: &'tt Spanned<Node>) -> Result<(), E>
where
    V: Visitor<'tt, E> + ?Sized,
{
    let source = visitor.source();
    match &node.node {
        Node::Text => visitor.visit_text(node.span, &source[node.span.into_range()]),
        Node::Comment { content, unclosed } => {
            visitor.visit_comment(node.span, &source[content.into_range()], *unclosed)
        }
        Node::Nowiki { name, content } => visitor.visit_nowiki(node.span, *name, *content),
        Node::Template { name, parameters } => {
            visitor.visit_template(node.span, name, parameters)
        }
        Node::Link { target, segments } => visitor.visit_link(node.span, target, segments),
        Node::ExternalLink { target } => {
            visitor.visit_external_link(node.span, &source[target.into_range()])
        }
    }
}

/// Walks a template's name and parameters.
pub fn visit_template<'tt, E, V>(
    visitor: &mut V,
    _span: Span,
    name: &'tt [Spanned<Node>],
    parameters: &'tt [Spanned<Parameter>],
) -> Result<(), E>
where
    V: Visitor<'tt, E> + ?Sized,
{
    visitor.visit_nodes(name)?;
    for parameter in parameters {
        visitor.visit_parameter(parameter.span, &parameter.node)?;
    }
    Ok(())
}

/// Walks a parameter's content, delimiter node included.
pub fn visit_parameter<'tt, E, V>(
    visitor: &mut V,
    _span: Span,
    parameter: &'tt Parameter,
) -> Result<(), E>
where
    V: Visitor<'tt, E> + ?Sized,
{
    visitor.visit_nodes(&parameter.content)
}

/// Walks a link's target and segments.
pub fn visit_link<'tt, E, V>(
    visitor: &mut V,
    _span: Span,
    target: &'tt [Spanned<Node>],
    segments: &'tt [Spanned<Parameter>],
) -> Result<(), E>
where
    V: Visitor<'tt, E> + ?Sized,
{
    visitor.visit_nodes(target)?;
    for segment in segments {
        visitor.visit_parameter(segment.span, &segment.node)?;
    }
    Ok(())
}
