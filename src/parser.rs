//! A recursive descent parser for the wikitext template dialect.
//!
//! There is no separate tokenizer: a cursor walks the input left to right
//! and classifies the next syntactic unit in place. Nested content is parsed
//! by re-entering [`Cursor::parse_nodes`] with a stop set describing which
//! delimiters belong to the enclosing construct, so a `|` inside a nested
//! template is never mistaken for a parameter delimiter of the outer one.
//!
//! Constructs that never terminate degrade instead of failing: the cursor
//! rewinds to the opening marker, the marker's first character is consumed
//! as plain text, and scanning continues from the next character.

use crate::{
    Node, Parameter,
    codemap::{Span, Spanned},
    config::Configuration,
};
use bitflags::bitflags;

bitflags! {
    /// Delimiters that terminate the node list currently being parsed.
    ///
    /// Only delimiters at the current nesting level are ever consulted;
    /// nested constructs consume their own delimiters during recursion.
    #[derive(Clone, Copy, Debug)]
    struct Stops: u8 {
        /// A `|` parameter or segment delimiter.
        const PIPE = 1 << 0;
        /// A `=` key-value delimiter.
        const EQUALS = 1 << 1;
        /// A `}}` template terminator.
        const TEMPLATE_END = 1 << 2;
        /// A `]]` link terminator.
        const LINK_END = 1 << 3;
    }
}

/// Bytes which may begin a construct or terminate the current node list.
/// Runs of anything else are always plain text.
const SIGNIFICANT: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'{' as usize] = true;
    table[b'[' as usize] = true;
    table[b'|' as usize] = true;
    table[b'=' as usize] = true;
    table[b'}' as usize] = true;
    table[b']' as usize] = true;
    table
};

/// Parses a whole document into a root node list.
pub(crate) fn parse_document(source: &str, config: &Configuration) -> Vec<Spanned<Node>> {
    let mut cursor = Cursor {
        source,
        pos: 0,
        depth: 0,
        config,
    };
    let root = cursor.parse_nodes(Stops::empty());
    debug_assert_eq!(cursor.pos, source.len());
    root
}

/// The parser state: a position in the source plus the current nesting
/// depth. Advancing the cursor is the only state the scanner owns.
struct Cursor<'p, 's> {
    /// The source string.
    source: &'s str,
    /// The current byte position.
    pos: usize,
    /// The current construct nesting depth, compared against
    /// [`Configuration::max_depth`].
    depth: usize,
    /// The parser configuration.
    config: &'p Configuration,
}

impl<'p, 's> Cursor<'p, 's> {
    /// The byte at the cursor, if any.
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    /// Returns true if the input at the cursor starts with `prefix`.
    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.source[self.pos..].starts_with(prefix)
    }

    /// Parses nodes until end of input or a delimiter in `stops`.
    ///
    /// Consecutive characters that do not begin a recognized construct are
    /// coalesced into a single [`Node::Text`].
    fn parse_nodes(&mut self, stops: Stops) -> Vec<Spanned<Node>> {
        let mut nodes = Vec::new();
        let mut text_start = self.pos;

        while let Some(byte) = self.peek() {
            if !SIGNIFICANT[usize::from(byte)] {
                self.skip_plain();
                continue;
            }

            if self.at_stop(byte, stops) {
                break;
            }

            if matches!(byte, b'<' | b'{' | b'[') {
                let construct_start = self.pos;
                if let Some(node) = self.try_construct() {
                    push_text(&mut nodes, text_start, construct_start);
                    nodes.push(node);
                    text_start = self.pos;
                    continue;
                }
            }

            // a significant byte that is plain text in this context
            self.pos += 1;
        }

        push_text(&mut nodes, text_start, self.pos);
        nodes
    }

    /// Advances past a run of bytes that can only be plain text.
    fn skip_plain(&mut self) {
        let rest = &self.source.as_bytes()[self.pos..];
        self.pos += rest
            .iter()
            .position(|&byte| SIGNIFICANT[usize::from(byte)])
            .unwrap_or(rest.len());
    }

    /// Returns true if the byte at the cursor terminates the current node
    /// list.
    fn at_stop(&self, byte: u8, stops: Stops) -> bool {
        match byte {
            b'|' => stops.contains(Stops::PIPE),
            b'=' => stops.contains(Stops::EQUALS),
            b'}' => stops.contains(Stops::TEMPLATE_END) && self.starts_with("}}"),
            b']' => stops.contains(Stops::LINK_END) && self.starts_with("]]"),
            _ => false,
        }
    }

    /// Attempts to parse the construct beginning at the cursor. Longest and
    /// most specific match wins: comment, escape tag, template, internal
    /// link, external link. Returns `None`, with the cursor unmoved, when
    /// the marker at the cursor does not form a complete construct.
    fn try_construct(&mut self) -> Option<Spanned<Node>> {
        match self.peek()? {
            b'<' => self.try_comment().or_else(|| self.try_escape_tag()),
            b'{' if self.starts_with("{{") => self.try_template(),
            b'[' if self.starts_with("[[") => self.try_link(),
            b'[' => self.try_external_link(),
            _ => None,
        }
    }

    /// Parses an HTML comment.
    ///
    /// The first `-->` always closes the comment; comments do not nest. A
    /// comment with no terminator runs to the end of input and is flagged
    /// unclosed.
    fn try_comment(&mut self) -> Option<Spanned<Node>> {
        if !self.starts_with("<!--") {
            return None;
        }

        let start = self.pos;
        let content_start = start + 4;
        let (content_end, unclosed) =
            match memchr::memmem::find(&self.source.as_bytes()[content_start..], b"-->") {
                Some(offset) => (content_start + offset, false),
                None => (self.source.len(), true),
            };

        self.pos = if unclosed {
            content_end
        } else {
            content_end + 3
        };
        Some(Spanned::new(
            Node::Comment {
                content: Span::new(content_start, content_end),
                unclosed,
            },
            start,
            self.pos,
        ))
    }

    /// Parses an escape tag such as `<nowiki>...</nowiki>`.
    ///
    /// The interior is literal text and is never re-parsed. The open tag
    /// must close immediately with `>` or `/>`; the close tag is matched
    /// ASCII case-insensitively and may have whitespace before its `>`. An
    /// open tag with no matching close tag degrades to plain text.
    fn try_escape_tag(&mut self) -> Option<Spanned<Node>> {
        let source = self.source;
        let bytes = source.as_bytes();
        let start = self.pos;

        let name_start = start + 1;
        let mut name_end = name_start;
        while name_end < bytes.len() && bytes[name_end].is_ascii_alphanumeric() {
            name_end += 1;
        }
        let name = &source[name_start..name_end];
        if !self.config.is_escape_tag(name) {
            return None;
        }

        match bytes.get(name_end) {
            // a self-closing tag has no interior
            Some(&b'/') if bytes.get(name_end + 1) == Some(&b'>') => {
                self.pos = name_end + 2;
                return Some(Spanned::new(
                    Node::Nowiki {
                        name: Span::new(name_start, name_end),
                        content: Span::new(self.pos, self.pos),
                    },
                    start,
                    self.pos,
                ));
            }
            Some(&b'>') => {}
            _ => return None,
        }

        let content_start = name_end + 1;
        let mut search = content_start;
        while let Some(offset) = memchr::memchr(b'<', &bytes[search..]) {
            let close_start = search + offset;
            if let Some(close_end) = match_close_tag(source, close_start, name) {
                self.pos = close_end;
                return Some(Spanned::new(
                    Node::Nowiki {
                        name: Span::new(name_start, name_end),
                        content: Span::new(content_start, close_start),
                    },
                    start,
                    self.pos,
                ));
            }
            search = close_start + 1;
        }

        log::debug!("unterminated <{name}> at byte {start}");
        None
    }

    /// Parses a template call.
    fn try_template(&mut self) -> Option<Spanned<Node>> {
        let start = self.pos;
        if self.depth >= self.config.max_depth {
            log::debug!("depth cap reached at byte {start}; treating {{{{ as text");
            return None;
        }

        self.pos += 2;
        self.depth += 1;
        let name = self.parse_nodes(Stops::PIPE | Stops::TEMPLATE_END);
        let mut parameters = Vec::new();
        while self.peek() == Some(b'|') {
            self.pos += 1;
            parameters.push(self.parse_parameter());
        }
        self.depth -= 1;

        if self.starts_with("}}") {
            self.pos += 2;
            Some(Spanned::new(
                Node::Template { name, parameters },
                start,
                self.pos,
            ))
        } else {
            log::debug!("unterminated template at byte {start}");
            self.pos = start;
            None
        }
    }

    /// Parses one template parameter, starting just after its `|`.
    ///
    /// The first top-level `=` splits key from value; everything after it,
    /// including further `=`, stays in the value. The delimiter itself is
    /// kept in the content as a one-character text node so the parameter
    /// serializes verbatim.
    fn parse_parameter(&mut self) -> Spanned<Parameter> {
        let start = self.pos;
        let mut content = self.parse_nodes(Stops::PIPE | Stops::TEMPLATE_END | Stops::EQUALS);
        let mut delimiter = None;

        if self.peek() == Some(b'=') {
            delimiter = Some(content.len());
            content.push(Spanned::new(Node::Text, self.pos, self.pos + 1));
            self.pos += 1;
            content.extend(self.parse_nodes(Stops::PIPE | Stops::TEMPLATE_END));
        }

        Spanned::new(Parameter { content, delimiter }, start, self.pos)
    }

    /// Parses an internal link or file embed.
    fn try_link(&mut self) -> Option<Spanned<Node>> {
        let start = self.pos;
        if self.depth >= self.config.max_depth {
            log::debug!("depth cap reached at byte {start}; treating [[ as text");
            return None;
        }

        self.pos += 2;
        self.depth += 1;
        let target = self.parse_nodes(Stops::PIPE | Stops::LINK_END);
        let mut segments = Vec::new();
        while self.peek() == Some(b'|') {
            self.pos += 1;
            segments.push(self.parse_segment());
        }
        self.depth -= 1;

        if self.starts_with("]]") {
            self.pos += 2;
            Some(Spanned::new(
                Node::Link { target, segments },
                start,
                self.pos,
            ))
        } else {
            log::debug!("unterminated link at byte {start}");
            self.pos = start;
            None
        }
    }

    /// Parses one link segment, starting just after its `|`. Unlike
    /// template parameters, segments are never split on `=`.
    fn parse_segment(&mut self) -> Spanned<Parameter> {
        let start = self.pos;
        let content = self.parse_nodes(Stops::PIPE | Stops::LINK_END);
        Spanned::new(
            Parameter {
                content,
                delimiter: None,
            },
            start,
            self.pos,
        )
    }

    /// Parses an external link `[...]`.
    ///
    /// The interior is raw: it runs to the matching `]`, tracking nested
    /// square bracket pairs, and is stored without reinterpretation.
    fn try_external_link(&mut self) -> Option<Spanned<Node>> {
        let bytes = self.source.as_bytes();
        let start = self.pos;
        let mut pos = start + 1;
        let mut depth = 1_usize;

        while let Some(offset) = memchr::memchr2(b'[', b']', &bytes[pos..]) {
            pos += offset;
            if bytes[pos] == b'[' {
                depth += 1;
            } else {
                depth -= 1;
                if depth == 0 {
                    self.pos = pos + 1;
                    return Some(Spanned::new(
                        Node::ExternalLink {
                            target: Span::new(start + 1, pos),
                        },
                        start,
                        self.pos,
                    ));
                }
            }
            pos += 1;
        }

        log::debug!("unterminated external link at byte {start}");
        None
    }
}

/// Matches `</name>` at `pos`, ASCII case-insensitively and with optional
/// whitespace before the `>`, returning the position after the `>`.
fn match_close_tag(source: &str, pos: usize, name: &str) -> Option<usize> {
    let bytes = source.as_bytes();
    if bytes.get(pos + 1) != Some(&b'/') {
        return None;
    }

    let name_start = pos + 2;
    let name_end = name_start + name.len();
    if !source
        .get(name_start..name_end)
        .is_some_and(|close| close.eq_ignore_ascii_case(name))
    {
        return None;
    }

    let mut end = name_end;
    while bytes.get(end).is_some_and(u8::is_ascii_whitespace) {
        end += 1;
    }
    (bytes.get(end) == Some(&b'>')).then(|| end + 1)
}

/// Appends a text node covering `start..end`, if the range is not empty.
fn push_text(nodes: &mut Vec<Spanned<Node>>, start: usize, end: usize) {
    if start < end {
        nodes.push(Spanned::new(Node::Text, start, end));
    }
}
