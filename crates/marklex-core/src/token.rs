//! Positioned lexical items produced by the block scanner.

use crate::span::Position;

/// Kind of a lexical item.
///
/// The block scanner emits the block-level kinds (`Heading`, `List`,
/// `FencedCodeBlock`, `Text`, `NewLine`, ...). The span-level kinds name the
/// same constructs for consumers that classify inline markup, such as
/// [`Node::kind`](crate::ast::Node::kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// End of input; always the last token, with an empty position.
    EOF,
    /// A line terminator after text, or a whole blank line.
    NewLine,
    /// Block of raw HTML.
    HTML,
    /// ATX or setext heading, including the underline.
    Heading,
    /// Block quote including lazy continuation lines.
    BlockQuote,
    /// A whole list (ordered, unordered or definition).
    List,
    /// One item of a list.
    ListItem,
    /// Fenced code block from opening to closing fence.
    FencedCodeBlock,
    /// Thematic break.
    Hr,
    /// Table header row plus its delimiter row.
    Table,
    /// One table body row.
    TableRow,
    /// One table cell.
    TableCell,
    /// `**strong**`.
    Strong,
    /// `*emphasis*`.
    Italic,
    /// `~~strikethrough~~`.
    Strike,
    /// Code span or code block content.
    Code,
    /// Inline link.
    Link,
    /// Link reference definition or footnote definition.
    DefLink,
    /// Reference-style link.
    RefLink,
    /// `<http://...>` or bare URL.
    AutoLink,
    /// Inline image.
    Image,
    /// Reference-style image.
    RefImage,
    /// Paragraph text of one line (plus indented continuation lines).
    Text,
    /// Hard line break.
    Br,
    /// Table cell separator.
    Pipe,
    /// Indented code block.
    Indent,
}

/// A lexical item: a kind and the byte range it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, pos: Position) -> Self {
        Self { kind, pos }
    }

    /// The text this token covers in `source`.
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.pos.slice(source)
    }
}
