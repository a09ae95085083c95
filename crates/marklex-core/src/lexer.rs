//! Block scanner: a state machine that splits input into block tokens.
//!
//! The scanner walks the input with a [`Cursor`], so every byte it covers is
//! UTF-8 validated. Each state either recognizes its construct and emits a
//! token spanning it, or falls back to a less specific state; the last
//! fallback is paragraph text. Structural mismatches are never errors.
//!
//! Paragraph text is emitted one line at a time: a `Text` token followed by
//! a `NewLine` token for its terminator. A blank line is a `NewLine` token of
//! its own, so two consecutive `NewLine` tokens end a paragraph.
//!
//! # Example
//!
//! ```rust
//! use marklex_core::lexer::tokenize;
//! use marklex_core::token::TokenKind;
//! use marklex_core::Extensions;
//!
//! let tokens = tokenize(b"# Title\n\ntext\n", Extensions::empty()).unwrap();
//! let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::Heading,
//!         TokenKind::NewLine,
//!         TokenKind::Text,
//!         TokenKind::NewLine,
//!         TokenKind::EOF
//!     ]
//! );
//! ```

use log::{debug, trace};

use crate::chars::{indentation, is_blank_line, line_end};
use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::options::Extensions;
use crate::refs::scan_definition;
use crate::scanners::{
    atx_heading, blockquote_end, fenced_code, hrule_end, html_block_end, indented_code_end,
    is_table_row, list_marker, scan_list, setext_heading, table_head, ListKind,
};
use crate::span::Position;
use crate::token::{Token, TokenKind};

/// Scanner states. `Any` dispatches on the first significant byte of a line;
/// the others try one construct each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Any,
    HorizontalRule,
    List,
    Html,
    BlockQuote,
    DefLink,
    FencedCodeBlock,
    Heading,
    Table,
    Indent,
    Text,
}

/// Tokenize a whole buffer.
pub fn tokenize(input: &[u8], extensions: Extensions) -> Result<Vec<Token>, ParseError> {
    Lexer::new(input, extensions).tokenize()
}

/// Block scanner over one buffer.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    extensions: Extensions,
    tab_size: usize,
    /// The previous line was paragraph text.
    in_paragraph: bool,
    /// List markers may end a paragraph (list item bodies).
    list_interrupts: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a [u8], extensions: Extensions) -> Self {
        Self {
            cursor: Cursor::new(input),
            extensions,
            tab_size: extensions.tab_size(),
            in_paragraph: false,
            list_interrupts: false,
            tokens: Vec::new(),
        }
    }

    /// Start scanning at `offset` instead of the beginning of the buffer.
    /// Token positions still index the whole buffer.
    pub(crate) fn starting_at(mut self, offset: usize) -> Self {
        self.cursor = Cursor::starting_at(self.cursor.bytes(), offset);
        self
    }

    /// Let a list marker end a paragraph without a blank line before it, as
    /// inside a list item where a sublist follows the item text directly.
    pub(crate) fn with_list_interrupts(mut self, enabled: bool) -> Self {
        self.list_interrupts = enabled;
        self
    }

    /// Run the state machine to the end of input. The last token is always
    /// `EOF`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut state = LexState::Any;
        while let Some(next) = self.step(state)? {
            state = next;
        }
        Ok(self.tokens)
    }

    #[inline]
    fn has(&self, ext: Extensions) -> bool {
        self.extensions.contains(ext)
    }

    fn push(&mut self, kind: TokenKind, begin: usize, end: usize) {
        trace!("token {:?} {}..{}", kind, begin, end);
        self.tokens.push(Token::new(kind, Position::new(begin, end)));
    }

    /// Advance to `end` and emit a token spanning from the current offset.
    fn emit(&mut self, kind: TokenKind, end: usize) -> Result<(), ParseError> {
        let begin = self.cursor.offset();
        self.cursor.advance_to(end)?;
        self.push(kind, begin, self.cursor.offset());
        Ok(())
    }

    /// Emit a block token covering `len` bytes and leave paragraph context.
    fn emit_block(&mut self, kind: TokenKind, len: usize) -> Result<Option<LexState>, ParseError> {
        let end = self.cursor.offset() + len;
        self.emit(kind, end)?;
        self.in_paragraph = false;
        Ok(Some(LexState::Any))
    }

    fn step(&mut self, state: LexState) -> Result<Option<LexState>, ParseError> {
        trace!("lex state {:?} at {}", state, self.cursor.offset());
        match state {
            LexState::Any => self.lex_any(),
            LexState::HorizontalRule => self.lex_hrule(),
            LexState::List => self.lex_list(),
            LexState::Html => self.lex_html(),
            LexState::BlockQuote => self.lex_blockquote(),
            LexState::DefLink => self.lex_deflink(),
            LexState::FencedCodeBlock => self.lex_fenced_code(),
            LexState::Heading => self.lex_heading(),
            LexState::Table => self.lex_table(),
            LexState::Indent => self.lex_indent(),
            LexState::Text => self.lex_text(),
        }
    }

    fn lex_any(&mut self) -> Result<Option<LexState>, ParseError> {
        if self.cursor.is_eof() {
            let end = self.cursor.offset();
            self.emit(TokenKind::EOF, end)?;
            return Ok(None);
        }
        let rest = self.cursor.remaining();
        if is_blank_line(rest) {
            return self.emit_block(TokenKind::NewLine, line_end(rest, 0));
        }
        let (columns, skip) = indentation(rest, self.tab_size);
        if columns >= 4 {
            let continues = self.in_paragraph && !self.has(Extensions::NO_EMPTY_LINE_BEFORE_BLOCK);
            return Ok(Some(if continues {
                LexState::Text
            } else {
                LexState::Indent
            }));
        }
        let next = match rest[skip] {
            b'*' | b'-' | b'_' => LexState::HorizontalRule,
            b'+' | b'0'..=b'9' => LexState::List,
            b':' if self.has(Extensions::DEFINITION_LISTS) => LexState::List,
            b'<' => LexState::Html,
            b'>' => LexState::BlockQuote,
            b'[' => LexState::DefLink,
            b'`' | b'~' if self.has(Extensions::FENCED_CODE) => LexState::FencedCodeBlock,
            b'#' => LexState::Heading,
            _ => LexState::Table,
        };
        Ok(Some(next))
    }

    fn lex_hrule(&mut self) -> Result<Option<LexState>, ParseError> {
        match hrule_end(self.cursor.remaining(), self.tab_size) {
            Some(len) => self.emit_block(TokenKind::Hr, len),
            None => {
                debug!("no rule at {}, trying a list", self.cursor.offset());
                Ok(Some(LexState::List))
            }
        }
    }

    fn lex_list(&mut self) -> Result<Option<LexState>, ParseError> {
        let rest = self.cursor.remaining();
        let deflists = self.has(Extensions::DEFINITION_LISTS);
        let Some(marker) = list_marker(rest, self.tab_size, deflists) else {
            return Ok(Some(LexState::Text));
        };
        let allowed = match marker.kind {
            // a definition needs the paragraph line before it as its term
            ListKind::Definition => self.in_paragraph,
            _ => {
                !self.in_paragraph
                    || self.list_interrupts
                    || self.has(Extensions::NO_EMPTY_LINE_BEFORE_BLOCK)
            }
        };
        if !allowed {
            return Ok(Some(LexState::Text));
        }
        match scan_list(rest, self.tab_size, deflists) {
            Some(list) => self.emit_block(TokenKind::List, list.end),
            None => {
                debug!("no list at {}, falling back to text", self.cursor.offset());
                Ok(Some(LexState::Text))
            }
        }
    }

    fn lex_html(&mut self) -> Result<Option<LexState>, ParseError> {
        let lax = self.has(Extensions::LAX_HTML_BLOCKS);
        if self.in_paragraph && !lax {
            return Ok(Some(LexState::Text));
        }
        match html_block_end(self.cursor.remaining(), lax, self.tab_size) {
            Some(len) => self.emit_block(TokenKind::HTML, len),
            None => Ok(Some(if self.in_paragraph {
                LexState::Text
            } else {
                LexState::Table
            })),
        }
    }

    fn lex_blockquote(&mut self) -> Result<Option<LexState>, ParseError> {
        if self.in_paragraph && !self.has(Extensions::NO_EMPTY_LINE_BEFORE_BLOCK) {
            return Ok(Some(LexState::Text));
        }
        let len = blockquote_end(self.cursor.remaining(), self.tab_size);
        if len == 0 {
            return Ok(Some(LexState::Text));
        }
        self.emit_block(TokenKind::BlockQuote, len)
    }

    fn lex_deflink(&mut self) -> Result<Option<LexState>, ParseError> {
        if self.in_paragraph {
            return Ok(Some(LexState::Text));
        }
        let rest = valid_prefix(self.cursor.remaining());
        match scan_definition(rest, self.has(Extensions::FOOTNOTES), self.tab_size) {
            Some((len, _)) => self.emit_block(TokenKind::DefLink, len),
            None => Ok(Some(LexState::Table)),
        }
    }

    fn lex_fenced_code(&mut self) -> Result<Option<LexState>, ParseError> {
        match fenced_code(self.cursor.remaining(), self.tab_size) {
            Some(code) => self.emit_block(TokenKind::FencedCodeBlock, code.end),
            None => {
                debug!("unterminated or invalid fence at {}", self.cursor.offset());
                Ok(Some(LexState::Text))
            }
        }
    }

    fn lex_heading(&mut self) -> Result<Option<LexState>, ParseError> {
        let heading = atx_heading(
            self.cursor.remaining(),
            self.has(Extensions::SPACE_HEADERS),
            self.has(Extensions::HEADER_IDS),
            self.tab_size,
        );
        match heading {
            Some(h) => self.emit_block(TokenKind::Heading, h.end),
            None => Ok(Some(LexState::Text)),
        }
    }

    fn lex_table(&mut self) -> Result<Option<LexState>, ParseError> {
        if self.in_paragraph || !self.has(Extensions::TABLES) {
            return Ok(Some(LexState::Text));
        }
        let Some(head) = table_head(self.cursor.remaining()) else {
            return Ok(Some(LexState::Text));
        };
        self.emit_block(TokenKind::Table, head.end)?;
        while is_table_row(self.cursor.remaining()) {
            let end = self.cursor.offset() + line_end(self.cursor.remaining(), 0);
            self.emit(TokenKind::TableRow, end)?;
        }
        Ok(Some(LexState::Any))
    }

    fn lex_indent(&mut self) -> Result<Option<LexState>, ParseError> {
        let len = indented_code_end(self.cursor.remaining(), self.tab_size);
        self.emit_block(TokenKind::Indent, len)
    }

    fn lex_text(&mut self) -> Result<Option<LexState>, ParseError> {
        if !self.in_paragraph {
            if let Some(heading) = setext_heading(self.cursor.remaining(), self.tab_size) {
                return self.emit_block(TokenKind::Heading, heading.end);
            }
        }

        let begin = self.cursor.offset();
        loop {
            match self.cursor.next()? {
                Some('\n') => {
                    let next = self.cursor.remaining();
                    if !is_blank_line(next) && indentation(next, self.tab_size).0 >= 4 {
                        continue;
                    }
                    self.cursor.backup()?;
                    break;
                }
                Some(_) => {}
                None => break,
            }
        }
        let end = self.cursor.offset();
        self.push(TokenKind::Text, begin, end);
        if !self.cursor.is_eof() {
            let newline = self.cursor.offset() + 1;
            self.emit(TokenKind::NewLine, newline)?;
        }
        self.in_paragraph = true;
        Ok(Some(LexState::Any))
    }
}

/// The longest valid UTF-8 prefix of `bytes`. The cursor reports the error
/// for whatever follows once it is reached.
fn valid_prefix(bytes: &[u8]) -> &str {
    match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    }
}
