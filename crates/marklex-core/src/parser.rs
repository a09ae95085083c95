//! Document parser: block structure, references and footnotes.
//!
//! [`Parser`] owns the per-call [`Options`]. Each call builds a fresh engine
//! that lexes the input into block tokens, collects reference definitions,
//! then walks the tokens, re-scanning container bodies (quotes, list items,
//! footnotes) as documents of their own and handing inline text to the
//! inline scanner.
//!
//! # Example
//!
//! ```rust
//! use marklex_core::html::{HtmlFlags, HtmlRenderer};
//! use marklex_core::{Extensions, Parser};
//!
//! let parser = Parser::new(Extensions::COMMON);
//! let mut renderer = HtmlRenderer::new(HtmlFlags::empty());
//! let html = parser.render(b"# Hello\n\nWorld\n", &mut renderer).unwrap();
//! assert_eq!(html, "<h1>Hello</h1>\n\n<p>World</p>\n");
//! ```

use std::collections::HashMap;

use log::debug;

use crate::ast::{Document, NodeBuilder};
use crate::chars::{is_blank_line, strip_columns};
use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::inline::TriggerTable;
use crate::lexer::Lexer;
use crate::options::{Extensions, Options, RefOverride};
use crate::refs::{label_key, scan_definition, LabelKey, Reference, ReferenceTable};
use crate::render::{Alignment, Fragment, ListFlags, Renderer, Sink, Streaming};
use crate::scanners::{
    atx_heading, fenced_code, list_marker, quote_prefix, scan_list, setext_heading,
    table_cells, table_head, title_block_end, ItemSpan, ListKind,
};
use crate::span::Position;
use crate::token::{Token, TokenKind};

/// Markdown parser configured with extensions and options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser<'a> {
    options: Options<'a>,
}

impl<'a> Parser<'a> {
    /// Create a parser with the given extensions.
    #[inline]
    pub fn new(extensions: Extensions) -> Self {
        Self {
            options: Options::new(extensions),
        }
    }

    /// Create a parser from complete options.
    #[inline]
    pub fn with_options(options: Options<'a>) -> Self {
        Self { options }
    }

    /// Set the inline recursion cap. Markup nested deeper renders as text.
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.options.max_nesting = max_nesting;
        self
    }

    /// Consult `lookup` before the document's own reference definitions.
    pub fn with_ref_override(mut self, lookup: RefOverride<'a>) -> Self {
        self.options.ref_override = Some(lookup);
        self
    }

    /// The options this parser runs with.
    #[inline]
    pub fn options(&self) -> &Options<'a> {
        &self.options
    }

    /// Convert `input` by streaming every construct through `renderer`.
    ///
    /// Fails only on malformed UTF-8; no partial output is returned.
    pub fn render(&self, input: &[u8], renderer: &mut dyn Renderer) -> Result<String, ParseError> {
        Engine::new(Streaming::new(renderer), self.options).run(input)
    }

    /// Parse `input` into a node tree.
    pub fn parse(&self, input: &[u8]) -> Result<Document, ParseError> {
        let children = Engine::new(NodeBuilder, self.options).run(input)?;
        Ok(Document::new(children))
    }
}

/// A footnote referenced from the text, in order of first reference.
#[derive(Debug, Clone)]
pub(crate) struct Note {
    pub label: String,
    pub text: String,
}

/// Per-document parsing state, generic over where output goes.
pub(crate) struct Engine<'o, S: Sink> {
    pub sink: S,
    pub options: Options<'o>,
    pub extensions: Extensions,
    pub tab_size: usize,
    pub triggers: TriggerTable,
    /// Current inline recursion depth.
    pub nesting: usize,
    /// Current block recursion depth.
    depth: usize,
    /// Set while rendering link text; links do not nest.
    pub inside_link: bool,
    refs: ReferenceTable,
    notes: Vec<Note>,
    note_numbers: HashMap<LabelKey, usize>,
    header_ids: HashMap<String, usize>,
}

impl<'o, S: Sink> Engine<'o, S> {
    pub fn new(sink: S, options: Options<'o>) -> Self {
        let extensions = options.extensions;
        Self {
            sink,
            options,
            extensions,
            tab_size: extensions.tab_size(),
            triggers: TriggerTable::new(extensions),
            nesting: 0,
            depth: 0,
            inside_link: false,
            refs: ReferenceTable::new(),
            notes: Vec::new(),
            note_numbers: HashMap::new(),
            header_ids: HashMap::new(),
        }
    }

    #[inline]
    pub fn has(&self, ext: Extensions) -> bool {
        self.extensions.contains(ext)
    }

    /// Convert a whole document.
    pub fn run(mut self, input: &[u8]) -> Result<S::Output, ParseError> {
        let mut buf = Vec::with_capacity(input.len() + 1);
        buf.extend_from_slice(input);
        if !buf.is_empty() && buf.last() != Some(&b'\n') {
            buf.push(b'\n');
        }

        let title_end = if self.has(Extensions::TITLEBLOCK) {
            title_block_end(&buf)
        } else {
            0
        };
        Cursor::new(&buf).advance_to(title_end)?;
        let tokens = Lexer::new(&buf, self.extensions)
            .starting_at(title_end)
            .tokenize()?;
        let doc = std::str::from_utf8(&buf)
            .map_err(|e| ParseError::invalid_encoding(e.valid_up_to()))?;

        self.collect_references(doc, &tokens);

        let mut out = S::Output::default();
        self.sink.document_header(&mut out);
        if title_end > 0 {
            let text = doc[..title_end].trim_end_matches(['\n', '\r']);
            self.sink
                .title_block(&mut out, Position::new(0, title_end), text);
        }
        self.render_tokens(&mut out, doc, &tokens, false, true)?;
        self.render_footnotes(&mut out)?;
        self.sink.document_footer(&mut out);
        Ok(out)
    }

    /// Reference pre-pass over the top-level definitions.
    fn collect_references(&mut self, doc: &str, tokens: &[Token]) {
        for token in tokens.iter().filter(|t| t.kind == TokenKind::DefLink) {
            self.register_definition(token.text(doc));
        }
        if !self.refs.is_empty() {
            debug!("collected {} reference definitions", self.refs.len());
        }
    }

    fn register_definition(&mut self, text: &str) {
        let footnotes = self.has(Extensions::FOOTNOTES);
        if let Some((_, def)) = scan_definition(text, footnotes, self.tab_size) {
            if def.footnote {
                self.refs.insert_footnote(def.label, def.reference);
            } else {
                self.refs.insert_link(def.label, def.reference);
            }
        }
    }

    /// Resolve a link label, consulting the override first.
    pub fn lookup_link(&self, label: &str) -> Option<Reference> {
        if let Some(found) = self.options.ref_override.and_then(|lookup| lookup(label)) {
            return Some(found);
        }
        self.refs.link(label).cloned()
    }

    /// Number of the footnote `label`, assigning the next number on first
    /// reference. `None` when no such footnote is defined.
    pub fn footnote_number(&mut self, label: &str) -> Option<usize> {
        let key = label_key(label);
        if let Some(&number) = self.note_numbers.get(&key) {
            return Some(number);
        }
        let mut text = match self
            .options
            .ref_override
            .and_then(|lookup| lookup(label))
            .filter(|r| !r.text.is_empty())
        {
            Some(found) => found.text,
            None => self.refs.footnote(label)?.text.clone(),
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        self.notes.push(Note {
            label: label.to_string(),
            text,
        });
        let number = self.notes.len();
        self.note_numbers.insert(key, number);
        debug!("footnote [^{}] numbered {}", label, number);
        Some(number)
    }

    /// Parse `text` as a sequence of blocks.
    ///
    /// `text` must be newline-terminated. `tight` renders paragraphs without
    /// a wrapper; `list_item` lets list markers interrupt paragraphs.
    pub fn blocks(
        &mut self,
        text: &str,
        tight: bool,
        list_item: bool,
    ) -> Result<S::Output, ParseError> {
        if !text.is_empty() && !text.ends_with('\n') {
            return Err(ParseError::missing_newline(Position::new(0, text.len())));
        }
        let mut out = S::Output::default();
        if self.depth >= self.options.max_nesting {
            debug!(
                "block nesting reached {}, keeping the rest as text",
                self.options.max_nesting
            );
            let body = text.trim_end();
            let pos = Position::new(0, body.len());
            let mut content = S::Output::default();
            self.sink.text(&mut content, pos, body);
            self.sink.paragraph(&mut out, pos, content);
            return Ok(out);
        }
        let tokens = Lexer::new(text.as_bytes(), self.extensions)
            .with_list_interrupts(list_item)
            .tokenize()?;
        self.depth += 1;
        let result = self.render_tokens(&mut out, text, &tokens, tight, false);
        self.depth -= 1;
        result.map(|()| out)
    }

    fn render_tokens(
        &mut self,
        out: &mut S::Output,
        text: &str,
        tokens: &[Token],
        tight: bool,
        top_level: bool,
    ) -> Result<(), ParseError> {
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            match token.kind {
                TokenKind::EOF => break,
                TokenKind::Text => {
                    i = self.paragraph(out, text, tokens, i, tight)?;
                    continue;
                }
                TokenKind::Table => {
                    i = self.table(out, text, tokens, i);
                    continue;
                }
                TokenKind::Heading => self.heading(out, text, token.pos),
                TokenKind::Hr => self.sink.hrule(out, token.pos),
                TokenKind::HTML => {
                    let html = token.text(text).trim_end_matches(['\n', '\r']);
                    self.sink.block_html(out, token.pos, html);
                }
                TokenKind::BlockQuote => self.blockquote(out, text, token.pos)?,
                TokenKind::FencedCodeBlock => self.fenced_code(out, text, token.pos),
                TokenKind::Indent => self.indented_code(out, text, token.pos),
                TokenKind::DefLink => self.definition(out, text, token.pos, top_level),
                TokenKind::List => self.list(out, text, token.pos, None)?,
                _ => {}
            }
            i += 1;
        }
        Ok(())
    }

    /// Consecutive `Text` lines form one paragraph. Returns the index of the
    /// first token after it.
    fn paragraph(
        &mut self,
        out: &mut S::Output,
        text: &str,
        tokens: &[Token],
        start: usize,
        tight: bool,
    ) -> Result<usize, ParseError> {
        let mut lines: Vec<Position> = Vec::new();
        let mut i = start;
        loop {
            lines.push(tokens[i].pos);
            i += 1;
            if tokens.get(i).map(|t| t.kind) == Some(TokenKind::NewLine) {
                i += 1;
            }
            if tokens.get(i).map(|t| t.kind) != Some(TokenKind::Text) {
                break;
            }
        }

        if let Some(list) = tokens.get(i).filter(|t| t.kind == TokenKind::List) {
            let is_definition = list_marker(list.text(text).as_bytes(), self.tab_size, true)
                .is_some_and(|m| m.kind == ListKind::Definition);
            if is_definition && self.has(Extensions::DEFINITION_LISTS) {
                if let Some(term) = lines.pop() {
                    if !lines.is_empty() {
                        self.emit_paragraph(out, text, &lines, tight);
                    }
                    self.list(out, text, list.pos, Some(term))?;
                    return Ok(i + 1);
                }
            }
        }

        self.emit_paragraph(out, text, &lines, tight);
        Ok(i)
    }

    fn emit_paragraph(&mut self, out: &mut S::Output, text: &str, lines: &[Position], tight: bool) {
        let (Some(first), Some(last)) = (lines.first(), lines.last()) else {
            return;
        };
        let pos = trim_position(text, Position::new(first.begin, last.end));
        let mut content = S::Output::default();
        self.inline(&mut content, pos.slice(text), pos.begin);
        if tight {
            out.append(content);
        } else {
            self.sink.paragraph(out, pos, content);
        }
    }

    fn heading(&mut self, out: &mut S::Output, text: &str, pos: Position) {
        let bytes = pos.slice(text).as_bytes();
        let (level, content, explicit_id) = if let Some(h) = atx_heading(
            bytes,
            self.has(Extensions::SPACE_HEADERS),
            self.has(Extensions::HEADER_IDS),
            self.tab_size,
        ) {
            (h.level, h.content, h.id)
        } else if let Some(h) = setext_heading(bytes, self.tab_size) {
            (h.level, 0..h.content_end, None)
        } else {
            return;
        };

        let content = trim_position(
            text,
            Position::new(pos.begin + content.start, pos.begin + content.end),
        );
        let raw = content.slice(text);
        let id = match explicit_id {
            Some(range) => Some(text[pos.begin + range.start..pos.begin + range.end].to_string()),
            None if self.has(Extensions::AUTO_HEADER_IDS) => Some(anchor_name(raw)),
            None => None,
        }
        .map(|id| self.unique_header_id(id));

        let mut rendered = S::Output::default();
        self.inline(&mut rendered, raw, content.begin);
        self.sink
            .heading(out, pos, rendered, level, id.as_deref());
    }

    /// Suffix repeated ids with `-1`, `-2`, ...
    fn unique_header_id(&mut self, mut id: String) -> String {
        while let Some(&count) = self.header_ids.get(&id) {
            let candidate = format!("{}-{}", id, count + 1);
            if self.header_ids.contains_key(&candidate) {
                id.push_str("-1");
            } else {
                self.header_ids.insert(id, count + 1);
                id = candidate;
            }
        }
        self.header_ids.insert(id.clone(), 0);
        id
    }

    fn blockquote(
        &mut self,
        out: &mut S::Output,
        text: &str,
        pos: Position,
    ) -> Result<(), ParseError> {
        let block = pos.slice(text);
        let mut content = String::with_capacity(block.len());
        for line in block.split_inclusive('\n') {
            match quote_prefix(line.as_bytes(), self.tab_size) {
                Some(skip) => content.push_str(&line[skip..]),
                None => content.push_str(line),
            }
        }
        if !content.ends_with('\n') {
            content.push('\n');
        }
        let inner = self.blocks(&content, false, false)?;
        self.sink.block_quote(out, pos, inner);
        Ok(())
    }

    fn fenced_code(&mut self, out: &mut S::Output, text: &str, pos: Position) {
        let block = pos.slice(text);
        let Some(code) = fenced_code(block.as_bytes(), self.tab_size) else {
            return;
        };
        let info = &block[code.open.info.clone()];
        let info = (!info.is_empty()).then_some(info);
        self.sink
            .block_code(out, pos, &block[code.body.clone()], info);
    }

    fn indented_code(&mut self, out: &mut S::Output, text: &str, pos: Position) {
        let block = pos.slice(text);
        let mut code = String::with_capacity(block.len());
        for line in block.split_inclusive('\n') {
            if is_blank_line(line.as_bytes()) {
                code.push('\n');
            } else {
                let skip = strip_columns(line.as_bytes(), 4, self.tab_size);
                code.push_str(&line[skip..]);
            }
        }
        if !code.ends_with('\n') {
            code.push('\n');
        }
        self.sink.block_code(out, pos, &code, None);
    }

    /// Top-level definitions were registered by the pre-pass; nested ones
    /// are registered when reached.
    fn definition(&mut self, out: &mut S::Output, text: &str, pos: Position, top_level: bool) {
        let block = pos.slice(text);
        if !top_level {
            self.register_definition(block);
        }
        let footnotes = self.has(Extensions::FOOTNOTES);
        if let Some((_, def)) = scan_definition(block, footnotes, self.tab_size) {
            if !def.footnote {
                self.sink.definition(out, pos, def.label, &def.reference);
            }
        }
    }

    /// Render a list token. `term` is the paragraph line that precedes a
    /// definition list.
    fn list(
        &mut self,
        out: &mut S::Output,
        text: &str,
        pos: Position,
        term: Option<Position>,
    ) -> Result<(), ParseError> {
        let block = pos.slice(text);
        let deflists = self.has(Extensions::DEFINITION_LISTS);
        let Some(scan) = scan_list(block.as_bytes(), self.tab_size, deflists) else {
            return Ok(());
        };

        let mut flags = match scan.kind {
            ListKind::Unordered => ListFlags::empty(),
            ListKind::Ordered => ListFlags::ORDERED,
            ListKind::Definition => ListFlags::DEFINITION,
        };
        if scan.loose {
            flags |= ListFlags::ITEM_CONTAINS_BLOCK;
        }

        let mut items = S::Output::default();
        let mut list_pos = pos;
        if let Some(term) = term {
            let term = trim_position(text, term);
            let mut content = S::Output::default();
            self.inline(&mut content, term.slice(text), term.begin);
            let term_flags = flags | ListFlags::TERM | ListFlags::ITEM_BEGINNING_OF_LIST;
            self.sink.list_item(&mut items, term, content, term_flags);
            list_pos = term.merge(pos);
        }

        let count = scan.items.len();
        for (n, item) in scan.items.iter().enumerate() {
            let body = item_body(block, item, self.tab_size);
            let inner = self.blocks(&body, !scan.loose, true)?;
            let mut item_flags = flags;
            if n == 0 && term.is_none() {
                item_flags |= ListFlags::ITEM_BEGINNING_OF_LIST;
            }
            if n + 1 == count {
                item_flags |= ListFlags::ITEM_END_OF_LIST;
            }
            let item_pos = Position::new(pos.begin + item.lines.start, pos.begin + item.lines.end);
            self.sink.list_item(&mut items, item_pos, inner, item_flags);
        }
        self.sink.list(out, list_pos, items, flags);
        Ok(())
    }

    /// Render a table token and the row tokens after it. Returns the index
    /// of the first token after the table.
    fn table(&mut self, out: &mut S::Output, text: &str, tokens: &[Token], start: usize) -> usize {
        let head_token = tokens[start];
        let Some(head) = table_head(head_token.text(text).as_bytes()) else {
            return start + 1;
        };
        let columns = head.alignments;

        let mut header = S::Output::default();
        let header_begin = head_token.pos.begin;
        let header_pos = Position::new(header_begin, header_begin + head.header_end);
        self.table_row(&mut header, text, header_pos, &columns, true);

        let mut body = S::Output::default();
        let mut end = head_token.pos.end;
        let mut i = start + 1;
        while let Some(row) = tokens.get(i).filter(|t| t.kind == TokenKind::TableRow) {
            self.table_row(&mut body, text, row.pos, &columns, false);
            end = row.pos.end;
            i += 1;
        }

        let pos = Position::new(head_token.pos.begin, end);
        self.sink.table(out, pos, header, body, &columns);
        i
    }

    /// One row, padded with empty cells or truncated to the header width.
    fn table_row(
        &mut self,
        out: &mut S::Output,
        text: &str,
        pos: Position,
        columns: &[Alignment],
        header: bool,
    ) {
        let line = pos.slice(text);
        let cells = table_cells(line.as_bytes());
        let mut row = S::Output::default();
        for (n, &align) in columns.iter().enumerate() {
            let mut content = S::Output::default();
            let cell_pos = match cells.get(n) {
                Some(range) => {
                    let cell = Position::new(pos.begin + range.start, pos.begin + range.end);
                    self.inline(&mut content, &line[range.clone()], cell.begin);
                    cell
                }
                None => Position::at(pos.end),
            };
            self.sink
                .table_cell(&mut row, cell_pos, content, align, header);
        }
        let row_pos = trim_position(text, pos);
        self.sink.table_row(out, row_pos, row);
    }

    /// Render referenced footnotes in order of first reference. Notes that
    /// are only referenced from other notes are picked up as the list grows.
    fn render_footnotes(&mut self, out: &mut S::Output) -> Result<(), ParseError> {
        if self.notes.is_empty() {
            return Ok(());
        }
        let mut items = S::Output::default();
        let mut n = 0;
        while n < self.notes.len() {
            let Note { label, text } = self.notes[n].clone();
            let mut flags = ListFlags::ORDERED;
            if n == 0 {
                flags |= ListFlags::ITEM_BEGINNING_OF_LIST;
            }
            let body = text.trim_end();
            let content = if body.contains("\n\n") {
                flags |= ListFlags::ITEM_CONTAINS_BLOCK;
                self.blocks(&text, false, false)?
            } else {
                let mut content = S::Output::default();
                self.inline(&mut content, body, 0);
                content
            };
            n += 1;
            if n == self.notes.len() {
                flags |= ListFlags::ITEM_END_OF_LIST;
            }
            self.sink.footnote_item(&mut items, &label, n, content, flags);
        }
        self.sink.footnotes(out, items);
        Ok(())
    }
}

/// Text of one list item with the marker removed and continuation lines
/// de-indented by the item's content column. Always newline-terminated.
fn item_body(block: &str, item: &ItemSpan, tab_size: usize) -> String {
    let lines = &block[item.lines.clone()];
    let mut body = String::with_capacity(lines.len());
    for (n, line) in lines.split_inclusive('\n').enumerate() {
        if n == 0 {
            body.push_str(&line[item.marker.content.min(line.len())..]);
        } else if is_blank_line(line.as_bytes()) {
            body.push('\n');
        } else {
            let skip = strip_columns(line.as_bytes(), item.marker.content_column, tab_size);
            body.push_str(&line[skip..]);
        }
    }
    while body.ends_with("\n\n") {
        body.pop();
    }
    if !body.ends_with('\n') {
        body.push('\n');
    }
    body
}

/// Shrink `pos` to exclude surrounding whitespace.
fn trim_position(text: &str, pos: Position) -> Position {
    let bytes = text.as_bytes();
    let mut begin = pos.begin;
    let mut end = pos.end.min(bytes.len());
    while begin < end && bytes[begin].is_ascii_whitespace() {
        begin += 1;
    }
    while end > begin && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    Position::new(begin, end)
}

/// Heading id derived from its text: letters and digits lowercased, every
/// other run collapsed to a single `-` between words.
pub fn anchor_name(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !anchor.is_empty() {
                anchor.push('-');
            }
            pending_dash = false;
            anchor.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    anchor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_names() {
        assert_eq!(anchor_name("Hello, *World*!"), "hello-world");
        assert_eq!(anchor_name("  API v2 -- Überblick "), "api-v2-überblick");
        assert_eq!(anchor_name("***"), "");
    }

    #[test]
    fn item_bodies_drop_the_marker_and_indent() {
        let block = "- first\n  second\n\n  third\n";
        let scan = scan_list(block.as_bytes(), 4, false).unwrap();
        assert_eq!(item_body(block, &scan.items[0], 4), "first\nsecond\n\nthird\n");
    }

    #[test]
    fn blocks_require_a_trailing_newline() {
        use crate::error::ParseErrorKind;
        use crate::html::{HtmlFlags, HtmlRenderer};

        let mut engine = Engine::new(NodeBuilder, Options::default());
        let err = engine.blocks("abc", false, false).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::MissingNewline);
        assert_eq!(err.span(), Position::new(0, 3));
        assert!(engine.blocks("abc\n", false, false).is_ok());
        assert!(engine.blocks("", false, false).is_ok());

        let mut renderer = HtmlRenderer::new(HtmlFlags::empty());
        let mut engine = Engine::new(Streaming::new(&mut renderer), Options::default());
        let err = engine.blocks("> quote\nlast", false, false).unwrap_err();
        assert_eq!(err, ParseError::missing_newline(Position::new(0, 12)));
    }

    #[test]
    fn trim_position_skips_whitespace() {
        assert_eq!(trim_position("  ab \n", Position::new(0, 6)), Position::new(2, 4));
    }
}
