//! The renderer capability and the output sinks the parser writes through.
//!
//! A [`Renderer`] has one method per construct. Block-level methods receive
//! their content already rendered; span-level methods return `true` when they
//! produced output and `false` to have the construct's source emitted as
//! literal text instead.
//!
//! # Example
//!
//! ```rust
//! use marklex_core::render::Renderer;
//! use marklex_core::{render, Extensions, Options};
//!
//! /// Keeps only the text of a document.
//! struct PlainText;
//!
//! impl Renderer for PlainText {
//!     fn paragraph(&mut self, out: &mut String, content: &str) {
//!         out.push_str(content);
//!         out.push('\n');
//!     }
//!
//!     fn emphasis(&mut self, out: &mut String, content: &str) -> bool {
//!         out.push_str(content);
//!         true
//!     }
//! }
//!
//! let out = render(b"some *text*\n", &mut PlainText, &Options::new(Extensions::empty())).unwrap();
//! assert_eq!(out, "some text\n");
//! ```

use crate::refs::Reference;
use crate::span::Position;

/// Table column alignment taken from the delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    #[default]
    None,
    Left,
    Right,
    Center,
}

bitflags::bitflags! {
    /// Flags passed to list and list item callbacks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ListFlags: u32 {
        /// Numbered list.
        const ORDERED = 1 << 0;
        /// Definition list.
        const DEFINITION = 1 << 1;
        /// The item is a definition list term.
        const TERM = 1 << 2;
        /// Items are loose: their paragraphs are wrapped.
        const ITEM_CONTAINS_BLOCK = 1 << 3;
        /// First item of its list.
        const ITEM_BEGINNING_OF_LIST = 1 << 4;
        /// Last item of its list.
        const ITEM_END_OF_LIST = 1 << 5;
    }
}

/// What kind of autolink was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AutolinkKind {
    /// A URL.
    Normal,
    /// An e-mail address; the link carries no `mailto:` prefix unless the
    /// source had one.
    Email,
}

/// Strength of an emphasis span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmphasisKind {
    /// `*text*`
    Emphasis,
    /// `**text**`
    Double,
    /// `***text***`
    Triple,
    /// `~~text~~`
    Strikethrough,
}

/// Output callbacks invoked by the parser.
///
/// Every method has a default. Block defaults emit nothing, span defaults
/// decline (so the source is kept as literal text), and `entity` and
/// `normal_text` copy their input unchanged.
#[allow(unused_variables)]
pub trait Renderer {
    // block-level callbacks

    fn block_code(&mut self, out: &mut String, text: &str, info: Option<&str>) {}
    fn block_quote(&mut self, out: &mut String, content: &str) {}
    fn block_html(&mut self, out: &mut String, text: &str) {}
    fn header(&mut self, out: &mut String, content: &str, level: u8, id: Option<&str>) {}
    fn hrule(&mut self, out: &mut String) {}
    fn list(&mut self, out: &mut String, content: &str, flags: ListFlags) {}
    fn list_item(&mut self, out: &mut String, content: &str, flags: ListFlags) {}
    fn paragraph(&mut self, out: &mut String, content: &str) {}
    fn table(&mut self, out: &mut String, header: &str, body: &str, columns: &[Alignment]) {}
    fn table_row(&mut self, out: &mut String, content: &str) {}
    fn table_header_cell(&mut self, out: &mut String, content: &str, align: Alignment) {}
    fn table_cell(&mut self, out: &mut String, content: &str, align: Alignment) {}
    fn footnotes(&mut self, out: &mut String, content: &str) {}
    /// `name` is the footnote label as written in the source.
    fn footnote_item(&mut self, out: &mut String, name: &str, content: &str, flags: ListFlags) {}
    fn title_block(&mut self, out: &mut String, text: &str) {}

    // span-level callbacks

    fn autolink(&mut self, out: &mut String, link: &str, kind: AutolinkKind) -> bool {
        false
    }
    fn code_span(&mut self, out: &mut String, text: &str) -> bool {
        false
    }
    fn double_emphasis(&mut self, out: &mut String, content: &str) -> bool {
        false
    }
    fn emphasis(&mut self, out: &mut String, content: &str) -> bool {
        false
    }
    /// `alt` is the raw source text between the brackets.
    fn image(&mut self, out: &mut String, link: &str, title: Option<&str>, alt: &str) -> bool {
        false
    }
    fn line_break(&mut self, out: &mut String) -> bool {
        false
    }
    fn link(&mut self, out: &mut String, link: &str, title: Option<&str>, content: &str) -> bool {
        false
    }
    fn raw_html_tag(&mut self, out: &mut String, tag: &str) -> bool {
        false
    }
    fn triple_emphasis(&mut self, out: &mut String, content: &str) -> bool {
        false
    }
    fn strikethrough(&mut self, out: &mut String, content: &str) -> bool {
        false
    }
    /// `number` is the 1-based order of first reference.
    fn footnote_ref(&mut self, out: &mut String, name: &str, number: usize) -> bool {
        false
    }

    // low-level callbacks

    fn entity(&mut self, out: &mut String, entity: &str) {
        out.push_str(entity);
    }
    fn normal_text(&mut self, out: &mut String, text: &str) {
        out.push_str(text);
    }

    // document-level callbacks

    fn document_header(&mut self, out: &mut String) {}
    fn document_footer(&mut self, out: &mut String) {}
}

/// Link destination handed to the sinks. `label` is set for reference-style
/// links and images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LinkTarget<'a> {
    pub link: &'a str,
    pub title: Option<&'a str>,
    pub label: Option<&'a str>,
}

/// Accumulated output of a sink.
pub(crate) trait Fragment: Default {
    fn is_empty(&self) -> bool;
    fn append(&mut self, other: Self);
}

impl Fragment for String {
    #[inline]
    fn is_empty(&self) -> bool {
        String::is_empty(self)
    }

    #[inline]
    fn append(&mut self, other: Self) {
        self.push_str(&other);
    }
}

impl<T> Fragment for Vec<T> {
    #[inline]
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }

    #[inline]
    fn append(&mut self, mut other: Self) {
        Vec::append(self, &mut other);
    }
}

/// Where the parser sends what it recognizes.
///
/// Positions are byte ranges into the buffer being parsed at the time of
/// the call. Span methods return `false` when the construct should be
/// emitted as literal text instead.
pub(crate) trait Sink {
    type Output: Fragment;

    fn document_header(&mut self, out: &mut Self::Output);
    fn document_footer(&mut self, out: &mut Self::Output);
    fn title_block(&mut self, out: &mut Self::Output, pos: Position, text: &str);

    fn block_code(&mut self, out: &mut Self::Output, pos: Position, text: &str, info: Option<&str>);
    fn block_quote(&mut self, out: &mut Self::Output, pos: Position, content: Self::Output);
    fn block_html(&mut self, out: &mut Self::Output, pos: Position, text: &str);
    fn heading(
        &mut self,
        out: &mut Self::Output,
        pos: Position,
        content: Self::Output,
        level: u8,
        id: Option<&str>,
    );
    fn hrule(&mut self, out: &mut Self::Output, pos: Position);
    fn list(
        &mut self,
        out: &mut Self::Output,
        pos: Position,
        content: Self::Output,
        flags: ListFlags,
    );
    fn list_item(
        &mut self,
        out: &mut Self::Output,
        pos: Position,
        content: Self::Output,
        flags: ListFlags,
    );
    fn paragraph(&mut self, out: &mut Self::Output, pos: Position, content: Self::Output);
    fn table(
        &mut self,
        out: &mut Self::Output,
        pos: Position,
        header: Self::Output,
        body: Self::Output,
        columns: &[Alignment],
    );
    fn table_row(&mut self, out: &mut Self::Output, pos: Position, content: Self::Output);
    fn table_cell(
        &mut self,
        out: &mut Self::Output,
        pos: Position,
        content: Self::Output,
        align: Alignment,
        header: bool,
    );
    fn footnotes(&mut self, out: &mut Self::Output, content: Self::Output);
    fn footnote_item(
        &mut self,
        out: &mut Self::Output,
        name: &str,
        number: usize,
        content: Self::Output,
        flags: ListFlags,
    );
    fn definition(
        &mut self,
        out: &mut Self::Output,
        pos: Position,
        label: &str,
        reference: &Reference,
    );

    fn autolink(&mut self, out: &mut Self::Output, pos: Position, link: &str, kind: AutolinkKind)
        -> bool;
    fn code_span(&mut self, out: &mut Self::Output, pos: Position, text: &str) -> bool;
    fn emphasis(
        &mut self,
        out: &mut Self::Output,
        pos: Position,
        content: Self::Output,
        kind: EmphasisKind,
    ) -> bool;
    fn image(&mut self, out: &mut Self::Output, pos: Position, target: &LinkTarget<'_>, alt: &str)
        -> bool;
    fn link(
        &mut self,
        out: &mut Self::Output,
        pos: Position,
        target: &LinkTarget<'_>,
        content: Self::Output,
    ) -> bool;
    fn line_break(&mut self, out: &mut Self::Output, pos: Position) -> bool;
    fn raw_html(&mut self, out: &mut Self::Output, pos: Position, tag: &str) -> bool;
    fn footnote_ref(&mut self, out: &mut Self::Output, pos: Position, name: &str, number: usize)
        -> bool;
    fn entity(&mut self, out: &mut Self::Output, pos: Position, text: &str);
    fn text(&mut self, out: &mut Self::Output, pos: Position, text: &str);

    /// Called after a span was accepted, with the source text it covers.
    fn span_source(&mut self, _out: &mut Self::Output, _source: &str) {}
}

/// Adapts a [`Renderer`] to the parser: output is markup in a `String`.
pub(crate) struct Streaming<'r> {
    renderer: &'r mut dyn Renderer,
}

impl<'r> Streaming<'r> {
    pub fn new(renderer: &'r mut dyn Renderer) -> Self {
        Self { renderer }
    }
}

impl Sink for Streaming<'_> {
    type Output = String;

    fn document_header(&mut self, out: &mut String) {
        self.renderer.document_header(out);
    }

    fn document_footer(&mut self, out: &mut String) {
        self.renderer.document_footer(out);
    }

    fn title_block(&mut self, out: &mut String, _pos: Position, text: &str) {
        self.renderer.title_block(out, text);
    }

    fn block_code(&mut self, out: &mut String, _pos: Position, text: &str, info: Option<&str>) {
        self.renderer.block_code(out, text, info);
    }

    fn block_quote(&mut self, out: &mut String, _pos: Position, content: String) {
        self.renderer.block_quote(out, &content);
    }

    fn block_html(&mut self, out: &mut String, _pos: Position, text: &str) {
        self.renderer.block_html(out, text);
    }

    fn heading(
        &mut self,
        out: &mut String,
        _pos: Position,
        content: String,
        level: u8,
        id: Option<&str>,
    ) {
        self.renderer.header(out, &content, level, id);
    }

    fn hrule(&mut self, out: &mut String, _pos: Position) {
        self.renderer.hrule(out);
    }

    fn list(&mut self, out: &mut String, _pos: Position, content: String, flags: ListFlags) {
        self.renderer.list(out, &content, flags);
    }

    fn list_item(&mut self, out: &mut String, _pos: Position, content: String, flags: ListFlags) {
        self.renderer.list_item(out, &content, flags);
    }

    fn paragraph(&mut self, out: &mut String, _pos: Position, content: String) {
        self.renderer.paragraph(out, &content);
    }

    fn table(
        &mut self,
        out: &mut String,
        _pos: Position,
        header: String,
        body: String,
        columns: &[Alignment],
    ) {
        self.renderer.table(out, &header, &body, columns);
    }

    fn table_row(&mut self, out: &mut String, _pos: Position, content: String) {
        self.renderer.table_row(out, &content);
    }

    fn table_cell(
        &mut self,
        out: &mut String,
        _pos: Position,
        content: String,
        align: Alignment,
        header: bool,
    ) {
        if header {
            self.renderer.table_header_cell(out, &content, align);
        } else {
            self.renderer.table_cell(out, &content, align);
        }
    }

    fn footnotes(&mut self, out: &mut String, content: String) {
        self.renderer.footnotes(out, &content);
    }

    fn footnote_item(
        &mut self,
        out: &mut String,
        name: &str,
        _number: usize,
        content: String,
        flags: ListFlags,
    ) {
        self.renderer.footnote_item(out, name, &content, flags);
    }

    fn definition(
        &mut self,
        _out: &mut String,
        _pos: Position,
        _label: &str,
        _reference: &Reference,
    ) {
    }

    fn autolink(
        &mut self,
        out: &mut String,
        _pos: Position,
        link: &str,
        kind: AutolinkKind,
    ) -> bool {
        self.renderer.autolink(out, link, kind)
    }

    fn code_span(&mut self, out: &mut String, _pos: Position, text: &str) -> bool {
        self.renderer.code_span(out, text)
    }

    fn emphasis(
        &mut self,
        out: &mut String,
        _pos: Position,
        content: String,
        kind: EmphasisKind,
    ) -> bool {
        match kind {
            EmphasisKind::Emphasis => self.renderer.emphasis(out, &content),
            EmphasisKind::Double => self.renderer.double_emphasis(out, &content),
            EmphasisKind::Triple => self.renderer.triple_emphasis(out, &content),
            EmphasisKind::Strikethrough => self.renderer.strikethrough(out, &content),
        }
    }

    fn image(
        &mut self,
        out: &mut String,
        _pos: Position,
        target: &LinkTarget<'_>,
        alt: &str,
    ) -> bool {
        self.renderer.image(out, target.link, target.title, alt)
    }

    fn link(
        &mut self,
        out: &mut String,
        _pos: Position,
        target: &LinkTarget<'_>,
        content: String,
    ) -> bool {
        self.renderer.link(out, target.link, target.title, &content)
    }

    fn line_break(&mut self, out: &mut String, _pos: Position) -> bool {
        self.renderer.line_break(out)
    }

    fn raw_html(&mut self, out: &mut String, _pos: Position, tag: &str) -> bool {
        self.renderer.raw_html_tag(out, tag)
    }

    fn footnote_ref(
        &mut self,
        out: &mut String,
        _pos: Position,
        name: &str,
        number: usize,
    ) -> bool {
        self.renderer.footnote_ref(out, name, number)
    }

    fn entity(&mut self, out: &mut String, _pos: Position, text: &str) {
        self.renderer.entity(out, text);
    }

    fn text(&mut self, out: &mut String, _pos: Position, text: &str) {
        self.renderer.normal_text(out, text);
    }
}
