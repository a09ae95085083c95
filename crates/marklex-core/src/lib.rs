//! # Marklex Core
//!
//! A Markdown lexer and parser with a pluggable renderer.
//!
//! Input is scanned once into block tokens; inline text inside each block is
//! scanned on demand. Every construct that is recognized is handed either to
//! a [`Renderer`] (streaming mode, producing a `String`) or to a node
//! builder (producing a [`Document`] tree). Both modes share the same
//! grammar, so they always agree on structure.
//!
//! ## Quick Start
//!
//! ```rust
//! let html = marklex_core::markdown_common(b"Hello, *world*!\n").unwrap();
//! assert_eq!(html, "<p>Hello, <em>world</em>!</p>\n");
//! ```
//!
//! ## Custom renderers
//!
//! ```rust
//! use marklex_core::html::{HtmlFlags, HtmlRenderer};
//! use marklex_core::{render, Extensions, Options};
//!
//! let options = Options::new(Extensions::TABLES | Extensions::FENCED_CODE);
//! let mut renderer = HtmlRenderer::new(HtmlFlags::SKIP_HTML);
//! let html = render(b"<b>hi</b> there\n", &mut renderer, &options).unwrap();
//! assert_eq!(html, "<p>hi there</p>\n");
//! ```
//!
//! ## Node trees
//!
//! ```rust
//! use marklex_core::ast::render_tree;
//! use marklex_core::html::{HtmlFlags, HtmlRenderer};
//! use marklex_core::{parse, Options};
//!
//! let doc = parse(b"# Title\n\n- a\n- b\n", &Options::default()).unwrap();
//! assert_eq!(doc.children.len(), 2);
//!
//! let html = render_tree(&doc, &mut HtmlRenderer::new(HtmlFlags::empty()));
//! assert_eq!(html, "<h1>Title</h1>\n\n<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
//! ```
//!
//! ## Errors
//!
//! Conversion fails only on malformed UTF-8. Constructs that do not match
//! fall back to a less specific reading and, ultimately, to literal text.

pub mod ast;
pub mod chars;
pub mod cursor;
pub mod error;
pub mod html;
mod inline;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod refs;
pub mod render;
pub mod scanners;
pub mod smartypants;
pub mod span;
pub mod token;

pub use ast::{render_tree, Document, Node};
pub use error::{ParseError, ParseErrorKind};
pub use html::{HtmlFlags, HtmlRenderer};
pub use lexer::{tokenize, Lexer};
pub use options::{Extensions, Options, RefOverride, DEFAULT_MAX_NESTING};
pub use parser::Parser;
pub use refs::Reference;
pub use render::{Alignment, AutolinkKind, EmphasisKind, ListFlags, Renderer};
pub use span::Position;
pub use token::{Token, TokenKind};

/// Convert `input` by streaming every construct through `renderer`.
///
/// The whole document is converted or, on malformed UTF-8, nothing is.
pub fn render(
    input: &[u8],
    renderer: &mut dyn Renderer,
    options: &Options<'_>,
) -> Result<String, ParseError> {
    Parser::with_options(*options).render(input, renderer)
}

/// Parse `input` into a node tree.
pub fn parse(input: &[u8], options: &Options<'_>) -> Result<Document, ParseError> {
    Parser::with_options(*options).parse(input)
}

/// Plain Markdown to HTML: no extensions, no renderer flags.
pub fn markdown_basic(input: &[u8]) -> Result<String, ParseError> {
    let mut renderer = HtmlRenderer::new(HtmlFlags::empty());
    render(input, &mut renderer, &Options::new(Extensions::empty()))
}

/// Markdown to HTML with the common extensions and renderer flags.
pub fn markdown_common(input: &[u8]) -> Result<String, ParseError> {
    let mut renderer = HtmlRenderer::new(HtmlFlags::COMMON);
    render(input, &mut renderer, &Options::new(Extensions::COMMON))
}
