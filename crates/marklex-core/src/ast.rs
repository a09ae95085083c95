//! Node tree produced by [`Parser::parse`](crate::Parser::parse).
//!
//! The tree is built by the same block and inline scanners that drive a
//! [`Renderer`] in streaming mode, so the two outputs never disagree about
//! structure. [`render_tree`] walks a finished tree and feeds a renderer.
//!
//! - **Owned**: nodes own their text; a tree outlives the input buffer.
//! - **Positioned**: every node carries the byte range it was scanned from.
//!   Nodes inside block quotes, list items and footnotes are positioned in
//!   the de-prefixed text of their container.
//!
//! # Example
//!
//! ```rust
//! use marklex_core::ast::Node;
//! use marklex_core::{Extensions, Parser};
//!
//! let doc = Parser::new(Extensions::empty()).parse(b"# Title\n").unwrap();
//! match &doc.children[0] {
//!     Node::Heading { level, children, .. } => {
//!         assert_eq!(*level, 1);
//!         assert_eq!(children.len(), 1);
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use crate::refs::Reference;
use crate::render::{Alignment, AutolinkKind, EmphasisKind, LinkTarget, ListFlags, Renderer, Sink};
use crate::span::Position;
use crate::token::TokenKind;

/// A parsed document.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    /// Top-level nodes in document order, followed by the footnotes.
    pub children: Vec<Node>,
}

impl Document {
    #[inline]
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Visit every node depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        fn go<'a>(nodes: &'a [Node], visit: &mut dyn FnMut(&'a Node)) {
            for node in nodes {
                visit(node);
                if let Node::Table { header, body, .. } = node {
                    go(header, visit);
                    go(body, visit);
                } else {
                    go(node.children(), visit);
                }
            }
        }
        go(&self.children, visit);
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Node {
    /// Plain text.
    Text { pos: Position, text: String },
    /// Character entity such as `&amp;`, kept verbatim.
    Entity { pos: Position, text: String },
    Paragraph { pos: Position, children: Vec<Node> },
    Emphasis {
        pos: Position,
        kind: EmphasisKind,
        children: Vec<Node>,
        source: String,
    },
    Heading {
        pos: Position,
        /// 1 to 6.
        level: u8,
        id: Option<String>,
        children: Vec<Node>,
    },
    /// Hard line break.
    Br { pos: Position, source: String },
    /// Thematic break.
    Hr { pos: Position },
    Image {
        pos: Position,
        link: String,
        title: Option<String>,
        alt: String,
        source: String,
    },
    /// Image whose destination came from a reference definition.
    RefImage {
        pos: Position,
        label: String,
        link: String,
        title: Option<String>,
        alt: String,
        source: String,
    },
    List {
        pos: Position,
        flags: ListFlags,
        children: Vec<Node>,
    },
    ListItem {
        pos: Position,
        flags: ListFlags,
        children: Vec<Node>,
    },
    Link {
        pos: Position,
        link: String,
        title: Option<String>,
        children: Vec<Node>,
        source: String,
    },
    /// Link whose destination came from a reference definition.
    RefLink {
        pos: Position,
        label: String,
        link: String,
        title: Option<String>,
        children: Vec<Node>,
        source: String,
    },
    AutoLink {
        pos: Position,
        link: String,
        kind: AutolinkKind,
        source: String,
    },
    /// Link reference definition. Renders nothing.
    DefLink {
        pos: Position,
        label: String,
        link: String,
        title: Option<String>,
    },
    Table {
        pos: Position,
        columns: Vec<Alignment>,
        /// The header row.
        header: Vec<Node>,
        /// Body rows.
        body: Vec<Node>,
    },
    Row { pos: Position, children: Vec<Node> },
    Cell {
        pos: Position,
        align: Alignment,
        header: bool,
        children: Vec<Node>,
    },
    /// Code span (`block == false`) or code block.
    Code {
        pos: Position,
        text: String,
        info: Option<String>,
        block: bool,
        /// Markdown the span was scanned from; empty for blocks.
        source: String,
    },
    BlockQuote { pos: Position, children: Vec<Node> },
    /// HTML block (`block == true`) or inline tag.
    Html {
        pos: Position,
        text: String,
        block: bool,
        /// Empty for blocks.
        source: String,
    },
    FootnoteRef {
        pos: Position,
        label: String,
        number: usize,
        source: String,
    },
    /// Rendered after the body when any footnote was referenced.
    Footnotes { children: Vec<Node> },
    FootnoteItem {
        label: String,
        number: usize,
        flags: ListFlags,
        children: Vec<Node>,
    },
    TitleBlock { pos: Position, text: String },
}

impl Node {
    /// Source range of the node. Footnote nodes have no source range of
    /// their own and return an empty position.
    pub fn pos(&self) -> Position {
        match self {
            Node::Text { pos, .. }
            | Node::Entity { pos, .. }
            | Node::Paragraph { pos, .. }
            | Node::Emphasis { pos, .. }
            | Node::Heading { pos, .. }
            | Node::Br { pos, .. }
            | Node::Hr { pos }
            | Node::Image { pos, .. }
            | Node::RefImage { pos, .. }
            | Node::List { pos, .. }
            | Node::ListItem { pos, .. }
            | Node::Link { pos, .. }
            | Node::RefLink { pos, .. }
            | Node::AutoLink { pos, .. }
            | Node::DefLink { pos, .. }
            | Node::Table { pos, .. }
            | Node::Row { pos, .. }
            | Node::Cell { pos, .. }
            | Node::Code { pos, .. }
            | Node::BlockQuote { pos, .. }
            | Node::Html { pos, .. }
            | Node::FootnoteRef { pos, .. }
            | Node::TitleBlock { pos, .. } => *pos,
            Node::Footnotes { .. } | Node::FootnoteItem { .. } => Position::default(),
        }
    }

    /// Child nodes. Tables keep their rows in `header` and `body` instead.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Paragraph { children, .. }
            | Node::Emphasis { children, .. }
            | Node::Heading { children, .. }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::Link { children, .. }
            | Node::RefLink { children, .. }
            | Node::Row { children, .. }
            | Node::Cell { children, .. }
            | Node::BlockQuote { children, .. }
            | Node::Footnotes { children }
            | Node::FootnoteItem { children, .. } => children,
            _ => &[],
        }
    }

    /// The closest lexical kind.
    pub fn kind(&self) -> TokenKind {
        match self {
            Node::Text { .. } | Node::Entity { .. } | Node::Paragraph { .. } => TokenKind::Text,
            Node::Emphasis { kind, .. } => match kind {
                EmphasisKind::Emphasis => TokenKind::Italic,
                EmphasisKind::Double | EmphasisKind::Triple => TokenKind::Strong,
                EmphasisKind::Strikethrough => TokenKind::Strike,
            },
            Node::Heading { .. } | Node::TitleBlock { .. } => TokenKind::Heading,
            Node::Br { .. } => TokenKind::Br,
            Node::Hr { .. } => TokenKind::Hr,
            Node::Image { .. } => TokenKind::Image,
            Node::RefImage { .. } => TokenKind::RefImage,
            Node::List { .. } | Node::Footnotes { .. } => TokenKind::List,
            Node::ListItem { .. } | Node::FootnoteItem { .. } => TokenKind::ListItem,
            Node::Link { .. } => TokenKind::Link,
            Node::RefLink { .. } | Node::FootnoteRef { .. } => TokenKind::RefLink,
            Node::AutoLink { .. } => TokenKind::AutoLink,
            Node::DefLink { .. } => TokenKind::DefLink,
            Node::Table { .. } => TokenKind::Table,
            Node::Row { .. } => TokenKind::TableRow,
            Node::Cell { .. } => TokenKind::TableCell,
            Node::Code { block: true, info: Some(_), .. } => TokenKind::FencedCodeBlock,
            Node::Code { block: true, .. } => TokenKind::Indent,
            Node::Code { .. } => TokenKind::Code,
            Node::BlockQuote { .. } => TokenKind::BlockQuote,
            Node::Html { .. } => TokenKind::HTML,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    /// The source slot of a span node, written once the span is accepted.
    fn source_mut(&mut self) -> Option<&mut String> {
        match self {
            Node::Emphasis { source, .. }
            | Node::Br { source, .. }
            | Node::Image { source, .. }
            | Node::RefImage { source, .. }
            | Node::Link { source, .. }
            | Node::RefLink { source, .. }
            | Node::AutoLink { source, .. }
            | Node::Code { source, block: false, .. }
            | Node::Html { source, block: false, .. }
            | Node::FootnoteRef { source, .. } => Some(source),
            _ => None,
        }
    }

    fn collect_text(&self, text: &mut String) {
        match self {
            Node::Text { text: t, .. } | Node::Entity { text: t, .. } => text.push_str(t),
            Node::Code { text: t, block: false, .. } => text.push_str(t),
            Node::Image { alt, .. } | Node::RefImage { alt, .. } => text.push_str(alt),
            Node::AutoLink { link, .. } => text.push_str(link),
            _ => {
                for child in self.children() {
                    child.collect_text(text);
                }
            }
        }
    }
}

/// Sink that builds nodes instead of markup.
pub(crate) struct NodeBuilder;

impl NodeBuilder {
    fn link_target(target: &LinkTarget<'_>) -> (String, Option<String>) {
        (target.link.to_string(), target.title.map(str::to_string))
    }
}

impl Sink for NodeBuilder {
    type Output = Vec<Node>;

    fn document_header(&mut self, _out: &mut Vec<Node>) {}

    fn document_footer(&mut self, _out: &mut Vec<Node>) {}

    fn title_block(&mut self, out: &mut Vec<Node>, pos: Position, text: &str) {
        out.push(Node::TitleBlock {
            pos,
            text: text.to_string(),
        });
    }

    fn block_code(&mut self, out: &mut Vec<Node>, pos: Position, text: &str, info: Option<&str>) {
        out.push(Node::Code {
            pos,
            text: text.to_string(),
            info: info.map(str::to_string),
            block: true,
            source: String::new(),
        });
    }

    fn block_quote(&mut self, out: &mut Vec<Node>, pos: Position, content: Vec<Node>) {
        out.push(Node::BlockQuote {
            pos,
            children: content,
        });
    }

    fn block_html(&mut self, out: &mut Vec<Node>, pos: Position, text: &str) {
        out.push(Node::Html {
            pos,
            text: text.to_string(),
            block: true,
            source: String::new(),
        });
    }

    fn heading(
        &mut self,
        out: &mut Vec<Node>,
        pos: Position,
        content: Vec<Node>,
        level: u8,
        id: Option<&str>,
    ) {
        out.push(Node::Heading {
            pos,
            level,
            id: id.map(str::to_string),
            children: content,
        });
    }

    fn hrule(&mut self, out: &mut Vec<Node>, pos: Position) {
        out.push(Node::Hr { pos });
    }

    fn list(&mut self, out: &mut Vec<Node>, pos: Position, content: Vec<Node>, flags: ListFlags) {
        out.push(Node::List {
            pos,
            flags,
            children: content,
        });
    }

    fn list_item(
        &mut self,
        out: &mut Vec<Node>,
        pos: Position,
        content: Vec<Node>,
        flags: ListFlags,
    ) {
        out.push(Node::ListItem {
            pos,
            flags,
            children: content,
        });
    }

    fn paragraph(&mut self, out: &mut Vec<Node>, pos: Position, content: Vec<Node>) {
        out.push(Node::Paragraph {
            pos,
            children: content,
        });
    }

    fn table(
        &mut self,
        out: &mut Vec<Node>,
        pos: Position,
        header: Vec<Node>,
        body: Vec<Node>,
        columns: &[Alignment],
    ) {
        out.push(Node::Table {
            pos,
            columns: columns.to_vec(),
            header,
            body,
        });
    }

    fn table_row(&mut self, out: &mut Vec<Node>, pos: Position, content: Vec<Node>) {
        out.push(Node::Row {
            pos,
            children: content,
        });
    }

    fn table_cell(
        &mut self,
        out: &mut Vec<Node>,
        pos: Position,
        content: Vec<Node>,
        align: Alignment,
        header: bool,
    ) {
        out.push(Node::Cell {
            pos,
            align,
            header,
            children: content,
        });
    }

    fn footnotes(&mut self, out: &mut Vec<Node>, content: Vec<Node>) {
        out.push(Node::Footnotes { children: content });
    }

    fn footnote_item(
        &mut self,
        out: &mut Vec<Node>,
        name: &str,
        number: usize,
        content: Vec<Node>,
        flags: ListFlags,
    ) {
        out.push(Node::FootnoteItem {
            label: name.to_string(),
            number,
            flags,
            children: content,
        });
    }

    fn definition(
        &mut self,
        out: &mut Vec<Node>,
        pos: Position,
        label: &str,
        reference: &Reference,
    ) {
        out.push(Node::DefLink {
            pos,
            label: label.to_string(),
            link: reference.link.clone(),
            title: reference.title.clone(),
        });
    }

    fn autolink(
        &mut self,
        out: &mut Vec<Node>,
        pos: Position,
        link: &str,
        kind: AutolinkKind,
    ) -> bool {
        out.push(Node::AutoLink {
            pos,
            link: link.to_string(),
            kind,
            source: String::new(),
        });
        true
    }

    fn code_span(&mut self, out: &mut Vec<Node>, pos: Position, text: &str) -> bool {
        out.push(Node::Code {
            pos,
            text: text.to_string(),
            info: None,
            block: false,
            source: String::new(),
        });
        true
    }

    fn emphasis(
        &mut self,
        out: &mut Vec<Node>,
        pos: Position,
        content: Vec<Node>,
        kind: EmphasisKind,
    ) -> bool {
        out.push(Node::Emphasis {
            pos,
            kind,
            children: content,
            source: String::new(),
        });
        true
    }

    fn image(
        &mut self,
        out: &mut Vec<Node>,
        pos: Position,
        target: &LinkTarget<'_>,
        alt: &str,
    ) -> bool {
        let (link, title) = Self::link_target(target);
        let alt = alt.to_string();
        out.push(match target.label {
            Some(label) => Node::RefImage {
                pos,
                label: label.to_string(),
                link,
                title,
                alt,
                source: String::new(),
            },
            None => Node::Image {
                pos,
                link,
                title,
                alt,
                source: String::new(),
            },
        });
        true
    }

    fn link(
        &mut self,
        out: &mut Vec<Node>,
        pos: Position,
        target: &LinkTarget<'_>,
        content: Vec<Node>,
    ) -> bool {
        let (link, title) = Self::link_target(target);
        out.push(match target.label {
            Some(label) => Node::RefLink {
                pos,
                label: label.to_string(),
                link,
                title,
                children: content,
                source: String::new(),
            },
            None => Node::Link {
                pos,
                link,
                title,
                children: content,
                source: String::new(),
            },
        });
        true
    }

    fn line_break(&mut self, out: &mut Vec<Node>, pos: Position) -> bool {
        out.push(Node::Br {
            pos,
            source: String::new(),
        });
        true
    }

    fn raw_html(&mut self, out: &mut Vec<Node>, pos: Position, tag: &str) -> bool {
        out.push(Node::Html {
            pos,
            text: tag.to_string(),
            block: false,
            source: String::new(),
        });
        true
    }

    fn footnote_ref(
        &mut self,
        out: &mut Vec<Node>,
        pos: Position,
        name: &str,
        number: usize,
    ) -> bool {
        out.push(Node::FootnoteRef {
            pos,
            label: name.to_string(),
            number,
            source: String::new(),
        });
        true
    }

    fn entity(&mut self, out: &mut Vec<Node>, pos: Position, text: &str) {
        out.push(Node::Entity {
            pos,
            text: text.to_string(),
        });
    }

    fn span_source(&mut self, out: &mut Vec<Node>, source: &str) {
        if let Some(slot) = out.last_mut().and_then(Node::source_mut) {
            *slot = source.to_string();
        }
    }

    fn text(&mut self, out: &mut Vec<Node>, pos: Position, text: &str) {
        // adjacent runs (text, escaped character, text) merge into one node
        if let Some(Node::Text { pos: last, text: prev }) = out.last_mut() {
            if last.end == pos.begin {
                last.end = pos.end;
                prev.push_str(text);
                return;
            }
        }
        out.push(Node::Text {
            pos,
            text: text.to_string(),
        });
    }
}

/// Render a parsed document through `renderer`.
///
/// Produces the same output as streaming the source through
/// [`Parser::render`](crate::Parser::render) with the same renderer. Spans
/// the renderer declines are written out as their source text.
pub fn render_tree(doc: &Document, renderer: &mut dyn Renderer) -> String {
    let mut out = String::new();
    renderer.document_header(&mut out);
    for node in &doc.children {
        render_node(node, renderer, &mut out);
    }
    renderer.document_footer(&mut out);
    out
}

fn render_children(nodes: &[Node], renderer: &mut dyn Renderer) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, renderer, &mut out);
    }
    out
}

fn render_node(node: &Node, r: &mut dyn Renderer, out: &mut String) {
    match node {
        Node::Text { text, .. } => r.normal_text(out, text),
        Node::Entity { text, .. } => r.entity(out, text),
        Node::Paragraph { children, .. } => {
            let content = render_children(children, r);
            r.paragraph(out, &content);
        }
        Node::Emphasis { kind, children, source, .. } => {
            let content = render_children(children, r);
            let rendered = match kind {
                EmphasisKind::Emphasis => r.emphasis(out, &content),
                EmphasisKind::Double => r.double_emphasis(out, &content),
                EmphasisKind::Triple => r.triple_emphasis(out, &content),
                EmphasisKind::Strikethrough => r.strikethrough(out, &content),
            };
            if !rendered {
                r.normal_text(out, source);
            }
        }
        Node::Heading { level, id, children, .. } => {
            let content = render_children(children, r);
            r.header(out, &content, *level, id.as_deref());
        }
        Node::Br { source, .. } => {
            if !r.line_break(out) {
                r.normal_text(out, source);
            }
        }
        Node::Hr { .. } => r.hrule(out),
        Node::Image { link, title, alt, source, .. }
        | Node::RefImage { link, title, alt, source, .. } => {
            if !r.image(out, link, title.as_deref(), alt) {
                r.normal_text(out, source);
            }
        }
        Node::List { flags, children, .. } => {
            let content = render_children(children, r);
            r.list(out, &content, *flags);
        }
        Node::ListItem { flags, children, .. } => {
            let content = render_children(children, r);
            r.list_item(out, &content, *flags);
        }
        Node::Link { link, title, children, source, .. }
        | Node::RefLink { link, title, children, source, .. } => {
            let content = render_children(children, r);
            if !r.link(out, link, title.as_deref(), &content) {
                r.normal_text(out, source);
            }
        }
        Node::AutoLink { link, kind, source, .. } => {
            if !r.autolink(out, link, *kind) {
                r.normal_text(out, source);
            }
        }
        Node::DefLink { .. } => {}
        Node::Table { columns, header, body, .. } => {
            let header = render_children(header, r);
            let body = render_children(body, r);
            r.table(out, &header, &body, columns);
        }
        Node::Row { children, .. } => {
            let content = render_children(children, r);
            r.table_row(out, &content);
        }
        Node::Cell { align, header, children, .. } => {
            let content = render_children(children, r);
            if *header {
                r.table_header_cell(out, &content, *align);
            } else {
                r.table_cell(out, &content, *align);
            }
        }
        Node::Code { text, info, block: true, .. } => r.block_code(out, text, info.as_deref()),
        Node::Code { text, source, .. } => {
            if !r.code_span(out, text) {
                r.normal_text(out, source);
            }
        }
        Node::BlockQuote { children, .. } => {
            let content = render_children(children, r);
            r.block_quote(out, &content);
        }
        Node::Html { text, block: true, .. } => r.block_html(out, text),
        Node::Html { text, source, .. } => {
            if !r.raw_html_tag(out, text) {
                r.normal_text(out, source);
            }
        }
        Node::FootnoteRef { label, number, source, .. } => {
            if !r.footnote_ref(out, label, *number) {
                r.normal_text(out, source);
            }
        }
        Node::Footnotes { children } => {
            let content = render_children(children, r);
            r.footnotes(out, &content);
        }
        Node::FootnoteItem { label, flags, children, .. } => {
            let content = render_children(children, r);
            r.footnote_item(out, label, &content, *flags);
        }
        Node::TitleBlock { text, .. } => r.title_block(out, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_text_merges() {
        let mut out = Vec::new();
        let mut builder = NodeBuilder;
        builder.text(&mut out, Position::new(0, 3), "abc");
        builder.text(&mut out, Position::new(3, 5), "*");
        builder.text(&mut out, Position::new(6, 7), "d");
        assert_eq!(
            out,
            vec![
                Node::Text {
                    pos: Position::new(0, 5),
                    text: "abc*".to_string()
                },
                Node::Text {
                    pos: Position::new(6, 7),
                    text: "d".to_string()
                },
            ]
        );
    }

    #[test]
    fn text_content_skips_markup() {
        let node = Node::Paragraph {
            pos: Position::new(0, 9),
            children: vec![
                Node::Text {
                    pos: Position::new(0, 2),
                    text: "a ".to_string(),
                },
                Node::Emphasis {
                    pos: Position::new(2, 5),
                    kind: EmphasisKind::Emphasis,
                    children: vec![Node::Text {
                        pos: Position::new(3, 4),
                        text: "b".to_string(),
                    }],
                    source: "*b*".to_string(),
                },
            ],
        };
        assert_eq!(node.text_content(), "a b");
        assert_eq!(node.kind(), TokenKind::Text);
    }
}
