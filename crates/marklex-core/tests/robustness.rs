//! Integration tests for malformed, hostile and noisy input

use marklex_core::ast::Node;
use marklex_core::html::{escape_html, HtmlFlags, HtmlRenderer};
use marklex_core::{
    markdown_basic, markdown_common, parse, render, Extensions, Options, ParseError,
    ParseErrorKind, Parser,
};
use proptest::prelude::*;
use pulldown_cmark::{Event, Options as MdOptions, Parser as MdParser, Tag};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Encoding Tests
// ============================================================================

#[test]
fn test_invalid_utf8_is_reported() {
    init_logging();
    let err = markdown_basic(b"ok\n\xff\n").unwrap_err();
    assert_eq!(err, ParseError::InvalidEncoding { offset: 3 });
    assert_eq!(err.kind(), ParseErrorKind::InvalidEncoding);
    assert_eq!(err.span().begin, 3);
}

#[test]
fn test_invalid_utf8_inside_block() {
    let err = markdown_basic(b"# a\xffb\n").unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::InvalidEncoding);
    assert!(parse(b"# a\xffb\n", &Options::default()).is_err());
}

#[test]
fn test_invalid_utf8_message() {
    let err = markdown_basic(b"\xc3").unwrap_err();
    assert_eq!(err.to_string(), "invalid UTF-8 sequence at byte 0");
}

#[test]
fn test_multibyte_text_survives() {
    assert_eq!(
        markdown_basic("# Überblick\n\n*日本語* ok\n".as_bytes()).unwrap(),
        "<h1>Überblick</h1>\n\n<p><em>日本語</em> ok</p>\n"
    );
}

// ============================================================================
// Nesting Tests
// ============================================================================

#[test]
fn test_deep_blockquotes() {
    init_logging();
    let input = format!("{} x\n", ">".repeat(500));
    let out = markdown_basic(input.as_bytes()).unwrap();
    assert!(out.starts_with("<blockquote>"));
    assert!(out.contains('x'));
}

#[test]
fn test_deep_list_nesting() {
    let mut input = String::new();
    for depth in 0..200 {
        input.push_str(&"  ".repeat(depth));
        input.push_str("- x\n");
    }
    let out = markdown_basic(input.as_bytes()).unwrap();
    assert!(out.starts_with("<ul>"));
    assert!(parse(input.as_bytes(), &Options::default()).is_ok());
}

#[test]
fn test_unbalanced_brackets_and_markers() {
    let brackets = "[".repeat(2000);
    let stars = "*".repeat(5000);
    let ticks = "`".repeat(3000);
    for input in [brackets, stars, ticks] {
        let out = markdown_common(input.as_bytes()).unwrap();
        assert!(!out.is_empty());
    }
}

#[test]
fn test_block_nesting_is_capped() {
    let input = format!("{} x\n", ">".repeat(10));
    let doc = Parser::new(Extensions::empty())
        .with_max_nesting(4)
        .parse(input.as_bytes())
        .unwrap();

    fn quote_depth(nodes: &[Node]) -> usize {
        nodes
            .iter()
            .map(|node| match node {
                Node::BlockQuote { children, .. } => 1 + quote_depth(children),
                other => quote_depth(other.children()),
            })
            .max()
            .unwrap_or(0)
    }
    // four nested block parses below the top level, the rest is text
    assert_eq!(quote_depth(&doc.children), 5);

    let mut leftover = String::new();
    doc.walk(&mut |node| {
        if let Node::Text { text, .. } = node {
            leftover.push_str(text);
        }
    });
    assert!(leftover.starts_with('>'), "{leftover}");
    assert!(leftover.ends_with('x'));
}

// ============================================================================
// Structure Agreement
// ============================================================================

const AGREEMENT_SAMPLE: &str = "# Title

Intro paragraph with *emphasis*.

## Lists

- one
- two
- three

Then the steps:

1. first
2. second

```rust
fn main() {}
```

    indented code

| a | b |
|---|---|
| 1 | 2 |
";

#[derive(Debug, Default, PartialEq, Eq)]
struct Counts {
    headings: u32,
    lists: u32,
    list_items: u32,
    tables: u32,
    code_blocks: u32,
}

fn count_marklex(input: &str) -> Counts {
    let options = Options::new(Extensions::TABLES | Extensions::FENCED_CODE);
    let doc = parse(input.as_bytes(), &options).unwrap();
    let mut counts = Counts::default();
    doc.walk(&mut |node| match node {
        Node::Heading { .. } => counts.headings += 1,
        Node::List { .. } => counts.lists += 1,
        Node::ListItem { .. } => counts.list_items += 1,
        Node::Table { .. } => counts.tables += 1,
        Node::Code { block: true, .. } => counts.code_blocks += 1,
        _ => {}
    });
    counts
}

fn count_pulldown(input: &str) -> Counts {
    let mut counts = Counts::default();
    for event in MdParser::new_ext(input, MdOptions::ENABLE_TABLES) {
        if let Event::Start(tag) = event {
            match tag {
                Tag::Heading { .. } => counts.headings += 1,
                Tag::List(_) => counts.lists += 1,
                Tag::Item => counts.list_items += 1,
                Tag::Table(_) => counts.tables += 1,
                Tag::CodeBlock(_) => counts.code_blocks += 1,
                _ => {}
            }
        }
    }
    counts
}

#[test]
fn test_block_structure_matches_pulldown() {
    let ours = count_marklex(AGREEMENT_SAMPLE);
    assert_eq!(
        ours,
        Counts {
            headings: 2,
            lists: 2,
            list_items: 5,
            tables: 1,
            code_blocks: 2,
        }
    );
    assert_eq!(ours, count_pulldown(AGREEMENT_SAMPLE));
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_escape_is_identity_without_specials(text in "[^&<>\"]{0,64}") {
        prop_assert_eq!(escape_html(&text), text);
    }

    #[test]
    fn prop_render_never_fails_on_text(input in "[a-z0-9 #*_`>\\[\\]()!<&|~:=\n-]{0,200}") {
        let mut renderer = HtmlRenderer::new(HtmlFlags::TOC | HtmlFlags::USE_SMARTYPANTS);
        let options = Options::new(Extensions::COMMON | Extensions::FOOTNOTES);
        prop_assert!(render(input.as_bytes(), &mut renderer, &options).is_ok());
        prop_assert!(parse(input.as_bytes(), &options).is_ok());
    }

    #[test]
    fn prop_plain_words_become_one_paragraph(words in prop::collection::vec("[a-z]{1,8}", 1..10)) {
        let line = words.join(" ");
        let out = markdown_basic(format!("{line}\n").as_bytes()).unwrap();
        prop_assert_eq!(out, format!("<p>{line}</p>\n"));
    }
}
