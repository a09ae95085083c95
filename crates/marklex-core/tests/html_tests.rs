//! Integration tests for Markdown to HTML conversion

use marklex_core::html::{HtmlFlags, HtmlRenderer};
use marklex_core::{markdown_basic, markdown_common, render, Extensions, Options, Parser};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn html(input: &str, extensions: Extensions, flags: HtmlFlags) -> String {
    let mut renderer = HtmlRenderer::new(flags);
    render(input.as_bytes(), &mut renderer, &Options::new(extensions)).unwrap()
}

fn basic(input: &str) -> String {
    html(input, Extensions::empty(), HtmlFlags::empty())
}

// ============================================================================
// Block Tests
// ============================================================================

#[rstest]
#[case("# Title\n", "<h1>Title</h1>\n")]
#[case("###### Six ######\n", "<h6>Six</h6>\n")]
#[case("a\nb\n", "<p>a\nb</p>\n")]
#[case("a\n\nb\n", "<p>a</p>\n\n<p>b</p>\n")]
#[case("---\n", "<hr>\n")]
#[case("- a\n- b\n", "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n")]
#[case("1. one\n2. two\n", "<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n")]
#[case("- a\n\n- b\n", "<ul>\n<li><p>a</p></li>\n\n<li><p>b</p></li>\n</ul>\n")]
#[case("- a\n  - b\n", "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul></li>\n</ul>\n")]
#[case("> quote\n", "<blockquote>\n<p>quote</p>\n</blockquote>\n")]
#[case("    let x = 1;\n", "<pre><code>let x = 1;\n</code></pre>\n")]
#[case("    a < b\n", "<pre><code>a &lt; b\n</code></pre>\n")]
#[case("<div>\nhi\n</div>\n", "<div>\nhi\n</div>\n")]
#[case("text\n- item\n", "<p>text\n- item</p>\n")]
#[case("no trailing newline", "<p>no trailing newline</p>\n")]
#[case("", "")]
fn test_basic_blocks(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(basic(input), expected);
}

#[rstest]
#[case("Foo *bar*\n=========", "<h1>Foo <em>bar</em></h1>\n")]
#[case("    Foo\n    ---", "<pre><code>Foo\n---\n</code></pre>\n")]
#[case("Foo\n   ----      ", "<h2>Foo</h2>\n")]
#[case("Foo\nbar\n---\n", "<h2>Foo\nbar</h2>\n")]
#[case("Foo\n= =\n", "<p>Foo\n= =</p>\n")]
#[case("Foo\n    ===\n", "<p>Foo\n    ===</p>\n")]
fn test_setext_headings(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(basic(input), expected);
}

#[test]
fn test_dash_item_is_a_list_not_a_rule() {
    assert_eq!(basic("- item\n"), "<ul>\n<li>item</li>\n</ul>\n");
    assert_eq!(basic("- - -\n"), "<hr>\n");
}

// ============================================================================
// Fenced Code Tests
// ============================================================================

#[test]
fn test_fenced_code_with_language() {
    assert_eq!(
        html(
            "```rust\nfn main() {}\n```\n",
            Extensions::FENCED_CODE,
            HtmlFlags::empty()
        ),
        "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
    );
}

#[test]
fn test_tilde_fence() {
    assert_eq!(
        html("~~~\nx\n~~~\n", Extensions::FENCED_CODE, HtmlFlags::empty()),
        "<pre><code>x\n</code></pre>\n"
    );
}

#[rstest]
#[case(3, true)]
#[case(7, true)]
#[case(8, false)]
fn test_fence_length_limit(#[case] count: usize, #[case] code_block: bool) {
    let fence = "`".repeat(count);
    let input = format!("{fence}\ncode\n{fence}\n");
    let out = html(&input, Extensions::FENCED_CODE, HtmlFlags::empty());
    assert_eq!(out.starts_with("<pre><code>"), code_block, "{out}");
}

#[test]
fn test_unterminated_fence_is_text() {
    assert_eq!(
        html("```\ncode\n", Extensions::FENCED_CODE, HtmlFlags::empty()),
        "<p>```\ncode</p>\n"
    );
}

// ============================================================================
// Inline Tests
// ============================================================================

#[rstest]
#[case(
    "*em* **strong** ***both***\n",
    "<p><em>em</em> <strong>strong</strong> <strong><em>both</em></strong></p>\n"
)]
#[case("_under_\n", "<p><em>under</em></p>\n")]
#[case("*foo **bar** baz*\n", "<p><em>foo <strong>bar</strong> baz</em></p>\n")]
#[case("***a** b*\n", "<p><em><strong>a</strong> b</em></p>\n")]
#[case("*a `*` b*\n", "<p><em>a <code>*</code> b</em></p>\n")]
#[case("a * b *\n", "<p>a * b *</p>\n")]
#[case("\\*not\\*\n", "<p>*not*</p>\n")]
#[case("`code`\n", "<p><code>code</code></p>\n")]
#[case("`` a`b ``\n", "<p><code>a`b</code></p>\n")]
#[case("a  \nb\n", "<p>a<br>\nb</p>\n")]
#[case("AT&amp;T &copy; a & b\n", "<p>AT&amp;T &copy; a &amp; b</p>\n")]
#[case("a <b>bold</b>\n", "<p>a <b>bold</b></p>\n")]
#[case("x <!-- note --> y\n", "<p>x <!-- note --> y</p>\n")]
fn test_inline_markup(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(basic(input), expected);
}

#[rstest]
#[case("[a](/u \"t\")\n", "<p><a href=\"/u\" title=\"t\">a</a></p>\n")]
#[case("[a](</my url>)\n", "<p><a href=\"/my url\">a</a></p>\n")]
#[case(
    "[text][bar]\n\n[bar]: /url \"title\"\n",
    "<p><a href=\"/url\" title=\"title\">text</a></p>\n"
)]
#[case("[bar][]\n\n[bar]: /url\n", "<p><a href=\"/url\">bar</a></p>\n")]
#[case("[Bar]\n\n[bar]: /url\n", "<p><a href=\"/url\">Bar</a></p>\n")]
#[case("[text][nope]\n", "<p>[text][nope]</p>\n")]
#[case("![alt](/i.png \"T\")\n", "<p><img src=\"/i.png\" alt=\"alt\" title=\"T\"></p>\n")]
#[case("<http://x.com>\n", "<p><a href=\"http://x.com\">http://x.com</a></p>\n")]
#[case("<me@example.com>\n", "<p><a href=\"mailto:me@example.com\">me@example.com</a></p>\n")]
#[case("[a](/x?b=1&c=2)\n", "<p><a href=\"/x?b=1&amp;c=2\">a</a></p>\n")]
fn test_links(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(basic(input), expected);
}

// ============================================================================
// Extension Tests
// ============================================================================

#[test]
fn test_table() {
    let out = html("a | b\n--|--\n1 | 2\n", Extensions::TABLES, HtmlFlags::empty());
    assert_eq!(
        out,
        "<table>\n<thead>\n<tr>\n<th>a</th>\n<th>b</th>\n</tr>\n</thead>\n\n\
         <tbody>\n<tr>\n<td>1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>\n"
    );
}

#[test]
fn test_table_alignment() {
    let out = html("| a | b | c |\n|:--|--:|:-:|\n", Extensions::TABLES, HtmlFlags::empty());
    assert!(out.contains("<th align=\"left\">a</th>"));
    assert!(out.contains("<th align=\"right\">b</th>"));
    assert!(out.contains("<th align=\"center\">c</th>"));
    assert!(out.contains("<tbody>\n</tbody>"));
}

#[test]
fn test_strikethrough() {
    assert_eq!(
        html("~~gone~~\n", Extensions::STRIKETHROUGH, HtmlFlags::empty()),
        "<p><del>gone</del></p>\n"
    );
    assert_eq!(basic("~~kept~~\n"), "<p>~~kept~~</p>\n");
}

#[test]
fn test_bare_autolink() {
    assert_eq!(
        html("see http://x.com now\n", Extensions::AUTOLINK, HtmlFlags::empty()),
        "<p>see <a href=\"http://x.com\">http://x.com</a> now</p>\n"
    );
}

#[test]
fn test_no_intra_emphasis() {
    assert_eq!(
        html("snake_case_name\n", Extensions::NO_INTRA_EMPHASIS, HtmlFlags::empty()),
        "<p>snake_case_name</p>\n"
    );
}

#[rstest]
#[case(Extensions::HARD_LINE_BREAK, "a\nb\n", "<p>a<br>\nb</p>\n")]
#[case(Extensions::BACKSLASH_LINE_BREAK, "a\\\nb\n", "<p>a<br>\nb</p>\n")]
#[case(Extensions::JOIN_LINES, "a\nb\n", "<p>ab</p>\n")]
fn test_line_break_extensions(
    #[case] extensions: Extensions,
    #[case] input: &str,
    #[case] expected: &str,
) {
    assert_eq!(html(input, extensions, HtmlFlags::empty()), expected);
}

#[test]
fn test_footnotes() {
    let out = html("Text[^1].\n\n[^1]: The note.\n", Extensions::FOOTNOTES, HtmlFlags::empty());
    assert_eq!(
        out,
        "<p>Text<sup class=\"footnote-ref\" id=\"fnref:1\"><a href=\"#fn:1\">1</a></sup>.</p>\n\
         <div class=\"footnotes\">\n\n<hr>\n\n<ol>\n<li id=\"fn:1\">The note.</li>\n</ol>\n</div>\n"
    );
}

#[test]
fn test_footnote_return_links() {
    let out = html(
        "Text[^1].\n\n[^1]: The note.\n",
        Extensions::FOOTNOTES,
        HtmlFlags::FOOTNOTE_RETURN_LINKS,
    );
    assert!(out.contains(
        "<li id=\"fn:1\">The note. \
         <a class=\"footnote-return\" href=\"#fnref:1\"><sup>[return]</sup></a></li>"
    ));
}

#[test]
fn test_footnote_return_link_sits_in_last_paragraph() {
    let out = html(
        "Text[^1].\n\n[^1]: Para one.\n\n    Para two.\n",
        Extensions::FOOTNOTES,
        HtmlFlags::FOOTNOTE_RETURN_LINKS,
    );
    assert!(out.contains(
        "<li id=\"fn:1\"><p>Para one.</p>\n\n<p>Para two. \
         <a class=\"footnote-return\" href=\"#fnref:1\"><sup>[return]</sup></a></p>\n</li>"
    ));
}

#[test]
fn test_definition_list() {
    assert_eq!(
        html("Term\n: Definition\n", Extensions::DEFINITION_LISTS, HtmlFlags::empty()),
        "<dl>\n<dt>Term</dt>\n<dd>Definition</dd>\n</dl>\n"
    );
}

#[test]
fn test_header_ids() {
    assert_eq!(
        html("# Title {#custom}\n", Extensions::HEADER_IDS, HtmlFlags::empty()),
        "<h1 id=\"custom\">Title</h1>\n"
    );
    assert_eq!(
        html(
            "# Hello World\n# Hello World\n",
            Extensions::AUTO_HEADER_IDS,
            HtmlFlags::empty()
        ),
        "<h1 id=\"hello-world\">Hello World</h1>\n\n<h1 id=\"hello-world-1\">Hello World</h1>\n"
    );
}

#[test]
fn test_title_block() {
    assert_eq!(
        html("% My Title\n\nbody\n", Extensions::TITLEBLOCK, HtmlFlags::empty()),
        "<h1 class=\"title\">My Title\n</h1>\n<p>body</p>\n"
    );
}

#[test]
fn test_blocks_without_blank_line() {
    assert_eq!(
        html(
            "text\n- item\n",
            Extensions::NO_EMPTY_LINE_BEFORE_BLOCK,
            HtmlFlags::empty()
        ),
        "<p>text</p>\n\n<ul>\n<li>item</li>\n</ul>\n"
    );
}

#[test]
fn test_lax_html_blocks() {
    let input = "<div>\nx\n</div>\ntext\n";
    assert_eq!(
        html(input, Extensions::LAX_HTML_BLOCKS, HtmlFlags::empty()),
        "<div>\nx\n</div>\n\n<p>text</p>\n"
    );
    assert_eq!(basic(input), "<p><div>\nx\n</div>\ntext</p>\n");
}

#[test]
fn test_ref_override() {
    let lookup = |label: &str| {
        (label == "x").then(|| marklex_core::Reference::link("/over", Some("T".to_string())))
    };
    let parser = Parser::new(Extensions::empty()).with_ref_override(&lookup);
    let out = parser
        .render(b"[link][x]\n", &mut HtmlRenderer::default())
        .unwrap();
    assert_eq!(out, "<p><a href=\"/over\" title=\"T\">link</a></p>\n");
}

// ============================================================================
// Renderer Flag Tests
// ============================================================================

#[test]
fn test_skip_html() {
    assert_eq!(
        html("<b>hi</b> there\n", Extensions::empty(), HtmlFlags::SKIP_HTML),
        "<p>hi there</p>\n"
    );
    assert_eq!(
        html("<div>\nhi\n</div>\n", Extensions::empty(), HtmlFlags::SKIP_HTML),
        ""
    );
}

#[test]
fn test_skip_style_images_and_links() {
    assert_eq!(
        html("a <style>b</style>\n", Extensions::empty(), HtmlFlags::SKIP_STYLE),
        "<p>a b</p>\n"
    );
    assert_eq!(
        html("x ![a](/i.png)\n", Extensions::empty(), HtmlFlags::SKIP_IMAGES),
        "<p>x </p>\n"
    );
    assert_eq!(
        html("[a](/u)\n", Extensions::empty(), HtmlFlags::SKIP_LINKS),
        "<p><tt>a</tt></p>\n"
    );
}

#[test]
fn test_safelink() {
    assert_eq!(
        html("[a](javascript:x)\n", Extensions::empty(), HtmlFlags::SAFELINK),
        "<p><tt>a</tt></p>\n"
    );
    assert_eq!(
        html("[a](https://x.org)\n", Extensions::empty(), HtmlFlags::SAFELINK),
        "<p><a href=\"https://x.org\">a</a></p>\n"
    );
}

#[test]
fn test_link_attributes() {
    let flags =
        HtmlFlags::NOFOLLOW_LINKS | HtmlFlags::NOREFERRER_LINKS | HtmlFlags::HREF_TARGET_BLANK;
    assert_eq!(
        html("[a](https://x.org)\n", Extensions::empty(), flags),
        "<p><a href=\"https://x.org\" rel=\"nofollow noreferrer\" target=\"_blank\">a</a></p>\n"
    );
    // relative links get no attributes
    assert_eq!(
        html("[a](/local)\n", Extensions::empty(), flags),
        "<p><a href=\"/local\">a</a></p>\n"
    );
}

#[test]
fn test_xhtml() {
    assert_eq!(
        html("---\n", Extensions::empty(), HtmlFlags::USE_XHTML),
        "<hr />\n"
    );
    assert_eq!(
        html("![a](/i.png)\n", Extensions::empty(), HtmlFlags::USE_XHTML),
        "<p><img src=\"/i.png\" alt=\"a\" /></p>\n"
    );
}

#[test]
fn test_smartypants() {
    let flags = HtmlFlags::USE_SMARTYPANTS | HtmlFlags::SMARTYPANTS_DASHES;
    assert_eq!(
        html("it's 1/2 -- \"done\"...\n", Extensions::empty(), flags),
        "<p>it&rsquo;s &frac12; &mdash; &ldquo;done&rdquo;&hellip;</p>\n"
    );
}

#[test]
fn test_table_of_contents() {
    let input = "# A\n## B\n# C\n";
    let toc = "<nav>\n<ul>\n<li><a href=\"#toc_0\">A</a>\n\
               <ul>\n<li><a href=\"#toc_1\">B</a></li>\n</ul></li>\n\
               <li><a href=\"#toc_2\">C</a></li>\n</ul>\n</nav>\n";
    let body = "<h1 id=\"toc_0\">A</h1>\n\n<h2 id=\"toc_1\">B</h2>\n\n<h1 id=\"toc_2\">C</h1>\n";

    assert_eq!(
        html(input, Extensions::empty(), HtmlFlags::TOC),
        format!("{toc}\n{body}")
    );
    assert_eq!(
        html(input, Extensions::empty(), HtmlFlags::TOC | HtmlFlags::OMIT_CONTENTS),
        toc
    );
}

#[test]
fn test_complete_page() {
    let mut renderer = HtmlRenderer::new(HtmlFlags::COMPLETE_PAGE)
        .with_title("T & U")
        .with_css("style.css");
    let out = render(b"x\n", &mut renderer, &Options::default()).unwrap();
    assert!(out.starts_with("<!DOCTYPE html>\n<html>\n<head>\n  <title>T &amp; U</title>\n"));
    assert!(out.contains("<meta name=\"GENERATOR\" content=\"marklex v"));
    assert!(out.contains("<link rel=\"stylesheet\" type=\"text/css\" href=\"style.css\">"));
    assert!(out.ends_with("<p>x</p>\n\n</body>\n</html>\n"));
}

#[test]
fn test_renderer_is_reusable() {
    let mut renderer = HtmlRenderer::new(HtmlFlags::TOC);
    let options = Options::default();
    let first = render(b"# A\n", &mut renderer, &options).unwrap();
    let second = render(b"# A\n", &mut renderer, &options).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Convenience Function Tests
// ============================================================================

#[test]
fn test_markdown_basic_ignores_extensions() {
    let out = markdown_basic(b"a | b\n--|--\n~~x~~\n").unwrap();
    assert!(!out.contains("<table>"));
    assert!(out.contains("~~x~~"));
}

#[test]
fn test_markdown_common() {
    assert_eq!(
        markdown_common(b"Hello, *world*!\n").unwrap(),
        "<p>Hello, <em>world</em>!</p>\n"
    );
    assert_eq!(
        markdown_common(b"a  \nb\n").unwrap(),
        "<p>a<br />\nb</p>\n"
    );
    assert!(markdown_common(b"a | b\n--|--\n")
        .unwrap()
        .contains("<table>"));
}
