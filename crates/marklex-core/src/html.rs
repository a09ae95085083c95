//! Default HTML renderer.
//!
//! [`HtmlRenderer`] implements every [`Renderer`] method. Its behaviour is
//! tuned with [`HtmlFlags`]: skipping raw HTML, styles, images or links,
//! restricting links to safe protocols, link `rel`/`target` attributes,
//! XHTML output, complete pages, a table of contents, footnote return
//! links and smart punctuation.
//!
//! # Example
//!
//! ```rust
//! use marklex_core::html::{HtmlFlags, HtmlRenderer};
//! use marklex_core::{render, Extensions, Options};
//!
//! let mut renderer = HtmlRenderer::new(HtmlFlags::USE_XHTML);
//! let html = render(b"a  \nb\n", &mut renderer, &Options::new(Extensions::empty())).unwrap();
//! assert_eq!(html, "<p>a<br />\nb</p>\n");
//! ```

use crate::render::{Alignment, AutolinkKind, ListFlags, Renderer};
use crate::smartypants::SmartyPants;

bitflags::bitflags! {
    /// Options of the HTML renderer. The parser never sees these.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HtmlFlags: u32 {
        /// Drop raw HTML blocks and tags.
        const SKIP_HTML = 1 << 0;
        /// Drop `<style>` tags.
        const SKIP_STYLE = 1 << 1;
        /// Drop images and `<img>` tags.
        const SKIP_IMAGES = 1 << 2;
        /// Render link text without the link.
        const SKIP_LINKS = 1 << 3;
        /// Only link to known-safe protocols and local paths.
        const SAFELINK = 1 << 4;
        /// `rel="nofollow"` on absolute links.
        const NOFOLLOW_LINKS = 1 << 5;
        /// `rel="noreferrer"` on absolute links.
        const NOREFERRER_LINKS = 1 << 6;
        /// `target="_blank"` on absolute links.
        const HREF_TARGET_BLANK = 1 << 7;
        /// Generate a table of contents from the headings.
        const TOC = 1 << 8;
        /// With `TOC`, output only the table of contents.
        const OMIT_CONTENTS = 1 << 9;
        /// Wrap the output in a complete HTML page.
        const COMPLETE_PAGE = 1 << 10;
        /// Self-closing tags end with ` />`.
        const USE_XHTML = 1 << 11;
        /// Smart punctuation in text.
        const USE_SMARTYPANTS = 1 << 12;
        /// Any `n/m` becomes a fraction instead of only 1/2, 1/4 and 3/4.
        const SMARTYPANTS_FRACTIONS = 1 << 13;
        /// `--` and `-` become dashes.
        const SMARTYPANTS_DASHES = 1 << 14;
        /// `---` and `--` become dashes.
        const SMARTYPANTS_LATEX_DASHES = 1 << 15;
        /// Double quotes become angled quotes.
        const SMARTYPANTS_ANGLED_QUOTES = 1 << 16;
        /// Non-breaking space inside double quotes.
        const SMARTYPANTS_QUOTES_NBSP = 1 << 17;
        /// Footnotes link back to their reference.
        const FOOTNOTE_RETURN_LINKS = 1 << 18;

        /// The usual set: XHTML with smart punctuation.
        const COMMON = Self::USE_XHTML.bits()
            | Self::USE_SMARTYPANTS.bits()
            | Self::SMARTYPANTS_FRACTIONS.bits()
            | Self::SMARTYPANTS_DASHES.bits()
            | Self::SMARTYPANTS_LATEX_DASHES.bits();
    }
}

const FOOTNOTE_RETURN_CONTENTS: &str = "<sup>[return]</sup>";

static HTML_ESCAPE_TABLE: [u8; 256] = {
    let mut table = [0u8; 256];
    table[b'"' as usize] = 1;
    table[b'&' as usize] = 2;
    table[b'<' as usize] = 3;
    table[b'>' as usize] = 4;
    table
};

static HTML_ESCAPES: [&str; 5] = ["", "&quot;", "&amp;", "&lt;", "&gt;"];

/// Escape `&`, `<`, `>` and `"` into `out`. Every other character is
/// copied unchanged.
pub fn attr_escape(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut mark = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let escape = HTML_ESCAPE_TABLE[b as usize] as usize;
        if escape != 0 {
            out.push_str(&text[mark..i]);
            out.push_str(HTML_ESCAPES[escape]);
            // escaped characters are ASCII
            mark = i + 1;
        }
    }
    out.push_str(&text[mark..]);
}

/// [`attr_escape`] into a new string.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    attr_escape(&mut out, text);
    out
}

/// Like [`attr_escape`] but named entities such as `&amp;` already in the
/// text are kept as they are.
fn escape_keeping_entities(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut mark = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'&' {
            let name = bytes[i + 1..].iter().take_while(|b| b.is_ascii_lowercase()).count();
            if (2..=5).contains(&name) && bytes.get(i + 1 + name) == Some(&b';') {
                i += name + 2;
                continue;
            }
        }
        let escape = HTML_ESCAPE_TABLE[bytes[i] as usize] as usize;
        if escape != 0 {
            out.push_str(&text[mark..i]);
            out.push_str(HTML_ESCAPES[escape]);
            mark = i + 1;
        }
        i += 1;
    }
    out.push_str(&text[mark..]);
}

/// Separate a block from what precedes it.
#[inline]
fn double_space(out: &mut String) {
    if !out.is_empty() {
        out.push('\n');
    }
}

/// Anchors, root-relative paths and `./`, `../` paths.
fn is_relative_link(link: &str) -> bool {
    link.starts_with('#')
        || link == "/"
        || (link.starts_with('/') && !link.starts_with("//"))
        || link.starts_with("./")
        || link.starts_with("../")
}

/// Local paths and the http, https, ftp and mailto protocols.
fn is_safe_link(link: &str) -> bool {
    const PATHS: &[&str] = &["/", "./", "../"];
    const PROTOCOLS: &[&str] = &["http://", "https://", "ftp://", "mailto:"];

    let bytes = link.as_bytes();
    let alnum_after = |n: usize| bytes.get(n).is_some_and(u8::is_ascii_alphanumeric);
    PATHS
        .iter()
        .any(|p| link.starts_with(p) && (link.len() == p.len() || alnum_after(p.len())))
        || PROTOCOLS.iter().any(|p| {
            bytes.len() > p.len()
                && bytes[..p.len()].eq_ignore_ascii_case(p.as_bytes())
                && alnum_after(p.len())
        })
}

/// Whether `tag` is an opening or closing tag named `name`.
fn is_html_tag(tag: &str, name: &str) -> bool {
    let rest = tag.strip_prefix('<').unwrap_or(tag);
    let rest = rest.strip_prefix('/').unwrap_or(rest).trim_start();
    let len = rest.bytes().take_while(u8::is_ascii_alphanumeric).count();
    rest[..len].eq_ignore_ascii_case(name)
}

/// Footnote anchor: letters and digits kept, other runs collapsed to `-`.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            dash = false;
        } else if !dash {
            slug.push('-');
            dash = true;
        }
    }
    slug.trim_matches('-').to_string()
}

/// Renders HTML.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    flags: HtmlFlags,
    close_tag: &'static str,
    title: String,
    css: String,
    smartypants: SmartyPants,
    toc: String,
    toc_marker: usize,
    header_count: usize,
    current_level: usize,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(HtmlFlags::empty())
    }
}

impl HtmlRenderer {
    /// Create a renderer with the given flags.
    pub fn new(flags: HtmlFlags) -> Self {
        Self {
            flags,
            close_tag: if flags.contains(HtmlFlags::USE_XHTML) { " />" } else { ">" },
            title: String::new(),
            css: String::new(),
            smartypants: SmartyPants::new(flags),
            toc: String::new(),
            toc_marker: 0,
            header_count: 0,
            current_level: 0,
        }
    }

    /// Page title, used with [`HtmlFlags::COMPLETE_PAGE`].
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Stylesheet URL, used with [`HtmlFlags::COMPLETE_PAGE`].
    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = css.into();
        self
    }

    #[inline]
    pub fn flags(&self) -> HtmlFlags {
        self.flags
    }

    #[inline]
    fn has(&self, flag: HtmlFlags) -> bool {
        self.flags.contains(flag)
    }

    /// `" rel=..."` and `" target=..."` for absolute links, opened by a
    /// closing quote of the `href`.
    fn link_attributes(&self, out: &mut String, link: &str) {
        if is_relative_link(link) {
            return;
        }
        let mut rel = Vec::new();
        if self.has(HtmlFlags::NOFOLLOW_LINKS) {
            rel.push("nofollow");
        }
        if self.has(HtmlFlags::NOREFERRER_LINKS) {
            rel.push("noreferrer");
        }
        if !rel.is_empty() {
            out.push_str("\" rel=\"");
            out.push_str(&rel.join(" "));
        }
        if self.has(HtmlFlags::HREF_TARGET_BLANK) {
            out.push_str("\" target=\"_blank");
        }
    }

    fn toc_entry(&mut self, text: &str, level: usize, anchor: &str) {
        while level > self.current_level {
            if self.toc.ends_with("</li>\n") {
                // the sublist nests under the previous heading
                self.toc.truncate(self.toc.len() - "</li>\n".len());
            } else if self.current_level > 0 {
                self.toc.push_str("<li>");
            }
            if !self.toc.is_empty() {
                self.toc.push('\n');
            }
            self.toc.push_str("<ul>\n");
            self.current_level += 1;
        }
        while level < self.current_level {
            self.toc.push_str("</ul>");
            if self.current_level > 1 {
                self.toc.push_str("</li>\n");
            }
            self.current_level -= 1;
        }
        self.toc.push_str("<li><a href=\"#");
        self.toc.push_str(anchor);
        self.toc.push_str("\">");
        self.toc.push_str(text);
        self.toc.push_str("</a></li>\n");
        self.header_count += 1;
    }

    fn toc_finish(&mut self) {
        while self.current_level > 1 {
            self.toc.push_str("</ul></li>\n");
            self.current_level -= 1;
        }
        if self.current_level > 0 {
            self.toc.push_str("</ul>\n");
            self.current_level = 0;
        }
    }

    /// Cell with an optional `align` attribute.
    fn cell(&self, out: &mut String, tag: &str, content: &str, align: Alignment) {
        double_space(out);
        out.push('<');
        out.push_str(tag);
        match align {
            Alignment::Left => out.push_str(" align=\"left\""),
            Alignment::Right => out.push_str(" align=\"right\""),
            Alignment::Center => out.push_str(" align=\"center\""),
            Alignment::None => {}
        }
        out.push('>');
        out.push_str(content);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

impl Renderer for HtmlRenderer {
    fn block_code(&mut self, out: &mut String, text: &str, info: Option<&str>) {
        double_space(out);
        let lang = info
            .and_then(|info| info.split([' ', '\t']).next())
            .filter(|lang| !lang.is_empty() && *lang != ".");
        match lang {
            Some(lang) => {
                out.push_str("<pre><code class=\"language-");
                attr_escape(out, lang);
                out.push_str("\">");
            }
            None => out.push_str("<pre><code>"),
        }
        attr_escape(out, text);
        out.push_str("</code></pre>\n");
    }

    fn block_quote(&mut self, out: &mut String, content: &str) {
        double_space(out);
        out.push_str("<blockquote>\n");
        out.push_str(content);
        out.push_str("</blockquote>\n");
    }

    fn block_html(&mut self, out: &mut String, text: &str) {
        if self.has(HtmlFlags::SKIP_HTML) {
            return;
        }
        double_space(out);
        out.push_str(text);
        out.push('\n');
    }

    fn header(&mut self, out: &mut String, content: &str, level: u8, id: Option<&str>) {
        double_space(out);
        let toc_id;
        let id = match id {
            Some(id) => Some(id),
            None if self.has(HtmlFlags::TOC) => {
                toc_id = format!("toc_{}", self.header_count);
                Some(toc_id.as_str())
            }
            None => None,
        };
        match id {
            Some(id) => {
                out.push_str(&format!("<h{} id=\"", level));
                attr_escape(out, id);
                out.push_str("\">");
            }
            None => out.push_str(&format!("<h{}>", level)),
        }
        out.push_str(content);
        if self.has(HtmlFlags::TOC) {
            self.toc_entry(content, level as usize, id.unwrap_or_default());
        }
        out.push_str(&format!("</h{}>\n", level));
    }

    fn hrule(&mut self, out: &mut String) {
        double_space(out);
        out.push_str("<hr");
        out.push_str(self.close_tag);
        out.push('\n');
    }

    fn list(&mut self, out: &mut String, content: &str, flags: ListFlags) {
        double_space(out);
        let tag = if flags.contains(ListFlags::DEFINITION) {
            "dl"
        } else if flags.contains(ListFlags::ORDERED) {
            "ol"
        } else {
            "ul"
        };
        out.push_str(&format!("<{}>\n", tag));
        out.push_str(content);
        out.push_str(&format!("</{}>\n", tag));
    }

    fn list_item(&mut self, out: &mut String, content: &str, flags: ListFlags) {
        if flags.contains(ListFlags::ITEM_CONTAINS_BLOCK)
            && !flags.contains(ListFlags::DEFINITION)
        {
            double_space(out);
        }
        let tag = if flags.contains(ListFlags::TERM) {
            "dt"
        } else if flags.contains(ListFlags::DEFINITION) {
            "dd"
        } else {
            "li"
        };
        out.push_str(&format!("<{}>", tag));
        out.push_str(content.trim_end_matches('\n'));
        out.push_str(&format!("</{}>\n", tag));
    }

    fn paragraph(&mut self, out: &mut String, content: &str) {
        double_space(out);
        out.push_str("<p>");
        out.push_str(content);
        out.push_str("</p>\n");
    }

    fn table(&mut self, out: &mut String, header: &str, body: &str, _columns: &[Alignment]) {
        double_space(out);
        out.push_str("<table>\n<thead>\n");
        out.push_str(header);
        out.push_str("</thead>\n\n<tbody>\n");
        out.push_str(body);
        out.push_str("</tbody>\n</table>\n");
    }

    fn table_row(&mut self, out: &mut String, content: &str) {
        double_space(out);
        out.push_str("<tr>\n");
        out.push_str(content);
        out.push_str("\n</tr>\n");
    }

    fn table_header_cell(&mut self, out: &mut String, content: &str, align: Alignment) {
        self.cell(out, "th", content, align);
    }

    fn table_cell(&mut self, out: &mut String, content: &str, align: Alignment) {
        self.cell(out, "td", content, align);
    }

    fn footnotes(&mut self, out: &mut String, content: &str) {
        out.push_str("<div class=\"footnotes\">\n");
        self.hrule(out);
        self.list(out, content, ListFlags::ORDERED);
        out.push_str("</div>\n");
    }

    fn footnote_item(&mut self, out: &mut String, name: &str, content: &str, flags: ListFlags) {
        if flags.contains(ListFlags::ITEM_CONTAINS_BLOCK) {
            double_space(out);
        }
        let slug = slugify(name);
        out.push_str("<li id=\"fn:");
        out.push_str(&slug);
        out.push_str("\">");
        if !self.has(HtmlFlags::FOOTNOTE_RETURN_LINKS) {
            out.push_str(content);
            out.push_str("</li>\n");
            return;
        }
        // the return link goes inside a trailing paragraph
        let body = content.trim_end().strip_suffix("</p>").unwrap_or(content);
        out.push_str(body);
        out.push_str(" <a class=\"footnote-return\" href=\"#fnref:");
        out.push_str(&slug);
        out.push_str("\">");
        out.push_str(FOOTNOTE_RETURN_CONTENTS);
        out.push_str("</a>");
        out.push_str(&content[body.len()..]);
        out.push_str("</li>\n");
    }

    fn title_block(&mut self, out: &mut String, text: &str) {
        let text = text.strip_prefix("% ").unwrap_or(text).replace("\n% ", "\n");
        out.push_str("<h1 class=\"title\">");
        attr_escape(out, &text);
        out.push_str("\n</h1>");
    }

    fn autolink(&mut self, out: &mut String, link: &str, kind: AutolinkKind) -> bool {
        if self.has(HtmlFlags::SAFELINK) && !is_safe_link(link) && kind != AutolinkKind::Email {
            out.push_str("<tt>");
            escape_keeping_entities(out, link);
            out.push_str("</tt>");
            return true;
        }
        out.push_str("<a href=\"");
        if kind == AutolinkKind::Email {
            out.push_str("mailto:");
        }
        escape_keeping_entities(out, link);
        self.link_attributes(out, link);
        out.push_str("\">");
        // show an address without its scheme
        if let Some(address) = link
            .strip_prefix("mailto://")
            .or_else(|| link.strip_prefix("mailto:"))
        {
            attr_escape(out, address);
        } else {
            escape_keeping_entities(out, link);
        }
        out.push_str("</a>");
        true
    }

    fn code_span(&mut self, out: &mut String, text: &str) -> bool {
        out.push_str("<code>");
        attr_escape(out, text);
        out.push_str("</code>");
        true
    }

    fn double_emphasis(&mut self, out: &mut String, content: &str) -> bool {
        out.push_str("<strong>");
        out.push_str(content);
        out.push_str("</strong>");
        true
    }

    fn emphasis(&mut self, out: &mut String, content: &str) -> bool {
        if content.is_empty() {
            return false;
        }
        out.push_str("<em>");
        out.push_str(content);
        out.push_str("</em>");
        true
    }

    fn image(&mut self, out: &mut String, link: &str, title: Option<&str>, alt: &str) -> bool {
        if self.has(HtmlFlags::SKIP_IMAGES) {
            return true;
        }
        out.push_str("<img src=\"");
        attr_escape(out, link);
        out.push_str("\" alt=\"");
        attr_escape(out, alt);
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            out.push_str("\" title=\"");
            attr_escape(out, title);
        }
        out.push('"');
        out.push_str(self.close_tag);
        true
    }

    fn line_break(&mut self, out: &mut String) -> bool {
        out.push_str("<br");
        out.push_str(self.close_tag);
        out.push('\n');
        true
    }

    fn link(&mut self, out: &mut String, link: &str, title: Option<&str>, content: &str) -> bool {
        if self.has(HtmlFlags::SKIP_LINKS)
            || (self.has(HtmlFlags::SAFELINK) && !is_safe_link(link))
        {
            out.push_str("<tt>");
            out.push_str(content);
            out.push_str("</tt>");
            return true;
        }
        out.push_str("<a href=\"");
        attr_escape(out, link);
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            out.push_str("\" title=\"");
            attr_escape(out, title);
        }
        self.link_attributes(out, link);
        out.push_str("\">");
        out.push_str(content);
        out.push_str("</a>");
        true
    }

    fn raw_html_tag(&mut self, out: &mut String, tag: &str) -> bool {
        let skip = self.has(HtmlFlags::SKIP_HTML)
            || (self.has(HtmlFlags::SKIP_STYLE) && is_html_tag(tag, "style"))
            || (self.has(HtmlFlags::SKIP_LINKS) && is_html_tag(tag, "a"))
            || (self.has(HtmlFlags::SKIP_IMAGES) && is_html_tag(tag, "img"));
        if !skip {
            out.push_str(tag);
        }
        true
    }

    fn triple_emphasis(&mut self, out: &mut String, content: &str) -> bool {
        out.push_str("<strong><em>");
        out.push_str(content);
        out.push_str("</em></strong>");
        true
    }

    fn strikethrough(&mut self, out: &mut String, content: &str) -> bool {
        out.push_str("<del>");
        out.push_str(content);
        out.push_str("</del>");
        true
    }

    fn footnote_ref(&mut self, out: &mut String, name: &str, number: usize) -> bool {
        let slug = slugify(name);
        out.push_str(&format!(
            "<sup class=\"footnote-ref\" id=\"fnref:{slug}\">\
             <a href=\"#fn:{slug}\">{number}</a></sup>"
        ));
        true
    }

    fn entity(&mut self, out: &mut String, entity: &str) {
        out.push_str(entity);
    }

    fn normal_text(&mut self, out: &mut String, text: &str) {
        if self.has(HtmlFlags::USE_SMARTYPANTS) {
            let escaped = escape_html(text);
            self.smartypants.render(out, &escaped);
        } else {
            attr_escape(out, text);
        }
    }

    fn document_header(&mut self, out: &mut String) {
        self.toc.clear();
        self.header_count = 0;
        self.current_level = 0;
        if self.has(HtmlFlags::COMPLETE_PAGE) {
            let ending = if self.has(HtmlFlags::USE_XHTML) {
                out.push_str(
                    "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \
                     \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\n",
                );
                out.push_str("<html xmlns=\"http://www.w3.org/1999/xhtml\">\n");
                " /"
            } else {
                out.push_str("<!DOCTYPE html>\n<html>\n");
                ""
            };
            out.push_str("<head>\n  <title>");
            let title = std::mem::take(&mut self.title);
            self.normal_text(out, &title);
            self.title = title;
            out.push_str("</title>\n");
            out.push_str(&format!(
                "  <meta name=\"GENERATOR\" content=\"marklex v{}\"{}>\n",
                env!("CARGO_PKG_VERSION"),
                ending
            ));
            out.push_str(&format!("  <meta charset=\"utf-8\"{}>\n", ending));
            if !self.css.is_empty() {
                out.push_str("  <link rel=\"stylesheet\" type=\"text/css\" href=\"");
                attr_escape(out, &self.css);
                out.push_str(&format!("\"{}>\n", ending));
            }
            out.push_str("</head>\n<body>\n");
        }
        self.toc_marker = out.len();
    }

    fn document_footer(&mut self, out: &mut String) {
        if self.has(HtmlFlags::TOC) {
            self.toc_finish();
            let body = out.split_off(self.toc_marker.min(out.len()));
            if self.has(HtmlFlags::COMPLETE_PAGE) {
                out.push('\n');
            }
            out.push_str("<nav>\n");
            out.push_str(&self.toc);
            out.push_str("</nav>\n");
            if !self.has(HtmlFlags::OMIT_CONTENTS) {
                if !self.has(HtmlFlags::COMPLETE_PAGE) {
                    out.push('\n');
                }
                out.push_str(&body);
            }
        }
        if self.has(HtmlFlags::COMPLETE_PAGE) {
            out.push_str("\n</body>\n</html>\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_the_four_specials() {
        assert_eq!(escape_html("&"), "&amp;");
        assert_eq!(escape_html("<"), "&lt;");
        assert_eq!(escape_html(">"), "&gt;");
        assert_eq!(escape_html("\""), "&quot;");
        assert_eq!(escape_html("a 'b' é"), "a 'b' é");
    }

    #[test]
    fn entities_survive_autolink_escaping() {
        let mut out = String::new();
        escape_keeping_entities(&mut out, "http://x/?a=1&amp;b=<2>&c");
        assert_eq!(out, "http://x/?a=1&amp;b=&lt;2&gt;&amp;c");
    }

    #[test]
    fn link_classes() {
        assert!(is_relative_link("#top"));
        assert!(is_relative_link("/docs"));
        assert!(is_relative_link("../up"));
        assert!(!is_relative_link("//cdn.example.com"));
        assert!(!is_relative_link("https://example.com"));

        assert!(is_safe_link("https://example.com"));
        assert!(is_safe_link("/"));
        assert!(is_safe_link("mailto:me@example.com"));
        assert!(!is_safe_link("javascript:alert(1)"));
        assert!(!is_safe_link("http://"));
    }

    #[test]
    fn tags_by_name() {
        assert!(is_html_tag("<style type=\"x\">", "style"));
        assert!(is_html_tag("</A>", "a"));
        assert!(!is_html_tag("<abbr>", "a"));
    }

    #[test]
    fn slugs() {
        assert_eq!(slugify("my note"), "my-note");
        assert_eq!(slugify("--a__b--"), "a-b");
    }
}
