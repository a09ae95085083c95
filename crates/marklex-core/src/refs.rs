//! Link and footnote definitions collected before inline rendering.

use std::collections::HashMap;

use log::debug;
use unicase::UniCase;

use crate::chars::{blank_line_len, indentation, is_horizontal_space, line_end, strip_columns};

/// A link or footnote definition harvested from `[label]: url "title"` or
/// `[^label]: text`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reference {
    /// Link destination; empty for footnotes.
    pub link: String,
    /// Optional link title.
    pub title: Option<String>,
    /// Footnote body (newline-terminated block text); empty for links.
    pub text: String,
}

impl Reference {
    /// A link reference.
    pub fn link(link: impl Into<String>, title: Option<String>) -> Self {
        Self {
            link: link.into(),
            title,
            text: String::new(),
        }
    }
}

/// Label key: case-insensitive, internal whitespace collapsed.
pub type LabelKey = UniCase<String>;

/// Normalize a label for lookup: trim, collapse whitespace runs to a single
/// space and compare case-insensitively.
pub fn label_key(label: &str) -> LabelKey {
    let mut collapsed = String::with_capacity(label.len());
    for word in label.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(word);
    }
    UniCase::new(collapsed)
}

/// Reference definitions for one document. Keys are unique; the first
/// definition of a label wins.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    links: HashMap<LabelKey, Reference>,
    footnotes: HashMap<LabelKey, Reference>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a link definition. Returns false when the label was already
    /// defined.
    pub fn insert_link(&mut self, label: &str, reference: Reference) -> bool {
        let key = label_key(label);
        if self.links.contains_key(&key) {
            return false;
        }
        debug!("link reference [{}] -> {}", key, reference.link);
        self.links.insert(key, reference);
        true
    }

    /// Register a footnote definition.
    pub fn insert_footnote(&mut self, label: &str, reference: Reference) -> bool {
        let key = label_key(label);
        if self.footnotes.contains_key(&key) {
            return false;
        }
        debug!("footnote definition [^{}]", key);
        self.footnotes.insert(key, reference);
        true
    }

    /// Look up a link definition by label.
    pub fn link(&self, label: &str) -> Option<&Reference> {
        self.links.get(&label_key(label))
    }

    /// Look up a footnote definition by label.
    pub fn footnote(&self, label: &str) -> Option<&Reference> {
        self.footnotes.get(&label_key(label))
    }

    pub(crate) fn len(&self) -> usize {
        self.links.len() + self.footnotes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.links.is_empty() && self.footnotes.is_empty()
    }
}

/// A definition recognized at the start of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition<'a> {
    /// The label between the brackets (without `^`).
    pub label: &'a str,
    /// Whether this is a `[^label]:` footnote definition.
    pub footnote: bool,
    /// The parsed reference.
    pub reference: Reference,
}

/// Recognize a link or footnote definition at the start of `data`.
///
/// Returns the byte length of the definition (through the newline of its
/// last line) and the definition itself. Footnote syntax is only
/// recognized when `footnotes` is set.
pub fn scan_definition(
    data: &str,
    footnotes: bool,
    tab_size: usize,
) -> Option<(usize, Definition<'_>)> {
    let bytes = data.as_bytes();
    let (columns, mut i) = indentation(bytes, tab_size);
    if columns > 3 || bytes.get(i) != Some(&b'[') {
        return None;
    }
    i += 1;
    let footnote = footnotes && bytes.get(i) == Some(&b'^');
    if footnote {
        i += 1;
    }
    let label_start = i;
    while i < bytes.len() && !matches!(bytes[i], b'\n' | b'\r' | b']') {
        i += 1;
    }
    if bytes.get(i) != Some(&b']') || i == label_start {
        return None;
    }
    let label = &data[label_start..i];
    if label.trim().is_empty() {
        return None;
    }
    i += 1;
    if bytes.get(i) != Some(&b':') {
        return None;
    }
    i += 1;
    while i < bytes.len() && is_horizontal_space(bytes[i]) {
        i += 1;
    }

    if footnote {
        let (len, text) = scan_footnote_body(data, i, tab_size);
        return Some((
            len,
            Definition {
                label,
                footnote: true,
                reference: Reference {
                    link: String::new(),
                    title: None,
                    text,
                },
            },
        ));
    }

    // destination may start on the next line
    if matches!(bytes.get(i), Some(b'\n') | Some(b'\r')) {
        i = line_end(bytes, i);
        while i < bytes.len() && is_horizontal_space(bytes[i]) {
            i += 1;
        }
    }
    if i >= bytes.len() || bytes[i] == b'\n' {
        return None;
    }
    let (link_start, link_end, after_link) = if bytes[i] == b'<' {
        let close = memchr::memchr2(b'>', b'\n', &bytes[i + 1..]).map(|p| i + 1 + p)?;
        if bytes[close] != b'>' {
            return None;
        }
        (i + 1, close, close + 1)
    } else {
        let start = i;
        while i < bytes.len() && !crate::chars::is_space(bytes[i]) {
            i += 1;
        }
        (start, i, i)
    };
    let link = &data[link_start..link_end];

    let mut i = after_link;
    while i < bytes.len() && is_horizontal_space(bytes[i]) {
        i += 1;
    }
    let first_line_end = line_end(bytes, i);

    // title on the same line
    if i < bytes.len() && matches!(bytes[i], b'"' | b'\'' | b'(') {
        let (title, end) = scan_title(data, i)?;
        return Some((
            end,
            Definition {
                label,
                footnote: false,
                reference: Reference::link(link, Some(title.to_string())),
            },
        ));
    }
    if i < bytes.len() && !matches!(bytes[i], b'\n' | b'\r') {
        return None;
    }

    // title alone on the following line
    let mut j = first_line_end;
    while j < bytes.len() && is_horizontal_space(bytes[j]) {
        j += 1;
    }
    if j < bytes.len() && matches!(bytes[j], b'"' | b'\'' | b'(') {
        if let Some((title, end)) = scan_title(data, j) {
            return Some((
                end,
                Definition {
                    label,
                    footnote: false,
                    reference: Reference::link(link, Some(title.to_string())),
                },
            ));
        }
    }

    Some((
        first_line_end,
        Definition {
            label,
            footnote: false,
            reference: Reference::link(link, None),
        },
    ))
}

/// A title delimited by `"`, `'` or `()` that ends its line. Returns the
/// title and the offset past the line.
fn scan_title(data: &str, open: usize) -> Option<(&str, usize)> {
    let bytes = data.as_bytes();
    let close_char = match bytes[open] {
        b'(' => b')',
        c => c,
    };
    let end = line_end(bytes, open);
    let mut last = end;
    while last > open + 1 && crate::chars::is_space(bytes[last - 1]) {
        last -= 1;
    }
    if last <= open + 1 || bytes[last - 1] != close_char {
        return None;
    }
    Some((&data[open + 1..last - 1], end))
}

/// Footnote body: the rest of the first line plus following lines indented
/// by at least four columns, with blank lines allowed between them.
fn scan_footnote_body(data: &str, start: usize, tab_size: usize) -> (usize, String) {
    let bytes = data.as_bytes();
    let mut end = line_end(bytes, start);
    let mut text = String::with_capacity(end - start);
    text.push_str(data[start..end].trim_end_matches(['\n', '\r']));
    text.push('\n');

    let mut i = end;
    let mut pending_blank = 0;
    while i < bytes.len() {
        let blank = blank_line_len(&bytes[i..]);
        if blank > 0 {
            pending_blank += 1;
            i += blank;
            continue;
        }
        let next = line_end(bytes, i);
        let line = &bytes[i..next];
        let (columns, _) = indentation(line, tab_size);
        if columns < 4 {
            break;
        }
        for _ in 0..pending_blank {
            text.push('\n');
        }
        pending_blank = 0;
        let skip = strip_columns(line, 4, tab_size);
        text.push_str(data[i + skip..next].trim_end_matches(['\n', '\r']));
        text.push('\n');
        i = next;
        end = next;
    }
    (end, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_compare_case_insensitively_with_collapsed_whitespace() {
        assert_eq!(label_key("Foo  Bar"), label_key("foo bar"));
        assert_eq!(label_key(" foo\n bar "), label_key("FOO BAR"));
        assert_ne!(label_key("foo"), label_key("foobar"));
    }

    #[test]
    fn first_definition_wins() {
        let mut table = ReferenceTable::new();
        assert!(table.insert_link("foo", Reference::link("/one", None)));
        assert!(!table.insert_link("FOO", Reference::link("/two", None)));
        assert_eq!(table.link("Foo").unwrap().link, "/one");
        assert!(table.link("bar").is_none());
    }

    #[test]
    fn definition_with_title() {
        let (len, def) = scan_definition("[foo]: /url \"title\"\nnext", false, 4).unwrap();
        assert_eq!(len, 20);
        assert_eq!(def.label, "foo");
        assert_eq!(def.reference.link, "/url");
        assert_eq!(def.reference.title.as_deref(), Some("title"));
    }

    #[test]
    fn definition_title_on_next_line_and_angle_link() {
        let input = "[a b]: <http://x.y/z>\n   (Paren title)\n";
        let (len, def) = scan_definition(input, false, 4).unwrap();
        assert_eq!(len, input.len());
        assert_eq!(def.reference.link, "http://x.y/z");
        assert_eq!(def.reference.title.as_deref(), Some("Paren title"));
    }

    #[test]
    fn definition_rejects_trailing_garbage() {
        assert!(scan_definition("[foo]: /url \"title\" junk\n", false, 4).is_none());
        assert!(scan_definition("[foo] /url\n", false, 4).is_none());
        assert!(scan_definition("    [foo]: /url\n", false, 4).is_none());
        assert!(scan_definition("[]: /url\n", false, 4).is_none());
    }

    #[test]
    fn footnote_definition_with_continuation() {
        let input = "[^1]: First line\n    second line\n\n    third\nafter\n";
        let (len, def) = scan_definition(input, true, 4).unwrap();
        assert!(def.footnote);
        assert_eq!(def.label, "1");
        assert_eq!(def.reference.text, "First line\nsecond line\n\nthird\n");
        assert_eq!(&input[len..], "after\n");
    }

    #[test]
    fn footnote_body_keeps_whitespace_only_gaps() {
        let input = "[^n]: one\n  \t\n\n    two\n   \nrest\n";
        let (len, def) = scan_definition(input, true, 4).unwrap();
        assert_eq!(def.reference.text, "one\n\n\ntwo\n");
        assert_eq!(&input[len..], "   \nrest\n");
    }

    #[test]
    fn table_counts_links_and_footnotes() {
        let mut table = ReferenceTable::new();
        assert!(table.is_empty());
        table.insert_link("a", Reference::link("/a", None));
        table.insert_footnote("n", Reference::link("", None));
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn footnote_syntax_needs_the_extension() {
        let (_, def) = scan_definition("[^1]: /x\n", false, 4).unwrap();
        assert!(!def.footnote);
        assert_eq!(def.label, "^1");
    }
}
