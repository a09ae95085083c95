//! Pure block-level grammar probes.
//!
//! Every function here looks at a byte buffer whose first byte starts a line
//! and either recognizes its construct, returning offsets relative to that
//! buffer, or returns `None`. None of them allocate except the table and
//! list scanners, which return per-cell and per-item ranges.

use std::ops::Range;

use memchr::memchr;

use crate::chars::{indentation, is_blank_line, is_horizontal_space, line_end};
use crate::render::Alignment;

/// Fewest marker characters that make a thematic break.
pub const MIN_HRULE_MARKERS: usize = 3;
/// Shortest opening fence.
pub const MIN_FENCE: usize = 3;
/// Longest opening fence; longer runs are not fences at all.
pub const MAX_FENCE: usize = 7;

/// Text after a line's newline has been stripped.
#[inline]
fn line_content(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && matches!(line[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &line[..end]
}

// ----------------------------------------------------------------------------
// Thematic breaks and setext headings
// ----------------------------------------------------------------------------

/// Recognize a thematic break on the first line of `data`.
///
/// At most three columns of indentation, then at least three of the same
/// marker (`-`, `_` or `*`) with optional horizontal whitespace between and
/// after them. Returns the offset just past the line.
pub fn hrule_end(data: &[u8], tab_size: usize) -> Option<usize> {
    let end = line_end(data, 0);
    let line = line_content(&data[..end]);
    let (columns, skip) = indentation(line, tab_size);
    if columns > 3 {
        return None;
    }
    let mut active = None;
    let mut markers = 0;
    for &b in &line[skip..] {
        match b {
            b'-' | b'_' | b'*' => match active {
                None => {
                    active = Some(b);
                    markers += 1;
                }
                Some(c) if c == b => markers += 1,
                Some(_) => return None,
            },
            b' ' | b'\t' => {}
            _ => return None,
        }
    }
    (markers >= MIN_HRULE_MARKERS).then_some(end)
}

/// A recognized setext heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetextHeading {
    /// 1 for `=` underlines, 2 for `-`.
    pub level: u8,
    /// End of the last content line (its newline included).
    pub content_end: usize,
    /// End of the underline line (its newline included).
    pub end: usize,
}

/// Validate an underline whose indentation has been skipped: one repeated
/// `=` or `-`, then only horizontal whitespace.
fn setext_underline(rest: &[u8]) -> Option<u8> {
    let marker = *rest.first()?;
    if marker != b'=' && marker != b'-' {
        return None;
    }
    let run = rest.iter().take_while(|&&b| b == marker).count();
    let tail = line_content(&rest[run..]);
    tail.iter()
        .all(|&b| is_horizontal_space(b))
        .then_some(if marker == b'=' { 1 } else { 2 })
}

/// Lines that end a paragraph and therefore cannot be setext content.
fn interrupts_paragraph(line: &[u8], tab_size: usize) -> bool {
    hrule_end(line, tab_size).is_some()
        || atx_heading(line, false, false, tab_size).is_some()
        || fence_open(line, tab_size).is_some()
}

/// Recognize a setext heading at the start of `data`.
///
/// Every line before the underline must be indented at most three columns
/// and contain text; the first line that starts with `=` or `-` after at
/// least one content line is the candidate underline and must be valid.
pub fn setext_heading(data: &[u8], tab_size: usize) -> Option<SetextHeading> {
    let mut i = 0;
    let mut content_lines = 0;
    while i < data.len() {
        let end = line_end(data, i);
        let line = &data[i..end];
        let (columns, skip) = indentation(line, tab_size);
        if columns > 3 || is_blank_line(line) {
            return None;
        }
        let rest = &line[skip..];
        if content_lines > 0 && matches!(rest.first(), Some(b'=') | Some(b'-')) {
            return setext_underline(rest).map(|level| SetextHeading {
                level,
                content_end: i,
                end,
            });
        }
        if interrupts_paragraph(line, tab_size) {
            return None;
        }
        content_lines += 1;
        i = end;
    }
    None
}

/// Offset just past the underline of a setext heading starting at `data`.
pub fn setext_heading_end(data: &[u8], tab_size: usize) -> Option<usize> {
    setext_heading(data, tab_size).map(|h| h.end)
}

// ----------------------------------------------------------------------------
// ATX headings
// ----------------------------------------------------------------------------

/// A recognized `#` heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtxHeading {
    pub level: u8,
    /// Heading text without markers, closing run or id block.
    pub content: Range<usize>,
    /// Text of a `{#id}` suffix.
    pub id: Option<Range<usize>>,
    /// End of the line.
    pub end: usize,
}

/// Recognize an ATX heading on the first line of `data`.
pub fn atx_heading(
    data: &[u8],
    space_headers: bool,
    header_ids: bool,
    tab_size: usize,
) -> Option<AtxHeading> {
    let end = line_end(data, 0);
    let line = line_content(&data[..end]);
    let (columns, skip) = indentation(line, tab_size);
    if columns > 3 {
        return None;
    }
    let level = line[skip..].iter().take_while(|&&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let mut begin = skip + level;
    if space_headers && begin < line.len() && !is_horizontal_space(line[begin]) {
        return None;
    }
    while begin < line.len() && is_horizontal_space(line[begin]) {
        begin += 1;
    }
    let mut stop = line.len();
    while stop > begin && is_horizontal_space(line[stop - 1]) {
        stop -= 1;
    }

    let mut id = None;
    if header_ids && stop > begin && line[stop - 1] == b'}' {
        if let Some(open) = find_subslice(&line[begin..stop], b"{#").map(|p| begin + p) {
            if open + 2 < stop - 1 {
                id = Some(open + 2..stop - 1);
                stop = open;
                while stop > begin && is_horizontal_space(line[stop - 1]) {
                    stop -= 1;
                }
            }
        }
    }

    // optional closing sequence, only when separated by whitespace
    let mut close = stop;
    while close > begin && line[close - 1] == b'#' {
        close -= 1;
    }
    if close == begin {
        stop = begin;
    } else if close < stop && is_horizontal_space(line[close - 1]) {
        stop = close;
        while stop > begin && is_horizontal_space(line[stop - 1]) {
            stop -= 1;
        }
    }

    Some(AtxHeading {
        level: level as u8,
        content: begin..stop,
        id,
        end,
    })
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ----------------------------------------------------------------------------
// Fenced code
// ----------------------------------------------------------------------------

/// An opening fence line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceOpen {
    /// `` ` `` or `~`.
    pub marker: u8,
    /// Length of the marker run.
    pub count: usize,
    /// Trimmed info string.
    pub info: Range<usize>,
    /// End of the opening line.
    pub end: usize,
}

/// Recognize an opening fence: at most three columns of indentation, then
/// three to seven identical fence characters and an info string that does
/// not contain the fence character.
pub fn fence_open(data: &[u8], tab_size: usize) -> Option<FenceOpen> {
    let end = line_end(data, 0);
    let line = line_content(&data[..end]);
    let (columns, skip) = indentation(line, tab_size);
    if columns > 3 {
        return None;
    }
    let marker = *line.get(skip)?;
    if marker != b'`' && marker != b'~' {
        return None;
    }
    let count = line[skip..].iter().take_while(|&&b| b == marker).count();
    if !(MIN_FENCE..=MAX_FENCE).contains(&count) {
        return None;
    }
    let mut begin = skip + count;
    if memchr(marker, &line[begin..]).is_some() {
        return None;
    }
    while begin < line.len() && is_horizontal_space(line[begin]) {
        begin += 1;
    }
    let mut stop = line.len();
    while stop > begin && is_horizontal_space(line[stop - 1]) {
        stop -= 1;
    }
    Some(FenceOpen {
        marker,
        count,
        info: begin..stop,
        end,
    })
}

/// Whether `line` closes a fence of `count` `marker` characters.
fn is_fence_close(line: &[u8], marker: u8, count: usize, tab_size: usize) -> bool {
    let line = line_content(line);
    let (columns, skip) = indentation(line, tab_size);
    if columns > 3 {
        return false;
    }
    let run = line[skip..].iter().take_while(|&&b| b == marker).count();
    run >= count && line[skip + run..].iter().all(|&b| is_horizontal_space(b))
}

/// A complete fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedCode {
    pub open: FenceOpen,
    /// Lines between the fences.
    pub body: Range<usize>,
    /// End of the closing fence line.
    pub end: usize,
}

/// Recognize a fenced code block. Without a closing fence there is no match.
pub fn fenced_code(data: &[u8], tab_size: usize) -> Option<FencedCode> {
    let open = fence_open(data, tab_size)?;
    let mut i = open.end;
    while i < data.len() {
        let next = line_end(data, i);
        if is_fence_close(&data[i..next], open.marker, open.count, tab_size) {
            return Some(FencedCode {
                body: open.end..i,
                end: next,
                open,
            });
        }
        i = next;
    }
    None
}

// ----------------------------------------------------------------------------
// Indented code
// ----------------------------------------------------------------------------

/// Whether the first line of `data` is indented enough to be code.
#[inline]
pub fn is_code_line(data: &[u8], tab_size: usize) -> bool {
    !is_blank_line(data) && indentation(data, tab_size).0 >= 4
}

/// End of an indented code block starting at `data`: indented lines with
/// blank lines between them, trailing blank lines excluded.
pub fn indented_code_end(data: &[u8], tab_size: usize) -> usize {
    let mut i = 0;
    let mut end = 0;
    while i < data.len() {
        let next = line_end(data, i);
        let line = &data[i..next];
        if is_code_line(line, tab_size) {
            end = next;
        } else if !is_blank_line(line) {
            break;
        }
        i = next;
    }
    end
}

// ----------------------------------------------------------------------------
// Lists
// ----------------------------------------------------------------------------

/// Kind of list a marker opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListKind {
    /// `*`, `+` or `-` bullets.
    Unordered,
    /// `1.` numbers.
    Ordered,
    /// `: definition` lines.
    Definition,
}

/// A list item marker at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub kind: ListKind,
    /// First number of an ordered item.
    pub number: Option<u64>,
    /// Byte offset where the item text starts.
    pub content: usize,
    /// Column where the item text starts; continuation lines indented this
    /// far belong to the item.
    pub content_column: usize,
}

/// Recognize a list marker on the first line of `line`.
pub fn list_marker(line: &[u8], tab_size: usize, definition_lists: bool) -> Option<ListMarker> {
    let (columns, skip) = indentation(line, tab_size);
    if columns > 3 {
        return None;
    }
    let first = *line.get(skip)?;
    let (kind, number, marker_end) = match first {
        b'*' | b'+' | b'-' => (ListKind::Unordered, None, skip + 1),
        b':' if definition_lists => (ListKind::Definition, None, skip + 1),
        b'0'..=b'9' => {
            let digits = line[skip..].iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 9 || line.get(skip + digits) != Some(&b'.') {
                return None;
            }
            let number = std::str::from_utf8(&line[skip..skip + digits])
                .ok()
                .and_then(|s| s.parse().ok());
            (ListKind::Ordered, number, skip + digits + 1)
        }
        _ => return None,
    };
    let after = line.get(marker_end).copied();
    if !matches!(after, Some(b' ') | Some(b'\t')) {
        return None;
    }
    let marker_column = columns + (marker_end - skip);
    let (spaces, space_bytes) = indentation(&line[marker_end..], tab_size);
    let rest_blank = is_blank_line(&line[marker_end..]);
    // five or more spaces mean indented code inside the item
    let (content, content_column) = if rest_blank || spaces > 4 {
        (marker_end + 1, marker_column + 1)
    } else {
        (marker_end + space_bytes, marker_column + spaces)
    };
    Some(ListMarker {
        kind,
        number,
        content,
        content_column,
    })
}

/// One item of a scanned list: the line range it covers and its marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpan {
    pub lines: Range<usize>,
    pub marker: ListMarker,
}

/// A scanned list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListScan {
    pub kind: ListKind,
    pub items: Vec<ItemSpan>,
    /// Whether blank lines separate or occur inside items.
    pub loose: bool,
    /// End of the last item's last content line.
    pub end: usize,
}

/// Split the list starting at `data` into items.
///
/// A line with a marker of the same kind, indented less than the current
/// item's content column, starts a sibling. Lines indented to the content
/// column continue the item; unindented lines continue it lazily unless a
/// blank line preceded them or they open another block.
pub fn scan_list(data: &[u8], tab_size: usize, definition_lists: bool) -> Option<ListScan> {
    let first = list_marker(data, tab_size, definition_lists)?;
    let kind = first.kind;
    let mut items = Vec::new();
    let mut current_start = 0;
    let mut current = first;
    let mut i = line_end(data, 0);
    let mut content_end = i;
    let mut saw_blank = false;
    let mut loose = false;

    while i < data.len() {
        let next = line_end(data, i);
        let line = &data[i..next];
        if is_blank_line(line) {
            saw_blank = true;
            i = next;
            continue;
        }
        let (columns, _) = indentation(line, tab_size);
        if columns >= current.content_column {
            loose |= saw_blank;
            saw_blank = false;
            content_end = next;
            i = next;
            continue;
        }
        if let Some(marker) = list_marker(line, tab_size, definition_lists) {
            if marker.kind != kind {
                break;
            }
            loose |= saw_blank;
            saw_blank = false;
            items.push(ItemSpan {
                lines: current_start..content_end,
                marker: current,
            });
            current_start = i;
            current = marker;
            content_end = next;
            i = next;
            continue;
        }
        if saw_blank
            || interrupts_paragraph(line, tab_size)
            || quote_prefix(line, tab_size).is_some()
        {
            break;
        }
        content_end = next;
        i = next;
    }
    items.push(ItemSpan {
        lines: current_start..content_end,
        marker: current,
    });
    Some(ListScan {
        kind,
        items,
        loose,
        end: content_end,
    })
}

// ----------------------------------------------------------------------------
// Block quotes
// ----------------------------------------------------------------------------

/// Bytes of a `>` prefix (indentation, marker and one optional space).
pub fn quote_prefix(line: &[u8], tab_size: usize) -> Option<usize> {
    let (columns, skip) = indentation(line, tab_size);
    if columns > 3 || line.get(skip) != Some(&b'>') {
        return None;
    }
    let mut len = skip + 1;
    if matches!(line.get(len), Some(b' ') | Some(b'\t')) {
        len += 1;
    }
    Some(len)
}

/// End of the block quote starting at `data`.
///
/// Prefixed lines and lazy continuation lines belong to the quote; a blank
/// line ends it unless the next line is prefixed again.
pub fn blockquote_end(data: &[u8], tab_size: usize) -> usize {
    let mut i = 0;
    let mut end = 0;
    while i < data.len() {
        let next = line_end(data, i);
        let line = &data[i..next];
        if quote_prefix(line, tab_size).is_some() {
            end = next;
        } else if is_blank_line(line) {
            let resumes = next < data.len() && quote_prefix(&data[next..], tab_size).is_some();
            if !resumes {
                break;
            }
        } else if i == 0 || interrupts_paragraph(line, tab_size) {
            break;
        } else {
            // lazy continuation
            end = next;
        }
        i = next;
    }
    end
}

// ----------------------------------------------------------------------------
// HTML blocks
// ----------------------------------------------------------------------------

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "audio",
    "blockquote",
    "canvas",
    "center",
    "del",
    "details",
    "div",
    "dl",
    "fieldset",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "iframe",
    "ins",
    "math",
    "nav",
    "noscript",
    "ol",
    "p",
    "pre",
    "script",
    "section",
    "style",
    "table",
    "ul",
    "video",
];

fn is_block_tag(name: &[u8]) -> bool {
    BLOCK_TAGS
        .iter()
        .any(|tag| tag.as_bytes().eq_ignore_ascii_case(name))
}

/// Recognize an HTML block at the start of `data`.
///
/// Comments and `<hr>` end on their own line; other block tags run to the
/// line holding their matching close tag, which must end that line and,
/// unless `lax`, be followed by a blank line or the end of input.
pub fn html_block_end(data: &[u8], lax: bool, tab_size: usize) -> Option<usize> {
    let (columns, skip) = indentation(data, tab_size);
    if columns > 3 || data.get(skip) != Some(&b'<') {
        return None;
    }
    let start = skip + 1;

    if data[start..].starts_with(b"!--") {
        let close = find_subslice(&data[start + 3..], b"-->")? + start + 3 + 3;
        let end = line_end(data, close);
        return is_blank_line(&data[close..end]).then_some(end);
    }

    let name_len = data[start..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    let name = &data[start..start + name_len];
    if name_len == 0 {
        return None;
    }

    if name.eq_ignore_ascii_case(b"hr") {
        let end = line_end(data, start);
        let gt = memchr(b'>', &data[start..end])? + start + 1;
        return is_blank_line(&data[gt..end]).then_some(end);
    }
    if !is_block_tag(name) {
        return None;
    }
    if !matches!(
        data.get(start + name_len),
        Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'/')
    ) {
        return None;
    }

    let mut search = start + name_len;
    while let Some(rel) = memchr(b'<', &data[search..]) {
        let lt = search + rel;
        search = lt + 1;
        let tag_start = lt + 2;
        let tag_end = tag_start + name_len;
        if data.get(lt + 1) != Some(&b'/')
            || tag_end >= data.len()
            || !data[tag_start..tag_end].eq_ignore_ascii_case(name)
            || data[tag_end] != b'>'
        {
            continue;
        }
        let end = line_end(data, tag_end);
        if !is_blank_line(&data[tag_end + 1..end]) {
            continue;
        }
        if lax || end >= data.len() || is_blank_line(&data[end..]) {
            return Some(end);
        }
    }
    None
}

// ----------------------------------------------------------------------------
// Tables
// ----------------------------------------------------------------------------

/// Split a table row into trimmed cell ranges. Leading and trailing pipes
/// are optional; `\|` does not split.
pub fn table_cells(line: &[u8]) -> Vec<Range<usize>> {
    let content = line_content(line);
    let mut begin = 0;
    while begin < content.len() && is_horizontal_space(content[begin]) {
        begin += 1;
    }
    let mut stop = content.len();
    while stop > begin && is_horizontal_space(content[stop - 1]) {
        stop -= 1;
    }
    if begin < stop && content[begin] == b'|' {
        begin += 1;
    }
    if stop > begin && content[stop - 1] == b'|' && (stop < 2 || content[stop - 2] != b'\\') {
        stop -= 1;
    }

    let mut cells = Vec::new();
    let mut cell_start = begin;
    let mut i = begin;
    while i <= stop {
        if i == stop || (content[i] == b'|' && (i == 0 || content[i - 1] != b'\\')) {
            let mut a = cell_start;
            let mut b = i;
            while a < b && is_horizontal_space(content[a]) {
                a += 1;
            }
            while b > a && is_horizontal_space(content[b - 1]) {
                b -= 1;
            }
            cells.push(a..b);
            cell_start = i + 1;
        }
        i += 1;
    }
    cells
}

/// Parse a delimiter row (`| :--- | ---: |`) into column alignments.
pub fn table_delimiter(line: &[u8]) -> Option<Vec<Alignment>> {
    let content = line_content(line);
    if memchr(b'-', content).is_none() {
        return None;
    }
    table_cells(line)
        .into_iter()
        .map(|cell| {
            let cell = &content[cell];
            let left = cell.first() == Some(&b':');
            let right = cell.len() > 1 && cell.last() == Some(&b':');
            let dashes = &cell[left as usize..cell.len() - right as usize];
            if dashes.is_empty() || !dashes.iter().all(|&b| b == b'-') {
                return None;
            }
            Some(match (left, right) {
                (true, true) => Alignment::Center,
                (true, false) => Alignment::Left,
                (false, true) => Alignment::Right,
                (false, false) => Alignment::None,
            })
        })
        .collect()
}

/// A table header: the header row and its delimiter row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHead {
    pub alignments: Vec<Alignment>,
    /// End of the header row.
    pub header_end: usize,
    /// End of the delimiter row.
    pub end: usize,
}

/// Recognize a table header at the start of `data`.
pub fn table_head(data: &[u8]) -> Option<TableHead> {
    let header_end = line_end(data, 0);
    let header = &data[..header_end];
    if memchr(b'|', header).is_none() || is_blank_line(header) || header_end >= data.len() {
        return None;
    }
    let end = line_end(data, header_end);
    let alignments = table_delimiter(&data[header_end..end])?;
    if alignments.len() != table_cells(header).len() {
        return None;
    }
    Some(TableHead {
        alignments,
        header_end,
        end,
    })
}

/// Whether the first line of `data` continues a table body.
#[inline]
pub fn is_table_row(line: &[u8]) -> bool {
    let end = line_end(line, 0);
    !is_blank_line(line) && memchr(b'|', &line[..end]).is_some()
}

// ----------------------------------------------------------------------------
// Title block
// ----------------------------------------------------------------------------

/// Length of a `%` title block at the start of a document, 0 if absent.
pub fn title_block_end(data: &[u8]) -> usize {
    let mut i = 0;
    while i < data.len() && data[i] == b'%' {
        i = line_end(data, i);
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"---\n", Some(4))]
    #[case(b"***", Some(3))]
    #[case(b"_ _ _  \nnext", Some(8))]
    #[case(b"   - - -\n", Some(9))]
    #[case(b"    ---\n", None)]
    #[case(b"--\n", None)]
    #[case(b"-*-\n", None)]
    #[case(b"- item\n", None)]
    #[case(b"---a\n", None)]
    fn thematic_breaks(#[case] input: &[u8], #[case] expected: Option<usize>) {
        assert_eq!(hrule_end(input, 4), expected);
    }

    #[rstest]
    #[case(b"Foo *bar*\n=========", Some(19))]
    #[case(b"    Foo\n    ---", None)]
    #[case(b"Foo\n   ----      ", Some(17))]
    #[case(b"Foo\nbar\n---\nafter", Some(12))]
    #[case(b"Foo\n= =\n", None)]
    #[case(b"Foo\n==- \n", None)]
    #[case(b"Foo\n\n===\n", None)]
    #[case(b"===\n", None)]
    #[case(b"Foo\n    ===\n", None)]
    fn setext_fixtures(#[case] input: &[u8], #[case] expected: Option<usize>) {
        assert_eq!(setext_heading_end(input, 4), expected);
    }

    #[test]
    fn setext_levels() {
        assert_eq!(setext_heading(b"A\n===\n", 4).unwrap().level, 1);
        let h = setext_heading(b"A\nB\n--\n", 4).unwrap();
        assert_eq!(h.level, 2);
        assert_eq!(h.content_end, 4);
    }

    #[rstest]
    #[case("```", true)]
    #[case("~~~~~~~", true)]
    #[case("````````", false)]
    #[case("``", false)]
    fn fence_count_bounds(#[case] fence: &str, #[case] accepted: bool) {
        let input = format!("{fence}\ncode\n{fence}\n");
        assert_eq!(fenced_code(input.as_bytes(), 4).is_some(), accepted);
    }

    #[test]
    fn fenced_code_ranges() {
        let input = b"```rust ignore\nfn main() {}\n```\nafter";
        let code = fenced_code(input, 4).unwrap();
        assert_eq!(&input[code.open.info.clone()], b"rust ignore");
        assert_eq!(&input[code.body.clone()], b"fn main() {}\n");
        assert_eq!(code.end, 32);
    }

    #[test]
    fn fence_rules() {
        // info string may not contain the fence character
        assert!(fence_open(b"``` a`b\n", 4).is_none());
        assert!(fence_open(b"~~~ a`b\n", 4).is_some());
        // closer must be at least as long and of the same character
        assert!(fenced_code(b"````\nx\n```\n", 4).is_none());
        assert!(fenced_code(b"```\nx\n~~~\n", 4).is_none());
        assert!(fenced_code(b"```\nx\n`````  \n", 4).is_some());
        // unterminated
        assert!(fenced_code(b"```\nnever closed\n", 4).is_none());
    }

    #[test]
    fn atx_headings() {
        let h = atx_heading(b"## Title ##\n", true, false, 4).unwrap();
        assert_eq!(h.level, 2);
        assert_eq!(h.content, 3..8);

        assert!(atx_heading(b"#NoSpace\n", true, false, 4).is_none());
        assert!(atx_heading(b"#NoSpace\n", false, false, 4).is_some());
        assert!(atx_heading(b"####### seven\n", false, false, 4).is_none());

        let h = atx_heading(b"# Title {#custom}\n", true, true, 4).unwrap();
        assert_eq!(h.content, 2..7);
        assert_eq!(h.id, Some(10..16));

        let h = atx_heading(b"# C#\n", true, false, 4).unwrap();
        assert_eq!(h.content, 2..4);
    }

    #[test]
    fn list_markers() {
        let m = list_marker(b"- item\n", 4, false).unwrap();
        assert_eq!(m.kind, ListKind::Unordered);
        assert_eq!(m.content, 2);
        assert_eq!(m.content_column, 2);

        let m = list_marker(b"12. item\n", 4, false).unwrap();
        assert_eq!(m.kind, ListKind::Ordered);
        assert_eq!(m.number, Some(12));
        assert_eq!(m.content_column, 4);

        assert!(list_marker(b"-item\n", 4, false).is_none());
        assert!(list_marker(b": def\n", 4, false).is_none());
        assert_eq!(
            list_marker(b": def\n", 4, true).unwrap().kind,
            ListKind::Definition
        );
    }

    #[test]
    fn list_items_and_looseness() {
        let input = b"- a\n- b\n  more\n- c\n\nafter\n";
        let list = scan_list(input, 4, false).unwrap();
        assert_eq!(list.items.len(), 3);
        assert!(!list.loose);
        assert_eq!(list.items[1].lines, 4..15);
        assert_eq!(list.end, 19);

        let input = b"1. a\n\n2. b\n";
        let list = scan_list(input, 4, false).unwrap();
        assert_eq!(list.items.len(), 2);
        assert!(list.loose);

        let input = b"- a\n  - nested\n- b\n";
        let list = scan_list(input, 4, false).unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].lines, 0..15);
    }

    #[test]
    fn list_stops_at_other_kind() {
        let input = b"- a\n1. b\n";
        let list = scan_list(input, 4, false).unwrap();
        assert_eq!(list.end, 4);
    }

    #[test]
    fn blockquote_extent() {
        assert_eq!(blockquote_end(b"> a\nlazy\n\nout\n", 4), 9);
        assert_eq!(blockquote_end(b"> a\n\n> b\n\nout", 4), 9);
        assert_eq!(blockquote_end(b"> a\n---\n", 4), 4);
    }

    #[test]
    fn html_blocks() {
        let input = b"<div>\n*hi*\n</div>\n\nafter";
        assert_eq!(html_block_end(input, false, 4), Some(18));

        let input = b"<div>\nx\n</div>\ntext";
        assert_eq!(html_block_end(input, false, 4), None);
        assert_eq!(html_block_end(input, true, 4), Some(15));

        assert_eq!(html_block_end(b"<!-- note -->\n", false, 4), Some(14));
        assert_eq!(html_block_end(b"<hr />\n", false, 4), Some(7));
        assert_eq!(html_block_end(b"<span>x</span>\n", false, 4), None);
        assert_eq!(html_block_end(b"<DIV>x</div>\n", false, 4), Some(13));
    }

    #[test]
    fn table_parts() {
        assert_eq!(
            table_delimiter(b"| :-- | --: | :-: | --- |\n"),
            Some(vec![
                Alignment::Left,
                Alignment::Right,
                Alignment::Center,
                Alignment::None
            ])
        );
        assert_eq!(table_delimiter(b"| a | b |\n"), None);

        let row = b"| a | b \\| c |  |\n";
        let cells: Vec<&[u8]> = table_cells(row).into_iter().map(|r| &row[r]).collect();
        assert_eq!(cells, vec![&b"a"[..], &b"b \\| c"[..], &b""[..]]);

        let head = table_head(b"a | b\n--|--\n1 | 2\n").unwrap();
        assert_eq!(head.header_end, 6);
        assert_eq!(head.end, 12);
        assert!(table_head(b"a | b\n--|--|--\n").is_none());
    }

    #[test]
    fn indented_code_excludes_trailing_blank_lines() {
        assert_eq!(indented_code_end(b"    a\n\n    b\n\n\nc\n", 4), 13);
    }
}
