//! Inline scanner: emphasis, code spans, links, images, autolinks, footnote
//! references, raw HTML, entities and escapes.
//!
//! Scanning is driven by a 256-entry table mapping trigger bytes to
//! handlers. Text between triggers is flushed as normal text. A handler
//! returns how many bytes it consumed; 0 means the trigger byte was not the
//! start of a construct and is kept as literal text.
//!
//! Every handler renders into a scratch fragment that is only appended when
//! it succeeds, so a failed match leaves no trace in the output.

use std::borrow::Cow;

use log::debug;
use memchr::memchr;

use crate::chars::{is_escapable, is_punct, is_space};
use crate::options::Extensions;
use crate::parser::Engine;
use crate::render::{AutolinkKind, EmphasisKind, Fragment, LinkTarget, Sink};
use crate::span::Position;

/// Handler selected by a trigger byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
    Emphasis,
    CodeSpan,
    LineBreak,
    Link,
    Image,
    LeftAngle,
    Escape,
    Entity,
    AutoLink,
}

/// Trigger byte dispatch table, built once per parse from the extensions.
#[derive(Clone)]
pub(crate) struct TriggerTable([Option<Trigger>; 256]);

impl TriggerTable {
    pub fn new(extensions: Extensions) -> Self {
        let mut table = [None; 256];
        table[b'*' as usize] = Some(Trigger::Emphasis);
        table[b'_' as usize] = Some(Trigger::Emphasis);
        if extensions.contains(Extensions::STRIKETHROUGH) {
            table[b'~' as usize] = Some(Trigger::Emphasis);
        }
        table[b'`' as usize] = Some(Trigger::CodeSpan);
        table[b'\n' as usize] = Some(Trigger::LineBreak);
        table[b'[' as usize] = Some(Trigger::Link);
        table[b'!' as usize] = Some(Trigger::Image);
        table[b'<' as usize] = Some(Trigger::LeftAngle);
        table[b'\\' as usize] = Some(Trigger::Escape);
        table[b'&' as usize] = Some(Trigger::Entity);
        if extensions.contains(Extensions::AUTOLINK) {
            for &b in b"hmfHMF" {
                table[b as usize] = Some(Trigger::AutoLink);
            }
        }
        Self(table)
    }

    #[inline(always)]
    pub fn get(&self, b: u8) -> Option<Trigger> {
        self.0[b as usize]
    }
}

/// Schemes recognized for bare URLs.
const LINK_PREFIXES: &[&str] = &["http://", "https://", "ftp://", "file://", "mailto:"];

/// Letters, digits and anything non-ASCII count as word characters.
#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b >= 0x80
}

impl<S: Sink> Engine<'_, S> {
    /// Scan `data`, whose first byte sits at offset `base` of the buffer
    /// being parsed, and append what it renders to `out`.
    pub(crate) fn inline(&mut self, out: &mut S::Output, data: &str, base: usize) {
        if data.is_empty() {
            return;
        }
        if self.nesting >= self.options.max_nesting {
            debug!(
                "inline nesting reached {} at {}, keeping text",
                self.options.max_nesting, base
            );
            self.sink
                .text(out, Position::new(base, base + data.len()), data);
            return;
        }
        self.nesting += 1;

        let bytes = data.as_bytes();
        let mut text_start = 0;
        let mut i = 0;
        while i < bytes.len() {
            let Some(trigger) = self.triggers.get(bytes[i]) else {
                i += 1;
                continue;
            };
            let mut work = S::Output::default();
            let consumed = match trigger {
                Trigger::Emphasis => self.emphasis(&mut work, data, base, i),
                Trigger::CodeSpan => self.code_span(&mut work, data, base, i),
                Trigger::LineBreak => self.line_break(&mut work, data, base, i),
                Trigger::Link => self.link(&mut work, data, base, i, false),
                Trigger::Image => self.link(&mut work, data, base, i, true),
                Trigger::LeftAngle => self.left_angle(&mut work, data, base, i),
                Trigger::Escape => self.escape(&mut work, data, base, i),
                Trigger::Entity => self.entity(&mut work, data, base, i),
                Trigger::AutoLink => self.autolink(&mut work, data, base, i),
            };
            if consumed == 0 {
                i += 1;
                continue;
            }
            let mut text_end = i;
            if trigger == Trigger::LineBreak {
                while text_end > text_start && bytes[text_end - 1] == b' ' {
                    text_end -= 1;
                }
            }
            self.flush_text(out, data, base, text_start, text_end);
            self.sink.span_source(&mut work, &data[text_end..i + consumed]);
            out.append(work);
            i += consumed;
            text_start = i;
        }
        self.flush_text(out, data, base, text_start, bytes.len());

        self.nesting -= 1;
    }

    #[inline]
    fn flush_text(
        &mut self,
        out: &mut S::Output,
        data: &str,
        base: usize,
        begin: usize,
        end: usize,
    ) {
        if begin < end {
            self.sink
                .text(out, Position::new(base + begin, base + end), &data[begin..end]);
        }
    }

    // ------------------------------------------------------------------
    // Emphasis
    // ------------------------------------------------------------------

    fn emphasis(&mut self, out: &mut S::Output, data: &str, base: usize, offset: usize) -> usize {
        let bytes = data.as_bytes();
        let c = bytes[offset];
        if self.has(Extensions::NO_INTRA_EMPHASIS)
            && offset > 0
            && is_word_byte(bytes[offset - 1])
        {
            return 0;
        }
        let rest = &data[offset..];
        let rb = rest.as_bytes();
        let base = base + offset;

        if rb.len() > 2 && rb[1] != c {
            // whitespace cannot follow an opener; strikethrough needs two
            if c == b'~' || is_space(rb[1]) {
                return 0;
            }
            return self.emphasis_single(out, rest, base, c);
        }
        if rb.len() > 3 && rb[1] == c && rb[2] != c {
            if is_space(rb[2]) {
                return 0;
            }
            return self.emphasis_double(out, rest, base, c);
        }
        if rb.len() > 4 && rb[1] == c && rb[2] == c && rb[3] != c {
            if c == b'~' || is_space(rb[3]) {
                return 0;
            }
            return self.emphasis_triple(out, rest, base, c);
        }
        0
    }

    /// Whether a closer ending just before `after` may close inside a word.
    fn closes_here(&self, bytes: &[u8], after: usize) -> bool {
        !self.has(Extensions::NO_INTRA_EMPHASIS)
            || after >= bytes.len()
            || is_space(bytes[after])
            || is_punct(bytes[after])
    }

    /// Render `content` as an emphasis span covering `data[..consumed]`.
    fn finish_emphasis(
        &mut self,
        out: &mut S::Output,
        data: &str,
        base: usize,
        content: std::ops::Range<usize>,
        consumed: usize,
        kind: EmphasisKind,
    ) -> usize {
        let mut work = S::Output::default();
        self.inline(&mut work, &data[content.clone()], base + content.start);
        if work.is_empty() {
            return 0;
        }
        let pos = Position::new(base, base + consumed);
        if self.sink.emphasis(out, pos, work, kind) {
            consumed
        } else {
            0
        }
    }

    /// `*text*`; `data` starts at the opening marker.
    fn emphasis_single(&mut self, out: &mut S::Output, data: &str, base: usize, c: u8) -> usize {
        let bytes = data.as_bytes();
        let mut i = 1;
        while i < bytes.len() {
            let Some(len) = find_emph_char(&bytes[i..], c) else {
                return 0;
            };
            i += len;
            if i + 1 < bytes.len() && bytes[i + 1] == c {
                // a double marker belongs to a nested strong span
                i += 2;
                continue;
            }
            if !is_space(bytes[i - 1]) && self.closes_here(bytes, i + 1) {
                return self.finish_emphasis(out, data, base, 1..i, i + 1, EmphasisKind::Emphasis);
            }
            i += 1;
        }
        0
    }

    /// `**text**` or `~~text~~`; `data` starts at the opening markers.
    fn emphasis_double(&mut self, out: &mut S::Output, data: &str, base: usize, c: u8) -> usize {
        let bytes = data.as_bytes();
        let kind = if c == b'~' {
            EmphasisKind::Strikethrough
        } else {
            EmphasisKind::Double
        };
        let mut i = 2;
        while i < bytes.len() {
            let Some(len) = find_emph_char(&bytes[i..], c) else {
                return 0;
            };
            i += len;
            if i + 1 < bytes.len()
                && bytes[i + 1] == c
                && i > 2
                && !is_space(bytes[i - 1])
                && self.closes_here(bytes, i + 2)
            {
                return self.finish_emphasis(out, data, base, 2..i, i + 2, kind);
            }
            i += 1;
        }
        0
    }

    /// `***text***`. A shorter closer hands over to the single or double
    /// form so the inner span nests inside the outer one.
    fn emphasis_triple(&mut self, out: &mut S::Output, data: &str, base: usize, c: u8) -> usize {
        let bytes = data.as_bytes();
        let mut i = 3;
        while i < bytes.len() {
            let Some(len) = find_emph_char(&bytes[i..], c) else {
                return 0;
            };
            i += len;
            if is_space(bytes[i - 1]) {
                i += 1;
                continue;
            }
            let run = bytes[i..].iter().take(3).take_while(|&&b| b == c).count();
            return match run {
                3 if self.closes_here(bytes, i + 3) => {
                    self.finish_emphasis(out, data, base, 3..i, i + 3, EmphasisKind::Triple)
                }
                3 => 0,
                // `***a** b*`: strong closes first, inside an emphasis
                2 => self.emphasis_single(out, data, base, c),
                // `***a* b**`: emphasis closes first, inside a strong span
                _ => self.emphasis_double(out, data, base, c),
            };
        }
        0
    }

    // ------------------------------------------------------------------
    // Code spans, breaks, escapes, entities
    // ------------------------------------------------------------------

    fn code_span(&mut self, out: &mut S::Output, data: &str, base: usize, offset: usize) -> usize {
        let bytes = &data.as_bytes()[offset..];
        let ticks = bytes.iter().take_while(|&&b| b == b'`').count();

        let mut run = 0;
        let mut end = ticks;
        while end < bytes.len() && run < ticks {
            if bytes[end] == b'`' {
                run += 1;
            } else {
                run = 0;
            }
            end += 1;
        }
        if run < ticks {
            return 0;
        }

        let mut begin = ticks;
        while begin < end && bytes[begin] == b' ' {
            begin += 1;
        }
        let mut stop = end - ticks;
        while stop > begin && bytes[stop - 1] == b' ' {
            stop -= 1;
        }
        if begin < stop {
            let pos = Position::new(base + offset, base + offset + end);
            let code = &data[offset + begin..offset + stop];
            if !self.sink.code_span(out, pos, code) {
                return 0;
            }
        }
        end
    }

    fn line_break(&mut self, out: &mut S::Output, data: &str, base: usize, offset: usize) -> usize {
        let bytes = data.as_bytes();
        let two_spaces = offset >= 2 && bytes[offset - 2] == b' ' && bytes[offset - 1] == b' ';
        if self.has(Extensions::HARD_LINE_BREAK) || two_spaces {
            let pos = Position::new(base + offset, base + offset + 1);
            if self.sink.line_break(out, pos) {
                return 1;
            }
        }
        if self.has(Extensions::JOIN_LINES) {
            return 1;
        }
        0
    }

    fn escape(&mut self, out: &mut S::Output, data: &str, base: usize, offset: usize) -> usize {
        let Some(&next) = data.as_bytes().get(offset + 1) else {
            return 0;
        };
        let pos = Position::new(base + offset, base + offset + 2);
        if next == b'\n' && self.has(Extensions::BACKSLASH_LINE_BREAK) {
            return if self.sink.line_break(out, pos) { 2 } else { 0 };
        }
        if !is_escapable(next) {
            return 0;
        }
        self.sink.text(out, pos, &data[offset + 1..offset + 2]);
        2
    }

    fn entity(&mut self, out: &mut S::Output, data: &str, base: usize, offset: usize) -> usize {
        let bytes = data.as_bytes();
        let mut end = offset + 1;
        if bytes.get(end) == Some(&b'#') {
            end += 1;
        }
        let name = end;
        while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
            end += 1;
        }
        if end == name || bytes.get(end) != Some(&b';') {
            return 0;
        }
        end += 1;
        let pos = Position::new(base + offset, base + end);
        self.sink.entity(out, pos, &data[offset..end]);
        end - offset
    }

    // ------------------------------------------------------------------
    // Links, images and footnote references
    // ------------------------------------------------------------------

    fn link(
        &mut self,
        out: &mut S::Output,
        data: &str,
        base: usize,
        offset: usize,
        image: bool,
    ) -> usize {
        let open = if image { offset + 1 } else { offset };
        let bytes = data.as_bytes();
        if bytes.get(open) != Some(&b'[') {
            return 0;
        }
        let footnote = !image
            && self.has(Extensions::FOOTNOTES)
            && bytes.get(open + 1) == Some(&b'^');
        if self.inside_link && !image {
            return 0;
        }

        let d = &data[open..];
        let db = d.as_bytes();
        let Some(text_end) = closing_bracket(db) else {
            return 0;
        };
        if footnote {
            return self.footnote_ref(out, d, base + open, text_end);
        }

        let mut i = text_end + 1;
        while i < db.len() && is_space(db[i]) {
            i += 1;
        }

        let (link, title, label, end) = if db.get(i) == Some(&b'(') {
            let Some(inline) = inline_destination(d, i) else {
                return 0;
            };
            (
                unescape(&d[inline.link]),
                inline.title.map(|range| unescape(&d[range]).into_owned()),
                None,
                inline.end,
            )
        } else if db.get(i) == Some(&b'[') {
            let label_start = i + 1;
            let Some(len) = memchr(b']', &db[label_start..]) else {
                return 0;
            };
            let label = if len == 0 {
                &d[1..text_end]
            } else {
                &d[label_start..label_start + len]
            };
            let Some(found) = self.lookup_link(label) else {
                return 0;
            };
            (
                Cow::Owned(unescape(&found.link).into_owned()),
                found.title,
                Some(label),
                label_start + len + 1,
            )
        } else {
            let label = &d[1..text_end];
            let Some(found) = self.lookup_link(label) else {
                return 0;
            };
            (
                Cow::Owned(unescape(&found.link).into_owned()),
                found.title,
                Some(label),
                text_end + 1,
            )
        };

        if link.is_empty() {
            return 0;
        }
        let target = LinkTarget {
            link: &link,
            title: title.as_deref(),
            label,
        };
        let pos = Position::new(base + offset, base + open + end);
        let text = &d[1..text_end];

        if image {
            if !self.sink.image(out, pos, &target, text) {
                return 0;
            }
        } else {
            let mut content = S::Output::default();
            let was_inside = self.inside_link;
            self.inside_link = true;
            self.inline(&mut content, text, base + open + 1);
            self.inside_link = was_inside;
            if content.is_empty() || !self.sink.link(out, pos, &target, content) {
                return 0;
            }
        }
        open + end - offset
    }

    /// `[^label]`; `d` starts at the bracket.
    fn footnote_ref(
        &mut self,
        out: &mut S::Output,
        d: &str,
        base: usize,
        text_end: usize,
    ) -> usize {
        let label = &d[2..text_end];
        if label.trim().is_empty() {
            return 0;
        }
        let Some(number) = self.footnote_number(label) else {
            return 0;
        };
        let pos = Position::new(base, base + text_end + 1);
        if self.sink.footnote_ref(out, pos, label, number) {
            text_end + 1
        } else {
            0
        }
    }

    // ------------------------------------------------------------------
    // Angle brackets and bare URLs
    // ------------------------------------------------------------------

    fn left_angle(&mut self, out: &mut S::Output, data: &str, base: usize, offset: usize) -> usize {
        let d = &data.as_bytes()[offset..];
        let (end, kind) = match html_comment_len(d) {
            Some(len) => (len, None),
            None => tag_length(d),
        };
        if end <= 2 {
            return 0;
        }
        let pos = Position::new(base + offset, base + offset + end);
        let rendered = match kind {
            Some(kind) => {
                let link = unescape(&data[offset + 1..offset + end - 1]);
                !link.is_empty() && self.sink.autolink(out, pos, &link, kind)
            }
            None => self.sink.raw_html(out, pos, &data[offset..offset + end]),
        };
        if rendered {
            end
        } else {
            0
        }
    }

    fn autolink(&mut self, out: &mut S::Output, data: &str, base: usize, offset: usize) -> usize {
        if self.inside_link {
            return 0;
        }
        let bytes = data.as_bytes();
        if offset > 0 && is_word_byte(bytes[offset - 1]) {
            return 0;
        }
        let rest = &bytes[offset..];
        let Some(prefix) = LINK_PREFIXES
            .iter()
            .find(|p| rest.len() > p.len() && rest[..p.len()].eq_ignore_ascii_case(p.as_bytes()))
        else {
            return 0;
        };

        let end = autolink_end(rest);
        if end <= prefix.len() {
            return 0;
        }
        let link = unescape(&data[offset..offset + end]);
        let pos = Position::new(base + offset, base + offset + end);
        if self.sink.autolink(out, pos, &link, AutolinkKind::Normal) {
            end
        } else {
            0
        }
    }
}

/// Offset of the next emphasis candidate `c` in `data`, skipping escaped
/// characters, code spans and link text so a closer is never matched
/// across them.
pub(crate) fn find_emph_char(data: &[u8], c: u8) -> Option<usize> {
    let mut i = 0;
    while i < data.len() {
        while i < data.len() && data[i] != c && data[i] != b'`' && data[i] != b'[' {
            i += 1;
        }
        if i >= data.len() {
            return None;
        }
        if i > 0 && data[i - 1] == b'\\' {
            i += 1;
            continue;
        }
        if data[i] == c {
            return Some(i);
        }

        let mut fallback = None;
        if data[i] == b'`' {
            i += 1;
            while i < data.len() && data[i] != b'`' {
                if fallback.is_none() && data[i] == c {
                    fallback = Some(i);
                }
                i += 1;
            }
            if i >= data.len() {
                // unterminated code span: its markers count after all
                return fallback;
            }
            i += 1;
        } else {
            i += 1;
            while i < data.len() && data[i] != b']' {
                if fallback.is_none() && data[i] == c {
                    fallback = Some(i);
                }
                i += 1;
            }
            i += 1;
            while i < data.len() && (data[i] == b' ' || data[i] == b'\n') {
                i += 1;
            }
            if i >= data.len() {
                return fallback;
            }
            let close = match data[i] {
                b'[' => b']',
                b'(' => b')',
                _ => {
                    if fallback.is_some() {
                        return fallback;
                    }
                    continue;
                }
            };
            i += 1;
            while i < data.len() && data[i] != close {
                if fallback.is_none() && data[i] == c {
                    return Some(i);
                }
                i += 1;
            }
            if i >= data.len() {
                return fallback;
            }
            i += 1;
        }
    }
    None
}

/// Index of the `]` matching the `[` at `data[0]`.
fn closing_bracket(data: &[u8]) -> Option<usize> {
    let mut level = 1;
    let mut i = 1;
    while i < data.len() {
        match data[i] {
            _ if data[i - 1] == b'\\' => {}
            b'[' => level += 1,
            b']' => {
                level -= 1;
                if level == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Parsed `(destination "title")` part of an inline link.
struct InlineDestination {
    link: std::ops::Range<usize>,
    title: Option<std::ops::Range<usize>>,
    /// Offset just past the closing parenthesis.
    end: usize,
}

/// Parse the parenthesized destination starting at `d[open]`.
fn inline_destination(d: &str, open: usize) -> Option<InlineDestination> {
    let db = d.as_bytes();
    let mut i = open + 1;
    while i < db.len() && is_space(db[i]) {
        i += 1;
    }
    let mut link_b = i;
    while i < db.len() {
        match db[i] {
            b'\\' => i += 2,
            b')' | b'\'' | b'"' => break,
            _ => i += 1,
        }
    }
    if i >= db.len() {
        return None;
    }
    let mut link_e = i;

    let mut title = None;
    if db[i] == b'\'' || db[i] == b'"' {
        i += 1;
        let title_b = i;
        while i < db.len() {
            match db[i] {
                b'\\' => i += 2,
                b')' => break,
                _ => i += 1,
            }
        }
        if i >= db.len() {
            return None;
        }
        let mut title_e = i;
        while title_e > title_b && is_space(db[title_e - 1]) {
            title_e -= 1;
        }
        if title_e > title_b && matches!(db[title_e - 1], b'\'' | b'"') {
            title = Some(title_b..title_e - 1);
        } else {
            // no closing quote: the quote belongs to the destination
            link_e = i;
        }
    }

    while link_e > link_b && is_space(db[link_e - 1]) {
        link_e -= 1;
    }
    if link_b < link_e && db[link_b] == b'<' {
        link_b += 1;
    }
    if link_e > link_b && db[link_e - 1] == b'>' {
        link_e -= 1;
    }
    Some(InlineDestination {
        link: link_b..link_e,
        title,
        end: i + 1,
    })
}

/// Remove backslashes used as escapes.
pub(crate) fn unescape(text: &str) -> Cow<'_, str> {
    if memchr(b'\\', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Length of an HTML comment at the start of `data`.
fn html_comment_len(data: &[u8]) -> Option<usize> {
    if !data.starts_with(b"<!--") {
        return None;
    }
    data[4..]
        .windows(3)
        .position(|w| w == b"-->")
        .map(|p| 4 + p + 3)
}

/// Length of a tag or `<...>` autolink at the start of `data`, and the
/// autolink kind when it is one.
pub(crate) fn tag_length(data: &[u8]) -> (usize, Option<AutolinkKind>) {
    if data.len() < 3 || data[0] != b'<' {
        return (0, None);
    }
    let mut i = if data[1] == b'/' { 2 } else { 1 };
    if !data[i].is_ascii_alphanumeric() {
        return (0, None);
    }

    // scheme or mailbox
    while i < data.len()
        && (data[i].is_ascii_alphanumeric() || matches!(data[i], b'.' | b'+' | b'-'))
    {
        i += 1;
    }
    if i > 1 && data.get(i) == Some(&b'@') {
        if let Some(len) = mail_autolink_len(&data[i..]) {
            return (i + len, Some(AutolinkKind::Email));
        }
    }

    let mut kind = None;
    if i > 2 && data.get(i) == Some(&b':') {
        kind = Some(AutolinkKind::Normal);
        i += 1;
    }
    if i >= data.len() {
        return (0, None);
    }
    if kind.is_some() {
        let start = i;
        while i < data.len() {
            match data[i] {
                b'\\' => i += 2,
                b'>' | b'\'' | b'"' => break,
                b if is_space(b) => break,
                _ => i += 1,
            }
        }
        if i >= data.len() {
            return (0, None);
        }
        if i > start && data[i] == b'>' {
            return (i + 1, kind);
        }
    }

    // anything else that ends with '>' is a raw tag
    match memchr(b'>', &data[i..]) {
        Some(p) => (i + p + 1, None),
        None => (0, None),
    }
}

/// `data` starts at the `@` of a possible address; returns the length up to
/// and including the closing `>`.
fn mail_autolink_len(data: &[u8]) -> Option<usize> {
    let mut at_signs = 0;
    for (i, &b) in data.iter().enumerate() {
        match b {
            b'@' => at_signs += 1,
            b'-' | b'.' | b'_' => {}
            b'>' => return (at_signs == 1).then_some(i + 1),
            _ if b.is_ascii_alphanumeric() => {}
            _ => return None,
        }
    }
    None
}

/// End of a bare URL: up to whitespace or `<`, minus trailing punctuation
/// and unbalanced closing brackets or quotes.
fn autolink_end(rest: &[u8]) -> usize {
    let mut end = 0;
    while end < rest.len() && !is_space(rest[end]) && rest[end] != b'<' {
        end += 1;
    }
    if end > 1 && matches!(rest[end - 1], b'.' | b',') && rest[end - 2] != b'\\' {
        end -= 1;
    }
    if end > 1
        && rest[end - 1] == b';'
        && rest[end - 2] != b'\\'
        && !ends_with_entity(&rest[..end])
    {
        end -= 1;
    }
    if end > 0 {
        let last = rest[end - 1];
        let link = &rest[..end];
        let count = |b: u8| link.iter().filter(|&&x| x == b).count();
        let unbalanced = match last {
            b')' => count(b')') > count(b'('),
            b']' => count(b']') > count(b'['),
            b'}' => count(b'}') > count(b'{'),
            b'"' | b'\'' => count(last) % 2 == 1,
            _ => false,
        };
        if unbalanced {
            end -= 1;
        }
    }
    end
}

/// Whether `link` ends with an entity such as `&amp;`.
fn ends_with_entity(link: &[u8]) -> bool {
    let Some(amp) = link.iter().rposition(|&b| b == b'&') else {
        return false;
    };
    let name = &link[amp + 1..link.len() - 1];
    let name = name.strip_prefix(b"#").unwrap_or(name);
    !name.is_empty() && name.iter().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emphasis_candidates_skip_code_spans() {
        assert_eq!(find_emph_char(b"a `*` b*", b'*'), Some(7));
        assert_eq!(find_emph_char(b"a \\* b*", b'*'), Some(6));
        assert_eq!(find_emph_char(b"no closer", b'*'), None);
        // unterminated code span
        assert_eq!(find_emph_char(b"`a*b", b'*'), Some(2));
    }

    #[test]
    fn emphasis_candidates_skip_links() {
        assert_eq!(find_emph_char(b"[x*y](/u) z*", b'*'), Some(11));
    }

    #[test]
    fn tags_and_autolinks() {
        assert_eq!(tag_length(b"<span class=\"x\">"), (16, None));
        assert_eq!(tag_length(b"</em>"), (5, None));
        assert_eq!(
            tag_length(b"<http://example.com/a>"),
            (22, Some(AutolinkKind::Normal))
        );
        assert_eq!(
            tag_length(b"<me@example.com>"),
            (16, Some(AutolinkKind::Email))
        );
        assert_eq!(tag_length(b"< notatag>"), (0, None));
        assert_eq!(tag_length(b"<a"), (0, None));
    }

    #[test]
    fn bare_url_ends() {
        assert_eq!(autolink_end(b"http://a.b/c. next"), 12);
        assert_eq!(autolink_end(b"http://a.b/c)"), 12);
        assert_eq!(autolink_end(b"http://a.b/(c)"), 14);
        assert_eq!(autolink_end(b"http://a.b/?x=1&amp;"), 20);
        assert_eq!(autolink_end(b"http://a.b/x;"), 12);
    }

    #[test]
    fn unescaping() {
        assert_eq!(unescape("a\\_b\\\\c"), "a_b\\c");
        assert!(matches!(unescape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn inline_destinations() {
        let d = "[a](/url \"title\")";
        let dest = inline_destination(d, 3).unwrap();
        assert_eq!(&d[dest.link], "/url");
        assert_eq!(&d[dest.title.unwrap()], "title");
        assert_eq!(dest.end, d.len());

        let d = "[a]( <a b> )";
        let dest = inline_destination(d, 3).unwrap();
        assert_eq!(&d[dest.link], "a b");
    }
}
