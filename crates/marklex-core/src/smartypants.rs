//! Smart punctuation for the HTML renderer.
//!
//! Runs over text that has already been HTML-escaped and replaces straight
//! quotes, dashes, ellipses, `(c)`-style symbols and simple fractions with
//! their typographic entities.
//!
//! # Example
//!
//! ```rust
//! use marklex_core::html::HtmlFlags;
//! use marklex_core::smartypants::SmartyPants;
//!
//! let smarty = SmartyPants::new(HtmlFlags::SMARTYPANTS_DASHES);
//! let mut out = String::new();
//! smarty.render(&mut out, "it's 1/2 -- &quot;done&quot;...");
//! assert_eq!(
//!     out,
//!     "it&rsquo;s &frac12; &mdash; &ldquo;done&rdquo;&hellip;"
//! );
//! ```

use crate::chars::{is_punct, is_space};
use crate::html::HtmlFlags;

/// Quote nesting carried across one text run.
#[derive(Debug, Default)]
struct QuoteState {
    in_single: bool,
    in_double: bool,
}

/// Smart punctuation configured from the `SMARTYPANTS_*` HTML flags.
#[derive(Debug, Clone, Copy)]
pub struct SmartyPants {
    dashes: bool,
    latex_dashes: bool,
    fractions: bool,
    angled_quotes: bool,
    quotes_nbsp: bool,
}

#[inline]
fn word_boundary(c: u8) -> bool {
    c == 0 || is_space(c) || is_punct(c)
}

impl SmartyPants {
    pub fn new(flags: HtmlFlags) -> Self {
        Self {
            dashes: flags.contains(HtmlFlags::SMARTYPANTS_DASHES),
            latex_dashes: flags.contains(HtmlFlags::SMARTYPANTS_LATEX_DASHES),
            fractions: flags.contains(HtmlFlags::SMARTYPANTS_FRACTIONS),
            angled_quotes: flags.contains(HtmlFlags::SMARTYPANTS_ANGLED_QUOTES),
            quotes_nbsp: flags.contains(HtmlFlags::SMARTYPANTS_QUOTES_NBSP),
        }
    }

    /// Append `escaped` to `out` with smart punctuation applied.
    pub fn render(&self, out: &mut String, escaped: &str) {
        let text = escaped.as_bytes();
        let mut state = QuoteState::default();
        let mut mark = 0;
        let mut i = 0;
        while i < text.len() {
            let c = text[i];
            let handled = match c {
                b'&' | b'\'' | b'(' | b'.' | b'`' => true,
                b'-' => self.dashes,
                b'1' | b'3' => true,
                b'2' | b'4'..=b'9' => self.fractions,
                _ => false,
            };
            if !handled {
                i += 1;
                continue;
            }
            out.push_str(&escaped[mark..i]);
            let previous = if i > 0 { text[i - 1] } else { 0 };
            let rest = &text[i..];
            let skip = match c {
                b'&' => self.amp(out, &mut state, previous, rest),
                b'\'' => single_quote(out, &mut state, previous, rest),
                b'(' => parens(out, rest),
                b'.' => period(out, rest),
                b'`' => backtick(out, &mut state, previous, rest),
                b'-' if self.latex_dashes => dash_latex(out, rest),
                b'-' => dash(out, previous, rest),
                _ if self.fractions => fraction(out, previous, rest),
                _ => common_fraction(out, previous, rest),
            };
            i += skip + 1;
            mark = i;
        }
        if mark < text.len() {
            out.push_str(&escaped[mark..]);
        }
    }

    fn amp(&self, out: &mut String, state: &mut QuoteState, previous: u8, text: &[u8]) -> usize {
        if text.starts_with(b"&quot;") {
            let next = text.get(6).copied().unwrap_or(0);
            let quote = if self.angled_quotes { b'a' } else { b'd' };
            smart_quote(out, previous, next, quote, &mut state.in_double, self.quotes_nbsp);
            return 5;
        }
        if text.starts_with(b"&#0;") {
            return 3;
        }
        out.push('&');
        0
    }
}

/// Write an opening or closing quote entity, deciding which from the
/// characters around it. `quote` is `d`, `s` or `a` (angled).
fn smart_quote(out: &mut String, previous: u8, next: u8, quote: u8, open: &mut bool, nbsp: bool) {
    *open = match (previous, next) {
        (0, 0) => !*open,
        (p, 0) if is_space(p) => true,
        (_, 0) => false,
        (0, n) if is_space(n) => false,
        (p, n) if is_space(p) && is_space(n) => !*open,
        (_, n) if is_space(n) => false,
        (0, n) if is_punct(n) => false,
        (p, n) if is_space(p) && is_punct(n) => true,
        (p, n) if is_punct(p) && is_punct(n) => !*open,
        (_, n) if is_punct(n) => false,
        (0, _) => true,
        (p, _) if is_space(p) || is_punct(p) => true,
        // a'b: probably a contraction
        _ => false,
    };

    if nbsp && !*open {
        out.push_str("&nbsp;");
    }
    out.push('&');
    out.push(if *open { 'l' } else { 'r' });
    out.push(quote as char);
    out.push_str("quo;");
    if nbsp && *open {
        out.push_str("&nbsp;");
    }
}

fn single_quote(out: &mut String, state: &mut QuoteState, previous: u8, text: &[u8]) -> usize {
    if text.len() >= 2 {
        let t1 = text[1].to_ascii_lowercase();
        if t1 == b'\'' {
            let next = text.get(2).copied().unwrap_or(0);
            smart_quote(out, previous, next, b'd', &mut state.in_double, false);
            return 1;
        }
        let boundary_at = |n: usize| text.len() <= n || word_boundary(text[n]);
        if matches!(t1, b's' | b't' | b'm' | b'd') && boundary_at(2) {
            out.push_str("&rsquo;");
            return 0;
        }
        if text.len() >= 3 {
            let t2 = text[2].to_ascii_lowercase();
            if matches!((t1, t2), (b'r', b'e') | (b'l', b'l') | (b'v', b'e')) && boundary_at(3) {
                out.push_str("&rsquo;");
                return 0;
            }
        }
    }
    let next = text.get(1).copied().unwrap_or(0);
    smart_quote(out, previous, next, b's', &mut state.in_single, false);
    0
}

fn parens(out: &mut String, text: &[u8]) -> usize {
    if text.len() >= 3 {
        let t1 = text[1].to_ascii_lowercase();
        let t2 = text[2].to_ascii_lowercase();
        match (t1, t2) {
            (b'c', b')') => {
                out.push_str("&copy;");
                return 2;
            }
            (b'r', b')') => {
                out.push_str("&reg;");
                return 2;
            }
            (b't', b'm') if text.get(3) == Some(&b')') => {
                out.push_str("&trade;");
                return 3;
            }
            _ => {}
        }
    }
    out.push('(');
    0
}

fn dash(out: &mut String, previous: u8, text: &[u8]) -> usize {
    if text.len() >= 2 {
        if text[1] == b'-' {
            out.push_str("&mdash;");
            return 1;
        }
        if word_boundary(previous) && word_boundary(text[1]) {
            out.push_str("&ndash;");
            return 0;
        }
    }
    out.push('-');
    0
}

fn dash_latex(out: &mut String, text: &[u8]) -> usize {
    if text.starts_with(b"---") {
        out.push_str("&mdash;");
        return 2;
    }
    if text.starts_with(b"--") {
        out.push_str("&ndash;");
        return 1;
    }
    out.push('-');
    0
}

fn period(out: &mut String, text: &[u8]) -> usize {
    if text.starts_with(b"...") {
        out.push_str("&hellip;");
        return 2;
    }
    if text.starts_with(b". . .") {
        out.push_str("&hellip;");
        return 4;
    }
    out.push('.');
    0
}

fn backtick(out: &mut String, state: &mut QuoteState, previous: u8, text: &[u8]) -> usize {
    if text.starts_with(b"``") {
        let next = text.get(2).copied().unwrap_or(0);
        smart_quote(out, previous, next, b'd', &mut state.in_double, false);
        return 1;
    }
    out.push('`');
    0
}

/// `1/2`, `1/4` and `3/4` as single-glyph entities.
fn common_fraction(out: &mut String, previous: u8, text: &[u8]) -> usize {
    if word_boundary(previous) && previous != b'/' && text.len() >= 3 && text[1] == b'/' {
        let ends_word = text.len() < 4 || (word_boundary(text[3]) && text[3] != b'/');
        let suffix = |s: &[u8]| {
            text.len() >= 3 + s.len() && text[3..3 + s.len()].eq_ignore_ascii_case(s)
        };
        let entity = match (text[0], text[2]) {
            (b'1', b'2') if ends_word => Some("&frac12;"),
            (b'1', b'4') if ends_word || suffix(b"th") => Some("&frac14;"),
            (b'3', b'4') if ends_word || suffix(b"ths") => Some("&frac34;"),
            _ => None,
        };
        if let Some(entity) = entity {
            out.push_str(entity);
            return 2;
        }
    }
    out.push(text[0] as char);
    0
}

/// Any `digits/digits` as a superscript over subscript fraction. Dates
/// such as `1/23/2005` are left alone.
fn fraction(out: &mut String, previous: u8, text: &[u8]) -> usize {
    if word_boundary(previous) && previous != b'/' && text.len() >= 3 {
        let num_end = text.iter().take_while(|b| b.is_ascii_digit()).count();
        // '/' or U+2044 FRACTION SLASH
        let den_start = if text[num_end..].starts_with("\u{2044}".as_bytes()) {
            Some(num_end + 3)
        } else if text.get(num_end) == Some(&b'/') {
            Some(num_end + 1)
        } else {
            None
        };
        if let Some(den_start) = den_start {
            let den_end = den_start
                + text[den_start..]
                    .iter()
                    .take_while(|b| b.is_ascii_digit())
                    .count();
            let closes = den_end == text.len()
                || (word_boundary(text[den_end]) && text[den_end] != b'/');
            if den_end > den_start && closes {
                // digits are ASCII
                out.push_str("<sup>");
                out.extend(text[..num_end].iter().map(|&b| b as char));
                out.push_str("</sup>&frasl;<sub>");
                out.extend(text[den_start..den_end].iter().map(|&b| b as char));
                out.push_str("</sub>");
                return den_end - 1;
            }
        }
    }
    out.push(text[0] as char);
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smarty(flags: HtmlFlags, text: &str) -> String {
        let mut out = String::new();
        SmartyPants::new(flags).render(&mut out, text);
        out
    }

    #[test]
    fn quotes() {
        assert_eq!(
            smarty(HtmlFlags::empty(), "&quot;hi&quot; 'there'"),
            "&ldquo;hi&rdquo; &lsquo;there&rsquo;"
        );
        assert_eq!(smarty(HtmlFlags::empty(), "don't"), "don&rsquo;t");
        assert_eq!(smarty(HtmlFlags::empty(), "we're"), "we&rsquo;re");
        assert_eq!(
            smarty(HtmlFlags::SMARTYPANTS_ANGLED_QUOTES, "&quot;x&quot;"),
            "&laquo;x&raquo;"
        );
    }

    #[test]
    fn dashes() {
        let flags = HtmlFlags::SMARTYPANTS_DASHES;
        assert_eq!(smarty(flags, "a -- b"), "a &mdash; b");
        assert_eq!(smarty(flags, "a - b"), "a &ndash; b");
        assert_eq!(smarty(flags, "well-known"), "well-known");
        assert_eq!(smarty(HtmlFlags::empty(), "a -- b"), "a -- b");

        let latex = flags | HtmlFlags::SMARTYPANTS_LATEX_DASHES;
        assert_eq!(smarty(latex, "a --- b -- c"), "a &mdash; b &ndash; c");
    }

    #[test]
    fn symbols_and_ellipsis() {
        assert_eq!(
            smarty(HtmlFlags::empty(), "(c) (R) (tm) wait..."),
            "&copy; &reg; &trade; wait&hellip;"
        );
        assert_eq!(smarty(HtmlFlags::empty(), "&lt;b&gt;"), "&lt;b&gt;");
    }

    #[test]
    fn fractions() {
        assert_eq!(smarty(HtmlFlags::empty(), "1/2 3/4 1/23/2005"), "&frac12; &frac34; 1/23/2005");
        assert_eq!(
            smarty(HtmlFlags::SMARTYPANTS_FRACTIONS, "5/16 in"),
            "<sup>5</sup>&frasl;<sub>16</sub> in"
        );
        assert_eq!(smarty(HtmlFlags::SMARTYPANTS_FRACTIONS, "2005"), "2005");
    }
}
