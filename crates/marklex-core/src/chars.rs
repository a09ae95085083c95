//! Byte and code point predicates shared by the block and inline scanners.

/// Space, tab, newline, carriage return, form feed or vertical tab.
#[inline(always)]
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Space or tab: whitespace that does not end a line.
#[inline(always)]
pub fn is_horizontal_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// ASCII punctuation as understood by emphasis and escape handling.
#[inline(always)]
pub fn is_punct(b: u8) -> bool {
    b.is_ascii_punctuation()
}

/// ASCII letter or digit.
#[inline(always)]
pub fn is_alnum(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

/// Letter or digit in any script.
#[inline]
pub fn is_alnum_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Characters a backslash may escape.
#[inline]
pub fn is_escapable(b: u8) -> bool {
    matches!(
        b,
        b'\\' | b'`'
            | b'*'
            | b'_'
            | b'{'
            | b'}'
            | b'['
            | b']'
            | b'('
            | b')'
            | b'#'
            | b'+'
            | b'-'
            | b'.'
            | b'!'
            | b':'
            | b'|'
            | b'&'
            | b'<'
            | b'>'
            | b'~'
            | b'"'
            | b'\''
            | b'^'
            | b'='
    )
}

/// Width in columns of the leading whitespace of `line`, and the number of
/// bytes it spans. Tabs advance to the next multiple of `tab_size`.
pub fn indentation(line: &[u8], tab_size: usize) -> (usize, usize) {
    let mut columns = 0;
    let mut bytes = 0;
    for &b in line {
        match b {
            b' ' => columns += 1,
            b'\t' => columns += tab_size - (columns % tab_size),
            _ => break,
        }
        bytes += 1;
    }
    (columns, bytes)
}

/// Byte count to skip so that at most `max_columns` of indentation are
/// removed from `line`. A tab straddling the limit is not consumed.
pub fn strip_columns(line: &[u8], max_columns: usize, tab_size: usize) -> usize {
    let mut columns = 0;
    let mut bytes = 0;
    for &b in line {
        let width = match b {
            b' ' => 1,
            b'\t' => tab_size - (columns % tab_size),
            _ => break,
        };
        if columns + width > max_columns {
            break;
        }
        columns += width;
        bytes += 1;
    }
    bytes
}

/// Offset just past the end of the line starting at `start` (including its
/// newline when present).
#[inline]
pub fn line_end(data: &[u8], start: usize) -> usize {
    match memchr::memchr(b'\n', &data[start..]) {
        Some(pos) => start + pos + 1,
        None => data.len(),
    }
}

/// True when the line starting at the beginning of `line` holds only
/// horizontal whitespace up to its newline or the end of the buffer.
#[inline]
pub fn is_blank_line(line: &[u8]) -> bool {
    line.iter()
        .take_while(|&&b| b != b'\n')
        .all(|&b| is_horizontal_space(b) || b == b'\r')
}

/// Length of the blank line at the start of `data` (including its newline),
/// or 0 when the first line has content.
#[inline]
pub(crate) fn blank_line_len(data: &[u8]) -> usize {
    if is_blank_line(data) {
        line_end(data, 0)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indentation_counts_tabs_to_the_next_stop() {
        assert_eq!(indentation(b"  x", 4), (2, 2));
        assert_eq!(indentation(b" \tx", 4), (4, 2));
        assert_eq!(indentation(b"\tx", 8), (8, 1));
        assert_eq!(indentation(b"x", 4), (0, 0));
    }

    #[test]
    fn strip_columns_stops_before_a_wide_tab() {
        assert_eq!(strip_columns(b"      x", 4, 4), 4);
        assert_eq!(strip_columns(b"  \tx", 3, 4), 2);
        assert_eq!(strip_columns(b"\tx", 4, 4), 1);
    }

    #[test]
    fn blank_lines() {
        assert_eq!(blank_line_len(b"   \nnext"), 4);
        assert_eq!(blank_line_len(b"\t"), 1);
        assert_eq!(blank_line_len(b" a\n"), 0);
    }
}
