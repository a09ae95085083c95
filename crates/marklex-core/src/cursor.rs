//! UTF-8 cursor over the raw input bytes.
//!
//! The cursor is the only component that decodes code points. Every byte the
//! block scanner consumes passes through [`Cursor::next`], so a malformed
//! sequence anywhere in the document surfaces as
//! [`ParseError::InvalidEncoding`] before any output is produced.

use crate::error::ParseError;

/// Decodes one code point at a time with a single level of undo.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    /// Width of the code point returned by the last `next`, 0 when there is
    /// nothing to undo.
    last_width: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `bytes`.
    #[inline]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            last_width: 0,
        }
    }

    /// Create a cursor positioned at `offset`.
    ///
    /// `offset` must lie on a code point boundary; the next call to
    /// [`next`](Self::next) validates the sequence found there.
    #[inline]
    pub fn starting_at(bytes: &'a [u8], offset: usize) -> Self {
        Self {
            bytes,
            offset: offset.min(bytes.len()),
            last_width: 0,
        }
    }

    /// Current byte offset.
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The whole underlying buffer.
    #[inline(always)]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Unconsumed input.
    #[inline(always)]
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }

    /// Check if all input has been consumed.
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    /// Decode the code point at the current offset and advance past it.
    ///
    /// Returns `Ok(None)` at end of input.
    pub fn next(&mut self) -> Result<Option<char>, ParseError> {
        if self.is_eof() {
            self.last_width = 0;
            return Ok(None);
        }
        let lead = self.bytes[self.offset];
        if lead < 0x80 {
            self.offset += 1;
            self.last_width = 1;
            return Ok(Some(lead as char));
        }
        let width = match lead {
            0xc2..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf4 => 4,
            _ => return Err(ParseError::invalid_encoding(self.offset)),
        };
        let end = self.offset + width;
        let decoded = self
            .bytes
            .get(self.offset..end)
            .and_then(|seq| std::str::from_utf8(seq).ok())
            .and_then(|s| s.chars().next())
            .ok_or_else(|| ParseError::invalid_encoding(self.offset))?;
        self.offset = end;
        self.last_width = width;
        Ok(Some(decoded))
    }

    /// Rewind exactly the code point returned by the last [`next`](Self::next).
    ///
    /// Only one level of undo exists; a second call without an intervening
    /// `next` is an error.
    pub fn backup(&mut self) -> Result<(), ParseError> {
        if self.last_width == 0 {
            return Err(ParseError::CursorBackup {
                offset: self.offset,
            });
        }
        self.offset -= self.last_width;
        self.last_width = 0;
        Ok(())
    }

    /// Look at the next code point without consuming it.
    pub fn peek(&mut self) -> Result<Option<char>, ParseError> {
        match self.next()? {
            Some(c) => {
                self.backup()?;
                Ok(Some(c))
            }
            None => Ok(None),
        }
    }

    /// Consume code points until the offset reaches `end` (clamped to the
    /// buffer length), validating every sequence on the way.
    pub fn advance_to(&mut self, end: usize) -> Result<(), ParseError> {
        let end = end.min(self.bytes.len());
        while self.offset < end {
            // ASCII fast path, the common case for markup
            let run = self.bytes[self.offset..end]
                .iter()
                .take_while(|b| b.is_ascii())
                .count();
            if run > 0 {
                self.offset += run;
                self.last_width = 1;
                continue;
            }
            self.next()?;
        }
        Ok(())
    }

    /// Consume the rest of the current line including its newline.
    pub fn skip_line(&mut self) -> Result<(), ParseError> {
        let end = crate::chars::line_end(self.bytes, self.offset);
        self.advance_to(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_decodes_multibyte_code_points() {
        let mut cursor = Cursor::new("aé€😀".as_bytes());
        assert_eq!(cursor.next().unwrap(), Some('a'));
        assert_eq!(cursor.next().unwrap(), Some('é'));
        assert_eq!(cursor.offset(), 3);
        assert_eq!(cursor.next().unwrap(), Some('€'));
        assert_eq!(cursor.next().unwrap(), Some('😀'));
        assert_eq!(cursor.next().unwrap(), None);
        assert!(cursor.is_eof());
    }

    #[test]
    fn backup_rewinds_one_code_point() {
        let mut cursor = Cursor::new("é!".as_bytes());
        cursor.next().unwrap();
        cursor.backup().unwrap();
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.peek().unwrap(), Some('é'));
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn double_backup_fails_loudly() {
        let mut cursor = Cursor::new(b"ab");
        cursor.next().unwrap();
        cursor.backup().unwrap();
        let err = cursor.backup().unwrap_err();
        assert_eq!(err, ParseError::CursorBackup { offset: 0 });
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn invalid_sequences_are_rejected() {
        let mut cursor = Cursor::new(b"a\xff");
        cursor.next().unwrap();
        assert_eq!(
            cursor.next().unwrap_err(),
            ParseError::InvalidEncoding { offset: 1 }
        );

        // truncated three-byte sequence
        let mut cursor = Cursor::new(b"\xe2\x82");
        assert!(cursor.next().is_err());

        // overlong encoding of '/'
        let mut cursor = Cursor::new(b"\xc0\xaf");
        assert!(cursor.next().is_err());
    }

    #[test]
    fn advance_to_validates_skipped_bytes() {
        let mut cursor = Cursor::new(b"abc\xffdef");
        assert!(cursor.advance_to(3).is_ok());
        assert!(cursor.advance_to(7).is_err());
    }
}
