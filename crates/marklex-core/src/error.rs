use crate::span::Position;

/// Error kinds for categorizing parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Malformed UTF-8 in the input buffer.
    InvalidEncoding,
    /// A block buffer was not newline-terminated.
    MissingNewline,
    /// The cursor was rewound twice without advancing in between.
    CursorBackup,
}

/// A fatal error that aborts the conversion of a whole document.
///
/// Constructs that merely fail to match are never reported here: the
/// scanners fall back to a less specific reading instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The byte sequence at `offset` is not valid UTF-8.
    #[error("invalid UTF-8 sequence at byte {offset}")]
    InvalidEncoding {
        /// Offset of the first byte of the bad sequence.
        offset: usize,
    },
    /// Block text handed to the block parser did not end with a newline.
    #[error("block text at bytes {}..{} is not newline-terminated", span.begin, span.end)]
    MissingNewline {
        /// The unterminated block.
        span: Position,
    },
    /// `Cursor::backup` was called twice without an intervening `next`.
    #[error("cursor backed up twice without advancing at byte {offset}")]
    CursorBackup {
        /// Cursor offset at the time of the second backup.
        offset: usize,
    },
}

impl ParseError {
    /// Create an error for a malformed byte sequence.
    pub fn invalid_encoding(offset: usize) -> Self {
        ParseError::InvalidEncoding { offset }
    }

    /// Create an error for an unterminated block buffer.
    pub fn missing_newline(span: Position) -> Self {
        ParseError::MissingNewline { span }
    }

    /// The category of this error.
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::InvalidEncoding { .. } => ParseErrorKind::InvalidEncoding,
            ParseError::MissingNewline { .. } => ParseErrorKind::MissingNewline,
            ParseError::CursorBackup { .. } => ParseErrorKind::CursorBackup,
        }
    }

    /// Source location where the error occurred.
    pub fn span(&self) -> Position {
        match self {
            ParseError::InvalidEncoding { offset } | ParseError::CursorBackup { offset } => {
                Position::at(*offset)
            }
            ParseError::MissingNewline { span } => *span,
        }
    }
}
