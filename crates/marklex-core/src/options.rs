//! Extension flags and per-call parser options.

use std::fmt;

use crate::refs::Reference;

bitflags::bitflags! {
    /// Opt-in Markdown dialect features, combined with `|`.
    ///
    /// [`Extensions::COMMON`] is the preset used by
    /// [`markdown_common`](crate::markdown_common).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Extensions: u32 {
        /// Ignore emphasis markers inside words (`snake_case_name`).
        const NO_INTRA_EMPHASIS = 1 << 0;
        /// Pipe tables.
        const TABLES = 1 << 1;
        /// Fenced code blocks with backticks or tildes.
        const FENCED_CODE = 1 << 2;
        /// Turn bare URLs into links.
        const AUTOLINK = 1 << 3;
        /// `~~strikethrough~~`.
        const STRIKETHROUGH = 1 << 4;
        /// HTML blocks need not be followed by a blank line.
        const LAX_HTML_BLOCKS = 1 << 5;
        /// Require a space between `#` and the heading text.
        const SPACE_HEADERS = 1 << 6;
        /// Every newline inside a paragraph is a line break.
        const HARD_LINE_BREAK = 1 << 7;
        /// Tabs advance to multiples of 8 instead of 4.
        const TAB_SIZE_EIGHT = 1 << 8;
        /// `[^note]` references and `[^note]: text` definitions.
        const FOOTNOTES = 1 << 9;
        /// Lists, quotes and code may start without a blank line before them.
        const NO_EMPTY_LINE_BEFORE_BLOCK = 1 << 10;
        /// `# Heading {#id}` sets the heading id.
        const HEADER_IDS = 1 << 11;
        /// `%` title block at the start of the document.
        const TITLEBLOCK = 1 << 12;
        /// Derive heading ids from the heading text.
        const AUTO_HEADER_IDS = 1 << 13;
        /// A backslash before a newline is a line break.
        const BACKSLASH_LINE_BREAK = 1 << 14;
        /// Term / `: definition` lists.
        const DEFINITION_LISTS = 1 << 15;
        /// Drop newlines inside paragraphs instead of keeping them.
        const JOIN_LINES = 1 << 16;

        /// The common preset.
        const COMMON = Self::NO_INTRA_EMPHASIS.bits()
            | Self::TABLES.bits()
            | Self::FENCED_CODE.bits()
            | Self::AUTOLINK.bits()
            | Self::STRIKETHROUGH.bits()
            | Self::SPACE_HEADERS.bits()
            | Self::HEADER_IDS.bits()
            | Self::BACKSLASH_LINE_BREAK.bits()
            | Self::DEFINITION_LISTS.bits();
    }
}

impl Extensions {
    /// Columns a tab advances to.
    #[inline]
    pub fn tab_size(self) -> usize {
        if self.contains(Extensions::TAB_SIZE_EIGHT) {
            8
        } else {
            4
        }
    }
}

/// Default cap on inline recursion depth.
pub const DEFAULT_MAX_NESTING: usize = 16;

/// Callback that may supply a reference before the document's own
/// definitions are consulted. It receives the raw label text.
pub type RefOverride<'a> = &'a dyn Fn(&str) -> Option<Reference>;

/// Per-call configuration for [`render`](crate::render) and
/// [`parse`](crate::parse).
#[derive(Clone, Copy)]
pub struct Options<'a> {
    /// Enabled dialect features.
    pub extensions: Extensions,
    /// Optional reference lookup override.
    pub ref_override: Option<RefOverride<'a>>,
    /// Inline recursion cap; deeper markup renders as plain text.
    pub max_nesting: usize,
}

impl<'a> Options<'a> {
    /// Options with the given extensions and no override.
    pub fn new(extensions: Extensions) -> Self {
        Self {
            extensions,
            ref_override: None,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    /// Install a reference lookup override.
    pub fn with_ref_override(mut self, lookup: RefOverride<'a>) -> Self {
        self.ref_override = Some(lookup);
        self
    }
}

impl Default for Options<'_> {
    fn default() -> Self {
        Options::new(Extensions::empty())
    }
}

impl fmt::Debug for Options<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("extensions", &self.extensions)
            .field("ref_override", &self.ref_override.is_some())
            .field("max_nesting", &self.max_nesting)
            .finish()
    }
}
