//! Output types from the pagination engine.
//!
//! Coordinates are absolute page pixels at the base resolution (72 DPI), origin at
//! the top-left corner, y growing downwards.

use crate::metrics::TextStyle;
use penmark_markup::{Tag, Token};
use std::ops::Range;

/// Why a line ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    /// The next word did not fit.
    Wrap,
    /// An overlong word was cut and a hyphen inserted.
    Hyphen,
    /// Newline, `<br>` or a block boundary.
    Hard,
    /// Last line of the input.
    End,
}

/// A run of characters drawn with one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub x: f32,
    pub width: f32,
    pub style: TextStyle,
    pub underline: bool,
    /// Index of the source word within its paragraph.
    pub word_index: usize,
    /// Offset of `text`'s first character within the source word, non-zero for the
    /// tail pieces of a hyphenated word.
    pub char_offset: usize,
    /// `text` ends with an inserted hyphen that is not part of the source.
    pub hyphenated: bool,
    /// List bullet or ordinal rather than source text.
    pub marker: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// y of the ruled line the glyphs stand on.
    pub baseline_y: f32,
    /// Vertical space the line consumed.
    pub pitch: f32,
    pub spans: Vec<Span>,
    pub paragraph_index: usize,
    pub rtl: bool,
    pub break_kind: BreakKind,
    pub heading: Option<u8>,
}

impl Line {
    pub fn is_blank(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        for span in self.spans.iter().filter(|s| !s.marker) {
            if !out.is_empty() && span.char_offset == 0 {
                out.push(' ');
            }
            out.push_str(&span.text);
        }
        out
    }
}

/// An inline image moved whole onto a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    pub src: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Number of line pitches reserved for the image.
    pub reserved_lines: usize,
}

impl ImagePlacement {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// The content that landed on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutPage {
    pub index: usize,
    pub lines: Vec<Line>,
    pub images: Vec<ImagePlacement>,
    /// Tokens whose layout started on this page.
    pub token_range: Range<usize>,
    /// Formatting tags open when the page started.
    pub open_tags: Vec<Tag>,
}

impl LaidOutPage {
    pub(crate) fn new(index: usize, token_start: usize, open_tags: Vec<Tag>) -> Self {
        Self {
            index,
            lines: Vec::new(),
            images: Vec::new(),
            token_range: token_start..token_start,
            open_tags,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.lines.iter().all(Line::is_blank)
    }

    /// Text of every line joined by `\n`, markers excluded.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn last_baseline(&self) -> Option<f32> {
        self.lines.last().map(|l| l.baseline_y)
    }

    pub fn glyph_count(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|l| &l.spans)
            .map(|s| s.text.chars().filter(|c| !c.is_whitespace()).count())
            .sum()
    }

    /// Re-serialises the tokens that start on this page as markup, re-opening the tags
    /// that were open when the page began so the text stands on its own.
    pub fn source_markup(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        for tag in &self.open_tags {
            Token::Tag(tag.clone()).write_markup(&mut out);
        }
        let end = self.token_range.end.min(tokens.len());
        let start = self.token_range.start.min(end);
        for token in &tokens[start..end] {
            token.write_markup(&mut out);
        }
        out
    }
}
