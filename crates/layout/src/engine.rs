//! The pagination engine: tokens in, laid-out pages out.
//!
//! The cursor walks tokens strictly in document order. Words are placed on the current
//! line until the next one would cross the right edge; a line is only given a vertical
//! position when it is committed, and if it does not fit above the bottom margin the
//! page is closed first, so the committed line opens the next page.

use crate::LayoutError;
use crate::algorithms::pagination::check_child_fit;
use crate::config::LayoutConfig;
use crate::direction::{paragraph_breaks, paragraph_directions};
use crate::interface::ImageSizer;
use crate::metrics::{GlyphMetrics, TextStyle};
use crate::output::{BreakKind, ImagePlacement, LaidOutPage, Line, Span};
use penmark_markup::{Tag, TagKind, Token};
use penmark_types::{PageGeometry, RenderingSettings, Size};

const EPSILON: f32 = 0.01;

/// Lays out `tokens` with the default [`LayoutConfig`].
pub fn paginate(
    tokens: &[Token],
    geometry: &PageGeometry,
    settings: &RenderingSettings,
    metrics: &dyn GlyphMetrics,
    images: &dyn ImageSizer,
) -> Result<Vec<LaidOutPage>, LayoutError> {
    Paginator::default().paginate(tokens, geometry, settings, metrics, images)
}

#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: LayoutConfig,
}

impl Paginator {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Always returns at least one page. Identical inputs give identical pages.
    pub fn paginate(
        &self,
        tokens: &[Token],
        geometry: &PageGeometry,
        settings: &RenderingSettings,
        metrics: &dyn GlyphMetrics,
        images: &dyn ImageSizer,
    ) -> Result<Vec<LaidOutPage>, LayoutError> {
        validate(settings)?;

        let mut flow = Flow::new(&self.config, geometry, settings, metrics, images, tokens);
        for (index, token) in tokens.iter().enumerate() {
            flow.token_index = index;
            match token {
                Token::Word(word) => flow.place_word(word),
                Token::Whitespace(ws) => flow.whitespace(ws),
                Token::Tag(tag) => {
                    flow.tag(tag);
                    flow.next_paragraph(paragraph_breaks(token));
                }
            }
        }
        let pages = flow.finish();
        log::debug!(
            "Paginated {} tokens into {} page(s)",
            tokens.len(),
            pages.len()
        );
        Ok(pages)
    }
}

fn validate(settings: &RenderingSettings) -> Result<(), LayoutError> {
    if !(settings.font_size_px.is_finite() && settings.font_size_px > 0.0) {
        return Err(LayoutError::InvalidSettings(format!(
            "font size must be positive, got {}",
            settings.font_size_px
        )));
    }
    for (name, value) in [
        ("letter spacing", settings.letter_spacing_px),
        ("word spacing", settings.word_spacing_px),
    ] {
        if !value.is_finite() {
            return Err(LayoutError::InvalidSettings(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
    }
    Ok(())
}

struct ListFrame {
    ordered: bool,
    next: usize,
}

/// Where the line under construction started in the token stream.
struct LineStart {
    token: usize,
    open_tags: Vec<Tag>,
}

struct Flow<'a> {
    config: &'a LayoutConfig,
    geometry: &'a PageGeometry,
    settings: &'a RenderingSettings,
    metrics: &'a dyn GlyphMetrics,
    images: &'a dyn ImageSizer,

    pages: Vec<LaidOutPage>,
    page: LaidOutPage,
    cursor_y: f32,
    token_index: usize,
    token_count: usize,

    line: Vec<Span>,
    line_x: f32,
    line_start: Option<LineStart>,
    pending_space: bool,
    after_block: bool,

    bold: u32,
    italic: u32,
    underline: u32,
    heading: Option<u8>,
    lists: Vec<ListFrame>,
    open_tags: Vec<Tag>,

    paragraph: usize,
    word_index: usize,
    rtl: Vec<bool>,
}

impl<'a> Flow<'a> {
    fn new(
        config: &'a LayoutConfig,
        geometry: &'a PageGeometry,
        settings: &'a RenderingSettings,
        metrics: &'a dyn GlyphMetrics,
        images: &'a dyn ImageSizer,
        tokens: &[Token],
    ) -> Self {
        Self {
            config,
            geometry,
            settings,
            metrics,
            images,
            pages: Vec::new(),
            page: LaidOutPage::new(0, 0, Vec::new()),
            cursor_y: geometry.content_top(),
            token_index: 0,
            token_count: tokens.len(),
            line: Vec::new(),
            line_x: 0.0,
            line_start: None,
            pending_space: false,
            after_block: false,
            bold: 0,
            italic: 0,
            underline: 0,
            heading: None,
            lists: Vec::new(),
            open_tags: Vec::new(),
            paragraph: 0,
            word_index: 0,
            rtl: paragraph_directions(tokens),
        }
    }

    fn style(&self) -> TextStyle {
        let scale = self.heading.map_or(1.0, |h| self.config.heading_scale(h));
        TextStyle {
            font_size_px: self.settings.font_size_px * scale,
            bold: self.bold > 0,
            italic: self.italic > 0,
        }
    }

    fn indent(&self) -> f32 {
        self.lists.len() as f32 * self.config.list_indent_em * self.settings.font_size_px
    }

    fn line_left(&self) -> f32 {
        self.geometry.left_edge() + self.indent()
    }

    fn available_width(&self) -> f32 {
        (self.geometry.usable_width() - self.indent()).max(self.settings.font_size_px)
    }

    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        let chars = text.chars().count() as f32;
        self.metrics.measure(text, style) + self.settings.letter_spacing_px * chars
    }

    fn is_rtl(&self) -> bool {
        self.rtl.get(self.paragraph).copied().unwrap_or(false)
    }

    fn page_has_content(&self) -> bool {
        !self.page.lines.is_empty() || !self.page.images.is_empty()
    }

    fn next_paragraph(&mut self, count: usize) {
        if count > 0 {
            self.paragraph += count;
            self.word_index = 0;
        }
    }

    fn new_page(&mut self, start_token: usize, open_tags: Vec<Tag>) {
        let index = self.page.index + 1;
        let mut finished =
            std::mem::replace(&mut self.page, LaidOutPage::new(index, start_token, open_tags));
        finished.token_range.end = start_token;
        log::debug!(
            "Page {} closed with {} line(s), {} image(s)",
            finished.index,
            finished.lines.len(),
            finished.images.len()
        );
        self.pages.push(finished);
        self.cursor_y = self.geometry.content_top();
    }

    fn push_span(&mut self, span: Span) {
        if self.line.is_empty() && self.line_start.is_none() {
            self.line_start = Some(LineStart {
                token: self.token_index,
                open_tags: self.open_tags.clone(),
            });
        }
        self.after_block = false;
        self.line.push(span);
    }

    /// Pitch the pending line will occupy: the largest text on it, at least one rule.
    fn pending_pitch(&self) -> f32 {
        let base = self.settings.font_size_px;
        let scale = if self.line.is_empty() {
            self.style().font_size_px / base
        } else {
            self.line
                .iter()
                .map(|s| s.style.font_size_px / base)
                .fold(1.0_f32, f32::max)
        };
        self.geometry.line_pitch() * scale.max(1.0)
    }

    fn commit_line(&mut self, kind: BreakKind) {
        let pitch = self.pending_pitch();

        let fit = check_child_fit(self.cursor_y, pitch, self.geometry.content_rect());
        if fit.should_break && self.page_has_content() {
            let start = self.line_start.take().unwrap_or_else(|| LineStart {
                token: self.token_index,
                open_tags: self.open_tags.clone(),
            });
            self.new_page(start.token, start.open_tags);
        }

        let rtl = self.is_rtl();
        let mut spans = std::mem::take(&mut self.line);
        if rtl {
            let (left, right) = (self.line_left(), self.geometry.right_edge());
            for span in &mut spans {
                span.x = left + right - (span.x + span.width);
            }
        }

        self.page.lines.push(Line {
            baseline_y: self.cursor_y + pitch,
            pitch,
            spans,
            paragraph_index: self.paragraph,
            rtl,
            break_kind: kind,
            heading: self.heading,
        });
        self.cursor_y += pitch;
        self.line_x = 0.0;
        self.line_start = None;
        self.pending_space = false;
    }

    fn commit_if_pending(&mut self, kind: BreakKind) {
        if !self.line.is_empty() {
            self.commit_line(kind);
        }
    }

    fn whitespace(&mut self, ws: &str) {
        for c in ws.chars() {
            if c == '\n' {
                if self.after_block && self.line.is_empty() {
                    self.after_block = false;
                } else {
                    self.commit_line(BreakKind::Hard);
                }
                self.next_paragraph(1);
            } else {
                self.pending_space = true;
            }
        }
    }

    fn place_word(&mut self, word: &str) {
        let style = self.style();
        let width = self.text_width(word, &style);
        let available = self.available_width();

        let mut space = 0.0;
        if self.pending_space && !self.line.is_empty() {
            space = self.metrics.advance(' ', &style)
                + self.settings.word_spacing_px
                + self.settings.letter_spacing_px;
        }
        if !self.line.is_empty() && self.line_x + space + width > available + EPSILON {
            self.commit_line(BreakKind::Wrap);
            space = 0.0;
        }

        if width > available + EPSILON {
            self.place_hyphenated(word, &style);
        } else {
            let x = self.line_left() + self.line_x + space;
            self.push_span(self.text_span(word.to_string(), x, width, style, 0, false));
            self.line_x += space + width;
        }
        self.pending_space = false;
        self.word_index += 1;
    }

    /// Places a word wider than the whole line a few characters at a time, ending
    /// every piece but the last with a hyphen. Each line gets at least one character.
    fn place_hyphenated(&mut self, word: &str, style: &TextStyle) {
        let chars: Vec<char> = word.chars().collect();
        let hyphen = self.metrics.advance('-', style) + self.settings.letter_spacing_px;
        let mut offset = 0;

        while offset < chars.len() {
            let room = self.available_width() - self.line_x;
            let rest: String = chars[offset..].iter().collect();
            let rest_width = self.text_width(&rest, style);
            let x = self.line_left() + self.line_x;

            if rest_width <= room + EPSILON {
                self.push_span(self.text_span(rest, x, rest_width, *style, offset, false));
                self.line_x += rest_width;
                return;
            }

            let mut taken = 0;
            let mut taken_width = 0.0;
            for &c in &chars[offset..] {
                let w = self.metrics.advance(c, style) + self.settings.letter_spacing_px;
                if taken > 0 && taken_width + w + hyphen > room + EPSILON {
                    break;
                }
                taken += 1;
                taken_width += w;
            }

            let mut piece: String = chars[offset..offset + taken].iter().collect();
            piece.push('-');
            self.push_span(self.text_span(piece, x, taken_width + hyphen, *style, offset, true));
            self.commit_line(BreakKind::Hyphen);
            offset += taken;
        }
    }

    fn text_span(
        &self,
        text: String,
        x: f32,
        width: f32,
        style: TextStyle,
        char_offset: usize,
        hyphenated: bool,
    ) -> Span {
        Span {
            text,
            x,
            width,
            style,
            underline: self.underline > 0,
            word_index: self.word_index,
            char_offset,
            hyphenated,
            marker: false,
        }
    }

    fn tag(&mut self, tag: &Tag) {
        let kind = tag.kind();
        self.track_open_tags(tag, kind);

        match (kind, tag.closing) {
            (TagKind::Bold, false) => self.bold += 1,
            (TagKind::Bold, true) => self.bold = self.bold.saturating_sub(1),
            (TagKind::Italic, false) => self.italic += 1,
            (TagKind::Italic, true) => self.italic = self.italic.saturating_sub(1),
            (TagKind::Underline, false) => self.underline += 1,
            (TagKind::Underline, true) => self.underline = self.underline.saturating_sub(1),
            (TagKind::Heading(level), false) => {
                self.commit_if_pending(BreakKind::Hard);
                self.heading = Some(level);
            }
            (TagKind::Heading(_), true) => {
                self.commit_if_pending(BreakKind::Hard);
                self.heading = None;
            }
            (TagKind::Paragraph, false) | (TagKind::Div, _) => {
                self.commit_if_pending(BreakKind::Hard);
            }
            (TagKind::Paragraph, true) => {
                self.commit_if_pending(BreakKind::Hard);
                for _ in 0..self.config.paragraph_gap_lines {
                    // A gap that would open the next page is dropped.
                    let pitch = self.pending_pitch();
                    if check_child_fit(self.cursor_y, pitch, self.geometry.content_rect()).should_break {
                        break;
                    }
                    self.commit_line(BreakKind::Hard);
                }
            }
            (TagKind::Break, _) => {
                self.commit_line(BreakKind::Hard);
                // A newline right after <br> is formatting, not another break.
                self.after_block = true;
                return;
            }
            (TagKind::UnorderedList | TagKind::OrderedList, false) => {
                self.commit_if_pending(BreakKind::Hard);
                self.lists.push(ListFrame {
                    ordered: kind == TagKind::OrderedList,
                    next: 1,
                });
            }
            (TagKind::UnorderedList | TagKind::OrderedList, true) => {
                self.commit_if_pending(BreakKind::Hard);
                self.lists.pop();
            }
            (TagKind::ListItem, false) => {
                self.commit_if_pending(BreakKind::Hard);
                self.list_marker();
            }
            (TagKind::ListItem, true) => self.commit_if_pending(BreakKind::Hard),
            (TagKind::Image, _) => {
                if let Some(src) = tag.src.as_deref().filter(|_| !tag.closing) {
                    self.place_image(src);
                }
            }
            (TagKind::Other, _) => {
                log::debug!("Ignoring unsupported tag <{}>", tag.name);
                return;
            }
        }

        if crate::direction::is_block_boundary(kind) {
            self.after_block = true;
        }
    }

    fn track_open_tags(&mut self, tag: &Tag, kind: TagKind) {
        let reopenable = matches!(
            kind,
            TagKind::Bold
                | TagKind::Italic
                | TagKind::Underline
                | TagKind::Heading(_)
                | TagKind::UnorderedList
                | TagKind::OrderedList
        );
        if !reopenable {
            return;
        }
        if tag.closing {
            if let Some(pos) = self.open_tags.iter().rposition(|t| t.name == tag.name) {
                self.open_tags.remove(pos);
            }
        } else {
            self.open_tags.push(Tag::open(tag.name.clone()));
        }
    }

    fn list_marker(&mut self) {
        let label = match self.lists.last_mut() {
            Some(frame) if frame.ordered => {
                let label = format!("{}.", frame.next);
                frame.next += 1;
                label
            }
            _ => "\u{2022}".to_string(),
        };
        let style = self.style();
        let width = self.text_width(&label, &style);
        let gap = self.settings.font_size_px * 0.4;
        let x = (self.line_left() - width - gap).max(self.geometry.left_edge());
        let mut span = self.text_span(label, x, width, style, 0, false);
        span.marker = true;
        span.underline = false;
        self.push_span(span);
    }

    fn place_image(&mut self, src: &str) {
        let Some(intrinsic) = self.images.image_size(src) else {
            log::warn!("Image '{}' is unavailable; skipping its placement", src);
            return;
        };
        self.commit_if_pending(BreakKind::Hard);

        let pitch = self.geometry.line_pitch();
        let gutter = self.config.image_gutter_px;
        let max_lines = (self.geometry.usable_height() / pitch).floor().max(1.0);
        let bounds = Size::new(
            self.available_width(),
            (max_lines * pitch - gutter).max(pitch * 0.5),
        );
        let scaled = intrinsic.fit_within(bounds);
        if scaled.width <= 0.0 || scaled.height <= 0.0 {
            log::warn!("Image '{}' has no drawable size; skipping", src);
            return;
        }

        let lines = ((scaled.height + gutter) / pitch - EPSILON).ceil().max(1.0);
        let reserved = lines * pitch;
        let fit = check_child_fit(self.cursor_y, reserved, self.geometry.content_rect());
        if fit.should_break && self.page_has_content() {
            log::debug!(
                "Image '{}' needs {:.1}px, {:.1}px left; moving it to the next page",
                src,
                reserved,
                fit.remaining_height
            );
            self.new_page(self.token_index, self.open_tags.clone());
        }

        let x = if self.is_rtl() {
            self.geometry.right_edge() - scaled.width
        } else {
            self.line_left()
        };
        self.page.images.push(ImagePlacement {
            src: src.to_string(),
            x,
            y: self.cursor_y + gutter / 2.0,
            width: scaled.width,
            height: scaled.height,
            reserved_lines: lines as usize,
        });
        self.cursor_y += reserved;
    }

    fn finish(mut self) -> Vec<LaidOutPage> {
        self.commit_if_pending(BreakKind::End);
        self.page.token_range.end = self.token_count;
        let mut pages = self.pages;
        pages.push(self.page);
        pages
    }
}
