use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::Result;
use crate::compose::draw_over;
use crate::face::{FontFace, LineMetrics};
use crate::geometry::{Point, Rect};
use crate::text::line::{BoxKind, Cursor, Line};
use crate::text::paint::{DrawOptions, DrawnBox, GlyphPainter, UnitIndex};

/// Breaks content into pages of lines and draws them.
///
/// Implementations own the content and a read position; every call to
/// [`TextWrapper::text_to_rect`] consumes the lines it returns.
pub trait TextWrapper: Send {
    /// Next page worth of lines fitting `rect`, empty once content is exhausted.
    fn text_to_rect(&mut self, rect: Rect) -> Result<Vec<Line>>;

    /// `true` while unconsumed content remains.
    fn has_next(&self) -> bool;

    /// Draws `lines` top-down inside `rect`.
    fn render_lines(
        &mut self,
        target: &mut RgbaImage,
        lines: &[Line],
        rect: Rect,
        options: &DrawOptions,
    ) -> Result<()>;
}

/// Knobs for [`SimpleWrapper`].
#[derive(Clone, Debug, PartialEq)]
pub struct WrapConfig {
    /// Multiplier applied to the face's baseline-to-baseline distance.
    pub line_height_scale: f32,
    /// Split words wider than the rectangle instead of letting them overflow.
    pub hard_break: bool,
    pub color: Rgba<u8>,
    /// Appended to the last line of every page that is followed by more content.
    pub page_break_image: Option<Arc<RgbaImage>>,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            line_height_scale: 1.0,
            hard_break: true,
            color: Rgba([0, 0, 0, 255]),
            page_break_image: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Word(String),
    Space(String),
    Newline,
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current: Option<Token> = None;

    for ch in text.chars() {
        match ch {
            '\r' => {}
            '\n' => {
                tokens.extend(current.take());
                tokens.push(Token::Newline);
            }
            c if c.is_whitespace() => match &mut current {
                Some(Token::Space(s)) => s.push(c),
                _ => {
                    tokens.extend(current.take());
                    current = Some(Token::Space(c.to_string()));
                }
            },
            c => match &mut current {
                Some(Token::Word(s)) => s.push(c),
                _ => {
                    tokens.extend(current.take());
                    current = Some(Token::Word(c.to_string()));
                }
            },
        }
    }
    tokens.extend(current);
    tokens
}

fn skip_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[i..],
        None => "",
    }
}

/// Greedy word wrapper over a single [`FontFace`].
pub struct SimpleWrapper {
    tokens: Vec<Token>,
    /// Index of the last word token; content ends there.
    last_word: Option<usize>,
    cursor: Cursor,
    painter: GlyphPainter,
    config: WrapConfig,
}

impl SimpleWrapper {
    pub fn new(text: &str, face: Arc<dyn FontFace>, config: WrapConfig) -> Self {
        let tokens = tokenize(text);
        let last_word = tokens.iter().rposition(|t| matches!(t, Token::Word(_)));
        Self {
            tokens,
            last_word,
            cursor: Cursor::default(),
            painter: GlyphPainter::new(face),
            config,
        }
    }

    pub fn config(&self) -> &WrapConfig {
        &self.config
    }

    fn face(&self) -> &Arc<dyn FontFace> {
        self.painter.face()
    }

    fn metrics(&self) -> LineMetrics {
        let mut metrics = self.face().line_metrics();
        let scaled = metrics.line_height() * self.config.line_height_scale;
        metrics.line_gap = scaled - metrics.text_height();
        metrics
    }
}

/// Line filling.
impl SimpleWrapper {
    /// After a width-induced break: drop spaces and at most one newline.
    fn skip_after_wrap(&mut self) {
        while let Some(Token::Space(_)) = self.tokens.get(self.cursor.token) {
            self.cursor = self.cursor.next_token();
        }
        if let Some(Token::Newline) = self.tokens.get(self.cursor.token) {
            self.cursor = self.cursor.next_token();
        }
    }

    fn fill_line(&mut self, width: f32) -> Line {
        let face = Arc::clone(self.face());
        let mut line = Line::empty(self.metrics());

        while let Some(token) = self.tokens.get(self.cursor.token) {
            match token {
                Token::Newline => {
                    self.cursor = self.cursor.next_token();
                    break;
                }
                Token::Space(s) => {
                    if line.boxes.is_empty() {
                        self.cursor = self.cursor.next_token();
                        continue;
                    }
                    let w = face.measure(s);
                    if line.width + w > width {
                        self.cursor = self.cursor.next_token();
                        self.skip_after_wrap();
                        break;
                    }
                    line.push(BoxKind::Space(s.clone()), w, self.cursor);
                    self.cursor = self.cursor.next_token();
                }
                Token::Word(s) => {
                    let rest = skip_chars(s, self.cursor.offset);
                    let w = face.measure(rest);
                    if line.width + w <= width {
                        line.push(BoxKind::Word(rest.to_string()), w, self.cursor);
                        self.cursor = self.cursor.next_token();
                        continue;
                    }
                    if !line.boxes.is_empty() {
                        break;
                    }
                    if !self.config.hard_break {
                        line.push(BoxKind::Word(rest.to_string()), w, self.cursor);
                        self.cursor = self.cursor.next_token();
                        self.skip_after_wrap();
                        break;
                    }

                    let mut taken = String::new();
                    let mut taken_width = 0.0;
                    for ch in rest.chars() {
                        let mut candidate = taken.clone();
                        candidate.push(ch);
                        let cw = face.measure(&candidate);
                        if cw > width && !taken.is_empty() {
                            break;
                        }
                        taken = candidate;
                        taken_width = cw;
                    }
                    let n = taken.chars().count();
                    let source = self.cursor;
                    line.push(BoxKind::Word(taken), taken_width, source);
                    if n >= rest.chars().count() {
                        self.cursor = self.cursor.next_token();
                        self.skip_after_wrap();
                    } else {
                        self.cursor.offset += n;
                    }
                    break;
                }
            }
        }

        while line.ends_with_space() {
            line.pop();
        }
        line
    }

    /// Moves trailing boxes of `line` back into the stream until `image` fits.
    fn append_page_break(&mut self, line: &mut Line, image: Arc<RgbaImage>, width: f32) {
        let image_width = image.width() as f32;
        loop {
            while line.ends_with_space() {
                line.pop();
            }
            if line.width + image_width <= width || line.boxes.len() <= 1 {
                break;
            }
            if let Some(popped) = line.pop() {
                self.cursor = popped.source;
            }
        }

        let image_height = image.height() as f32;
        let mid = (line.metrics.ascent + line.metrics.descent) / 2.0;
        let ascent = line.metrics.ascent.max(mid + image_height / 2.0);
        let descent = line.metrics.descent.min(mid - image_height / 2.0);
        let gap = line.metrics.line_gap;
        line.metrics = LineMetrics {
            ascent,
            descent,
            line_gap: gap,
        };
        line.push(BoxKind::PageBreak(image), image_width, self.cursor);
    }
}

impl TextWrapper for SimpleWrapper {
    fn text_to_rect(&mut self, rect: Rect) -> Result<Vec<Line>> {
        let width = rect.width() as f32;
        let height = rect.height() as f32;

        let mut lines: Vec<Line> = Vec::new();
        let mut used = 0.0;
        while self.has_next() {
            let saved = self.cursor;
            let line = self.fill_line(width);
            if lines.is_empty() && line.boxes.is_empty() {
                // blank line at the top of a page
                continue;
            }
            let needed = line.metrics.text_height();
            if lines.is_empty() {
                if needed > height {
                    log::warn!(
                        "line of height {} does not fit a text area of height {}",
                        needed,
                        height
                    );
                }
            } else if used + needed > height {
                self.cursor = saved;
                break;
            }
            used += line.height();
            lines.push(line);
        }

        if let Some(image) = self.config.page_break_image.clone()
            && self.has_next()
            && let Some(mut last) = lines.pop()
        {
            self.append_page_break(&mut last, image, width);
            lines.push(last);
        }

        Ok(lines)
    }

    fn has_next(&self) -> bool {
        self.last_word.is_some_and(|last| self.cursor.token <= last)
    }

    fn render_lines(
        &mut self,
        target: &mut RgbaImage,
        lines: &[Line],
        rect: Rect,
        options: &DrawOptions,
    ) -> Result<()> {
        let face = Arc::clone(self.face());
        let color = self.config.color;

        let mut top = rect.min.y as f32;
        let mut box_index = 0;
        let mut letter_index = 0;
        for line in lines {
            let ascent = line.metrics.ascent;
            let descent = line.metrics.descent;
            let baseline = top + ascent;

            for b in &line.boxes {
                let first = UnitIndex {
                    box_index,
                    letter_index,
                };
                let x = rect.min.x as f32 + b.x;

                match &b.kind {
                    BoxKind::Word(s) | BoxKind::Space(s) => {
                        let mut pen = x;
                        let mut prev: Option<char> = None;
                        for (i, ch) in s.chars().enumerate() {
                            if let Some(p) = prev {
                                pen += face.kern(p, ch);
                            }
                            let unit = UnitIndex {
                                box_index,
                                letter_index: letter_index + i,
                            };
                            if options.includes(unit) {
                                self.painter
                                    .paint_char(target, rect, ch, pen, baseline, color, options);
                            }
                            pen += face.glyph_metrics(ch).advance;
                            prev = Some(ch);
                        }
                    }
                    BoxKind::PageBreak(image) => {
                        if options.includes(first) {
                            let image = options.map_source(image);
                            let mid = baseline - (ascent + descent) / 2.0;
                            let y = mid - image.height() as f32 / 2.0;
                            draw_over(
                                target,
                                rect,
                                &image,
                                Point::new(0, 0),
                                Point::new(x.floor() as i32, y.floor() as i32),
                            );
                        }
                    }
                }

                if options.includes(first) {
                    options.observe(&DrawnBox {
                        box_index,
                        rect: crate::geometry::rect(
                            x.floor() as i32,
                            (baseline - ascent).floor() as i32,
                            (x + b.width).ceil() as i32,
                            (baseline - descent).ceil() as i32,
                        ),
                        text: b.text().map(str::to_string),
                    });
                }

                box_index += 1;
                letter_index += b.letter_count();
            }
            top += line.height();
        }
        Ok(())
    }
}
