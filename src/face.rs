//! Font faces consumed by the wrapper and the name tag painter.

use std::sync::Arc;

/// Vertical metrics of a face, in pixels.
///
/// `descent` follows the fontdue convention and is negative below the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
}

impl LineMetrics {
    /// Height of the glyph band (`ascent - descent`), without the line gap.
    pub fn text_height(&self) -> f32 {
        self.ascent - self.descent
    }

    /// Distance between two consecutive baselines.
    pub fn line_height(&self) -> f32 {
        self.text_height() + self.line_gap
    }
}

/// Placement of a single glyph bitmap relative to its pen position.
///
/// `xmin` is the horizontal offset from the pen, `ymin` the offset of the
/// bitmap's bottom edge from the baseline (positive is up).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphMetrics {
    pub advance: f32,
    pub xmin: i32,
    pub ymin: i32,
    pub width: usize,
    pub height: usize,
}

impl From<fontdue::Metrics> for GlyphMetrics {
    fn from(m: fontdue::Metrics) -> Self {
        Self {
            advance: m.advance_width,
            xmin: m.xmin,
            ymin: m.ymin,
            width: m.width,
            height: m.height,
        }
    }
}

/// A sized font able to measure and rasterize characters.
pub trait FontFace: Send + Sync {
    fn line_metrics(&self) -> LineMetrics;

    fn glyph_metrics(&self, ch: char) -> GlyphMetrics;

    /// Coverage bitmap, row-major, one byte per pixel.
    fn rasterize(&self, ch: char) -> (GlyphMetrics, Vec<u8>);

    fn kern(&self, _left: char, _right: char) -> f32 {
        0.0
    }

    /// Advance width of `text` including pairwise kerning.
    fn measure(&self, text: &str) -> f32 {
        let mut width = 0.0;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                width += self.kern(p, ch);
            }
            width += self.glyph_metrics(ch).advance;
            prev = Some(ch);
        }
        width
    }
}

/// A `fontdue` font rendered at a fixed pixel size.
#[derive(Clone)]
pub struct FontdueFace {
    font: Arc<fontdue::Font>,
    size: f32,
}

impl FontdueFace {
    pub fn new(font: Arc<fontdue::Font>, size: f32) -> Self {
        Self { font, size }
    }

    /// Parses font bytes (TTF/OTF) and sizes the face.
    pub fn from_bytes(data: &[u8], size: f32) -> crate::Result<Self> {
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| crate::Error::configuration(format!("invalid font data: {e}")))?;
        Ok(Self::new(Arc::new(font), size))
    }

    pub fn size(&self) -> f32 {
        self.size
    }
}

impl FontFace for FontdueFace {
    fn line_metrics(&self) -> LineMetrics {
        match self.font.horizontal_line_metrics(self.size) {
            Some(m) => LineMetrics {
                ascent: m.ascent,
                descent: m.descent,
                line_gap: m.line_gap,
            },
            // fonts without a hhea table
            None => LineMetrics {
                ascent: self.size * 0.8,
                descent: -self.size * 0.2,
                line_gap: 0.0,
            },
        }
    }

    fn glyph_metrics(&self, ch: char) -> GlyphMetrics {
        self.font.metrics(ch, self.size).into()
    }

    fn rasterize(&self, ch: char) -> (GlyphMetrics, Vec<u8>) {
        let (metrics, coverage) = self.font.rasterize(ch, self.size);
        (metrics.into(), coverage)
    }

    fn kern(&self, left: char, right: char) -> f32 {
        self.font
            .horizontal_kern(left, right, self.size)
            .unwrap_or(0.0)
    }
}

/// Fixed-cell face that draws every visible character as a solid block.
///
/// Needs no font files, which makes layouts reproducible across machines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockFace {
    pub advance: f32,
    pub glyph_width: usize,
    pub glyph_height: usize,
    pub metrics: LineMetrics,
}

impl Default for BlockFace {
    fn default() -> Self {
        Self {
            advance: 8.0,
            glyph_width: 6,
            glyph_height: 10,
            metrics: LineMetrics {
                ascent: 12.0,
                descent: -4.0,
                line_gap: 2.0,
            },
        }
    }
}

impl FontFace for BlockFace {
    fn line_metrics(&self) -> LineMetrics {
        self.metrics
    }

    fn glyph_metrics(&self, ch: char) -> GlyphMetrics {
        if ch.is_whitespace() || ch.is_control() {
            return GlyphMetrics {
                advance: if ch == '\n' { 0.0 } else { self.advance },
                ..Default::default()
            };
        }
        GlyphMetrics {
            advance: self.advance,
            xmin: 1,
            ymin: 0,
            width: self.glyph_width,
            height: self.glyph_height,
        }
    }

    fn rasterize(&self, ch: char) -> (GlyphMetrics, Vec<u8>) {
        let metrics = self.glyph_metrics(ch);
        (metrics, vec![255; metrics.width * metrics.height])
    }
}
