use std::num::NonZeroUsize;
use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::compose::{SourceMapper, draw_over, map_source};
use crate::face::FontFace;
use crate::geometry::{Point, Rect};
use crate::text::glyph_cache::{GlyphCache, RasterGlyph};

/// Identifies a drawable unit within the page being rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitIndex {
    /// Position of the box among all boxes of the page.
    pub box_index: usize,
    /// Position of the letter among all letters of the page.
    pub letter_index: usize,
}

/// A box that was rendered, in target coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawnBox {
    pub box_index: usize,
    pub rect: Rect,
    pub text: Option<String>,
}

pub type UnitFilter = Arc<dyn Fn(UnitIndex) -> bool + Send + Sync>;
pub type BoxObserver = Arc<dyn Fn(&DrawnBox) + Send + Sync>;

/// Per-draw knobs threaded through every drawing step.
#[derive(Clone, Default)]
pub struct DrawOptions {
    /// Applied to every source image: frame, avatar, chevron and glyphs.
    pub source_mapper: Option<SourceMapper>,
    /// Units for which this returns `false` are not drawn.
    pub unit_filter: Option<UnitFilter>,
    /// Receives each box that was drawn.
    pub box_observer: Option<BoxObserver>,
}

impl DrawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_mapper(mut self, mapper: SourceMapper) -> Self {
        self.source_mapper = Some(mapper);
        self
    }

    pub fn with_unit_filter(mut self, filter: UnitFilter) -> Self {
        self.unit_filter = Some(filter);
        self
    }

    /// Adds an observer, keeping any observer already registered.
    pub fn with_box_observer(mut self, observer: BoxObserver) -> Self {
        self.box_observer = Some(match self.box_observer.take() {
            Some(previous) => Arc::new(move |b: &DrawnBox| {
                previous(b);
                observer(b);
            }),
            None => observer,
        });
        self
    }

    pub fn includes(&self, unit: UnitIndex) -> bool {
        self.unit_filter.as_ref().is_none_or(|f| f(unit))
    }

    pub fn map_source<'a>(&self, img: &'a RgbaImage) -> std::borrow::Cow<'a, RgbaImage> {
        map_source(img, self.source_mapper.as_ref())
    }

    pub(crate) fn observe(&self, drawn: &DrawnBox) {
        if let Some(observer) = &self.box_observer {
            observer(drawn);
        }
    }
}

/// Paints characters of one face, caching their rasterization.
pub struct GlyphPainter {
    face: Arc<dyn FontFace>,
    cache: GlyphCache,
}

impl GlyphPainter {
    pub fn new(face: Arc<dyn FontFace>) -> Self {
        let capacity = NonZeroUsize::new(GlyphCache::DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            face,
            cache: GlyphCache::new(capacity),
        }
    }

    pub fn face(&self) -> &Arc<dyn FontFace> {
        &self.face
    }

    /// Draws `ch` with its pen at `pen_x` on the baseline `baseline_y`.
    pub fn paint_char(
        &mut self,
        target: &mut RgbaImage,
        clip: Rect,
        ch: char,
        pen_x: f32,
        baseline_y: f32,
        color: Rgba<u8>,
        options: &DrawOptions,
    ) {
        let face = &self.face;
        let glyph = self.cache.get_or_insert_with(ch, || {
            let (metrics, coverage) = face.rasterize(ch);
            RasterGlyph { metrics, coverage }
        });
        let m = glyph.metrics;
        if m.width == 0 || m.height == 0 {
            return;
        }

        let mut bitmap = RgbaImage::new(m.width as u32, m.height as u32);
        for (i, px) in bitmap.pixels_mut().enumerate() {
            let coverage = glyph.coverage.get(i).copied().unwrap_or(0);
            let alpha = (u16::from(coverage) * u16::from(color[3]) / 255) as u8;
            *px = Rgba([color[0], color[1], color[2], alpha]);
        }
        let bitmap = options.map_source(&bitmap);

        let x = (pen_x + m.xmin as f32).floor() as i32;
        let y = (baseline_y - (m.ymin as f32 + m.height as f32)).floor() as i32;
        draw_over(target, clip, &bitmap, Point::new(0, 0), Point::new(x, y));
    }

    /// Draws a whole string, returning the pen advance.
    pub fn paint_str(
        &mut self,
        target: &mut RgbaImage,
        clip: Rect,
        text: &str,
        pen_x: f32,
        baseline_y: f32,
        color: Rgba<u8>,
        options: &DrawOptions,
    ) -> f32 {
        let mut x = pen_x;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                x += self.face.kern(p, ch);
            }
            self.paint_char(target, clip, ch, x, baseline_y, color, options);
            x += self.face.glyph_metrics(ch).advance;
            prev = Some(ch);
        }
        x - pen_x
    }
}
