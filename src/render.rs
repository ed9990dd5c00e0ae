//! Drawing one page of a text box: frame, avatar, chevron, name, text and
//! decorators, in that order.

use std::collections::HashMap;
use std::sync::Arc;

use image::{Rgba, RgbaImage, imageops::FilterType};
use parking_lot::Mutex;

use crate::compose::{draw_over, draw_scaled, draw_stretched_frame, outline};
use crate::geometry::{Point, Rect, Size, rect_from_size};
use crate::layout::Layout;
use crate::options::{AvatarFit, AvatarLocation, TextBoxConfig};
use crate::pager::{Page, Pager};
use crate::text::{DrawOptions, DrawnBox, GlyphPainter, Line, TextWrapper};
use crate::theme::Theme;
use crate::{Error, Result};

/// Z-index text boxes are registered with in a [`HitTestSink`].
pub const TEXT_Z_INDEX: i32 = 0;

/// Custom overlay drawn after the standard elements.
pub trait PostDraw: Send + Sync {
    /// An error aborts the draw call and is returned to its caller.
    fn post_draw(
        &self,
        target: &mut RgbaImage,
        layout: &Layout,
        lines: &[Line],
        options: &DrawOptions,
    ) -> Result<()>;
}

/// Outlines the text rectangle. Handy when tuning themes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlineTextRect {
    pub color: Rgba<u8>,
}

impl Default for OutlineTextRect {
    fn default() -> Self {
        Self {
            color: Rgba([0, 0, 0, 255]),
        }
    }
}

impl PostDraw for OutlineTextRect {
    fn post_draw(
        &self,
        target: &mut RgbaImage,
        layout: &Layout,
        _lines: &[Line],
        _options: &DrawOptions,
    ) -> Result<()> {
        outline(target, layout.text_rect, self.color);
        Ok(())
    }
}

/// Stable identity of a drawn text box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId {
    pub page: usize,
    pub index: usize,
}

/// Something drawn that can be hit by a pointer.
pub trait Shape: Send + Sync {
    fn bounds(&self) -> Rect;

    fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    fn id(&self) -> BoxId;
}

/// A word, space or inline image as drawn on the target.
#[derive(Clone, Debug, PartialEq)]
pub struct TextShape {
    pub id: BoxId,
    pub rect: Rect,
    pub text: Option<String>,
}

impl Shape for TextShape {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn id(&self) -> BoxId {
        self.id
    }
}

/// Receives every text box drawn while registered.
pub trait HitTestSink: Send + Sync {
    fn add(&self, shape: Arc<dyn Shape>, z_index: i32);
}

struct Registered {
    shape: Arc<dyn Shape>,
    z_index: i32,
    seq: u64,
}

#[derive(Default)]
struct Shapes {
    page: Option<usize>,
    seq: u64,
    by_id: HashMap<BoxId, Registered, fxhash::FxBuildHasher>,
}

/// In-memory [`HitTestSink`] answering point queries.
///
/// Holds the shapes of the page drawn last. Re-adding a [`BoxId`] replaces
/// the earlier shape, so redrawing a page frame after frame keeps one entry
/// per box. The first shape of another page drops everything registered
/// before it.
#[derive(Default)]
pub struct HitTestRegistry {
    shapes: Mutex<Shapes>,
}

impl HitTestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shapes.lock().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.lock().by_id.is_empty()
    }

    /// Page the registered shapes belong to.
    pub fn page(&self) -> Option<usize> {
        self.shapes.lock().page
    }

    pub fn clear(&self) {
        let mut shapes = self.shapes.lock();
        shapes.by_id.clear();
        shapes.page = None;
    }

    /// Topmost shape containing `p`; among equal z-indices the latest added.
    pub fn hit(&self, p: Point) -> Option<Arc<dyn Shape>> {
        let shapes = self.shapes.lock();
        shapes
            .by_id
            .values()
            .filter(|r| r.shape.contains(p))
            .max_by_key(|r| (r.z_index, r.seq))
            .map(|r| Arc::clone(&r.shape))
    }
}

impl HitTestSink for HitTestRegistry {
    fn add(&self, shape: Arc<dyn Shape>, z_index: i32) {
        let mut shapes = self.shapes.lock();
        let id = shape.id();
        if shapes.page != Some(id.page) {
            if !shapes.by_id.is_empty() {
                log::trace!("hit test registry moves to page {}", id.page);
            }
            shapes.by_id.clear();
            shapes.page = Some(id.page);
        }
        shapes.seq += 1;
        let seq = shapes.seq;
        shapes.by_id.insert(
            id,
            Registered {
                shape,
                z_index,
                seq,
            },
        );
    }
}

/// A page taken from the cache together with the layout it is drawn with.
#[derive(Clone, Debug)]
pub struct PageSlot {
    pub index: usize,
    pub layout: Layout,
    pub page: Arc<Page>,
}

/// Owns the content, the page cache and the configuration, and draws pages.
pub struct PageRenderer {
    theme: Arc<dyn Theme>,
    config: TextBoxConfig,
    wrapper: Box<dyn TextWrapper>,
    pager: Pager,
    name_painter: GlyphPainter,
}

impl PageRenderer {
    pub fn new(theme: Arc<dyn Theme>, config: TextBoxConfig, wrapper: Box<dyn TextWrapper>) -> Self {
        let name_painter = GlyphPainter::new(theme.font_face());
        Self {
            theme,
            config,
            wrapper,
            pager: Pager::new(),
            name_painter,
        }
    }

    pub fn config(&self) -> &TextBoxConfig {
        &self.config
    }

    pub fn theme(&self) -> &Arc<dyn Theme> {
        &self.theme
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn layout(&self, dest: Rect) -> Result<Layout> {
        Layout::compute(&self.config, self.theme.as_ref(), dest)
    }

    /// `true` while a cached page is undrawn or the wrapper has content left.
    pub fn has_next(&self) -> bool {
        self.pager.has_cached() || self.wrapper.has_next()
    }
}

/// Pagination.
impl PageRenderer {
    /// Appends one page laid out for `dest`; `false` at end of content.
    pub fn compute_next_page(&mut self, dest: Rect) -> Result<bool> {
        let layout = self.layout(dest)?;
        self.pager.compute_next_page(self.wrapper.as_mut(), &layout)
    }

    /// Paginates the remaining content for a destination of `size`.
    ///
    /// Returns the total number of cached pages. Already cached pages are
    /// kept as they are, so the destination size should not change between
    /// calls.
    pub fn compute_all_pages(&mut self, size: Size) -> Result<usize> {
        let layout = self.layout(rect_from_size(size))?;
        while self.pager.compute_next_page(self.wrapper.as_mut(), &layout)? {}
        Ok(self.pager.len())
    }

    /// Takes the next undrawn page, computing it if needed.
    pub fn next_page(&mut self, dest: Rect) -> Result<Option<PageSlot>> {
        let layout = self.layout(dest)?;
        let next = self.pager.take_next(self.wrapper.as_mut(), &layout)?;
        Ok(next.map(|(index, page)| PageSlot {
            index,
            layout,
            page,
        }))
    }

    /// Draws the next page into `dest`; `false` once no page is left.
    pub fn draw_next_page(
        &mut self,
        target: &mut RgbaImage,
        dest: Rect,
        options: &DrawOptions,
    ) -> Result<bool> {
        match self.next_page(dest)? {
            Some(slot) => self.draw_page(target, &slot, options),
            None => Ok(false),
        }
    }
}

/// Drawing.
impl PageRenderer {
    pub fn draw_page(
        &mut self,
        target: &mut RgbaImage,
        slot: &PageSlot,
        options: &DrawOptions,
    ) -> Result<bool> {
        let layout = &slot.layout;

        self.draw_frame(target, layout, options)?;
        self.draw_avatar(target, layout, options);
        if self.config.chevron_location.is_standalone() && self.has_next() {
            let chevron = self.theme.chevron();
            let chevron = options.map_source(&chevron);
            if let Some(clip) = layout.chevron_rect.intersection(&layout.dest) {
                draw_over(target, clip, &chevron, Point::new(0, 0), layout.chevron_rect.min);
            }
        }
        self.draw_name(target, layout, options);

        let mut options = options.clone();
        if let Some(sink) = &self.config.hit_test {
            let sink = Arc::clone(sink);
            let page = slot.index;
            options = options.with_box_observer(Arc::new(move |drawn: &DrawnBox| {
                let shape = TextShape {
                    id: BoxId {
                        page,
                        index: drawn.box_index,
                    },
                    rect: drawn.rect,
                    text: drawn.text.clone(),
                };
                sink.add(Arc::new(shape), TEXT_Z_INDEX);
            }));
        }

        self.wrapper
            .render_lines(target, &slot.page.lines, layout.text_rect, &options)?;

        for decorator in &self.config.post_draw {
            decorator.post_draw(target, layout, &slot.page.lines, &options)?;
        }
        Ok(true)
    }

    fn draw_frame(&self, target: &mut RgbaImage, layout: &Layout, options: &DrawOptions) -> Result<()> {
        let frame = self
            .theme
            .as_frame()
            .ok_or_else(|| Error::configuration("invalid theme, missing a frame drawer"))?;
        let image = frame.frame_image();
        let image = options.map_source(&image);
        draw_stretched_frame(target, layout.frame_rect, &image, frame.frame_center());
        Ok(())
    }

    fn draw_avatar(&self, target: &mut RgbaImage, layout: &Layout, options: &DrawOptions) {
        if self.config.avatar_location == AvatarLocation::None {
            return;
        }
        let avatar = self
            .config
            .avatar
            .clone()
            .unwrap_or_else(|| self.theme.avatar());
        let avatar = options.map_source(&avatar);
        let area = layout.avatar_rect;

        match self.config.avatar_fit {
            AvatarFit::None => draw_over(target, area, &avatar, Point::new(0, 0), area.min),
            AvatarFit::Center => {
                let dx = (avatar.width() as i32 - area.width()) / 2;
                let dy = (avatar.height() as i32 - area.height()) / 2;
                draw_over(target, area, &avatar, Point::new(dx, dy), area.min);
            }
            AvatarFit::NearestNeighbour => draw_scaled(target, area, &avatar, FilterType::Nearest),
            AvatarFit::Bilinear => draw_scaled(target, area, &avatar, FilterType::Triangle),
        }
    }

    fn draw_name(&mut self, target: &mut RgbaImage, layout: &Layout, options: &DrawOptions) {
        let Some(name) = self.config.visible_name() else {
            return;
        };
        let area = layout.name_rect;
        let baseline = area.min.y as f32 + self.name_painter.face().line_metrics().ascent;
        self.name_painter.paint_str(
            target,
            area,
            name,
            area.min.x as f32,
            baseline,
            self.theme.text_color(),
            options,
        );
    }
}
