use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;

use crate::animation::{Animation, Step};
use crate::geometry::{Rect, Size, image_bounds, rect_from_size};
use crate::layout::Layout;
use crate::options::{ChevronLocation, TextBoxConfig, TextBoxOption};
use crate::render::PageRenderer;
use crate::text::{DrawOptions, SimpleWrapper, TextWrapper, WrapConfig};
use crate::theme::Theme;
use crate::{Error, Result};

/// An RPG style dialogue box: a themed frame with wrapped text, paged and
/// optionally animated.
///
/// Pages are laid out for the destination size given at construction. Drawing
/// into destinations of a different size reuses the pages already computed,
/// so keep the size stable while paginating.
///
/// A `TextBox` is not meant to be driven from several threads at once; build
/// one per thread instead.
pub struct TextBox {
    renderer: PageRenderer,
    animation: Option<Animation>,
}

impl TextBox {
    /// Wraps `text` with the theme's font and colour.
    ///
    /// The first page is computed eagerly: content that yields no page fails
    /// with [`Error::NoPages`], a theme without a frame with a configuration
    /// error.
    pub fn new(
        theme: Arc<dyn Theme>,
        text: &str,
        dest_size: Size,
        options: impl IntoIterator<Item = TextBoxOption>,
    ) -> Result<Self> {
        let config = TextBoxConfig::from_options(options);
        let mut wrap = WrapConfig {
            color: theme.text_color(),
            ..Default::default()
        };
        if config.chevron_location == ChevronLocation::TextEnd {
            wrap.page_break_image = Some(theme.chevron());
        }
        let wrapper = SimpleWrapper::new(text, theme.font_face(), wrap);
        Self::from_config(theme, Box::new(wrapper), dest_size, config)
    }

    /// Like [`TextBox::new`] with a caller supplied wrapper.
    pub fn with_wrapper(
        theme: Arc<dyn Theme>,
        wrapper: Box<dyn TextWrapper>,
        dest_size: Size,
        options: impl IntoIterator<Item = TextBoxOption>,
    ) -> Result<Self> {
        let config = TextBoxConfig::from_options(options);
        Self::from_config(theme, wrapper, dest_size, config)
    }

    fn from_config(
        theme: Arc<dyn Theme>,
        wrapper: Box<dyn TextWrapper>,
        dest_size: Size,
        mut config: TextBoxConfig,
    ) -> Result<Self> {
        let animation = config.animation.take();
        let mut renderer = PageRenderer::new(theme, config, wrapper);
        if !renderer.compute_next_page(rect_from_size(dest_size))? {
            return Err(Error::NoPages);
        }
        Ok(Self {
            renderer,
            animation,
        })
    }

    pub fn config(&self) -> &TextBoxConfig {
        self.renderer.config()
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Pages computed so far.
    pub fn page_count(&self) -> usize {
        self.renderer.pager().len()
    }

    pub fn has_next(&self) -> bool {
        self.renderer.has_next()
    }

    pub fn layout(&self, dest: Rect) -> Result<Layout> {
        self.renderer.layout(dest)
    }

    /// Paginates all remaining content for `dest_size`, returning the total
    /// page count. Safe to call repeatedly.
    pub fn calculate_all_pages(&mut self, dest_size: Size) -> Result<usize> {
        self.renderer.compute_all_pages(dest_size)
    }
}

/// Playback.
impl TextBox {
    /// Draws the next frame over all of `target`.
    ///
    /// Without an animation every call draws a whole page and reports
    /// `finished` as whether a page was drawn.
    pub fn draw_next_frame(&mut self, target: &mut RgbaImage) -> Result<Step> {
        let dest = image_bounds(target);
        self.draw_next_frame_in(target, dest)
    }

    /// Draws the next frame into `dest` of `target`.
    pub fn draw_next_frame_in(&mut self, target: &mut RgbaImage, dest: Rect) -> Result<Step> {
        match &mut self.animation {
            Some(animation) => animation.advance(&mut self.renderer, target, dest),
            None => {
                let drawn = self
                    .renderer
                    .draw_next_page(target, dest, &DrawOptions::default())?;
                Ok(Step {
                    finished: drawn,
                    user_input_accepted: true,
                    wait: Duration::ZERO,
                })
            }
        }
    }

    /// Draws the next page over all of `target`, bypassing any animation.
    ///
    /// Returns `false` once every page has been drawn.
    pub fn draw_next_page_frame(
        &mut self,
        target: &mut RgbaImage,
        options: &DrawOptions,
    ) -> Result<bool> {
        let dest = image_bounds(target);
        self.draw_next_page_frame_in(target, dest, options)
    }

    pub fn draw_next_page_frame_in(
        &mut self,
        target: &mut RgbaImage,
        dest: Rect,
        options: &DrawOptions,
    ) -> Result<bool> {
        self.renderer.draw_next_page(target, dest, options)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::face::{BlockFace, FontFace};
    use crate::geometry::{rect, size};
    use crate::options::{AvatarFit, AvatarLocation};
    use crate::text::BoxKind;
    use crate::theme::SimpleTheme;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn theme() -> Arc<dyn Theme> {
        Arc::new(SimpleTheme::default())
    }

    fn ten_lines() -> String {
        (1..=10).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn short_text_is_one_page() {
        let mut tb = TextBox::new(theme(), "Hello, world!", size(600, 150), []).unwrap();
        assert_eq!(tb.calculate_all_pages(size(600, 150)).unwrap(), 1);

        let mut target = RgbaImage::new(600, 150);
        assert!(tb.draw_next_page_frame(&mut target, &DrawOptions::default()).unwrap());
        assert!(!tb.has_next());
        assert!(!tb.draw_next_page_frame(&mut target, &DrawOptions::default()).unwrap());
    }

    #[test]
    fn three_pages_then_done() {
        let mut tb = TextBox::new(theme(), &ten_lines(), size(600, 150), []).unwrap();
        assert_eq!(tb.calculate_all_pages(size(600, 150)).unwrap(), 3);
        assert_eq!(tb.calculate_all_pages(size(600, 150)).unwrap(), 3);

        let mut target = RgbaImage::new(600, 150);
        let draws: Vec<bool> = (0..4)
            .map(|_| tb.draw_next_page_frame(&mut target, &DrawOptions::default()).unwrap())
            .collect();
        assert_eq!(draws, vec![true, true, true, false]);
    }

    #[test]
    fn pages_are_computed_lazily() {
        let mut tb = TextBox::new(theme(), &ten_lines(), size(600, 150), []).unwrap();
        assert_eq!(tb.page_count(), 1);
        let mut target = RgbaImage::new(600, 150);
        tb.draw_next_page_frame(&mut target, &DrawOptions::default()).unwrap();
        tb.draw_next_page_frame(&mut target, &DrawOptions::default()).unwrap();
        assert_eq!(tb.page_count(), 2);
        assert!(tb.has_next());
    }

    #[test]
    fn next_frame_without_animation_draws_pages() {
        let mut tb = TextBox::new(theme(), "Hi", size(600, 150), []).unwrap();
        let mut target = RgbaImage::new(600, 150);
        let step = tb.draw_next_frame(&mut target).unwrap();
        assert_eq!(
            step,
            Step {
                finished: true,
                user_input_accepted: true,
                wait: Duration::ZERO,
            }
        );
        let step = tb.draw_next_frame(&mut target).unwrap();
        assert!(!step.finished && step.user_input_accepted);
    }

    #[test]
    fn large_avatar_is_scaled_down() {
        let big = Arc::new(RgbaImage::from_pixel(400, 400, Rgba([0, 200, 0, 255])));
        let tb = TextBox::new(
            theme(),
            "Hi",
            size(600, 150),
            [
                AvatarLocation::Left.into(),
                AvatarFit::NearestNeighbour.into(),
                TextBoxOption::Avatar(big),
            ],
        )
        .unwrap();
        let layout = tb.layout(rect(0, 0, 600, 150)).unwrap();
        assert!(layout.avatar_rect.height() <= layout.center_rect.height());
        assert!(layout.avatar_rect.width() <= layout.center_rect.height());
        assert!(layout.avatar_rect.width() < 400);
    }

    #[test]
    fn configuration_errors() {
        assert!(matches!(
            "sideways-chevron".parse::<ChevronLocation>(),
            Err(Error::Configuration(_))
        ));

        struct Frameless;
        impl Theme for Frameless {
            fn chevron(&self) -> Arc<RgbaImage> {
                Arc::new(RgbaImage::new(1, 1))
            }
            fn avatar(&self) -> Arc<RgbaImage> {
                Arc::new(RgbaImage::new(1, 1))
            }
            fn font_face(&self) -> Arc<dyn FontFace> {
                Arc::new(BlockFace::default())
            }
        }
        let err = TextBox::new(Arc::new(Frameless), "Hi", size(600, 150), []).err();
        assert!(err.is_some_and(|e| e.is_configuration()));
    }

    #[test]
    fn empty_content_has_no_pages() {
        for text in ["", "   \n  "] {
            let err = TextBox::new(theme(), text, size(600, 150), []).err();
            assert!(matches!(err, Some(Error::NoPages)));
        }
    }

    #[test]
    fn end_of_text_chevron_marks_page_ends() {
        let tb_text = ten_lines();
        let mut tb = TextBox::new(
            theme(),
            &tb_text,
            size(600, 150),
            [ChevronLocation::TextEnd.into()],
        )
        .unwrap();
        assert_eq!(tb.calculate_all_pages(size(600, 150)).unwrap(), 3);

        let ends_with_marker = |i: usize| {
            let page = tb.renderer.pager().page(i).unwrap();
            let last = page.lines.last().unwrap().boxes.last().unwrap();
            matches!(last.kind, BoxKind::PageBreak(_))
        };
        assert!(ends_with_marker(0));
        assert!(ends_with_marker(1));
        assert!(!ends_with_marker(2));
    }

    #[test]
    fn pages_tile_into_one_canvas() {
        let mut tb = TextBox::new(theme(), &ten_lines(), size(600, 150), []).unwrap();
        let pages = tb.calculate_all_pages(size(600, 150)).unwrap();
        let mut canvas = RgbaImage::new(600, 150 * pages as u32);
        for i in 0..pages as i32 {
            let dest = rect(0, i * 150, 600, (i + 1) * 150);
            assert!(
                tb.draw_next_page_frame_in(&mut canvas, dest, &DrawOptions::default())
                    .unwrap()
            );
        }
        // first glyph of every page
        for i in 0..pages as u32 {
            assert_eq!(*canvas.get_pixel(35, i * 150 + 36), WHITE);
        }
    }

    #[test]
    fn mounted_animation_drives_frames() {
        let mut tb = TextBox::new(
            theme(),
            &ten_lines(),
            size(600, 150),
            [Animation::box_by_box().into()],
        )
        .unwrap();
        assert!(tb.animation().is_some());

        let mut target = RgbaImage::new(600, 150);
        let mut accepted = 0;
        for _ in 0..1000 {
            let step = tb.draw_next_frame(&mut target).unwrap();
            if step.is_end() {
                break;
            }
            if step.user_input_accepted {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 3);
        assert!(!tb.has_next());
    }

    #[test]
    fn text_box_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<TextBox>();
    }
}
