//! Sub-rectangles of one drawn frame.

use crate::compose::frame_middle;
use crate::geometry::{Rect, image_bounds, rect};
use crate::options::{AvatarFit, AvatarLocation, ChevronLocation, NamePosition, TextBoxConfig};
use crate::theme::Theme;
use crate::{Error, Result};

/// Where every element of a text box goes for one destination rectangle.
///
/// Always satisfies `text_rect ⊆ center_rect ⊆ frame_rect ⊆ dest`.
/// Reservations are subtracted from `text_rect` in the order name, avatar,
/// chevron.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub dest: Rect,
    /// `dest` minus a name tag drawn above the frame.
    pub frame_rect: Rect,
    /// Frame interior.
    pub center_rect: Rect,
    pub text_rect: Rect,
    pub avatar_rect: Rect,
    pub chevron_rect: Rect,
    /// Empty when no name is drawn.
    pub name_rect: Rect,
}

fn horizontal_slot(area: Rect, width: i32, centered: bool) -> (i32, i32) {
    let width = width.clamp(0, area.width().max(0));
    let x = if centered {
        area.min.x + (area.width() - width) / 2
    } else {
        area.min.x
    };
    (x, x + width)
}

/// Avatar size after fitting, never larger than its natural size.
fn fitted_avatar_size(natural: (i32, i32), fit: AvatarFit, center: Rect) -> (i32, i32) {
    let (w, h) = natural;
    match fit {
        AvatarFit::None | AvatarFit::Center => (w, h),
        AvatarFit::NearestNeighbour | AvatarFit::Bilinear => {
            if center.width() <= 0 || center.height() <= 0 {
                return (0, 0);
            }
            let dx = f64::from(w) / f64::from(center.width());
            let dy = f64::from(h) / f64::from(center.height());
            let ratio = dx.max(dy);
            if ratio <= 1.0 {
                return (w, h);
            }
            ((f64::from(w) / ratio) as i32, (f64::from(h) / ratio) as i32)
        }
    }
}

impl Layout {
    /// Lays a text box configured by `config` out over `dest`.
    ///
    /// Fails with a configuration error when `theme` cannot draw frames.
    pub fn compute(config: &TextBoxConfig, theme: &dyn Theme, dest: Rect) -> Result<Self> {
        let frame_theme = theme
            .as_frame()
            .ok_or_else(|| Error::configuration("invalid theme, missing a frame drawer"))?;

        let name_size = config.visible_name().map(|name| {
            let face = theme.font_face();
            (
                face.measure(name).ceil() as i32,
                face.line_metrics().text_height().ceil() as i32,
            )
        });
        let position = config.name_position;

        let mut frame_rect = dest;
        let mut name_rect = rect(dest.min.x, dest.min.y, dest.min.x, dest.min.y);

        if let Some((w, h)) = name_size
            && position.is_above_frame()
        {
            let h = h.clamp(0, dest.height().max(0));
            let (x0, x1) = horizontal_slot(dest, w, position.is_centered());
            name_rect = rect(x0, dest.min.y, x1, dest.min.y + h);
            frame_rect.min.y += h;
        }

        let frame_image = frame_theme.frame_image();
        let mut center_rect = frame_middle(
            frame_rect,
            image_bounds(&frame_image),
            frame_theme.frame_center(),
        );
        let mut text_rect = center_rect;

        let mut name_band = None;
        if let Some((_, h)) = name_size
            && position.is_in_frame()
        {
            let h = h.clamp(0, center_rect.height().max(0));
            name_band = Some((center_rect.min.y, center_rect.min.y + h));
            center_rect.min.y += h;
            text_rect.min.y += h;
        }

        let avatar = config.avatar.clone().unwrap_or_else(|| theme.avatar());
        let (avatar_w, avatar_h) = fitted_avatar_size(
            (avatar.width() as i32, avatar.height() as i32),
            config.avatar_fit,
            center_rect,
        );
        let mut avatar_rect = rect(0, 0, avatar_w, avatar_h);
        let strip = avatar_w.clamp(0, text_rect.width().max(0));
        match config.avatar_location {
            AvatarLocation::None => {}
            AvatarLocation::Left => {
                avatar_rect = rect(
                    text_rect.min.x,
                    center_rect.min.y,
                    text_rect.min.x + strip,
                    center_rect.max.y,
                );
                text_rect.min.x += strip;
            }
            AvatarLocation::Right => {
                text_rect.max.x -= strip;
                avatar_rect = rect(
                    text_rect.max.x,
                    center_rect.min.y,
                    text_rect.max.x + strip,
                    center_rect.max.y,
                );
            }
        }

        if let (Some((w, _)), Some((y0, y1))) = (name_size, name_band) {
            let anchor = match position {
                NamePosition::LeftAboveAvatarInFrame
                    if config.avatar_location != AvatarLocation::None =>
                {
                    avatar_rect.min.x
                }
                _ => text_rect.min.x,
            };
            let area = rect(anchor, y0, center_rect.max.x, y1);
            let slot = if position.is_centered() { center_rect } else { area };
            let (x0, x1) = horizontal_slot(slot, w, position.is_centered());
            name_rect = rect(x0, y0, x1, y1);
        }

        let chevron = theme.chevron();
        let (chevron_w, chevron_h) = (chevron.width() as i32, chevron.height() as i32);
        let mut chevron_rect = rect(0, 0, chevron_w, chevron_h);
        let location = config.chevron_location;
        if location.is_inside() {
            text_rect.max.y -= chevron_h.clamp(0, text_rect.height().max(0));
        } else if location.is_on_frame() {
            let margin = frame_rect.max.y - text_rect.max.y;
            let overflow = (chevron_h - margin).max(0);
            text_rect.max.y -= overflow.clamp(0, text_rect.height().max(0));
        }
        if location.is_standalone() {
            let x = match location {
                ChevronLocation::CenterBottomInsideText | ChevronLocation::CenterBottomOnFrameText => {
                    text_rect.min.x + (text_rect.width() - chevron_w) / 2
                }
                ChevronLocation::CenterBottomInsideFrame
                | ChevronLocation::CenterBottomOnFrameFrame => {
                    center_rect.min.x + (center_rect.width() - chevron_w) / 2
                }
                ChevronLocation::RightBottomInsideText | ChevronLocation::RightBottomOnFrameText => {
                    text_rect.max.x - chevron_w
                }
                _ => center_rect.max.x - chevron_w,
            };
            chevron_rect = rect(x, text_rect.max.y, x + chevron_w, text_rect.max.y + chevron_h);
        }

        Ok(Self {
            dest,
            frame_rect,
            center_rect,
            text_rect,
            avatar_rect,
            chevron_rect,
            name_rect,
        })
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use image::{Rgba, RgbaImage};

    use super::*;
    use crate::face::FontFace;
    use crate::geometry::contains_rect;
    use crate::options::TextBoxOption;
    use crate::theme::SimpleTheme;

    fn simple() -> SimpleTheme {
        SimpleTheme::default()
    }

    #[test]
    fn plain_layout_matches_frame_interior() {
        let layout =
            Layout::compute(&TextBoxConfig::default(), &simple(), rect(0, 0, 600, 150)).unwrap();
        assert_eq!(layout.frame_rect, rect(0, 0, 600, 150));
        assert_eq!(layout.center_rect, rect(34, 34, 565, 116));
        assert_eq!(layout.text_rect, layout.center_rect);
        assert!(layout.name_rect.is_empty());
    }

    #[test]
    fn invariants_hold_for_every_combination() {
        let dests = [
            rect(0, 0, 600, 150),
            rect(10, 20, 310, 120),
            rect(0, 0, 90, 60),
            rect(0, 0, 40, 40),
            rect(0, 0, 0, 0),
        ];
        let avatars = [AvatarLocation::None, AvatarLocation::Left, AvatarLocation::Right];
        let fits = [
            AvatarFit::None,
            AvatarFit::Center,
            AvatarFit::NearestNeighbour,
            AvatarFit::Bilinear,
        ];
        let theme = simple();
        for dest in dests {
            for avatar in avatars {
                for fit in fits {
                    for chevron in ChevronLocation::ALL {
                        for name in NamePosition::ALL {
                            let config = TextBoxConfig::from_options([
                                avatar.into(),
                                fit.into(),
                                chevron.into(),
                                name.into(),
                                TextBoxOption::Name("Narrator".into()),
                            ]);
                            let l = Layout::compute(&config, &theme, dest).unwrap();
                            let case = format!("{dest:?} {avatar} {fit} {chevron} {name}");
                            assert!(contains_rect(&l.dest, &l.frame_rect), "{case}");
                            assert!(contains_rect(&l.frame_rect, &l.center_rect), "{case}");
                            assert!(contains_rect(&l.center_rect, &l.text_rect), "{case}");
                            if config.visible_name().is_some() && !l.name_rect.is_empty() {
                                assert!(contains_rect(&l.dest, &l.name_rect), "{case}");
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn large_avatar_scales_down() {
        let big = Arc::new(RgbaImage::from_pixel(200, 300, Rgba([255, 0, 0, 255])));
        let config = TextBoxConfig::from_options([
            AvatarLocation::Left.into(),
            AvatarFit::NearestNeighbour.into(),
            TextBoxOption::Avatar(big),
        ]);
        let l = Layout::compute(&config, &simple(), rect(0, 0, 600, 150)).unwrap();
        assert!(l.avatar_rect.width() < 200);
        assert!(l.avatar_rect.height() <= l.center_rect.height());
        assert_eq!(l.avatar_rect.width(), 54);
        assert_eq!(l.avatar_rect.min.x, l.center_rect.min.x);
        assert_eq!(l.text_rect.min.x, l.avatar_rect.max.x);
    }

    #[test]
    fn small_avatar_is_never_upscaled() {
        let small = Arc::new(RgbaImage::new(20, 20));
        let config = TextBoxConfig::from_options([
            AvatarLocation::Right.into(),
            AvatarFit::Bilinear.into(),
            TextBoxOption::Avatar(small),
        ]);
        let l = Layout::compute(&config, &simple(), rect(0, 0, 600, 150)).unwrap();
        assert_eq!(l.avatar_rect.width(), 20);
        assert_eq!(l.text_rect.max.x, 565 - 20);
    }

    #[test]
    fn chevron_inside_text_reserves_its_height() {
        let config = TextBoxConfig::from_options([ChevronLocation::CenterBottomInsideText.into()]);
        let l = Layout::compute(&config, &simple(), rect(0, 0, 600, 150)).unwrap();
        assert_eq!(l.text_rect.max.y, 116 - 10);
        assert_eq!(l.chevron_rect, rect(291, 106, 307, 116));
    }

    #[test]
    fn chevron_on_frame_only_reserves_overflow() {
        let config = TextBoxConfig::from_options([ChevronLocation::RightBottomOnFrameFrame.into()]);
        let l = Layout::compute(&config, &simple(), rect(0, 0, 600, 150)).unwrap();
        // bottom margin (34) is taller than the chevron
        assert_eq!(l.text_rect.max.y, 116);
        assert_eq!(l.chevron_rect, rect(549, 116, 565, 126));
    }

    #[test]
    fn name_above_frame_shrinks_frame() {
        let config = TextBoxConfig::from_options([
            TextBoxOption::Name("Ann".into()),
            NamePosition::TopCenterAboveFrame.into(),
        ]);
        let theme = simple();
        let height = theme.font_face().line_metrics().text_height() as i32;
        let l = Layout::compute(&config, &theme, rect(0, 0, 600, 150)).unwrap();
        assert_eq!(l.frame_rect.min.y, height);
        assert_eq!(l.name_rect, rect(288, 0, 312, height));
    }

    #[test]
    fn name_in_frame_sits_above_avatar() {
        let config = TextBoxConfig::from_options([
            TextBoxOption::Name("Ann".into()),
            NamePosition::LeftAboveAvatarInFrame.into(),
            AvatarLocation::Left.into(),
        ]);
        let l = Layout::compute(&config, &simple(), rect(0, 0, 600, 150)).unwrap();
        assert_eq!(l.name_rect.min.x, l.avatar_rect.min.x);
        assert_eq!(l.name_rect.max.y, l.center_rect.min.y);
        assert_eq!(l.center_rect.min.y, 34 + 16);
    }

    struct Frameless;

    impl Theme for Frameless {
        fn chevron(&self) -> Arc<RgbaImage> {
            Arc::new(RgbaImage::new(1, 1))
        }
        fn avatar(&self) -> Arc<RgbaImage> {
            Arc::new(RgbaImage::new(1, 1))
        }
        fn font_face(&self) -> Arc<dyn FontFace> {
            Arc::new(crate::face::BlockFace::default())
        }
    }

    #[test]
    fn missing_frame_is_a_configuration_error() {
        let err = Layout::compute(&TextBoxConfig::default(), &Frameless, rect(0, 0, 10, 10));
        assert!(matches!(err, Err(ref e) if e.is_configuration()));
    }
}
