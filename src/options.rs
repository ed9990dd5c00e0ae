//! Text box configuration and the options that build it.
//!
//! A text box is configured once, at construction, by applying a sequence of
//! [`TextBoxOption`]s to a [`TextBoxConfig`]. Options are applied in order;
//! for settings that exclude each other the last one wins.
//!
//! Every placement enum parses from the kebab-case preset names used on
//! command lines, e.g. `"left-avatar".parse::<AvatarLocation>()`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use image::RgbaImage;

use crate::animation::Animation;
use crate::render::{HitTestSink, PostDraw};
use crate::{Error, Result};

/// Side of the text area the avatar is drawn on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AvatarLocation {
    #[default]
    None,
    Left,
    Right,
}

/// How the avatar image is fitted into its strip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AvatarFit {
    /// Natural size, clipped.
    #[default]
    None,
    /// Natural size, cropped around its center.
    Center,
    /// Scaled down to fit, nearest neighbour sampling.
    NearestNeighbour,
    /// Scaled down to fit, bilinear sampling.
    Bilinear,
}

/// Where the "more text follows" chevron goes.
///
/// `Text*` placements are positioned relative to the text area, `*Frame`
/// placements relative to the whole frame interior. `Inside` placements keep
/// the chevron within the interior; `OnFrame` placements let it overlap the
/// frame's bottom edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChevronLocation {
    #[default]
    None,
    CenterBottomInsideText,
    CenterBottomInsideFrame,
    CenterBottomOnFrameText,
    CenterBottomOnFrameFrame,
    RightBottomInsideText,
    RightBottomInsideFrame,
    RightBottomOnFrameText,
    RightBottomOnFrameFrame,
    /// Appended to the wrapped text itself, after the last word of a page.
    TextEnd,
}

impl ChevronLocation {
    pub const ALL: [ChevronLocation; 10] = [
        Self::None,
        Self::CenterBottomInsideText,
        Self::CenterBottomInsideFrame,
        Self::CenterBottomOnFrameText,
        Self::CenterBottomOnFrameFrame,
        Self::RightBottomInsideText,
        Self::RightBottomInsideFrame,
        Self::RightBottomOnFrameText,
        Self::RightBottomOnFrameFrame,
        Self::TextEnd,
    ];

    /// Drawn by the frame renderer into its own rectangle.
    pub fn is_standalone(self) -> bool {
        !matches!(self, Self::None | Self::TextEnd)
    }

    pub(crate) fn is_inside(self) -> bool {
        matches!(
            self,
            Self::CenterBottomInsideText
                | Self::CenterBottomInsideFrame
                | Self::RightBottomInsideText
                | Self::RightBottomInsideFrame
        )
    }

    pub(crate) fn is_on_frame(self) -> bool {
        matches!(
            self,
            Self::CenterBottomOnFrameText
                | Self::CenterBottomOnFrameFrame
                | Self::RightBottomOnFrameText
                | Self::RightBottomOnFrameFrame
        )
    }
}

/// Placement of the speaker's name tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NamePosition {
    #[default]
    None,
    TopLeftAboveTextInFrame,
    TopCenterInFrame,
    LeftAboveAvatarInFrame,
    TopLeftAboveFrame,
    TopCenterAboveFrame,
}

impl NamePosition {
    pub const ALL: [NamePosition; 6] = [
        Self::None,
        Self::TopLeftAboveTextInFrame,
        Self::TopCenterInFrame,
        Self::LeftAboveAvatarInFrame,
        Self::TopLeftAboveFrame,
        Self::TopCenterAboveFrame,
    ];

    pub(crate) fn is_above_frame(self) -> bool {
        matches!(self, Self::TopLeftAboveFrame | Self::TopCenterAboveFrame)
    }

    pub(crate) fn is_in_frame(self) -> bool {
        matches!(
            self,
            Self::TopLeftAboveTextInFrame | Self::TopCenterInFrame | Self::LeftAboveAvatarInFrame
        )
    }

    pub(crate) fn is_centered(self) -> bool {
        matches!(self, Self::TopCenterInFrame | Self::TopCenterAboveFrame)
    }
}

macro_rules! preset_names {
    ($ty:ident, $what:literal, { $($name:literal => $value:expr),+ $(,)? }) => {
        impl $ty {
            /// Preset name accepted by `FromStr`.
            pub fn name(self) -> &'static str {
                $(if self == $value { return $name; })+
                "none"
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    "none" => Ok(Self::default()),
                    $($name => Ok($value),)+
                    other => Err(Error::configuration(format!(
                        "unknown {} {:?}",
                        $what, other
                    ))),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

preset_names!(AvatarLocation, "avatar location", {
    "left-avatar" => AvatarLocation::Left,
    "right-avatar" => AvatarLocation::Right,
});

preset_names!(AvatarFit, "avatar fit", {
    "center-avatar" => AvatarFit::Center,
    "nearest-neighbour" => AvatarFit::NearestNeighbour,
    "approx-bilinear" => AvatarFit::Bilinear,
    "approx-biLinear" => AvatarFit::Bilinear,
});

preset_names!(ChevronLocation, "chevron location", {
    "center-bottom-chevron" => ChevronLocation::CenterBottomInsideText,
    "center-bottom-inside-chevron" => ChevronLocation::CenterBottomInsideFrame,
    "center-bottom-on-frame-text-chevron" => ChevronLocation::CenterBottomOnFrameText,
    "center-bottom-on-frame-chevron" => ChevronLocation::CenterBottomOnFrameFrame,
    "right-bottom-inside-text-chevron" => ChevronLocation::RightBottomInsideText,
    "right-bottom-inside-chevron" => ChevronLocation::RightBottomInsideFrame,
    "right-bottom-on-frame-text-chevron" => ChevronLocation::RightBottomOnFrameText,
    "right-bottom-on-frame-chevron" => ChevronLocation::RightBottomOnFrameFrame,
    "end-of-text-chevron" => ChevronLocation::TextEnd,
});

preset_names!(NamePosition, "name position", {
    "top-left-above-text-in-frame-name" => NamePosition::TopLeftAboveTextInFrame,
    "top-center-in-frame-name" => NamePosition::TopCenterInFrame,
    "left-above-avatar-in-frame-name" => NamePosition::LeftAboveAvatarInFrame,
    "top-left-above-frame-name" => NamePosition::TopLeftAboveFrame,
    "top-center-above-frame-name" => NamePosition::TopCenterAboveFrame,
});

/// Everything a text box is configured with. Immutable once built.
#[derive(Clone, Default)]
pub struct TextBoxConfig {
    pub avatar_location: AvatarLocation,
    pub avatar_fit: AvatarFit,
    pub chevron_location: ChevronLocation,
    pub name: Option<String>,
    pub name_position: NamePosition,
    /// Overrides the theme's avatar.
    pub avatar: Option<Arc<RgbaImage>>,
    /// Run after the standard elements, in registration order.
    pub post_draw: Vec<Arc<dyn PostDraw>>,
    pub animation: Option<Animation>,
    pub hit_test: Option<Arc<dyn HitTestSink>>,
}

impl TextBoxConfig {
    /// Applies `options` in order.
    pub fn from_options(options: impl IntoIterator<Item = TextBoxOption>) -> Self {
        let mut config = Self::default();
        for option in options {
            option.apply(&mut config);
        }
        config
    }

    /// The name to draw, if any.
    pub fn visible_name(&self) -> Option<&str> {
        match (&self.name, self.name_position) {
            (_, NamePosition::None) => None,
            (Some(name), _) if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

/// A single configuration mutation.
#[derive(Clone)]
pub enum TextBoxOption {
    AvatarLocation(AvatarLocation),
    AvatarFit(AvatarFit),
    Chevron(ChevronLocation),
    Name(String),
    NamePosition(NamePosition),
    Avatar(Arc<RgbaImage>),
    /// Appends a decorator; decorators accumulate.
    PostDraw(Arc<dyn PostDraw>),
    Animation(Animation),
    HitTest(Arc<dyn HitTestSink>),
}

impl TextBoxOption {
    pub fn apply(self, config: &mut TextBoxConfig) {
        match self {
            Self::AvatarLocation(v) => config.avatar_location = v,
            Self::AvatarFit(v) => config.avatar_fit = v,
            Self::Chevron(v) => config.chevron_location = v,
            Self::Name(v) => config.name = Some(v),
            Self::NamePosition(v) => config.name_position = v,
            Self::Avatar(v) => config.avatar = Some(v),
            Self::PostDraw(v) => config.post_draw.push(v),
            Self::Animation(v) => config.animation = Some(v),
            Self::HitTest(v) => config.hit_test = Some(v),
        }
    }
}

impl From<AvatarLocation> for TextBoxOption {
    fn from(v: AvatarLocation) -> Self {
        Self::AvatarLocation(v)
    }
}

impl From<AvatarFit> for TextBoxOption {
    fn from(v: AvatarFit) -> Self {
        Self::AvatarFit(v)
    }
}

impl From<ChevronLocation> for TextBoxOption {
    fn from(v: ChevronLocation) -> Self {
        Self::Chevron(v)
    }
}

impl From<NamePosition> for TextBoxOption {
    fn from(v: NamePosition) -> Self {
        Self::NamePosition(v)
    }
}

impl From<Animation> for TextBoxOption {
    fn from(v: Animation) -> Self {
        Self::Animation(v)
    }
}
