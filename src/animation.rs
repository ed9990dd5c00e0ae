//! Animation drivers turning one page draw into a timed sequence of frames.

use std::str::FromStr;
use std::time::Duration;

use image::RgbaImage;

use crate::geometry::Rect;
use crate::render::PageRenderer;
use crate::{Error, Result};

/// Brightness fade in and out.
pub mod fade;
/// Incremental reveal of boxes or letters.
pub mod reveal;

pub use crate::pager::RevealUnit;
pub use fade::{FadeAnimation, FadeDirection};
pub use reveal::RevealAnimation;

/// What a driver reports after each call.
///
/// `wait` is a pacing hint: zero means "call again right away", anything
/// else is how long the frame should be shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub finished: bool,
    /// The point where an interactive caller would wait for the player.
    pub user_input_accepted: bool,
    pub wait: Duration,
}

impl Step {
    /// The end-of-content sentinel.
    pub const fn end() -> Self {
        Self {
            finished: true,
            user_input_accepted: false,
            wait: Duration::ZERO,
        }
    }

    pub fn is_end(&self) -> bool {
        *self == Self::end()
    }
}

/// A mounted animation driver. Each variant keeps its own playback state.
#[derive(Clone, Debug)]
pub enum Animation {
    Fade(FadeAnimation),
    Reveal(RevealAnimation),
}

impl Animation {
    pub fn fade() -> Self {
        Self::Fade(FadeAnimation::default())
    }

    pub fn box_by_box() -> Self {
        Self::Reveal(RevealAnimation::box_by_box())
    }

    pub fn letter_by_letter() -> Self {
        Self::Reveal(RevealAnimation::letter_by_letter())
    }

    /// Draws the next frame of the animation into `dest` of `target`.
    pub fn advance(
        &mut self,
        renderer: &mut PageRenderer,
        target: &mut RgbaImage,
        dest: Rect,
    ) -> Result<Step> {
        match self {
            Self::Fade(fade) => fade.advance(renderer, target, dest),
            Self::Reveal(reveal) => reveal.advance(renderer, target, dest),
        }
    }
}

impl FromStr for Animation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fade-animation" => Ok(Self::fade()),
            "box-by-box-animation" => Ok(Self::box_by_box()),
            "letter-by-letter-animation" => Ok(Self::letter_by_letter()),
            other => Err(Error::configuration(format!("unknown animation {other:?}"))),
        }
    }
}
