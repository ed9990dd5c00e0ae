use std::time::Duration;

use image::RgbaImage;

use crate::Result;
use crate::animation::Step;
use crate::compose::brightness_mapper;
use crate::geometry::Rect;
use crate::render::{PageRenderer, PageSlot};
use crate::text::DrawOptions;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FadeDirection {
    #[default]
    In,
    Out,
}

/// Fades every page in from black, then back out.
///
/// A page takes `2 * steps + 2` calls: the first fade-in step and the last
/// fade-out step draw nothing. The fade scales RGB and leaves alpha as is,
/// so translucent frames darken rather than vanish.
#[derive(Clone, Debug)]
pub struct FadeAnimation {
    duration: Duration,
    steps: u32,
    direction: FadeDirection,
    step: u32,
    current: Option<PageSlot>,
}

impl Default for FadeAnimation {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), 20)
    }
}

impl FadeAnimation {
    /// `steps` is clamped to at least one.
    pub fn new(duration: Duration, steps: u32) -> Self {
        Self {
            duration,
            steps: steps.max(1),
            direction: FadeDirection::In,
            step: 0,
            current: None,
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    fn multiplier(&self) -> f32 {
        let steps = self.steps as f32;
        let step = self.step as f32;
        match self.direction {
            FadeDirection::In => step / steps,
            FadeDirection::Out => (steps - step - 1.0) / steps,
        }
    }

    pub fn advance(
        &mut self,
        renderer: &mut PageRenderer,
        target: &mut RgbaImage,
        dest: Rect,
    ) -> Result<Step> {
        if self.current.is_none() {
            match renderer.next_page(dest)? {
                Some(slot) => self.current = Some(slot),
                None => return Ok(Step::end()),
            }
        }

        let at_end = self.step == self.steps;
        let skip = match self.direction {
            FadeDirection::In => self.step == 0,
            FadeDirection::Out => at_end,
        };

        let mut drawn = false;
        if !skip && let Some(slot) = &self.current {
            let options = if self.direction == FadeDirection::In && at_end {
                DrawOptions::default()
            } else {
                DrawOptions::new().with_source_mapper(brightness_mapper(self.multiplier()))
            };
            drawn = renderer.draw_page(target, slot, &options)?;
        }

        log::trace!(
            "fade step {}/{} {:?} page {:?} drawn {}",
            self.step,
            self.steps,
            self.direction,
            self.current.as_ref().map(|slot| slot.index),
            drawn
        );

        let mut step = Step {
            finished: drawn
                && self.direction == FadeDirection::Out
                && self.step + 1 == self.steps,
            user_input_accepted: false,
            wait: self.duration / self.steps,
        };

        match self.direction {
            FadeDirection::In if at_end => {
                step.user_input_accepted = true;
                self.direction = FadeDirection::Out;
                self.step = 0;
            }
            FadeDirection::Out if at_end => {
                self.direction = FadeDirection::In;
                self.step = 0;
                self.current = None;
            }
            _ => self.step += 1,
        }
        Ok(step)
    }
}
