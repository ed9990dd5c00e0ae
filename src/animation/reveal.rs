use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;

use crate::Result;
use crate::animation::Step;
use crate::geometry::Rect;
use crate::pager::RevealUnit;
use crate::render::{PageRenderer, PageSlot};
use crate::text::{DrawOptions, UnitIndex};

/// Reveals a page one unit at a time, typewriter style.
///
/// Blank units such as spaces are revealed along with the unit before them
/// and never cost a frame of their own.
#[derive(Clone, Debug)]
pub struct RevealAnimation {
    unit: RevealUnit,
    step_wait: Duration,
    reveal_count: usize,
    current: Option<PageSlot>,
}

impl RevealAnimation {
    pub fn new(unit: RevealUnit, step_wait: Duration) -> Self {
        Self {
            unit,
            step_wait,
            reveal_count: 0,
            current: None,
        }
    }

    pub fn box_by_box() -> Self {
        Self::new(RevealUnit::Box, Duration::from_millis(100))
    }

    pub fn letter_by_letter() -> Self {
        Self::new(RevealUnit::Letter, Duration::from_millis(50))
    }

    pub fn unit(&self) -> RevealUnit {
        self.unit
    }

    /// Units of the current page the next call will draw, before blank skipping.
    pub fn reveal_count(&self) -> usize {
        self.reveal_count
    }

    pub fn advance(
        &mut self,
        renderer: &mut PageRenderer,
        target: &mut RgbaImage,
        dest: Rect,
    ) -> Result<Step> {
        let slot = match self.current.take() {
            Some(slot) => slot,
            None => match renderer.next_page(dest)? {
                Some(slot) => {
                    self.reveal_count = 0;
                    slot
                }
                None => return Ok(Step::end()),
            },
        };

        let total = slot.page.unit_count(self.unit);
        while self.reveal_count < total && slot.page.is_blank_unit(self.unit, self.reveal_count) {
            self.reveal_count += 1;
        }

        let limit = self.reveal_count;
        let unit = self.unit;
        let options = DrawOptions::new().with_unit_filter(Arc::new(move |u: UnitIndex| match unit {
            RevealUnit::Box => u.box_index < limit,
            RevealUnit::Letter => u.letter_index < limit,
        }));
        if let Err(err) = renderer.draw_page(target, &slot, &options) {
            // retried from the same unit on the next call
            self.current = Some(slot);
            return Err(err);
        }

        log::trace!(
            "reveal page {} {:?} {}/{}",
            slot.index,
            self.unit,
            limit,
            total
        );

        if self.reveal_count >= total {
            self.reveal_count = 0;
            return Ok(Step {
                finished: true,
                user_input_accepted: true,
                wait: Duration::ZERO,
            });
        }

        self.reveal_count += 1;
        self.current = Some(slot);
        Ok(Step {
            finished: false,
            user_input_accepted: false,
            wait: self.step_wait,
        })
    }
}
