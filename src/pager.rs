//! Append-only cache of wrapped pages.

use std::sync::Arc;

use crate::Result;
use crate::layout::Layout;
use crate::text::{BoxKind, Line, TextWrapper};

/// Lines that fit one text rectangle, plus per-unit blank flags used by the
/// reveal animations.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub lines: Vec<Line>,
    box_blank: Vec<bool>,
    letter_blank: Vec<bool>,
}

/// Granularity of the drawable units of a page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RevealUnit {
    /// Whole boxes: words, spaces, inline images.
    #[default]
    Box,
    /// Single characters; inline images count as one.
    Letter,
}

impl Page {
    pub fn new(lines: Vec<Line>) -> Self {
        let mut box_blank = Vec::new();
        let mut letter_blank = Vec::new();
        for b in lines.iter().flat_map(|l| l.boxes.iter()) {
            box_blank.push(b.is_blank());
            match &b.kind {
                BoxKind::Word(s) | BoxKind::Space(s) => {
                    letter_blank.extend(s.chars().map(char::is_whitespace));
                }
                BoxKind::PageBreak(_) => letter_blank.push(false),
            }
        }
        Self {
            lines,
            box_blank,
            letter_blank,
        }
    }

    pub fn box_count(&self) -> usize {
        self.box_blank.len()
    }

    pub fn letter_count(&self) -> usize {
        self.letter_blank.len()
    }

    pub fn unit_count(&self, unit: RevealUnit) -> usize {
        match unit {
            RevealUnit::Box => self.box_count(),
            RevealUnit::Letter => self.letter_count(),
        }
    }

    /// `true` for whitespace or empty units; out of range counts as not blank.
    pub fn is_blank_unit(&self, unit: RevealUnit, index: usize) -> bool {
        let flags = match unit {
            RevealUnit::Box => &self.box_blank,
            RevealUnit::Letter => &self.letter_blank,
        };
        flags.get(index).copied().unwrap_or(false)
    }
}

/// Pages discovered so far and the cursor of the next page to draw.
///
/// Pages are only ever appended; an index refers to the same page for the
/// lifetime of the pager.
#[derive(Debug, Default)]
pub struct Pager {
    pages: Vec<Arc<Page>>,
    next_page: usize,
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pulls one more page from `wrapper` into the cache.
    ///
    /// Returns `false`, leaving the cache untouched, once the wrapper has no
    /// further lines.
    pub fn compute_next_page(
        &mut self,
        wrapper: &mut dyn TextWrapper,
        layout: &Layout,
    ) -> Result<bool> {
        let lines = wrapper.text_to_rect(layout.text_rect)?;
        if lines.is_empty() {
            return Ok(false);
        }
        let page = Page::new(lines);
        log::debug!(
            "page {} computed: {} lines, {} boxes",
            self.pages.len(),
            page.lines.len(),
            page.box_count()
        );
        self.pages.push(Arc::new(page));
        Ok(true)
    }

    /// Next undrawn page, computing it when the cache has run dry.
    ///
    /// Advances the cursor. `None` once content is exhausted.
    pub fn take_next(
        &mut self,
        wrapper: &mut dyn TextWrapper,
        layout: &Layout,
    ) -> Result<Option<(usize, Arc<Page>)>> {
        if self.next_page == self.pages.len() && !self.compute_next_page(wrapper, layout)? {
            log::debug!("content exhausted after {} pages", self.pages.len());
            return Ok(None);
        }
        let Some(page) = self.pages.get(self.next_page) else {
            return Ok(None);
        };
        let index = self.next_page;
        let page = Arc::clone(page);
        self.next_page += 1;
        Ok(Some((index, page)))
    }

    /// Cached pages not drawn yet.
    pub fn has_cached(&self) -> bool {
        self.next_page < self.pages.len()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn next_page_index(&self) -> usize {
        self.next_page
    }

    pub fn page(&self, index: usize) -> Option<&Arc<Page>> {
        self.pages.get(index)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::BlockFace;
    use crate::geometry::rect;
    use crate::text::{SimpleWrapper, WrapConfig};

    fn layout(text_rect: crate::geometry::Rect) -> Layout {
        Layout {
            dest: text_rect,
            frame_rect: text_rect,
            center_rect: text_rect,
            text_rect,
            avatar_rect: text_rect,
            chevron_rect: text_rect,
            name_rect: text_rect,
        }
    }

    fn wrapper(text: &str) -> SimpleWrapper {
        SimpleWrapper::new(
            text,
            std::sync::Arc::new(BlockFace::default()),
            WrapConfig::default(),
        )
    }

    #[test]
    fn counts_units_and_blanks() {
        let mut w = wrapper("ab cd");
        let lines = w.text_to_rect(rect(0, 0, 200, 40)).unwrap();
        let page = Page::new(lines);
        assert_eq!(page.box_count(), 3);
        assert_eq!(page.letter_count(), 5);
        assert!(page.is_blank_unit(RevealUnit::Box, 1));
        assert!(!page.is_blank_unit(RevealUnit::Box, 2));
        assert!(page.is_blank_unit(RevealUnit::Letter, 2));
        assert!(!page.is_blank_unit(RevealUnit::Letter, 99));
        assert_eq!(page.unit_count(RevealUnit::Letter), 5);
    }

    #[test]
    fn computes_lazily_and_never_twice() {
        let text = "one\ntwo\nthree";
        let mut w = wrapper(text);
        // one line per page
        let l = layout(rect(0, 0, 200, 20));
        let mut pager = Pager::new();

        let (i, first) = pager.take_next(&mut w, &l).unwrap().unwrap();
        assert_eq!(i, 0);
        assert_eq!(pager.len(), 1);
        assert!(!pager.has_cached());

        assert!(pager.compute_next_page(&mut w, &l).unwrap());
        assert!(pager.compute_next_page(&mut w, &l).unwrap());
        assert!(!pager.compute_next_page(&mut w, &l).unwrap());
        assert_eq!(pager.len(), 3);
        assert!(pager.has_cached());

        assert!(Arc::ptr_eq(pager.page(0).unwrap(), &first));
        assert_eq!(pager.take_next(&mut w, &l).unwrap().unwrap().0, 1);
        assert_eq!(pager.take_next(&mut w, &l).unwrap().unwrap().0, 2);
        assert!(pager.take_next(&mut w, &l).unwrap().is_none());
        assert_eq!(pager.next_page_index(), 3);
    }
}
