use std::sync::Arc;

use image::RgbaImage;

use crate::face::LineMetrics;

/// Position in the wrapper's token stream.
///
/// `offset` counts characters already consumed from a word that was hard
/// broken across lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor {
    pub token: usize,
    pub offset: usize,
}

impl Cursor {
    pub(crate) fn next_token(self) -> Self {
        Self {
            token: self.token + 1,
            offset: 0,
        }
    }
}

/// Content of an atomic drawable unit.
#[derive(Clone, Debug, PartialEq)]
pub enum BoxKind {
    /// A run of visible characters.
    Word(String),
    /// Inter-word whitespace.
    Space(String),
    /// Image marking that more content follows on the next page.
    PageBreak(Arc<RgbaImage>),
}

/// An atomic drawable unit placed on a line.
///
/// `x` is relative to the start of the line.
#[derive(Clone, Debug, PartialEq)]
pub struct WrapBox {
    pub kind: BoxKind,
    pub x: f32,
    pub width: f32,
    pub(crate) source: Cursor,
}

impl WrapBox {
    /// Number of letter units: one per character, one for an image.
    pub fn letter_count(&self) -> usize {
        match &self.kind {
            BoxKind::Word(s) | BoxKind::Space(s) => s.chars().count(),
            BoxKind::PageBreak(_) => 1,
        }
    }

    /// Whitespace or empty boxes reveal without costing an animation step.
    pub fn is_blank(&self) -> bool {
        match &self.kind {
            BoxKind::Word(s) | BoxKind::Space(s) => s.chars().all(char::is_whitespace),
            BoxKind::PageBreak(_) => false,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            BoxKind::Word(s) | BoxKind::Space(s) => Some(s),
            BoxKind::PageBreak(_) => None,
        }
    }
}

/// One row of wrapped content.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub boxes: Vec<WrapBox>,
    pub width: f32,
    pub metrics: LineMetrics,
}

impl Line {
    pub(crate) fn empty(metrics: LineMetrics) -> Self {
        Self {
            boxes: Vec::new(),
            width: 0.0,
            metrics,
        }
    }

    /// Baseline-to-baseline height of this line.
    pub fn height(&self) -> f32 {
        self.metrics.line_height()
    }

    pub(crate) fn push(&mut self, kind: BoxKind, width: f32, source: Cursor) {
        self.boxes.push(WrapBox {
            kind,
            x: self.width,
            width,
            source,
        });
        self.width += width;
    }

    pub(crate) fn pop(&mut self) -> Option<WrapBox> {
        let popped = self.boxes.pop()?;
        self.width = popped.x;
        Some(popped)
    }

    pub(crate) fn ends_with_space(&self) -> bool {
        matches!(
            self.boxes.last(),
            Some(WrapBox {
                kind: BoxKind::Space(_),
                ..
            })
        )
    }
}
