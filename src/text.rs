/// Bounded cache of rasterized glyphs.
pub mod glyph_cache;
/// Lines and the boxes they are made of.
pub mod line;
/// Glyph painting and per-draw options.
pub mod paint;
/// Breaking content into pages of lines.
pub mod wrapper;

pub use line::{BoxKind, Cursor, Line, WrapBox};
pub use paint::{BoxObserver, DrawOptions, DrawnBox, GlyphPainter, UnitFilter, UnitIndex};
pub use wrapper::{SimpleWrapper, TextWrapper, WrapConfig};
