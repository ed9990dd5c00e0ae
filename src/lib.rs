//! # Fukidashi
//!
//! RPG style dialogue text boxes rendered into `image` buffers.
//!
//! ## Overview
//!
//! A [`TextBox`] takes a [`Theme`] (frame, chevron, avatar and font), some
//! text and a destination size. It wraps the text into pages that fit the
//! frame's text area and draws them one page or one animation frame at a
//! time.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use fukidashi::geometry::size;
//! use fukidashi::options::{ChevronLocation, TextBoxOption};
//! use fukidashi::theme::SimpleTheme;
//! use fukidashi::{Animation, TextBox};
//!
//! # fn main() -> fukidashi::Result<()> {
//! let theme = Arc::new(SimpleTheme::default());
//! let mut text_box = TextBox::new(
//!     theme,
//!     "Welcome, traveller. The road north is closed until spring.",
//!     size(600, 150),
//!     [
//!         TextBoxOption::from(ChevronLocation::TextEnd),
//!         TextBoxOption::from(Animation::letter_by_letter()),
//!     ],
//! )?;
//!
//! let mut frame = image::RgbaImage::new(600, 150);
//! loop {
//!     let step = text_box.draw_next_frame(&mut frame)?;
//!     if step.is_end() {
//!         break;
//!     }
//!     // present `frame`, then sleep for `step.wait`
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! *   **Layout**: Nine-slice frames, avatars on either side, a name plate and a
//!     "more text" chevron in a range of positions.
//! *   **Pagination**: Word wrapping with hard breaks, computed lazily page by page.
//! *   **Animation**: Fade in/out and box-by-box or letter-by-letter reveal.
//! *   **Hooks**: Post-draw decorators and hit-test registration of drawn words.

pub mod animation;
pub mod compose;
pub mod error;
pub mod face;
pub mod font_storage;
pub mod geometry;
pub mod layout;
pub mod options;
pub mod pager;
pub mod render;
pub mod text;
pub mod text_box;
pub mod theme;

// common re-exports
pub use animation::{Animation, Step};
pub use error::{Error, Result};
pub use face::{BlockFace, FontFace, FontdueFace};
pub use font_storage::FontStorage;
pub use layout::Layout;
pub use options::{TextBoxConfig, TextBoxOption};
pub use pager::{Page, Pager};
pub use render::PageRenderer;
pub use text_box::TextBox;
pub use theme::Theme;

// re-export dependencies
pub use fontdb;
pub use fontdue;
pub use image;
