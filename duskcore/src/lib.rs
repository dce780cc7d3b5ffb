//! Shared building blocks for the dusk editor.

pub mod color;
pub mod fonts;
pub mod logging;
pub mod storage;
pub mod text;
pub mod theme;
pub mod widgets;

pub use color::Rgb;
pub use theme::DuskTheme;
