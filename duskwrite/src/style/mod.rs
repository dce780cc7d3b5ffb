//! Range-tagged text styling.
//!
//! `record` holds the attribute types, `tags` the rendering-side tag store
//! the text widget draws from, and `overlay` the manager that allocates a
//! new style record for every formatting action.

pub mod overlay;
pub mod record;
pub mod tags;

pub use overlay::{CompactionReport, StyleOverlay};
pub use record::{ColorChannel, DefaultStyle, EffectiveStyle, TagId, Toggle};
pub use tags::TagLayer;
