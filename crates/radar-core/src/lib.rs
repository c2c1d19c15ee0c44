//! Domain types shared by the minimap radar crates: pixel geometry and color bands.

pub mod color;
pub mod geometry;

pub use color::{ChannelRange, RangeError, Rgb};
pub use geometry::{min_enclosing_circle, Circle, Rectangle};
