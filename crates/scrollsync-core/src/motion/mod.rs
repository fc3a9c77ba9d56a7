//! Motion primitives
//!
//! - `easing` - named easing curves
//! - `timing` - progress, interpolation and loop arithmetic

pub mod easing;
pub mod timing;

pub use easing::EasingType;
pub use timing::{elapsed_ms, is_complete_at, lerp, progress_at, shortest_delta, wrap};
