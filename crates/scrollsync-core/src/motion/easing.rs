//! Pure easing curves
//!
//! Every curve maps input [0, 1] to output [0, 1]. Used by the momentum
//! driver's snap animation and by behaviours that shape their output.

use serde::{Deserialize, Serialize};

/// Named easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingType {
    /// Jump straight to the end value
    None,
    Linear,
    /// Cubic ease-out: 1 - (1-t)³
    #[default]
    #[serde(alias = "ease-out-cubic")]
    Cubic,
    /// Quintic ease-out: 1 - (1-t)⁵
    Quintic,
    /// Exponential ease-out: 1 - 2^(-10t)
    EaseOut,
    /// Symmetric cubic ease-in-out
    EaseInOutCubic,
}

impl EasingType {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value, clamped to [0, 1]
    ///
    /// # Returns
    /// Eased value in range [0, 1]
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => if t < 1.0 { 0.0 } else { 1.0 },
            EasingType::Linear => t,
            EasingType::Cubic => cubic_ease_out(t),
            EasingType::Quintic => quintic_ease_out(t),
            EasingType::EaseOut => exponential_ease_out(t),
            EasingType::EaseInOutCubic => cubic_ease_in_out(t),
        }
    }

    /// Look up a curve by its configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(EasingType::None),
            "linear" => Some(EasingType::Linear),
            "cubic" | "ease-out-cubic" => Some(EasingType::Cubic),
            "quintic" => Some(EasingType::Quintic),
            "ease-out" => Some(EasingType::EaseOut),
            "ease-in-out-cubic" => Some(EasingType::EaseInOutCubic),
            _ => None,
        }
    }
}

#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

#[inline]
fn cubic_ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}
