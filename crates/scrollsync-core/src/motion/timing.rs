//! Time and interpolation helpers shared by the drivers
//!
//! All functions take explicit timestamps so frame callbacks stay
//! deterministic under test.

use std::time::{Duration, Instant};

/// Animation progress (0.0 to 1.0) at `now` for an animation that began at `start`
#[inline]
pub fn progress_at(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if an animation started at `start` has run its full duration by `now`
#[inline]
pub fn is_complete_at(start: Instant, now: Instant, duration: Duration) -> bool {
    now.saturating_duration_since(start) >= duration
}

/// Milliseconds elapsed between two instants, zero if `later` precedes `earlier`
#[inline]
pub fn elapsed_ms(earlier: Instant, later: Instant) -> f64 {
    later.saturating_duration_since(earlier).as_secs_f64() * 1000.0
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Wrap `value` into `[0, total)`
///
/// Returns `value` unchanged when `total` is not positive.
#[inline]
pub fn wrap(value: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return value;
    }
    let wrapped = value.rem_euclid(total);
    // rem_euclid can round up to `total` for tiny negative inputs
    if wrapped >= total { 0.0 } else { wrapped }
}

/// Signed distance from `from` to `to` along a loop of length `total`,
/// taking the shorter way around
#[inline]
pub fn shortest_delta(from: f64, to: f64, total: f64) -> f64 {
    let delta = to - from;
    if total <= 0.0 {
        return delta;
    }
    let half = total / 2.0;
    if delta > half {
        delta - total
    } else if delta < -half {
        delta + total
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_zero_duration() {
        let start = Instant::now();
        assert!((progress_at(start, start, Duration::ZERO) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_midway() {
        let start = Instant::now();
        let now = start + Duration::from_millis(50);
        assert!((progress_at(start, now, Duration::from_millis(100)) - 0.5).abs() < 0.001);
        assert!(!is_complete_at(start, now, Duration::from_millis(100)));
        assert!(is_complete_at(start, now, Duration::from_millis(50)));
    }

    #[test]
    fn test_wrap() {
        assert!((wrap(5.5, 5.0) - 0.5).abs() < 1e-9);
        assert!((wrap(-0.5, 5.0) - 4.5).abs() < 1e-9);
        assert_eq!(wrap(3.0, 0.0), 3.0);
    }

    #[test]
    fn test_shortest_delta_crosses_boundary() {
        // 4.8 -> 0.2 on a loop of 5 is +0.4, not -4.6
        assert!((shortest_delta(4.8, 0.2, 5.0) - 0.4).abs() < 1e-9);
        assert!((shortest_delta(0.2, 4.8, 5.0) + 0.4).abs() < 1e-9);
        assert!((shortest_delta(1.0, 2.0, 5.0) - 1.0).abs() < 1e-9);
    }
}
