//! Built-in behaviours
//!
//! Options are read from the target's JSON options with the defaults noted
//! on each constructor. All behaviours honour reduced motion by emitting
//! their resting values.

use super::definition::{option_f64, Behaviour};
use super::registry::{BehaviourCategory, BehaviourRegistry};
use super::state::StateKey;
use super::vars::StyleVars;
use crate::motion::EasingType;

/// Register every built-in behaviour into `registry`
pub fn register_builtins(registry: &mut BehaviourRegistry) {
    registry.register_in(BehaviourCategory::Entrance, fade_in());
    registry.register_in(BehaviourCategory::Entrance, reveal_up());
    registry.register_in(BehaviourCategory::Entrance, scale_in());
    registry.register_in(BehaviourCategory::Scroll, parallax());
    registry.register_in(BehaviourCategory::Scroll, scroll_progress());
    registry.register_in(BehaviourCategory::Scroll, velocity_skew());
    registry.register_in(BehaviourCategory::Interaction, hover_lift());
    registry.register_in(BehaviourCategory::Interaction, press_scale());
    registry.register_in(BehaviourCategory::Interaction, active_highlight());
    registry.register_in(BehaviourCategory::Media, video_progress());
}

/// `--opacity = min(1, visibility × multiplier)`; `multiplier` defaults to 1.5
pub fn fade_in() -> Behaviour {
    Behaviour::new("fade-in", |state, options, _| {
        let opacity = if state.prefers_reduced_motion {
            1.0
        } else {
            (state.section_visibility * option_f64(options, "multiplier", 1.5)).min(1.0)
        };
        StyleVars::new().with("--opacity", opacity)
    })
    .with_requires([StateKey::SectionVisibility, StateKey::PrefersReducedMotion])
    .with_template("opacity: var(--opacity, 0); will-change: opacity;")
    .with_prerasterize(true)
}

/// Slides up into place as it becomes visible; `distance` (px) defaults to 40.
/// Builds on `fade-in` for its opacity.
pub fn reveal_up() -> Behaviour {
    Behaviour::new("reveal-up", |state, options, _| {
        let distance = option_f64(options, "distance", 40.0);
        let offset = if state.prefers_reduced_motion {
            0.0
        } else {
            let t = (state.section_visibility * 1.5).min(1.0);
            (1.0 - EasingType::Cubic.apply(t)) * distance
        };
        StyleVars::new().with("--reveal-y", offset)
    })
    .with_requires([StateKey::SectionVisibility, StateKey::PrefersReducedMotion])
    .with_prerequisites(["fade-in"])
    .with_template("transform: translateY(calc(var(--reveal-y, 0) * 1px));")
}

/// Grows from `from` (default 0.9) to 1 as it becomes visible
pub fn scale_in() -> Behaviour {
    Behaviour::new("scale-in", |state, options, _| {
        let from = option_f64(options, "from", 0.9);
        let scale = if state.prefers_reduced_motion {
            1.0
        } else {
            let t = (state.section_visibility * 1.5).min(1.0);
            from + (1.0 - from) * EasingType::Cubic.apply(t)
        };
        StyleVars::new().with("--scale", scale)
    })
    .with_requires([StateKey::SectionVisibility, StateKey::PrefersReducedMotion])
    .with_template("transform: scale(var(--scale, 1));")
}

/// Offsets the target against its travel through the viewport.
/// `speed` defaults to 0.3, `range` (px) to 100.
pub fn parallax() -> Behaviour {
    Behaviour::new("parallax", |state, options, _| {
        let offset = if state.prefers_reduced_motion {
            0.0
        } else {
            let speed = option_f64(options, "speed", 0.3);
            let range = option_f64(options, "range", 100.0);
            (state.section_progress - 0.5) * speed * range
        };
        StyleVars::new().with("--parallax-y", offset)
    })
    .with_requires([StateKey::SectionProgress, StateKey::PrefersReducedMotion])
    .with_template("transform: translateY(calc(var(--parallax-y, 0) * 1px));")
}

/// Exposes page scroll progress
pub fn scroll_progress() -> Behaviour {
    Behaviour::new("scroll-progress", |state, _, _| {
        StyleVars::new().with("--scroll-progress", state.scroll_progress)
    })
    .with_requires([StateKey::ScrollProgress])
}

/// Skews with scroll velocity; `factor` (deg per unit/ms) defaults to 4,
/// `max` (deg) to 8
pub fn velocity_skew() -> Behaviour {
    Behaviour::new("velocity-skew", |state, options, _| {
        let skew = if state.prefers_reduced_motion {
            0.0
        } else {
            let max = option_f64(options, "max", 8.0).abs();
            (state.scroll_velocity * option_f64(options, "factor", 4.0)).clamp(-max, max)
        };
        StyleVars::new().with("--skew", skew)
    })
    .with_requires([StateKey::ScrollVelocity, StateKey::PrefersReducedMotion])
    .with_template("transform: skewY(calc(var(--skew, 0) * 1deg));")
}

/// Raises the target while hovered; `distance` (px) defaults to 6
pub fn hover_lift() -> Behaviour {
    Behaviour::new("hover-lift", |state, options, _| {
        let lift = if state.is_hovered && !state.prefers_reduced_motion {
            -option_f64(options, "distance", 6.0)
        } else {
            0.0
        };
        StyleVars::new()
            .with("--lift", lift)
            .with("--shadow-opacity", if state.is_hovered { 0.35 } else { 0.0 })
    })
    .with_requires([StateKey::IsHovered, StateKey::PrefersReducedMotion])
}

/// Shrinks slightly while pressed; `scale` defaults to 0.97
pub fn press_scale() -> Behaviour {
    Behaviour::new("press-scale", |state, options, _| {
        let scale = if state.is_pressed {
            option_f64(options, "scale", 0.97)
        } else {
            1.0
        };
        StyleVars::new().with("--press-scale", scale)
    })
    .with_requires([StateKey::IsPressed])
}

/// Marks the active section
pub fn active_highlight() -> Behaviour {
    Behaviour::new("active-highlight", |state, _, _| {
        StyleVars::new()
            .with("--active", if state.is_active { 1.0 } else { 0.0 })
            .with("--section-index", state.section_index as f64)
    })
    .with_requires([StateKey::IsActive, StateKey::SectionIndex])
}

/// Playback progress from the `videoTime` / `videoDuration` extension fields
pub fn video_progress() -> Behaviour {
    Behaviour::new("video-progress", |state, _, _| {
        let time = state.extension("videoTime").unwrap_or(0.0);
        let duration = state.extension("videoDuration").unwrap_or(0.0);
        let progress = if duration > 0.0 {
            (time / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        StyleVars::new().with("--video-progress", progress)
    })
    .with_requires([
        StateKey::Extension("videoTime".to_string()),
        StateKey::Extension("videoDuration".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviour::{BehaviourResolver, BehaviourState};
    use serde_json::{json, Value};

    fn number(vars: &StyleVars, name: &str) -> f64 {
        vars.get(name).and_then(|v| v.as_number()).unwrap()
    }

    #[test]
    fn test_registers_all_categories() {
        let mut registry = BehaviourRegistry::new();
        register_builtins(&mut registry);
        assert_eq!(registry.len(), 10);
        for category in [
            BehaviourCategory::Entrance,
            BehaviourCategory::Scroll,
            BehaviourCategory::Interaction,
            BehaviourCategory::Media,
        ] {
            assert!(!registry.in_category(category).is_empty(), "{category}");
        }
    }

    #[test]
    fn test_fade_in_curve() {
        let fade = fade_in();
        let mut state = BehaviourState::default();
        for (visibility, expected) in [(0.0, 0.0), (0.5, 0.75), (1.0, 1.0)] {
            state.section_visibility = visibility;
            assert_eq!(number(&fade.compute(&state, &Value::Null, None), "--opacity"), expected);
        }
        assert!(fade.prerasterize());
    }

    #[test]
    fn test_reduced_motion_rests() {
        let state = BehaviourState {
            prefers_reduced_motion: true,
            section_progress: 1.0,
            ..Default::default()
        };
        assert_eq!(number(&fade_in().compute(&state, &Value::Null, None), "--opacity"), 1.0);
        assert_eq!(number(&parallax().compute(&state, &Value::Null, None), "--parallax-y"), 0.0);
        assert_eq!(number(&reveal_up().compute(&state, &Value::Null, None), "--reveal-y"), 0.0);
    }

    #[test]
    fn test_parallax_options() {
        let state = BehaviourState {
            section_progress: 1.0,
            ..Default::default()
        };
        let vars = parallax().compute(&state, &json!({ "speed": 1.0, "range": 10.0 }), None);
        assert_eq!(number(&vars, "--parallax-y"), 5.0);
    }

    #[test]
    fn test_velocity_skew_clamps() {
        let state = BehaviourState {
            scroll_velocity: -10.0,
            ..Default::default()
        };
        assert_eq!(number(&velocity_skew().compute(&state, &Value::Null, None), "--skew"), -8.0);
    }

    #[test]
    fn test_video_progress_guards_zero_duration() {
        let mut state = BehaviourState::default();
        state.extensions.insert("videoTime".to_string(), 5.0);
        assert_eq!(number(&video_progress().compute(&state, &Value::Null, None), "--video-progress"), 0.0);
        state.extensions.insert("videoDuration".to_string(), 20.0);
        assert_eq!(number(&video_progress().compute(&state, &Value::Null, None), "--video-progress"), 0.25);
    }

    #[test]
    fn test_reveal_up_pulls_in_fade() {
        let mut registry = BehaviourRegistry::new();
        register_builtins(&mut registry);
        let resolver = BehaviourResolver::new(&registry);
        let ids: Vec<String> = resolver
            .resolve_with_dependencies(&["reveal-up"])
            .iter()
            .map(|b| b.id().to_string())
            .collect();
        assert_eq!(ids, vec!["fade-in", "reveal-up"]);
    }
}
