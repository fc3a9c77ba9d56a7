use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime state a behaviour reads from
///
/// Drivers keep one instance as a per-frame scratch buffer and overwrite the
/// per-target fields before each `compute` call. Values are only meaningful
/// for the duration of that call; never hold on to them across frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviourState {
    /// Scroll position of the context, 0 to 1
    pub scroll_progress: f64,
    /// Signed scroll velocity in units per millisecond
    pub scroll_velocity: f64,
    /// Progress of the target through the viewport, 0 to 1
    pub section_progress: f64,
    /// Intersection ratio of the target, 0 to 1
    pub section_visibility: f64,
    pub section_index: usize,
    pub total_sections: usize,
    pub is_active: bool,
    pub is_hovered: bool,
    pub is_pressed: bool,
    pub prefers_reduced_motion: bool,
    /// Mode-specific fields (intro phase, video time, ...)
    pub extensions: HashMap<String, f64>,
}

impl BehaviourState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a field as a number; booleans read as 0 or 1, missing extensions as 0
    pub fn get(&self, key: &StateKey) -> f64 {
        match key {
            StateKey::ScrollProgress => self.scroll_progress,
            StateKey::ScrollVelocity => self.scroll_velocity,
            StateKey::SectionProgress => self.section_progress,
            StateKey::SectionVisibility => self.section_visibility,
            StateKey::SectionIndex => self.section_index as f64,
            StateKey::TotalSections => self.total_sections as f64,
            StateKey::IsActive => flag(self.is_active),
            StateKey::IsHovered => flag(self.is_hovered),
            StateKey::IsPressed => flag(self.is_pressed),
            StateKey::PrefersReducedMotion => flag(self.prefers_reduced_motion),
            StateKey::Extension(name) => self.extension(name).unwrap_or(0.0),
        }
    }

    pub fn extension(&self, name: &str) -> Option<f64> {
        self.extensions.get(name).copied()
    }

    /// Reset the per-target fields before overlaying the next target
    pub(crate) fn clear_target_fields(&mut self) {
        self.section_progress = 0.0;
        self.section_visibility = 0.0;
        self.section_index = 0;
        self.is_active = false;
        self.is_hovered = false;
        self.is_pressed = false;
    }
}

#[inline]
fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Name of a `BehaviourState` field a behaviour declares it reads
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateKey {
    ScrollProgress,
    ScrollVelocity,
    SectionProgress,
    SectionVisibility,
    SectionIndex,
    TotalSections,
    IsActive,
    IsHovered,
    IsPressed,
    PrefersReducedMotion,
    #[serde(untagged)]
    Extension(String),
}

impl StateKey {
    /// Parse a camelCase field name; anything unrecognised is an extension key
    pub fn parse(name: &str) -> Self {
        match name {
            "scrollProgress" => StateKey::ScrollProgress,
            "scrollVelocity" => StateKey::ScrollVelocity,
            "sectionProgress" => StateKey::SectionProgress,
            "sectionVisibility" => StateKey::SectionVisibility,
            "sectionIndex" => StateKey::SectionIndex,
            "totalSections" => StateKey::TotalSections,
            "isActive" => StateKey::IsActive,
            "isHovered" => StateKey::IsHovered,
            "isPressed" => StateKey::IsPressed,
            "prefersReducedMotion" => StateKey::PrefersReducedMotion,
            other => StateKey::Extension(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StateKey::ScrollProgress => "scrollProgress",
            StateKey::ScrollVelocity => "scrollVelocity",
            StateKey::SectionProgress => "sectionProgress",
            StateKey::SectionVisibility => "sectionVisibility",
            StateKey::SectionIndex => "sectionIndex",
            StateKey::TotalSections => "totalSections",
            StateKey::IsActive => "isActive",
            StateKey::IsHovered => "isHovered",
            StateKey::IsPressed => "isPressed",
            StateKey::PrefersReducedMotion => "prefersReducedMotion",
            StateKey::Extension(name) => name,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_reads_flags_and_extensions() {
        let mut state = BehaviourState::new();
        state.is_hovered = true;
        state.extensions.insert("videoTime".to_string(), 12.5);

        assert_eq!(state.get(&StateKey::IsHovered), 1.0);
        assert_eq!(state.get(&StateKey::IsPressed), 0.0);
        assert_eq!(state.get(&StateKey::parse("videoTime")), 12.5);
        assert_eq!(state.get(&StateKey::parse("introPhase")), 0.0);
    }

    #[test]
    fn test_parse_and_display_agree() {
        for name in ["scrollProgress", "sectionVisibility", "isPressed", "videoTime"] {
            assert_eq!(StateKey::parse(name).to_string(), name);
        }
    }

    #[test]
    fn test_state_key_deserializes_from_names() {
        let keys: Vec<StateKey> =
            serde_json::from_str(r#"["sectionVisibility", "introPhase"]"#).unwrap();
        assert_eq!(
            keys,
            vec![
                StateKey::SectionVisibility,
                StateKey::Extension("introPhase".to_string())
            ]
        );
    }

    #[test]
    fn test_clear_target_fields_keeps_shared_fields() {
        let mut state = BehaviourState {
            scroll_progress: 0.4,
            section_visibility: 0.9,
            is_hovered: true,
            ..Default::default()
        };
        state.clear_target_fields();
        assert_eq!(state.scroll_progress, 0.4);
        assert_eq!(state.section_visibility, 0.0);
        assert!(!state.is_hovered);
    }
}
