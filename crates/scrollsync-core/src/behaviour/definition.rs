use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::Value;

use super::state::{BehaviourState, StateKey};
use super::vars::StyleVars;
use crate::driver::Element;

/// Id of the no-op behaviour; resolving it yields "no behaviour"
pub const NONE_ID: &str = "none";

/// Signature of a behaviour's compute function
pub type ComputeFn =
    dyn Fn(&BehaviourState, &Value, Option<&dyn Element>) -> StyleVars + Send + Sync;

/// A pure mapping from runtime state and options to named style variables
///
/// Behaviours are immutable once built and shared as `Arc<Behaviour>`.
pub struct Behaviour {
    id: String,
    requires: Vec<StateKey>,
    prerequisites: Vec<String>,
    template: Option<String>,
    prerasterize: bool,
    compute: Box<ComputeFn>,
}

impl Behaviour {
    pub fn new<F>(id: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&BehaviourState, &Value, Option<&dyn Element>) -> StyleVars + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            requires: Vec::new(),
            prerequisites: Vec::new(),
            template: None,
            prerasterize: false,
            compute: Box::new(compute),
        }
    }

    /// State keys the compute function reads, in declaration order
    pub fn with_requires(mut self, keys: impl IntoIterator<Item = StateKey>) -> Self {
        self.requires = keys.into_iter().collect();
        self
    }

    /// Behaviours that must be resolved (and applied) before this one
    pub fn with_prerequisites<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.prerequisites = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Static style template rendered alongside the variables
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Keep opacity-like outputs above zero so content is painted before
    /// its first transition to visible
    pub fn with_prerasterize(mut self, prerasterize: bool) -> Self {
        self.prerasterize = prerasterize;
        self
    }

    /// The shared no-op behaviour
    pub fn none() -> Arc<Behaviour> {
        static NONE: OnceLock<Arc<Behaviour>> = OnceLock::new();
        NONE.get_or_init(|| Arc::new(Behaviour::new(NONE_ID, |_, _, _| StyleVars::new())))
            .clone()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn requires(&self) -> &[StateKey] {
        &self.requires
    }

    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn prerasterize(&self) -> bool {
        self.prerasterize
    }

    pub fn is_noop(&self) -> bool {
        self.id == NONE_ID
    }

    #[inline]
    pub fn compute(
        &self,
        state: &BehaviourState,
        options: &Value,
        element: Option<&dyn Element>,
    ) -> StyleVars {
        (self.compute)(state, options, element)
    }
}

impl fmt::Debug for Behaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behaviour")
            .field("id", &self.id)
            .field("requires", &self.requires)
            .field("prerequisites", &self.prerequisites)
            .field("template", &self.template)
            .field("prerasterize", &self.prerasterize)
            .finish_non_exhaustive()
    }
}

/// Read a numeric option, falling back to `default` when absent or not a number
pub fn option_f64(options: &Value, key: &str, default: f64) -> f64 {
    options.get(key).and_then(Value::as_f64).unwrap_or(default)
}

/// Read a string option
pub fn option_str<'a>(options: &'a Value, key: &str) -> Option<&'a str> {
    options.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_sets_metadata() {
        let behaviour = Behaviour::new("fade", |state, _, _| {
            StyleVars::new().with("--opacity", state.section_visibility)
        })
        .with_requires([StateKey::SectionVisibility])
        .with_prerequisites(["base"])
        .with_template(".x { opacity: var(--opacity); }")
        .with_prerasterize(true);

        assert_eq!(behaviour.id(), "fade");
        assert_eq!(behaviour.requires(), &[StateKey::SectionVisibility]);
        assert_eq!(behaviour.prerequisites(), &["base".to_string()]);
        assert!(behaviour.template().is_some());
        assert!(behaviour.prerasterize());
        assert!(!behaviour.is_noop());
    }

    #[test]
    fn test_none_is_shared_and_empty() {
        let a = Behaviour::none();
        let b = Behaviour::none();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_noop());
        assert!(a.compute(&BehaviourState::default(), &Value::Null, None).is_empty());
    }

    #[test]
    fn test_option_helpers() {
        let options = json!({ "speed": 0.5, "axis": "x", "bad": "fast" });
        assert_eq!(option_f64(&options, "speed", 1.0), 0.5);
        assert_eq!(option_f64(&options, "bad", 1.0), 1.0);
        assert_eq!(option_f64(&Value::Null, "speed", 1.0), 1.0);
        assert_eq!(option_str(&options, "axis"), Some("x"));
    }
}
