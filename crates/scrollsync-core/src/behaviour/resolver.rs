use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::definition::{Behaviour, NONE_ID};
use super::registry::BehaviourRegistry;
use crate::{Error, Result};

/// Resolves behaviour ids against a registry
///
/// "No behaviour" is a normal outcome: empty ids, the `"none"` sentinel and
/// unknown ids all resolve to nothing rather than failing.
pub struct BehaviourResolver<'a> {
    registry: &'a BehaviourRegistry,
}

impl<'a> BehaviourResolver<'a> {
    pub fn new(registry: &'a BehaviourRegistry) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, id: Option<&str>) -> Option<Arc<Behaviour>> {
        match id {
            None | Some("") | Some(NONE_ID) => None,
            Some(id) => {
                let found = self.registry.get(id);
                if found.is_none() {
                    debug!(behaviour = %id, "Unknown behaviour id, resolving to none");
                }
                found
            }
        }
    }

    /// Like `resolve`, but hands back the shared no-op behaviour instead of `None`
    pub fn resolve_or_noop(&self, id: Option<&str>) -> Arc<Behaviour> {
        self.resolve(id).unwrap_or_else(Behaviour::none)
    }

    /// Strict lookup for callers where a missing id is a user error
    pub fn require(&self, id: &str) -> Result<Arc<Behaviour>> {
        self.resolve(Some(id))
            .ok_or_else(|| Error::UnknownBehaviour(id.to_string()))
    }

    /// Expand `ids` into dependency-first order
    ///
    /// Each id's prerequisites are visited (recursively) before the id itself.
    /// Every id appears at most once, however often it is requested or
    /// depended upon; cycles terminate because ids are marked before recursing.
    pub fn resolve_with_dependencies<S: AsRef<str>>(&self, ids: &[S]) -> Vec<Arc<Behaviour>> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for id in ids {
            self.visit(id.as_ref(), &mut seen, &mut ordered);
        }
        ordered
    }

    fn visit(&self, id: &str, seen: &mut HashSet<String>, ordered: &mut Vec<Arc<Behaviour>>) {
        if !seen.insert(id.to_string()) {
            return;
        }
        let Some(behaviour) = self.resolve(Some(id)) else {
            return;
        };
        for prerequisite in behaviour.prerequisites() {
            self.visit(prerequisite, seen, ordered);
        }
        ordered.push(behaviour);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviour::StyleVars;

    fn behaviour(id: &str, prerequisites: &[&str]) -> Behaviour {
        Behaviour::new(id, |_, _, _| StyleVars::new())
            .with_prerequisites(prerequisites.iter().copied())
    }

    fn order(behaviours: &[Arc<Behaviour>]) -> Vec<&str> {
        behaviours.iter().map(|b| b.id()).collect()
    }

    #[test]
    fn test_resolve_none_cases() {
        let mut registry = BehaviourRegistry::new();
        registry.register(behaviour("fade", &[]));
        let resolver = BehaviourResolver::new(&registry);

        assert!(resolver.resolve(None).is_none());
        assert!(resolver.resolve(Some("none")).is_none());
        assert!(resolver.resolve(Some("")).is_none());
        assert!(resolver.resolve(Some("missing")).is_none());
        assert!(resolver.resolve(Some("fade")).is_some());
        assert!(resolver.resolve_or_noop(Some("missing")).is_noop());
    }

    #[test]
    fn test_require_reports_unknown() {
        let registry = BehaviourRegistry::new();
        let resolver = BehaviourResolver::new(&registry);
        match resolver.require("ghost") {
            Err(Error::UnknownBehaviour(id)) => assert_eq!(id, "ghost"),
            other => panic!("expected UnknownBehaviour, got {:?}", other),
        }
    }

    #[test]
    fn test_dependency_first_order() {
        let mut registry = BehaviourRegistry::new();
        registry.register(behaviour("base", &[]));
        registry.register(behaviour("visibility", &["base"]));
        registry.register(behaviour("fade", &["visibility"]));
        registry.register(behaviour("lift", &["base"]));
        let resolver = BehaviourResolver::new(&registry);

        let resolved = resolver.resolve_with_dependencies(&["fade", "lift", "fade"]);
        assert_eq!(order(&resolved), vec!["base", "visibility", "fade", "lift"]);
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let mut registry = BehaviourRegistry::new();
        registry.register(behaviour("fade", &["missing"]));
        let resolver = BehaviourResolver::new(&registry);

        let resolved = resolver.resolve_with_dependencies(&["none", "fade", "ghost"]);
        assert_eq!(order(&resolved), vec!["fade"]);
    }

    #[test]
    fn test_cycles_terminate() {
        let mut registry = BehaviourRegistry::new();
        registry.register(behaviour("a", &["b"]));
        registry.register(behaviour("b", &["a"]));
        let resolver = BehaviourResolver::new(&registry);

        let resolved = resolver.resolve_with_dependencies(&["a"]);
        assert_eq!(order(&resolved), vec!["b", "a"]);
    }
}
