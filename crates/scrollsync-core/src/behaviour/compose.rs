use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::warn;

use super::definition::Behaviour;
use super::state::StateKey;
use super::vars::StyleVars;

/// Fold several behaviours into one target-level behaviour
///
/// Parts are computed in order and merged; when two parts emit the same
/// variable name the later part wins. Each colliding name is reported once
/// per composite.
pub fn compose(id: impl Into<String>, parts: Vec<Arc<Behaviour>>) -> Behaviour {
    let id = id.into();

    let mut requires: Vec<StateKey> = Vec::new();
    for key in parts.iter().flat_map(|part| part.requires()) {
        if !requires.contains(key) {
            requires.push(key.clone());
        }
    }
    let prerasterize = parts.iter().any(|part| part.prerasterize());

    let reported: Mutex<HashSet<String>> = Mutex::new(HashSet::new());
    let composite_id = id.clone();

    Behaviour::new(id, move |state, options, element| {
        let mut merged = StyleVars::new();
        for part in &parts {
            let collisions = merged.merge(part.compute(state, options, element));
            if collisions.is_empty() {
                continue;
            }
            if let Ok(mut reported) = reported.lock() {
                for name in collisions {
                    if reported.insert(name.clone()) {
                        warn!(
                            composite = %composite_id,
                            behaviour = %part.id(),
                            variable = %name,
                            "Composed behaviours write the same variable, later one wins"
                        );
                    }
                }
            }
        }
        merged
    })
    .with_requires(requires)
    .with_prerasterize(prerasterize)
}
