use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::definition::Behaviour;

/// Grouping used by listings and authoring surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviourCategory {
    /// Plays once as the target enters view
    Entrance,
    /// Tracks scroll position continuously
    Scroll,
    /// Reacts to pointer state
    Interaction,
    /// Follows media playback
    Media,
    #[default]
    Custom,
}

impl BehaviourCategory {
    pub const ALL: [BehaviourCategory; 5] = [
        BehaviourCategory::Entrance,
        BehaviourCategory::Scroll,
        BehaviourCategory::Interaction,
        BehaviourCategory::Media,
        BehaviourCategory::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviourCategory::Entrance => "entrance",
            BehaviourCategory::Scroll => "scroll",
            BehaviourCategory::Interaction => "interaction",
            BehaviourCategory::Media => "media",
            BehaviourCategory::Custom => "custom",
        }
    }
}

impl fmt::Display for BehaviourCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    behaviour: Arc<Behaviour>,
    category: BehaviourCategory,
}

/// Id-keyed store of behaviours
///
/// Constructed explicitly and passed by reference; tests build their own.
#[derive(Debug, Default, Clone)]
pub struct BehaviourRegistry {
    entries: HashMap<String, Entry>,
}

impl BehaviourRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the `Custom` category
    pub fn register(&mut self, behaviour: Behaviour) -> Arc<Behaviour> {
        self.register_in(BehaviourCategory::Custom, behaviour)
    }

    /// Register with category metadata. A duplicate id replaces the existing
    /// entry and logs a warning.
    pub fn register_in(&mut self, category: BehaviourCategory, behaviour: Behaviour) -> Arc<Behaviour> {
        self.insert(category, Arc::new(behaviour))
    }

    /// Register an already shared behaviour
    pub fn insert(&mut self, category: BehaviourCategory, behaviour: Arc<Behaviour>) -> Arc<Behaviour> {
        let id = behaviour.id().to_string();
        let entry = Entry {
            behaviour: behaviour.clone(),
            category,
        };
        if self.entries.insert(id.clone(), entry).is_some() {
            warn!(behaviour = %id, "Behaviour registered twice, replacing previous definition");
        } else {
            debug!(behaviour = %id, category = %category, "Registered behaviour");
        }
        behaviour
    }

    pub fn unregister(&mut self, id: &str) -> Option<Arc<Behaviour>> {
        self.entries.remove(id).map(|entry| entry.behaviour)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Behaviour>> {
        self.entries.get(id).map(|entry| entry.behaviour.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn category_of(&self, id: &str) -> Option<BehaviourCategory> {
        self.entries.get(id).map(|entry| entry.category)
    }

    /// All ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Behaviours in one category, sorted by id
    pub fn in_category(&self, category: BehaviourCategory) -> Vec<Arc<Behaviour>> {
        let mut found: Vec<Arc<Behaviour>> = self
            .entries
            .values()
            .filter(|entry| entry.category == category)
            .map(|entry| entry.behaviour.clone())
            .collect();
        found.sort_by(|a, b| a.id().cmp(b.id()));
        found
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
