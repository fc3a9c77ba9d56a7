use anyhow::Result;

use scrollsync_core::behaviour::NONE_ID;
use scrollsync_core::{BehaviourRegistry, BehaviourResolver};

pub fn run(registry: &BehaviourRegistry, ids: &[String], strict: bool) -> Result<()> {
    let resolver = BehaviourResolver::new(registry);

    if strict {
        for id in ids {
            resolver.require(id)?;
        }
    } else {
        let unknown = ids
            .iter()
            .filter(|id| id.as_str() != NONE_ID && resolver.resolve(Some(id.as_str())).is_none());
        for id in unknown {
            println!("skipping {:?}: not a registered behaviour", id);
        }
    }

    let order = resolver.resolve_with_dependencies(ids);
    if order.is_empty() {
        println!("Nothing to apply.");
        return Ok(());
    }

    println!("Resolution order:");
    for (position, behaviour) in order.iter().enumerate() {
        let origin = if ids.iter().any(|id| id == behaviour.id()) {
            ""
        } else {
            " (prerequisite)"
        };
        println!("  {}. {}{}", position + 1, behaviour.id(), origin);
    }

    Ok(())
}
