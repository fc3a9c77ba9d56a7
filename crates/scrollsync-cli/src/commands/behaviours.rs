use anyhow::Result;

use scrollsync_core::behaviour::BehaviourCategory;
use scrollsync_core::BehaviourRegistry;

pub fn run(registry: &BehaviourRegistry, templates: bool) -> Result<()> {
    if registry.is_empty() {
        println!("No behaviours registered.");
        return Ok(());
    }

    println!("Behaviours ({}):\n", registry.len());

    for category in BehaviourCategory::ALL {
        let behaviours = registry.in_category(category);
        if behaviours.is_empty() {
            continue;
        }
        println!("  {}", category);
        for behaviour in &behaviours {
            let requires = behaviour
                .requires()
                .iter()
                .map(|key| key.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let mut flags = String::new();
            if behaviour.prerasterize() {
                flags.push_str(" [prerasterize]");
            }
            if !behaviour.prerequisites().is_empty() {
                flags.push_str(&format!(" [after: {}]", behaviour.prerequisites().join(", ")));
            }

            println!("    {:<18} reads: {}{}", behaviour.id(), requires, flags);
            if templates {
                if let Some(template) = behaviour.template() {
                    println!("      {}", template);
                }
            }
        }
        println!();
    }

    Ok(())
}
