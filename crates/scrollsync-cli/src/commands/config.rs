use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use scrollsync_core::EngineConfig;

pub fn path(custom: Option<&Path>) -> Result<()> {
    let path = target_path(custom);
    let state = if path.exists() { "" } else { " (not created yet)" };
    println!("{}{}", path.display(), state);
    Ok(())
}

pub fn show(config: &EngineConfig) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

pub fn init(custom: Option<&Path>, force: bool) -> Result<()> {
    let path = target_path(custom);
    if path.exists() && !force {
        bail!(
            "Config file already exists at {}\nUse --force to overwrite it.",
            path.display()
        );
    }

    let config = EngineConfig::default();
    match custom {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(path, config.to_toml_string()?)?;
        }
        None => config.save()?,
    }

    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn target_path(custom: Option<&Path>) -> PathBuf {
    custom
        .map(Path::to_path_buf)
        .unwrap_or_else(EngineConfig::config_path)
}
