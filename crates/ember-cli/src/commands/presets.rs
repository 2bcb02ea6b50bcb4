//! Built-in preset listing and export

use anyhow::{Context, Result};
use ember_particles::presets;
use std::path::Path;

pub fn run(show: Option<&str>, write: Option<&Path>) -> Result<()> {
    let Some(name) = show else {
        for (name, description) in presets::describe() {
            println!("  {:<10} {}", name, description);
        }
        return Ok(());
    };

    let toml = presets::by_name(name)?.to_toml_string()?;
    match write {
        Some(path) => {
            if path.exists() {
                anyhow::bail!("File '{}' already exists", path.display());
            }
            std::fs::write(path, toml)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote preset '{}' to {}", name, path.display());
        }
        None => print!("{}", toml),
    }
    Ok(())
}
