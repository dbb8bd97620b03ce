use crate::config::{CONFIG_FILE, Config, save_to_path};
use anyhow::{Context, Result};
use std::path::Path;

pub fn list(config: &Config) -> Result<()> {
    let toml_str = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

pub fn get(key: &str, config: &Config) -> Result<()> {
    let value = lookup(key, config)?;

    match value {
        serde_json::Value::String(s) => println!("{}", s),
        v => println!("{}", v),
    }

    Ok(())
}

/// Resolves a dotted key such as `display.tick_interval_ms`.
pub fn lookup(key: &str, config: &Config) -> Result<serde_json::Value> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;

    let mut current = &value;
    for part in key.split('.') {
        current = current
            .get(part)
            .with_context(|| format!("Key not found: {}", part))?;
    }

    Ok(current.clone())
}

/// Writes a default `config.toml` into `dir` unless one already exists.
pub fn init(dir: &Path) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    save_to_path(&Config::default(), &path)?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(())
}
