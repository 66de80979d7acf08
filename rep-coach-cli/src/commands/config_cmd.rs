use anyhow::Result;
use std::path::Path;

use crate::config::Config;

pub fn show_config(custom: Option<&Path>) -> Result<()> {
    let config = Config::load(custom)?;
    let config_str = toml::to_string_pretty(&config)?;

    println!("Current Configuration");
    println!("────────────────────────────────");
    println!();
    println!("{}", config_str);

    Ok(())
}

pub fn init_config(custom: Option<&Path>, force: bool) -> Result<()> {
    let config_file = Config::config_file(custom)?;

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let written = Config::default().save(custom)?;

    println!("✓ Configuration initialized at: {}", written.display());
    println!();
    println!("Add per-exercise overrides under [thresholds.<exercise>]");

    Ok(())
}
