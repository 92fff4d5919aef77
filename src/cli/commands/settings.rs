//! Configuration display command.

use std::path::Path;

use crate::config::{self, Config};

/// Print where the config lives and what is in effect.
///
/// With `init`, a missing config file is first written from the effective
/// settings so it can be edited by hand.
pub fn cmd_config(config: &Config, override_path: Option<&Path>, init: bool) -> anyhow::Result<()> {
    let path = override_path.map(Path::to_path_buf).or_else(config::config_path);

    if init {
        match path {
            Some(ref path) if path.exists() => {
                println!("Config file already exists, leaving it untouched.");
            }
            Some(ref path) if override_path.is_some() => config::save_to(config, path)?,
            _ => config::save(config)?,
        }
    }

    match path {
        Some(ref path) if path.exists() => println!("Config file: {}", path.display()),
        Some(ref path) => println!("Config file: {} (not created yet, showing defaults)", path.display()),
        None => println!("Config file: unavailable (no config directory on this system)"),
    }
    println!();

    // Never echo the key itself
    let mut shown = config.clone();
    if shown.credentials.gemini_api_key.is_some() {
        shown.credentials.gemini_api_key = Some("<set>".to_string());
    }
    print!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}
