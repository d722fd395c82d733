//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use tenga_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "api_url": config.api_url,
                    "data_dir": config.data_dir,
                    "page_size": config.page_size,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.api_url);
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  api_url:   {}", config.api_url);
            println!("  data_dir:  {}", config.data_dir.display());
            println!("  page_size: {}", config.page_size);
            println!(
                "  log_file:  {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    match key.as_str() {
        "api_url" => {
            config.api_url = value.trim_end_matches('/').to_string();
        }
        "data_dir" => {
            config.data_dir = PathBuf::from(&value);
        }
        "page_size" => {
            let size: i64 = value
                .parse()
                .context("page_size must be a positive integer")?;
            if size <= 0 {
                bail!("page_size must be a positive integer");
            }
            config.page_size = size;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(PathBuf::from(&value))
            };
        }
        _ => bail!(
            "Unknown configuration key: {}. Valid keys: api_url, data_dir, page_size, log_file",
            key
        ),
    }

    config.save().context("Failed to save configuration")?;
    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}
