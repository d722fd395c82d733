//! Login, logout, and status command handlers

use std::io::{self, Write};

use anyhow::{bail, Context, Result};

use tenga_core::{ApiClient, Config};

use crate::output::Output;

/// Log in: store the API key and confirm it against the backend
pub async fn login(client: &ApiClient, key: Option<String>, output: &Output) -> Result<()> {
    let key = match key {
        Some(k) => k,
        None => prompt_for_key()?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        bail!("API key cannot be empty");
    }

    let session = client.session();
    session
        .set_api_key(&key)
        .context("Failed to store API key")?;

    match client.validate_api_key().await {
        Ok(true) => {
            output.success("Logged in. API key stored.");
            Ok(())
        }
        Ok(false) => {
            // The 401 already cleared the stored key
            bail!("The backend rejected this API key.");
        }
        Err(e) => {
            let _ = session.clear_api_key();
            Err(anyhow::Error::new(e).context("Could not reach the backend to validate the key"))
        }
    }
}

/// Log out: discard the stored API key
pub fn logout(client: &ApiClient, output: &Output) -> Result<()> {
    let session = client.session();

    if !session.has_api_key() {
        output.message("Not logged in.");
        return Ok(());
    }

    session.clear_api_key().context("Failed to remove API key")?;
    output.success("Logged out. Stored API key removed.");
    Ok(())
}

/// Show backend and session status
pub async fn status(client: &ApiClient, config: &Config, output: &Output) -> Result<()> {
    let session = client.session();
    let has_key = session.has_api_key();

    // Presence is checked locally; validity needs a round trip
    let key_status = if has_key {
        match client.validate_api_key().await {
            Ok(true) => "valid",
            Ok(false) => "rejected by backend",
            Err(_) => "present (backend unreachable)",
        }
    } else {
        "absent"
    };

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "api_url": config.api_url,
                "api_key": key_status,
                "key_path": session.key_path(),
            })
        );
    } else if output.is_quiet() {
        println!("{}", key_status);
    } else {
        println!("Backend:  {}", config.api_url);
        println!("API key:  {}", key_status);
        if has_key {
            println!("Stored:   {}", session.key_path().display());
        } else {
            println!();
            println!("Log in with: tenga login");
        }
    }

    Ok(())
}

/// Prompt for an API key on stdin
fn prompt_for_key() -> Result<String> {
    print!("API key: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
