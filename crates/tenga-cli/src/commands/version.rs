//! Version history command handlers
//!
//! Versions are immutable snapshots; the only mutation is restoring a
//! document to one of them, which creates a new head version
//! server-side.

use anyhow::{Context, Result};

use tenga_core::ApiClient;

use crate::editor::confirm;
use crate::output::Output;

/// List the version history of a document
pub async fn list(client: &ApiClient, document_id: i64, output: &Output) -> Result<()> {
    let versions = client
        .version_history(document_id)
        .await
        .with_context(|| format!("Failed to load versions of document {}", document_id))?;

    output.print_versions(&versions);
    Ok(())
}

/// Show a single version snapshot
pub async fn show(
    client: &ApiClient,
    document_id: i64,
    number: i32,
    output: &Output,
) -> Result<()> {
    let version = client
        .get_version(document_id, number)
        .await
        .with_context(|| format!("Failed to load version {} of document {}", number, document_id))?;

    output.print_version(&version);
    Ok(())
}

/// Restore a document to an earlier version
pub async fn restore(
    client: &ApiClient,
    document_id: i64,
    number: i32,
    output: &Output,
) -> Result<()> {
    if output.should_prompt() {
        println!("Restore document {} to version {}?", document_id, number);
        println!("The current state is kept as a version and can be restored later.");
        if !confirm("Continue?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let version = client
        .restore_version(document_id, number)
        .await
        .context("Failed to restore version")?;

    output.success(&format!(
        "Restored document {} to version {}",
        document_id, number
    ));
    output.print_version(&version);
    Ok(())
}

/// Compare two versions of a document
pub async fn compare(
    client: &ApiClient,
    document_id: i64,
    v1: i32,
    v2: i32,
    output: &Output,
) -> Result<()> {
    let diff = client
        .compare_versions(document_id, v1, v2)
        .await
        .context("Failed to compare versions")?;

    // The backend returns a preformatted plain-text diff
    if output.is_json() {
        println!("{}", serde_json::json!({ "diff": diff }));
    } else {
        println!("{}", diff);
    }
    Ok(())
}
