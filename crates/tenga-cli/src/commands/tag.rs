//! Tag command handlers

use anyhow::{Context, Result};

use tenga_core::ApiClient;

use crate::editor::confirm;
use crate::output::Output;

/// List all tags, flat
pub async fn list(client: &ApiClient, output: &Output) -> Result<()> {
    let tags = client.list_tags().await.context("Failed to load tags")?;
    output.print_tags(&tags);
    Ok(())
}

/// Show the tag hierarchy as a tree
pub async fn tree(client: &ApiClient, output: &Output) -> Result<()> {
    let tags = client
        .tag_hierarchy()
        .await
        .context("Failed to load tag hierarchy")?;
    output.print_tag_tree(&tags);
    Ok(())
}

/// Create a tag, optionally nested under a parent
pub async fn create(
    client: &ApiClient,
    name: String,
    parent: Option<i64>,
    output: &Output,
) -> Result<()> {
    let tag = client
        .create_tag(&name, parent)
        .await
        .context("Failed to create tag")?;

    output.success(&format!("Created tag {}: {}", tag.id, tag.name));
    Ok(())
}

/// Rename a tag
pub async fn rename(client: &ApiClient, id: i64, name: String, output: &Output) -> Result<()> {
    let tag = client
        .rename_tag(id, &name)
        .await
        .context("Failed to rename tag")?;

    output.success(&format!("Renamed tag {} to {}", tag.id, tag.name));
    Ok(())
}

/// Delete a tag
///
/// Version snapshots keep their tag history; only the live association
/// is removed.
pub async fn delete(client: &ApiClient, id: i64, output: &Output) -> Result<()> {
    let tag = client
        .get_tag(id)
        .await
        .with_context(|| format!("Failed to load tag {}", id))?;

    if output.should_prompt() {
        println!("Delete tag {}: {}", tag.id, tag.name);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    client.delete_tag(id).await.context("Failed to delete tag")?;
    output.success(&format!("Deleted tag: {}", tag.name));
    Ok(())
}

/// Search tags by name fragment
pub async fn search(client: &ApiClient, query: String, output: &Output) -> Result<()> {
    let tags = client
        .search_tags(&query)
        .await
        .context("Tag search failed")?;
    output.print_tags(&tags);
    Ok(())
}

/// Associate a tag with a document
pub async fn apply(
    client: &ApiClient,
    tag_id: i64,
    document_id: i64,
    output: &Output,
) -> Result<()> {
    client
        .tag_document(tag_id, document_id)
        .await
        .context("Failed to tag document")?;

    output.success(&format!("Tagged document {} with tag {}", document_id, tag_id));
    Ok(())
}

/// Remove a tag from a document
pub async fn remove(
    client: &ApiClient,
    tag_id: i64,
    document_id: i64,
    output: &Output,
) -> Result<()> {
    client
        .untag_document(tag_id, document_id)
        .await
        .context("Failed to untag document")?;

    output.success(&format!(
        "Removed tag {} from document {}",
        tag_id, document_id
    ));
    Ok(())
}
