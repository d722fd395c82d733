//! Document command handlers
//!
//! All document commands go through the [`AppStore`] so the local
//! collection, selection, and filter state stay consistent with what
//! the backend returns.

use anyhow::{bail, Context, Result};

use tenga_core::{AppStore, UpdateDocumentRequest};

use crate::editor::{confirm, edit_content, prompt_with_default};
use crate::output::Output;

/// List documents, with optional tag/text narrowing
pub async fn list(
    store: &mut AppStore,
    page: i64,
    size: i64,
    tags: Vec<String>,
    filter: Option<String>,
    output: &Output,
) -> Result<()> {
    // The first tag is filtered server-side; any further narrowing
    // happens client-side over the loaded page only.
    let page_data = match tags.split_first() {
        Some((first, rest)) => {
            let page_data = store
                .load_documents_by_tag(first, page, size)
                .await
                .context("Failed to load documents")?;
            for tag in rest {
                store.toggle_tag(tag);
            }
            page_data
        }
        None => store
            .load_documents(page, size)
            .await
            .context("Failed to load documents")?,
    };

    if let Some(text) = filter {
        store.set_search_text(text);
    }

    output.print_documents(&store.filtered_documents());
    output.page_footer(&page_data);
    Ok(())
}

/// Show a single document
pub async fn show(store: &mut AppStore, id: i64, output: &Output) -> Result<()> {
    let doc = store
        .load_document(id)
        .await
        .with_context(|| format!("Failed to load document {}", id))?;

    output.print_document(&doc);
    Ok(())
}

/// Create a new document
pub async fn create(
    store: &mut AppStore,
    title: String,
    tags: Vec<String>,
    content: Option<String>,
    output: &Output,
) -> Result<()> {
    let content = match content {
        Some(c) => c,
        None => {
            let initial = format!("<!-- Content for: {} -->\n\n", title);
            let edited = edit_content(&initial).context("Failed to edit document content")?;

            // Remove the comment lines
            edited
                .lines()
                .filter(|line| !line.starts_with("<!--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        }
    };

    if content.is_empty() {
        bail!("Document content cannot be empty");
    }

    let doc = store
        .create_document(&title, &content, tags)
        .await
        .context("Failed to create document")?;

    output.success(&format!("Created document {}", doc.id));
    output.print_document(&doc);
    Ok(())
}

/// Edit a document interactively
pub async fn edit(
    store: &mut AppStore,
    id: i64,
    summary: Option<String>,
    output: &Output,
) -> Result<()> {
    let doc = store
        .load_document(id)
        .await
        .with_context(|| format!("Failed to load document {}", id))?;

    println!("Editing document {}: {}", doc.id, doc.title);
    println!("Press Enter to keep the current value.\n");

    let mut request = UpdateDocumentRequest {
        change_summary: summary,
        ..Default::default()
    };

    if let Some(new_title) = prompt_with_default("Title", &doc.title)? {
        request.title = Some(new_title);
    }

    let current_tags = doc.tags.join(", ");
    if let Some(new_tags) = prompt_with_default("Tags (comma-separated)", &current_tags)? {
        let tags: Vec<String> = new_tags
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        request.tags = Some(tags);
    }

    let edited = edit_content(&doc.content).context("Failed to edit document content")?;
    let edited = edited.trim_end().to_string();
    if edited.is_empty() {
        bail!("Document content cannot be empty");
    }
    if edited != doc.content {
        request.content = Some(edited);
    }

    if request.title.is_none() && request.tags.is_none() && request.content.is_none() {
        output.message("No changes.");
        return Ok(());
    }

    let updated = store
        .update_document(id, request)
        .await
        .context("Failed to update document")?;

    output.success(&format!(
        "Updated document {} (now v{})",
        updated.id, updated.current_version
    ));
    Ok(())
}

/// Soft-delete a document
pub async fn delete(store: &mut AppStore, id: i64, output: &Output) -> Result<()> {
    let doc = store
        .load_document(id)
        .await
        .with_context(|| format!("Failed to load document {}", id))?;

    if output.should_prompt() {
        println!("Delete document {}: {}", doc.id, doc.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .delete_document(id)
        .await
        .context("Failed to delete document")?;

    output.success(&format!("Deleted document {} (restorable)", id));
    Ok(())
}

/// Restore a soft-deleted document
pub async fn restore(store: &mut AppStore, id: i64, output: &Output) -> Result<()> {
    let doc = store
        .restore_document(id)
        .await
        .context("Failed to restore document")?;

    output.success(&format!("Restored document {}", doc.id));
    output.print_document(&doc);
    Ok(())
}
