//! Search command handler

use anyhow::{bail, Context, Result};

use tenga_core::{ApiClient, SearchQuery};

use crate::output::Output;

/// Run a full-text (or semantic) search against the backend
pub async fn run(
    client: &ApiClient,
    query: String,
    tags: Vec<String>,
    page: i64,
    size: i64,
    semantic: bool,
    output: &Output,
) -> Result<()> {
    let results = if semantic {
        if !tags.is_empty() {
            bail!("--tag cannot be combined with --semantic");
        }
        client
            .semantic_search(&query, page, size)
            .await
            .context("Semantic search failed")?
    } else {
        let search = SearchQuery {
            text: Some(query),
            tags,
            page,
            size,
            ..Default::default()
        };
        client.search(&search).await.context("Search failed")?
    };

    output.print_search_results(&results);
    Ok(())
}
