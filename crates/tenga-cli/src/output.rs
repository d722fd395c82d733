//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use tenga_core::{Document, DocumentVersion, Page, SearchResult, Tag};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single document in full
    pub fn print_document(&self, doc: &Document) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", doc.id);
                println!("Title:   {}", doc.title);
                if !doc.tags.is_empty() {
                    println!("Tags:    {}", doc.tags.join(", "));
                }
                println!("Version: {}", doc.current_version);
                println!("Created: {}", doc.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated: {}", doc.updated_at.format("%Y-%m-%d %H:%M"));
                if let Some(deleted) = doc.deleted_at {
                    println!("Deleted: {}", deleted.format("%Y-%m-%d %H:%M"));
                }
                println!();
                println!("{}", doc.content);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(doc).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", doc.id);
            }
        }
    }

    /// Print a list of documents
    pub fn print_documents(&self, docs: &[&Document]) {
        match self.format {
            OutputFormat::Human => {
                if docs.is_empty() {
                    println!("No documents found.");
                    return;
                }
                for doc in docs {
                    let tags = if doc.tags.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", doc.tags.join(", "))
                    };
                    println!(
                        "{:>6} | {}{} | v{} | {}",
                        doc.id,
                        truncate(&doc.title, 40),
                        tags,
                        doc.current_version,
                        doc.updated_at.format("%Y-%m-%d %H:%M")
                    );
                }
                println!("\n{} document(s)", docs.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(docs).unwrap());
            }
            OutputFormat::Quiet => {
                for doc in docs {
                    println!("{}", doc.id);
                }
            }
        }
    }

    /// Print page position after a listing
    pub fn page_footer<T>(&self, page: &Page<T>) {
        if self.format == OutputFormat::Human && page.total_pages > 1 {
            println!(
                "Page {}/{} ({} total)",
                page.number + 1,
                page.total_pages,
                page.total_elements
            );
        }
    }

    /// Print a flat list of tags
    pub fn print_tags(&self, tags: &[Tag]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for tag in tags {
                    match tag.document_count {
                        Some(count) => println!("{:>6} | {} ({})", tag.id, tag.name, count),
                        None => println!("{:>6} | {}", tag.id, tag.name),
                    }
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(tags).unwrap());
            }
            OutputFormat::Quiet => {
                for tag in tags {
                    println!("{}", tag.name);
                }
            }
        }
    }

    /// Print the tag hierarchy as an indented tree
    pub fn print_tag_tree(&self, tags: &[Tag]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for tag in tags {
                    print_tag_node(tag, 0);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(tags).unwrap());
            }
            OutputFormat::Quiet => {
                for tag in tags {
                    print_tag_names(tag);
                }
            }
        }
    }

    /// Print a list of version snapshots
    pub fn print_versions(&self, versions: &[DocumentVersion]) {
        match self.format {
            OutputFormat::Human => {
                if versions.is_empty() {
                    println!("No versions found.");
                    return;
                }
                for version in versions {
                    let summary = version
                        .change_summary
                        .as_deref()
                        .unwrap_or("(no summary)");
                    println!(
                        "v{:<4} | {} | {} | {}",
                        version.version_number,
                        version.created_at.format("%Y-%m-%d %H:%M"),
                        truncate(&version.title, 35),
                        truncate_line(summary, 40)
                    );
                }
                println!("\n{} version(s)", versions.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(versions).unwrap());
            }
            OutputFormat::Quiet => {
                for version in versions {
                    println!("{}", version.version_number);
                }
            }
        }
    }

    /// Print a single version snapshot in full
    pub fn print_version(&self, version: &DocumentVersion) {
        match self.format {
            OutputFormat::Human => {
                println!("Document: {}", version.document_id);
                println!("Version:  {}", version.version_number);
                println!("Title:    {}", version.title);
                if let Some(ref tags) = version.tags_snapshot {
                    println!("Tags:     {}", tags);
                }
                println!("Created:  {}", version.created_at.format("%Y-%m-%d %H:%M"));
                if let Some(ref summary) = version.change_summary {
                    println!("Summary:  {}", summary);
                }
                println!();
                println!("{}", version.content);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(version).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", version.version_number);
            }
        }
    }

    /// Print a page of search results
    pub fn print_search_results(&self, page: &Page<SearchResult>) {
        match self.format {
            OutputFormat::Human => {
                if page.is_empty() {
                    println!("No results.");
                    return;
                }
                for result in &page.content {
                    let score = result
                        .relevance_score
                        .map(|s| format!("{:.2}", s))
                        .unwrap_or_else(|| "-".to_string());
                    println!("{:>6} | {} | {}", result.document_id, score, result.title);
                    if let Some(ref snippet) = result.snippet {
                        println!("       | {}", truncate_line(snippet, 70));
                    }
                }
                println!("\n{} result(s)", page.total_elements);
                self.page_footer(page);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(page).unwrap());
            }
            OutputFormat::Quiet => {
                for result in &page.content {
                    println!("{}", result.document_id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

fn print_tag_node(tag: &Tag, depth: usize) {
    let indent = "  ".repeat(depth);
    match tag.document_count {
        Some(count) => println!("{}{} ({})", indent, tag.name, count),
        None => println!("{}{}", indent, tag.name),
    }
    if let Some(ref children) = tag.children {
        for child in children {
            print_tag_node(child, depth + 1);
        }
    }
}

fn print_tag_names(tag: &Tag) {
    println!("{}", tag.name);
    if let Some(ref children) = tag.children {
        for child in children {
            print_tag_names(child);
        }
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
