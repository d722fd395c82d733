//! Tenga CLI
//!
//! Command-line client for the Tenga document management service.
//! All state lives in the backend; this binary wraps the typed REST
//! client and application store from `tenga-core`.

use std::fs::File;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tenga_core::routes::{self, Route};
use tenga_core::{ApiClient, AppStore, Config, Session, SessionEvent};

mod commands;
mod editor;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "tenga")]
#[command(about = "Tenga - documents, tags, and version history")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with an API key
    Login {
        /// API key (prompted for when omitted)
        #[arg(long)]
        key: Option<String>,
    },
    /// Log out and discard the stored API key
    Logout,
    /// Show backend and session status
    Status,
    /// Manage documents
    Doc {
        #[command(subcommand)]
        command: DocCommands,
    },
    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Inspect and restore document versions
    Version {
        #[command(subcommand)]
        command: VersionCommands,
    },
    /// Full-text search across documents
    Search {
        /// Search query
        query: String,
        /// Restrict to documents carrying this tag (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,
        /// Page number (zero-based)
        #[arg(long, default_value_t = 0)]
        page: i64,
        /// Page size (defaults to the configured page size)
        #[arg(long)]
        size: Option<i64>,
        /// Use semantic search instead of full-text
        #[arg(long)]
        semantic: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum DocCommands {
    /// List documents
    #[command(alias = "ls")]
    List {
        /// Page number (zero-based)
        #[arg(long, default_value_t = 0)]
        page: i64,
        /// Page size (defaults to the configured page size)
        #[arg(long)]
        size: Option<i64>,
        /// Only show documents carrying this tag (repeatable; the
        /// first is filtered by the server, the rest client-side over
        /// the loaded page)
        #[arg(short, long)]
        tag: Vec<String>,
        /// Only show documents whose title or content contains this
        /// text (client-side over the loaded page)
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Show a document
    Show {
        /// Document ID
        id: i64,
    },
    /// Create a new document
    #[command(alias = "add")]
    Create {
        /// Document title
        title: String,
        /// Tags to attach
        #[arg(short, long)]
        tag: Vec<String>,
        /// Content (opens $EDITOR if not provided)
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Edit a document
    Edit {
        /// Document ID
        id: i64,
        /// Change summary recorded with the new version
        #[arg(short, long)]
        summary: Option<String>,
    },
    /// Delete a document (soft delete, restorable)
    #[command(alias = "rm")]
    Delete {
        /// Document ID
        id: i64,
    },
    /// Restore a deleted document
    Restore {
        /// Document ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum TagCommands {
    /// List all tags
    #[command(alias = "ls")]
    List,
    /// Show the tag hierarchy as a tree
    Tree,
    /// Create a new tag
    #[command(alias = "add")]
    Create {
        /// Tag name
        name: String,
        /// Parent tag ID (creates a nested tag)
        #[arg(long)]
        parent: Option<i64>,
    },
    /// Rename a tag
    Rename {
        /// Tag ID
        id: i64,
        /// New name
        name: String,
    },
    /// Delete a tag
    #[command(alias = "rm")]
    Delete {
        /// Tag ID
        id: i64,
    },
    /// Search tags by name
    Search {
        /// Name fragment
        query: String,
    },
    /// Attach a tag to a document
    Apply {
        /// Tag ID
        tag_id: i64,
        /// Document ID
        document_id: i64,
    },
    /// Remove a tag from a document
    Remove {
        /// Tag ID
        tag_id: i64,
        /// Document ID
        document_id: i64,
    },
}

#[derive(Subcommand)]
enum VersionCommands {
    /// List the version history of a document
    #[command(alias = "ls")]
    List {
        /// Document ID
        document_id: i64,
    },
    /// Show a version snapshot
    Show {
        /// Document ID
        document_id: i64,
        /// Version number
        number: i32,
    },
    /// Restore a document to an earlier version
    Restore {
        /// Document ID
        document_id: i64,
        /// Version number
        number: i32,
    },
    /// Compare two versions of a document
    #[command(alias = "diff")]
    Compare {
        /// Document ID
        document_id: i64,
        /// First version number
        v1: i32,
        /// Second version number
        v2: i32,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, data_dir, page_size, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work without a backend or session
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let config = Config::load()?;
    init_logging(&config);

    let session = Arc::new(Session::load(&config)?);
    let mut events = session.take_events();

    // Navigation guard: every command maps to one of the client's
    // routes; auth-required routes are blocked while no key is stored.
    if let Some(route) = command_route(&cli.command) {
        if let routes::Navigation::RedirectToLogin { redirect } =
            routes::guard(route, session.has_api_key())
        {
            bail!(
                "Not logged in (wanted {}). Run `tenga login`, then retry.",
                redirect
            );
        }
    }

    let is_login = matches!(cli.command, Commands::Login { .. });
    let client = ApiClient::new(&config, session.clone())?;

    let result = match cli.command {
        Commands::Login { key } => commands::auth::login(&client, key, &output).await,
        Commands::Logout => commands::auth::logout(&client, &output),
        Commands::Status => commands::auth::status(&client, &config, &output).await,
        Commands::Doc { command } => {
            let mut store = AppStore::new(client.clone());
            handle_doc_command(command, &mut store, &config, &output).await
        }
        Commands::Tag { command } => handle_tag_command(command, &client, &output).await,
        Commands::Version { command } => handle_version_command(command, &client, &output).await,
        Commands::Search {
            query,
            tag,
            page,
            size,
            semantic,
        } => {
            let size = size.unwrap_or(config.page_size);
            commands::search::run(&client, query, tag, page, size, semantic, &output).await
        }
        Commands::Config { .. } => unreachable!(), // Handled above
    };

    // The transport emits Expired when the backend rejects the key;
    // surface it as login guidance once, outside the login flow itself.
    if let Some(events) = events.as_mut() {
        while let Ok(event) = events.try_recv() {
            if event == SessionEvent::Expired && !is_login && !output.is_quiet() {
                eprintln!("Session expired: the stored API key was rejected. Run `tenga login`.");
            }
        }
    }

    result
}

/// The route a command navigates to, for the auth guard
///
/// Commands that manage the session or local configuration have no
/// route and never require a stored key.
fn command_route(command: &Commands) -> Option<Route> {
    match command {
        Commands::Login { .. } => Some(Route::Login),
        Commands::Logout | Commands::Status | Commands::Config { .. } => None,
        Commands::Doc { command } => Some(match command {
            DocCommands::List { .. } => Route::Home,
            DocCommands::Show { id } => Route::Document(*id),
            DocCommands::Create { .. } => Route::DocumentNew,
            DocCommands::Edit { id, .. } => Route::DocumentEdit(*id),
            DocCommands::Delete { id } => Route::Document(*id),
            DocCommands::Restore { id } => Route::Document(*id),
        }),
        Commands::Tag { .. } | Commands::Search { .. } => Some(Route::Home),
        Commands::Version { command } => {
            let document_id = match command {
                VersionCommands::List { document_id }
                | VersionCommands::Show { document_id, .. }
                | VersionCommands::Restore { document_id, .. }
                | VersionCommands::Compare { document_id, .. } => *document_id,
            };
            Some(Route::VersionHistory(document_id))
        }
    }
}

async fn handle_doc_command(
    command: DocCommands,
    store: &mut AppStore,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        DocCommands::List {
            page,
            size,
            tag,
            filter,
        } => {
            let size = size.unwrap_or(config.page_size);
            commands::doc::list(store, page, size, tag, filter, output).await
        }
        DocCommands::Show { id } => commands::doc::show(store, id, output).await,
        DocCommands::Create {
            title,
            tag,
            content,
        } => commands::doc::create(store, title, tag, content, output).await,
        DocCommands::Edit { id, summary } => commands::doc::edit(store, id, summary, output).await,
        DocCommands::Delete { id } => commands::doc::delete(store, id, output).await,
        DocCommands::Restore { id } => commands::doc::restore(store, id, output).await,
    }
}

async fn handle_tag_command(
    command: TagCommands,
    client: &ApiClient,
    output: &Output,
) -> Result<()> {
    match command {
        TagCommands::List => commands::tag::list(client, output).await,
        TagCommands::Tree => commands::tag::tree(client, output).await,
        TagCommands::Create { name, parent } => {
            commands::tag::create(client, name, parent, output).await
        }
        TagCommands::Rename { id, name } => commands::tag::rename(client, id, name, output).await,
        TagCommands::Delete { id } => commands::tag::delete(client, id, output).await,
        TagCommands::Search { query } => commands::tag::search(client, query, output).await,
        TagCommands::Apply {
            tag_id,
            document_id,
        } => commands::tag::apply(client, tag_id, document_id, output).await,
        TagCommands::Remove {
            tag_id,
            document_id,
        } => commands::tag::remove(client, tag_id, document_id, output).await,
    }
}

async fn handle_version_command(
    command: VersionCommands,
    client: &ApiClient,
    output: &Output,
) -> Result<()> {
    match command {
        VersionCommands::List { document_id } => {
            commands::version::list(client, document_id, output).await
        }
        VersionCommands::Show {
            document_id,
            number,
        } => commands::version::show(client, document_id, number, output).await,
        VersionCommands::Restore {
            document_id,
            number,
        } => commands::version::restore(client, document_id, number, output).await,
        VersionCommands::Compare {
            document_id,
            v1,
            v2,
        } => commands::version::compare(client, document_id, v1, v2, output).await,
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

/// Initialize logging
///
/// Only initializes if the TENGA_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log) so
/// command output stays clean.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("TENGA_LOG") else {
        return;
    };

    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(|| config.data_dir.join("debug.log"));

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("tenga_core={},tenga_cli={}", log_level, log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_route_mapping() {
        let show = Commands::Doc {
            command: DocCommands::Show { id: 5 },
        };
        assert_eq!(command_route(&show), Some(Route::Document(5)));

        let edit = Commands::Doc {
            command: DocCommands::Edit {
                id: 5,
                summary: None,
            },
        };
        assert_eq!(command_route(&edit), Some(Route::DocumentEdit(5)));

        let versions = Commands::Version {
            command: VersionCommands::List { document_id: 9 },
        };
        assert_eq!(command_route(&versions), Some(Route::VersionHistory(9)));
    }

    #[test]
    fn test_session_commands_have_no_route() {
        assert_eq!(command_route(&Commands::Logout), None);
        assert_eq!(command_route(&Commands::Status), None);
        assert_eq!(
            command_route(&Commands::Login { key: None }),
            Some(Route::Login)
        );
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
