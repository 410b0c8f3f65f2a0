//! CLI interface for nblm.

pub mod handlers;
pub mod output;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use output::OutputMode;

/// nblm - NotebookLM batch-RPC client and MCP server
#[derive(Parser)]
#[command(name = "nblm", version, about, long_about = None)]
pub struct Cli {
    /// Override data directory (default: ~/.nblm)
    #[arg(long, env = "NBLM_DATA_PATH", global = true)]
    pub data_path: Option<PathBuf>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start MCP server (stdio transport)
    Mcp,

    /// Save browser cookies (stdin or --file), or show the stored credentials
    Auth {
        /// Read the Cookie header from a file instead of stdin
        #[arg(long, conflicts_with = "show")]
        file: Option<PathBuf>,
        /// Show where credentials come from without changing them
        #[arg(long)]
        show: bool,
        /// Save even when required cookies are missing
        #[arg(long)]
        force: bool,
    },

    /// Notebook catalog
    #[command(subcommand)]
    Notebooks(NotebookCommands),

    /// List a notebook's sources with type and Drive sync state
    Sources {
        notebook_id: String,
        /// Also ask the server whether each Drive source is stale
        #[arg(long)]
        freshness: bool,
    },

    /// Ask a question over a notebook's sources
    Ask {
        notebook_id: String,
        question: String,
        /// Continue an earlier conversation
        #[arg(long)]
        conversation_id: Option<String>,
        /// Restrict to these source ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        sources: Option<Vec<String>>,
    },

    /// Research task inspection
    #[command(subcommand)]
    Research(ResearchCommands),

    /// Studio artifact inspection
    #[command(subcommand)]
    Studio(StudioCommands),

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, elvish, powershell)
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum NotebookCommands {
    /// List notebooks
    List {
        /// Maximum results
        #[arg(long, default_value = "100")]
        limit: usize,
    },
    /// Print the raw notebook record
    Get { notebook_id: String },
}

#[derive(Subcommand)]
pub enum ResearchCommands {
    /// Show research progress and discovered sources
    Status {
        notebook_id: String,
        /// Seconds to wait for completion (0 polls once)
        #[arg(long, default_value = "0")]
        max_wait: u64,
        /// Seconds between polls
        #[arg(long)]
        poll_interval: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum StudioCommands {
    /// Show audio and video artifacts
    Status {
        notebook_id: String,
        /// Seconds to wait for generation to finish (0 polls once)
        #[arg(long, default_value = "0")]
        max_wait: u64,
        /// Seconds between polls
        #[arg(long, default_value = "30")]
        poll_interval: u64,
    },
}

/// Execute a CLI command.
pub async fn execute(
    command: &Commands,
    ctx: &crate::init::AppContext,
    mode: OutputMode,
) -> anyhow::Result<()> {
    match command {
        Commands::Mcp => unreachable!("MCP handled in main"),

        Commands::Auth { file, show, force } => {
            if *show {
                handlers::auth::handle_auth_show(ctx, mode)?
            } else {
                handlers::auth::handle_auth_save(ctx, file.as_deref(), *force, mode).await?
            }
        }

        Commands::Notebooks(cmd) => match cmd {
            NotebookCommands::List { limit } => {
                handlers::notebook::handle_list(ctx, *limit, mode).await?
            }
            NotebookCommands::Get { notebook_id } => {
                handlers::notebook::handle_get(ctx, notebook_id).await?
            }
        },

        Commands::Sources {
            notebook_id,
            freshness,
        } => handlers::notebook::handle_sources(ctx, notebook_id, *freshness, mode).await?,

        Commands::Ask {
            notebook_id,
            question,
            conversation_id,
            sources,
        } => {
            handlers::notebook::handle_ask(
                ctx,
                notebook_id,
                question,
                sources.clone(),
                conversation_id.clone(),
                mode,
            )
            .await?
        }

        Commands::Research(ResearchCommands::Status {
            notebook_id,
            max_wait,
            poll_interval,
        }) => {
            let interval = poll_interval.unwrap_or(ctx.config.research_poll_interval_secs);
            handlers::jobs::handle_research_status(ctx, notebook_id, interval, *max_wait, mode)
                .await?
        }

        Commands::Studio(StudioCommands::Status {
            notebook_id,
            max_wait,
            poll_interval,
        }) => {
            handlers::jobs::handle_studio_status(ctx, notebook_id, *poll_interval, *max_wait, mode)
                .await?
        }

        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "nblm", &mut std::io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_source_list() {
        let cli = Cli::parse_from([
            "nblm", "--json", "ask", "nb1", "what is new?", "--sources", "s1,s2",
        ]);
        assert!(cli.json);
        match cli.command {
            Commands::Ask {
                notebook_id,
                sources,
                conversation_id,
                ..
            } => {
                assert_eq!(notebook_id, "nb1");
                assert_eq!(sources, Some(vec!["s1".to_string(), "s2".to_string()]));
                assert!(conversation_id.is_none());
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_auth_show_conflicts_with_file() {
        let result = Cli::try_parse_from(["nblm", "auth", "--show", "--file", "cookies.txt"]);
        assert!(result.is_err());
    }
}
