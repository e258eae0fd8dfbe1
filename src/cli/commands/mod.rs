//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `bot`: run the bot on the console transport
//! - `db`: database setup and inspection
//! - `search`: one-off catalog searches
//! - `settings`: write a default config file

mod bot;
mod db;
mod search;
mod settings;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::catalog::SearchKind;
use crate::config::{self, Config};
use crate::db::Store;

pub use bot::cmd_run;
pub use db::{cmd_init_db, cmd_users};
pub use search::cmd_search;
pub use settings::cmd_init_config;

/// tunebot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: <config dir>/tunebot/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overrides the config file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Catalog client ID, overrides the config file
    #[arg(long, env = "TUNEBOT_CLIENT_ID", global = true, hide_env_values = true)]
    pub client_id: Option<String>,

    /// Catalog client secret, overrides the config file
    #[arg(long, env = "TUNEBOT_CLIENT_SECRET", global = true, hide_env_values = true)]
    pub client_secret: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bot, reading messages from stdin (the default)
    Run {
        /// User ID the console messages come from
        #[arg(long, default_value_t = 1)]
        user_id: i64,
        /// Username of the console user
        #[arg(long)]
        username: Option<String>,
        /// Display name of the console user
        #[arg(long, default_value = "Console")]
        first_name: String,
    },
    /// Create the database and its tables
    InitDb,
    /// List registered users
    Users,
    /// Search the catalog without going through the bot
    Search {
        /// What to search for: track, artist, album, episode
        #[arg(value_parser = parse_kind)]
        kind: SearchKind,
        /// Search query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Maximum number of results (default: catalog.search_limit)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Write a config file with default settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_kind(s: &str) -> Result<SearchKind, String> {
    s.parse()
}

/// Run the specified CLI command.
///
/// Without a subcommand the bot runs with default console identity.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = resolve_config(cli);

    let result = match &cli.command {
        Some(Commands::Run {
            user_id,
            username,
            first_name,
        }) => cmd_run(&rt, &config, *user_id, username.as_deref(), first_name),
        None => cmd_run(&rt, &config, 1, None, "Console"),
        Some(Commands::InitDb) => cmd_init_db(&rt, &config),
        Some(Commands::Users) => cmd_users(&rt, &config),
        Some(Commands::Search { kind, query, limit }) => {
            let limit = limit.unwrap_or(config.catalog.search_limit);
            cmd_search(&rt, &config, *kind, &query.join(" "), limit)
        }
        Some(Commands::InitConfig { force }) => cmd_init_config(cli.config.as_deref(), *force),
    };

    // Stdin reads run on a blocking thread that never finishes on its own.
    rt.shutdown_timeout(Duration::from_millis(500));
    result
}

/// Load the config file and apply command-line overrides.
pub(crate) fn resolve_config(cli: &Cli) -> Config {
    let mut config = config::load(cli.config.as_deref());
    config
        .credentials
        .merge(cli.client_id.as_deref(), cli.client_secret.as_deref());
    if let Some(db) = &cli.db {
        config.database.path = db.clone();
    }
    config
}

/// Open the configured database.
pub(crate) async fn open_store(config: &Config) -> anyhow::Result<Store> {
    let url = crate::db::db_url(Some(&config.database.path));
    Store::open(&url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["tunebot"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_run_options() {
        let cli = Cli::try_parse_from([
            "tunebot",
            "run",
            "--user-id",
            "42",
            "--username",
            "alice",
            "--db",
            "/tmp/bot.db",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Run {
                user_id, username, ..
            }) => {
                assert_eq!(user_id, 42);
                assert_eq!(username.as_deref(), Some("alice"));
            }
            other => panic!("Expected run, got {other:?}"),
        }
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/bot.db")));
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["tunebot", "search", "album", "abbey", "road", "-l", "3"])
            .unwrap();
        match cli.command {
            Some(Commands::Search { kind, query, limit }) => {
                assert_eq!(kind, SearchKind::Album);
                assert_eq!(query.join(" "), "abbey road");
                assert_eq!(limit, Some(3));
            }
            other => panic!("Expected search, got {other:?}"),
        }

        assert!(Cli::try_parse_from(["tunebot", "search", "playlist", "x"]).is_err());
        assert!(Cli::try_parse_from(["tunebot", "search", "track"]).is_err());
    }

    #[test]
    fn test_resolve_config_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[credentials]\nclient_id = \"file-id\"\nclient_secret = \"file-secret\"\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "tunebot",
            "--config",
            path.to_str().unwrap(),
            "--db",
            "other.db",
            "--client-secret",
            "cli-secret",
            "users",
        ])
        .unwrap();
        let config = resolve_config(&cli);

        assert_eq!(config.database.path, PathBuf::from("other.db"));
        assert_eq!(config.credentials.pair().map(|(_, s)| s), Some("cli-secret"));
    }
}
