//! Run the bot on the console transport.

use anyhow::Context;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use super::open_store;
use crate::bot::transport::{CALLBACK_PREFIX, ConsoleSink, run_console};
use crate::bot::{ReplySink, Router, Sender};
use crate::catalog::CatalogClient;
use crate::config::Config;

/// Run the bot until stdin closes or Ctrl-C is pressed.
pub fn cmd_run(
    rt: &Runtime,
    config: &Config,
    user_id: i64,
    username: Option<&str>,
    first_name: &str,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let store = open_store(config).await?;

        if config.credentials.pair().is_none() {
            warn!(
                target: "tunebot::cli",
                "Catalog credentials are not configured; /search, /play and likes will fail"
            );
        }
        let catalog = CatalogClient::new(&config.catalog, &config.credentials)
            .context("Failed to create catalog client")?;
        let router = Arc::new(Router::new(
            store.clone(),
            Arc::new(catalog),
            config.catalog.search_limit,
        ));

        let sender = Sender {
            id: user_id,
            username: username.map(str::to_string),
            first_name: first_name.to_string(),
        };
        let sink: Arc<dyn ReplySink> = Arc::new(ConsoleSink::stdout());

        eprintln!("tunebot is running as user {user_id}. Type /help to get started.");
        eprintln!("Press a button with `{CALLBACK_PREFIX}<data>`. Ctrl-D or Ctrl-C quits.");

        let input = BufReader::new(tokio::io::stdin());
        let result = run_console(input, router, sender, sink, shutdown_signal()).await;

        store.close().await;
        info!(target: "tunebot::cli", "Bot stopped");
        result.context("Failed to read from stdin")
    })
}

/// Resolves on Ctrl-C. Never resolves if the handler can't be installed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(target: "tunebot::cli", error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
