//! Database setup and inspection commands.

use tokio::runtime::Runtime;

use super::open_store;
use crate::config::Config;
use crate::library;

/// Create the database file and schema.
pub fn cmd_init_db(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    rt.block_on(async {
        let store = open_store(config).await?;
        store.close().await;
        println!("Database ready at {}", config.database.path.display());
        Ok(())
    })
}

/// Print every registered user.
pub fn cmd_users(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    rt.block_on(async {
        let store = open_store(config).await?;
        let users = library::list_users(&store).await;
        store.close().await;

        let users = users?;
        if users.is_empty() {
            println!("No registered users.");
            return Ok(());
        }
        for user in &users {
            println!(
                "{}\t{}\t{}",
                user.telegram_id,
                user.username.as_deref().unwrap_or("-"),
                user.created_at.as_deref().unwrap_or("-")
            );
        }
        println!("{} user(s)", users.len());
        Ok(())
    })
}
