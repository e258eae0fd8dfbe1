//! One-off catalog search.

use anyhow::Context;
use tokio::runtime::Runtime;

use crate::catalog::{CatalogClient, SearchKind, SearchResults};
use crate::config::Config;

/// Search the catalog and print the hits.
pub fn cmd_search(
    rt: &Runtime,
    config: &Config,
    kind: SearchKind,
    query: &str,
    limit: u32,
) -> anyhow::Result<()> {
    let client = CatalogClient::new(&config.catalog, &config.credentials)
        .context("Failed to create catalog client")?;

    let results = rt
        .block_on(client.search(query, kind, limit))
        .with_context(|| format!("Search for {kind} '{query}' failed"))?;

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }
    for line in format_results(&results) {
        println!("{line}");
    }
    Ok(())
}

fn format_results(results: &SearchResults) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, t) in results.tracks.iter().enumerate() {
        let preview = if t.preview_url.is_some() { " [preview]" } else { "" };
        lines.push(format!(
            "{}. {} - {} ({}) id={}{}",
            i + 1,
            t.artists,
            t.name,
            t.album,
            t.id,
            preview
        ));
    }
    for (i, a) in results.artists.iter().enumerate() {
        lines.push(format!("{}. {} [{}] id={}", i + 1, a.name, a.genres.join(", "), a.id));
    }
    for (i, a) in results.albums.iter().enumerate() {
        lines.push(format!(
            "{}. {} - {} ({}) id={}",
            i + 1,
            a.artists,
            a.name,
            a.release_date,
            a.id
        ));
    }
    for (i, e) in results.episodes.iter().enumerate() {
        let preview = if e.preview_url.is_some() { " [preview]" } else { "" };
        lines.push(format!("{}. {} id={}{}", i + 1, e.name, e.id, preview));
    }
    lines
}
