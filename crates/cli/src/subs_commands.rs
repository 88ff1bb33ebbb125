use anyhow::{Context, Result};

use {feedwatch_config::FeedwatchConfig, feedwatch_feeds::PersistedDocument};

/// Print subscriptions and bans from the document without connecting anywhere.
/// Read-only: a missing or corrupt document is reported, never rewritten.
pub async fn print(config: &FeedwatchConfig, json: bool) -> Result<()> {
    let path = &config.storage.path;
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            eprintln!("No subscription document at {}", path.display());
            return Ok(());
        },
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    };
    let document: PersistedDocument = serde_json::from_str(&raw).with_context(|| {
        format!(
            "{} is corrupt; the bot replaces it with an empty document on next start",
            path.display()
        )
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        print!("{}", render(&document));
    }
    Ok(())
}

fn render(document: &PersistedDocument) -> String {
    let mut out = String::new();
    if document.subscribed.is_empty() {
        out.push_str("No subreddits are currently subscribed!\n");
    } else {
        out.push_str("Subscribed:\n");
        let width = document
            .subscribed
            .iter()
            .map(|s| s.destination.to_string().len())
            .max()
            .unwrap_or(0);
        for sub in &document.subscribed {
            out.push_str(&format!(
                "  {:>width$}  r/{}\n",
                sub.destination,
                sub.feed,
                width = width
            ));
        }
    }

    if document.banned.is_empty() {
        out.push_str("No subreddits are currently banned!\n");
    } else {
        out.push_str("Banned:\n");
        for feed in &document.banned {
            out.push_str(&format!("  r/{feed}\n"));
        }
    }
    out
}
