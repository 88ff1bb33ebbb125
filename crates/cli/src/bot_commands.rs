use std::sync::Arc;

use {
    anyhow::{Context, Result},
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use {
    feedwatch_config::{FeedwatchConfig, RedditConfig, Severity, validate},
    feedwatch_discord::{
        CommandService, DiscordOutbound, FeedwatchHandler, RoleConfig, build_client,
        run_until_cancelled,
    },
    feedwatch_feeds::{
        JsonFileStore, RedditClient, RedditClientConfig, StreamConfig, StreamService,
        SubscriptionRegistry,
    },
};

/// Map the config section onto the client settings. Missing credentials are
/// reported by validation before this runs.
pub fn reddit_client_config(reddit: &RedditConfig) -> RedditClientConfig {
    RedditClientConfig {
        client_id: reddit.client_id.clone().unwrap_or_default(),
        client_secret: reddit
            .client_secret
            .clone()
            .unwrap_or_else(|| secrecy::Secret::new(String::new())),
        user_agent: reddit.user_agent.clone(),
        auth_url: reddit.auth_url.clone(),
        api_base: reddit.api_base.clone(),
        poll_interval: reddit.poll_interval(),
        listing_limit: reddit.listing_limit,
        request_timeout: reddit.request_timeout(),
    }
}

/// Start the bot: store → Reddit client → registry → stream loop → Discord.
/// Runs until Ctrl-C or a gateway failure.
pub async fn run(config: FeedwatchConfig) -> Result<()> {
    let diagnostics = validate(&config);
    for d in &diagnostics.diagnostics {
        match d.severity {
            Severity::Error => error!(path = %d.path, "{}", d.message),
            Severity::Warning => warn!(path = %d.path, "{}", d.message),
            Severity::Info => debug!(path = %d.path, "{}", d.message),
        }
    }
    if diagnostics.has_errors() {
        anyhow::bail!("configuration is incomplete; run `feedwatch check` for details");
    }

    let reddit = Arc::new(RedditClient::new(reddit_client_config(&config.reddit))?);
    reddit
        .authenticate()
        .await
        .context("Reddit rejected the configured credentials")?;
    info!("reddit credentials verified");

    let store = Arc::new(JsonFileStore::new(&config.storage.path));
    let registry = SubscriptionRegistry::open(store, reddit.clone())
        .await
        .with_context(|| format!("failed to load {}", config.storage.path.display()))?;

    let commands = Arc::new(CommandService::new(
        Arc::clone(&registry),
        reddit.clone(),
        config.discord.command_prefix.clone(),
    ));
    let handler = FeedwatchHandler::new(
        commands,
        RoleConfig::from_config(&config.discord),
        config.discord.embed_color,
    );
    let client = build_client(&config.discord, handler).await?;

    let outbound = Arc::new(DiscordOutbound::new(
        Arc::clone(&client.http),
        config.discord.embed_color,
    ));
    let stream = StreamService::new(registry, reddit, outbound, StreamConfig {
        restart_delay: config.stream.restart_delay(),
        max_restart_delay: config.stream.max_restart_delay(),
    });
    stream.start().await;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("ctrl-c received, shutting down");
                on_signal.cancel();
            },
            Err(e) => warn!(error = %e, "failed to listen for ctrl-c"),
        }
    });

    let result = run_until_cancelled(client, cancel).await;
    stream.stop().await;
    result.context("discord gateway failed")?;

    info!("feedwatch stopped");
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret, std::time::Duration};

    #[test]
    fn client_config_follows_section() {
        let mut section = RedditConfig::default();
        section.client_id = Some("abc".into());
        section.client_secret = Some(secrecy::Secret::new("shh".into()));
        section.poll_interval_secs = 30;

        let cfg = reddit_client_config(&section);
        assert_eq!(cfg.client_id, "abc");
        assert_eq!(cfg.client_secret.expose_secret(), "shh");
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.listing_limit, 100);
        assert!(cfg.user_agent.is_none());
    }

    #[tokio::test]
    async fn run_refuses_incomplete_config() {
        let err = run(FeedwatchConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("configuration is incomplete"));
    }
}
