use {
    secrecy::ExposeSecret,
    serenity::Client,
    tokio_util::sync::CancellationToken,
    tracing::info,
};

use feedwatch_config::DiscordConfig;

use crate::{
    error::{Error, Result},
    handler::FeedwatchHandler,
};

/// Build the gateway client. Nothing connects until [`run_until_cancelled`].
pub async fn build_client(config: &DiscordConfig, handler: FeedwatchHandler) -> Result<Client> {
    let token = config
        .token
        .as_ref()
        .map(|t| t.expose_secret().trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(Error::MissingToken)?;

    let client = Client::builder(&token, FeedwatchHandler::intents())
        .event_handler(handler)
        .await?;
    Ok(client)
}

/// Run the gateway until it fails or `cancel` fires, then shut all shards down.
pub async fn run_until_cancelled(mut client: Client, cancel: CancellationToken) -> Result<()> {
    let shards = client.shard_manager.clone();
    tokio::select! {
        result = client.start() => result.map_err(Error::from),
        () = cancel.cancelled() => {
            info!("shutting down discord shards");
            shards.shutdown_all().await;
            Ok(())
        },
    }
}
