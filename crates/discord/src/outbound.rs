//! Delivery of streamed posts to Discord channels.

use std::sync::Arc;

use {
    async_trait::async_trait,
    serenity::{
        all::{ChannelId, CreateMessage, Http},
        http::HttpError,
    },
    tracing::debug,
};

use feedwatch_feeds::{DestinationId, DispatchError, DispatchSink, FeedItem};

use crate::render::Notification;

/// Discord JSON error codes meaning the channel is unusable for good.
const UNKNOWN_CHANNEL: isize = 10003;
const MISSING_ACCESS: isize = 50001;

/// Sends one embed per post, with a typing indicator first.
pub struct DiscordOutbound {
    http: Arc<Http>,
    color: u32,
}

impl DiscordOutbound {
    pub fn new(http: Arc<Http>, color: u32) -> Self {
        Self { http, color }
    }
}

#[async_trait]
impl DispatchSink for DiscordOutbound {
    async fn deliver(&self, destination: DestinationId, item: &FeedItem) -> Result<(), DispatchError> {
        if destination == 0 {
            return Err(DispatchError::DestinationGone { destination });
        }
        let channel = ChannelId::new(destination);

        if let Err(e) = channel.broadcast_typing(&self.http).await {
            if is_gone(&e) {
                return Err(DispatchError::DestinationGone { destination });
            }
            debug!(destination, error = %e, "typing indicator failed");
        }

        let embed = Notification::from_item(item, self.color).to_embed();
        match channel
            .send_message(&self.http, CreateMessage::new().embed(embed))
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_gone(&e) => Err(DispatchError::DestinationGone { destination }),
            Err(e) => Err(DispatchError::external(destination, e)),
        }
    }
}

/// Channel deleted, or the bot was removed from it.
fn is_gone(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) => {
            resp.status_code.as_u16() == 404
                || matches!(resp.error.code, UNKNOWN_CHANNEL | MISSING_ACCESS)
        },
        _ => false,
    }
}
