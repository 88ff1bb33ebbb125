//! Discord event handler for serenity.
//!
//! Reads prefix commands from guild messages, checks the author's roles and
//! answers in the same channel.

use std::sync::Arc;

use {
    serenity::{
        all::{Context, CreateMessage, EventHandler, GatewayIntents, GuildId, Message, Ready},
        async_trait,
    },
    tracing::{debug, info, warn},
};

use crate::{
    access::{MemberRole, RoleConfig, check_access},
    commands::{BAD_INPUT, Command, CommandService, MISSING_ROLE, ParseError, Reply, parse},
    render::{Notification, listing_embeds},
};

/// Handler for Discord gateway events.
pub struct FeedwatchHandler {
    commands: Arc<CommandService>,
    roles: RoleConfig,
    color: u32,
}

impl FeedwatchHandler {
    pub fn new(commands: Arc<CommandService>, roles: RoleConfig, color: u32) -> Self {
        Self {
            commands,
            roles,
            color,
        }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }

    async fn send_reply(&self, ctx: &Context, msg: &Message, reply: Reply) {
        let result = match reply {
            Reply::Text(text) => msg.channel_id.say(&ctx.http, text).await.map(|_| ()),
            Reply::Post(item) => {
                let embed = Notification::from_item(&item, self.color).to_embed();
                msg.channel_id
                    .send_message(&ctx.http, CreateMessage::new().embed(embed))
                    .await
                    .map(|_| ())
            },
            Reply::Listing { title, lines } => {
                let mut sent = Ok(());
                for embed in listing_embeds(&title, &lines, self.color) {
                    sent = msg
                        .channel_id
                        .send_message(&ctx.http, CreateMessage::new().embed(embed))
                        .await
                        .map(|_| ());
                    if sent.is_err() {
                        break;
                    }
                }
                sent
            },
        };
        if let Err(e) = result {
            warn!(channel_id = msg.channel_id.get(), error = %e, "failed to send command response");
        }
    }
}

/// Roles of the message author, with names from the guild cache.
/// `None` outside a guild.
fn member_roles(ctx: &Context, msg: &Message) -> Option<Vec<MemberRole>> {
    let guild_id = msg.guild_id?;
    let Some(member) = msg.member.as_ref() else {
        return Some(Vec::new());
    };
    let guild = ctx.cache.guild(guild_id);
    Some(
        member
            .roles
            .iter()
            .map(|role_id| MemberRole {
                id: role_id.get(),
                name: guild
                    .as_ref()
                    .and_then(|g| g.roles.get(role_id))
                    .map(|role| role.name.clone()),
            })
            .collect(),
    )
}

#[async_trait]
impl EventHandler for FeedwatchHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord bot ready"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Skip bot messages to prevent loops
        if msg.author.bot {
            return;
        }

        let command = match parse(self.commands.prefix(), &msg.content) {
            Ok(command) => command,
            Err(ParseError::NotACommand) => return,
            Err(ParseError::Unknown(name)) => {
                debug!(command = %name, "ignoring unknown command");
                return;
            },
            Err(ParseError::MissingArgument { command }) => {
                debug!(command, user = %msg.author.name, "command missing its argument");
                self.send_reply(&ctx, &msg, Reply::Text(BAD_INPUT.into())).await;
                return;
            },
        };

        let roles = member_roles(&ctx, &msg);
        if let Err(denied) = check_access(&self.roles, command.tier(), roles.as_deref()) {
            debug!(
                command = command.name(),
                user = %msg.author.name,
                reason = %denied,
                "command refused"
            );
            self.send_reply(&ctx, &msg, Reply::Text(MISSING_ROLE.into())).await;
            return;
        }

        if matches!(command, Command::Fetch { .. })
            && let Err(e) = msg.channel_id.broadcast_typing(&ctx.http).await
        {
            debug!(error = %e, "typing indicator failed");
        }

        debug!(
            command = command.name(),
            user = %msg.author.name,
            channel_id = msg.channel_id.get(),
            "running command"
        );
        let reply = self.commands.execute(msg.channel_id.get(), command).await;
        self.send_reply(&ctx, &msg, reply).await;
    }

    async fn cache_ready(&self, _ctx: Context, guilds: Vec<GuildId>) {
        debug!(guild_count = guilds.len(), "discord cache ready");
    }
}
