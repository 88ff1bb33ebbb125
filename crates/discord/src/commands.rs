//! Prefix commands: parsing, gating tiers and execution against the engine.
//!
//! Nothing here touches Discord types; the handler turns a [`Reply`] into
//! messages.

use std::sync::Arc;

use tracing::{debug, error};

use feedwatch_feeds::{
    DestinationId, Error, FeedClient, FeedItem, SubscriptionRegistry, normalize_feed_name,
};

use crate::access::CommandTier;

pub const MISSING_ROLE: &str = "You are missing the required role to run this command!";
pub const BAD_INPUT: &str =
    "Something about your input was wrong, please check your input and try again!";
pub const GENERIC_FAILURE: &str = "Oh no! Something went wrong while running the command!";

/// A parsed command with normalized arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Subscribe { feed: String },
    Unsubscribe { feed: String },
    Fetch { name: String, search: Option<String> },
    Subscribed,
    Ban { feed: String },
    Unban { feed: String },
    Banned,
    Help,
}

/// Name, argument synopsis and help text, in help order.
const COMMANDS: &[(&str, &str, &str)] = &[
    ("sub", "<subreddit>", "Subscribe this channel to a subreddit"),
    ("unsub", "<subreddit>", "Unsubscribe this channel from a subreddit"),
    (
        "fetch",
        "<subreddit|user> [search terms]",
        "Fetch the newest post, or the first whose title matches",
    ),
    ("subbed", "", "List all subscribed subreddits"),
    ("ban", "<subreddit>", "Ban a subreddit and drop its subscriptions"),
    ("unban", "<subreddit>", "Unban a subreddit"),
    ("banned", "", "List all banned subreddits"),
    ("help", "", "Show this list"),
];

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Subscribe { .. } => "sub",
            Self::Unsubscribe { .. } => "unsub",
            Self::Fetch { .. } => "fetch",
            Self::Subscribed => "subbed",
            Self::Ban { .. } => "ban",
            Self::Unban { .. } => "unban",
            Self::Banned => "banned",
            Self::Help => "help",
        }
    }

    pub fn tier(&self) -> CommandTier {
        match self {
            Self::Subscribe { .. } | Self::Unsubscribe { .. } | Self::Ban { .. } | Self::Unban { .. } => {
                CommandTier::Advanced
            },
            Self::Fetch { .. } | Self::Subscribed | Self::Banned => CommandTier::Normal,
            Self::Help => CommandTier::Anyone,
        }
    }
}

/// Why a message did not yield a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No prefix; not meant for the bot.
    NotACommand,
    Unknown(String),
    MissingArgument { command: &'static str },
}

/// Parse `text` as `<prefix><command> [args...]`.
pub fn parse(prefix: &str, text: &str) -> Result<Command, ParseError> {
    let Some(rest) = text.trim_start().strip_prefix(prefix) else {
        return Err(ParseError::NotACommand);
    };
    let mut words = rest.split_whitespace();
    let Some(name) = words.next() else {
        return Err(ParseError::NotACommand);
    };
    let name = name.to_lowercase();

    let mut feed_arg = |command: &'static str| {
        words
            .next()
            .map(normalize_feed_name)
            .filter(|feed| !feed.is_empty())
            .ok_or(ParseError::MissingArgument { command })
    };

    let command = match name.as_str() {
        "sub" => Command::Subscribe {
            feed: feed_arg("sub")?,
        },
        "unsub" => Command::Unsubscribe {
            feed: feed_arg("unsub")?,
        },
        "ban" => Command::Ban {
            feed: feed_arg("ban")?,
        },
        "unban" => Command::Unban {
            feed: feed_arg("unban")?,
        },
        "fetch" => {
            let name = feed_arg("fetch")?;
            let search = words.collect::<Vec<_>>().join(" ");
            Command::Fetch {
                name,
                search: (!search.is_empty()).then_some(search),
            }
        },
        "subbed" => Command::Subscribed,
        "banned" => Command::Banned,
        "help" => Command::Help,
        _ => return Err(ParseError::Unknown(name)),
    };
    Ok(command)
}

/// What to send back to the channel a command came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Post(Box<FeedItem>),
    Listing { title: String, lines: Vec<String> },
}

impl Reply {
    fn text(message: impl Into<String>) -> Self {
        Self::Text(message.into())
    }
}

/// Runs commands against the registry and the feed client.
pub struct CommandService {
    registry: Arc<SubscriptionRegistry>,
    client: Arc<dyn FeedClient>,
    prefix: String,
}

impl CommandService {
    pub fn new(
        registry: Arc<SubscriptionRegistry>,
        client: Arc<dyn FeedClient>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            client,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Execute `command` issued in `destination`. Failures become replies.
    pub async fn execute(&self, destination: DestinationId, command: Command) -> Reply {
        let name = command.name();
        match self.run(destination, command).await {
            Ok(reply) => reply,
            Err(e) if e.is_user_error() => {
                debug!(command = name, destination, error = %e, "command rejected");
                Reply::text(user_message(&e))
            },
            Err(e) => {
                error!(command = name, destination, error = %e, "command failed");
                Reply::text(GENERIC_FAILURE)
            },
        }
    }

    async fn run(&self, destination: DestinationId, command: Command) -> feedwatch_feeds::Result<Reply> {
        let reply = match command {
            Command::Subscribe { feed } => {
                self.registry.subscribe(destination, &feed).await?;
                Reply::text(format!("Subreddit {feed} has been subscribed!"))
            },
            Command::Unsubscribe { feed } => {
                self.registry.unsubscribe(destination, &feed).await?;
                Reply::text(format!("Subreddit {feed} has been removed!"))
            },
            Command::Fetch { name, search } => self.fetch(&name, search.as_deref()).await?,
            Command::Subscribed => {
                let subs = self.registry.list_subscriptions().await;
                if subs.is_empty() {
                    Reply::text("No subreddits are currently subscribed!")
                } else {
                    Reply::Listing {
                        title: "Subscribed Subreddits".into(),
                        lines: subs
                            .iter()
                            .map(|s| format!("<#{}> r/{}", s.destination, s.feed))
                            .collect(),
                    }
                }
            },
            Command::Ban { feed } => {
                self.registry.ban(&feed).await?;
                Reply::text(format!("Subreddit {feed} has been banned!"))
            },
            Command::Unban { feed } => {
                self.registry.unban(&feed).await?;
                Reply::text(format!("Subreddit {feed} has been unbanned!"))
            },
            Command::Banned => {
                let banned = self.registry.list_banned().await;
                if banned.is_empty() {
                    Reply::text("No subreddits are currently banned!")
                } else {
                    Reply::Listing {
                        title: "Banned Subreddits".into(),
                        lines: banned.iter().map(|feed| format!("r/{feed}")).collect(),
                    }
                }
            },
            Command::Help => Reply::Listing {
                title: "Commands".into(),
                lines: help_lines(&self.prefix),
            },
        };
        Ok(reply)
    }

    async fn fetch(&self, name: &str, search: Option<&str>) -> feedwatch_feeds::Result<Reply> {
        if self.registry.is_banned(name).await {
            return Ok(Reply::text(format!(
                "Subreddit {name} is banned and cannot be fetched!"
            )));
        }
        match self.client.fetch_one(name, search).await {
            Ok(Some(item)) => Ok(Reply::Post(Box::new(item))),
            Ok(None) | Err(Error::FeedNotFound { .. }) => {
                Ok(Reply::text(format!("No results found for {name}!")))
            },
            Err(e) => Err(e),
        }
    }
}

fn user_message(err: &Error) -> String {
    match err {
        Error::AlreadySubscribed { feed, .. } => format!("Subreddit {feed} is already subscribed!"),
        Error::NotSubscribed { feed, .. } => format!("Subreddit {feed} is not subscribed!"),
        Error::Banned { feed } => {
            format!("Subreddit {feed} is banned and cannot be subscribed to!")
        },
        Error::FeedNotFound { feed } => format!("Subreddit {feed} does not exist!"),
        _ => BAD_INPUT.to_string(),
    }
}

fn help_lines(prefix: &str) -> Vec<String> {
    COMMANDS
        .iter()
        .map(|(name, args, help)| {
            if args.is_empty() {
                format!("`{prefix}{name}` {help}")
            } else {
                format!("`{prefix}{name} {args}` {help}")
            }
        })
        .collect()
}
