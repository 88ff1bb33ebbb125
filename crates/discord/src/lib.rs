//! Discord front-end for feedwatch.
//!
//! Parses prefix commands, gates them on guild roles, runs them against the
//! subscription registry and delivers streamed posts as embeds.

pub mod access;
pub mod bot;
pub mod commands;
pub mod error;
pub mod handler;
pub mod outbound;
pub mod render;

pub use {
    access::{CommandTier, RoleConfig},
    bot::{build_client, run_until_cancelled},
    commands::{Command, CommandService, Reply},
    error::{Error, Result},
    handler::FeedwatchHandler,
    outbound::DiscordOutbound,
};
