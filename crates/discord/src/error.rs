use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Serenity(#[from] serenity::Error),

    #[error("discord bot token is not configured")]
    MissingToken,
}

pub type Result<T> = std::result::Result<T, Error>;
