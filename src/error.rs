use actix::MailboxError;
use elasticsearch::Error as ElasticError;
use serde_json::error::Error as SerializeJsonError;
use thiserror::Error as ThisError;
use url::ParseError as UrlParseError;

use std::io::Error as IoError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Io Error: `{0:?}`")]
    IoError(#[from] IoError),
    #[error("Elastic Error: `{0:?}`")]
    ElasticError(#[from] ElasticError),
    #[error("Url Parse Error: `{0:?}`")]
    UrlParseError(#[from] UrlParseError),
    #[error("Parse Error: `{0:?}`")]
    ParseError(#[from] SerializeJsonError),
    #[error("Protocol Error: {0}")]
    ProtocolError(String),
    #[error("Timeout Error: {0}")]
    TimeoutError(String),
    #[error("Usage Error: {0}")]
    UsageError(String),
    #[error("Config Error: {0}")]
    ConfigError(String),
    #[error("Status Error: `{status}`: {body}")]
    StatusError { status: u16, body: String },
    #[error("Mailbox Error: `{0:?}`")]
    MailboxError(#[from] MailboxError),
}

pub type Result<T> = std::result::Result<T, Error>;
