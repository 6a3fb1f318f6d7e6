use std::path::PathBuf;

use thiserror::Error;

/// The page could not be fetched. Nothing can be compared without it.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The snapshot file could not be read or written.
#[derive(Debug, Error)]
#[error("failed to {action} snapshot at {}", path.display())]
pub struct StorageError {
    pub action: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Sending the change email failed. Always logged and swallowed.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("invalid mail address {address:?}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("failed to build message")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport failed")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
