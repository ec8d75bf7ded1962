//! Guest-side logic: local validation, simulated progress, gallery polling,
//! lightbox navigation and downloads.

pub mod download;
pub mod gallery_client;
pub mod lightbox;
pub mod notification;
pub mod poller;
pub mod progress;

use thiserror::Error;

use crate::errors::UploadError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally, nothing was sent.
    #[error(transparent)]
    Rejected(#[from] UploadError),

    #[error("{message}")]
    Api { code: String, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
