use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

use crate::utils::api_response::ResponseBuilder;

const MIB: usize = 1024 * 1024;

/// Everything that can stop an upload, a listing or a download.
///
/// The `Display` text is what the guest sees.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please select a photo or video!")]
    MissingFile,

    #[error("File is too large! Please select a file under {}MB.", .limit / MIB)]
    FileTooLarge { size: usize, limit: usize },

    #[error("Invalid file type! Please select an image or video.")]
    InvalidFileType { content_type: String },

    #[error("Message is too long! Maximum {max} characters.")]
    MessageTooLong { max: usize },

    #[error("Failed to read upload: {0}")]
    Multipart(String),

    /// Object storage rejected the bytes.
    #[error("Upload failed: {0}")]
    Storage(String),

    /// Row store rejected the metadata row. The stored object is left behind.
    #[error("Database error: {}", backend_text(.0))]
    DatabaseWrite(DbErr),

    /// Row store rejected a query.
    #[error("Database error: {}", backend_text(.0))]
    Database(#[from] DbErr),

    #[error("Upload {0} not found")]
    NotFound(i64),

    #[error("Download failed: {0}")]
    Download(String),
}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::MissingFile
            | UploadError::FileTooLarge { .. }
            | UploadError::InvalidFileType { .. }
            | UploadError::MessageTooLong { .. }
            | UploadError::Multipart(_) => StatusCode::BAD_REQUEST,
            UploadError::Storage(_) | UploadError::DatabaseWrite(_) | UploadError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            UploadError::NotFound(_) => StatusCode::NOT_FOUND,
            UploadError::Download(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            UploadError::MissingFile => "MISSING_FILE",
            UploadError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            UploadError::InvalidFileType { .. } => "INVALID_FILE_TYPE",
            UploadError::MessageTooLong { .. } => "MESSAGE_TOO_LONG",
            UploadError::Multipart(_) => "UPLOAD_ERR",
            UploadError::Storage(_) => "STORAGE_UPLOAD_ERR",
            UploadError::DatabaseWrite(_) => "DB_WRITE_ERR",
            UploadError::Database(_) => "DB_ERR",
            UploadError::NotFound(_) => "UPLOAD_NOT_FOUND",
            UploadError::Download(_) => "DOWNLOAD_FAILED",
        }
    }

    /// Validation failures are caught before anything leaves the process.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            UploadError::MissingFile
                | UploadError::FileTooLarge { .. }
                | UploadError::InvalidFileType { .. }
                | UploadError::MessageTooLong { .. }
        )
    }
}

/// The backend's own message, without sea-orm's variant prefix.
fn backend_text(err: &DbErr) -> String {
    match err {
        DbErr::Custom(text) => text.clone(),
        DbErr::Conn(inner) | DbErr::Exec(inner) | DbErr::Query(inner) => inner.to_string(),
        other => other.to_string(),
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        ResponseBuilder::error::<()>(self.status_code(), self.code(), &self.to_string()).into_response()
    }
}
