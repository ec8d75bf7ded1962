use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::upload;

/// One guest-submitted media item as the gallery sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub guest_name: Option<String>,
    pub message: Option<String>,
    pub file_url: String,
}

impl From<upload::Model> for UploadResponse {
    fn from(m: upload::Model) -> Self {
        Self {
            id: m.id,
            created_at: m.created_at,
            guest_name: m.guest_name,
            message: m.message,
            file_url: m.file_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadListResponse {
    pub data: Vec<UploadResponse>,
    pub total: usize,
}

/// Row to insert once the media object is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUpload {
    pub guest_name: String,
    pub message: Option<String>,
    pub file_url: String,
}
