use std::path::Path;

use uuid::Uuid;

use crate::config::AppState;
use crate::errors::UploadError;
use crate::models::upload_model::{NewUpload, UploadListResponse, UploadResponse};

pub const DEFAULT_MAX_FILE_SIZE: usize = 50 * 1024 * 1024;
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 500;
pub const ANONYMOUS_GUEST: &str = "Anonymous";

pub const ALLOWED_MIME_TYPES: [&str; 8] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/webm",
    "video/quicktime",
];

/// Limits applied to every upload, on the guest's device and again in the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_size: usize,
    pub max_message_length: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }
}

impl UploadPolicy {
    /// Size first, then type.
    pub fn check_file(&self, size: usize, content_type: &str) -> Result<(), UploadError> {
        if size > self.max_file_size {
            return Err(UploadError::FileTooLarge {
                size,
                limit: self.max_file_size,
            });
        }

        if !ALLOWED_MIME_TYPES.contains(&content_type) {
            return Err(UploadError::InvalidFileType {
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }

    pub fn check_message(&self, message: Option<&str>) -> Result<(), UploadError> {
        match message {
            Some(m) if m.chars().count() > self.max_message_length => Err(UploadError::MessageTooLong {
                max: self.max_message_length,
            }),
            _ => Ok(()),
        }
    }
}

/// A file plus the optional note a guest sends with it.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub guest_name: Option<String>,
    pub message: Option<String>,
}

pub struct UploadService;

impl UploadService {
    /// Validates, stores the bytes, then records the row.
    ///
    /// The object write and the row insert are not atomic: if the insert
    /// fails the stored object stays behind and is only logged.
    pub async fn upload(state: &AppState, request: UploadRequest) -> Result<UploadResponse, UploadError> {
        let message = non_blank(request.message);

        state.policy.check_file(request.data.len(), &request.content_type)?;
        state.policy.check_message(message.as_deref())?;

        // 1. Object storage
        let key = storage_key(&request.file_name);
        let size = request.data.len();
        state
            .storage
            .upload(&key, request.data, &request.content_type)
            .await
            .map_err(|e| {
                tracing::error!(key = %key, "Storage error: {}", e);
                UploadError::Storage(e.to_string())
            })?;

        // 2. Public address
        let file_url = state.storage.public_url(&key);

        // 3. Metadata row
        let guest_name = non_blank(request.guest_name).unwrap_or_else(|| ANONYMOUS_GUEST.to_string());
        let saved = state
            .uploads
            .insert(NewUpload {
                guest_name,
                message,
                file_url,
            })
            .await
            .map_err(|e| {
                tracing::warn!(key = %key, "Row insert failed, stored object is orphaned: {}", e);
                UploadError::DatabaseWrite(e)
            })?;

        tracing::info!(id = saved.id, key = %key, size, "Upload stored");
        Ok(saved.into())
    }

    pub async fn list(state: &AppState) -> Result<UploadListResponse, UploadError> {
        let rows = state.uploads.list_recent().await.map_err(|e| {
            tracing::error!("Failed to list uploads: {}", e);
            UploadError::Database(e)
        })?;

        let data: Vec<UploadResponse> = rows.into_iter().map(UploadResponse::from).collect();
        Ok(UploadListResponse { total: data.len(), data })
    }

    pub async fn find(state: &AppState, id: i64) -> Result<UploadResponse, UploadError> {
        state
            .uploads
            .find(id)
            .await?
            .map(UploadResponse::from)
            .ok_or(UploadError::NotFound(id))
    }
}

/// `<uuid>-<file name>`, keeping only the last path component of what the guest sent.
pub fn storage_key(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("upload");
    format!("{}-{}", Uuid::now_v7(), base)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_state;
    use std::sync::atomic::Ordering;

    fn photo(size: usize) -> UploadRequest {
        UploadRequest {
            file_name: "first-dance.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: vec![7u8; size],
            guest_name: Some("Tante Rina".to_string()),
            message: Some("Selamat menempuh hidup baru!".to_string()),
        }
    }

    fn small_policy() -> UploadPolicy {
        UploadPolicy {
            max_file_size: 1024,
            max_message_length: 10,
        }
    }

    #[test]
    fn policy_accepts_every_listed_type() {
        let policy = UploadPolicy::default();
        for ty in ALLOWED_MIME_TYPES {
            assert!(policy.check_file(10, ty).is_ok(), "{ty}");
        }
        assert!(matches!(
            policy.check_file(10, "application/pdf"),
            Err(UploadError::InvalidFileType { .. })
        ));
        assert!(matches!(
            policy.check_file(DEFAULT_MAX_FILE_SIZE + 1, "image/png"),
            Err(UploadError::FileTooLarge { .. })
        ));
        assert!(policy.check_file(DEFAULT_MAX_FILE_SIZE, "image/png").is_ok());
    }

    #[test]
    fn message_limit_counts_characters_not_bytes() {
        let policy = small_policy();
        assert!(policy.check_message(Some("💕💕💕💕💕💕💕💕💕💕")).is_ok());
        assert!(matches!(
            policy.check_message(Some("12345678901")),
            Err(UploadError::MessageTooLong { max: 10 })
        ));
        assert!(policy.check_message(None).is_ok());
    }

    #[tokio::test]
    async fn oversize_file_never_reaches_storage() {
        let backends = test_state(small_policy(), "http://media.test");

        let err = UploadService::upload(&backends.state, photo(1025)).await.unwrap_err();

        assert!(matches!(err, UploadError::FileTooLarge { size: 1025, limit: 1024 }));
        assert_eq!(backends.storage.calls(), 0);
        assert_eq!(backends.uploads.len(), 0);
    }

    #[tokio::test]
    async fn disallowed_type_never_reaches_storage() {
        let backends = test_state(small_policy(), "http://media.test");
        let mut request = photo(10);
        request.content_type = "image/svg+xml".to_string();

        let err = UploadService::upload(&backends.state, request).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid file type! Please select an image or video.");
        assert_eq!(backends.storage.calls(), 0);
    }

    #[tokio::test]
    async fn long_message_never_reaches_storage() {
        let backends = test_state(small_policy(), "http://media.test");
        let mut request = photo(10);
        request.message = Some("x".repeat(11));

        let err = UploadService::upload(&backends.state, request).await.unwrap_err();

        assert_eq!(err.to_string(), "Message is too long! Maximum 10 characters.");
        assert_eq!(backends.storage.calls(), 0);
    }

    #[tokio::test]
    async fn successful_upload_adds_exactly_one_row() {
        let backends = test_state(UploadPolicy::default(), "http://media.test");
        let before = UploadService::list(&backends.state).await.unwrap().total;

        let saved = UploadService::upload(&backends.state, photo(2048)).await.unwrap();

        let after = UploadService::list(&backends.state).await.unwrap();
        assert_eq!(after.total, before + 1);
        assert_eq!(after.data[0], saved);

        let keys = backends.storage.keys();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].ends_with("-first-dance.jpg"));
        assert_eq!(saved.file_url, format!("http://media.test/pov-uploads/{}", keys[0]));
        assert_eq!(saved.guest_name.as_deref(), Some("Tante Rina"));

        let (bytes, content_type) = backends.storage.object(&keys[0]).unwrap();
        assert_eq!(bytes.len(), 2048);
        assert_eq!(content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn blank_guest_name_defaults_to_anonymous() {
        let backends = test_state(UploadPolicy::default(), "http://media.test");
        let mut request = photo(10);
        request.guest_name = Some("   ".to_string());
        request.message = Some(String::new());

        let saved = UploadService::upload(&backends.state, request).await.unwrap();

        assert_eq!(saved.guest_name.as_deref(), Some(ANONYMOUS_GUEST));
        assert_eq!(saved.message, None);
    }

    #[tokio::test]
    async fn storage_failure_skips_the_row_insert() {
        let backends = test_state(UploadPolicy::default(), "http://media.test");
        backends.storage.fail_uploads.store(true, Ordering::SeqCst);

        let err = UploadService::upload(&backends.state, photo(10)).await.unwrap_err();

        assert_eq!(err.to_string(), "Upload failed: The resource already exists");
        assert_eq!(backends.uploads.len(), 0);
    }

    #[tokio::test]
    async fn row_failure_leaves_the_object_in_place() {
        let backends = test_state(UploadPolicy::default(), "http://media.test");
        backends.uploads.fail_inserts.store(true, Ordering::SeqCst);

        let err = UploadService::upload(&backends.state, photo(10)).await.unwrap_err();

        assert_eq!(err.code(), "DB_WRITE_ERR");
        assert_eq!(err.to_string(), "Database error: new row violates row-level security policy");
        assert_eq!(backends.storage.keys().len(), 1);
        assert_eq!(backends.uploads.len(), 0);
    }

    #[tokio::test]
    async fn find_unknown_id_is_not_found() {
        let backends = test_state(UploadPolicy::default(), "http://media.test");
        assert!(matches!(
            UploadService::find(&backends.state, 42).await,
            Err(UploadError::NotFound(42))
        ));
    }

    #[test]
    fn storage_key_strips_directories() {
        let key = storage_key("../../etc/IMG 0001.HEIC.jpg");
        assert!(key.ends_with("-IMG 0001.HEIC.jpg"), "{key}");
        assert!(!key.contains('/'));
        assert!(storage_key("").ends_with("-upload"));
    }
}
