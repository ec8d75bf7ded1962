use std::path::{Path, PathBuf};

use crate::client::notification::{Notification, NotificationSlot};
use crate::client::ClientError;
use crate::models::upload_model::UploadResponse;
use crate::services::media_fetcher::MediaFetcher;
use crate::utils::media_utils::download_file_name;

/// Re-fetches the media and writes it to `dir` as `wedding-memory-<id>.<ext>`.
pub async fn save_upload(fetcher: &MediaFetcher, upload: &UploadResponse, dir: &Path) -> Result<PathBuf, ClientError> {
    let media = fetcher.fetch(&upload.file_url).await?;
    let path = dir.join(download_file_name(upload.id, &upload.file_url));
    tokio::fs::write(&path, &media.bytes).await?;
    Ok(path)
}

/// [`save_upload`] with the guest-facing notifications around it.
pub async fn download_upload(
    fetcher: &MediaFetcher,
    upload: &UploadResponse,
    dir: &Path,
    notifications: &mut NotificationSlot,
) -> Option<PathBuf> {
    notifications.show(Notification::info("Downloading..."));

    match save_upload(fetcher, upload, dir).await {
        Ok(path) => {
            notifications.show(Notification::success("Downloaded successfully!"));
            Some(path)
        }
        Err(e) => {
            tracing::error!(id = upload.id, "Download error: {}", e);
            notifications.show(Notification::error("Download failed"));
            None
        }
    }
}
