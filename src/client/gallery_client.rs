use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::client::download::download_upload;
use crate::client::notification::{Notification, NotificationSlot};
use crate::client::poller::GallerySource;
use crate::client::progress::UploadProgress;
use crate::client::ClientError;
use crate::errors::UploadError;
use crate::models::upload_model::{UploadListResponse, UploadResponse};
use crate::services::media_fetcher::MediaFetcher;
use crate::services::upload_service::UploadPolicy;
use crate::utils::api_response::ApiResponse;

/// A file picked on the guest's device.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl LocalFile {
    pub fn size_mb(&self) -> f64 {
        self.data.len() as f64 / 1024.0 / 1024.0
    }
}

/// Talks to the gallery service the way the guest pages do.
#[derive(Clone)]
pub struct GalleryClient {
    base_url: String,
    http: Client,
    policy: UploadPolicy,
}

impl GalleryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
            policy: UploadPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Checks a picked file locally. The notice echoes name and size.
    pub fn select_file(&self, file: &LocalFile) -> Result<Notification, UploadError> {
        self.policy.check_file(file.data.len(), &file.content_type)?;
        Ok(Notification::info(format!("Selected: {} ({:.2} MB)", file.name, file.size_mb())))
    }

    pub async fn list_uploads(&self) -> Result<Vec<UploadResponse>, ClientError> {
        let response = self.http.get(self.endpoint("/api/uploads")).send().await?;
        let list: UploadListResponse = decode(response).await?;
        Ok(list.data)
    }

    /// Uploads one file with simulated progress. Validation happens before any request is made.
    pub async fn upload(
        &self,
        file: Option<LocalFile>,
        guest_name: &str,
        message: &str,
        progress: &UploadProgress,
        notifications: &mut NotificationSlot,
    ) -> Result<UploadResponse, ClientError> {
        let result = self.send_upload(file, guest_name, message, progress, notifications).await;

        match &result {
            Ok(_) => notifications.show(Notification::success("Memory uploaded successfully! 🎉")),
            Err(e) => {
                progress.reset();
                let text = match e {
                    ClientError::Http(e) => format!("Upload failed: {}", e),
                    other => other.to_string(),
                };
                notifications.show(Notification::error(text));
            }
        }

        result
    }

    async fn send_upload(
        &self,
        file: Option<LocalFile>,
        guest_name: &str,
        message: &str,
        progress: &UploadProgress,
        notifications: &mut NotificationSlot,
    ) -> Result<UploadResponse, ClientError> {
        let file = file.ok_or(UploadError::MissingFile)?;
        self.policy.check_file(file.data.len(), &file.content_type)?;
        self.policy.check_message(Some(message))?;

        let simulation = progress.start_simulation();
        notifications.show(Notification::info("Uploading your memory..."));

        let part = Part::bytes(file.data)
            .file_name(file.name)
            .mime_str(&file.content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("guest_name", guest_name.to_string())
            .text("message", message.to_string());

        let response = self
            .http
            .post(self.endpoint("/api/uploads"))
            .multipart(form)
            .send()
            .await?;
        drop(simulation);

        if response.status().is_success() {
            progress.mark_stored();
        }
        let saved: UploadResponse = decode(response).await?;
        progress.complete();

        Ok(saved)
    }

    pub async fn download(
        &self,
        upload: &UploadResponse,
        dir: &Path,
        notifications: &mut NotificationSlot,
    ) -> Option<PathBuf> {
        let fetcher = MediaFetcher::new(self.http.clone());
        download_upload(&fetcher, upload, dir, notifications).await
    }
}

#[async_trait]
impl GallerySource for GalleryClient {
    async fn fetch_uploads(&self) -> Result<Vec<UploadResponse>, ClientError> {
        self.list_uploads().await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let envelope: ApiResponse<T> = response.json().await?;
    envelope
        .into_data()
        .map_err(|(code, message)| ClientError::Api { code, message })
}
