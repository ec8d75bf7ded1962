use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::AppState;
use crate::errors::UploadError;
use crate::services::upload_service::{UploadRequest, UploadService};
use crate::utils::api_response::ResponseBuilder;
use crate::utils::media_utils::download_file_name;

/// Multipart fields: `file` (required), `guest_name`, `message`.
pub async fn create_upload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut guest_name: Option<String> = None;
    let mut message: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return read_error(e, &state, &headers).into_response(),
        };

        let name = field.name().unwrap_or("").to_string();
        let read = match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                field
                    .bytes()
                    .await
                    .map(|bytes| file = Some((file_name, content_type, bytes.to_vec())))
            }
            "guest_name" => field.text().await.map(|text| guest_name = Some(text)),
            "message" => field.text().await.map(|text| message = Some(text)),
            _ => Ok(()),
        };

        if let Err(e) = read {
            return read_error(e, &state, &headers).into_response();
        }
    }

    let Some((file_name, content_type, data)) = file else {
        return UploadError::MissingFile.into_response();
    };

    let request = UploadRequest {
        file_name,
        content_type,
        data,
        guest_name,
        message,
    };

    match UploadService::upload(&state, request).await {
        Ok(upload) => ResponseBuilder::created("UPLOAD_CREATED", "Memory uploaded successfully!", upload).into_response(),
        Err(e) => {
            if e.is_validation() {
                tracing::debug!(code = e.code(), "Upload rejected: {}", e);
            }
            e.into_response()
        }
    }
}

/// A body cut off by the request limit is an oversize file, not a broken form.
fn read_error(e: MultipartError, state: &AppState, headers: &HeaderMap) -> UploadError {
    if e.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return UploadError::Multipart(e.body_text());
    }

    let limit = state.policy.max_file_size;
    let size = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or_else(|| limit.saturating_add(1));
    tracing::debug!(size, limit, "Upload body exceeded the request limit");

    UploadError::FileTooLarge { size, limit }
}

pub async fn list_uploads_handler(State(state): State<AppState>) -> Response {
    match UploadService::list(&state).await {
        Ok(res) => ResponseBuilder::success("UPLOADS_FETCHED", "Success", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_upload_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match UploadService::find(&state, id).await {
        Ok(upload) => ResponseBuilder::success("UPLOAD_FETCHED", "Success", upload).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Streams the stored media back with its `wedding-memory-<id>.<ext>` name.
pub async fn download_upload_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let upload = match UploadService::find(&state, id).await {
        Ok(upload) => upload,
        Err(e) => return e.into_response(),
    };

    match state.media_fetcher.fetch(&upload.file_url).await {
        Ok(media) => {
            let file_name = download_file_name(upload.id, &upload.file_url);
            let content_type = media
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string());

            (
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
                ],
                media.bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(id, url = %upload.file_url, "Download error: {}", e);
            UploadError::Download(e.to_string()).into_response()
        }
    }
}
