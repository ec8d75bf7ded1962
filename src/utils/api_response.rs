use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// JSON envelope shared by every endpoint, also decoded by the client.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(status: &str, code: &str, message: &str, data: Option<T>) -> Self {
        Self {
            status: status.to_string(),
            code: code.to_string(),
            message: message.to_string(),
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Unwraps the payload, or hands back `(code, message)` for error envelopes.
    pub fn into_data(self) -> Result<T, (String, String)> {
        match (self.is_success(), self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err((self.code, "Response carried no data".to_string())),
            (false, _) => Err((self.code, self.message)),
        }
    }
}

// Wrapper to combine StatusCode and the Body
pub struct ApiResponseResult<T>(pub StatusCode, pub ApiResponse<T>);

impl<T> IntoResponse for ApiResponseResult<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

pub struct ResponseBuilder;

impl ResponseBuilder {
    pub fn success<T: Serialize>(code: &str, message: &str, data: T) -> ApiResponseResult<T> {
        ApiResponseResult(StatusCode::OK, ApiResponse::new("success", code, message, Some(data)))
    }

    pub fn created<T: Serialize>(code: &str, message: &str, data: T) -> ApiResponseResult<T> {
        ApiResponseResult(StatusCode::CREATED, ApiResponse::new("success", code, message, Some(data)))
    }

    pub fn error<T: Serialize>(status_code: StatusCode, code: &str, message: &str) -> ApiResponseResult<T> {
        ApiResponseResult(status_code, ApiResponse::new("error", code, message, None))
    }
}
