use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::models::PageMeta;

/// Wrapper for API responses that adds the `{success, message, data}`
/// envelope, plus pagination metadata on list endpoints.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<PageMeta>,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with a payload
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta: None,
            status_code: StatusCode::OK,
        }
    }

    /// 201 Created with a payload
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta: None,
            status_code: StatusCode::CREATED,
        }
    }

    /// 200 OK with a payload and pagination metadata
    pub fn paginated(message: impl Into<String>, data: T, meta: PageMeta) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta: Some(meta),
            status_code: StatusCode::OK,
        }
    }

    /// 200 OK carrying only a message
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            meta: None,
            status_code: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match self.data {
            Some(data) => match serde_json::to_value(&data) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "message": "Failed to format response",
                            "error": "INTERNAL_SERVER_ERROR",
                        })),
                    )
                        .into_response();
                }
            },
            None => None,
        };

        let mut envelope = json!({
            "success": true,
            "message": self.message,
        });
        if let Some(data) = data_value {
            envelope["data"] = data;
        }
        if let Some(meta) = self.meta {
            envelope["meta"] = json!(meta);
        }

        (self.status_code, Json(envelope)).into_response()
    }
}

/// Convenience alias for handler return types
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
