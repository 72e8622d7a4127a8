use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;

use crate::service::HrError;

impl ResponseError for HrError {
    fn status_code(&self) -> StatusCode {
        match self {
            HrError::Validation(_) => StatusCode::BAD_REQUEST,
            HrError::NotFound { .. } => StatusCode::NOT_FOUND,
            HrError::Conflict(_) => StatusCode::CONFLICT,
            HrError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            HrError::Validation(_) => json!({ "errors": self.violations() }),
            HrError::NotFound { .. } => json!({ "message": self.to_string() }),
            HrError::Conflict(e) => {
                tracing::warn!(error = %e, "Write rejected by a constraint");
                json!({
                    "message": "The record was changed or already exists, reload and try again"
                })
            }
            HrError::Storage(e) => {
                tracing::error!(error = %e, "Storage failure");
                json!({ "message": "Internal Server Error" })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Request-format failure raised before the engine is called.
pub fn bad_request(message: impl Into<String>) -> HrError {
    HrError::invalid(message)
}
