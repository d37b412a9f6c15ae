use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::BillSplitError;

#[derive(Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// `csv` (default) or `json`
    pub format: Option<String>,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for BillSplitError to implement IntoResponse
pub struct ApiError(pub BillSplitError);

impl From<BillSplitError> for ApiError {
    fn from(err: BillSplitError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            BillSplitError::SessionNotFound(_)
            | BillSplitError::MemberNotFound(_)
            | BillSplitError::ExpenseNotFound(_) => StatusCode::NOT_FOUND,
            BillSplitError::InvalidInput(_, _)
            | BillSplitError::EmptyParticipants
            | BillSplitError::InvalidSplit(_, _)
            | BillSplitError::UnknownParticipant(_)
            | BillSplitError::InvalidGroup(_)
            | BillSplitError::InvalidMessage(_)
            | BillSplitError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            BillSplitError::NotJoined => StatusCode::CONFLICT,
            BillSplitError::ExportError(_)
            | BillSplitError::StorageError(_)
            | BillSplitError::LoggingError(_)
            | BillSplitError::CacheError(_)
            | BillSplitError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error_message = match self.0 {
            BillSplitError::InvalidInput(_, field) => format!("{}: {}", field.title, field.description),
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}
