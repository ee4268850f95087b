use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum MealError {
    #[error("invalid meal type: {0:?}")]
    InvalidMealType(String),

    #[error("invalid nutrient payload: {0}")]
    InvalidPayload(String),

    #[error("image store failed")]
    ImageStoreFailed(#[source] anyhow::Error),

    #[error("food recognition failed")]
    RecognitionFailed(#[source] anyhow::Error),

    #[error("blob not found: {0}")]
    NotFound(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// One recognized item was dropped from a meal because its nutrient profile
/// could not be resolved. Reported alongside the created record, never as a
/// hard failure.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResolutionWarning {
    pub item: String,
    pub reason: String,
}

impl IntoResponse for MealError {
    fn into_response(self) -> Response {
        let status = match &self {
            MealError::InvalidMealType(_)
            | MealError::InvalidPayload(_)
            | MealError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            MealError::NotFound(_) => StatusCode::NOT_FOUND,
            MealError::RecognitionFailed(_) => StatusCode::BAD_GATEWAY,
            MealError::ImageStoreFailed(_) | MealError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn validation_errors_map_to_bad_request() {
        for err in [
            MealError::InvalidMealType("brunch".into()),
            MealError::InvalidPayload("not json".into()),
            MealError::InvalidDate("2024-13-01".into()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn upstream_failures_map_to_server_side_statuses() {
        let recognition = MealError::RecognitionFailed(anyhow!("model unavailable"));
        assert_eq!(recognition.into_response().status(), StatusCode::BAD_GATEWAY);

        let store = MealError::ImageStoreFailed(anyhow!("disk full"));
        assert_eq!(
            store.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_blob_reference_maps_to_not_found() {
        let err = MealError::NotFound("meals/nope.jpg".into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
