use crate::models::Category;
use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("unknown emission factor kind: {0}")]
    UnknownFactorKind(String),

    #[error("aggregation incomplete for category {category}: {reason}")]
    SourceUnavailable { category: Category, reason: String },

    #[error("could not estimate, try again: {0}")]
    EstimationUnavailable(String),

    #[error("invalid period: {0}")]
    InvalidPeriod(String),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "missing session".to_string(),
        }
    }

    pub fn superseded(period: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: format!("report for {period} superseded by a newer request"),
        }
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        let status = match &err {
            TrackerError::UnknownFactorKind(_) | TrackerError::InvalidPeriod(_) => {
                StatusCode::BAD_REQUEST
            }
            TrackerError::SourceUnavailable { .. } => StatusCode::BAD_GATEWAY,
            TrackerError::EstimationUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_errors_map_to_statuses() {
        let err: AppError = TrackerError::InvalidPeriod("2024-13".into()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err: AppError = TrackerError::EstimationUnavailable("timeout".into()).into();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.message.contains("try again"));

        let err: AppError = TrackerError::SourceUnavailable {
            category: Category::Travel,
            reason: "status 500".into(),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert!(err.message.contains("travel"));
    }
}
