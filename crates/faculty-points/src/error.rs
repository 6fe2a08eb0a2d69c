use crate::config::ConfigError;
use crate::import::ActivityImportError;
use crate::points::PeriodError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Import(ActivityImportError),
    Period(PeriodError),
    UnknownResearcher(i64),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Period(err) => write!(f, "invalid period: {}", err),
            AppError::UnknownResearcher(id) => write!(f, "researcher {} not found", id),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Period(err) => Some(err),
            AppError::UnknownResearcher(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Import(_) | AppError::Period(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownResearcher(_) => StatusCode::NOT_FOUND,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ActivityImportError> for AppError {
    fn from(value: ActivityImportError) -> Self {
        Self::Import(value)
    }
}

impl From<PeriodError> for AppError {
    fn from(value: PeriodError) -> Self {
        Self::Period(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_client_errors_to_bad_request() {
        let response =
            AppError::from(PeriodError::InvalidMonth("13".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn maps_unknown_researchers_to_not_found() {
        let response = AppError::UnknownResearcher(42).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
