use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::challenge::{ChallengeServiceError, RepositoryError};
use crate::workflows::dining::{CatalogueError, DiningError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Challenge(ChallengeServiceError),
    Dining(DiningError),
    Catalogue(CatalogueError),
    Serialization(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Challenge(err) => write!(f, "challenge error: {}", err),
            AppError::Dining(err) => write!(f, "dining error: {}", err),
            AppError::Catalogue(err) => write!(f, "catalogue error: {}", err),
            AppError::Serialization(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Challenge(err) => Some(err),
            AppError::Dining(err) => Some(err),
            AppError::Catalogue(err) => Some(err),
            AppError::Serialization(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Challenge(ChallengeServiceError::InvalidChallenge(_))
            | AppError::Challenge(ChallengeServiceError::Input(_))
            | AppError::Dining(DiningError::InvalidOrigin { .. })
            | AppError::Dining(DiningError::InvalidRadius(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Challenge(ChallengeServiceError::AlreadyJudged(_))
            | AppError::Challenge(ChallengeServiceError::Repository(RepositoryError::Conflict)) => {
                StatusCode::CONFLICT
            }
            AppError::Challenge(ChallengeServiceError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Dining(DiningError::Search(_)) => StatusCode::BAD_GATEWAY,
            AppError::Catalogue(_) => StatusCode::BAD_REQUEST,
            AppError::Challenge(ChallengeServiceError::Repository(RepositoryError::Unavailable(_)))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

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

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ChallengeServiceError> for AppError {
    fn from(value: ChallengeServiceError) -> Self {
        Self::Challenge(value)
    }
}

impl From<DiningError> for AppError {
    fn from(value: DiningError) -> Self {
        Self::Dining(value)
    }
}

impl From<CatalogueError> for AppError {
    fn from(value: CatalogueError) -> Self {
        Self::Catalogue(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
