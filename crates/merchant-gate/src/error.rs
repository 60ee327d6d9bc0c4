use crate::config::ConfigError;
use crate::eligibility::access::AccessError;
use crate::eligibility::domain::MerchantId;
use crate::eligibility::seed::SeedError;
use crate::eligibility::EligibilityServiceError;
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
    Seed(SeedError),
    Eligibility(EligibilityServiceError),
    InvalidMerchantId(uuid::Error),
    MerchantNotFound(MerchantId),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Seed(err) => write!(f, "seed error: {}", err),
            AppError::Eligibility(err) => write!(f, "{}", err),
            AppError::InvalidMerchantId(err) => write!(f, "invalid merchant id: {}", err),
            AppError::MerchantNotFound(id) => write!(f, "merchant {} not found", id),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Seed(err) => Some(err),
            AppError::Eligibility(err) => Some(err),
            AppError::InvalidMerchantId(err) => Some(err),
            AppError::MerchantNotFound(_) => None,
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidMerchantId(_) => StatusCode::BAD_REQUEST,
            AppError::MerchantNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Eligibility(EligibilityServiceError::Access(AccessError::Unauthenticated)) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Eligibility(EligibilityServiceError::Access(AccessError::Forbidden {
                ..
            })) => StatusCode::FORBIDDEN,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Seed(_)
            | AppError::Eligibility(EligibilityServiceError::Directory(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
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

impl From<SeedError> for AppError {
    fn from(value: SeedError) -> Self {
        Self::Seed(value)
    }
}

impl From<EligibilityServiceError> for AppError {
    fn from(value: EligibilityServiceError) -> Self {
        Self::Eligibility(value)
    }
}

impl From<uuid::Error> for AppError {
    fn from(value: uuid::Error) -> Self {
        Self::InvalidMerchantId(value)
    }
}
