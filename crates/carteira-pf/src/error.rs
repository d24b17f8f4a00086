use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::import::PortfolioImportError;
use crate::workflows::portfolio::{MappingError, PortfolioError};
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
    Server(axum::Error),
    Import(PortfolioImportError),
    Portfolio(PortfolioError),
    Serialization(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Portfolio(err) => write!(f, "portfolio error: {}", err),
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
            AppError::Import(err) => Some(err),
            AppError::Portfolio(err) => Some(err),
            AppError::Serialization(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Import(_) | AppError::Portfolio(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let missing: Vec<&str> = match &self {
            AppError::Portfolio(PortfolioError::Mapping(MappingError::MissingRequired(fields))) => {
                fields.iter().map(|field| field.key()).collect()
            }
            _ => Vec::new(),
        };

        let body = if missing.is_empty() {
            Json(json!({ "error": self.to_string() }))
        } else {
            Json(json!({ "error": self.to_string(), "missing_fields": missing }))
        };
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

impl From<PortfolioImportError> for AppError {
    fn from(value: PortfolioImportError) -> Self {
        Self::Import(value)
    }
}

impl From<PortfolioError> for AppError {
    fn from(value: PortfolioError) -> Self {
        Self::Portfolio(value)
    }
}

impl From<MappingError> for AppError {
    fn from(value: MappingError) -> Self {
        Self::Portfolio(PortfolioError::Mapping(value))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::portfolio::CanonicalField;

    #[test]
    fn mapping_errors_are_client_errors() {
        let err = AppError::from(MappingError::MissingRequired(vec![
            CanonicalField::ScoreBand,
            CanonicalField::AgencyIsMain,
        ]));

        assert!(err
            .to_string()
            .contains("map at least these fields to continue: score_band, agency_is_main"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn io_errors_are_server_errors() {
        let err = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));

        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
