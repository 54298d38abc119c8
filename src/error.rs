use std::time::Duration;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("exchange rate for {code} is unavailable: {failure}")]
    RateUnavailable {
        code: String,
        #[source]
        failure: RateFailure,
    },
    #[error("malformed rate response for {code}: {detail}")]
    MalformedRateResponse { code: String, detail: String },
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Caller mistakes. Always rendered as a client error.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Decimal),
    #[error("invalid currency code {0:?}")]
    InvalidCurrencyCode(String),
    #[error("price {0} cannot be stored")]
    PriceOutOfRange(Decimal),
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// Why the rate provider could not deliver a rate.
#[derive(Debug, Error)]
pub enum RateFailure {
    #[error("timed out after {after:?}")]
    Timeout {
        after: Duration,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not reach rate provider")]
    Transport(#[source] reqwest::Error),
    #[error("rate provider answered with status {0}")]
    Rejected(reqwest::StatusCode),
}

impl AppError {
    pub fn malformed(code: impl Into<String>, detail: impl Into<String>) -> Self {
        AppError::MalformedRateResponse {
            code: code.into(),
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::RateUnavailable { .. } | AppError::MalformedRateResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Config(_)
            | AppError::Persistence(_)
            | AppError::Io(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(InputError::MalformedBody(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self, "request failed");
        }

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
