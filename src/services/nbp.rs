use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    config::CODE_PLACEHOLDER,
    error::{AppError, RateFailure},
    services::currency::RateProvider,
};

/// Mid rates from the NBP exchange-rate table A.
pub struct NbpRateProvider {
    client: reqwest::Client,
    url_template: String,
    timeout: Duration,
}

impl NbpRateProvider {
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("trips/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("failed to build rate provider client")?;
        Ok(Self {
            client,
            url_template: url_template.into(),
            timeout,
        })
    }

    fn url_for(&self, code: &str) -> String {
        self.url_template.replace(CODE_PLACEHOLDER, code)
    }

    fn unavailable(&self, code: &str, err: reqwest::Error) -> AppError {
        let failure = if err.is_timeout() {
            RateFailure::Timeout {
                after: self.timeout,
                source: err,
            }
        } else {
            RateFailure::Transport(err)
        };
        AppError::RateUnavailable {
            code: code.to_string(),
            failure,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RateTable {
    rates: Vec<TableRate>,
}

#[derive(Debug, Deserialize)]
struct TableRate {
    mid: f64,
}

#[async_trait]
impl RateProvider for NbpRateProvider {
    #[instrument(name = "NbpRateFetch", skip(self), fields(code = %code))]
    async fn mid_rate(&self, code: &str) -> Result<f64, AppError> {
        let url = self.url_for(code);
        debug!("Requesting mid rate from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.unavailable(code, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::RateUnavailable {
                code: code.to_string(),
                failure: RateFailure::Rejected(status),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.unavailable(code, err))?;
        let table: RateTable = serde_json::from_slice(&body)
            .map_err(|err| AppError::malformed(code, err.to_string()))?;

        table
            .rates
            .first()
            .map(|rate| rate.mid)
            .ok_or_else(|| AppError::malformed(code, "rates list is empty"))
    }
}
