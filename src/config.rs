use std::{env, net::SocketAddr, time::Duration};

use crate::{error::AppError, services::currency::is_currency_code};

pub const DEFAULT_BASE_CURRENCY: &str = "PLN";
pub const DEFAULT_RATE_PROVIDER_URL: &str =
    "https://api.nbp.pl/api/exchangerates/rates/A/{code}/?format=json";
pub const DEFAULT_RATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Placeholder replaced by the currency code in the rate provider URL.
pub const CODE_PLACEHOLDER: &str = "{code}";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub base_currency: String,
    pub rate_provider_url: String,
    pub rate_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://trips.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let base_currency = parse_base_currency(
            &env::var("BASE_CURRENCY").unwrap_or_else(|_| DEFAULT_BASE_CURRENCY.to_string()),
        )?;

        let rate_provider_url = env::var("RATE_PROVIDER_URL")
            .unwrap_or_else(|_| DEFAULT_RATE_PROVIDER_URL.to_string());
        if !rate_provider_url.contains(CODE_PLACEHOLDER) {
            return Err(AppError::Config(format!(
                "RATE_PROVIDER_URL must contain {CODE_PLACEHOLDER}"
            )));
        }

        let rate_timeout = match env::var("RATE_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_RATE_TIMEOUT,
        };

        Ok(Self {
            database_url,
            listen_addr,
            base_currency,
            rate_provider_url,
            rate_timeout,
        })
    }
}

fn parse_base_currency(raw: &str) -> Result<String, AppError> {
    let code = raw.trim().to_uppercase();
    if is_currency_code(&code) {
        Ok(code)
    } else {
        Err(AppError::Config(format!("invalid BASE_CURRENCY: {raw:?}")))
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(AppError::Config(format!(
            "invalid RATE_TIMEOUT_SECS: {raw:?}, expected a positive number of seconds"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_currency_is_normalized() {
        assert_eq!(parse_base_currency(" eur ").unwrap(), "EUR");
        assert!(matches!(
            parse_base_currency("EURO"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn timeout_must_be_positive() {
        assert_eq!(parse_timeout("7").unwrap(), Duration::from_secs(7));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }
}
