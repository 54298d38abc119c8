//! Currency code validation and base-currency conversion.

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use crate::{
    error::{AppError, InputError},
    models::rate::Rate,
};

/// Fractional digits of every converted amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Source of mid rates, quoted as base-currency units per one unit of `code`.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn mid_rate(&self, code: &str) -> Result<f64, AppError>;
}

/// Exactly three uppercase Latin letters.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Trims and uppercases `code`. The base currency is accepted as is, anything
/// else must look like an ISO 4217 code.
pub fn validate_currency(code: &str, base: &str) -> Result<String, InputError> {
    let normalized = code.trim().to_uppercase();
    if normalized == base {
        return Ok(normalized);
    }
    if !is_currency_code(&normalized) {
        return Err(InputError::InvalidCurrencyCode(normalized));
    }
    Ok(normalized)
}

/// Decimal value of a float as it prints, so `4.3` becomes exactly `4.3`.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

/// Rounds half-up to two fractional digits and keeps trailing zeros.
pub fn round_amount(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_SCALE);
    rounded
}

#[derive(Clone)]
pub struct CurrencyConverter {
    base: String,
    provider: Arc<dyn RateProvider>,
}

impl CurrencyConverter {
    pub fn new(base: impl Into<String>, provider: Arc<dyn RateProvider>) -> Self {
        Self {
            base: base.into(),
            provider,
        }
    }

    pub fn base_currency(&self) -> &str {
        &self.base
    }

    pub fn validate(&self, code: &str) -> Result<String, AppError> {
        Ok(validate_currency(code, &self.base)?)
    }

    pub async fn fetch_rate(&self, code: &str) -> Result<Rate, AppError> {
        let code = self.validate(code)?;
        if code == self.base {
            return Ok(Rate {
                currency: code,
                mid: Decimal::ONE,
            });
        }

        let raw = self.provider.mid_rate(&code).await.inspect_err(|err| {
            warn!(currency = %code, error = %err, "rate lookup failed");
        })?;
        let mid = match decimal_from_f64(raw) {
            Some(mid) if mid > Decimal::ZERO => mid,
            _ => {
                return Err(AppError::malformed(
                    code,
                    format!("expected a positive mid rate, got {raw}"),
                ))
            }
        };
        debug!(currency = %code, %mid, "fetched mid rate");
        Ok(Rate {
            currency: code,
            mid,
        })
    }

    /// Converts a base-currency amount into `code`, rounded half-up to two
    /// decimal places.
    pub async fn convert(&self, amount: Decimal, code: &str) -> Result<Decimal, AppError> {
        if amount < Decimal::ZERO {
            return Err(InputError::NegativeAmount(amount).into());
        }

        let rate = self.fetch_rate(code).await?;
        let quotient = amount.checked_div(rate.mid).ok_or_else(|| {
            AppError::malformed(
                &rate.currency,
                format!("rate {} puts {amount} out of range", rate.mid),
            )
        })?;

        Ok(round_amount(quotient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedRate {
        mid: f64,
        calls: AtomicUsize,
    }

    impl FixedRate {
        fn new(mid: f64) -> Arc<Self> {
            Arc::new(Self {
                mid,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateProvider for FixedRate {
        async fn mid_rate(&self, _code: &str) -> Result<f64, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.mid)
        }
    }

    fn converter(provider: Arc<FixedRate>) -> CurrencyConverter {
        CurrencyConverter::new("PLN", provider)
    }

    #[test]
    fn valid_codes_are_normalized() {
        assert_eq!(validate_currency(" eur ", "PLN").unwrap(), "EUR");
        assert_eq!(validate_currency("Usd", "PLN").unwrap(), "USD");
        assert_eq!(validate_currency("\tpln\n", "PLN").unwrap(), "PLN");
    }

    #[test]
    fn malformed_codes_are_rejected() {
        for code in ["", "EU", "EURO", "E1R", "E R", "€UR", "ÉUR"] {
            let err = validate_currency(code, "PLN").unwrap_err();
            match err {
                InputError::InvalidCurrencyCode(seen) => {
                    assert_eq!(seen, code.trim().to_uppercase())
                }
                other => panic!("unexpected error for {code:?}: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn base_currency_converts_without_lookup() {
        let provider = FixedRate::new(4.3);
        let converted = converter(provider.clone())
            .convert(dec!(100.00), "pln")
            .await
            .unwrap();
        assert_eq!(converted.to_string(), "100.00");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn negative_amount_fails_before_lookup() {
        let provider = FixedRate::new(4.3);
        let err = converter(provider.clone())
            .convert(dec!(-1.00), "EUR")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidInput(InputError::NegativeAmount(_))
        ));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_code_fails_before_lookup() {
        let provider = FixedRate::new(4.3);
        let err = converter(provider.clone())
            .convert(dec!(10), "EURO")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidInput(InputError::InvalidCurrencyCode(ref code)) if code == "EURO"
        ));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn converts_with_exact_rounding() {
        let provider = FixedRate::new(4.3);
        let converted = converter(provider.clone())
            .convert(dec!(100.00), "EUR")
            .await
            .unwrap();
        assert_eq!(converted, dec!(23.26));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn rounds_midpoint_up() {
        let converted = converter(FixedRate::new(2.0))
            .convert(dec!(0.25), "USD")
            .await
            .unwrap();
        assert_eq!(converted.to_string(), "0.13");
    }

    #[tokio::test]
    async fn keeps_two_fractional_digits() {
        let converted = converter(FixedRate::new(4.0))
            .convert(dec!(80.8), "CHF")
            .await
            .unwrap();
        assert_eq!(converted.to_string(), "20.20");
    }

    #[test]
    fn round_amount_pads_and_rounds() {
        assert_eq!(round_amount(dec!(100)).to_string(), "100.00");
        assert_eq!(round_amount(dec!(0.125)).to_string(), "0.13");
        assert_eq!(round_amount(dec!(19.994)).to_string(), "19.99");
    }

    #[tokio::test]
    async fn zero_rate_is_malformed() {
        let err = converter(FixedRate::new(0.0))
            .convert(dec!(100), "EUR")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedRateResponse { .. }));
    }

    #[tokio::test]
    async fn negative_rate_is_malformed() {
        let err = converter(FixedRate::new(-4.3))
            .fetch_rate("EUR")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedRateResponse { .. }));
    }

    #[tokio::test]
    async fn fetch_rate_reports_normalized_code() {
        let rate = converter(FixedRate::new(3.9512))
            .fetch_rate(" usd")
            .await
            .unwrap();
        assert_eq!(rate.currency, "USD");
        assert_eq!(rate.mid, dec!(3.9512));
    }
}
