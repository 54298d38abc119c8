use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    error::{AppError, InputError},
    services::currency::decimal_from_f64,
};

/// A stored trip. Prices are always in the base currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: i64,
    pub destination: String,
    pub month: String,
    pub price: Decimal,
}

#[derive(Debug, FromRow)]
pub(crate) struct TripRow {
    pub id: i64,
    pub destination: String,
    pub month: String,
    pub price: f64,
}

impl TryFrom<TripRow> for Trip {
    type Error = AppError;

    fn try_from(row: TripRow) -> Result<Self, Self::Error> {
        let price = decimal_from_f64(row.price).ok_or_else(|| {
            AppError::Persistence(sqlx::Error::Decode(
                format!("trip {} has unreadable price {}", row.id, row.price).into(),
            ))
        })?;
        Ok(Self {
            id: row.id,
            destination: row.destination,
            month: row.month,
            price,
        })
    }
}

/// Validated input for a new trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrip {
    destination: String,
    month: String,
    price: Decimal,
}

impl NewTrip {
    pub fn parse(destination: &str, month: &str, price: Decimal) -> Result<Self, InputError> {
        let destination = non_empty("destination", destination)?;
        let month = non_empty("month", month)?;
        if price < Decimal::ZERO {
            return Err(InputError::NegativeAmount(price));
        }
        Ok(Self {
            destination,
            month,
            price,
        })
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn price(&self) -> Decimal {
        self.price
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<String, InputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Request body of a trip creation.
#[derive(Debug, Clone, Deserialize)]
pub struct TripInput {
    pub destination: String,
    pub month: String,
    #[serde(alias = "price_pln", with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
}

/// A trip as shown to callers, priced in the requested currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripView {
    pub id: i64,
    pub destination: String,
    pub month: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    pub currency: String,
}

impl TripView {
    pub fn priced(trip: Trip, price: Decimal, currency: &str) -> Self {
        Self {
            id: trip.id,
            destination: trip.destination,
            month: trip.month,
            price,
            currency: currency.to_string(),
        }
    }
}
