use rust_decimal::{prelude::ToPrimitive, Decimal};
use tracing::{debug, info};

use crate::{
    db::DbPool,
    error::{AppError, InputError},
    models::trip::{NewTrip, Trip, TripRow},
    services::currency::decimal_from_f64,
};

/// Append-only trip records backed by the `trips` table.
#[derive(Clone)]
pub struct TripStore {
    db: DbPool,
}

impl TripStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        destination: &str,
        month: &str,
        price: Decimal,
    ) -> Result<i64, AppError> {
        let trip = NewTrip::parse(destination, month, price)?;
        Ok(self.insert(&trip).await?.id)
    }

    /// Stores `trip` and returns the record as it will be read back. Prices the
    /// REAL column cannot hold exactly are rejected.
    pub async fn insert(&self, trip: &NewTrip) -> Result<Trip, AppError> {
        let price = storable_price(trip.price())?;

        let id = sqlx::query("INSERT INTO trips (destination, month, price) VALUES (?, ?, ?)")
            .bind(trip.destination())
            .bind(trip.month())
            .bind(price)
            .execute(&self.db)
            .await?
            .last_insert_rowid();

        info!(id, destination = trip.destination(), "trip created");
        Ok(Trip {
            id,
            destination: trip.destination().to_string(),
            month: trip.month().to_string(),
            price: trip.price(),
        })
    }

    pub async fn list_all(&self) -> Result<Vec<Trip>, AppError> {
        let rows: Vec<TripRow> =
            sqlx::query_as("SELECT id, destination, month, price FROM trips ORDER BY id")
                .fetch_all(&self.db)
                .await?;
        debug!(count = rows.len(), "listed trips");
        rows.into_iter().map(Trip::try_from).collect()
    }

    /// Exact, case-insensitive match on the destination. Case folding covers
    /// ASCII letters only.
    pub async fn list_by_destination(&self, name: &str) -> Result<Vec<Trip>, AppError> {
        let rows: Vec<TripRow> = sqlx::query_as(
            "SELECT id, destination, month, price FROM trips \
             WHERE destination = ? COLLATE NOCASE ORDER BY id",
        )
        .bind(name.trim())
        .fetch_all(&self.db)
        .await?;
        debug!(count = rows.len(), destination = name, "listed trips by destination");
        rows.into_iter().map(Trip::try_from).collect()
    }
}

fn storable_price(price: Decimal) -> Result<f64, InputError> {
    let stored = price
        .to_f64()
        .ok_or(InputError::PriceOutOfRange(price))?;
    match decimal_from_f64(stored) {
        Some(read_back) if read_back == price => Ok(stored),
        _ => Err(InputError::PriceOutOfRange(price)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn prices_within_float_precision_are_stored() {
        assert_eq!(storable_price(dec!(1234.56)).unwrap(), 1234.56);
        assert_eq!(storable_price(dec!(500.00)).unwrap(), 500.0);
        assert_eq!(storable_price(dec!(0)).unwrap(), 0.0);
    }

    #[test]
    fn prices_beyond_float_precision_are_rejected() {
        assert!(matches!(
            storable_price(dec!(12345678901234567.89)),
            Err(InputError::PriceOutOfRange(_))
        ));
        assert!(matches!(
            storable_price(dec!(0.1234567890123456789)),
            Err(InputError::PriceOutOfRange(_))
        ));
    }
}
