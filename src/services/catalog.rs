use rust_decimal::Decimal;

use crate::{
    error::AppError,
    models::trip::{NewTrip, Trip, TripView},
    services::{
        currency::{round_amount, CurrencyConverter},
        trips::TripStore,
    },
};

/// What request handlers call: trips in, priced trip views out.
#[derive(Clone)]
pub struct TripCatalog {
    store: TripStore,
    converter: CurrencyConverter,
}

impl TripCatalog {
    pub fn new(store: TripStore, converter: CurrencyConverter) -> Self {
        Self { store, converter }
    }

    pub async fn create_trip(
        &self,
        destination: &str,
        month: &str,
        price: Decimal,
    ) -> Result<TripView, AppError> {
        let new_trip = NewTrip::parse(destination, month, price)?;
        let trip = self.store.insert(&new_trip).await?;
        let price = round_amount(trip.price);
        Ok(TripView::priced(trip, price, self.converter.base_currency()))
    }

    pub async fn list_trips(&self, currency: Option<&str>) -> Result<Vec<TripView>, AppError> {
        let target = self.target_currency(currency)?;
        let trips = self.store.list_all().await?;
        self.present(trips, &target).await
    }

    pub async fn list_trips_by_destination(
        &self,
        name: &str,
        currency: Option<&str>,
    ) -> Result<Vec<TripView>, AppError> {
        let target = self.target_currency(currency)?;
        let trips = self.store.list_by_destination(name).await?;
        self.present(trips, &target).await
    }

    /// Missing or blank means the base currency.
    fn target_currency(&self, currency: Option<&str>) -> Result<String, AppError> {
        match currency.map(str::trim).filter(|code| !code.is_empty()) {
            Some(code) => self.converter.validate(code),
            None => Ok(self.converter.base_currency().to_string()),
        }
    }

    async fn present(&self, trips: Vec<Trip>, currency: &str) -> Result<Vec<TripView>, AppError> {
        let mut views = Vec::with_capacity(trips.len());
        for trip in trips {
            let price = if currency == self.converter.base_currency() {
                round_amount(trip.price)
            } else {
                self.converter.convert(trip.price, currency).await?
            };
            views.push(TripView::priced(trip, price, currency));
        }
        Ok(views)
    }
}
