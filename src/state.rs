use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{
        catalog::TripCatalog,
        currency::{CurrencyConverter, RateProvider},
        trips::TripStore,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    pub trips: TripCatalog,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool, rates: Arc<dyn RateProvider>) -> Self {
        let store = TripStore::new(db.clone());
        let converter = CurrencyConverter::new(config.base_currency.clone(), rates);
        let trips = TripCatalog::new(store, converter);
        Self { config, db, trips }
    }
}
