use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    models::trip::{TripInput, TripView},
    routes::AppJson,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips).post(create_trip))
        .route("/trips/:destination", get(trips_by_destination))
}

#[derive(Debug, Deserialize)]
struct CurrencyQuery {
    currency: Option<String>,
}

async fn create_trip(
    State(state): State<AppState>,
    AppJson(input): AppJson<TripInput>,
) -> Result<(StatusCode, Json<TripView>), AppError> {
    let trip = state
        .trips
        .create_trip(&input.destination, &input.month, input.price)
        .await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<CurrencyQuery>,
) -> Result<Json<Vec<TripView>>, AppError> {
    let trips = state.trips.list_trips(query.currency.as_deref()).await?;
    Ok(Json(trips))
}

async fn trips_by_destination(
    State(state): State<AppState>,
    Path(destination): Path<String>,
    Query(query): Query<CurrencyQuery>,
) -> Result<Json<Vec<TripView>>, AppError> {
    let trips = state
        .trips
        .list_trips_by_destination(&destination, query.currency.as_deref())
        .await?;
    Ok(Json(trips))
}
