pub mod public;
pub mod trips;

use axum::{extract::FromRequest, Router};
use tower_http::trace::TraceLayer;

use crate::{error::AppError, state::AppState};

/// JSON body extractor whose rejections render like every other input error.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(public::router())
        .merge(trips::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
