use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use trips::config::AppConfig;
use trips::db::{init_pool, run_migrations};
use trips::error::AppError;
use trips::routes::create_router;
use trips::services::nbp::NbpRateProvider;
use trips::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let db = init_pool(&config.database_url).await?;

    if let Err(err) = run_migrations(&db).await {
        error!("migration failed: {err:?}");
        return Err(err);
    }

    let rates = NbpRateProvider::new(config.rate_provider_url.clone(), config.rate_timeout)?;
    let state = AppState::new(config.clone(), db, Arc::new(rates));

    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(
        base_currency = %config.base_currency,
        "listening on {}",
        listener.local_addr()?
    );
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,trips=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
