mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
#[cfg(test)]
mod testing;
mod utils;

use std::{str::FromStr, sync::Arc};

use anyhow::Context;
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use db::{db::DBClient, listingdb::ListingExt, userdb::UserExt};
use dotenv::dotenv;
use routes::create_router;
use service::listing_service::ListingService;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;
use utils::image_utils::{ImageStore, LocalImageStore};

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<dyn UserExt>,
    pub listing_service: ListingService,
}

impl AppState {
    pub fn new<S>(env: Config, store: Arc<S>, image_store: Arc<dyn ImageStore>) -> Self
    where
        S: UserExt + ListingExt + 'static,
    {
        let listing_store: Arc<dyn ListingExt> = store.clone();
        AppState {
            env,
            db_client: store,
            listing_service: ListingService::new(listing_store, image_store),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::init()?;

    let level = LevelFilter::from_str(&config.log_level).unwrap_or(LevelFilter::DEBUG);
    tracing_subscriber::fmt().with_max_level(level).init();

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;
    tracing::info!("connection to the database is successful");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    let allowed_origins = config
        .allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("CORS_ALLOWED_ORIGINS contains an invalid origin")?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ]);

    let db_client = Arc::new(DBClient::new(pool));
    let image_store = Arc::new(LocalImageStore::new(&config.media_root));
    let app_state = AppState::new(config.clone(), db_client, image_store);

    let app = create_router(Arc::new(app_state)).layer(cors);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;

    tracing::info!("server is running on http://localhost:{}", config.port);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
