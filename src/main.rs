use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{http::header, web, App, HttpServer};
use dotenvy::dotenv;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

use expenses_api::config::{Settings, StoreBackend};
use expenses_api::graphql::{self, handlers};
use expenses_api::state::AppState;
use expenses_api::store::{MemoryStore, PgStore, Store};

async fn connect_store(settings: &Settings) -> io::Result<Arc<dyn Store>> {
    let database_url = match &settings.store {
        StoreBackend::Postgres { database_url } => database_url,
        StoreBackend::Memory => {
            warn!("STORE=memory, data is kept in memory and lost on restart");
            return Ok(Arc::new(MemoryStore::new()));
        }
    };

    // Configure connection pool with production-ready settings
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url.expose_secret())
        .await
        .map_err(io::Error::other)?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(io::Error::other)?;

    info!("Connected to PostgreSQL, migrations applied");
    Ok(Arc::new(PgStore::new(pool)))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env().map_err(io::Error::other)?;

    let store = connect_store(&settings).await?;
    let state = AppState::new(store, settings.jwt_secret.clone());
    let schema = graphql::build_schema(state.clone());

    let governor_config = GovernorConfigBuilder::default()
        .seconds_per_request(settings.rate_limit_seconds_per_request)
        .burst_size(settings.rate_limit_burst)
        .finish()
        .ok_or_else(|| io::Error::other("invalid rate limiter settings"))?;

    let allowed_origins = settings.cors_allowed_origins.clone();

    info!(
        "Starting server at http://{}:{}/graphql",
        settings.host, settings.port
    );

    HttpServer::new(move || {
        let allowed_origins = allowed_origins.clone();

        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origin_str = origin.to_str().unwrap_or("");
                allowed_origins.iter().any(|allowed| allowed == origin_str)
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            // Middleware (order matters: outer to inner)
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(schema.clone()))
            // Health endpoint (no rate limiting)
            .service(handlers::health_check)
            .service(
                web::scope("")
                    .wrap(Governor::new(&governor_config))
                    // WebSocket route must be registered before the playground
                    .service(handlers::graphql_ws)
                    .service(handlers::graphql)
                    .service(handlers::graphiql),
            )
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
