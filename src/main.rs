use carnival_backend::{
    config::{get_config, init_config},
    database::{
        pool::{create_pool, run_migrations},
        postgres::PgStore,
        seed::seed_catalog_from_file,
    },
    routes,
    utils::token::TokenKeys,
    AppState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    run_migrations(&pool).await?;

    let store = Arc::new(PgStore::new(pool));
    if let Some(path) = &config.catalog_seed_path {
        let inserted = seed_catalog_from_file(store.as_ref(), path).await?;
        info!("Catalog seed from {} inserted {} questions", path, inserted);
    }

    let keys = TokenKeys::new(&config.jwt_secret, config.jwt_expiry_seconds);
    let app_state = AppState::new(store, keys);

    let app = routes::router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
