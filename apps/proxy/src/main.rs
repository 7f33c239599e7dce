use axum::http::{header, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tmdb_proxy::{api, config::Config, services::TmdbClient, AppState};

fn init_tracing() {
    // RUST_LOG environment variable controls log levels
    // Default: debug for our crate, info for axum, warn for dependencies
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tmdb_proxy=debug,tower_http=debug,axum=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    if config.server.cors_origins.is_empty() {
        tracing::info!("CORS: Allowing any origin");
        layer.allow_origin(AllowOrigin::any())
    } else {
        let origins: Vec<_> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        tracing::info!("CORS: Allowing origins {:?}", config.server.cors_origins);
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing first so we can log configuration loading
    init_tracing();

    tracing::info!("Starting TMDB Proxy v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load() {
        Ok(cfg) => {
            tracing::info!("Configuration loaded successfully");
            tracing::debug!("Server: {}:{}", cfg.server.host, cfg.server.port);
            tracing::debug!("TMDB: {:?}", cfg.tmdb);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let tmdb_client = match TmdbClient::new_shared(&config.tmdb) {
        Ok(client) => {
            tracing::info!("TMDB client initialized");
            client
        }
        Err(e) => {
            tracing::error!("Failed to create TMDB client: {}", e);
            tracing::error!("Set TMDB_API_KEY or TMDB_PROXY_TMDB__API_KEY");
            std::process::exit(1);
        }
    };

    let cors = cors_layer(&config);
    let addr = config.server_addr();
    let state = AppState::new(config, tmdb_client);

    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("TMDB Proxy listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
