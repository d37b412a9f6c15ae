use axum::{Router, http::header, routing::get};
use billsplit::api::handlers::{api_routes, ws_routes};
use billsplit::api::openapi::ApiDoc;
use billsplit::config::CONFIG;
use billsplit::core::services::SessionService;
use billsplit::infrastructure::{
    cache::in_memory::InMemoryCache,
    logging::in_memory::InMemoryLogging,
    storage::{Storage, file::FileStorage, in_memory::InMemoryStorage},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&CONFIG.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let storage: Arc<dyn Storage> = match &CONFIG.data_file {
        Some(path) => {
            info!("Using file storage at {}", path);
            Arc::new(FileStorage::open(path).await?)
        }
        None => {
            info!("Using in-memory storage");
            Arc::new(InMemoryStorage::new())
        }
    };
    let service = Arc::new(
        SessionService::new(storage, InMemoryLogging::new(), InMemoryCache::new())
            .with_snapshot_ttl(CONFIG.snapshot_cache_ttl)
            .with_code_length(CONFIG.session_code_length),
    );

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .nest("/api", api_routes(service.clone()))
        .merge(ws_routes(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
