use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::api::handlers;
use crate::shared::config::{resolve_path, Config};
use crate::system;

/// Конфигурация всех роутов приложения
pub fn configure_routes(config: &Config) -> Router {
    let upload_limit = config.analytics.max_upload_bytes();
    let static_dir = resolve_path(&config.server.static_dir);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D400 SALES ANALYTICS
        // ========================================
        .route(
            "/api/d400/upload",
            post(handlers::d400_sales_analytics::upload)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/d400/branches",
            get(handlers::d400_sales_analytics::get_branches),
        )
        .route(
            "/api/d400/dashboard",
            get(handlers::d400_sales_analytics::get_dashboard),
        )
        .route(
            "/api/d400/trend",
            get(handlers::d400_sales_analytics::get_trend),
        )
        .route(
            "/api/d400/dataset",
            delete(handlers::d400_sales_analytics::delete_dataset),
        )
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
}
