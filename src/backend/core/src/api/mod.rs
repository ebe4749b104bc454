//! HTTP surface.
//!
//! A single route serves the health report; everything else is left to the
//! hosting application.

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::health::{health_report, SharedHealthService};

/// Build the router serving the report at `path`.
///
/// # Example
///
/// ```rust,ignore
/// let service = Arc::new(HealthService::new(probes));
/// let app = build_router(service, "/health");
/// ```
pub fn build_router(service: SharedHealthService, path: &str) -> Router {
    Router::new()
        .route(path, get(health_report))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
