//! HTTP task service: submit VTA source + stdin, poll for status/output.

pub mod config;
pub mod error;
pub mod executor;
pub mod routes;
pub mod store;
pub mod task;

use axum::Router;
use config::ServiceConfig;
use executor::Executor;
use std::sync::Arc;
use store::InMemoryTokenStore;
use tower_http::trace::TraceLayer;

/// Builds the full application router from a `ServiceConfig`.
pub fn app(config: ServiceConfig) -> Router {
    let executor = Arc::new(Executor::new(config, Arc::new(InMemoryTokenStore::new())));
    routes::router(executor).layer(TraceLayer::new_for_http())
}
