use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use identity_cell::router::identity_routes;
use message_cell::router::message_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Medora Hospital API is running!" }))
        .nest("/api/v1/appointment", appointment_routes(state.clone()))
        .nest("/api/v1/user", identity_routes(state.clone()))
        .nest("/api/v1/message", message_routes(state))
}
