// libs/identity-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn identity_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/patient/register", post(handlers::register_patient))
        .route("/doctors", get(handlers::get_all_doctors));

    let protected_routes = Router::new()
        .route("/admin/addnew", post(handlers::add_new_admin))
        .route("/doctor/addnew", post(handlers::add_new_doctor))
        .route("/me", get(handlers::get_current_user))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
