use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{AppState, auth_handlers, file_handlers, middleware as auth_middleware};

pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login));

    // Everything else sits behind the auth gate
    let protected_routes = Router::new()
        .route("/upload", post(file_handlers::upload))
        .route("/aulas", get(file_handlers::list_lessons))
        .route("/aulas/{id}/files", get(file_handlers::list_lesson_files))
        .route("/files/{id}/download", get(file_handlers::download))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
