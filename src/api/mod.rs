mod handlers;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::store::RuleStore;

pub fn create_router(store: RuleStore) -> Router {
    let api = Router::new()
        // Scopes
        .route("/scopes/{scope}", get(handlers::list_scope_keys))
        .route("/resolve/{scope}/{*key}", get(handlers::resolve_scopes))
        // Rules
        .route("/rules/{scope}/{*key}", get(handlers::get_rules))
        .route("/search", get(handlers::search_rules))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}
