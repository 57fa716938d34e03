use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(handlers::health_check))

        // Catalogs for the UI
        .route("/api/languages", get(handlers::list_languages))
        .route("/api/domains", get(handlers::list_domains))
        .route("/api/modes", get(handlers::list_modes))

        // Stateless translation
        .route("/api/translate", post(handlers::translate))

        // Session bookkeeping
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/api/sessions/:id/translate", post(handlers::session_translate))
        .route("/api/sessions/:id/languages", put(handlers::set_languages))
        .route("/api/sessions/:id/languages/swap", post(handlers::swap_languages))
        .route("/api/sessions/:id/mode", put(handlers::set_mode))
        .route("/api/sessions/:id/favorites", post(handlers::save_favorite))
        .route(
            "/api/sessions/:id/favorites/:favorite_id",
            delete(handlers::remove_favorite),
        )
        .route("/api/sessions/:id/history", delete(handlers::clear_history))
}

/// Full application: routes, tracing and (optionally) permissive CORS.
pub fn create_app(state: AppState) -> Router {
    let permissive_cors = state.config.server.permissive_cors;
    let router = create_routes().layer(TraceLayer::new_for_http());

    let router = if permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}
