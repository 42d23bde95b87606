use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/tap", post(handlers::tap))
        .route("/api/session", get(handlers::get_session))
        .route("/api/settings", post(handlers::update_settings))
        .route("/api/wish", post(handlers::make_wish))
        .route("/api/auto-tap", post(handlers::set_auto_tap))
        .route("/api/meditation", post(handlers::set_meditation))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/achievements", get(handlers::get_achievements))
        .route("/api/status", get(handlers::get_status))
        .route(
            "/api/profile",
            get(handlers::get_profile)
                .post(handlers::create_profile)
                .patch(handlers::update_profile)
                .delete(handlers::reset_profile),
        )
        .with_state(state)
}
