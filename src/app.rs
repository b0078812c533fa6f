use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/users/:user/checkins",
            get(handlers::list_checkins).post(handlers::add_checkin),
        )
        .route("/api/users/:user/summary", get(handlers::get_summary))
        .route("/api/users/:user/analytics", get(handlers::get_analytics))
        .route("/api/users/:user/insights", get(handlers::get_insights))
        .route("/api/users/:user/forecast", get(handlers::get_forecast))
        .with_state(state)
}
