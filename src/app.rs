use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/registry", get(handlers::get_registry))
        .route("/api/staff/:staff_id", get(handlers::get_staff))
        .route("/api/sales", post(handlers::post_sales))
        .route(
            "/api/targets/:staff_id",
            get(handlers::get_staff_targets).put(handlers::put_staff_targets),
        )
        .route("/api/team", get(handlers::get_team))
        .route("/api/team/monthly", get(handlers::get_team_monthly))
        .route("/api/summary", get(handlers::get_summary))
        .with_state(state)
}
