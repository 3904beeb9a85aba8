use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/report/month/:month", get(handlers::month_report))
        .route("/api/report/day/:day", get(handlers::day_report))
        .route("/api/estimate", post(handlers::estimate))
        .route("/api/estimate/plan", post(handlers::estimate_plan))
        .route("/api/assistant", post(handlers::assistant))
        .route("/api/leaderboard", get(handlers::leaderboard))
        .with_state(state)
}
