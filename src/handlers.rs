use crate::errors::AppError;
use crate::estimate::{summarize_plan, EstimateOutcome};
use crate::goal::parse_goal;
use crate::models::{
    AssistantRequest, AssistantResponse, Confidence, EmissionReport, EstimateRequest,
    EstimateResponse, LeaderboardEntry, Period, PlanRequest, PlanResponse, ReportQuery,
};
use crate::score::rank_leaderboard;
use crate::source::SessionCredential;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use tracing::{error, info};

pub async fn health() -> &'static str {
    "ok"
}

pub async fn month_report(
    State(state): State<AppState>,
    Path(month): Path<String>,
    Query(query): Query<ReportQuery>,
    headers: HeaderMap,
) -> Result<Json<EmissionReport>, AppError> {
    let period = Period::parse_month(&month)?;
    build_report(&state, period, &query, &headers).await
}

pub async fn day_report(
    State(state): State<AppState>,
    Path(day): Path<String>,
    Query(query): Query<ReportQuery>,
    headers: HeaderMap,
) -> Result<Json<EmissionReport>, AppError> {
    let period = Period::parse_day(&day)?;
    build_report(&state, period, &query, &headers).await
}

pub async fn estimate(
    State(state): State<AppState>,
    Json(payload): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let description = payload.description.trim();
    if description.is_empty() {
        return Err(AppError::bad_request("description must not be empty"));
    }

    let outcome = state.estimator.estimate(description).await?;
    Ok(Json(to_response(outcome)))
}

pub async fn estimate_plan(
    State(state): State<AppState>,
    Json(payload): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let descriptions: Vec<String> = payload
        .descriptions
        .iter()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    let outcomes = state.estimator.estimate_many(&descriptions).await;
    let summary = summarize_plan(&outcomes);
    let items = outcomes
        .into_iter()
        .map(|outcome| match outcome {
            Ok(outcome) => to_response(outcome),
            Err(err) => EstimateResponse {
                estimated_kg: 0.0,
                confidence: Confidence::Unavailable,
                raw: err.to_string(),
            },
        })
        .collect();

    Ok(Json(PlanResponse {
        items,
        total_kg: summary.total_kg,
        unestimated: summary.unestimated,
    }))
}

pub async fn assistant(
    State(state): State<AppState>,
    Json(payload): Json<AssistantRequest>,
) -> Result<Json<AssistantResponse>, AppError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::bad_request("message must not be empty"));
    }

    let reply = state.estimator.ask(message).await?;
    Ok(Json(AssistantResponse { reply }))
}

pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let entries = state.records.leaderboard().await.map_err(|err| {
        error!("failed to fetch leaderboard: {err}");
        AppError {
            status: StatusCode::BAD_GATEWAY,
            message: "leaderboard unavailable".to_string(),
        }
    })?;
    Ok(Json(rank_leaderboard(entries)))
}

async fn build_report(
    state: &AppState,
    period: Period,
    query: &ReportQuery,
    headers: &HeaderMap,
) -> Result<Json<EmissionReport>, AppError> {
    let credential = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(SessionCredential::from_cookie_header)
        .ok_or_else(AppError::unauthorized)?;
    let goal = parse_goal(query.goal.as_deref());

    let tracker = state.tracker_for(&credential);
    let report = state
        .pipeline
        .latest_report(&tracker, &credential, period, goal)
        .await
        .ok_or_else(|| AppError::superseded(period))?;

    info!(
        %period,
        total = report.aggregate.total,
        degraded = report.aggregate.degraded.len(),
        "report built"
    );
    Ok(Json(report))
}

fn to_response(outcome: EstimateOutcome) -> EstimateResponse {
    match outcome {
        EstimateOutcome::Estimated { kg, raw } => EstimateResponse {
            estimated_kg: kg,
            confidence: Confidence::Estimated,
            raw,
        },
        EstimateOutcome::Unparsable { raw } => EstimateResponse {
            estimated_kg: 0.0,
            confidence: Confidence::Unparsable,
            raw,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_response_keeps_upstream_text() {
        let response = to_response(EstimateOutcome::Estimated {
            kg: 3.4,
            raw: "3.4 kg.".into(),
        });
        assert_eq!(response.confidence, Confidence::Estimated);
        assert_eq!(response.raw, "3.4 kg.");

        let response = to_response(EstimateOutcome::Unparsable { raw: "N/A".into() });
        assert_eq!(response.confidence, Confidence::Unparsable);
        assert_eq!(response.estimated_kg, 0.0);
        assert_eq!(
            serde_json::to_value(&response).unwrap()["confidence"],
            "unparsable"
        );
    }
}
