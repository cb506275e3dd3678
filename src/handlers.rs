use crate::errors::{AppError, ValidationError};
use crate::models::{
    DateQuery, MonthlyTeamView, SalesRequest, SalesResponse, StaffView, SummaryView, Targets,
    TeamView,
};
use crate::records::{SalesSubmission, date_key, parse_request_date, record_sales};
use crate::registry::CategoryRegistry;
use crate::state::AppState;
use crate::targets::{get_targets, set_targets};
use crate::ui::render_index;
use crate::views::{staff_view, summary_view, team_monthly_view, team_view};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = today();
    let data = state.data.lock().await;
    let monthly = team_monthly_view(&data.records, &data.targets, &state.registry, today);
    let summary = summary_view(&data.records, &data.targets, &state.registry);
    Html(render_index(&state.registry, &monthly, &summary))
}

pub async fn get_registry(State(state): State<AppState>) -> Json<CategoryRegistry> {
    Json(state.registry.as_ref().clone())
}

pub async fn get_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<Json<StaffView>, AppError> {
    let date = resolve_date(query.date.as_deref())?;
    let data = state.data.lock().await;
    let view = staff_view(&data.records, &data.targets, &state.registry, &staff_id, date)?;
    Ok(Json(view))
}

pub async fn post_sales(
    State(state): State<AppState>,
    Json(payload): Json<SalesRequest>,
) -> Result<Json<SalesResponse>, AppError> {
    let date = resolve_date(payload.date.as_deref())?;
    let submission = SalesSubmission::validate(&state.registry, payload.values)?;

    let mut data = state.data.lock().await;
    let updated = record_sales(
        &data.records,
        &state.registry,
        &payload.staff_id,
        date,
        &submission,
    )?;
    state.repository.save_records(&updated).await?;
    data.records = updated;

    let key = date_key(date);
    let entry = data
        .records
        .entry(&key, &payload.staff_id)
        .cloned()
        .unwrap_or_default();
    info!(staff = %payload.staff_id, date = %key, "saved daily sales");

    Ok(Json(SalesResponse {
        date: key,
        staff_id: payload.staff_id,
        entry,
    }))
}

pub async fn get_staff_targets(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
) -> Result<Json<Targets>, AppError> {
    if state.registry.staff_member(&staff_id).is_none() {
        return Err(ValidationError::UnknownStaff { staff_id }.into());
    }
    let data = state.data.lock().await;
    Ok(Json(get_targets(&data.targets, &state.registry, &staff_id)))
}

pub async fn put_staff_targets(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    Json(payload): Json<BTreeMap<String, f64>>,
) -> Result<Json<Targets>, AppError> {
    let mut data = state.data.lock().await;
    let updated = set_targets(&data.targets, &state.registry, &staff_id, &payload)?;
    state.repository.save_targets(&updated).await?;
    data.targets = updated;

    info!(staff = %staff_id, "updated targets");
    Ok(Json(get_targets(&data.targets, &state.registry, &staff_id)))
}

pub async fn get_team(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<TeamView>, AppError> {
    let date = resolve_date(query.date.as_deref())?;
    let data = state.data.lock().await;
    Ok(Json(team_view(&data.records, &data.targets, &state.registry, date)))
}

pub async fn get_team_monthly(State(state): State<AppState>) -> Json<MonthlyTeamView> {
    let data = state.data.lock().await;
    Json(team_monthly_view(
        &data.records,
        &data.targets,
        &state.registry,
        today(),
    ))
}

pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryView> {
    let data = state.data.lock().await;
    Json(summary_view(&data.records, &data.targets, &state.registry))
}

fn resolve_date(value: Option<&str>) -> Result<NaiveDate, AppError> {
    match value {
        Some(value) => Ok(parse_request_date(value)?),
        None => Ok(today()),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
