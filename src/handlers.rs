use crate::analytics::{
    DEFAULT_FORECAST_DAYS, Forecast, MoodReport, Outcome, SummaryStatistics, analyze, forecast,
    summary_statistics,
};
use crate::errors::AppError;
use crate::models::{
    CheckIn, CheckInRequest, ForecastQuery, InsightsResponse, MOOD_MAX, MOOD_MIN, parse_timestamp,
};
use crate::state::AppState;
use crate::storage::persist_data;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{Local, NaiveDateTime};
use std::collections::BTreeSet;
use tracing::{debug, info};

const MAX_USER_LEN: usize = 64;
const MAX_NOTE_LEN: usize = 2000;
const MAX_FORECAST_DAYS: usize = 30;

pub async fn list_checkins(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<CheckIn>>, AppError> {
    Ok(Json(history_snapshot(&state, &user).await?))
}

pub async fn add_checkin(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(payload): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<CheckIn>), AppError> {
    validate_user(&user)?;

    let mut data = state.data.lock().await;
    let latest = data
        .users
        .get(&user)
        .and_then(|record| record.mood_history.last())
        .map(|entry| entry.timestamp);
    let entry = build_checkin(payload, Local::now().naive_local(), latest)?;

    // memory only takes the entry once it is on disk
    let mut updated = data.clone();
    updated
        .users
        .entry(user.clone())
        .or_default()
        .mood_history
        .push(entry.clone());
    persist_data(&state.data_path, &updated).await?;
    *data = updated;
    info!(user = %user, mood = entry.mood, "recorded check-in");

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<SummaryStatistics>, AppError> {
    let history = history_snapshot(&state, &user).await?;
    Ok(Json(summary_statistics(&history)))
}

pub async fn get_analytics(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<MoodReport>, AppError> {
    let history = history_snapshot(&state, &user).await?;
    debug!(user = %user, entries = history.len(), "analyzing mood history");
    Ok(Json(analyze(&history)))
}

pub async fn get_insights(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<InsightsResponse>, AppError> {
    let history = history_snapshot(&state, &user).await?;
    Ok(Json(InsightsResponse {
        insights: analyze(&history).insights,
    }))
}

pub async fn get_forecast(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<Outcome<Forecast>>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_FORECAST_DAYS);
    if !(1..=MAX_FORECAST_DAYS).contains(&days) {
        return Err(AppError::bad_request(format!(
            "days must be between 1 and {MAX_FORECAST_DAYS}"
        )));
    }

    let history = history_snapshot(&state, &user).await?;
    Ok(Json(forecast(&history, days)))
}

/// Clones the user's history so analysis runs without holding the lock.
async fn history_snapshot(state: &AppState, user: &str) -> Result<Vec<CheckIn>, AppError> {
    validate_user(user)?;
    let data = state.data.lock().await;
    Ok(data.history(user))
}

fn validate_user(user: &str) -> Result<(), AppError> {
    let valid = !user.is_empty()
        && user.len() <= MAX_USER_LEN
        && user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(AppError::bad_request(format!(
            "user must be 1-{MAX_USER_LEN} characters of letters, digits, '_', '-' or '.'"
        )))
    }
}

fn build_checkin(
    payload: CheckInRequest,
    now: NaiveDateTime,
    latest: Option<NaiveDateTime>,
) -> Result<CheckIn, AppError> {
    let timestamp = match payload.timestamp.as_deref() {
        Some(raw) => parse_timestamp(raw)
            .ok_or_else(|| AppError::bad_request(format!("unrecognised timestamp '{raw}'")))?,
        None => now,
    };
    if latest.is_some_and(|latest| timestamp < latest) {
        return Err(AppError::bad_request(
            "timestamp precedes the latest recorded check-in",
        ));
    }

    let note = payload
        .note
        .map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty());
    if note
        .as_ref()
        .is_some_and(|note| note.chars().count() > MAX_NOTE_LEN)
    {
        return Err(AppError::bad_request(format!(
            "note must be at most {MAX_NOTE_LEN} characters"
        )));
    }

    let activities: BTreeSet<String> = payload
        .activities
        .into_iter()
        .map(|activity| activity.trim().to_string())
        .filter(|activity| !activity.is_empty())
        .collect();

    Ok(CheckIn {
        timestamp,
        mood: score("mood", payload.mood)?,
        energy: payload.energy.map(|value| score("energy", value)).transpose()?,
        stress: payload.stress.map(|value| score("stress", value)).transpose()?,
        sleep: payload.sleep.map(|value| score("sleep", value)).transpose()?,
        note,
        activities,
    })
}

fn score(field: &str, value: i64) -> Result<u8, AppError> {
    u8::try_from(value)
        .ok()
        .filter(|value| (MOOD_MIN..=MOOD_MAX).contains(value))
        .ok_or_else(|| {
            AppError::bad_request(format!(
                "{field} must be between {MOOD_MIN} and {MOOD_MAX}"
            ))
        })
}
