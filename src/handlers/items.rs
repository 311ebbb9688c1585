use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::{
    error::{AppError, AppResult},
    models::Item,
    validation::{self, ValidationErrors},
    AppState,
};

// ── Extraction helpers ───────────────────────────────────────────────────────

/// A non-numeric id can never match a record, so it is reported as absent.
fn item_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

/// Read the body as a JSON object. A missing or blank body is an empty object, so
/// the field rules decide the outcome; only unparseable JSON is rejected outright.
fn json_object(body: &Bytes) -> AppResult<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Unreadable request body");
        AppError::MalformedBody
    })
}

fn rejected(errors: ValidationErrors) -> AppError {
    warn!(errors = %errors, "Rejected item payload");
    AppError::Validation(errors)
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    let items = state.items.list_all().await?;
    debug!(count = items.len(), "Listed items");
    Ok(Json(items))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_item(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<Item>)> {
    let input = json_object(&body)?;
    let data = validation::validate_create(&input).map_err(rejected)?;

    let item = state.items.create(data).await?;
    info!(id = item.id, name = %item.name, quantity = item.quantity, "Created item");

    Ok((StatusCode::CREATED, Json(item)))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn show_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Item>> {
    let id = item_id(id)?;
    let item = state.items.find(id).await?;
    debug!(id, "Fetched item");
    Ok(Json(item))
}

// ── Update (PUT and PATCH) ────────────────────────────────────────────────────

pub async fn update_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> AppResult<Json<Item>> {
    let id = item_id(id)?;

    // Absence wins over a bad payload: a missing id is always a 404.
    state.items.find(id).await?;

    let input = json_object(&body)?;
    let changes = validation::validate_update(&input).map_err(rejected)?;

    let item = state.items.update(id, changes).await?;
    info!(id, name = %item.name, quantity = item.quantity, "Updated item");

    Ok(Json(item))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = item_id(id)?;
    state.items.delete(id).await?;
    info!(id, "Deleted item");
    Ok(StatusCode::NO_CONTENT)
}
