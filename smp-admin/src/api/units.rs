//! Unit API: creation, listing, detail, credential reset

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Committee, Unit};
use crate::{db, AppState};

/// Request body for unit creation
#[derive(Debug, Deserialize)]
pub struct CreateUnitRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    /// Admin default credential pair for later reset-to-default
    pub default_username: Option<String>,
    pub default_password: Option<String>,
}

/// Unit as exposed over the API (credentials omitted)
#[derive(Debug, Serialize)]
pub struct UnitResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub total_score: i64,
    pub rank: i64,
    pub grade: String,
    pub classification: String,
    pub msf_committee: Committee,
    pub haritha_committee: Committee,
}

impl From<Unit> for UnitResponse {
    fn from(unit: Unit) -> Self {
        Self {
            id: unit.id,
            name: unit.name,
            username: unit.username,
            total_score: unit.total_score,
            rank: unit.rank,
            grade: unit.grade.as_str().to_string(),
            classification: unit.classification.as_str().to_string(),
            msf_committee: unit.msf_committee,
            haritha_committee: unit.haritha_committee,
        }
    }
}

/// POST /api/units
pub async fn create_unit(
    State(state): State<AppState>,
    Json(req): Json<CreateUnitRequest>,
) -> ApiResult<Json<UnitResponse>> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Unit name is required".to_string()));
    }
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Unit credentials are required".to_string(),
        ));
    }

    let mut conn = state.db.acquire().await?;
    if db::units::name_or_username_taken(&mut conn, &req.name, &req.username).await? {
        return Err(ApiError::Conflict(
            "Unit name or username already taken".to_string(),
        ));
    }

    let mut unit = Unit::new(
        req.name,
        req.username,
        smp_common::auth::hash_password(&req.password),
    );
    unit.default_username = req.default_username;
    unit.default_password_hash = req
        .default_password
        .as_deref()
        .map(smp_common::auth::hash_password);

    db::units::insert_unit(&mut conn, &unit).await?;

    Ok(Json(unit.into()))
}

/// GET /api/units
pub async fn list_units(State(state): State<AppState>) -> ApiResult<Json<Vec<UnitResponse>>> {
    let units = db::units::list_units(&state.db).await?;
    Ok(Json(units.into_iter().map(UnitResponse::from).collect()))
}

/// GET /api/units/:id
pub async fn get_unit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UnitResponse>> {
    let mut conn = state.db.acquire().await?;
    let unit = db::units::load_unit(&mut conn, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Unit {} not found", id)))?;
    Ok(Json(unit.into()))
}

/// POST /api/units/:id/reset-credentials
///
/// Restores the unit's login to the admin-issued default pair.
pub async fn reset_credentials(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut conn = state.db.acquire().await?;
    let unit = db::units::load_unit(&mut conn, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Unit {} not found", id)))?;

    let (username, password_hash) = match (&unit.default_username, &unit.default_password_hash) {
        (Some(u), Some(p)) => (u.clone(), p.clone()),
        _ => {
            return Err(ApiError::BadRequest(
                "Unit has no default credentials configured".to_string(),
            ))
        }
    };

    db::units::update_credentials(&mut conn, id, &username, &password_hash).await?;

    Ok(Json(json!({ "status": "ok", "username": username })))
}
