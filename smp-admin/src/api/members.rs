//! Member API: creation, listing, detail, deletion

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Gender, Member};
use crate::services::committee;
use crate::{db, AppState};

/// Request body for member creation
#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub gender: Gender,
    pub unit_id: Option<Uuid>,
}

/// POST /api/members
pub async fn create_member(
    State(state): State<AppState>,
    Json(req): Json<CreateMemberRequest>,
) -> ApiResult<Json<Member>> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Member name is required".to_string()));
    }

    let mut conn = state.db.acquire().await?;
    if let Some(unit_id) = req.unit_id {
        if db::units::load_unit(&mut conn, unit_id).await?.is_none() {
            return Err(ApiError::NotFound(format!("Unit {} not found", unit_id)));
        }
    }

    let member = Member::new(req.name, req.gender, req.unit_id);
    db::members::insert_member(&mut conn, &member).await?;

    Ok(Json(member))
}

/// GET /api/members
pub async fn list_members(State(state): State<AppState>) -> ApiResult<Json<Vec<Member>>> {
    let members = db::members::list_members(&state.db).await?;
    Ok(Json(members))
}

/// GET /api/members/:id
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Member>> {
    let mut conn = state.db.acquire().await?;
    let member = db::members::load_member(&mut conn, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Member {} not found", id)))?;
    Ok(Json(member))
}

/// DELETE /api/members/:id
///
/// Vacates the member's committee slot (if any) before deleting the row,
/// so unit committees never hold dangling references.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let member = {
        let mut conn = state.db.acquire().await?;
        db::members::load_member(&mut conn, id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Member {} not found", id)))?
    };

    committee::delete_member(&state.db, &member).await?;

    Ok(Json(json!({ "status": "ok" })))
}
