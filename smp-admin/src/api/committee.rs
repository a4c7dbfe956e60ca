//! Committee API: role assignment and removal

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{CommitteeScope, RoleKey};
use crate::services::committee;
use crate::AppState;

/// Request body for role assignment
///
/// `role_title` is the collaborator's display title ("Vice President", ...);
/// it is resolved to the closed role enumeration here at the boundary.
#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub member_id: Uuid,
    pub scope: CommitteeScope,
    pub role_title: String,
}

/// POST /api/units/:id/committee/assign
pub async fn assign_role(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Json(req): Json<AssignRoleRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let role = RoleKey::from_title(&req.role_title)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown role: {}", req.role_title)))?;

    committee::assign_role(&state.db, unit_id, req.scope, role, req.member_id).await?;

    Ok(Json(json!({
        "status": "ok",
        "role": role,
        "member_id": req.member_id,
    })))
}

/// Request body for member removal from a committee
#[derive(Debug, Deserialize)]
pub struct RemoveMemberRequest {
    pub member_id: Uuid,
}

/// POST /api/units/:id/committee/remove
///
/// The caller does not name the slot; it is derived from the member's
/// own role record.
pub async fn remove_member(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Json(req): Json<RemoveMemberRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    committee::remove_member(&state.db, unit_id, req.member_id).await?;

    Ok(Json(json!({ "status": "ok" })))
}
