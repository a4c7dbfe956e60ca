//! Program API: add, list, edit, delete

use axum::{
    extract::{Path, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::Program;
use crate::services::program_store::{self, NewProgram, PhotoUpload, ProgramEdit};
use crate::{db, AppState};

/// One photo carried in a JSON request body
///
/// Multipart parsing is handled upstream of this service; photo bytes
/// arrive base64-encoded.
#[derive(Debug, Deserialize)]
pub struct PhotoPayload {
    pub data: String,
    pub mime_type: String,
}

fn decode_photos(photos: Vec<PhotoPayload>) -> ApiResult<Vec<PhotoUpload>> {
    photos
        .into_iter()
        .map(|p| {
            let bytes = BASE64
                .decode(p.data.as_bytes())
                .map_err(|e| ApiError::BadRequest(format!("Invalid photo encoding: {}", e)))?;
            Ok(PhotoUpload {
                bytes,
                mime_type: p.mime_type,
            })
        })
        .collect()
}

/// Request body for adding a program
#[derive(Debug, Deserialize)]
pub struct AddProgramRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub created_by: Option<Uuid>,
    pub photos: Vec<PhotoPayload>,
}

/// POST /api/units/:id/programs
pub async fn add_program(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Json(req): Json<AddProgramRequest>,
) -> ApiResult<Json<Program>> {
    let photos = decode_photos(req.photos)?;
    let program = program_store::add_program(
        &state.db,
        state.photos.as_ref(),
        &state.rank_queue,
        unit_id,
        NewProgram {
            name: req.name,
            description: req.description,
            date: req.date,
            created_by: req.created_by,
        },
        photos,
    )
    .await?;

    Ok(Json(program))
}

/// GET /api/units/:id/programs
pub async fn list_programs(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Program>>> {
    let mut conn = state.db.acquire().await?;
    if db::units::load_unit(&mut conn, unit_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Unit {} not found", unit_id)));
    }
    let programs = db::programs::list_programs(&mut conn, unit_id).await?;
    Ok(Json(programs))
}

/// Request body for editing a program
#[derive(Debug, Deserialize)]
pub struct EditProgramRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub photos_to_add: Vec<PhotoPayload>,
    #[serde(default)]
    pub photos_to_remove: Vec<String>,
}

/// PUT /api/units/:id/programs/:program_id
pub async fn edit_program(
    State(state): State<AppState>,
    Path((unit_id, program_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<EditProgramRequest>,
) -> ApiResult<Json<Program>> {
    let photos_to_add = decode_photos(req.photos_to_add)?;
    let program = program_store::edit_program(
        &state.db,
        state.photos.as_ref(),
        &state.rank_queue,
        unit_id,
        program_id,
        ProgramEdit {
            name: req.name,
            description: req.description,
            date: req.date,
            photos_to_remove: req.photos_to_remove,
            photos_to_add,
        },
    )
    .await?;

    Ok(Json(program))
}

/// DELETE /api/units/:id/programs/:program_id
pub async fn delete_program(
    State(state): State<AppState>,
    Path((unit_id, program_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    program_store::delete_program(
        &state.db,
        state.photos.as_ref(),
        &state.rank_queue,
        unit_id,
        program_id,
    )
    .await?;

    Ok(Json(json!({ "status": "ok" })))
}
