//! Program store: add/edit/delete orchestration
//!
//! Every mutation stores or releases photos through the `PhotoStore`
//! seam, applies its score delta in the same transaction as the program
//! row change, and then triggers the rank queue without waiting for it.

use smp_common::{Error, Result};
use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;

use crate::db;
use crate::models::{PhotoRef, Program};
use crate::services::rank_job::RankQueue;
use crate::services::score_ledger;
use crate::services::storage::PhotoStore;

/// Inclusive photo count bounds for a program
pub const MIN_PHOTOS: usize = 1;
pub const MAX_PHOTOS: usize = 10;

/// Fields for a new program
#[derive(Debug, Clone)]
pub struct NewProgram {
    pub name: String,
    pub description: String,
    pub date: chrono::NaiveDate,
    pub created_by: Option<Uuid>,
}

/// One uploaded photo payload
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Requested changes to an existing program
#[derive(Debug, Clone, Default)]
pub struct ProgramEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<chrono::NaiveDate>,
    /// Storage keys of photos to drop
    pub photos_to_remove: Vec<String>,
    pub photos_to_add: Vec<PhotoUpload>,
}

fn validate_photo_count(count: usize) -> Result<()> {
    if !(MIN_PHOTOS..=MAX_PHOTOS).contains(&count) {
        return Err(Error::InvalidInput(format!(
            "Programs must carry between {} and {} photos (got {})",
            MIN_PHOTOS, MAX_PHOTOS, count
        )));
    }
    Ok(())
}

/// Store uploads, unwinding already-stored ones if a later upload fails
async fn store_photos(
    store: &dyn PhotoStore,
    unit_id: Uuid,
    uploads: &[PhotoUpload],
) -> Result<Vec<PhotoRef>> {
    let prefix = unit_id.to_string();
    let mut stored = Vec::with_capacity(uploads.len());

    for upload in uploads {
        match store.store(&prefix, &upload.bytes, &upload.mime_type).await {
            Ok(photo) => stored.push(PhotoRef {
                key: photo.key,
                url: photo.url,
            }),
            Err(e) => {
                for photo in &stored {
                    if let Err(cleanup_err) = store.delete(&photo.key).await {
                        warn!("Failed to clean up photo {}: {}", photo.key, cleanup_err);
                    }
                }
                return Err(e);
            }
        }
    }

    Ok(stored)
}

/// Release photos, logging and continuing on individual failures
async fn release_photos(store: &dyn PhotoStore, photos: &[PhotoRef]) {
    for photo in photos {
        if let Err(e) = store.delete(&photo.key).await {
            warn!("Failed to delete photo {}: {}", photo.key, e);
        }
    }
}

/// Add a program to a unit
///
/// Awards `3 + photo count` points in the same transaction as the row
/// insert, then triggers rank recomputation.
pub async fn add_program(
    pool: &SqlitePool,
    store: &dyn PhotoStore,
    queue: &RankQueue,
    unit_id: Uuid,
    data: NewProgram,
    photos: Vec<PhotoUpload>,
) -> Result<Program> {
    validate_photo_count(photos.len())?;
    if data.name.trim().is_empty() {
        return Err(Error::InvalidInput("Program name is required".to_string()));
    }

    {
        let mut conn = pool.acquire().await?;
        if db::units::load_unit(&mut conn, unit_id).await?.is_none() {
            return Err(Error::NotFound(format!("Unit {} not found", unit_id)));
        }
    }

    let stored = store_photos(store, unit_id, &photos).await?;
    let program = Program::new(
        unit_id,
        data.name,
        data.description,
        data.date,
        stored,
        data.created_by,
    );

    let result: Result<()> = async {
        let mut tx = pool.begin().await?;
        db::programs::insert_program(&mut tx, &program).await?;
        score_ledger::apply_program_delta(
            &mut tx,
            unit_id,
            score_ledger::points_for_photos(program.photo_count()),
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }
    .await;

    if let Err(e) = result {
        // Do not leave orphaned photo files behind a failed insert
        release_photos(store, &program.photos).await;
        return Err(e);
    }

    queue.trigger();
    Ok(program)
}

/// Edit a program in place
///
/// The score delta is the photo count change only; the 3-point base is
/// not re-applied. Removed photos are released best-effort.
pub async fn edit_program(
    pool: &SqlitePool,
    store: &dyn PhotoStore,
    queue: &RankQueue,
    unit_id: Uuid,
    program_id: Uuid,
    edit: ProgramEdit,
) -> Result<Program> {
    let mut program = {
        let mut conn = pool.acquire().await?;
        db::programs::load_program(&mut conn, unit_id, program_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Program {} not found", program_id)))?
    };
    let old_count = program.photo_count();

    // Every removal key must address a photo this program owns
    for key in &edit.photos_to_remove {
        if !program.photos.iter().any(|p| &p.key == key) {
            return Err(Error::InvalidInput(format!(
                "Photo {} does not belong to this program",
                key
            )));
        }
    }

    let kept: Vec<PhotoRef> = program
        .photos
        .iter()
        .filter(|p| !edit.photos_to_remove.contains(&p.key))
        .cloned()
        .collect();
    validate_photo_count(kept.len() + edit.photos_to_add.len())?;

    let added = store_photos(store, unit_id, &edit.photos_to_add).await?;

    let removed: Vec<PhotoRef> = program
        .photos
        .iter()
        .filter(|p| edit.photos_to_remove.contains(&p.key))
        .cloned()
        .collect();

    program.photos = kept;
    program.photos.extend(added.iter().cloned());
    if let Some(name) = edit.name {
        program.name = name;
    }
    if let Some(description) = edit.description {
        program.description = description;
    }
    if let Some(date) = edit.date {
        program.date = date;
    }

    let new_count = program.photo_count();

    let result: Result<()> = async {
        let mut tx = pool.begin().await?;
        db::programs::update_program(&mut tx, &program).await?;
        score_ledger::apply_program_delta(
            &mut tx,
            unit_id,
            score_ledger::edit_delta(old_count, new_count),
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }
    .await;

    if let Err(e) = result {
        // Do not leave orphaned photo files behind a failed update
        release_photos(store, &added).await;
        return Err(e);
    }

    // Release replaced photos only after the row is safely updated;
    // failures are logged and do not fail the edit.
    release_photos(store, &removed).await;

    queue.trigger();
    Ok(program)
}

/// Delete a program, reversing its score contribution
///
/// Photo cleanup is best-effort: a storage failure is logged and the
/// deletion proceeds.
pub async fn delete_program(
    pool: &SqlitePool,
    store: &dyn PhotoStore,
    queue: &RankQueue,
    unit_id: Uuid,
    program_id: Uuid,
) -> Result<()> {
    let program = {
        let mut conn = pool.acquire().await?;
        db::programs::load_program(&mut conn, unit_id, program_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Program {} not found", program_id)))?
    };

    release_photos(store, &program.photos).await;

    let mut tx = pool.begin().await?;
    db::programs::delete_program(&mut tx, program_id).await?;
    score_ledger::apply_program_delta(
        &mut tx,
        unit_id,
        -score_ledger::points_for_photos(program.photo_count()),
    )
    .await?;
    tx.commit().await?;

    queue.trigger();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;
    use crate::services::storage::LocalPhotoStore;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        db::init_tables(&pool).await.unwrap();
        pool
    }

    async fn add_test_unit(pool: &SqlitePool) -> Uuid {
        let mut conn = pool.acquire().await.unwrap();
        let unit = Unit::new("Unit".to_string(), "unit".to_string(), "h".to_string());
        db::units::insert_unit(&mut conn, &unit).await.unwrap();
        unit.id
    }

    fn uploads(count: usize) -> Vec<PhotoUpload> {
        (0..count)
            .map(|i| PhotoUpload {
                bytes: format!("photo-{}", i).into_bytes(),
                mime_type: "image/jpeg".to_string(),
            })
            .collect()
    }

    fn new_program() -> NewProgram {
        NewProgram {
            name: "Quiz Night".to_string(),
            description: "Annual quiz".to_string(),
            date: "2026-02-01".parse().unwrap(),
            created_by: None,
        }
    }

    async fn score_of(pool: &SqlitePool, unit_id: Uuid) -> i64 {
        let mut conn = pool.acquire().await.unwrap();
        db::units::load_total_score(&mut conn, unit_id)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_program_awards_three_plus_photo_count() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(tmp.path().to_path_buf());
        let queue = RankQueue::start(pool.clone());
        let unit_id = add_test_unit(&pool).await;

        add_program(&pool, &store, &queue, unit_id, new_program(), uploads(4))
            .await
            .unwrap();

        assert_eq!(score_of(&pool, unit_id).await, 7);
    }

    #[tokio::test]
    async fn test_photo_count_bounds_enforced() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(tmp.path().to_path_buf());
        let queue = RankQueue::start(pool.clone());
        let unit_id = add_test_unit(&pool).await;

        let err = add_program(&pool, &store, &queue, unit_id, new_program(), uploads(0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = add_program(&pool, &store, &queue, unit_id, new_program(), uploads(11))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        // No partial state: nothing was scored
        assert_eq!(score_of(&pool, unit_id).await, 0);
    }

    #[tokio::test]
    async fn test_edit_moves_score_by_photo_delta_only() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(tmp.path().to_path_buf());
        let queue = RankQueue::start(pool.clone());
        let unit_id = add_test_unit(&pool).await;

        let program = add_program(&pool, &store, &queue, unit_id, new_program(), uploads(2))
            .await
            .unwrap();
        assert_eq!(score_of(&pool, unit_id).await, 5);

        // 2 -> 5 photos: +3, no base re-applied
        let edit = ProgramEdit {
            photos_to_add: uploads(3),
            ..Default::default()
        };
        let program = edit_program(&pool, &store, &queue, unit_id, program.id, edit)
            .await
            .unwrap();
        assert_eq!(program.photo_count(), 5);
        assert_eq!(score_of(&pool, unit_id).await, 8);

        // 5 -> 4 photos: -1
        let edit = ProgramEdit {
            photos_to_remove: vec![program.photos[0].key.clone()],
            ..Default::default()
        };
        let program = edit_program(&pool, &store, &queue, unit_id, program.id, edit)
            .await
            .unwrap();
        assert_eq!(program.photo_count(), 4);
        assert_eq!(score_of(&pool, unit_id).await, 7);

        // Removed photo is gone from disk
        assert_eq!(
            tmp.path()
                .join(unit_id.to_string())
                .read_dir()
                .unwrap()
                .count(),
            4
        );
    }

    #[tokio::test]
    async fn test_delete_reverses_contribution_and_clamps() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(tmp.path().to_path_buf());
        let queue = RankQueue::start(pool.clone());
        let unit_id = add_test_unit(&pool).await;

        let program = add_program(&pool, &store, &queue, unit_id, new_program(), uploads(2))
            .await
            .unwrap();
        assert_eq!(score_of(&pool, unit_id).await, 5);

        // Force the stored total below the program's worth, then delete:
        // 3 - 5 clamps to 0, not -2
        {
            let mut conn = pool.acquire().await.unwrap();
            db::units::update_total_score(&mut conn, unit_id, 3)
                .await
                .unwrap();
        }
        delete_program(&pool, &store, &queue, unit_id, program.id)
            .await
            .unwrap();

        assert_eq!(score_of(&pool, unit_id).await, 0);

        // Row and photos are gone
        let mut conn = pool.acquire().await.unwrap();
        assert!(db::programs::load_program(&mut conn, unit_id, program.id)
            .await
            .unwrap()
            .is_none());
        assert!(!tmp.path().join(unit_id.to_string()).join("any").exists());
    }

    #[tokio::test]
    async fn test_failed_edit_releases_new_uploads() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(tmp.path().to_path_buf());
        let queue = RankQueue::start(pool.clone());
        let unit_id = add_test_unit(&pool).await;

        let program = add_program(&pool, &store, &queue, unit_id, new_program(), uploads(2))
            .await
            .unwrap();

        // Pull the unit row out from under the edit so the score update
        // inside the transaction fails after the photos were stored
        {
            let mut conn = pool.acquire().await.unwrap();
            sqlx::query("DELETE FROM units WHERE id = ?")
                .bind(unit_id.to_string())
                .execute(&mut *conn)
                .await
                .unwrap();
        }

        let edit = ProgramEdit {
            photos_to_add: uploads(1),
            ..Default::default()
        };
        let err = edit_program(&pool, &store, &queue, unit_id, program.id, edit)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        // Only the original two photos remain on disk
        assert_eq!(
            tmp.path()
                .join(unit_id.to_string())
                .read_dir()
                .unwrap()
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_edit_rejects_foreign_photo_key() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(tmp.path().to_path_buf());
        let queue = RankQueue::start(pool.clone());
        let unit_id = add_test_unit(&pool).await;

        let program = add_program(&pool, &store, &queue, unit_id, new_program(), uploads(2))
            .await
            .unwrap();

        let edit = ProgramEdit {
            photos_to_remove: vec!["someone-elses/photo.jpg".to_string()],
            ..Default::default()
        };
        let err = edit_program(&pool, &store, &queue, unit_id, program.id, edit)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
