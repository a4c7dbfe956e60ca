//! Score ledger: point rules for programs and the clamped running total
//!
//! A program is worth a 3-point base plus 1 point per photo. Edits only
//! move the photo-derived part; the base is not re-applied. The running
//! total never goes negative: deductions clamp at zero.

use smp_common::{Error, Result};
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db;

/// Fixed base points awarded for a program, independent of photo count
pub const BASE_POINTS: i64 = 3;

/// Points contributed by a program with `photo_count` photos
pub fn points_for_photos(photo_count: usize) -> i64 {
    BASE_POINTS + photo_count as i64
}

/// Score delta for an edit that changes the photo count
pub fn edit_delta(old_count: usize, new_count: usize) -> i64 {
    new_count as i64 - old_count as i64
}

/// Apply a delta to a running total, clamping at zero
///
/// Clamping (rather than erroring) on underflow is deliberate: an
/// edge-case double-deletion must not leave a negative score.
pub fn apply_delta(total: i64, delta: i64) -> i64 {
    (total + delta).max(0)
}

/// Apply a program score delta to the owning unit's stored total
///
/// Runs on the caller's connection so it lands in the same transaction
/// as the program-row change.
pub async fn apply_program_delta(
    conn: &mut SqliteConnection,
    unit_id: Uuid,
    delta: i64,
) -> Result<i64> {
    let total = db::units::load_total_score(conn, unit_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Unit {} not found", unit_id)))?;

    let new_total = apply_delta(total, delta);
    db::units::update_total_score(conn, unit_id, new_total).await?;

    Ok(new_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    #[test]
    fn adding_k_photos_is_worth_three_plus_k() {
        assert_eq!(points_for_photos(1), 4);
        assert_eq!(points_for_photos(5), 8);
        assert_eq!(points_for_photos(10), 13);
    }

    #[test]
    fn edit_delta_ignores_base_points() {
        assert_eq!(edit_delta(2, 5), 3);
        assert_eq!(edit_delta(5, 2), -3);
        assert_eq!(edit_delta(4, 4), 0);
    }

    #[test]
    fn deltas_clamp_at_zero() {
        assert_eq!(apply_delta(3, -5), 0);
        assert_eq!(apply_delta(0, -1), 0);
        assert_eq!(apply_delta(10, -10), 0);
        assert_eq!(apply_delta(10, 5), 15);
    }

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_stored_total_never_negative() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let unit = Unit::new("Delta".to_string(), "delta".to_string(), "h".to_string());
        db::units::insert_unit(&mut conn, &unit).await.unwrap();

        let total = apply_program_delta(&mut conn, unit.id, 7).await.unwrap();
        assert_eq!(total, 7);

        // Deleting a program worth more than the current total clamps to 0
        let total = apply_program_delta(&mut conn, unit.id, -9).await.unwrap();
        assert_eq!(total, 0);

        let stored = db::units::load_total_score(&mut conn, unit.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, 0);
    }

    #[tokio::test]
    async fn test_missing_unit_is_not_found() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let err = apply_program_delta(&mut conn, Uuid::new_v4(), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
