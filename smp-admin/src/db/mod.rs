//! Database access for smp-admin

pub mod members;
pub mod programs;
pub mod units;

use anyhow::Result;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to portal.db inside the data directory, creating it if missing.
/// `foreign_keys` is a per-connection pragma in SQLite, so it goes in the
/// connect options where every pooled connection picks it up.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!("Connecting to database: {}", db_path.display());
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(options).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the portal tables if they don't exist
///
/// Committee slots and photo lists are JSON documents in TEXT columns;
/// programs are unit-owned child rows removed by cascade.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS units (
            id TEXT PRIMARY KEY,
            name TEXT UNIQUE NOT NULL,
            username TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            default_username TEXT,
            default_password_hash TEXT,
            msf_committee TEXT NOT NULL DEFAULT '{}',
            haritha_committee TEXT NOT NULL DEFAULT '{}',
            total_score INTEGER NOT NULL DEFAULT 0 CHECK (total_score >= 0),
            rank INTEGER NOT NULL DEFAULT 0,
            grade TEXT NOT NULL DEFAULT 'F',
            classification TEXT NOT NULL DEFAULT 'Average',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS programs (
            id TEXT PRIMARY KEY,
            unit_id TEXT NOT NULL REFERENCES units(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            photos TEXT NOT NULL DEFAULT '[]',
            created_by TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            gender TEXT NOT NULL,
            unit_id TEXT REFERENCES units(id) ON DELETE SET NULL,
            role TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (units, programs, members)");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, Member};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_every_pooled_connection_enforces_foreign_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let pool = init_database_pool(&tmp.path().join("portal.db"))
            .await
            .unwrap();

        // Hold two connections at once so the second insert cannot reuse
        // the first connection; both must reject a reference to a unit
        // that does not exist.
        let mut first = pool.acquire().await.unwrap();
        let mut second = pool.acquire().await.unwrap();

        let orphan = Member::new("M".to_string(), Gender::Male, Some(Uuid::new_v4()));
        assert!(members::insert_member(&mut first, &orphan).await.is_err());

        let orphan = Member::new("N".to_string(), Gender::Female, Some(Uuid::new_v4()));
        assert!(members::insert_member(&mut second, &orphan).await.is_err());
    }
}
