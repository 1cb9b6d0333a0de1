//! SQLite pool construction and the module migration runner.

use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use stacks_kernel::settings::DatabaseSettings;
use stacks_kernel::Migration;

/// Build the shared connection pool from settings.
///
/// The database file is created on first use. WAL mode keeps readers and the
/// writer from blocking each other.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to '{}'", settings.url))?;

    tracing::info!(target: "stacks-db", url = %settings.url, "database pool ready");

    Ok(pool)
}

/// Open an in-memory database (for testing).
///
/// Capped at a single connection: each in-memory connection is its own
/// database, so a larger pool would hand out empty databases.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("failed to open in-memory database")?;

    Ok(pool)
}

/// Apply module migrations, recording each in the `_migrations` ledger.
///
/// Pairs already present in the ledger are skipped, so the runner is safe to
/// call on every startup. Each migration executes inside its own transaction
/// together with its ledger row.
pub async fn run_migrations(
    pool: &SqlitePool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            module     TEXT NOT NULL,
            id         TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (module, id)
        )",
    )
    .execute(pool)
    .await
    .context("failed to create migration ledger")?;

    for (module, migration) in migrations {
        let applied: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM _migrations WHERE module = ?1 AND id = ?2")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await
                .with_context(|| {
                    format!("failed to read migration ledger for '{module}/{}'", migration.id)
                })?;

        if applied.is_some() {
            tracing::debug!(
                target: "stacks-db",
                module = %module,
                id = migration.id,
                "migration already applied"
            );
            continue;
        }

        let mut tx = pool
            .begin()
            .await
            .context("failed to begin migration transaction")?;

        sqlx::query(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration '{module}/{}' failed", migration.id))?;

        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?1, ?2)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to record migration '{module}/{}'", migration.id))?;

        tx.commit()
            .await
            .with_context(|| format!("failed to commit migration '{module}/{}'", migration.id))?;

        tracing::info!(
            target: "stacks-db",
            module = %module,
            id = migration.id,
            "applied migration"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_migrations() -> Vec<(String, Migration)> {
        vec![(
            "widgets".to_string(),
            Migration {
                id: "001_create_widgets",
                up: "CREATE TABLE widgets (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
            },
        )]
    }

    #[tokio::test]
    async fn migrations_apply_and_record() {
        let pool = connect_in_memory().await.unwrap();
        run_migrations(&pool, &sample_migrations()).await.unwrap();

        sqlx::query("INSERT INTO widgets (name) VALUES (?1)")
            .bind("gear")
            .execute(&pool)
            .await
            .unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        let migrations = sample_migrations();

        run_migrations(&pool, &migrations).await.unwrap();
        // A second run must skip the recorded migration instead of failing
        // on the existing table.
        run_migrations(&pool, &migrations).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn failed_migration_reports_module_and_id() {
        let pool = connect_in_memory().await.unwrap();
        let migrations = vec![(
            "broken".to_string(),
            Migration {
                id: "001_bad_sql",
                up: "CREATE TABLE",
            },
        )];

        let error = run_migrations(&pool, &migrations).await.unwrap_err();
        assert!(error.to_string().contains("broken/001_bad_sql"));
    }
}
