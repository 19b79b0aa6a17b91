//! Schema bootstrap and fixture loading
//!
//! Two tables: `policies` with a serial key, and `notes` referencing it.
//! Both functions are idempotent so the server can call them on every start.

use sqlx::PgPool;
use tracing::info;

use domain_policy::{seed_notes, seed_policies};

use crate::error::DatabaseError;

const CREATE_POLICIES: &str = r#"
    CREATE TABLE IF NOT EXISTS policies (
        id SERIAL PRIMARY KEY,
        policy_number TEXT NOT NULL CHECK (policy_number <> ''),
        premium NUMERIC NOT NULL,
        start_date TIMESTAMPTZ NOT NULL
    )
"#;

const CREATE_NOTES: &str = r#"
    CREATE TABLE IF NOT EXISTS notes (
        id SERIAL PRIMARY KEY,
        text TEXT NOT NULL,
        policy_id INTEGER NOT NULL REFERENCES policies (id)
    )
"#;

const CREATE_START_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS policies_start_date_idx ON policies (start_date)";

const CREATE_NOTES_POLICY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS notes_policy_id_idx ON notes (policy_id)";

/// Creates the tables and indexes if they are missing
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in [
        CREATE_POLICIES,
        CREATE_NOTES,
        CREATE_START_DATE_INDEX,
        CREATE_NOTES_POLICY_INDEX,
    ] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::SchemaFailed(e.to_string()))?;
    }

    info!("Policy schema ready");
    Ok(())
}

/// Loads the fixture policies and notes
///
/// Rows whose id already exists are left alone. The id sequences are then
/// moved past the highest id so generated ids never collide with fixtures.
pub async fn seed_fixtures(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

    for policy in seed_policies() {
        sqlx::query(
            r#"
            INSERT INTO policies (id, policy_number, premium, start_date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(policy.id.value())
        .bind(&policy.policy_number)
        .bind(policy.premium)
        .bind(policy.start_date)
        .execute(&mut *tx)
        .await?;
    }

    for note in seed_notes() {
        sqlx::query(
            r#"
            INSERT INTO notes (id, text, policy_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(note.id.value())
        .bind(&note.text)
        .bind(note.policy_id.value())
        .execute(&mut *tx)
        .await?;
    }

    for table in ["policies", "notes"] {
        let statement = format!(
            "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
             COALESCE((SELECT MAX(id) FROM {table}), 0) + 1, false)"
        );
        sqlx::query(&statement).execute(&mut *tx).await?;
    }

    tx.commit()
        .await
        .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

    info!("Fixture policies loaded");
    Ok(())
}
