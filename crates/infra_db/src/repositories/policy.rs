//! Policy repository implementation
//!
//! Plain SQL over the `policies` and `notes` tables. Queries are checked at
//! runtime and mapped through [`sqlx::FromRow`] row types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use core_kernel::{NoteId, PolicyId};
use domain_policy::{Note, Policy};

use crate::error::DatabaseError;

/// Repository for the policy and note tables
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::repositories::PolicyRepository;
///
/// let repo = PolicyRepository::new(pool);
/// let row = repo.find_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    /// Creates a new PolicyRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Retrieves a policy by primary key
    pub async fn find_by_id(&self, id: i32) -> Result<Option<PolicyRow>, DatabaseError> {
        let row = sqlx::query_as::<_, PolicyRow>(
            "SELECT id, policy_number, premium, start_date FROM policies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Retrieves every policy ordered by id
    pub async fn list_all(&self) -> Result<Vec<PolicyRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PolicyRow>(
            "SELECT id, policy_number, premium, start_date FROM policies ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Retrieves policies whose start date lies in `[from, to]`, ordered by id
    pub async fn find_started_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PolicyRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT id, policy_number, premium, start_date
            FROM policies
            WHERE start_date BETWEEN $1 AND $2
            ORDER BY id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Retrieves the notes of the given policies ordered by note id
    pub async fn notes_for(&self, policy_ids: &[i32]) -> Result<Vec<NoteRow>, DatabaseError> {
        if policy_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, NoteRow>(
            "SELECT id, text, policy_id FROM notes WHERE policy_id = ANY($1) ORDER BY id",
        )
        .bind(policy_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts a policy through `executor`, returning the stored row
    ///
    /// Takes any executor so callers can run it inside their own transaction.
    pub async fn insert<'e, E>(executor: E, policy: &NewPolicyRow) -> Result<PolicyRow, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            INSERT INTO policies (policy_number, premium, start_date)
            VALUES ($1, $2, $3)
            RETURNING id, policy_number, premium, start_date
            "#,
        )
        .bind(&policy.policy_number)
        .bind(policy.premium)
        .bind(policy.start_date)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }
}

/// Database row representation of a policy
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PolicyRow {
    pub id: i32,
    pub policy_number: String,
    pub premium: Decimal,
    pub start_date: DateTime<Utc>,
}

impl From<PolicyRow> for Policy {
    fn from(row: PolicyRow) -> Self {
        Policy {
            id: PolicyId::new(row.id),
            policy_number: row.policy_number,
            premium: row.premium,
            start_date: row.start_date,
        }
    }
}

/// Database row representation of a note
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NoteRow {
    pub id: i32,
    pub text: String,
    pub policy_id: i32,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            id: NoteId::new(row.id),
            policy_id: PolicyId::new(row.policy_id),
            text: row.text,
        }
    }
}

/// Data for inserting a policy; the id comes from the sequence
#[derive(Debug, Clone)]
pub struct NewPolicyRow {
    pub policy_number: String,
    pub premium: Decimal,
    pub start_date: DateTime<Utc>,
}
