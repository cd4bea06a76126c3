//! Repositories for the `divisions` and `workers` tables.
//!
//! Department filters bind the canonical enum name to a single indexed
//! equality; free-text classification happened at write time.

use sqlx::PgPool;

use radiodesk_core::staff::Department;
use radiodesk_core::types::DbId;

use crate::models::staff::{CreateWorker, Division, UpdateWorker, Worker};

// ===========================================================================
// DivisionRepo
// ===========================================================================

const DIVISION_COLUMNS: &str = "\
    id, name, department, created_at, updated_at";

/// CRUD for the `divisions` table.
pub struct DivisionRepo;

impl DivisionRepo {
    /// List all divisions.
    pub async fn list(pool: &PgPool) -> Result<Vec<Division>, sqlx::Error> {
        let query = format!("SELECT {DIVISION_COLUMNS} FROM divisions ORDER BY name");
        sqlx::query_as::<_, Division>(&query).fetch_all(pool).await
    }

    /// Find a division by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Division>, sqlx::Error> {
        let query = format!("SELECT {DIVISION_COLUMNS} FROM divisions WHERE id = $1");
        sqlx::query_as::<_, Division>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a division with an already-classified department.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        department: Department,
    ) -> Result<Division, sqlx::Error> {
        let query = format!(
            "INSERT INTO divisions (name, department) VALUES ($1, $2) \
             RETURNING {DIVISION_COLUMNS}"
        );
        sqlx::query_as::<_, Division>(&query)
            .bind(name)
            .bind(department.as_str())
            .fetch_one(pool)
            .await
    }

    /// Partial update of name and/or department.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        department: Option<Department>,
    ) -> Result<Division, sqlx::Error> {
        let query = format!(
            "UPDATE divisions SET \
                 name = COALESCE($2, name), \
                 department = COALESCE($3, department), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {DIVISION_COLUMNS}"
        );
        sqlx::query_as::<_, Division>(&query)
            .bind(id)
            .bind(name)
            .bind(department.map(Department::as_str))
            .fetch_one(pool)
            .await
    }

    /// Delete a division. Workers keep their rows with `division_id` nulled.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM divisions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ===========================================================================
// WorkerRepo
// ===========================================================================

const WORKER_COLUMNS: &str = "\
    id, full_name, email, phone, division_id, is_active, created_at, updated_at";

const WORKER_COLUMNS_QUALIFIED: &str = "\
    w.id, w.full_name, w.email, w.phone, w.division_id, w.is_active, \
    w.created_at, w.updated_at";

/// CRUD for the `workers` table.
pub struct WorkerRepo;

impl WorkerRepo {
    /// List workers, optionally filtered by division, department, and
    /// active flag.
    pub async fn list(
        pool: &PgPool,
        division_id: Option<DbId>,
        department: Option<Department>,
        active_only: bool,
    ) -> Result<Vec<Worker>, sqlx::Error> {
        let query = format!(
            "SELECT {WORKER_COLUMNS_QUALIFIED} FROM workers w \
             LEFT JOIN divisions d ON d.id = w.division_id \
             WHERE ($1::BIGINT IS NULL OR w.division_id = $1) \
               AND ($2::TEXT IS NULL OR d.department = $2) \
               AND (NOT $3 OR w.is_active) \
             ORDER BY w.full_name, w.id"
        );
        sqlx::query_as::<_, Worker>(&query)
            .bind(division_id)
            .bind(department.map(Department::as_str))
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Find a worker by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Worker>, sqlx::Error> {
        let query = format!("SELECT {WORKER_COLUMNS} FROM workers WHERE id = $1");
        sqlx::query_as::<_, Worker>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a worker.
    pub async fn create(pool: &PgPool, input: &CreateWorker) -> Result<Worker, sqlx::Error> {
        let query = format!(
            "INSERT INTO workers (full_name, email, phone, division_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {WORKER_COLUMNS}"
        );
        sqlx::query_as::<_, Worker>(&query)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.division_id)
            .fetch_one(pool)
            .await
    }

    /// Partial update.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorker,
    ) -> Result<Worker, sqlx::Error> {
        let query = format!(
            "UPDATE workers SET \
                 full_name = COALESCE($2, full_name), \
                 email = COALESCE($3, email), \
                 phone = COALESCE($4, phone), \
                 division_id = COALESCE($5, division_id), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {WORKER_COLUMNS}"
        );
        sqlx::query_as::<_, Worker>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.division_id)
            .fetch_one(pool)
            .await
    }

    /// Deactivate instead of delete: the roster keeps its history.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE workers SET is_active = FALSE, updated_at = now() \
             WHERE id = $1 AND is_active",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
