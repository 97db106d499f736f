//! # Job Repository
//!
//! Database operations for jobs.
//!
//! Jobs sit at the bottom of the hierarchy and use the plain global SOC
//! code as natural key, like companies.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use socsync_core::Job;

const JOB_COLUMNS: &str = "id, soc_code, soc_company_code, name, detailed_description, \
     sector_id, active, created_at, updated_at";

/// Repository for job database operations.
#[derive(Debug, Clone)]
pub struct JobRepository {
    pool: SqlitePool,
}

impl JobRepository {
    /// Creates a new JobRepository.
    pub fn new(pool: SqlitePool) -> Self {
        JobRepository { pool }
    }

    /// Finds a job by its SOC code (the natural key).
    pub async fn find_by_soc_code(&self, soc_code: &str) -> DbResult<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE soc_code = ?1 LIMIT 1"
        ))
        .bind(soc_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    /// Inserts a new job row.
    pub async fn insert(&self, job: &Job) -> DbResult<()> {
        debug!(soc_code = %job.soc_code, "Inserting job");

        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, soc_code, soc_company_code, name, detailed_description,
                sector_id, active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&job.id)
        .bind(&job.soc_code)
        .bind(&job.soc_company_code)
        .bind(&job.name)
        .bind(&job.detailed_description)
        .bind(&job.sector_id)
        .bind(job.active)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites an existing job row, preserving id and created_at.
    pub async fn update(&self, job: &Job) -> DbResult<()> {
        debug!(id = %job.id, "Updating job");

        let result = sqlx::query(
            r#"
            UPDATE jobs SET
                soc_code = ?2,
                soc_company_code = ?3,
                name = ?4,
                detailed_description = ?5,
                sector_id = ?6,
                active = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&job.id)
        .bind(&job.soc_code)
        .bind(&job.soc_company_code)
        .bind(&job.name)
        .bind(&job.detailed_description)
        .bind(&job.sector_id)
        .bind(job.active)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Job", &job.id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::generate_id;
    use chrono::Utc;
    use socsync_core::{Company, Sector, Unit};

    async fn seed_sector(db: &Database) -> Sector {
        let now = Utc::now();
        let company = Company {
            id: generate_id(),
            soc_code: "1".to_string(),
            name: "Acme".to_string(),
            legal_name: None,
            tax_id: None,
            address: None,
            active: true,
            created_at: now,
            updated_at: now,
        };
        db.companies().insert(&company).await.unwrap();

        let unit = Unit {
            id: generate_id(),
            soc_code: "U1".to_string(),
            soc_company_code: "1".to_string(),
            name: "HQ".to_string(),
            legal_name: None,
            tax_id: None,
            person_tax_id: None,
            address: None,
            risk_degree: None,
            company_id: company.id.clone(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        db.units().insert(&unit).await.unwrap();

        let sector = Sector {
            id: generate_id(),
            soc_code: "S1".to_string(),
            soc_company_code: "1".to_string(),
            name: "Finance".to_string(),
            unit_id: unit.id.clone(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        db.sectors().insert(&sector).await.unwrap();
        sector
    }

    #[tokio::test]
    async fn test_insert_and_update_round() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sector = seed_sector(&db).await;
        let repo = db.jobs();

        let now = Utc::now();
        let mut job = Job {
            id: generate_id(),
            soc_code: "J1".to_string(),
            soc_company_code: "1".to_string(),
            name: "Analyst".to_string(),
            detailed_description: None,
            sector_id: sector.id.clone(),
            active: true,
            created_at: now,
            updated_at: now,
        };

        repo.insert(&job).await.unwrap();

        job.name = "Senior Analyst".to_string();
        job.updated_at = Utc::now();
        repo.update(&job).await.unwrap();

        let found = repo.find_by_soc_code("J1").await.unwrap().unwrap();
        assert_eq!(found.id, job.id);
        assert_eq!(found.name, "Senior Analyst");
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sector = seed_sector(&db).await;

        let now = Utc::now();
        let job = Job {
            id: "missing".to_string(),
            soc_code: "J1".to_string(),
            soc_company_code: "1".to_string(),
            name: "Analyst".to_string(),
            detailed_description: None,
            sector_id: sector.id,
            active: true,
            created_at: now,
            updated_at: now,
        };

        let err = db.jobs().update(&job).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
