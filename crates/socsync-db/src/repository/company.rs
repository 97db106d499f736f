//! # Company Repository
//!
//! Database operations for companies.
//!
//! Companies are the root of the organizational hierarchy. The natural
//! key is the global SOC code, so there is exactly one row per SOC
//! company regardless of how many sync runs have seen it.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use socsync_core::Company;

/// Repository for company database operations.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CompanyRepository { pool }
    }

    /// Finds a company by its SOC code (the natural key).
    ///
    /// ## Returns
    /// * `Ok(Some(Company))` - Company found
    /// * `Ok(None)` - No row for that code yet
    pub async fn find_by_soc_code(&self, soc_code: &str) -> DbResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, soc_code, name, legal_name, tax_id, address,
                   active, created_at, updated_at
            FROM companies
            WHERE soc_code = ?1
            LIMIT 1
            "#,
        )
        .bind(soc_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    /// Inserts a new company row.
    pub async fn insert(&self, company: &Company) -> DbResult<()> {
        debug!(soc_code = %company.soc_code, "Inserting company");

        sqlx::query(
            r#"
            INSERT INTO companies (
                id, soc_code, name, legal_name, tax_id, address,
                active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&company.id)
        .bind(&company.soc_code)
        .bind(&company.name)
        .bind(&company.legal_name)
        .bind(&company.tax_id)
        .bind(&company.address)
        .bind(company.active)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites an existing company row, preserving id and created_at.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No row with that id
    pub async fn update(&self, company: &Company) -> DbResult<()> {
        debug!(id = %company.id, "Updating company");

        let result = sqlx::query(
            r#"
            UPDATE companies SET
                soc_code = ?2,
                name = ?3,
                legal_name = ?4,
                tax_id = ?5,
                address = ?6,
                active = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&company.id)
        .bind(&company.soc_code)
        .bind(&company.name)
        .bind(&company.legal_name)
        .bind(&company.tax_id)
        .bind(&company.address)
        .bind(company.active)
        .bind(company.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Company", &company.id));
        }

        Ok(())
    }

    /// Counts company rows (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
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

    fn sample_company(soc_code: &str, name: &str) -> Company {
        let now = Utc::now();
        Company {
            id: generate_id(),
            soc_code: soc_code.to_string(),
            name: name.to_string(),
            legal_name: Some(format!("{name} Ltda")),
            tax_id: None,
            address: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_by_soc_code() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.companies();

        let company = sample_company("1", "Acme");
        repo.insert(&company).await.unwrap();

        let found = repo.find_by_soc_code("1").await.unwrap().unwrap();
        assert_eq!(found.id, company.id);
        assert_eq!(found.name, "Acme");

        assert!(repo.find_by_soc_code("99").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_preserves_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.companies();

        let mut company = sample_company("1", "Acme");
        repo.insert(&company).await.unwrap();

        company.name = "Acme Corp".to_string();
        company.updated_at = Utc::now();
        repo.update(&company).await.unwrap();

        let found = repo.find_by_soc_code("1").await.unwrap().unwrap();
        assert_eq!(found.id, company.id);
        assert_eq!(found.name, "Acme Corp");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_soc_code_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.companies();

        repo.insert(&sample_company("1", "Acme")).await.unwrap();
        let err = repo.insert(&sample_company("1", "Other")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
