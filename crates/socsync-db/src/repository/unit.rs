//! # Unit Repository
//!
//! Database operations for units.
//!
//! ## Lookup Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Unit Lookup Paths                                   │
//! │                                                                         │
//! │  Reconciling a unit record:                                             │
//! │    find_by_natural_key(soc_code, company_code)  → upsert target        │
//! │                                                                         │
//! │  Resolving a sector's parent:                                           │
//! │    find_active_by_name(name, company_code)      → hierarchy lookup     │
//! │    first_active_for_company(company_code)       → fallback sibling     │
//! │                                                                         │
//! │  The fallback query orders by soc_code so repeated runs always pick     │
//! │  the same unit.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use socsync_core::Unit;

const UNIT_COLUMNS: &str = "id, soc_code, soc_company_code, name, legal_name, tax_id, \
     person_tax_id, address, risk_degree, company_id, active, created_at, updated_at";

/// Repository for unit database operations.
#[derive(Debug, Clone)]
pub struct UnitRepository {
    pool: SqlitePool,
}

impl UnitRepository {
    /// Creates a new UnitRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UnitRepository { pool }
    }

    /// Finds a unit by its natural key: SOC code scoped by company code.
    pub async fn find_by_natural_key(
        &self,
        soc_code: &str,
        soc_company_code: &str,
    ) -> DbResult<Option<Unit>> {
        let unit = sqlx::query_as::<_, Unit>(&format!(
            "SELECT {UNIT_COLUMNS} FROM units \
             WHERE soc_code = ?1 AND soc_company_code = ?2 LIMIT 1"
        ))
        .bind(soc_code)
        .bind(soc_company_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }

    /// Finds an ACTIVE unit by display name within a company.
    ///
    /// Used by hierarchy resolution: the hierarchy feed names units, it
    /// never carries their codes.
    pub async fn find_active_by_name(
        &self,
        name: &str,
        soc_company_code: &str,
    ) -> DbResult<Option<Unit>> {
        let unit = sqlx::query_as::<_, Unit>(&format!(
            "SELECT {UNIT_COLUMNS} FROM units \
             WHERE name = ?1 AND soc_company_code = ?2 AND active = 1 LIMIT 1"
        ))
        .bind(name)
        .bind(soc_company_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }

    /// Returns the first ACTIVE unit of a company, in soc_code order.
    ///
    /// This is the fallback parent when hierarchy resolution misses.
    /// Ordering by soc_code makes the choice deterministic across runs.
    pub async fn first_active_for_company(
        &self,
        soc_company_code: &str,
    ) -> DbResult<Option<Unit>> {
        let unit = sqlx::query_as::<_, Unit>(&format!(
            "SELECT {UNIT_COLUMNS} FROM units \
             WHERE soc_company_code = ?1 AND active = 1 \
             ORDER BY soc_code LIMIT 1"
        ))
        .bind(soc_company_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }

    /// Inserts a new unit row.
    pub async fn insert(&self, unit: &Unit) -> DbResult<()> {
        debug!(soc_code = %unit.soc_code, company = %unit.soc_company_code, "Inserting unit");

        sqlx::query(
            r#"
            INSERT INTO units (
                id, soc_code, soc_company_code, name, legal_name, tax_id,
                person_tax_id, address, risk_degree, company_id, active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&unit.id)
        .bind(&unit.soc_code)
        .bind(&unit.soc_company_code)
        .bind(&unit.name)
        .bind(&unit.legal_name)
        .bind(&unit.tax_id)
        .bind(&unit.person_tax_id)
        .bind(&unit.address)
        .bind(&unit.risk_degree)
        .bind(&unit.company_id)
        .bind(unit.active)
        .bind(unit.created_at)
        .bind(unit.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites an existing unit row, preserving id and created_at.
    pub async fn update(&self, unit: &Unit) -> DbResult<()> {
        debug!(id = %unit.id, "Updating unit");

        let result = sqlx::query(
            r#"
            UPDATE units SET
                soc_code = ?2,
                soc_company_code = ?3,
                name = ?4,
                legal_name = ?5,
                tax_id = ?6,
                person_tax_id = ?7,
                address = ?8,
                risk_degree = ?9,
                company_id = ?10,
                active = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(&unit.id)
        .bind(&unit.soc_code)
        .bind(&unit.soc_company_code)
        .bind(&unit.name)
        .bind(&unit.legal_name)
        .bind(&unit.tax_id)
        .bind(&unit.person_tax_id)
        .bind(&unit.address)
        .bind(&unit.risk_degree)
        .bind(&unit.company_id)
        .bind(unit.active)
        .bind(unit.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Unit", &unit.id));
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
    use socsync_core::Company;

    async fn seed_company(db: &Database, soc_code: &str) -> Company {
        let now = Utc::now();
        let company = Company {
            id: generate_id(),
            soc_code: soc_code.to_string(),
            name: format!("Company {soc_code}"),
            legal_name: None,
            tax_id: None,
            address: None,
            active: true,
            created_at: now,
            updated_at: now,
        };
        db.companies().insert(&company).await.unwrap();
        company
    }

    fn sample_unit(soc_code: &str, company: &Company, name: &str, active: bool) -> Unit {
        let now = Utc::now();
        Unit {
            id: generate_id(),
            soc_code: soc_code.to_string(),
            soc_company_code: company.soc_code.clone(),
            name: name.to_string(),
            legal_name: None,
            tax_id: None,
            person_tax_id: None,
            address: None,
            risk_degree: None,
            company_id: company.id.clone(),
            active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_natural_key_is_scoped_by_company() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let company_a = seed_company(&db, "1").await;
        let company_b = seed_company(&db, "2").await;
        let repo = db.units();

        // Same unit code in two different companies = two rows
        repo.insert(&sample_unit("U1", &company_a, "HQ", true))
            .await
            .unwrap();
        repo.insert(&sample_unit("U1", &company_b, "Branch", true))
            .await
            .unwrap();

        let a = repo.find_by_natural_key("U1", "1").await.unwrap().unwrap();
        let b = repo.find_by_natural_key("U1", "2").await.unwrap().unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "HQ");
        assert_eq!(b.name, "Branch");
    }

    #[tokio::test]
    async fn test_find_active_by_name_skips_inactive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let company = seed_company(&db, "1").await;
        let repo = db.units();

        repo.insert(&sample_unit("U1", &company, "HQ", false))
            .await
            .unwrap();

        assert!(repo
            .find_active_by_name("HQ", "1")
            .await
            .unwrap()
            .is_none());

        repo.insert(&sample_unit("U2", &company, "HQ", true))
            .await
            .unwrap();

        let found = repo.find_active_by_name("HQ", "1").await.unwrap().unwrap();
        assert_eq!(found.soc_code, "U2");
    }

    #[tokio::test]
    async fn test_first_active_for_company_is_deterministic() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let company = seed_company(&db, "1").await;
        let repo = db.units();

        // Insert out of code order; the fallback must still pick U1
        repo.insert(&sample_unit("U3", &company, "Plant", true))
            .await
            .unwrap();
        repo.insert(&sample_unit("U1", &company, "HQ", true))
            .await
            .unwrap();
        repo.insert(&sample_unit("U2", &company, "Depot", true))
            .await
            .unwrap();

        let first = repo.first_active_for_company("1").await.unwrap().unwrap();
        assert_eq!(first.soc_code, "U1");
    }
}
