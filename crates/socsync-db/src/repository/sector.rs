//! # Sector Repository
//!
//! Database operations for sectors.
//!
//! The sector natural key is COMPOSITE: `(soc_code, name, active)`.
//! A sector that is renamed or flips its active flag therefore matches
//! no existing row and is inserted as a new one. This mirrors the source
//! system's own ambiguity about sector identity and is pinned by the
//! natural-key stability tests.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use socsync_core::Sector;

const SECTOR_COLUMNS: &str =
    "id, soc_code, soc_company_code, name, unit_id, active, created_at, updated_at";

/// Repository for sector database operations.
#[derive(Debug, Clone)]
pub struct SectorRepository {
    pool: SqlitePool,
}

impl SectorRepository {
    /// Creates a new SectorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SectorRepository { pool }
    }

    /// Finds a sector by its composite natural key.
    pub async fn find_by_natural_key(
        &self,
        soc_code: &str,
        name: &str,
        active: bool,
    ) -> DbResult<Option<Sector>> {
        let sector = sqlx::query_as::<_, Sector>(&format!(
            "SELECT {SECTOR_COLUMNS} FROM sectors \
             WHERE soc_code = ?1 AND name = ?2 AND active = ?3 LIMIT 1"
        ))
        .bind(soc_code)
        .bind(name)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sector)
    }

    /// Finds a sector by display name within a unit and company.
    ///
    /// Used by the two-hop job hierarchy resolution (unit name first,
    /// then sector name inside that unit).
    pub async fn find_by_name_and_unit(
        &self,
        name: &str,
        unit_id: &str,
        soc_company_code: &str,
    ) -> DbResult<Option<Sector>> {
        let sector = sqlx::query_as::<_, Sector>(&format!(
            "SELECT {SECTOR_COLUMNS} FROM sectors \
             WHERE name = ?1 AND unit_id = ?2 AND soc_company_code = ?3 LIMIT 1"
        ))
        .bind(name)
        .bind(unit_id)
        .bind(soc_company_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sector)
    }

    /// Returns the first sector of a company, in soc_code order.
    ///
    /// This is the fallback parent for jobs when hierarchy resolution
    /// misses. Ordering by soc_code makes the choice deterministic.
    pub async fn first_for_company(&self, soc_company_code: &str) -> DbResult<Option<Sector>> {
        let sector = sqlx::query_as::<_, Sector>(&format!(
            "SELECT {SECTOR_COLUMNS} FROM sectors \
             WHERE soc_company_code = ?1 ORDER BY soc_code LIMIT 1"
        ))
        .bind(soc_company_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sector)
    }

    /// Inserts a new sector row.
    pub async fn insert(&self, sector: &Sector) -> DbResult<()> {
        debug!(soc_code = %sector.soc_code, name = %sector.name, "Inserting sector");

        sqlx::query(
            r#"
            INSERT INTO sectors (
                id, soc_code, soc_company_code, name, unit_id, active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&sector.id)
        .bind(&sector.soc_code)
        .bind(&sector.soc_company_code)
        .bind(&sector.name)
        .bind(&sector.unit_id)
        .bind(sector.active)
        .bind(sector.created_at)
        .bind(sector.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites an existing sector row, preserving id and created_at.
    pub async fn update(&self, sector: &Sector) -> DbResult<()> {
        debug!(id = %sector.id, "Updating sector");

        let result = sqlx::query(
            r#"
            UPDATE sectors SET
                soc_code = ?2,
                soc_company_code = ?3,
                name = ?4,
                unit_id = ?5,
                active = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&sector.id)
        .bind(&sector.soc_code)
        .bind(&sector.soc_company_code)
        .bind(&sector.name)
        .bind(&sector.unit_id)
        .bind(sector.active)
        .bind(sector.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sector", &sector.id));
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
    use socsync_core::{Company, Unit};

    async fn seed_unit(db: &Database) -> Unit {
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
        unit
    }

    fn sample_sector(soc_code: &str, name: &str, unit: &Unit, active: bool) -> Sector {
        let now = Utc::now();
        Sector {
            id: generate_id(),
            soc_code: soc_code.to_string(),
            soc_company_code: unit.soc_company_code.clone(),
            name: name.to_string(),
            unit_id: unit.id.clone(),
            active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_composite_natural_key() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let unit = seed_unit(&db).await;
        let repo = db.sectors();

        repo.insert(&sample_sector("S1", "Finance", &unit, true))
            .await
            .unwrap();

        // Same code and name but a different active flag is a different key
        assert!(repo
            .find_by_natural_key("S1", "Finance", true)
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_by_natural_key("S1", "Finance", false)
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_natural_key("S1", "Sales", true)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_by_name_and_unit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let unit = seed_unit(&db).await;
        let repo = db.sectors();

        repo.insert(&sample_sector("S1", "Finance", &unit, true))
            .await
            .unwrap();

        let found = repo
            .find_by_name_and_unit("Finance", &unit.id, "1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.soc_code, "S1");

        assert!(repo
            .find_by_name_and_unit("Finance", "other-unit", "1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_first_for_company_ordering() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let unit = seed_unit(&db).await;
        let repo = db.sectors();

        repo.insert(&sample_sector("S2", "Sales", &unit, true))
            .await
            .unwrap();
        repo.insert(&sample_sector("S1", "Finance", &unit, true))
            .await
            .unwrap();

        let first = repo.first_for_company("1").await.unwrap().unwrap();
        assert_eq!(first.soc_code, "S1");

        assert!(repo.first_for_company("42").await.unwrap().is_none());
    }
}
