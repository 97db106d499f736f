//! # Parent Resolution Strategies
//!
//! Strategies for placing sectors under units and jobs under sectors.
//!
//! ## Resolution Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Parent Resolution Chain                            │
//! │                                                                         │
//! │  Sector "Assembly" needs a parent unit:                                 │
//! │                                                                         │
//! │  1. HierarchyLookup                                                     │
//! │     hierarchy feed: "Assembly" ──► "Plant North"                        │
//! │     db: active unit named "Plant North" in this company                 │
//! │                                                                         │
//! │  2. FirstSiblingFallback          (only if step 1 found nothing)        │
//! │     db: first active unit of the company, in soc_code order             │
//! │                                                                         │
//! │  3. Neither found a parent ──► the record fails, the stage continues    │
//! │                                                                         │
//! │  Jobs resolve the same way, one level down: feed places the job in a    │
//! │  (unit, sector) pair, the fallback is the company's first sector.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use tracing::{debug, warn};

use socsync_core::{Sector, Unit};
use socsync_db::Database;

use crate::error::{EngineError, EngineResult};
use crate::hierarchy::HierarchyIndex;

// =============================================================================
// Strategy Traits
// =============================================================================

/// One attempt at finding the parent unit for a named sector.
///
/// Returns `Ok(None)` when this strategy has no answer, letting the next
/// strategy in the chain try.
#[async_trait]
pub trait UnitStrategy: Send + Sync {
    async fn resolve_unit(
        &self,
        db: &Database,
        hierarchy: &HierarchyIndex,
        company_code: &str,
        sector_name: &str,
    ) -> EngineResult<Option<Unit>>;
}

/// One attempt at finding the parent sector for a named job.
#[async_trait]
pub trait SectorStrategy: Send + Sync {
    async fn resolve_sector(
        &self,
        db: &Database,
        hierarchy: &HierarchyIndex,
        company_code: &str,
        job_name: &str,
    ) -> EngineResult<Option<Sector>>;
}

// =============================================================================
// Hierarchy Lookup
// =============================================================================

/// Resolves parents through the organizational hierarchy feed.
///
/// The feed speaks in display names, so an answer from the feed still has
/// to match a row in the local store to count.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyLookup;

#[async_trait]
impl UnitStrategy for HierarchyLookup {
    async fn resolve_unit(
        &self,
        db: &Database,
        hierarchy: &HierarchyIndex,
        company_code: &str,
        sector_name: &str,
    ) -> EngineResult<Option<Unit>> {
        let Some(unit_name) = hierarchy.unit_for_sector(sector_name) else {
            return Ok(None);
        };

        let unit = db.units().find_active_by_name(unit_name, company_code).await?;
        if unit.is_none() {
            debug!(
                sector_name,
                unit_name, "Hierarchy names a unit with no matching local row"
            );
        }
        Ok(unit)
    }
}

#[async_trait]
impl SectorStrategy for HierarchyLookup {
    async fn resolve_sector(
        &self,
        db: &Database,
        hierarchy: &HierarchyIndex,
        company_code: &str,
        job_name: &str,
    ) -> EngineResult<Option<Sector>> {
        let Some(placement) = hierarchy.placement_for_job(job_name) else {
            return Ok(None);
        };

        // Two hops: the named unit first, then the named sector inside it.
        let Some(unit) = db
            .units()
            .find_active_by_name(&placement.unit_name, company_code)
            .await?
        else {
            debug!(job_name, unit_name = %placement.unit_name, "Hierarchy unit not found locally");
            return Ok(None);
        };

        let sector = db
            .sectors()
            .find_by_name_and_unit(&placement.sector_name, &unit.id, company_code)
            .await?;
        Ok(sector)
    }
}

// =============================================================================
// First Sibling Fallback
// =============================================================================

/// Falls back to the first parent row the company has, in soc_code order.
///
/// The legacy hierarchy feed is incomplete for some companies. A record
/// with no feed placement is still persisted rather than dropped, parked
/// under a deterministic sibling.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSiblingFallback;

#[async_trait]
impl UnitStrategy for FirstSiblingFallback {
    async fn resolve_unit(
        &self,
        db: &Database,
        _hierarchy: &HierarchyIndex,
        company_code: &str,
        sector_name: &str,
    ) -> EngineResult<Option<Unit>> {
        let unit = db.units().first_active_for_company(company_code).await?;
        if let Some(ref unit) = unit {
            warn!(sector_name, fallback_unit = %unit.name, "Using fallback unit");
        }
        Ok(unit)
    }
}

#[async_trait]
impl SectorStrategy for FirstSiblingFallback {
    async fn resolve_sector(
        &self,
        db: &Database,
        _hierarchy: &HierarchyIndex,
        company_code: &str,
        job_name: &str,
    ) -> EngineResult<Option<Sector>> {
        let sector = db.sectors().first_for_company(company_code).await?;
        if let Some(ref sector) = sector {
            warn!(job_name, fallback_sector = %sector.name, "Using fallback sector");
        }
        Ok(sector)
    }
}

// =============================================================================
// Resolver Chains
// =============================================================================

/// Ordered chain of unit strategies.
pub struct UnitResolver {
    strategies: Vec<Box<dyn UnitStrategy>>,
}

impl UnitResolver {
    /// Standard chain: hierarchy lookup, then first-sibling fallback.
    pub fn standard() -> Self {
        UnitResolver {
            strategies: vec![Box::new(HierarchyLookup), Box::new(FirstSiblingFallback)],
        }
    }

    /// Builds a chain from explicit strategies.
    pub fn with_strategies(strategies: Vec<Box<dyn UnitStrategy>>) -> Self {
        UnitResolver { strategies }
    }

    /// Runs the chain. Fails with a per-record error when no strategy
    /// produces a parent.
    pub async fn resolve(
        &self,
        db: &Database,
        hierarchy: &HierarchyIndex,
        company_code: &str,
        sector_name: &str,
    ) -> EngineResult<Unit> {
        for strategy in &self.strategies {
            if let Some(unit) = strategy
                .resolve_unit(db, hierarchy, company_code, sector_name)
                .await?
            {
                return Ok(unit);
            }
        }

        Err(EngineError::parent_not_found(format!(
            "No units found for company {}",
            company_code
        )))
    }
}

/// Ordered chain of sector strategies.
pub struct SectorResolver {
    strategies: Vec<Box<dyn SectorStrategy>>,
}

impl SectorResolver {
    /// Standard chain: hierarchy lookup, then first-sibling fallback.
    pub fn standard() -> Self {
        SectorResolver {
            strategies: vec![Box::new(HierarchyLookup), Box::new(FirstSiblingFallback)],
        }
    }

    /// Builds a chain from explicit strategies.
    pub fn with_strategies(strategies: Vec<Box<dyn SectorStrategy>>) -> Self {
        SectorResolver { strategies }
    }

    /// Runs the chain. Fails with a per-record error when no strategy
    /// produces a parent.
    pub async fn resolve(
        &self,
        db: &Database,
        hierarchy: &HierarchyIndex,
        company_code: &str,
        job_name: &str,
    ) -> EngineResult<Sector> {
        for strategy in &self.strategies {
            if let Some(sector) = strategy
                .resolve_sector(db, hierarchy, company_code, job_name)
                .await?
            {
                return Ok(sector);
            }
        }

        Err(EngineError::parent_not_found(format!(
            "No sectors found for company {}",
            company_code
        )))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
