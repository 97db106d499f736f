//! # Sync Engine
//!
//! Orchestrates a full reconciliation run against the remote system.
//!
//! ## Run Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Full Sync Run                                  │
//! │                                                                         │
//! │  stage 1  COMPANIES   fetch all ──► upsert each                         │
//! │      │                                                                  │
//! │  stage 2  UNITS       fetch all ──► resolve company ──► upsert each     │
//! │      │                                                                  │
//! │  stage 3  SECTORS     fetch all ──► group by company                    │
//! │      │                  per company: fetch hierarchy ONCE               │
//! │      │                  per record: resolve unit ──► upsert             │
//! │      │                                                                  │
//! │  stage 4  JOBS        same shape as sectors, one level down             │
//! │                                                                         │
//! │  Stages run in FK dependency order so parents exist before children     │
//! │  look them up.                                                          │
//! │                                                                         │
//! │  Failure handling:                                                      │
//! │    one record fails  → count it, log it, keep going                     │
//! │    one fetch fails   → abort the run, return partial stats + error      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use tracing::{error, info, warn};

use socsync_core::{RunStatus, SyncEntity, SyncStats};
use socsync_db::Database;

use crate::client::SocFeed;
use crate::error::{EngineError, EngineResult};
use crate::hierarchy::HierarchyCache;
use crate::reconcile::{reconcile_company, reconcile_job, reconcile_sector, reconcile_unit};
use crate::resolve::{SectorResolver, UnitResolver};

// =============================================================================
// Run Result
// =============================================================================

/// A run that aborted on an orchestration-level fault.
///
/// Carries the statistics accumulated up to the abort so callers can
/// still report the partial progress.
#[derive(Debug)]
pub struct AbortedSync {
    /// Partial statistics, already marked [`RunStatus::Failed`].
    pub stats: SyncStats,
    /// The fault that aborted the run.
    pub error: EngineError,
}

impl std::fmt::Display for AbortedSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sync aborted: {}", self.error)
    }
}

impl std::error::Error for AbortedSync {}

/// Outcome of one run: completed statistics, or partial statistics plus
/// the aborting fault.
pub type RunResult = Result<SyncStats, AbortedSync>;

// =============================================================================
// Engine
// =============================================================================

/// The reconciliation engine.
///
/// Generic over the feed so tests can drive it from fixtures. Holds no
/// per-run state: statistics are a fresh value per run and the hierarchy
/// cache lives inside a single stage.
pub struct SyncEngine<F: SocFeed> {
    feed: F,
    db: Database,
    unit_resolver: UnitResolver,
    sector_resolver: SectorResolver,
}

impl<F: SocFeed> SyncEngine<F> {
    /// Creates an engine with the standard resolution chains.
    pub fn new(feed: F, db: Database) -> Self {
        SyncEngine {
            feed,
            db,
            unit_resolver: UnitResolver::standard(),
            sector_resolver: SectorResolver::standard(),
        }
    }

    /// Creates an engine with explicit resolution chains.
    pub fn with_resolvers(
        feed: F,
        db: Database,
        unit_resolver: UnitResolver,
        sector_resolver: SectorResolver,
    ) -> Self {
        SyncEngine {
            feed,
            db,
            unit_resolver,
            sector_resolver,
        }
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Returns the underlying feed.
    pub fn feed(&self) -> &F {
        &self.feed
    }

    // =========================================================================
    // Run Entry Points
    // =========================================================================

    /// Runs all four stages in dependency order.
    pub async fn sync_all(&self) -> RunResult {
        info!("Starting full sync");
        let mut stats = SyncStats::new();

        let result = async {
            self.run_companies(&mut stats).await?;
            self.run_units(&mut stats).await?;
            self.run_sectors(&mut stats).await?;
            self.run_jobs(&mut stats).await?;
            Ok::<(), EngineError>(())
        }
        .await;

        self.finish(stats, result)
    }

    /// Runs only the company stage.
    pub async fn sync_companies(&self) -> RunResult {
        let mut stats = SyncStats::new();
        let result = self.run_companies(&mut stats).await;
        self.finish(stats, result)
    }

    /// Runs only the unit stage. Assumes companies are already present;
    /// units whose company is missing fail individually.
    pub async fn sync_units(&self) -> RunResult {
        let mut stats = SyncStats::new();
        let result = self.run_units(&mut stats).await;
        self.finish(stats, result)
    }

    /// Runs only the sector stage.
    pub async fn sync_sectors(&self) -> RunResult {
        let mut stats = SyncStats::new();
        let result = self.run_sectors(&mut stats).await;
        self.finish(stats, result)
    }

    /// Runs only the job stage.
    pub async fn sync_jobs(&self) -> RunResult {
        let mut stats = SyncStats::new();
        let result = self.run_jobs(&mut stats).await;
        self.finish(stats, result)
    }

    /// Seals the statistics according to how the stages ended.
    fn finish(&self, mut stats: SyncStats, result: EngineResult<()>) -> RunResult {
        match result {
            Ok(()) => {
                stats.finish(RunStatus::Completed);
                info!(
                    companies = stats.companies.total(),
                    units = stats.units.total(),
                    sectors = stats.sectors.total(),
                    jobs = stats.jobs.total(),
                    failures = stats.errors.len(),
                    "Sync completed"
                );
                Ok(stats)
            }
            Err(error) => {
                error!(%error, "Sync aborted");
                stats.finish(RunStatus::Failed);
                Err(AbortedSync { stats, error })
            }
        }
    }

    // =========================================================================
    // Stages
    // =========================================================================

    async fn run_companies(&self, stats: &mut SyncStats) -> EngineResult<()> {
        let records = self.feed.fetch_companies().await?;
        info!(count = records.len(), "Reconciling companies");

        for record in &records {
            match reconcile_company(&self.db, record).await {
                Ok(outcome) => stats.record_success(SyncEntity::Company, outcome),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(soc_code = %record.codigo, error = %e, "Company record failed");
                    stats.record_failure(SyncEntity::Company, &record.codigo, e.to_string());
                }
            }
        }

        Ok(())
    }

    async fn run_units(&self, stats: &mut SyncStats) -> EngineResult<()> {
        // All units, not just active ones: the local store mirrors the
        // active flag instead of filtering on it.
        let records = self.feed.fetch_units(false).await?;
        info!(count = records.len(), "Reconciling units");

        for record in &records {
            match reconcile_unit(&self.db, record).await {
                Ok(outcome) => stats.record_success(SyncEntity::Unit, outcome),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(soc_code = %record.codigo_unidade, error = %e, "Unit record failed");
                    stats.record_failure(SyncEntity::Unit, &record.codigo_unidade, e.to_string());
                }
            }
        }

        Ok(())
    }

    async fn run_sectors(&self, stats: &mut SyncStats) -> EngineResult<()> {
        let records = self.feed.fetch_sectors().await?;
        info!(count = records.len(), "Reconciling sectors");

        let mut cache = HierarchyCache::new();

        for (company_code, group) in group_by_company(&records, |r| &r.codigo_empresa) {
            // One hierarchy fetch per company, no matter how many sectors.
            let index = cache.get_or_fetch(&self.feed, company_code).await?;

            for record in group {
                match reconcile_sector(&self.db, record, index, &self.unit_resolver).await {
                    Ok(outcome) => stats.record_success(SyncEntity::Sector, outcome),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!(
                            soc_code = %record.codigo_setor,
                            name = %record.nome_setor,
                            error = %e,
                            "Sector record failed"
                        );
                        stats.record_failure(SyncEntity::Sector, &record.codigo_setor, e.to_string());
                    }
                }
            }
        }

        Ok(())
    }

    async fn run_jobs(&self, stats: &mut SyncStats) -> EngineResult<()> {
        let records = self.feed.fetch_jobs().await?;
        info!(count = records.len(), "Reconciling jobs");

        let mut cache = HierarchyCache::new();

        for (company_code, group) in group_by_company(&records, |r| &r.codigo_empresa) {
            let index = cache.get_or_fetch(&self.feed, company_code).await?;

            for record in group {
                match reconcile_job(&self.db, record, index, &self.sector_resolver).await {
                    Ok(outcome) => stats.record_success(SyncEntity::Job, outcome),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!(
                            soc_code = %record.codigo_cargo,
                            name = %record.nome_cargo,
                            error = %e,
                            "Job record failed"
                        );
                        stats.record_failure(SyncEntity::Job, &record.codigo_cargo, e.to_string());
                    }
                }
            }
        }

        Ok(())
    }
}

/// Groups records by company code, preserving feed order within a
/// company and iterating companies in code order.
fn group_by_company<'a, T>(
    records: &'a [T],
    key: impl Fn(&'a T) -> &'a str,
) -> BTreeMap<&'a str, Vec<&'a T>> {
    let mut groups: BTreeMap<&str, Vec<&T>> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(record);
    }
    groups
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use socsync_core::SectorRecord;

    #[test]
    fn test_group_by_company_preserves_feed_order() {
        let records = vec![
            SectorRecord {
                codigo_empresa: "2".into(),
                nome_empresa: String::new(),
                codigo_setor: "S3".into(),
                nome_setor: "C".into(),
                setor_ativo: "1".into(),
            },
            SectorRecord {
                codigo_empresa: "1".into(),
                nome_empresa: String::new(),
                codigo_setor: "S2".into(),
                nome_setor: "B".into(),
                setor_ativo: "1".into(),
            },
            SectorRecord {
                codigo_empresa: "1".into(),
                nome_empresa: String::new(),
                codigo_setor: "S1".into(),
                nome_setor: "A".into(),
                setor_ativo: "1".into(),
            },
        ];

        let groups = group_by_company(&records, |r| &r.codigo_empresa);
        let keys: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["1", "2"]);

        // Within company 1, feed order S2 then S1 survives grouping
        let codes: Vec<&str> = groups["1"].iter().map(|r| r.codigo_setor.as_str()).collect();
        assert_eq!(codes, vec!["S2", "S1"]);
    }
}
