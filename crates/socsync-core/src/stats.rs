//! # Sync Statistics
//!
//! Per-run statistics and error accumulation.
//!
//! ## Accumulator Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Statistics Accumulation                             │
//! │                                                                         │
//! │  SyncStats::new() ← fresh value at the START of every run              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  engine threads &mut SyncStats through each stage                      │
//! │       │                                                                 │
//! │       ├── record_success(entity, Created)  → created += 1             │
//! │       ├── record_success(entity, Updated)  → updated += 1             │
//! │       └── record_failure(entity, code, msg) → failed += 1 + log entry │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  finish(Completed | Failed) → terminal snapshot returned to caller     │
//! │                                                                         │
//! │  INVARIANT: created + updated + failed == records fetched per entity   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stats value is owned by a single run. The engine never keeps a
//! long-lived mutable accumulator, so a reused engine cannot leak counts
//! between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Entity Kind
// =============================================================================

/// The four synchronized entity types, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncEntity {
    Company,
    Unit,
    Sector,
    Job,
}

impl std::fmt::Display for SyncEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncEntity::Company => write!(f, "company"),
            SyncEntity::Unit => write!(f, "unit"),
            SyncEntity::Sector => write!(f, "sector"),
            SyncEntity::Job => write!(f, "job"),
        }
    }
}

// =============================================================================
// Reconcile Outcome
// =============================================================================

/// The result of one successful record reconciliation.
///
/// Reconcilers return this explicitly instead of mutating shared
/// counters; the engine aggregates outcomes into [`SyncStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// A new local row was inserted.
    Created,
    /// An existing local row was overwritten (id preserved).
    Updated,
}

// =============================================================================
// Counters
// =============================================================================

/// Created/updated/failed tallies for one entity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounters {
    pub created: u64,
    pub updated: u64,
    pub failed: u64,
}

impl EntityCounters {
    /// Total records accounted for.
    pub fn total(&self) -> u64 {
        self.created + self.updated + self.failed
    }

    /// Tallies one successful outcome.
    pub fn record(&mut self, outcome: ReconcileOutcome) {
        match outcome {
            ReconcileOutcome::Created => self.created += 1,
            ReconcileOutcome::Updated => self.updated += 1,
        }
    }
}

// =============================================================================
// Error Log
// =============================================================================

/// A structured per-record failure entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncErrorEntry {
    /// Entity type the record belonged to.
    pub entity: SyncEntity,
    /// SOC code of the failed record.
    pub code: String,
    /// Captured failure message.
    pub message: String,
}

// =============================================================================
// Run Status
// =============================================================================

/// Terminal state of a sync run.
///
/// `Failed` is set only by an orchestration-level fault (a whole
/// collection could not be fetched); accumulated per-record failures
/// still end in `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

// =============================================================================
// Sync Stats
// =============================================================================

/// Statistics for one sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStats {
    pub companies: EntityCounters,
    pub units: EntityCounters,
    pub sectors: EntityCounters,
    pub jobs: EntityCounters,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,

    /// Terminal state of the run.
    pub status: RunStatus,

    /// Structured log of per-record failures, in occurrence order.
    pub errors: Vec<SyncErrorEntry>,
}

impl SyncStats {
    /// Creates a fresh accumulator for a new run.
    pub fn new() -> Self {
        SyncStats {
            companies: EntityCounters::default(),
            units: EntityCounters::default(),
            sectors: EntityCounters::default(),
            jobs: EntityCounters::default(),
            started_at: Utc::now(),
            completed_at: None,
            status: RunStatus::Running,
            errors: Vec::new(),
        }
    }

    /// Returns the counters for an entity type.
    pub fn counters(&self, entity: SyncEntity) -> &EntityCounters {
        match entity {
            SyncEntity::Company => &self.companies,
            SyncEntity::Unit => &self.units,
            SyncEntity::Sector => &self.sectors,
            SyncEntity::Job => &self.jobs,
        }
    }

    fn counters_mut(&mut self, entity: SyncEntity) -> &mut EntityCounters {
        match entity {
            SyncEntity::Company => &mut self.companies,
            SyncEntity::Unit => &mut self.units,
            SyncEntity::Sector => &mut self.sectors,
            SyncEntity::Job => &mut self.jobs,
        }
    }

    /// Tallies one successful reconciliation.
    pub fn record_success(&mut self, entity: SyncEntity, outcome: ReconcileOutcome) {
        self.counters_mut(entity).record(outcome);
    }

    /// Tallies one per-record failure and appends a log entry.
    pub fn record_failure(
        &mut self,
        entity: SyncEntity,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.counters_mut(entity).failed += 1;
        self.errors.push(SyncErrorEntry {
            entity,
            code: code.into(),
            message: message.into(),
        });
    }

    /// Marks the run terminal.
    pub fn finish(&mut self, status: RunStatus) {
        self.status = status;
        self.completed_at = Some(Utc::now());
    }
}

impl Default for SyncStats {
    fn default() -> Self {
        SyncStats::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_additivity() {
        let mut stats = SyncStats::new();
        stats.record_success(SyncEntity::Unit, ReconcileOutcome::Created);
        stats.record_success(SyncEntity::Unit, ReconcileOutcome::Updated);
        stats.record_failure(SyncEntity::Unit, "U9", "company not found");

        assert_eq!(stats.units.created, 1);
        assert_eq!(stats.units.updated, 1);
        assert_eq!(stats.units.failed, 1);
        assert_eq!(stats.units.total(), 3);
        // Other entity types are untouched
        assert_eq!(stats.companies.total(), 0);
    }

    #[test]
    fn test_failure_appends_error_entry() {
        let mut stats = SyncStats::new();
        stats.record_failure(SyncEntity::Sector, "S1", "no units found for company 1");

        assert_eq!(stats.errors.len(), 1);
        assert_eq!(stats.errors[0].entity, SyncEntity::Sector);
        assert_eq!(stats.errors[0].code, "S1");
    }

    #[test]
    fn test_finish_sets_terminal_state() {
        let mut stats = SyncStats::new();
        assert_eq!(stats.status, RunStatus::Running);
        assert!(stats.completed_at.is_none());

        stats.finish(RunStatus::Completed);
        assert_eq!(stats.status, RunStatus::Completed);
        assert!(stats.completed_at.is_some());
    }

    #[test]
    fn test_entity_display_names() {
        assert_eq!(SyncEntity::Company.to_string(), "company");
        assert_eq!(SyncEntity::Job.to_string(), "job");
    }
}
