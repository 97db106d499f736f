//! # socsync-core: Pure Domain Types for socsync
//!
//! This crate defines the data that flows through the sync engine, with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        socsync Data Flow                                │
//! │                                                                         │
//! │  SOC export endpoint (legacy JSON)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ socsync-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐     ┌────────────┐     ┌──────────────┐        │   │
//! │  │   │  records  │     │  entities  │     │    stats     │        │   │
//! │  │   │ Company-  │ ──► │  Company   │     │  SyncStats   │        │   │
//! │  │   │ Record .. │     │  Unit ..   │     │  Counters    │        │   │
//! │  │   └───────────┘     └────────────┘     └──────────────┘        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE TYPES               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  socsync-db (SQLite) / socsync-engine (reconciliation)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`records`] - Wire records exactly as the SOC endpoint emits them
//! - [`entities`] - Persisted rows with local ids and timestamps
//! - [`stats`] - Per-run statistics and error accumulation

// =============================================================================
// Module Declarations
// =============================================================================

pub mod entities;
pub mod records;
pub mod stats;

// =============================================================================
// Re-exports
// =============================================================================

pub use entities::{Company, Job, Sector, Unit};
pub use records::{
    soc_flag_is_active, CompanyRecord, HierarchyRecord, JobRecord, SectorRecord, UnitRecord,
};
pub use stats::{
    EntityCounters, ReconcileOutcome, RunStatus, SyncEntity, SyncErrorEntry, SyncStats,
};
