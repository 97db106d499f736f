//! # socsync-db: Database Layer for socsync
//!
//! This crate provides database access for the socsync system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        socsync Data Flow                                │
//! │                                                                         │
//! │  Engine reconciler (upsert company/unit/sector/job)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     socsync-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (company.rs,  │    │  (embedded)  │  │   │
//! │  │   │               │    │  unit.rs ...) │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ natural-key   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ finders +     │    │              │  │   │
//! │  │   │ Management    │    │ insert/update │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode, foreign keys on)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (company, unit, sector, job)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use socsync_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/socsync.db")).await?;
//! let company = db.companies().find_by_soc_code("1").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::company::CompanyRepository;
pub use repository::job::JobRepository;
pub use repository::sector::SectorRepository;
pub use repository::unit::UnitRepository;
