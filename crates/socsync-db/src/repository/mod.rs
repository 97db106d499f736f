//! # Repository Module
//!
//! Database repository implementations for socsync.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Engine reconciler                                                     │
//! │       │                                                                 │
//! │       │  db.units().find_by_natural_key("U1", "1")                     │
//! │       ▼                                                                 │
//! │  UnitRepository                                                        │
//! │  ├── find_by_natural_key(&self, soc_code, company_code)                │
//! │  ├── find_active_by_name(&self, name, company_code)                    │
//! │  ├── first_active_for_company(&self, company_code)                     │
//! │  ├── insert(&self, unit)                                               │
//! │  └── update(&self, unit)                                               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Natural-key lookups live in one place                               │
//! │  • SQL is isolated from reconciliation policy                          │
//! │  • Repositories are individually testable against :memory:            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`company::CompanyRepository`] - Company upsert primitives
//! - [`unit::UnitRepository`] - Unit upsert + name/fallback lookups
//! - [`sector::SectorRepository`] - Sector upsert + name/fallback lookups
//! - [`job::JobRepository`] - Job upsert primitives

pub mod company;
pub mod job;
pub mod sector;
pub mod unit;

use uuid::Uuid;

/// Generates a fresh entity id.
///
/// UUID v4 string ids: globally unique without coordination, matching
/// the id column type across all four tables.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
