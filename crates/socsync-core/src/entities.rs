//! # Persisted Entities
//!
//! The four organizational entities mirrored into the local store.
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, locally generated, used for relations
//! - Natural key: the SOC code(s) used to match a remote record to a
//!   local row across runs
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Entity Hierarchy                                   │
//! │                                                                         │
//! │   Company ──┬── Unit ──┬── Sector ──┬── Job                            │
//! │             │          │            │                                   │
//! │   key:      │  key:    │  key:      │  key:                            │
//! │   soc_code  │  soc_code│  soc_code  │  soc_code                        │
//! │   (global)  │  + comp. │  + name    │  (global)                        │
//! │             │  code    │  + active  │                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entities are created on first sighting, fully overwritten (id and
//! created_at preserved) on every later sighting, and never deleted:
//! absence from a feed has no effect, deactivation arrives through the
//! mirrored `active` flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Company
// =============================================================================

/// A company mirrored from SOC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Company {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// SOC company code - global natural key.
    pub soc_code: String,

    /// Short display name.
    pub name: String,

    /// Legal name.
    pub legal_name: Option<String>,

    /// Company tax id.
    pub tax_id: Option<String>,

    /// Street address.
    pub address: Option<String>,

    /// Mirrored active indicator.
    pub active: bool,

    /// First sighting timestamp.
    pub created_at: DateTime<Utc>,

    /// Last overwrite timestamp.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit
// =============================================================================

/// A unit (site/branch) mirrored from SOC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Unit {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// SOC unit code - natural key together with `soc_company_code`.
    pub soc_code: String,

    /// SOC code of the owning company.
    pub soc_company_code: String,

    /// Unit display name (referenced by the hierarchy feed).
    pub name: String,

    /// Legal name.
    pub legal_name: Option<String>,

    /// Unit tax id.
    pub tax_id: Option<String>,

    /// Individual tax id for person-registered units.
    pub person_tax_id: Option<String>,

    /// Street address.
    pub address: Option<String>,

    /// Occupational risk degree.
    pub risk_degree: Option<String>,

    /// Local id of the parent company.
    pub company_id: String,

    /// Mirrored active indicator.
    pub active: bool,

    /// First sighting timestamp.
    pub created_at: DateTime<Utc>,

    /// Last overwrite timestamp.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sector
// =============================================================================

/// A sector mirrored from SOC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sector {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// SOC sector code - part of the composite natural key.
    pub soc_code: String,

    /// SOC code of the owning company.
    pub soc_company_code: String,

    /// Sector display name - part of the composite natural key.
    pub name: String,

    /// Local id of the parent unit.
    pub unit_id: String,

    /// Mirrored active indicator - part of the composite natural key.
    pub active: bool,

    /// First sighting timestamp.
    pub created_at: DateTime<Utc>,

    /// Last overwrite timestamp.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Job
// =============================================================================

/// A job (position) mirrored from SOC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Job {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// SOC job code - global natural key.
    pub soc_code: String,

    /// SOC code of the owning company.
    pub soc_company_code: String,

    /// Job display name (referenced by the hierarchy feed).
    pub name: String,

    /// Long-form description.
    pub detailed_description: Option<String>,

    /// Local id of the parent sector.
    pub sector_id: String,

    /// Mirrored active indicator.
    pub active: bool,

    /// First sighting timestamp.
    pub created_at: DateTime<Utc>,

    /// Last overwrite timestamp.
    pub updated_at: DateTime<Utc>,
}
