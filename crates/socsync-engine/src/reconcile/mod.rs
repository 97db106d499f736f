//! # Record Reconciliation
//!
//! Per-entity upsert logic turning wire records into local rows.
//!
//! ## Upsert Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Reconcile Contract                              │
//! │                                                                         │
//! │  For every incoming record:                                             │
//! │                                                                         │
//! │    look up by NATURAL KEY                                               │
//! │        │                                                                │
//! │        ├── found ────► overwrite every mirrored field,                  │
//! │        │               keep id and created_at        → Updated           │
//! │        │                                                                │
//! │        └── missing ──► insert fresh row with new id  → Created           │
//! │                                                                         │
//! │  Rows are never deleted. A record that disappears upstream simply       │
//! │  stops being touched.                                                   │
//! │                                                                         │
//! │  Natural keys:                                                          │
//! │    company  soc_code                        (global)                    │
//! │    unit     (soc_code, soc_company_code)                                │
//! │    sector   (soc_code, name, active)        (composite)                 │
//! │    job      soc_code                        (global)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod company;
pub mod job;
pub mod sector;
pub mod unit;

pub use company::reconcile_company;
pub use job::reconcile_job;
pub use sector::reconcile_sector;
pub use unit::reconcile_unit;

/// Maps a wire field to an optional column: the endpoint emits empty
/// strings for absent values.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_mapping() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("x"), Some("x".to_string()));
    }
}
