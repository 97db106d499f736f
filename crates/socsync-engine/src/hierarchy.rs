//! # Organizational Hierarchy Index
//!
//! Lookup structures built from the hierarchy export.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Hierarchy Feed Rows                              │
//! │                                                                         │
//! │  NOMEUNIDADE        NOMESETOR          NOMECARGO                        │
//! │  ──────────────     ──────────────     ──────────────                   │
//! │  "Plant North"      "Assembly"         "Welder"                         │
//! │  "Plant North"      "Assembly"         "Fitter"                         │
//! │  "Plant South"      "Logistics"        "Driver"                         │
//! │                                                                         │
//! │  The feed is row-per-job. Two indexes are derived from it:             │
//! │    sector name ──► unit name          (for placing sectors)            │
//! │    job name    ──► (unit, sector)     (for placing jobs)               │
//! │                                                                         │
//! │  Names repeat across rows; on conflict the last row wins, matching     │
//! │  the order the legacy system emits.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use tracing::debug;

use socsync_core::HierarchyRecord;

use crate::client::SocFeed;
use crate::error::EngineResult;

// =============================================================================
// Hierarchy Index
// =============================================================================

/// Parent names of a job in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPlacement {
    pub unit_name: String,
    pub sector_name: String,
}

/// Name-based lookup index over one company's hierarchy feed.
#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    sector_to_unit: HashMap<String, String>,
    job_to_placement: HashMap<String, JobPlacement>,
}

impl HierarchyIndex {
    /// Builds the index from feed rows. Later rows overwrite earlier ones
    /// for repeated names.
    pub fn build(records: &[HierarchyRecord]) -> Self {
        let mut index = HierarchyIndex::default();

        for record in records {
            if !record.nome_setor.is_empty() && !record.nome_unidade.is_empty() {
                index
                    .sector_to_unit
                    .insert(record.nome_setor.clone(), record.nome_unidade.clone());
            }

            if !record.nome_cargo.is_empty()
                && !record.nome_unidade.is_empty()
                && !record.nome_setor.is_empty()
            {
                index.job_to_placement.insert(
                    record.nome_cargo.clone(),
                    JobPlacement {
                        unit_name: record.nome_unidade.clone(),
                        sector_name: record.nome_setor.clone(),
                    },
                );
            }
        }

        index
    }

    /// Returns the unit name a sector belongs to, if the feed mentions it.
    pub fn unit_for_sector(&self, sector_name: &str) -> Option<&str> {
        self.sector_to_unit.get(sector_name).map(String::as_str)
    }

    /// Returns the unit and sector names a job belongs to, if the feed
    /// mentions it.
    pub fn placement_for_job(&self, job_name: &str) -> Option<&JobPlacement> {
        self.job_to_placement.get(job_name)
    }

    /// Returns true if the feed contained no usable rows.
    pub fn is_empty(&self) -> bool {
        self.sector_to_unit.is_empty() && self.job_to_placement.is_empty()
    }
}

// =============================================================================
// Per-Run Cache
// =============================================================================

/// Lazy per-company hierarchy cache for one sync run.
///
/// Each company's hierarchy is fetched at most once per stage run, no
/// matter how many of its sectors or jobs need lookups. A fetch failure
/// is fatal and propagates so the stage can abort.
#[derive(Debug, Default)]
pub struct HierarchyCache {
    entries: HashMap<String, HierarchyIndex>,
}

impl HierarchyCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index for a company, fetching and building it on first
    /// access.
    pub async fn get_or_fetch<F: SocFeed>(
        &mut self,
        feed: &F,
        company_code: &str,
    ) -> EngineResult<&HierarchyIndex> {
        match self.entries.entry(company_code.to_string()) {
            std::collections::hash_map::Entry::Occupied(entry) => Ok(entry.into_mut()),
            std::collections::hash_map::Entry::Vacant(entry) => {
                debug!(company_code, "Fetching organizational hierarchy");
                let records = feed.fetch_hierarchy(company_code).await?;
                Ok(entry.insert(HierarchyIndex::build(&records)))
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(unit: &str, sector: &str, job: &str) -> HierarchyRecord {
        HierarchyRecord {
            nome_unidade: unit.to_string(),
            nome_setor: sector.to_string(),
            nome_cargo: job.to_string(),
        }
    }

    #[test]
    fn test_index_lookups() {
        let index = HierarchyIndex::build(&[
            row("Plant North", "Assembly", "Welder"),
            row("Plant North", "Assembly", "Fitter"),
            row("Plant South", "Logistics", "Driver"),
        ]);

        assert_eq!(index.unit_for_sector("Assembly"), Some("Plant North"));
        assert_eq!(index.unit_for_sector("Logistics"), Some("Plant South"));
        assert_eq!(index.unit_for_sector("Unknown"), None);

        let placement = index.placement_for_job("Driver").unwrap();
        assert_eq!(placement.unit_name, "Plant South");
        assert_eq!(placement.sector_name, "Logistics");
        assert!(index.placement_for_job("Pilot").is_none());
    }

    #[test]
    fn test_repeated_names_last_row_wins() {
        let index = HierarchyIndex::build(&[
            row("Plant North", "Assembly", "Welder"),
            row("Plant South", "Assembly", "Welder"),
        ]);

        assert_eq!(index.unit_for_sector("Assembly"), Some("Plant South"));
        assert_eq!(
            index.placement_for_job("Welder").unwrap().unit_name,
            "Plant South"
        );
    }

    #[test]
    fn test_blank_names_skipped() {
        let index = HierarchyIndex::build(&[row("", "Assembly", "Welder"), row("Plant", "", "")]);
        assert!(index.unit_for_sector("Assembly").is_none());
        assert!(index.placement_for_job("Welder").is_none());
    }
}
