//! Job reconciliation.
//!
//! Jobs sit at the bottom of the hierarchy. The record names its company
//! only; the parent sector comes from the resolution chain, which walks
//! the hierarchy feed two hops (job name to unit, unit to sector) before
//! falling back to the company's first sector.

use chrono::Utc;
use tracing::debug;

use socsync_core::{Job, JobRecord, ReconcileOutcome};
use socsync_db::repository::generate_id;
use socsync_db::Database;

use crate::error::EngineResult;
use crate::hierarchy::HierarchyIndex;
use crate::reconcile::non_empty;
use crate::resolve::SectorResolver;

/// Upserts one job record by its global SOC code.
pub async fn reconcile_job(
    db: &Database,
    record: &JobRecord,
    hierarchy: &HierarchyIndex,
    resolver: &SectorResolver,
) -> EngineResult<ReconcileOutcome> {
    let sector = resolver
        .resolve(db, hierarchy, &record.codigo_empresa, &record.nome_cargo)
        .await?;

    let now = Utc::now();
    let repo = db.jobs();

    match repo.find_by_soc_code(&record.codigo_cargo).await? {
        Some(existing) => {
            let job = Job {
                id: existing.id,
                soc_code: record.codigo_cargo.clone(),
                soc_company_code: record.codigo_empresa.clone(),
                name: record.nome_cargo.clone(),
                detailed_description: non_empty(&record.descricao_detalhada),
                sector_id: sector.id,
                active: record.is_active(),
                created_at: existing.created_at,
                updated_at: now,
            };
            repo.update(&job).await?;
            debug!(soc_code = %record.codigo_cargo, "Job updated");
            Ok(ReconcileOutcome::Updated)
        }
        None => {
            let job = Job {
                id: generate_id(),
                soc_code: record.codigo_cargo.clone(),
                soc_company_code: record.codigo_empresa.clone(),
                name: record.nome_cargo.clone(),
                detailed_description: non_empty(&record.descricao_detalhada),
                sector_id: sector.id,
                active: record.is_active(),
                created_at: now,
                updated_at: now,
            };
            repo.insert(&job).await?;
            debug!(soc_code = %record.codigo_cargo, "Job created");
            Ok(ReconcileOutcome::Created)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
