//! Company reconciliation.
//!
//! Companies are the root of the hierarchy: no parent to resolve, the
//! record maps straight onto a row keyed by the global company code.

use chrono::Utc;
use tracing::debug;

use socsync_core::{Company, CompanyRecord, ReconcileOutcome};
use socsync_db::repository::generate_id;
use socsync_db::Database;

use crate::error::EngineResult;
use crate::reconcile::non_empty;

/// Upserts one company record by its SOC code.
pub async fn reconcile_company(
    db: &Database,
    record: &CompanyRecord,
) -> EngineResult<ReconcileOutcome> {
    let now = Utc::now();
    let repo = db.companies();

    match repo.find_by_soc_code(&record.codigo).await? {
        Some(existing) => {
            let company = Company {
                id: existing.id,
                soc_code: record.codigo.clone(),
                name: record.nome_abreviado.clone(),
                legal_name: non_empty(&record.razao_social),
                tax_id: non_empty(&record.cnpj),
                address: non_empty(&record.endereco),
                active: record.is_active(),
                created_at: existing.created_at,
                updated_at: now,
            };
            repo.update(&company).await?;
            debug!(soc_code = %record.codigo, "Company updated");
            Ok(ReconcileOutcome::Updated)
        }
        None => {
            let company = Company {
                id: generate_id(),
                soc_code: record.codigo.clone(),
                name: record.nome_abreviado.clone(),
                legal_name: non_empty(&record.razao_social),
                tax_id: non_empty(&record.cnpj),
                address: non_empty(&record.endereco),
                active: record.is_active(),
                created_at: now,
                updated_at: now,
            };
            repo.insert(&company).await?;
            debug!(soc_code = %record.codigo, "Company created");
            Ok(ReconcileOutcome::Created)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
