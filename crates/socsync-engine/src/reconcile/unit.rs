//! Unit reconciliation.
//!
//! Units link to a parent company by the record's CODIGOEMPRESA. A unit
//! whose company has never been seen locally fails on its own; the rest
//! of the stage is unaffected.

use chrono::Utc;
use tracing::debug;

use socsync_core::{ReconcileOutcome, Unit, UnitRecord};
use socsync_db::repository::generate_id;
use socsync_db::Database;

use crate::error::{EngineError, EngineResult};
use crate::reconcile::non_empty;

/// Upserts one unit record by its company-scoped natural key.
///
/// Inactive units are persisted with `active = false` rather than
/// skipped, so the local store mirrors the flag and every fetched record
/// lands in exactly one statistics bucket.
pub async fn reconcile_unit(db: &Database, record: &UnitRecord) -> EngineResult<ReconcileOutcome> {
    let company = db
        .companies()
        .find_by_soc_code(&record.codigo_empresa)
        .await?
        .ok_or_else(|| {
            EngineError::parent_not_found(format!(
                "Company {} not found for unit {}",
                record.codigo_empresa, record.codigo_unidade
            ))
        })?;

    let now = Utc::now();
    let repo = db.units();

    match repo
        .find_by_natural_key(&record.codigo_unidade, &record.codigo_empresa)
        .await?
    {
        Some(existing) => {
            let unit = Unit {
                id: existing.id,
                soc_code: record.codigo_unidade.clone(),
                soc_company_code: record.codigo_empresa.clone(),
                name: record.nome_unidade.clone(),
                legal_name: non_empty(&record.razao_social),
                tax_id: non_empty(&record.cnpj_unidade),
                person_tax_id: non_empty(&record.cpf_unidade),
                address: non_empty(&record.endereco),
                risk_degree: non_empty(&record.grau_de_risco),
                company_id: company.id,
                active: record.is_active(),
                created_at: existing.created_at,
                updated_at: now,
            };
            repo.update(&unit).await?;
            debug!(soc_code = %record.codigo_unidade, "Unit updated");
            Ok(ReconcileOutcome::Updated)
        }
        None => {
            let unit = Unit {
                id: generate_id(),
                soc_code: record.codigo_unidade.clone(),
                soc_company_code: record.codigo_empresa.clone(),
                name: record.nome_unidade.clone(),
                legal_name: non_empty(&record.razao_social),
                tax_id: non_empty(&record.cnpj_unidade),
                person_tax_id: non_empty(&record.cpf_unidade),
                address: non_empty(&record.endereco),
                risk_degree: non_empty(&record.grau_de_risco),
                company_id: company.id,
                active: record.is_active(),
                created_at: now,
                updated_at: now,
            };
            repo.insert(&unit).await?;
            debug!(soc_code = %record.codigo_unidade, "Unit created");
            Ok(ReconcileOutcome::Created)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
