//! Sector reconciliation.
//!
//! Sector records name their company but not their unit, so the parent
//! unit comes out of the resolution chain: the hierarchy feed first, a
//! deterministic sibling fallback second.

use chrono::Utc;
use tracing::debug;

use socsync_core::{ReconcileOutcome, Sector, SectorRecord};
use socsync_db::repository::generate_id;
use socsync_db::Database;

use crate::error::EngineResult;
use crate::hierarchy::HierarchyIndex;
use crate::resolve::UnitResolver;

/// Upserts one sector record by its composite natural key.
///
/// The key is `(soc_code, name, active)`: the legacy system reuses
/// sector codes across renames and reactivations, so code alone does not
/// identify a row.
pub async fn reconcile_sector(
    db: &Database,
    record: &SectorRecord,
    hierarchy: &HierarchyIndex,
    resolver: &UnitResolver,
) -> EngineResult<ReconcileOutcome> {
    let unit = resolver
        .resolve(db, hierarchy, &record.codigo_empresa, &record.nome_setor)
        .await?;

    let now = Utc::now();
    let repo = db.sectors();

    match repo
        .find_by_natural_key(&record.codigo_setor, &record.nome_setor, record.is_active())
        .await?
    {
        Some(existing) => {
            let sector = Sector {
                id: existing.id,
                soc_code: record.codigo_setor.clone(),
                soc_company_code: record.codigo_empresa.clone(),
                name: record.nome_setor.clone(),
                unit_id: unit.id,
                active: record.is_active(),
                created_at: existing.created_at,
                updated_at: now,
            };
            repo.update(&sector).await?;
            debug!(soc_code = %record.codigo_setor, name = %record.nome_setor, "Sector updated");
            Ok(ReconcileOutcome::Updated)
        }
        None => {
            let sector = Sector {
                id: generate_id(),
                soc_code: record.codigo_setor.clone(),
                soc_company_code: record.codigo_empresa.clone(),
                name: record.nome_setor.clone(),
                unit_id: unit.id,
                active: record.is_active(),
                created_at: now,
                updated_at: now,
            };
            repo.insert(&sector).await?;
            debug!(soc_code = %record.codigo_setor, name = %record.nome_setor, "Sector created");
            Ok(ReconcileOutcome::Created)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{reconcile_company, reconcile_unit};
    use socsync_core::{CompanyRecord, HierarchyRecord, UnitRecord};
    use socsync_db::DbConfig;

    async fn seed(db: &Database) {
        reconcile_company(
            db,
            &CompanyRecord {
                codigo: "1".into(),
                nome_abreviado: "Acme".into(),
                razao_social: String::new(),
                endereco: String::new(),
                cnpj: String::new(),
                ativo: "1".into(),
            },
        )
        .await
        .unwrap();

        for (code, name) in [("U1", "Plant South"), ("U2", "Plant North")] {
            reconcile_unit(
                db,
                &UnitRecord {
                    codigo_empresa: "1".into(),
                    nome_empresa: String::new(),
                    codigo_unidade: code.into(),
                    nome_unidade: name.into(),
                    razao_social: String::new(),
                    cnpj_unidade: String::new(),
                    cpf_unidade: String::new(),
                    grau_de_risco: String::new(),
                    endereco: String::new(),
                    unidade_ativa: "1".into(),
                },
            )
            .await
            .unwrap();
        }
    }

    fn record(code: &str, name: &str, active: &str) -> SectorRecord {
        SectorRecord {
            codigo_empresa: "1".into(),
            nome_empresa: String::new(),
            codigo_setor: code.into(),
            nome_setor: name.into(),
            setor_ativo: active.into(),
        }
    }

    #[tokio::test]
    async fn test_sector_placed_by_hierarchy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed(&db).await;

        let hierarchy = HierarchyIndex::build(&[HierarchyRecord {
            nome_unidade: "Plant North".into(),
            nome_setor: "Assembly".into(),
            nome_cargo: String::new(),
        }]);
        let resolver = UnitResolver::standard();

        reconcile_sector(&db, &record("S1", "Assembly", "1"), &hierarchy, &resolver)
            .await
            .unwrap();

        let sector = db
            .sectors()
            .find_by_natural_key("S1", "Assembly", true)
            .await
            .unwrap()
            .unwrap();
        let north = db
            .units()
            .find_by_natural_key("U2", "1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sector.unit_id, north.id);
    }

    #[tokio::test]
    async fn test_same_code_different_name_is_a_new_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed(&db).await;

        let hierarchy = HierarchyIndex::build(&[]);
        let resolver = UnitResolver::standard();

        let first = reconcile_sector(&db, &record("S1", "Assembly", "1"), &hierarchy, &resolver)
            .await
            .unwrap();
        assert_eq!(first, ReconcileOutcome::Created);

        // Same soc code under a new name creates a second row instead of
        // overwriting the first.
        let second = reconcile_sector(&db, &record("S1", "Welding", "1"), &hierarchy, &resolver)
            .await
            .unwrap();
        assert_eq!(second, ReconcileOutcome::Created);

        // Repeating the exact composite key updates in place.
        let third = reconcile_sector(&db, &record("S1", "Welding", "1"), &hierarchy, &resolver)
            .await
            .unwrap();
        assert_eq!(third, ReconcileOutcome::Updated);
    }
}
