//! # SOC Wire Records
//!
//! Record types exactly as the SOC export endpoint emits them.
//!
//! ## Why the fields look like this
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     SOC Export Record Shape                             │
//! │                                                                         │
//! │  The SOC endpoint returns flat JSON objects with UPPERCASE              │
//! │  Portuguese keys:                                                       │
//! │                                                                         │
//! │    { "CODIGO": "1", "NOMEABREVIADO": "Acme", "ATIVO": "1", ... }        │
//! │                                                                         │
//! │  These keys are preserved verbatim through serde renames so fixtures    │
//! │  and captures from the real system deserialize without translation.     │
//! │                                                                         │
//! │  Active indicators are the strings "0"/"1", never booleans.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Record Stability
//! The endpoint occasionally omits descriptive fields; every non-key
//! field defaults to empty on deserialization so a sparse record still
//! parses. Key fields (codes, names, active flags) are required.

use serde::{Deserialize, Serialize};

/// Parses a SOC active indicator.
///
/// SOC encodes booleans as the strings `"0"` and `"1"`. Anything other
/// than `"1"` is treated as inactive.
#[inline]
pub fn soc_flag_is_active(flag: &str) -> bool {
    flag == "1"
}

// =============================================================================
// Company (Empresa)
// =============================================================================

/// A company row from the SOC companies export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Company code - the global natural key.
    #[serde(rename = "CODIGO")]
    pub codigo: String,

    /// Short display name.
    #[serde(rename = "NOMEABREVIADO")]
    pub nome_abreviado: String,

    /// Legal name.
    #[serde(rename = "RAZAOSOCIAL", default)]
    pub razao_social: String,

    /// Street address.
    #[serde(rename = "ENDERECO", default)]
    pub endereco: String,

    /// Company tax id (CNPJ).
    #[serde(rename = "CNPJ", default)]
    pub cnpj: String,

    /// Active indicator ("0" / "1").
    #[serde(rename = "ATIVO")]
    pub ativo: String,
}

impl CompanyRecord {
    /// Returns true if the source marks this company active.
    pub fn is_active(&self) -> bool {
        soc_flag_is_active(&self.ativo)
    }
}

// =============================================================================
// Unit (Unidade)
// =============================================================================

/// A unit row from the SOC units export.
///
/// Unit codes are scoped per company: the natural key is
/// `(CODIGOUNIDADE, CODIGOEMPRESA)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Code of the owning company.
    #[serde(rename = "CODIGOEMPRESA")]
    pub codigo_empresa: String,

    /// Display name of the owning company.
    #[serde(rename = "NOMEEMPRESA", default)]
    pub nome_empresa: String,

    /// Unit code - natural key together with the company code.
    #[serde(rename = "CODIGOUNIDADE")]
    pub codigo_unidade: String,

    /// Unit display name. The hierarchy feed references units by this name.
    #[serde(rename = "NOMEUNIDADE")]
    pub nome_unidade: String,

    /// Legal name.
    #[serde(rename = "RAZAOSOCIAL", default)]
    pub razao_social: String,

    /// Unit tax id (CNPJ).
    #[serde(rename = "CNPJUNIDADE", default)]
    pub cnpj_unidade: String,

    /// Individual tax id (CPF) for units registered to a person.
    #[serde(rename = "CPFUNIDADE", default)]
    pub cpf_unidade: String,

    /// Occupational risk degree.
    #[serde(rename = "GRAUDERISCOUNIDADE", default)]
    pub grau_de_risco: String,

    /// Street address.
    #[serde(rename = "ENDERECO", default)]
    pub endereco: String,

    /// Active indicator ("0" / "1").
    #[serde(rename = "UNIDADEATIVA")]
    pub unidade_ativa: String,
}

impl UnitRecord {
    /// Returns true if the source marks this unit active.
    pub fn is_active(&self) -> bool {
        soc_flag_is_active(&self.unidade_ativa)
    }
}

// =============================================================================
// Sector (Setor)
// =============================================================================

/// A sector row from the SOC sectors export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorRecord {
    /// Code of the owning company.
    #[serde(rename = "CODIGOEMPRESA")]
    pub codigo_empresa: String,

    /// Display name of the owning company.
    #[serde(rename = "NOMEEMPRESA", default)]
    pub nome_empresa: String,

    /// Sector code.
    #[serde(rename = "CODIGOSETOR")]
    pub codigo_setor: String,

    /// Sector display name. The hierarchy feed references sectors by
    /// this name, and it is part of the composite natural key.
    #[serde(rename = "NOMESETOR")]
    pub nome_setor: String,

    /// Active indicator ("0" / "1").
    #[serde(rename = "SETORATIVO")]
    pub setor_ativo: String,
}

impl SectorRecord {
    /// Returns true if the source marks this sector active.
    pub fn is_active(&self) -> bool {
        soc_flag_is_active(&self.setor_ativo)
    }
}

// =============================================================================
// Job (Cargo)
// =============================================================================

/// A job row from the SOC jobs export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Code of the owning company.
    #[serde(rename = "CODIGOEMPRESA")]
    pub codigo_empresa: String,

    /// Display name of the owning company.
    #[serde(rename = "NOMEEMPRESA", default)]
    pub nome_empresa: String,

    /// Job code - the global natural key.
    #[serde(rename = "CODIGOCARGO")]
    pub codigo_cargo: String,

    /// Job display name. The hierarchy feed references jobs by this name.
    #[serde(rename = "NOMECARGO")]
    pub nome_cargo: String,

    /// Long-form description of the job.
    #[serde(rename = "DESCRICAODETALHADA", default)]
    pub descricao_detalhada: String,

    /// Active indicator ("0" / "1").
    #[serde(rename = "CARGOATIVO")]
    pub cargo_ativo: String,
}

impl JobRecord {
    /// Returns true if the source marks this job active.
    pub fn is_active(&self) -> bool {
        soc_flag_is_active(&self.cargo_ativo)
    }
}

// =============================================================================
// Hierarchy (Hierarquia)
// =============================================================================

/// One row of the per-company hierarchy export.
///
/// Associates a unit, a sector and a job purely by NAME. This record is
/// never persisted - it only exists while a sector or job stage resolves
/// parent references for one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyRecord {
    /// Unit name.
    #[serde(rename = "NOMEUNIDADE")]
    pub nome_unidade: String,

    /// Sector name.
    #[serde(rename = "NOMESETOR")]
    pub nome_setor: String,

    /// Job name.
    #[serde(rename = "NOMECARGO", default)]
    pub nome_cargo: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_flag_parsing() {
        assert!(soc_flag_is_active("1"));
        assert!(!soc_flag_is_active("0"));
        assert!(!soc_flag_is_active(""));
        assert!(!soc_flag_is_active("true"));
    }

    #[test]
    fn test_company_record_from_wire_json() {
        let json = r#"{
            "CODIGO": "1",
            "NOMEABREVIADO": "Acme",
            "RAZAOSOCIAL": "Acme Ltda",
            "ENDERECO": "Rua A, 100",
            "CNPJ": "11222333000181",
            "ATIVO": "1"
        }"#;

        let record: CompanyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.codigo, "1");
        assert_eq!(record.nome_abreviado, "Acme");
        assert!(record.is_active());
    }

    #[test]
    fn test_sparse_record_defaults() {
        // Descriptive fields missing from the payload still parse
        let json = r#"{
            "CODIGOEMPRESA": "1",
            "CODIGOUNIDADE": "U1",
            "NOMEUNIDADE": "HQ",
            "UNIDADEATIVA": "0"
        }"#;

        let record: UnitRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.nome_unidade, "HQ");
        assert_eq!(record.cnpj_unidade, "");
        assert!(!record.is_active());
    }

    #[test]
    fn test_hierarchy_record_without_job() {
        // Hierarchy rows for unit/sector links may omit the job name
        let json = r#"{"NOMEUNIDADE": "HQ", "NOMESETOR": "Finance"}"#;
        let record: HierarchyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.nome_cargo, "");
    }
}
