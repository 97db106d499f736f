//! # SOC API Client
//!
//! HTTP client for the legacy SOC export endpoints.
//!
//! ## Wire Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Export Request Shape                            │
//! │                                                                         │
//! │  GET {base_url}?parametro=<urlencoded JSON>                             │
//! │                                                                         │
//! │  parametro (before encoding):                                           │
//! │    {"empresa":"123456","codigo":"200267","chave":"abc...",              │
//! │     "tipoSaida":"json"}                                                 │
//! │                                                                         │
//! │  • "empresa"   account-level company code; the hierarchy export        │
//! │                substitutes the TARGET company code here instead         │
//! │  • "codigo"    numeric endpoint selector (one per collection)           │
//! │  • "chave"     per-endpoint access key                                  │
//! │  • "tipoSaida" always "json"                                            │
//! │  • "ativo"     unit export only: "1" to filter, "" for all              │
//! │                                                                         │
//! │  Responses are JSON encoded in ISO-8859-1, so the body is read as raw   │
//! │  bytes and decoded before parsing.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use socsync_core::{CompanyRecord, HierarchyRecord, JobRecord, SectorRecord, UnitRecord};

use crate::config::RemoteSettings;
use crate::decode::{decode_text, parse_records, Charset};
use crate::error::{EngineError, EngineResult};

// =============================================================================
// Endpoint Codes
// =============================================================================

/// Endpoint selector for the company export.
pub const ENDPOINT_COMPANIES: &str = "200267";
/// Endpoint selector for the unit export.
pub const ENDPOINT_UNITS: &str = "200266";
/// Endpoint selector for the sector export.
pub const ENDPOINT_SECTORS: &str = "200268";
/// Endpoint selector for the job export.
pub const ENDPOINT_JOBS: &str = "200265";
/// Endpoint selector for the organizational hierarchy export.
pub const ENDPOINT_HIERARCHY: &str = "198531";

// =============================================================================
// Request Parameters
// =============================================================================

/// The JSON blob carried in the `parametro` query parameter.
#[derive(Debug, Serialize)]
struct ExportParams<'a> {
    empresa: &'a str,
    codigo: &'a str,
    chave: &'a str,
    #[serde(rename = "tipoSaida")]
    tipo_saida: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ativo: Option<&'a str>,
}

impl<'a> ExportParams<'a> {
    fn new(empresa: &'a str, codigo: &'a str, chave: &'a str) -> Self {
        ExportParams {
            empresa,
            codigo,
            chave,
            tipo_saida: "json",
            ativo: None,
        }
    }
}

// =============================================================================
// Feed Trait
// =============================================================================

/// Source of remote organizational records.
///
/// The engine is generic over this trait so tests can drive it from
/// in-memory fixtures instead of a live endpoint.
#[async_trait]
pub trait SocFeed: Send + Sync {
    /// Fetches all companies.
    async fn fetch_companies(&self) -> EngineResult<Vec<CompanyRecord>>;

    /// Fetches units, optionally restricted to active ones.
    async fn fetch_units(&self, active_only: bool) -> EngineResult<Vec<UnitRecord>>;

    /// Fetches all sectors.
    async fn fetch_sectors(&self) -> EngineResult<Vec<SectorRecord>>;

    /// Fetches all jobs.
    async fn fetch_jobs(&self) -> EngineResult<Vec<JobRecord>>;

    /// Fetches the organizational hierarchy of one company.
    async fn fetch_hierarchy(&self, company_code: &str) -> EngineResult<Vec<HierarchyRecord>>;
}

// =============================================================================
// HTTP Client
// =============================================================================

/// Reqwest-backed [`SocFeed`] implementation.
#[derive(Debug, Clone)]
pub struct SocApiClient {
    http: reqwest::Client,
    base_url: String,
    company_code: String,
    charset: Charset,
    keys: crate::config::ApiKeys,
}

impl SocApiClient {
    /// Builds a client from remote settings.
    pub fn from_settings(settings: &RemoteSettings) -> EngineResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| EngineError::fetch(&settings.base_url, e))?;

        Ok(SocApiClient {
            http,
            base_url: settings.base_url.clone(),
            company_code: settings.company_code.clone(),
            charset: settings.charset,
            keys: settings.api_keys.clone(),
        })
    }

    /// Builds the request URL for a set of export parameters.
    ///
    /// The whole parameter object travels as one urlencoded JSON string
    /// under the `parametro` key.
    fn build_url(&self, params: &ExportParams<'_>) -> EngineResult<Url> {
        let blob = serde_json::to_string(params)
            .map_err(|e| EngineError::fetch(&self.base_url, e))?;

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| EngineError::fetch(&self.base_url, e))?;
        url.query_pairs_mut().append_pair("parametro", &blob);
        Ok(url)
    }

    /// Issues one export request and parses the body into records.
    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        params: ExportParams<'_>,
    ) -> EngineResult<Vec<T>> {
        let url = self.build_url(&params)?;
        debug!(endpoint = params.codigo, %url, "Fetching export");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| EngineError::fetch(url.as_str(), e))?;

        if !response.status().is_success() {
            return Err(EngineError::fetch(
                url.as_str(),
                format!("HTTP status {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EngineError::fetch(url.as_str(), e))?;

        let body = decode_text(&bytes, self.charset);
        parse_records(&body, url.as_str())
    }
}

#[async_trait]
impl SocFeed for SocApiClient {
    #[instrument(skip(self))]
    async fn fetch_companies(&self) -> EngineResult<Vec<CompanyRecord>> {
        let params =
            ExportParams::new(&self.company_code, ENDPOINT_COMPANIES, &self.keys.companies);
        self.fetch(params).await
    }

    #[instrument(skip(self))]
    async fn fetch_units(&self, active_only: bool) -> EngineResult<Vec<UnitRecord>> {
        let mut params = ExportParams::new(&self.company_code, ENDPOINT_UNITS, &self.keys.units);
        // The units export always carries the `ativo` key: "1" filters
        // to active units, the empty string asks for all of them.
        params.ativo = Some(if active_only { "1" } else { "" });
        self.fetch(params).await
    }

    #[instrument(skip(self))]
    async fn fetch_sectors(&self) -> EngineResult<Vec<SectorRecord>> {
        let params = ExportParams::new(&self.company_code, ENDPOINT_SECTORS, &self.keys.sectors);
        self.fetch(params).await
    }

    #[instrument(skip(self))]
    async fn fetch_jobs(&self) -> EngineResult<Vec<JobRecord>> {
        let params = ExportParams::new(&self.company_code, ENDPOINT_JOBS, &self.keys.jobs);
        self.fetch(params).await
    }

    #[instrument(skip(self))]
    async fn fetch_hierarchy(&self, company_code: &str) -> EngineResult<Vec<HierarchyRecord>> {
        // The hierarchy export is scoped by putting the TARGET company's
        // code in `empresa`, not the account-level code.
        let params = ExportParams::new(company_code, ENDPOINT_HIERARCHY, &self.keys.hierarchy);
        self.fetch(params).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKeys;

    fn test_client() -> SocApiClient {
        let settings = RemoteSettings {
            base_url: "https://ws1.soc.com.br/WebSoc/exportadados".to_string(),
            company_code: "123456".to_string(),
            charset: Charset::Latin1,
            api_keys: ApiKeys {
                companies: "kc".into(),
                units: "ku".into(),
                sectors: "ks".into(),
                jobs: "kj".into(),
                hierarchy: "kh".into(),
            },
            request_timeout_secs: 5,
        };
        SocApiClient::from_settings(&settings).unwrap()
    }

    #[test]
    fn test_url_carries_json_parametro() {
        let client = test_client();
        let params = ExportParams::new("123456", ENDPOINT_COMPANIES, "kc");
        let url = client.build_url(&params).unwrap();

        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "parametro");

        let parsed: serde_json::Value = serde_json::from_str(&value).unwrap();
        assert_eq!(parsed["empresa"], "123456");
        assert_eq!(parsed["codigo"], "200267");
        assert_eq!(parsed["chave"], "kc");
        assert_eq!(parsed["tipoSaida"], "json");
        // The ativo key only appears on the units export
        assert!(parsed.get("ativo").is_none());
    }

    #[test]
    fn test_units_export_always_carries_ativo() {
        let client = test_client();

        let mut params = ExportParams::new("123456", ENDPOINT_UNITS, "ku");
        params.ativo = Some("1");
        let url = client.build_url(&params).unwrap();
        let (_, value) = url.query_pairs().next().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&value).unwrap();
        assert_eq!(parsed["ativo"], "1");

        // Unfiltered pulls still send the key, as the empty string
        let mut params = ExportParams::new("123456", ENDPOINT_UNITS, "ku");
        params.ativo = Some("");
        let url = client.build_url(&params).unwrap();
        let (_, value) = url.query_pairs().next().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&value).unwrap();
        assert_eq!(parsed["ativo"], "");
    }

    #[test]
    fn test_hierarchy_request_scoped_by_target_company() {
        let client = test_client();
        let params = ExportParams::new("789", ENDPOINT_HIERARCHY, "kh");
        let url = client.build_url(&params).unwrap();

        let (_, value) = url.query_pairs().next().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&value).unwrap();
        // The target company code replaces the account-level code; no
        // extra key is sent
        assert_eq!(parsed["empresa"], "789");
        assert_eq!(parsed["codigo"], "198531");
        assert!(parsed.get("empresaTrabalho").is_none());
        assert!(parsed.get("ativo").is_none());
    }
}
