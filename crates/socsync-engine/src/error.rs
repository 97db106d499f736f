//! # Engine Error Types
//!
//! Error types for the sync engine.
//!
//! ## Two-Tier Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  FATAL (orchestration-level)          RECOVERABLE (per-record)          │
//! │  ───────────────────────────          ─────────────────────────         │
//! │  Fetch        - a whole collection    ParentNotFound - no parent row    │
//! │                 could not be fetched                   can be resolved  │
//! │                 or decoded            Database       - one upsert       │
//! │  InvalidConfig / ConfigLoadFailed                      failed           │
//! │  ConfigSaveFailed                                                       │
//! │                                                                         │
//! │  Fatal errors abort the remaining stages and reach the trigger         │
//! │  caller unmodified. Recoverable errors are caught at the reconciler    │
//! │  boundary, tallied per entity and appended to the error log.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type covering fetch, configuration and reconciliation
/// failures.
#[derive(Debug, Error)]
pub enum EngineError {
    // =========================================================================
    // Fatal (orchestration-level)
    // =========================================================================
    /// A whole remote collection could not be fetched or decoded.
    ///
    /// Always carries the requested URL: the parametro blob encodes which
    /// endpoint and company were being pulled, which is the first thing
    /// needed when chasing a failure against the legacy system.
    #[error("Failed to fetch data from SOC API ({url}): {message}")]
    Fetch { url: String, message: String },

    /// Invalid engine configuration.
    #[error("Invalid sync configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Recoverable (per-record)
    // =========================================================================
    /// A record's parent could not be resolved and none can be synthesized.
    #[error("{0}")]
    ParentNotFound(String),

    /// A local read or write failed for one record.
    #[error("Database error: {0}")]
    Database(String),
}

impl EngineError {
    /// Creates a fetch error for a given URL.
    pub fn fetch(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        EngineError::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Creates a parent-resolution failure.
    pub fn parent_not_found(message: impl Into<String>) -> Self {
        EngineError::ParentNotFound(message.into())
    }

    /// Returns true if this error aborts the run when it escapes a
    /// reconciler (fetch and configuration faults).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::Fetch { .. }
                | EngineError::InvalidConfig(_)
                | EngineError::ConfigLoadFailed(_)
                | EngineError::ConfigSaveFailed(_)
        )
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<socsync_db::DbError> for EngineError {
    fn from(err: socsync_db::DbError) -> Self {
        EngineError::Database(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::ConfigSaveFailed(err.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_carries_url() {
        let err = EngineError::fetch("https://soc.example/ws?parametro=x", "timed out");
        assert!(err.to_string().contains("https://soc.example/ws?parametro=x"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_record_errors_are_not_fatal() {
        assert!(!EngineError::parent_not_found("no units for company 1").is_fatal());
        assert!(!EngineError::Database("locked".into()).is_fatal());
    }
}
