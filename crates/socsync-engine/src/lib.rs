//! # socsync-engine: SOC Synchronization Engine
//!
//! This crate pulls the four-level organizational hierarchy
//! (companies → units → sectors → jobs) from the SOC legacy system and
//! reconciles it into the local SQLite store.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sync Engine Architecture                         │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  SyncEngine (Orchestrator)                       │  │
//! │  │                                                                  │  │
//! │  │  sync_all(): Company → Unit → Sector → Job, strictly in order   │  │
//! │  │  Per-stage fetch is FATAL on failure; per-record reconcile      │  │
//! │  │  failures are counted and the stage continues                   │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  SocApiClient  │  │ HierarchyCache │  │  Reconcilers           │    │
//! │  │                │  │                │  │                        │    │
//! │  │ parametro URL  │  │ One hierarchy  │  │ Company/Unit upsert    │    │
//! │  │ legacy charset │  │ fetch per      │  │ Sector/Job upsert with │    │
//! │  │ decode + JSON  │  │ company per    │  │ strategy-based parent  │    │
//! │  │ normalization  │  │ stage          │  │ resolution             │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Parent Resolution                             │   │
//! │  │                                                                 │   │
//! │  │  1. HierarchyLookup: name-match via the per-company hierarchy   │   │
//! │  │     feed (sector → unit, job → unit → sector)                   │   │
//! │  │  2. FirstSiblingFallback: first active unit / first sector of   │   │
//! │  │     the company, in deterministic order                         │   │
//! │  │  3. Nothing to fall back to → per-record failure                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`engine`] - `SyncEngine` orchestrator, stage sequencing, statistics
//! - [`client`] - `SocFeed` trait and the reqwest-backed `SocApiClient`
//! - [`decode`] - Legacy charset decoding and JSON normalization
//! - [`hierarchy`] - Per-company name-lookup index and lazy cache
//! - [`resolve`] - Named parent-resolution strategies
//! - [`reconcile`] - Per-entity upsert logic
//! - [`config`] - Runtime configuration (TOML + env)
//! - [`error`] - Engine error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use socsync_engine::{SocApiClient, SyncConfig, SyncEngine};
//! use socsync_db::{Database, DbConfig};
//!
//! let config = SyncConfig::load(None)?;
//! let db = Database::new(DbConfig::new(&config.database.path)).await?;
//! let client = SocApiClient::from_settings(&config.remote)?;
//!
//! let engine = SyncEngine::new(client, db);
//! let stats = engine.sync_all().await?;
//! println!("companies created: {}", stats.companies.created);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod decode;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod reconcile;
pub mod resolve;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::{SocApiClient, SocFeed};
pub use config::{ApiKeys, RemoteSettings, SyncConfig};
pub use decode::Charset;
pub use engine::{AbortedSync, RunResult, SyncEngine};
pub use error::{EngineError, EngineResult};
