//! blueprint-core library.
//!
//! Owns the persisted state for blueprint checklists: a forest of
//! projects -> phases -> tasks -> subtasks, plus the store that mutates it
//! and writes it through to a [`storage::StorageBackend`].
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at the storage seam; `anyhow::Result`
//!   for fallible setup helpers. Store mutators never surface persistence
//!   errors; failures land in [`store::SaveStatus`].
//! - **Logging**: `tracing` macros (`warn!` where a failure is absorbed,
//!   `debug!` where an id fails to resolve).

pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod seed;
pub mod storage;
pub mod store;

pub use config::StoreConfig;
pub use error::{LoadError, StorageError};
pub use model::blueprint::{Blueprint, Progress, Project, SCHEMA_VERSION};
pub use model::phase::{ParsePhaseError, Phase, PhaseId};
pub use model::task::Task;
pub use storage::{FileBackend, MemoryBackend, STORAGE_KEY, StorageBackend};
pub use store::{BlueprintStore, PhaseSummary, SaveStatus};
