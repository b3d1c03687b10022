//! # Aufmass - persistence and reconciliation core
//!
//! Field technicians record window/door openings ("positions") for
//! construction projects together with their measurements. This crate owns
//! the on-disk record store behind that workflow.
//!
//! Aufmass provides:
//! - A single background worker that owns the SQLite connection
//! - Startup schema evolution for store files written by older versions
//! - Cached catalog lookups (profile definitions, position templates)
//! - Repositories for projects, positions and measurements
//! - Reconciliation of a main position with its accessory sub-positions

pub mod status;
pub mod project;
pub mod position;
pub mod measurement;
pub mod catalog;
pub mod codec;
pub mod hierarchy;
pub mod storage;
pub mod repo;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use status::Status;
pub use project::Project;
pub use position::{Position, PositionDraft, SharedFields};
pub use measurement::{ExtendedDimensions, Measurement};
pub use catalog::{PositionTemplate, ProfileDefinition, ProfileKind, ProfileSystem};
pub use storage::Store;
pub use repo::{
    MeasurementRepository, PositionRepository, ProfileFilter, ProfileRepository,
    ProjectRepository, TemplateFilter, TemplateRepository,
};

/// Result type alias for Aufmass operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Aufmass operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Store worker failed: {0}")]
    WorkerFailed(String),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Position not found: {0}")]
    PositionNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(i64),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("At least one product must be selected")]
    EmptySelection,

    #[error("Could not save position {position_id}: {reason}")]
    Reconcile { position_id: String, reason: String },
}
