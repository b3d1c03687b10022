//! Storage Layer - SQLite-backed persistence
//!
//! One store file with tables:
//! - projects(id, name, address, status, ...)
//! - positions(id, project_id, parent_id, product, product_ids, accessories, ...)
//! - measurements(id, position_id, inner/outer dimensions, extended fields, ...)
//! - profiles(id, system_code, profile_type_code, technical data, ...)
//! - position_templates(id, code, category, w_mm, h_mm, ...)
//!
//! The connection lives on a worker thread; see [`worker`].

pub mod cache;
pub mod evolve;
pub mod schema;
pub mod store;
pub mod worker;

pub use evolve::EvolutionReport;
pub use store::{Store, StoreStats};
