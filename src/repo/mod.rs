//! Repositories - typed record access over a [`Store`](crate::Store).
//!
//! Each repository borrows the store and turns every call into one worker
//! submission. Row decoding happens inside the submission; list-valued
//! columns go through [`crate::codec`] and degrade to empty lists instead of
//! failing.

pub mod project;
pub mod position;
pub mod measurement;
pub mod profile;
pub mod template;

pub use measurement::MeasurementRepository;
pub use position::PositionRepository;
pub use profile::{ProfileFilter, ProfileRepository};
pub use project::ProjectRepository;
pub use template::{TemplateFilter, TemplateRepository};
