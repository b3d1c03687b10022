//! The persistence core: worker, schema, seed data and caches.

use std::path::Path;

use rusqlite::{Connection, params};

use super::cache::ReferenceCache;
use super::evolve::{self, EvolutionReport};
use super::worker::{Location, Worker};
use crate::catalog::{self, PositionTemplate, ProfileDefinition};
use crate::repo::{
    MeasurementRepository, PositionRepository, ProfileRepository, ProjectRepository,
    TemplateRepository, profile::insert_profile_if_absent, template::insert_template_if_absent,
};
use crate::Result;

/// Handle to an open store file.
///
/// Construction runs schema evolution and seeds the catalogs before it
/// returns. All access goes through the background worker; the caches live
/// here, next to it, and die with it.
pub struct Store {
    worker: Worker,
    pub(crate) profiles: ReferenceCache<ProfileDefinition>,
    pub(crate) templates: ReferenceCache<PositionTemplate>,
    evolution: EvolutionReport,
}

impl Store {
    /// Open a store file (creates it and its directory if missing)
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self::start(Location::File(path.to_path_buf()))?;
        tracing::info!("Store opened: {}", path.display());
        Ok(store)
    }

    /// Open a private in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::start(Location::Memory)
    }

    fn start(location: Location) -> Result<Self> {
        let worker = Worker::spawn(location)?;
        let evolution = worker.submit(evolve::evolve)?;
        let store = Self {
            worker,
            profiles: ReferenceCache::new("profile"),
            templates: ReferenceCache::new("template"),
            evolution,
        };
        store.seed_catalogs()?;
        Ok(store)
    }

    /// Insert the standard catalog rows whose code is not stored yet.
    fn seed_catalogs(&self) -> Result<()> {
        let (profiles, templates) = self.worker.submit(|conn| {
            let tx = conn.transaction()?;
            let mut profiles = 0;
            for profile in catalog::standard_profiles() {
                profiles += insert_profile_if_absent(&tx, &profile)?;
            }
            let mut templates = 0;
            for template in catalog::standard_templates() {
                templates += insert_template_if_absent(&tx, &template)?;
            }
            tx.commit()?;
            Ok((profiles, templates))
        })?;
        if profiles + templates > 0 {
            tracing::info!("Seeded {} profiles and {} position templates", profiles, templates);
        }
        Ok(())
    }

    /// Run an operation on the store worker and wait for its result.
    pub fn submit<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        self.worker.submit(op)
    }

    /// What schema evolution changed when this store was opened
    pub fn evolution(&self) -> &EvolutionReport {
        &self.evolution
    }

    pub fn projects(&self) -> ProjectRepository<'_> {
        ProjectRepository::new(self)
    }

    pub fn positions(&self) -> PositionRepository<'_> {
        PositionRepository::new(self)
    }

    pub fn measurements(&self) -> MeasurementRepository<'_> {
        MeasurementRepository::new(self)
    }

    pub fn profiles(&self) -> ProfileRepository<'_> {
        ProfileRepository::new(self)
    }

    pub fn templates(&self) -> TemplateRepository<'_> {
        TemplateRepository::new(self)
    }

    /// Row counts per table
    pub fn stats(&self) -> Result<StoreStats> {
        self.submit(|conn| {
            let count = |table: &str| -> rusqlite::Result<usize> {
                let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
                Ok(n as usize)
            };
            let main_positions: i64 = conn.query_row(
                "SELECT COUNT(*) FROM positions WHERE is_main_position = ?1",
                params![true],
                |row| row.get(0),
            )?;
            Ok(StoreStats {
                projects: count("projects")?,
                positions: count("positions")?,
                main_positions: main_positions as usize,
                measurements: count("measurements")?,
                profiles: count("profiles")?,
                templates: count("position_templates")?,
            })
        })
    }

    /// Stop the worker after pending operations and close the connection.
    pub fn shutdown(mut self) {
        self.worker.shutdown();
        tracing::info!("Store shut down");
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    pub projects: usize,
    pub positions: usize,
    pub main_positions: usize,
    pub measurements: usize,
    pub profiles: usize,
    pub templates: usize,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Store Statistics:")?;
        writeln!(f, "  Projects: {}", self.projects)?;
        writeln!(f, "  Positions: {} ({} main)", self.positions, self.main_positions)?;
        writeln!(f, "  Measurements: {}", self.measurements)?;
        writeln!(f, "  Profiles: {}", self.profiles)?;
        writeln!(f, "  Templates: {}", self.templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_seeds_catalogs() {
        let store = Store::open_in_memory().unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.profiles, 3);
        assert_eq!(stats.templates, 6);
        assert_eq!(stats.projects, 0);
    }

    #[test]
    fn test_seeding_is_additive() {
        let store = Store::open_in_memory().unwrap();
        store
            .submit(|conn| {
                conn.execute("UPDATE position_templates SET name = 'Edited' WHERE code = 'WZ_WIN'", [])?;
                Ok(())
            })
            .unwrap();
        store.seed_catalogs().unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.templates, 6);
        let name: String = store
            .submit(|conn| {
                Ok(conn.query_row(
                    "SELECT name FROM position_templates WHERE code = 'WZ_WIN'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(name, "Edited");
    }
}
