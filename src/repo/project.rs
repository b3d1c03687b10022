//! Project records

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::codec;
use crate::project::Project;
use crate::status::Status;
use crate::storage::Store;
use crate::Result;

const PROJECT_COLUMNS: &str = "id, name, address, city, postal_code, status, profile_system, \
     contact_person, installation_date, measurement_date, field_service_employee, notes, \
     created_at, updated_at";

pub struct ProjectRepository<'a> {
    store: &'a Store,
}

impl<'a> ProjectRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn get(&self, id: i64) -> Result<Option<Project>> {
        self.store.submit(move |conn| {
            let project = conn
                .query_row(
                    &format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLUMNS),
                    params![id],
                    row_to_project,
                )
                .optional()?;
            Ok(project)
        })
    }

    /// All projects, most recently updated first
    pub fn list(&self) -> Result<Vec<Project>> {
        self.store.submit(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM projects ORDER BY updated_at DESC, id DESC",
                PROJECT_COLUMNS
            ))?;
            let projects = stmt
                .query_map([], row_to_project)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(projects)
        })
    }

    /// Insert (`id == 0`) or update a project and return its id.
    ///
    /// `project` receives the assigned id and the new `updated_at`.
    pub fn save(&self, project: &mut Project) -> Result<i64> {
        project.updated_at = codec::now();
        let record = project.clone();
        let id = self.store.submit(move |conn| write_project(conn, &record))?;
        project.id = id;
        tracing::info!("Saved project {} ({})", project.name, id);
        Ok(id)
    }

    /// Delete a project with all of its positions and measurements.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let deleted = self.store.submit(move |conn| {
            let tx = conn.transaction()?;
            let measurements = tx.execute("DELETE FROM measurements WHERE project_id = ?1", params![id])?;
            let positions = tx.execute("DELETE FROM positions WHERE project_id = ?1", params![id])?;
            let projects = tx.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
            tx.commit()?;
            tracing::debug!(
                "Project {} cascade removed {} positions, {} measurements",
                id,
                positions,
                measurements
            );
            Ok(projects > 0)
        })?;
        if deleted {
            tracing::info!("Deleted project {}", id);
        } else {
            tracing::warn!("Project {} not found, nothing deleted", id);
        }
        Ok(deleted)
    }

    pub fn update_status(&self, id: i64, status: Status) -> Result<bool> {
        let updated = self.store.submit(move |conn| {
            let style = status.style();
            let n = conn.execute(
                "UPDATE projects SET status = ?1, color = ?2, icon = ?3, updated_at = ?4 WHERE id = ?5",
                params![
                    status.as_project_str(),
                    style.color,
                    style.icon,
                    codec::format_timestamp(&codec::now()),
                    id
                ],
            )?;
            Ok(n > 0)
        })?;
        if updated {
            tracing::info!("Project {} status set to {}", id, status);
        }
        Ok(updated)
    }
}

fn write_project(conn: &Connection, project: &Project) -> Result<i64> {
    let style = project.status.style();
    let installation = project.installation_date.as_ref().map(codec::format_timestamp);
    let measurement = project.measurement_date.as_ref().map(codec::format_timestamp);

    if project.id == 0 {
        conn.execute(
            r#"
            INSERT INTO projects (name, address, city, postal_code, status, profile_system,
                contact_person, installation_date, measurement_date, field_service_employee,
                color, icon, notes, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                project.name,
                project.address,
                project.city,
                project.postal_code,
                project.status.as_project_str(),
                project.profile_system,
                project.contact_person,
                installation,
                measurement,
                project.field_service_employee,
                style.color,
                style.icon,
                project.notes,
                codec::format_timestamp(&project.created_at),
                codec::format_timestamp(&project.updated_at),
            ],
        )?;
        return Ok(conn.last_insert_rowid());
    }

    let n = conn.execute(
        r#"
        UPDATE projects SET name = ?1, address = ?2, city = ?3, postal_code = ?4, status = ?5,
            profile_system = ?6, contact_person = ?7, installation_date = ?8,
            measurement_date = ?9, field_service_employee = ?10, color = ?11, icon = ?12,
            notes = ?13, updated_at = ?14
        WHERE id = ?15
        "#,
        params![
            project.name,
            project.address,
            project.city,
            project.postal_code,
            project.status.as_project_str(),
            project.profile_system,
            project.contact_person,
            installation,
            measurement,
            project.field_service_employee,
            style.color,
            style.icon,
            project.notes,
            codec::format_timestamp(&project.updated_at),
            project.id,
        ],
    )?;
    if n == 0 {
        return Err(crate::Error::ProjectNotFound(project.id));
    }
    Ok(project.id)
}

fn row_to_project(row: &Row) -> rusqlite::Result<Project> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    Ok(Project {
        id: row.get(0)?,
        name: text(1)?,
        address: text(2)?,
        city: text(3)?,
        postal_code: text(4)?,
        status: Status::from_stored(row.get::<_, Option<String>>(5)?.as_deref()),
        profile_system: text(6)?,
        contact_person: text(7)?,
        installation_date: codec::decode_optional_timestamp(row.get::<_, Option<String>>(8)?.as_deref()),
        measurement_date: codec::decode_optional_timestamp(row.get::<_, Option<String>>(9)?.as_deref()),
        field_service_employee: text(10)?,
        notes: text(11)?,
        created_at: codec::decode_timestamp(row.get::<_, Option<String>>(12)?.as_deref()),
        updated_at: codec::decode_timestamp(row.get::<_, Option<String>>(13)?.as_deref()),
    })
}
