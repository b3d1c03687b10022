//! Measurement records, one per position.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::codec;
use crate::measurement::{ExtendedDimensions, Measurement};
use crate::storage::Store;
use crate::{Error, Result};

const MEASUREMENT_COLUMNS: &str = "id, position_id, project_id, inner_width, inner_height, \
     outer_width, outer_height, diagonal, special_notes, photos, sill_height, frame_depth, \
     mullion_offset, transom_offset, glazing_thickness, reveal_left, reveal_right, reveal_top, \
     reveal_bottom, created_at, updated_at";

pub struct MeasurementRepository<'a> {
    store: &'a Store,
}

impl<'a> MeasurementRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn get(&self, id: i64) -> Result<Option<Measurement>> {
        self.store.submit(move |conn| {
            let measurement = conn
                .query_row(
                    &format!("SELECT {} FROM measurements WHERE id = ?1", MEASUREMENT_COLUMNS),
                    params![id],
                    row_to_measurement,
                )
                .optional()?;
            Ok(measurement)
        })
    }

    pub fn get_by_position(&self, position_id: &str) -> Result<Option<Measurement>> {
        let position_id = position_id.to_string();
        self.store.submit(move |conn| load_for_position(conn, &position_id))
    }

    pub fn list_by_project(&self, project_id: i64) -> Result<Vec<Measurement>> {
        self.store.submit(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM measurements WHERE project_id = ?1 ORDER BY position_id, id",
                MEASUREMENT_COLUMNS
            ))?;
            let measurements = stmt
                .query_map(params![project_id], row_to_measurement)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(measurements)
        })
    }

    /// Save the measurement of a position and mark the position as measured.
    ///
    /// A position has at most one measurement: saving with `id == 0` updates
    /// the existing row of that position if there is one. `measurement`
    /// receives the id, the stored `created_at` and the new `updated_at`.
    pub fn save(&self, measurement: &mut Measurement) -> Result<i64> {
        measurement.updated_at = codec::now();
        let record = measurement.clone();
        let (id, created_at) = self.store.submit(move |conn| {
            let tx = conn.transaction()?;
            let written = upsert(&tx, &record)?;
            tx.commit()?;
            Ok(written)
        })?;
        measurement.id = id;
        measurement.created_at = created_at;
        tracing::info!("Saved measurement {} for position {}", id, measurement.position_id);
        Ok(id)
    }

    /// Store raw extended-field values for a position.
    ///
    /// Keys are extended column names; unknown keys are skipped. The values
    /// are written as given, range checks belong to the caller. Creates the
    /// measurement if the position has none yet.
    pub fn apply_fields(&self, position_id: &str, fields: &HashMap<String, f64>) -> Result<i64> {
        let position_id = position_id.to_string();
        let fields = fields.clone();
        self.store.submit(move |conn| {
            let tx = conn.transaction()?;
            let mut measurement = match load_for_position(&tx, &position_id)? {
                Some(existing) => existing,
                None => {
                    let project_id: Option<i64> = tx
                        .query_row(
                            "SELECT project_id FROM positions WHERE id = ?1",
                            params![position_id],
                            |row| row.get(0),
                        )
                        .optional()?
                        .ok_or_else(|| Error::PositionNotFound(position_id.clone()))?;
                    Measurement::for_position(position_id.clone(), project_id.unwrap_or_default())
                }
            };

            let mut applied = 0;
            for (field, value) in &fields {
                if measurement.extended.set(field, *value) {
                    applied += 1;
                } else {
                    tracing::warn!(
                        "Ignoring unknown measurement field {:?} (known: {})",
                        field,
                        ExtendedDimensions::FIELDS.join(", ")
                    );
                }
            }
            measurement.updated_at = codec::now();
            let (id, _) = upsert(&tx, &measurement)?;
            tx.commit()?;
            tracing::info!("Applied {} fields to measurement {} of position {}", applied, id, position_id);
            Ok(id)
        })
    }

    /// Delete a measurement; its position is no longer marked as measured.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let deleted = self.store.submit(move |conn| {
            let tx = conn.transaction()?;
            let position_id: Option<String> = tx
                .query_row(
                    "SELECT position_id FROM measurements WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?
                .flatten();
            let n = tx.execute("DELETE FROM measurements WHERE id = ?1", params![id])?;
            if let Some(position_id) = position_id {
                tx.execute(
                    "UPDATE positions SET has_measurement_data = ?1 WHERE id = ?2",
                    params![false, position_id],
                )?;
            }
            tx.commit()?;
            Ok(n > 0)
        })?;
        if deleted {
            tracing::info!("Deleted measurement {}", id);
        }
        Ok(deleted)
    }
}

fn load_for_position(conn: &Connection, position_id: &str) -> Result<Option<Measurement>> {
    let measurement = conn
        .query_row(
            &format!(
                "SELECT {} FROM measurements WHERE position_id = ?1 ORDER BY id DESC LIMIT 1",
                MEASUREMENT_COLUMNS
            ),
            params![position_id],
            row_to_measurement,
        )
        .optional()?;
    Ok(measurement)
}

/// Write `m` as the single measurement of its position and flag the position.
/// Returns the row id and the row's `created_at`, which an update keeps.
fn upsert(conn: &Connection, m: &Measurement) -> Result<(i64, NaiveDateTime)> {
    let existing = if m.id != 0 {
        Some(m.id)
    } else {
        conn.query_row(
            "SELECT id FROM measurements WHERE position_id = ?1 ORDER BY id DESC LIMIT 1",
            params![m.position_id],
            |row| row.get(0),
        )
        .optional()?
    };

    let photos = codec::encode_strings(&m.photos);
    let [sill, depth, mullion, transom, glazing, left, right, top, bottom] = m.extended.values();
    let updated_at = codec::format_timestamp(&m.updated_at);

    let updated = match existing {
        Some(id) => conn.execute(
            r#"
            UPDATE measurements SET position_id = ?1, project_id = ?2, inner_width = ?3,
                inner_height = ?4, outer_width = ?5, outer_height = ?6, diagonal = ?7,
                special_notes = ?8, photos = ?9, sill_height = ?10, frame_depth = ?11,
                mullion_offset = ?12, transom_offset = ?13, glazing_thickness = ?14,
                reveal_left = ?15, reveal_right = ?16, reveal_top = ?17, reveal_bottom = ?18,
                area = ?19, perimeter = ?20, updated_at = ?21
            WHERE id = ?22
            "#,
            params![
                m.position_id,
                m.project_id,
                m.inner_width,
                m.inner_height,
                m.outer_width,
                m.outer_height,
                m.diagonal,
                m.special_notes,
                photos,
                sill,
                depth,
                mullion,
                transom,
                glazing,
                left,
                right,
                top,
                bottom,
                m.area(),
                m.perimeter(),
                updated_at,
                id,
            ],
        )?,
        None => 0,
    };

    let (id, created_at) = match existing {
        Some(id) if updated > 0 => {
            let stored: Option<String> = conn.query_row(
                "SELECT created_at FROM measurements WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            (id, codec::decode_timestamp(stored.as_deref()))
        }
        _ => {
            conn.execute(
                r#"
                INSERT INTO measurements (position_id, project_id, inner_width, inner_height,
                    outer_width, outer_height, diagonal, special_notes, photos, sill_height,
                    frame_depth, mullion_offset, transom_offset, glazing_thickness, reveal_left,
                    reveal_right, reveal_top, reveal_bottom, area, perimeter, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                    ?17, ?18, ?19, ?20, ?21, ?22)
                "#,
                params![
                    m.position_id,
                    m.project_id,
                    m.inner_width,
                    m.inner_height,
                    m.outer_width,
                    m.outer_height,
                    m.diagonal,
                    m.special_notes,
                    photos,
                    sill,
                    depth,
                    mullion,
                    transom,
                    glazing,
                    left,
                    right,
                    top,
                    bottom,
                    m.area(),
                    m.perimeter(),
                    codec::format_timestamp(&m.created_at),
                    updated_at,
                ],
            )?;
            (conn.last_insert_rowid(), m.created_at)
        }
    };

    let flagged = conn.execute(
        "UPDATE positions SET has_measurement_data = ?1 WHERE id = ?2",
        params![true, m.position_id],
    )?;
    if flagged == 0 {
        tracing::warn!("Measurement {} refers to unknown position {}", id, m.position_id);
    }
    Ok((id, created_at))
}

fn row_to_measurement(row: &Row) -> rusqlite::Result<Measurement> {
    let defaults = ExtendedDimensions::default();
    let real = |idx: usize, fallback: f64| -> rusqlite::Result<f64> {
        Ok(row.get::<_, Option<f64>>(idx)?.unwrap_or(fallback))
    };
    Ok(Measurement {
        id: row.get(0)?,
        position_id: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        project_id: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
        inner_width: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
        inner_height: row.get::<_, Option<i64>>(4)?.unwrap_or_default(),
        outer_width: row.get::<_, Option<i64>>(5)?.unwrap_or_default(),
        outer_height: row.get::<_, Option<i64>>(6)?.unwrap_or_default(),
        diagonal: row.get(7)?,
        special_notes: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        photos: codec::decode_strings(row.get::<_, Option<String>>(9)?.as_deref()),
        extended: ExtendedDimensions {
            sill_height: real(10, defaults.sill_height)?,
            frame_depth: real(11, defaults.frame_depth)?,
            mullion_offset: real(12, defaults.mullion_offset)?,
            transom_offset: real(13, defaults.transom_offset)?,
            glazing_thickness: real(14, defaults.glazing_thickness)?,
            reveal_left: real(15, defaults.reveal_left)?,
            reveal_right: real(16, defaults.reveal_right)?,
            reveal_top: real(17, defaults.reveal_top)?,
            reveal_bottom: real(18, defaults.reveal_bottom)?,
        },
        created_at: codec::decode_timestamp(row.get::<_, Option<String>>(19)?.as_deref()),
        updated_at: codec::decode_timestamp(row.get::<_, Option<String>>(20)?.as_deref()),
    })
}
