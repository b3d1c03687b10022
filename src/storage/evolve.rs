//! Schema evolution - brings any older store file to the current shape.
//!
//! There is no version counter. Each step probes the live schema and only
//! acts when something is missing or deprecated, so running the whole
//! sequence on every start is safe. A failing step is logged and skipped;
//! startup continues with the table as it is.

use rusqlite::{Connection, params};

use super::schema;
use crate::Result;

/// What a run of [`evolve`] changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvolutionReport {
    pub added_columns: Vec<String>,
    pub rebuilt_tables: Vec<String>,
    pub skipped_steps: Vec<String>,
}

impl EvolutionReport {
    pub fn is_noop(&self) -> bool {
        self.added_columns.is_empty() && self.rebuilt_tables.is_empty()
    }
}

/// Live column names of `table`, in declaration order
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    Ok(table_columns(conn, table)?.iter().any(|c| c == column))
}

/// Run every evolution step against `conn`.
///
/// Only table creation can fail the whole run; every later step degrades to
/// a warning.
pub fn evolve(conn: &mut Connection) -> Result<EvolutionReport> {
    let mut report = EvolutionReport::default();

    for stmt in schema::all_table_statements() {
        conn.execute(&stmt, [])?;
    }

    for (table, column, definition) in schema::ADDED_COLUMNS {
        match add_column_if_missing(conn, table, column, definition) {
            Ok(true) => {
                tracing::info!("Added {} column to {} table", column, table);
                report.added_columns.push(format!("{}.{}", table, column));
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Failed to add {}.{} column: {}", table, column, e);
                report.skipped_steps.push(format!("add {}.{}", table, column));
            }
        }
    }

    match drop_deprecated_position_columns(conn) {
        Ok(true) => {
            tracing::info!(
                "Rebuilt positions table without {:?}",
                schema::DEPRECATED_POSITION_COLUMNS
            );
            report.rebuilt_tables.push("positions".to_string());
        }
        Ok(false) => {}
        Err(e) => {
            tracing::warn!("Failed to migrate positions table: {}", e);
            report.skipped_steps.push("rebuild positions".to_string());
        }
    }

    for stmt in schema::CREATE_INDEXES {
        if let Err(e) = conn.execute(stmt, []) {
            tracing::warn!("Failed to create index ({}): {}", stmt, e);
            report.skipped_steps.push(stmt.to_string());
        }
    }

    if report.is_noop() {
        tracing::debug!("Schema already current");
    }
    Ok(report)
}

fn add_column_if_missing(conn: &Connection, table: &str, column: &str, definition: &str) -> Result<bool> {
    if column_exists(conn, table, column)? {
        return Ok(false);
    }
    conn.execute(
        &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition),
        [],
    )?;
    Ok(true)
}

/// Rebuild `positions` without its deprecated columns.
///
/// Returns `Ok(false)` without touching anything when no deprecated column
/// is present, even if a stale shadow table is lying around. The rebuild
/// itself runs in one transaction, so a failure leaves the old table intact.
fn drop_deprecated_position_columns(conn: &mut Connection) -> Result<bool> {
    let live = table_columns(conn, "positions")?;
    let deprecated_present = schema::DEPRECATED_POSITION_COLUMNS
        .iter()
        .any(|dep| live.iter().any(|c| c == dep));
    if !deprecated_present {
        if table_exists(conn, schema::POSITIONS_SHADOW_TABLE)? {
            tracing::debug!(
                "Ignoring leftover {} table, positions is already current",
                schema::POSITIONS_SHADOW_TABLE
            );
        }
        return Ok(false);
    }

    let tx = conn.transaction()?;
    tx.execute(&format!("DROP TABLE IF EXISTS {}", schema::POSITIONS_SHADOW_TABLE), [])?;
    tx.execute(&schema::create_positions_table(schema::POSITIONS_SHADOW_TABLE), [])?;

    let target = table_columns(&tx, schema::POSITIONS_SHADOW_TABLE)?;
    let shared: Vec<&String> = target.iter().filter(|c| live.contains(*c)).collect();
    let select: Vec<String> = shared
        .iter()
        .map(|c| match c.as_str() {
            "product_type" => "COALESCE(product_type, '')".to_string(),
            "product_ids" => "COALESCE(product_ids, '[]')".to_string(),
            other => other.to_string(),
        })
        .collect();
    let insert: Vec<&str> = shared.iter().map(|c| c.as_str()).collect();

    let copied = tx.execute(
        &format!(
            "INSERT OR IGNORE INTO {} ({}) SELECT {} FROM positions",
            schema::POSITIONS_SHADOW_TABLE,
            insert.join(", "),
            select.join(", ")
        ),
        [],
    )?;
    tx.execute("DROP TABLE positions", [])?;
    tx.execute(
        &format!("ALTER TABLE {} RENAME TO positions", schema::POSITIONS_SHADOW_TABLE),
        [],
    )?;
    tx.commit()?;

    tracing::debug!("Copied {} position rows into rebuilt table", copied);
    Ok(true)
}
