//! Position templates, cached by code.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::catalog::PositionTemplate;
use crate::codec;
use crate::storage::Store;
use crate::Result;

const TEMPLATE_COLUMNS: &str =
    "id, code, name, description, category, w_mm, h_mm, default_product_type, is_active, sort_order";

/// Selection criteria for [`TemplateRepository::list`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFilter {
    pub category: Option<String>,
    pub active_only: bool,
}

impl Default for TemplateFilter {
    fn default() -> Self {
        Self {
            category: None,
            active_only: true,
        }
    }
}

pub struct TemplateRepository<'a> {
    store: &'a Store,
}

impl<'a> TemplateRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn get(&self, code: &str) -> Result<Option<PositionTemplate>> {
        let key = code.to_string();
        let found = self.store.templates.get_or_load(code, || {
            self.store.submit(move |conn| {
                let template = conn
                    .query_row(
                        &format!(
                            "SELECT {} FROM position_templates WHERE code = ?1 AND is_active = ?2",
                            TEMPLATE_COLUMNS
                        ),
                        params![key, true],
                        row_to_template,
                    )
                    .optional()?;
                Ok(template)
            })
        })?;
        if found.is_none() {
            tracing::warn!("Position template not found: {}", code);
        }
        Ok(found)
    }

    pub fn list(&self, filter: &TemplateFilter) -> Result<Vec<PositionTemplate>> {
        let filter = filter.clone();
        let templates = self.store.submit(move |conn| {
            let mut sql = format!("SELECT {} FROM position_templates WHERE 1=1", TEMPLATE_COLUMNS);
            if filter.active_only {
                sql.push_str(" AND is_active = 1");
            }
            if filter.category.is_some() {
                sql.push_str(" AND category = ?1");
            }
            sql.push_str(" ORDER BY sort_order, name");

            let mut stmt = conn.prepare(&sql)?;
            let templates = stmt
                .query_map(rusqlite::params_from_iter(filter.category.iter()), row_to_template)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(templates)
        })?;
        self.store.templates.put_all(&templates, |t| t.code.as_str());
        tracing::debug!("Listed {} position templates", templates.len());
        Ok(templates)
    }

    /// Distinct categories of the active templates, sorted
    pub fn categories(&self) -> Result<Vec<String>> {
        self.store.submit(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT category FROM position_templates WHERE is_active = 1 ORDER BY category",
            )?;
            let categories = stmt
                .query_map([], |row| row.get::<_, Option<String>>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(categories
                .into_iter()
                .flatten()
                .filter(|c| !c.is_empty())
                .collect())
        })
    }

    /// Insert or update a template by code. Returns its row id; the cache
    /// entry carries that id as well.
    pub fn save(&self, template: &PositionTemplate) -> Result<i64> {
        let record = template.clone();
        let id = self.store.submit(move |conn| {
            let now = codec::format_timestamp(&codec::now());
            conn.execute(
                r#"
                INSERT INTO position_templates (code, name, description, category, w_mm, h_mm,
                    default_product_type, is_active, sort_order, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
                ON CONFLICT(code) DO UPDATE SET name = excluded.name,
                    description = excluded.description, category = excluded.category,
                    w_mm = excluded.w_mm, h_mm = excluded.h_mm,
                    default_product_type = excluded.default_product_type,
                    is_active = excluded.is_active, sort_order = excluded.sort_order,
                    updated_at = excluded.updated_at
                "#,
                params![
                    record.code,
                    record.name,
                    record.description,
                    record.category,
                    record.w_mm,
                    record.h_mm,
                    record.default_product_type,
                    record.is_active,
                    record.sort_order,
                    now,
                ],
            )?;
            let id: i64 = conn.query_row(
                "SELECT id FROM position_templates WHERE code = ?1",
                params![record.code],
                |row| row.get(0),
            )?;
            Ok(id)
        })?;

        let mut cached = template.clone();
        cached.id = Some(id);
        self.store.templates.put(template.code.clone(), cached);
        tracing::info!("Saved position template {}", template.code);
        Ok(id)
    }

    pub fn invalidate(&self) {
        self.store.templates.invalidate();
    }
}

/// Insert `template` unless its code is taken. Returns rows written.
pub(crate) fn insert_template_if_absent(conn: &Connection, template: &PositionTemplate) -> Result<usize> {
    let now = codec::format_timestamp(&codec::now());
    let written = conn.execute(
        r#"
        INSERT OR IGNORE INTO position_templates (code, name, description, category, w_mm, h_mm,
            default_product_type, is_active, sort_order, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
        "#,
        params![
            template.code,
            template.name,
            template.description,
            template.category,
            template.w_mm,
            template.h_mm,
            template.default_product_type,
            template.is_active,
            template.sort_order,
            now,
        ],
    )?;
    Ok(written)
}

fn row_to_template(row: &Row) -> rusqlite::Result<PositionTemplate> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    Ok(PositionTemplate {
        id: row.get(0)?,
        code: row.get(1)?,
        name: text(2)?,
        description: text(3)?,
        category: text(4)?,
        w_mm: row.get::<_, Option<i64>>(5)?.unwrap_or_default(),
        h_mm: row.get::<_, Option<i64>>(6)?.unwrap_or_default(),
        default_product_type: row
            .get::<_, Option<String>>(7)?
            .filter(|t| !t.is_empty()),
        is_active: row.get::<_, Option<bool>>(8)?.unwrap_or(true),
        sort_order: row.get::<_, Option<i64>>(9)?.unwrap_or_default(),
    })
}
