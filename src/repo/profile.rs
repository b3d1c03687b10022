//! Profile catalog, cached by code.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::catalog::{ProfileDefinition, ProfileKind, ProfileSystem};
use crate::codec;
use crate::storage::Store;
use crate::Result;

const PROFILE_COLUMNS: &[&str] = &[
    "id",
    "system_code",
    "profile_type_code",
    "name",
    "description",
    "depth_mm",
    "view_width_mm",
    "rebate_height_mm",
    "wall_thickness_mm",
    "chamber_count",
    "glazing_thickness_max",
    "uf_value",
    "psi_value",
    "test_standard",
    "svg_path",
    "section_drawing_path",
    "reinforcement_possible",
    "standard_colors",
    "surface_textures",
    "max_sash_weight_kg",
    "max_element_height_mm",
    "max_element_width_mm",
    "seal_count",
    "seal_type",
    "is_active",
    "sort_order",
    "notes",
];

/// Selection criteria for [`ProfileRepository::list`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFilter {
    pub system: Option<ProfileSystem>,
    pub kind: Option<ProfileKind>,
    pub active_only: bool,
}

impl Default for ProfileFilter {
    fn default() -> Self {
        Self {
            system: None,
            kind: None,
            active_only: true,
        }
    }
}

impl ProfileFilter {
    pub fn system(system: ProfileSystem) -> Self {
        Self {
            system: Some(system),
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy)]
enum WriteMode {
    IgnoreExisting,
    Upsert,
}

pub struct ProfileRepository<'a> {
    store: &'a Store,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Active profile by code, served from the cache when possible
    pub fn get(&self, code: &str) -> Result<Option<ProfileDefinition>> {
        let key = code.to_string();
        let found = self.store.profiles.get_or_load(code, || {
            self.store.submit(move |conn| {
                let profile = conn
                    .query_row(
                        &format!(
                            "SELECT {} FROM profiles WHERE id = ?1 AND is_active = ?2",
                            PROFILE_COLUMNS.join(", ")
                        ),
                        params![key, true],
                        row_to_profile,
                    )
                    .optional()?;
                Ok(profile)
            })
        })?;
        if found.is_none() {
            tracing::warn!("Profile not found: {}", code);
        }
        Ok(found)
    }

    /// Profiles matching `filter`, ordered by sort order and name.
    ///
    /// Always reads the store; every returned record refreshes the cache.
    pub fn list(&self, filter: &ProfileFilter) -> Result<Vec<ProfileDefinition>> {
        let filter = filter.clone();
        let profiles = self.store.submit(move |conn| {
            let mut sql = format!("SELECT {} FROM profiles WHERE 1=1", PROFILE_COLUMNS.join(", "));
            let mut args: Vec<String> = Vec::new();
            if filter.active_only {
                sql.push_str(" AND is_active = 1");
            }
            if let Some(system) = filter.system {
                args.push(system.code().to_string());
                sql.push_str(&format!(" AND system_code = ?{}", args.len()));
            }
            if let Some(kind) = filter.kind {
                args.push(kind.code().to_string());
                sql.push_str(&format!(" AND profile_type_code = ?{}", args.len()));
            }
            sql.push_str(" ORDER BY sort_order, name");

            let mut stmt = conn.prepare(&sql)?;
            let profiles = stmt
                .query_map(rusqlite::params_from_iter(args.iter()), row_to_profile)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(profiles)
        })?;
        self.store.profiles.put_all(&profiles, |p| p.code.as_str());
        tracing::debug!("Listed {} profiles", profiles.len());
        Ok(profiles)
    }

    /// Display names of the active profiles, optionally of one system
    pub fn display_names(&self, system: Option<ProfileSystem>) -> Result<Vec<String>> {
        let filter = ProfileFilter {
            system,
            ..Default::default()
        };
        Ok(self.list(&filter)?.iter().map(ProfileDefinition::display_name).collect())
    }

    /// Insert or update a profile by code and refresh its cache entry.
    pub fn save(&self, profile: &ProfileDefinition) -> Result<String> {
        let record = profile.clone();
        self.store
            .submit(move |conn| write_profile(conn, &record, WriteMode::Upsert))?;
        self.store.profiles.put(profile.code.clone(), profile.clone());
        tracing::info!("Saved profile {}", profile.code);
        Ok(profile.code.clone())
    }

    pub fn invalidate(&self) {
        self.store.profiles.invalidate();
    }
}

/// Insert `profile` unless a row with its code exists. Returns rows written.
pub(crate) fn insert_profile_if_absent(conn: &Connection, profile: &ProfileDefinition) -> Result<usize> {
    write_profile(conn, profile, WriteMode::IgnoreExisting)
}

fn write_profile(conn: &Connection, p: &ProfileDefinition, mode: WriteMode) -> Result<usize> {
    let columns = PROFILE_COLUMNS.join(", ");
    let placeholders: Vec<String> = (1..=PROFILE_COLUMNS.len() + 2).map(|i| format!("?{}", i)).collect();
    let insert = format!(
        "INTO profiles ({}, created_at, updated_at) VALUES ({})",
        columns,
        placeholders.join(", ")
    );
    let sql = match mode {
        WriteMode::IgnoreExisting => format!("INSERT OR IGNORE {}", insert),
        WriteMode::Upsert => {
            let assignments: Vec<String> = PROFILE_COLUMNS
                .iter()
                .skip(1)
                .chain(std::iter::once(&"updated_at"))
                .map(|c| format!("{c} = excluded.{c}"))
                .collect();
            format!("INSERT {} ON CONFLICT(id) DO UPDATE SET {}", insert, assignments.join(", "))
        }
    };

    let now = codec::format_timestamp(&codec::now());
    let written = conn.execute(
        &sql,
        params![
            p.code,
            p.system.code(),
            p.kind.code(),
            p.name,
            p.description,
            p.depth_mm,
            p.view_width_mm,
            p.rebate_height_mm,
            p.wall_thickness_mm,
            p.chamber_count,
            p.glazing_thickness_max,
            p.uf_value,
            p.psi_value,
            p.test_standard,
            p.svg_path,
            p.section_drawing_path,
            p.reinforcement_possible,
            codec::encode_comma_list(&p.standard_colors),
            codec::encode_comma_list(&p.surface_textures),
            p.max_sash_weight_kg,
            p.max_element_height_mm,
            p.max_element_width_mm,
            p.seal_count,
            p.seal_type,
            p.is_active,
            p.sort_order,
            p.notes,
            now,
            now,
        ],
    )?;
    Ok(written)
}

fn row_to_profile(row: &Row) -> rusqlite::Result<ProfileDefinition> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    Ok(ProfileDefinition {
        code: row.get(0)?,
        system: ProfileSystem::from_code(&text(1)?),
        kind: ProfileKind::from_code(&text(2)?),
        name: text(3)?,
        description: text(4)?,
        depth_mm: row.get(5)?,
        view_width_mm: row.get(6)?,
        rebate_height_mm: row.get(7)?,
        wall_thickness_mm: row.get(8)?,
        chamber_count: row.get(9)?,
        glazing_thickness_max: row.get(10)?,
        uf_value: row.get(11)?,
        psi_value: row.get(12)?,
        test_standard: text(13)?,
        svg_path: row.get(14)?,
        section_drawing_path: row.get(15)?,
        reinforcement_possible: row.get::<_, Option<bool>>(16)?.unwrap_or(true),
        standard_colors: codec::decode_comma_list(row.get::<_, Option<String>>(17)?.as_deref()),
        surface_textures: codec::decode_comma_list(row.get::<_, Option<String>>(18)?.as_deref()),
        max_sash_weight_kg: row.get(19)?,
        max_element_height_mm: row.get(20)?,
        max_element_width_mm: row.get(21)?,
        seal_count: row.get::<_, Option<i64>>(22)?.unwrap_or(2),
        seal_type: text(23)?,
        is_active: row.get::<_, Option<bool>>(24)?.unwrap_or(true),
        sort_order: row.get::<_, Option<i64>>(25)?.unwrap_or_default(),
        notes: row.get(26)?,
    })
}
