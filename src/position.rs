//! Position records - one opening (window/door) within a project.
//!
//! Ids are caller-assigned strings:
//! - main positions: plain sequence numbers, `"1"`, `"2"`, ...
//! - sub-positions: `"{parent}.{index}"`, one per accessory product
//!
//! A main position never carries accessories itself; each accessory lives in
//! its own sub-position record.

use crate::status::Status;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FLOOR: &str = "Erdgeschoss";
pub const DEFAULT_WINDOW_TYPE: &str = "Holz";
pub const DEFAULT_SHUTTER_TYPE: &str = "Nicht vorhanden";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub project_id: i64,
    pub template_code: Option<String>,
    pub name: String,
    pub floor: String,
    pub existing_window_type: String,
    pub roller_shutter_type: String,
    pub notes: String,
    /// Product name of this record (main product or one accessory)
    pub product: String,
    /// Legacy single product reference
    pub product_id: Option<i64>,
    pub product_type: String,
    pub product_ids: Vec<i64>,
    pub is_main_position: bool,
    pub parent_id: Option<String>,
    pub status: Status,
    pub accessories: Vec<String>,
    pub has_measurement_data: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Default for Position {
    fn default() -> Self {
        let now = crate::codec::now();
        Self {
            id: String::new(),
            project_id: 0,
            template_code: None,
            name: String::new(),
            floor: DEFAULT_FLOOR.to_string(),
            existing_window_type: DEFAULT_WINDOW_TYPE.to_string(),
            roller_shutter_type: DEFAULT_SHUTTER_TYPE.to_string(),
            notes: String::new(),
            product: String::new(),
            product_id: None,
            product_type: String::new(),
            product_ids: Vec::new(),
            is_main_position: true,
            parent_id: None,
            status: Status::Pending,
            accessories: Vec::new(),
            has_measurement_data: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields a main position shares with all of its sub-positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFields {
    pub name: String,
    pub floor: String,
    pub existing_window_type: String,
    pub roller_shutter_type: String,
    pub notes: String,
}

impl Default for SharedFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            floor: DEFAULT_FLOOR.to_string(),
            existing_window_type: DEFAULT_WINDOW_TYPE.to_string(),
            roller_shutter_type: DEFAULT_SHUTTER_TYPE.to_string(),
            notes: String::new(),
        }
    }
}

impl SharedFields {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Input for creating a new main position with its product selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionDraft {
    pub project_id: i64,
    pub template_code: Option<String>,
    pub shared: SharedFields,
    /// Ordered product names; the window product becomes the main product
    pub products: Vec<String>,
    pub product_id: Option<i64>,
    pub product_type: String,
    pub product_ids: Vec<i64>,
}

impl Position {
    pub fn shared_fields(&self) -> SharedFields {
        SharedFields {
            name: self.name.clone(),
            floor: self.floor.clone(),
            existing_window_type: self.existing_window_type.clone(),
            roller_shutter_type: self.roller_shutter_type.clone(),
            notes: self.notes.clone(),
        }
    }

    pub fn apply_shared(&mut self, shared: &SharedFields) {
        self.name = shared.name.clone();
        self.floor = shared.floor.clone();
        self.existing_window_type = shared.existing_window_type.clone();
        self.roller_shutter_type = shared.roller_shutter_type.clone();
        self.notes = shared.notes.clone();
    }

    /// Build a fresh sub-position under `main`.
    pub fn sub_position(main: &Position, index: usize, product: impl Into<String>) -> Self {
        let mut sub = Position {
            id: sub_position_id(&main.id, index),
            project_id: main.project_id,
            product: product.into(),
            is_main_position: false,
            parent_id: Some(main.id.clone()),
            ..Default::default()
        };
        sub.apply_shared(&main.shared_fields());
        sub
    }

    pub fn color(&self) -> &'static str {
        self.status.color()
    }

    /// Short description: product and floor
    pub fn details(&self) -> String {
        if self.product.is_empty() {
            format!("({})", self.floor)
        } else {
            format!("{} ({})", self.product, self.floor)
        }
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.updated_at = crate::codec::now();
    }

    /// Enforce the hierarchy invariants before a write.
    ///
    /// Main positions lose any accessories and parent link; sub-positions get
    /// their parent id from their own dotted id.
    pub fn normalize(&mut self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidPosition("position id must not be empty".into()));
        }
        if self.is_main_position {
            if self.id.contains('.') {
                return Err(Error::InvalidPosition(format!(
                    "main position id {} must not contain a dot",
                    self.id
                )));
            }
            if !self.accessories.is_empty() {
                tracing::debug!(
                    "Dropping {} accessories from main position {}",
                    self.accessories.len(),
                    self.id
                );
                self.accessories.clear();
            }
            self.parent_id = None;
        } else {
            let parent = parent_of(&self.id).ok_or_else(|| {
                Error::InvalidPosition(format!("sub-position id {} has no parent prefix", self.id))
            })?;
            self.parent_id = Some(parent.to_string());
        }
        Ok(())
    }
}

/// Deterministic id of the `index`-th (1-based) sub-position of `main_id`.
pub fn sub_position_id(main_id: &str, index: usize) -> String {
    format!("{}.{}", main_id, index)
}

/// Prefix of a dotted id before its last `.`.
pub fn parent_of(id: &str) -> Option<&str> {
    id.rsplit_once('.').map(|(parent, _)| parent).filter(|p| !p.is_empty())
}

/// 1-based accessory index of a sub-position id, if it parses.
pub fn sub_index(id: &str) -> Option<usize> {
    id.rsplit_once('.').and_then(|(_, idx)| idx.parse().ok())
}

/// Next free main position number given the existing position ids.
///
/// Ids that are not plain numbers are skipped.
pub fn next_main_number<'a>(ids: impl IntoIterator<Item = &'a str>) -> u64 {
    ids.into_iter()
        .filter_map(|id| {
            let head = id.split('.').next().unwrap_or(id);
            match head.parse::<u64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    tracing::warn!("Skipping non-standard position id: {}", id);
                    None
                }
            }
        })
        .max()
        .map_or(1, |n| n + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_helpers() {
        assert_eq!(sub_position_id("3", 2), "3.2");
        assert_eq!(parent_of("3.2"), Some("3"));
        assert_eq!(parent_of("3"), None);
        assert_eq!(sub_index("3.12"), Some(12));
        assert_eq!(sub_index("3.x"), None);
    }

    #[test]
    fn test_next_main_number() {
        assert_eq!(next_main_number(Vec::<&str>::new()), 1);
        assert_eq!(next_main_number(["1", "2", "7", "A"]), 8);
    }

    #[test]
    fn test_normalize_main_clears_accessories() {
        let mut pos = Position {
            id: "1".into(),
            accessories: vec!["Rollladen".into()],
            parent_id: Some("x".into()),
            ..Default::default()
        };
        pos.normalize().unwrap();
        assert!(pos.accessories.is_empty());
        assert!(pos.parent_id.is_none());
    }

    #[test]
    fn test_normalize_rejects_dotted_main_id() {
        let mut pos = Position {
            id: "2.1".into(),
            ..Default::default()
        };
        assert!(pos.is_main_position);
        assert!(matches!(pos.normalize(), Err(Error::InvalidPosition(_))));
    }

    #[test]
    fn test_normalize_sub_derives_parent() {
        let mut pos = Position {
            id: "4.2".into(),
            is_main_position: false,
            parent_id: None,
            ..Default::default()
        };
        pos.normalize().unwrap();
        assert_eq!(pos.parent_id.as_deref(), Some("4"));

        let mut orphan = Position {
            id: "4".into(),
            is_main_position: false,
            ..Default::default()
        };
        assert!(matches!(orphan.normalize(), Err(Error::InvalidPosition(_))));
    }

    #[test]
    fn test_sub_position_inherits_shared_fields() {
        let main = Position {
            id: "2".into(),
            project_id: 5,
            name: "Küche".into(),
            floor: "OG".into(),
            ..Default::default()
        };
        let sub = Position::sub_position(&main, 1, "Rollladen");
        assert_eq!(sub.id, "2.1");
        assert_eq!(sub.parent_id.as_deref(), Some("2"));
        assert_eq!(sub.project_id, 5);
        assert_eq!(sub.floor, "OG");
        assert!(!sub.is_main_position);
    }
}
