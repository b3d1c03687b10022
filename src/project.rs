//! Project records - a construction site with its openings.

use crate::status::Status;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A construction project.
///
/// `id == 0` marks a project that has not been saved yet; the store assigns
/// the id on first save. Color and icon are not fields: they always follow
/// from [`Project::status`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub status: Status,
    pub profile_system: String,
    pub contact_person: String,
    pub installation_date: Option<NaiveDateTime>,
    pub measurement_date: Option<NaiveDateTime>,
    pub field_service_employee: String,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Default for Project {
    fn default() -> Self {
        let now = crate::codec::now();
        Self {
            id: 0,
            name: String::new(),
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
            status: Status::Pending,
            profile_system: String::new(),
            contact_person: String::new(),
            installation_date: None,
            measurement_date: None,
            field_service_employee: String::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id != 0
    }

    pub fn color(&self) -> &'static str {
        self.status.color()
    }

    pub fn icon(&self) -> &'static str {
        self.status.icon()
    }

    pub fn full_address(&self) -> String {
        format!("{}, {} {}", self.address, self.postal_code, self.city)
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.updated_at = crate::codec::now();
    }
}
