//! Measurement records - the dimensions taken for one position.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Extended dimensions read by the profile visualization.
///
/// Lengths are in mm, mullion/transom offsets in percent of the opening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtendedDimensions {
    pub sill_height: f64,
    pub frame_depth: f64,
    pub mullion_offset: f64,
    pub transom_offset: f64,
    pub glazing_thickness: f64,
    pub reveal_left: f64,
    pub reveal_right: f64,
    pub reveal_top: f64,
    pub reveal_bottom: f64,
}

impl Default for ExtendedDimensions {
    fn default() -> Self {
        Self {
            sill_height: 0.0,
            frame_depth: 70.0,
            mullion_offset: 50.0,
            transom_offset: 50.0,
            glazing_thickness: 24.0,
            reveal_left: 0.0,
            reveal_right: 0.0,
            reveal_top: 0.0,
            reveal_bottom: 0.0,
        }
    }
}

impl ExtendedDimensions {
    /// Column names of the extended fields, in storage order
    pub const FIELDS: [&'static str; 9] = [
        "sill_height",
        "frame_depth",
        "mullion_offset",
        "transom_offset",
        "glazing_thickness",
        "reveal_left",
        "reveal_right",
        "reveal_top",
        "reveal_bottom",
    ];

    pub fn values(&self) -> [f64; 9] {
        [
            self.sill_height,
            self.frame_depth,
            self.mullion_offset,
            self.transom_offset,
            self.glazing_thickness,
            self.reveal_left,
            self.reveal_right,
            self.reveal_top,
            self.reveal_bottom,
        ]
    }

    /// Set one field by column name. Returns `false` for unknown names.
    pub fn set(&mut self, field: &str, value: f64) -> bool {
        let slot = match field {
            "sill_height" => &mut self.sill_height,
            "frame_depth" => &mut self.frame_depth,
            "mullion_offset" => &mut self.mullion_offset,
            "transom_offset" => &mut self.transom_offset,
            "glazing_thickness" => &mut self.glazing_thickness,
            "reveal_left" => &mut self.reveal_left,
            "reveal_right" => &mut self.reveal_right,
            "reveal_top" => &mut self.reveal_top,
            "reveal_bottom" => &mut self.reveal_bottom,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Dimensions for one position (1:1).
///
/// Area and perimeter are methods, not fields: they are derived from the
/// inner width/height every time they are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    pub position_id: String,
    pub project_id: i64,
    pub inner_width: i64,
    pub inner_height: i64,
    pub outer_width: i64,
    pub outer_height: i64,
    pub diagonal: Option<i64>,
    pub extended: ExtendedDimensions,
    pub special_notes: String,
    pub photos: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Default for Measurement {
    fn default() -> Self {
        let now = crate::codec::now();
        Self {
            id: 0,
            position_id: String::new(),
            project_id: 0,
            inner_width: 0,
            inner_height: 0,
            outer_width: 0,
            outer_height: 0,
            diagonal: None,
            extended: ExtendedDimensions::default(),
            special_notes: String::new(),
            photos: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Measurement {
    pub fn for_position(position_id: impl Into<String>, project_id: i64) -> Self {
        Self {
            position_id: position_id.into(),
            project_id,
            ..Default::default()
        }
    }

    fn has_inner_dimensions(&self) -> bool {
        self.inner_width > 0 && self.inner_height > 0
    }

    /// Inner area in m², rounded to two decimals
    pub fn area(&self) -> f64 {
        if !self.has_inner_dimensions() {
            return 0.0;
        }
        round2((self.inner_width * self.inner_height) as f64 / 1_000_000.0)
    }

    /// Inner perimeter in m, rounded to two decimals
    pub fn perimeter(&self) -> f64 {
        if !self.has_inner_dimensions() {
            return 0.0;
        }
        round2(2.0 * (self.inner_width + self.inner_height) as f64 / 1_000.0)
    }

    /// Simplified width:height ratio, e.g. `"1:0.83"`
    pub fn aspect_ratio(&self) -> String {
        if !self.has_inner_dimensions() {
            return "0:0".to_string();
        }
        format!("1:{}", round2(self.inner_height as f64 / self.inner_width as f64))
    }
}
