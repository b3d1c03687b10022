//! Workflow status shared by projects and positions.
//!
//! The status set is closed. Every status maps to a fixed presentation
//! tuple (color, icon) through [`STATUS_STYLES`]; callers never store a
//! color or icon of their own.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Progress of a project or position through the measuring workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Not yet measured
    #[default]
    Pending,
    /// Measurement taken on site
    Measured,
    /// Open questions with the customer
    Clarification,
    /// Measurement needs to be adjusted
    Adjustment,
}

/// Presentation tuple for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub color: &'static str,
    pub icon: &'static str,
}

/// Static status → style table, indexed by [`Status::index`].
pub const STATUS_STYLES: [StatusStyle; 4] = [
    StatusStyle { color: "#ff9f0a", icon: "⏱" },
    StatusStyle { color: "#30d158", icon: "✓" },
    StatusStyle { color: "#bf5af2", icon: "?" },
    StatusStyle { color: "#64d2ff", icon: "🔧" },
];

impl Status {
    /// Label persisted in the `status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Ausstehend",
            Status::Measured => "Aufgemessen",
            Status::Clarification => "Klärung",
            Status::Adjustment => "Anpassung",
        }
    }

    /// Label persisted in `projects.status`; projects call a finished
    /// measurement "Aufmaß"
    pub fn as_project_str(&self) -> &'static str {
        match self {
            Status::Measured => "Aufmaß",
            other => other.as_str(),
        }
    }

    pub fn all() -> &'static [Status] {
        &[
            Status::Pending,
            Status::Measured,
            Status::Clarification,
            Status::Adjustment,
        ]
    }

    fn index(&self) -> usize {
        match self {
            Status::Pending => 0,
            Status::Measured => 1,
            Status::Clarification => 2,
            Status::Adjustment => 3,
        }
    }

    pub fn style(&self) -> StatusStyle {
        STATUS_STYLES[self.index()]
    }

    pub fn color(&self) -> &'static str {
        self.style().color
    }

    pub fn icon(&self) -> &'static str {
        self.style().icon
    }

    /// Decode a stored label, falling back to `Pending` for unknown values.
    pub fn from_stored(label: Option<&str>) -> Self {
        match label {
            None => Status::Pending,
            Some(s) if s.trim().is_empty() => Status::Pending,
            Some(s) => s.parse().unwrap_or_else(|e: Error| {
                tracing::warn!("{}, treating as pending", e);
                Status::Pending
            }),
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ausstehend" | "pending" => Ok(Status::Pending),
            "aufgemessen" | "aufmaß" | "aufmass" | "measured" => Ok(Status::Measured),
            "klärung" | "klarung" | "klã¤rung" | "clarification" => Ok(Status::Clarification),
            "anpassung" | "adjustment" => Ok(Status::Adjustment),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_status_has_fixed_style() {
        assert_eq!(Status::Pending.color(), "#ff9f0a");
        assert_eq!(Status::Measured.icon(), "✓");
        assert_eq!(Status::Clarification.color(), "#bf5af2");
        assert_eq!(Status::Adjustment.icon(), "🔧");
    }

    #[test]
    fn test_labels_roundtrip() {
        for status in Status::all() {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), *status);
            assert_eq!(status.as_project_str().parse::<Status>().unwrap(), *status);
        }
        assert_eq!(Status::Measured.as_project_str(), "Aufmaß");
        assert_eq!(Status::Measured.as_str(), "Aufgemessen");
    }

    #[test]
    fn test_legacy_labels() {
        assert_eq!("Aufmaß".parse::<Status>().unwrap(), Status::Measured);
        assert_eq!("KlÃ¤rung".parse::<Status>().unwrap(), Status::Clarification);
        assert_eq!(Status::from_stored(Some("bogus")), Status::Pending);
        assert_eq!(Status::from_stored(None), Status::Pending);
    }
}
