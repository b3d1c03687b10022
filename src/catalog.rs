//! Catalog records - profile definitions and position templates.
//!
//! Both are seeded on startup and read far more often than written; the
//! store keeps them behind reference caches.

use serde::{Deserialize, Serialize};

/// Profile system families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileSystem {
    Softline70,
    Softline82,
    Alphaline90,
    Perfectline76,
}

impl ProfileSystem {
    pub fn code(&self) -> &'static str {
        match self {
            ProfileSystem::Softline70 => "SL70",
            ProfileSystem::Softline82 => "SL82",
            ProfileSystem::Alphaline90 => "AL90",
            ProfileSystem::Perfectline76 => "PL76",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProfileSystem::Softline70 => "Softline 70",
            ProfileSystem::Softline82 => "Softline 82 MD",
            ProfileSystem::Alphaline90 => "Alphaline 90",
            ProfileSystem::Perfectline76 => "Perfectline 76",
        }
    }

    /// Look up by stored code; unknown codes map to Softline 70.
    pub fn from_code(code: &str) -> Self {
        match code {
            "SL82" => ProfileSystem::Softline82,
            "AL90" => ProfileSystem::Alphaline90,
            "PL76" => ProfileSystem::Perfectline76,
            "SL70" => ProfileSystem::Softline70,
            other => {
                tracing::warn!("Unknown profile system {:?}, using SL70", other);
                ProfileSystem::Softline70
            }
        }
    }
}

/// Profile component kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    Frame,
    Sash,
    Mullion,
    Transom,
    GlazingBead,
}

impl ProfileKind {
    pub fn code(&self) -> &'static str {
        match self {
            ProfileKind::Frame => "frame",
            ProfileKind::Sash => "sash",
            ProfileKind::Mullion => "mullion",
            ProfileKind::Transom => "transom",
            ProfileKind::GlazingBead => "glazing_bead",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProfileKind::Frame => "Blendrahmen",
            ProfileKind::Sash => "Flügel",
            ProfileKind::Mullion => "Pfosten",
            ProfileKind::Transom => "Kämpfer",
            ProfileKind::GlazingBead => "Glasleiste",
        }
    }

    /// Look up by stored code; unknown codes map to frame.
    pub fn from_code(code: &str) -> Self {
        match code {
            "sash" => ProfileKind::Sash,
            "mullion" => ProfileKind::Mullion,
            "transom" => ProfileKind::Transom,
            "glazing_bead" => ProfileKind::GlazingBead,
            "frame" => ProfileKind::Frame,
            other => {
                tracing::warn!("Unknown profile type {:?}, using frame", other);
                ProfileKind::Frame
            }
        }
    }
}

/// A window profile with its technical data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDefinition {
    /// Stable catalog code, e.g. `SL70_FRAME_70`
    pub code: String,
    pub system: ProfileSystem,
    pub kind: ProfileKind,
    pub name: String,
    pub description: String,
    pub depth_mm: f64,
    pub view_width_mm: f64,
    pub rebate_height_mm: f64,
    pub wall_thickness_mm: f64,
    pub chamber_count: i64,
    pub glazing_thickness_max: f64,
    /// Thermal transmittance W/(m²K)
    pub uf_value: f64,
    pub psi_value: Option<f64>,
    pub test_standard: String,
    pub svg_path: Option<String>,
    pub section_drawing_path: Option<String>,
    pub reinforcement_possible: bool,
    pub standard_colors: Vec<String>,
    pub surface_textures: Vec<String>,
    pub max_sash_weight_kg: Option<f64>,
    pub max_element_height_mm: Option<f64>,
    pub max_element_width_mm: Option<f64>,
    pub seal_count: i64,
    pub seal_type: String,
    pub is_active: bool,
    pub sort_order: i64,
    pub notes: Option<String>,
}

impl ProfileDefinition {
    /// Human readable name, e.g. `Softline 70 - Blendrahmen 70mm`
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.system.display_name(), self.name)
    }

    /// Technical code derived from system, kind and depth
    pub fn technical_code(&self) -> String {
        format!(
            "{}_{}_{}",
            self.system.code(),
            self.kind.code().to_uppercase(),
            self.depth_mm as i64
        )
    }

    fn standard(
        system: ProfileSystem,
        kind: ProfileKind,
        name: &str,
        description: &str,
        dims: (f64, f64, f64, f64, i64, f64),
        uf_value: f64,
    ) -> Self {
        let (depth_mm, view_width_mm, rebate_height_mm, wall_thickness_mm, chamber_count, glazing_thickness_max) =
            dims;
        let mut profile = Self {
            code: String::new(),
            system,
            kind,
            name: name.to_string(),
            description: description.to_string(),
            depth_mm,
            view_width_mm,
            rebate_height_mm,
            wall_thickness_mm,
            chamber_count,
            glazing_thickness_max,
            uf_value,
            psi_value: None,
            test_standard: "EN ISO 10077-2".to_string(),
            svg_path: None,
            section_drawing_path: None,
            reinforcement_possible: true,
            standard_colors: ["Weiß", "Braun", "Anthrazit", "Grau"].map(String::from).to_vec(),
            surface_textures: ["Glatt", "Foliert", "Dekorfolie"].map(String::from).to_vec(),
            max_sash_weight_kg: None,
            max_element_height_mm: None,
            max_element_width_mm: None,
            seal_count: 2,
            seal_type: "EPDM".to_string(),
            is_active: true,
            sort_order: 0,
            notes: None,
        };
        profile.code = profile.technical_code();
        profile
    }
}

/// Profiles every new store starts with.
pub fn standard_profiles() -> Vec<ProfileDefinition> {
    vec![
        ProfileDefinition {
            max_sash_weight_kg: Some(130.0),
            max_element_height_mm: Some(2500.0),
            max_element_width_mm: Some(1600.0),
            ..ProfileDefinition::standard(
                ProfileSystem::Softline70,
                ProfileKind::Frame,
                "Blendrahmen 70mm",
                "Standard Blendrahmen für Softline 70",
                (70.0, 119.0, 20.0, 2.8, 5, 41.0),
                1.3,
            )
        },
        ProfileDefinition::standard(
            ProfileSystem::Softline70,
            ProfileKind::Sash,
            "Flügel 70mm",
            "Standard Flügelprofil für Softline 70",
            (70.0, 94.0, 20.0, 2.8, 5, 41.0),
            1.3,
        ),
        ProfileDefinition {
            max_sash_weight_kg: Some(150.0),
            max_element_height_mm: Some(2800.0),
            max_element_width_mm: Some(1800.0),
            ..ProfileDefinition::standard(
                ProfileSystem::Softline82,
                ProfileKind::Frame,
                "Blendrahmen 82mm MD",
                "Mitteldichtung Blendrahmen für Softline 82",
                (82.0, 127.0, 24.0, 3.0, 6, 53.0),
                1.0,
            )
        },
    ]
}

/// A predefined opening type used to prefill new positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionTemplate {
    /// Store-assigned row id, `None` until saved
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub w_mm: i64,
    pub h_mm: i64,
    pub default_product_type: Option<String>,
    pub is_active: bool,
    pub sort_order: i64,
}

impl PositionTemplate {
    pub fn new(code: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            description: String::new(),
            category: category.into(),
            w_mm: 0,
            h_mm: 0,
            default_product_type: None,
            is_active: true,
            sort_order: 0,
        }
    }

    pub fn display_name(&self) -> String {
        if self.w_mm > 0 && self.h_mm > 0 {
            format!("{} ({}×{}mm)", self.name, self.w_mm, self.h_mm)
        } else {
            self.name.clone()
        }
    }

    pub fn dimensions_text(&self) -> String {
        if self.w_mm > 0 && self.h_mm > 0 {
            format!("{} × {} mm", self.w_mm, self.h_mm)
        } else {
            "Keine Vorgabe".to_string()
        }
    }
}

/// Templates every new store starts with.
pub fn standard_templates() -> Vec<PositionTemplate> {
    let rows: [(&str, &str, &str, &str, i64, i64); 6] = [
        ("WZ_WIN", "Wohnzimmer-Fenster", "Standard Wohnzimmerfenster", "Fenster", 1200, 1400),
        ("SZ_WIN", "Schlafzimmer-Fenster", "Standard Schlafzimmerfenster", "Fenster", 1000, 1200),
        ("KUE_WIN", "Küchen-Fenster", "Küchenfenster über Arbeitsplatte", "Fenster", 800, 600),
        ("BAD_WIN", "Badezimmer-Fenster", "Kleines Badezimmerfenster", "Fenster", 600, 800),
        ("HAU_TUR", "Haustür", "Standard Eingangstür", "Türen", 900, 2100),
        ("KUE_TUR", "Küchentür", "Küchentür zum Garten", "Türen", 900, 2100),
    ];
    rows.iter()
        .enumerate()
        .map(|(i, (code, name, description, category, w_mm, h_mm))| PositionTemplate {
            description: description.to_string(),
            w_mm: *w_mm,
            h_mm: *h_mm,
            default_product_type: Some("window".to_string()),
            sort_order: i as i64 + 1,
            ..PositionTemplate::new(*code, *name, *category)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_profile_codes() {
        let codes: Vec<String> = standard_profiles().into_iter().map(|p| p.code).collect();
        assert_eq!(codes, vec!["SL70_FRAME_70", "SL70_SASH_70", "SL82_FRAME_82"]);
    }

    #[test]
    fn test_profile_display_name() {
        let profile = &standard_profiles()[0];
        assert_eq!(profile.display_name(), "Softline 70 - Blendrahmen 70mm");
        assert_eq!(profile.max_sash_weight_kg, Some(130.0));
    }

    #[test]
    fn test_template_display() {
        let templates = standard_templates();
        assert_eq!(templates.len(), 6);
        assert_eq!(templates[0].display_name(), "Wohnzimmer-Fenster (1200×1400mm)");
        assert_eq!(PositionTemplate::new("X", "Frei", "Sonstiges").dimensions_text(), "Keine Vorgabe");
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        assert_eq!(ProfileSystem::from_code("ZZ"), ProfileSystem::Softline70);
        assert_eq!(ProfileKind::from_code("glazing_bead"), ProfileKind::GlazingBead);
    }
}
