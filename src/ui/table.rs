use tabled::{settings::Style, Table, Tabled};

use crate::catalog::{PositionTemplate, ProfileDefinition};
use crate::position::Position;
use crate::project::Project;
use crate::storage::StoreStats;
use crate::ui::{output, Icons};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "Pos")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Floor")]
    floor: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Measured")]
    measured: String,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Depth")]
    depth: String,
    #[tabled(rename = "Uf")]
    uf: String,
}

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Template")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Size")]
    size: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        render(&self.rows)
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn render<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &StoreStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Projects", &stats.projects.to_string());
    builder.add_row(
        "Positions",
        &format!("{} ({} main)", stats.positions, stats.main_positions),
    );
    builder.add_row("Measurements", &stats.measurements.to_string());
    builder.add_row("Profiles", &stats.profiles.to_string());
    builder.add_row("Templates", &stats.templates.to_string());
    builder.build()
}

pub fn projects_table(projects: &[Project]) -> String {
    let rows: Vec<ProjectRow> = projects
        .iter()
        .map(|p| ProjectRow {
            id: p.id,
            name: p.name.clone(),
            address: p.full_address(),
            status: output::status_badge(p.status),
            updated: p.updated_at.format("%d.%m.%Y %H:%M").to_string(),
        })
        .collect();
    render(&rows)
}

/// Positions in hierarchy order; sub-positions are indented under their main.
pub fn positions_table(positions: &[Position]) -> String {
    let rows: Vec<PositionRow> = positions
        .iter()
        .map(|p| PositionRow {
            id: if p.is_main_position {
                p.id.clone()
            } else {
                format!("{} {}", Icons::SUB, p.id)
            },
            name: p.name.clone(),
            product: p.product.clone(),
            floor: p.floor.clone(),
            status: output::status_badge(p.status),
            measured: if p.has_measurement_data { Icons::RULER.to_string() } else { String::new() },
        })
        .collect();
    render(&rows)
}

pub fn profiles_table(profiles: &[ProfileDefinition]) -> String {
    let rows: Vec<ProfileRow> = profiles
        .iter()
        .map(|p| ProfileRow {
            code: p.code.clone(),
            name: p.display_name(),
            depth: format!("{} mm", p.depth_mm),
            uf: format!("{:.1}", p.uf_value),
        })
        .collect();
    render(&rows)
}

pub fn templates_table(templates: &[PositionTemplate]) -> String {
    let rows: Vec<TemplateRow> = templates
        .iter()
        .map(|t| TemplateRow {
            code: t.code.clone(),
            name: t.name.clone(),
            category: t.category.clone(),
            size: t.dimensions_text(),
        })
        .collect();
    render(&rows)
}
