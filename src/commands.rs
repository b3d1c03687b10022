use crate::{emit_success, OutputMode};
use aufmass::catalog::ProfileSystem;
use aufmass::config::{self, AufmassConfig};
use aufmass::ui::{self, Icons};
use aufmass::{
    Measurement, PositionDraft, Project, ProfileFilter, SharedFields, Status, Store, TemplateFilter,
};
use std::collections::HashMap;
use std::path::Path;

pub struct NewProject {
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub contact: String,
}

pub struct NewPosition {
    pub project_id: i64,
    pub name: String,
    pub floor: Option<String>,
    pub template: Option<String>,
    pub products: Vec<String>,
}

pub struct PositionChanges {
    pub id: String,
    pub name: Option<String>,
    pub floor: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub products: Vec<String>,
}

pub struct MeasureInput {
    pub position_id: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub outer_width: Option<i64>,
    pub outer_height: Option<i64>,
    pub diagonal: Option<i64>,
    pub fields: Vec<String>,
}

pub fn run_init(
    database: &Path,
    config_path: &Path,
    existing: &AufmassConfig,
    force: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    config::ensure_db_dir(database)?;
    let store = Store::open(database)?;
    let stats = store.stats()?;
    store.shutdown();

    let config = AufmassConfig {
        database: Some(database.display().to_string()),
        log_level: existing.log_level.clone(),
    };
    config::write_config(config_path, &config, force)?;

    if output_mode.is_human() {
        ui::header(Icons::DATABASE, "Aufmass store");
        ui::success(&format!("Store ready at {}", database.display()));
        ui::info("Config", &config_path.display().to_string());
        ui::info(
            "Catalog",
            &format!("{} profiles, {} templates", stats.profiles, stats.templates),
        );
    }
    emit_success(
        output_mode,
        "init",
        serde_json::json!({
            "database": database.display().to_string(),
            "config": config_path.display().to_string(),
            "stats": stats,
        }),
    )
}

pub fn run_stats(store: &Store, output_mode: OutputMode) -> anyhow::Result<()> {
    let stats = store.stats()?;
    if output_mode.is_human() {
        ui::header(Icons::STATS, "Store Statistics");
        println!("{}", ui::stats_table(&stats));
    }
    emit_success(output_mode, "stats", serde_json::to_value(&stats)?)
}

pub fn run_projects(store: &Store, output_mode: OutputMode) -> anyhow::Result<()> {
    let projects = store.projects().list()?;
    if output_mode.is_human() {
        if projects.is_empty() {
            ui::warn("No projects yet");
        } else {
            ui::header(Icons::PROJECT, &format!("{} projects", projects.len()));
            println!("{}", ui::projects_table(&projects));
        }
    }
    emit_success(output_mode, "projects", serde_json::to_value(&projects)?)
}

pub fn run_add_project(store: &Store, input: NewProject, output_mode: OutputMode) -> anyhow::Result<()> {
    let mut project = Project::new(input.name);
    project.address = input.address;
    project.city = input.city;
    project.postal_code = input.postal_code;
    project.contact_person = input.contact;
    let id = store.projects().save(&mut project)?;

    if output_mode.is_human() {
        ui::success(&format!("Created project {} ({})", project.name, id));
    }
    emit_success(output_mode, "add-project", serde_json::to_value(&project)?)
}

pub fn run_positions(store: &Store, project_id: i64, output_mode: OutputMode) -> anyhow::Result<()> {
    let project = store
        .projects()
        .get(project_id)?
        .ok_or(aufmass::Error::ProjectNotFound(project_id))?;
    let positions = store.positions().list_by_project(project_id)?;

    if output_mode.is_human() {
        ui::header(Icons::WINDOW, &format!("{} - {}", project.name, ui::status_badge(project.status)));
        if positions.is_empty() {
            println!("{}", ui::muted("  no positions"));
        } else {
            println!("{}", ui::positions_table(&positions));
        }
    }
    emit_success(output_mode, "positions", serde_json::to_value(&positions)?)
}

pub fn run_add_position(store: &Store, input: NewPosition, output_mode: OutputMode) -> anyhow::Result<()> {
    if store.projects().get(input.project_id)?.is_none() {
        anyhow::bail!("project {} does not exist", input.project_id);
    }

    let mut draft = PositionDraft {
        project_id: input.project_id,
        shared: SharedFields::named(input.name),
        products: input.products,
        ..Default::default()
    };
    if let Some(floor) = input.floor {
        draft.shared.floor = floor;
    }
    if let Some(code) = input.template {
        match store.templates().get(&code)? {
            Some(template) => {
                draft.product_type = template.default_product_type.clone().unwrap_or_default();
                draft.template_code = Some(template.code);
            }
            None => ui::warn(&format!("Unknown template {}, ignoring it", code)),
        }
    }

    let id = store.positions().create_main(draft)?;
    let subs = store.positions().sub_positions(&id)?;
    if output_mode.is_human() {
        ui::success(&format!("Created position {} with {} sub-positions", id, subs.len()));
    }
    emit_success(
        output_mode,
        "add-position",
        serde_json::json!({ "id": id, "sub_positions": subs.iter().map(|s| &s.id).collect::<Vec<_>>() }),
    )
}

pub fn run_update_position(
    store: &Store,
    changes: PositionChanges,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let repo = store.positions();
    let Some(mut position) = repo.get(&changes.id)? else {
        anyhow::bail!("position {} does not exist", changes.id);
    };

    if let Some(name) = changes.name {
        position.name = name;
    }
    if let Some(floor) = changes.floor {
        position.floor = floor;
    }
    if let Some(notes) = changes.notes {
        position.notes = notes;
    }
    if let Some(label) = changes.status {
        position.status = label.parse::<Status>()?;
    }
    repo.update_main(&mut position, &changes.products)?;

    if output_mode.is_human() {
        ui::success(&format!("Updated position {} {}", position.id, position.details()));
    }
    emit_success(output_mode, "update-position", serde_json::to_value(&position)?)
}

fn parse_fields(raw: &[String]) -> anyhow::Result<HashMap<String, f64>> {
    raw.iter()
        .map(|entry| {
            let (name, value) = entry
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("expected name=value, got {:?}", entry))?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid value for {}: {}", name, e))?;
            Ok((name.trim().to_string(), value))
        })
        .collect()
}

pub fn run_measure(store: &Store, input: MeasureInput, output_mode: OutputMode) -> anyhow::Result<()> {
    let fields = parse_fields(&input.fields)?;
    let Some(position) = store.positions().get(&input.position_id)? else {
        anyhow::bail!("position {} does not exist", input.position_id);
    };

    let repo = store.measurements();
    let mut measurement = repo
        .get_by_position(&position.id)?
        .unwrap_or_else(|| Measurement::for_position(position.id.clone(), position.project_id));
    if let Some(w) = input.width {
        measurement.inner_width = w;
    }
    if let Some(h) = input.height {
        measurement.inner_height = h;
    }
    if let Some(w) = input.outer_width {
        measurement.outer_width = w;
    }
    if let Some(h) = input.outer_height {
        measurement.outer_height = h;
    }
    if input.diagonal.is_some() {
        measurement.diagonal = input.diagonal;
    }
    let mut id = repo.save(&mut measurement)?;
    if !fields.is_empty() {
        id = repo.apply_fields(&position.id, &fields)?;
    }
    let saved = repo.get(id)?.unwrap_or(measurement);

    if output_mode.is_human() {
        ui::success(&format!("Measured position {}", position.id));
        ui::info("Area", &format!("{:.2} m²", saved.area()));
        ui::info("Perimeter", &format!("{:.2} m", saved.perimeter()));
        ui::info("Ratio", &saved.aspect_ratio());
    }
    emit_success(
        output_mode,
        "measure",
        serde_json::json!({
            "measurement": saved,
            "area": saved.area(),
            "perimeter": saved.perimeter(),
        }),
    )
}

pub fn run_profiles(store: &Store, system: Option<String>, output_mode: OutputMode) -> anyhow::Result<()> {
    let filter = ProfileFilter {
        system: system.as_deref().map(ProfileSystem::from_code),
        ..Default::default()
    };
    let profiles = store.profiles().list(&filter)?;
    if output_mode.is_human() {
        ui::header(Icons::PROFILE, &format!("{} profiles", profiles.len()));
        println!("{}", ui::profiles_table(&profiles));
    }
    emit_success(output_mode, "profiles", serde_json::to_value(&profiles)?)
}

pub fn run_templates(store: &Store, category: Option<String>, output_mode: OutputMode) -> anyhow::Result<()> {
    let filter = TemplateFilter {
        category,
        ..Default::default()
    };
    let templates = store.templates().list(&filter)?;
    if output_mode.is_human() {
        ui::header(Icons::TEMPLATE, &format!("{} templates", templates.len()));
        println!("{}", ui::templates_table(&templates));
        ui::info("Categories", &store.templates().categories()?.join(", "));
    }
    emit_success(output_mode, "templates", serde_json::to_value(&templates)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        let fields = parse_fields(&["sill_height=850".to_string(), " reveal_top = 12.5".to_string()]).unwrap();
        assert_eq!(fields.get("sill_height"), Some(&850.0));
        assert_eq!(fields.get("reveal_top"), Some(&12.5));
        assert!(parse_fields(&["broken".to_string()]).is_err());
        assert!(parse_fields(&["x=abc".to_string()]).is_err());
    }
}
