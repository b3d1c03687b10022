//! Aufmass CLI - inspect and edit a measurement store from the terminal

mod commands;

use aufmass::config::{self, AufmassConfig};
use aufmass::{ui, Store};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "aufmass")]
#[command(version = "0.1.0")]
#[command(about = "Measurement store for window and door projects")]
#[command(long_about = r#"
Aufmass keeps projects, their positions (openings) and the measurements
taken on site in one local store file.

Example usage:
  aufmass init
  aufmass add-project "Neubau Müller" --city Köln
  aufmass add-position 1 --name Wohnzimmer --product "Fenster Standard" --product Rollladen
  aufmass measure 1 --width 1200 --height 1000
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Path to the store file
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file (default: aufmass.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the store and write a config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Show row counts of the store
    Stats,

    /// List projects, most recently updated first
    Projects,

    /// Create a project
    AddProject {
        name: String,

        #[arg(long, default_value = "")]
        address: String,

        #[arg(long, default_value = "")]
        city: String,

        #[arg(long, default_value = "")]
        postal_code: String,

        #[arg(long, default_value = "")]
        contact: String,
    },

    /// List the positions of a project
    Positions {
        project_id: i64,
    },

    /// Create a main position with its accessory sub-positions
    AddPosition {
        project_id: i64,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        floor: Option<String>,

        /// Template code to prefill from
        #[arg(short, long)]
        template: Option<String>,

        /// Selected products, in order (repeatable)
        #[arg(short, long = "product", required = true)]
        products: Vec<String>,
    },

    /// Change a position and reconcile its products
    UpdatePosition {
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        floor: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// New status (Ausstehend, Aufgemessen, Klärung, Anpassung)
        #[arg(short, long)]
        status: Option<String>,

        /// New product selection (repeatable); omit to keep the products
        #[arg(short, long = "product")]
        products: Vec<String>,
    },

    /// Record the measurement of a position
    Measure {
        position_id: String,

        /// Inner width in mm
        #[arg(long)]
        width: Option<i64>,

        /// Inner height in mm
        #[arg(long)]
        height: Option<i64>,

        #[arg(long)]
        outer_width: Option<i64>,

        #[arg(long)]
        outer_height: Option<i64>,

        #[arg(long)]
        diagonal: Option<i64>,

        /// Extended field as name=value (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,
    },

    /// List profile definitions
    Profiles {
        /// System code (SL70, SL82, AL90, PL76)
        #[arg(short, long)]
        system: Option<String>,
    },

    /// List position templates
    Templates {
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Print a JSON success envelope for `command`.
pub fn emit_success(mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if mode.is_human() {
        return Ok(());
    }
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn resolve_database(cli_database: Option<PathBuf>, config: &AufmassConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli_database.or_else(|| config.database_path()) {
        return Ok(path);
    }
    let cwd = std::env::current_dir()?;
    Ok(config::default_database_path_in(&cwd))
}

fn open_store(path: &Path) -> anyhow::Result<Store> {
    config::ensure_db_dir(path)?;
    let store = Store::open(path)?;
    let report = store.evolution();
    if !report.is_noop() {
        tracing::info!(
            "Store upgraded: {} columns added, {} tables rebuilt",
            report.added_columns.len(),
            report.rebuilt_tables.len()
        );
    }
    Ok(store)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(config.log_level.as_deref().unwrap_or("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let database = resolve_database(cli.database, &config)?;

    if let Commands::Init { force } = cli.command {
        let config_path = cli.config.unwrap_or_else(config::default_config_path);
        return commands::run_init(&database, &config_path, &config, force, mode);
    }

    let store = open_store(&database)?;
    let result = match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Stats => commands::run_stats(&store, mode),
        Commands::Projects => commands::run_projects(&store, mode),
        Commands::AddProject {
            name,
            address,
            city,
            postal_code,
            contact,
        } => commands::run_add_project(
            &store,
            commands::NewProject {
                name,
                address,
                city,
                postal_code,
                contact,
            },
            mode,
        ),
        Commands::Positions { project_id } => commands::run_positions(&store, project_id, mode),
        Commands::AddPosition {
            project_id,
            name,
            floor,
            template,
            products,
        } => commands::run_add_position(
            &store,
            commands::NewPosition {
                project_id,
                name,
                floor,
                template,
                products,
            },
            mode,
        ),
        Commands::UpdatePosition {
            id,
            name,
            floor,
            notes,
            status,
            products,
        } => commands::run_update_position(
            &store,
            commands::PositionChanges {
                id,
                name,
                floor,
                notes,
                status,
                products,
            },
            mode,
        ),
        Commands::Measure {
            position_id,
            width,
            height,
            outer_width,
            outer_height,
            diagonal,
            fields,
        } => commands::run_measure(
            &store,
            commands::MeasureInput {
                position_id,
                width,
                height,
                outer_width,
                outer_height,
                diagonal,
                fields,
            },
            mode,
        ),
        Commands::Profiles { system } => commands::run_profiles(&store, system, mode),
        Commands::Templates { category } => commands::run_templates(&store, category, mode),
    };

    store.shutdown();
    if let Err(err) = &result
        && mode.is_human()
    {
        ui::error(&format!("{:#}", err));
        std::process::exit(1);
    }
    result
}
