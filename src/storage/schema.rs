//! Database schema definitions

/// SQL to create the projects table
pub const CREATE_PROJECTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    address TEXT,
    city TEXT,
    postal_code TEXT,
    status TEXT DEFAULT 'Ausstehend',
    profile_system TEXT,
    contact_person TEXT,
    installation_date TEXT,
    measurement_date TEXT,
    field_service_employee TEXT,
    color TEXT,
    icon TEXT,
    notes TEXT,
    created_at TEXT,
    updated_at TEXT
)
"#;

/// Column list of the current positions table, shared by the create
/// statement and the shadow table of the rebuild.
const POSITIONS_COLUMNS: &str = r#"
    id TEXT PRIMARY KEY,
    project_id INTEGER,
    template_code TEXT,
    name TEXT NOT NULL,
    floor TEXT,
    existing_window_type TEXT,
    roller_shutter_type TEXT,
    notes TEXT,
    product TEXT,
    product_id INTEGER,
    product_type TEXT DEFAULT '',
    product_ids TEXT DEFAULT '[]',
    is_main_position INTEGER DEFAULT 1,
    parent_id TEXT,
    color TEXT,
    status TEXT DEFAULT 'Ausstehend',
    accessories TEXT,
    has_measurement_data INTEGER DEFAULT 0,
    created_at TEXT,
    updated_at TEXT,
    FOREIGN KEY (project_id) REFERENCES projects (id)
"#;

/// SQL to create a positions-shaped table under `name`
pub fn create_positions_table(name: &str) -> String {
    format!("CREATE TABLE IF NOT EXISTS {} ({})", name, POSITIONS_COLUMNS)
}

/// SQL to create the measurements table
pub const CREATE_MEASUREMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS measurements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    position_id TEXT,
    project_id INTEGER,
    inner_width INTEGER DEFAULT 0,
    inner_height INTEGER DEFAULT 0,
    outer_width INTEGER DEFAULT 0,
    outer_height INTEGER DEFAULT 0,
    diagonal INTEGER DEFAULT 0,
    special_notes TEXT,
    photos TEXT,
    sill_height REAL DEFAULT 0,
    frame_depth REAL DEFAULT 70,
    mullion_offset REAL DEFAULT 50,
    transom_offset REAL DEFAULT 50,
    glazing_thickness REAL DEFAULT 24,
    reveal_left REAL DEFAULT 0,
    reveal_right REAL DEFAULT 0,
    reveal_top REAL DEFAULT 0,
    reveal_bottom REAL DEFAULT 0,
    area REAL DEFAULT 0,
    perimeter REAL DEFAULT 0,
    created_at TEXT,
    updated_at TEXT,
    FOREIGN KEY (position_id) REFERENCES positions (id),
    FOREIGN KEY (project_id) REFERENCES projects (id)
)
"#;

/// SQL to create the profiles table
pub const CREATE_PROFILES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    system_code TEXT NOT NULL,
    profile_type_code TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    depth_mm REAL NOT NULL,
    view_width_mm REAL NOT NULL,
    rebate_height_mm REAL NOT NULL,
    wall_thickness_mm REAL NOT NULL,
    chamber_count INTEGER NOT NULL,
    glazing_thickness_max REAL NOT NULL,
    uf_value REAL NOT NULL,
    psi_value REAL,
    test_standard TEXT,
    svg_path TEXT,
    section_drawing_path TEXT,
    reinforcement_possible INTEGER DEFAULT 1,
    standard_colors TEXT,
    surface_textures TEXT,
    max_sash_weight_kg REAL,
    max_element_height_mm REAL,
    max_element_width_mm REAL,
    seal_count INTEGER DEFAULT 2,
    seal_type TEXT DEFAULT 'EPDM',
    is_active INTEGER DEFAULT 1,
    sort_order INTEGER DEFAULT 0,
    notes TEXT,
    created_at TEXT,
    updated_at TEXT
)
"#;

/// SQL to create the position templates table
pub const CREATE_POSITION_TEMPLATES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS position_templates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    category TEXT,
    w_mm INTEGER DEFAULT 0,
    h_mm INTEGER DEFAULT 0,
    default_product_type TEXT,
    is_active INTEGER DEFAULT 1,
    sort_order INTEGER DEFAULT 0,
    created_at TEXT,
    updated_at TEXT
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_positions_project ON positions(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_positions_parent ON positions(parent_id)",
    "CREATE INDEX IF NOT EXISTS idx_measurements_position ON measurements(position_id)",
];

/// Columns added after the first release, with the definition used to add
/// them to an older table: `(table, column, definition)`.
pub const ADDED_COLUMNS: &[(&str, &str, &str)] = &[
    ("positions", "product_type", "TEXT DEFAULT ''"),
    ("positions", "product_ids", "TEXT DEFAULT '[]'"),
    ("positions", "template_code", "TEXT DEFAULT ''"),
    ("positions", "product_id", "INTEGER"),
    ("measurements", "sill_height", "REAL DEFAULT 0"),
    ("measurements", "frame_depth", "REAL DEFAULT 70"),
    ("measurements", "mullion_offset", "REAL DEFAULT 50"),
    ("measurements", "transom_offset", "REAL DEFAULT 50"),
    ("measurements", "glazing_thickness", "REAL DEFAULT 24"),
    ("measurements", "reveal_left", "REAL DEFAULT 0"),
    ("measurements", "reveal_right", "REAL DEFAULT 0"),
    ("measurements", "reveal_top", "REAL DEFAULT 0"),
    ("measurements", "reveal_bottom", "REAL DEFAULT 0"),
    ("measurements", "area", "REAL DEFAULT 0"),
    ("measurements", "perimeter", "REAL DEFAULT 0"),
];

/// Positions columns dropped from the current shape
pub const DEPRECATED_POSITION_COLUMNS: &[&str] = &["w_mm", "h_mm"];

/// Name of the shadow table used while rebuilding positions
pub const POSITIONS_SHADOW_TABLE: &str = "positions_new";

/// All table creation statements, in dependency order
pub fn all_table_statements() -> Vec<String> {
    vec![
        CREATE_PROJECTS_TABLE.to_string(),
        create_positions_table("positions"),
        CREATE_MEASUREMENTS_TABLE.to_string(),
        CREATE_PROFILES_TABLE.to_string(),
        CREATE_POSITION_TEMPLATES_TABLE.to_string(),
    ]
}
