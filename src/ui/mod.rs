pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, muted, status_badge, success, warn};
pub use table::{
    positions_table, profiles_table, projects_table, stats_table, templates_table, TableBuilder,
};
pub use theme::{theme, Theme};
