pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const PROJECT: &str = "🏗️";
    pub const WINDOW: &str = "🪟";
    pub const RULER: &str = "📐";
    pub const PROFILE: &str = "🧱";
    pub const TEMPLATE: &str = "📋";
    pub const SUB: &str = "└";
}
