pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const LINK: &str = "🔗";
    pub const FILE: &str = "📄";
    pub const DATABASE: &str = "🗄️";
    pub const OFFICE: &str = "🏢";
    pub const BRIEFCASE: &str = "💼";
    pub const MONEY: &str = "💰";
    pub const TROPHY: &str = "🏆";
    pub const EMPTY: &str = "∅";
    pub const BROOM: &str = "🧹";
}
