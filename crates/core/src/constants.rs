/// Collection (table) that stores assets groups documents
pub const ASSETS_GROUPS_COLLECTION: &str = "assets_groups";

/// Version assigned to a freshly created aggregate
pub const INITIAL_VERSION: i64 = 1;

/// Scores are expressed on a 0-100 scale
pub const SCORE_SCALE: f64 = 100.0;
