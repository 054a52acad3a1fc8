use serde::{Deserialize, Serialize};

use super::RowId;

/// Name of the cleaner seeded on first store initialization.
pub const ADMIN_CLEANER_NAME: &str = "Admin";

/// A person who can be assigned tasks.
///
/// Names are unique across the roster; a cleaner logs in by typing their name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cleaner {
    pub id: RowId,
    pub name: String,
}

/// Input for adding a cleaner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCleanerInput {
    pub name: String,
}
