use serde::{Deserialize, Serialize};

use super::RowId;

/// Login request. Either the shared admin secret or a cleaner name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthenticateInput {
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Outcome of a successful login.
///
/// Admins are not tied to a cleaner record, so `cleaner_id` is `None` for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authenticated {
    pub is_admin: bool,
    pub cleaner_id: Option<RowId>,
}

impl Authenticated {
    pub fn admin() -> Self {
        Self {
            is_admin: true,
            cleaner_id: None,
        }
    }

    pub fn cleaner(id: RowId) -> Self {
        Self {
            is_admin: false,
            cleaner_id: Some(id),
        }
    }
}
