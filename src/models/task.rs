use serde::{Deserialize, Deserializer, Serialize};

use super::RowId;

/// A unit of work assigned to one cleaner for one day.
///
/// `day` is a free-text label ("Monday", "Week 3", ...) and is never parsed
/// as a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: RowId,
    pub cleaner_id: RowId,
    pub day: String,
    pub task: String,
    pub completed: bool,
}

/// A task as listed to clients: joined with the owning cleaner's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWithCleaner {
    pub id: RowId,
    pub cleaner_id: RowId,
    /// Name of the owning cleaner.
    pub cleaner: String,
    pub day: String,
    pub task: String,
    pub completed: bool,
}

/// Input for assigning a new task. Tasks always start out not completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskInput {
    /// Owning cleaner. Accepts a JSON number or a numeric string, since
    /// browser form values arrive as strings.
    #[serde(deserialize_with = "row_id_from_number_or_string")]
    pub cleaner_id: RowId,
    pub day: String,
    pub task: String,
}

/// Input for marking a task done or not done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTaskCompletedInput {
    #[serde(deserialize_with = "row_id_from_number_or_string")]
    pub id: RowId,
    pub completed: bool,
}

/// Query filter for listing tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTasksQuery {
    pub cleaner_id: Option<RowId>,
}

fn row_id_from_number_or_string<'de, D>(deserializer: D) -> Result<RowId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(RowId),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(id) => Ok(id),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid id: {s:?}"))),
    }
}
