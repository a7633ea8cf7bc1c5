use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Disclosure scope of a deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    Private,
    Team,
    Department,
    Organization,
}

// Deadline record as supplied by the deadline store.
// Only id, creator, project and visibility take part in access decisions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    pub id: String,
    pub creator_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub visibility: Visibility,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub deadline_date: Option<DateTime<Utc>>,
}

impl Deadline {
    pub fn new(id: &str, creator_id: &str, project_id: Option<&str>, visibility: Visibility) -> Self {
        Self {
            id: id.to_string(),
            creator_id: creator_id.to_string(),
            project_id: project_id.map(|p| p.to_string()),
            visibility,
            title: None,
            deadline_date: None,
        }
    }
}
