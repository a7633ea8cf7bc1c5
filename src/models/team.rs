use serde::{Deserialize, Serialize};

// A team has one leader and any number of members.
// The leader is not required to appear in `member_ids`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub leader_id: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub manager_id: String,
    #[serde(default)]
    pub team_id: Option<String>,
}
