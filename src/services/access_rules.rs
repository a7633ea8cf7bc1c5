// src/services/access_rules.rs

use crate::models::{Deadline, Role, User, Visibility};
use crate::services::access_facts::VisibilityFacts;
use serde::Serialize;
use std::fmt;

// One independent reason a requester may see a deadline. Rules are
// OR-combined; table order only decides which rule gets reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityRule {
    AdminBypass,
    Creator,
    OrganizationScope,
    DepartmentScope,
    TeamScope,
    // Applies to every visibility tier, PRIVATE included
    ProjectManager,
}

pub const VISIBILITY_RULES: [VisibilityRule; 6] = [
    VisibilityRule::AdminBypass,
    VisibilityRule::Creator,
    VisibilityRule::OrganizationScope,
    VisibilityRule::DepartmentScope,
    VisibilityRule::TeamScope,
    VisibilityRule::ProjectManager,
];

impl VisibilityRule {
    pub fn grants(self, requester: &User, deadline: &Deadline, facts: &VisibilityFacts) -> bool {
        match self {
            VisibilityRule::AdminBypass => requester.role == Role::Admin,
            VisibilityRule::Creator => deadline.creator_id == requester.id,
            VisibilityRule::OrganizationScope => deadline.visibility == Visibility::Organization,
            VisibilityRule::DepartmentScope => {
                deadline.visibility == Visibility::Department
                    && same_department(facts.creator_department.as_deref(), requester.department.as_deref())
            }
            VisibilityRule::TeamScope => {
                deadline.visibility == Visibility::Team
                    && facts.team.as_ref().map_or(false, |t| t.is_member || t.is_leader)
            }
            VisibilityRule::ProjectManager => {
                deadline.project_id.is_some()
                    && facts.project_manager_id.as_deref() == Some(requester.id.as_str())
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VisibilityRule::AdminBypass => "admin_bypass",
            VisibilityRule::Creator => "creator",
            VisibilityRule::OrganizationScope => "organization_scope",
            VisibilityRule::DepartmentScope => "department_scope",
            VisibilityRule::TeamScope => "team_scope",
            VisibilityRule::ProjectManager => "project_manager",
        }
    }
}

impl fmt::Display for VisibilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Exact match; blank departments never match, not even each other
fn same_department(creator: Option<&str>, requester: Option<&str>) -> bool {
    match (creator, requester) {
        (Some(a), Some(b)) => !a.trim().is_empty() && a == b,
        _ => false,
    }
}
