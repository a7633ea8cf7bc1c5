// src/services/directory.rs

use crate::models::{AccessError, Project, Team, User};
use async_trait::async_trait;
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

// Leadership and roster of one team
#[derive(Debug, Clone, PartialEq)]
pub struct TeamFacts {
    pub leader_id: String,
    pub member_ids: HashSet<String>,
}

// Manager and (optional) team of one project
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFacts {
    pub manager_id: String,
    pub team_id: Option<String>,
}

// Read-only lookups; one instance per evaluation, taken from a DirectorySource
pub trait Directory: Send + Sync {
    fn get_user(&self, id: &str) -> Option<User>;

    // None for unknown users and for blank departments
    fn get_user_department(&self, id: &str) -> Option<String>;

    fn get_team_facts(&self, team_id: &str) -> Option<TeamFacts>;

    fn get_project_facts(&self, project_id: &str) -> Option<ProjectFacts>;
}

// Hands out a consistent directory view for the duration of one call
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn snapshot(&self) -> Result<Arc<dyn Directory>, AccessError>;
}

// Immutable, indexed copy of the directory
#[derive(Debug, Default, Clone)]
pub struct DirectorySnapshot {
    users: HashMap<String, User>,
    teams: HashMap<String, Team>,
    projects: HashMap<String, Project>,
}

impl DirectorySnapshot {
    pub fn new(users: Vec<User>, teams: Vec<Team>, projects: Vec<Project>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            teams: teams.into_iter().map(|t| (t.id.clone(), t)).collect(),
            projects: projects.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

impl Directory for DirectorySnapshot {
    fn get_user(&self, id: &str) -> Option<User> {
        self.users.get(id).cloned()
    }

    fn get_user_department(&self, id: &str) -> Option<String> {
        self.users
            .get(id)
            .and_then(|u| u.department.as_ref())
            .filter(|d| !d.trim().is_empty())
            .cloned()
    }

    fn get_team_facts(&self, team_id: &str) -> Option<TeamFacts> {
        self.teams.get(team_id).map(|team| TeamFacts {
            leader_id: team.leader_id.clone(),
            member_ids: team.member_ids.iter().cloned().collect(),
        })
    }

    fn get_project_facts(&self, project_id: &str) -> Option<ProjectFacts> {
        self.projects.get(project_id).map(|project| ProjectFacts {
            manager_id: project.manager_id.clone(),
            team_id: project.team_id.clone(),
        })
    }
}

// Holds the current snapshot; readers keep whichever Arc they were handed
pub struct DirectoryStore {
    current: RwLock<Arc<DirectorySnapshot>>,
}

impl DirectoryStore {
    pub fn new(snapshot: DirectorySnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    // Swap in a freshly loaded snapshot
    pub fn replace(&self, snapshot: DirectorySnapshot) -> Result<(), AccessError> {
        let mut current = self
            .current
            .write()
            .map_err(|e| AccessError::DirectoryUnavailable(format!("Lock error: {:?}", e)))?;

        info!(
            "🔄 Directory replaced: {} users, {} teams, {} projects",
            snapshot.user_count(),
            snapshot.team_count(),
            snapshot.project_count()
        );
        *current = Arc::new(snapshot);
        Ok(())
    }
}

#[async_trait]
impl DirectorySource for DirectoryStore {
    async fn snapshot(&self) -> Result<Arc<dyn Directory>, AccessError> {
        let current = self
            .current
            .read()
            .map_err(|e| AccessError::DirectoryUnavailable(format!("Lock error: {:?}", e)))?;

        debug!("Handing out directory snapshot ({} users)", current.user_count());
        let snapshot: Arc<dyn Directory> = current.clone();
        Ok(snapshot)
    }
}
