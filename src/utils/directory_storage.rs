// deadline-service/src/utils/directory_storage.rs
use crate::models::{Project, ServiceError, Team, User};
use crate::services::directory::{DirectorySnapshot, DirectoryStore};
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const USERS_DIR: &str = "users";
const TEAMS_DIR: &str = "teams";
const PROJECTS_DIR: &str = "projects";

// Read every `*.json` record in a directory, creating it when missing
pub(crate) fn read_records<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, ServiceError> {
    if !dir.exists() {
        info!("Creating storage directory: {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| {
            error!("Failed to create directory {}: {:?}", dir.display(), e);
            ServiceError::InternalServerError
        })?;
        return Ok(Vec::new());
    }

    let mut records = Vec::new();

    for entry_result in fs::read_dir(dir).map_err(|e| {
        error!("Failed to read directory {}: {:?}", dir.display(), e);
        ServiceError::InternalServerError
    })? {
        let entry = entry_result.map_err(|e| {
            error!("Failed to read directory entry: {:?}", e);
            ServiceError::InternalServerError
        })?;

        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            let content = fs::read_to_string(&path).map_err(|e| {
                error!("Failed to read file {}: {:?}", path.display(), e);
                ServiceError::InternalServerError
            })?;

            match serde_json::from_str(&content) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping unparsable record {}: {:?}", path.display(), e);
                    continue;
                }
            }
        }
    }

    Ok(records)
}

// Build a directory snapshot from `<root>/users`, `<root>/teams` and `<root>/projects`
pub fn load_snapshot(root: &Path) -> Result<DirectorySnapshot, ServiceError> {
    let users: Vec<User> = read_records(&root.join(USERS_DIR))?;
    let teams: Vec<Team> = read_records(&root.join(TEAMS_DIR))?;
    let projects: Vec<Project> = read_records(&root.join(PROJECTS_DIR))?;

    info!(
        "✅ Loaded directory from {}: {} users, {} teams, {} projects",
        root.display(),
        users.len(),
        teams.len(),
        projects.len()
    );

    Ok(DirectorySnapshot::new(users, teams, projects))
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryCounts {
    pub users: usize,
    pub teams: usize,
    pub projects: usize,
}

// Re-reads the directory files and swaps the result into a live store
pub struct DirectoryLoader {
    root: PathBuf,
    store: Arc<DirectoryStore>,
}

impl DirectoryLoader {
    pub fn new(root: &Path, store: Arc<DirectoryStore>) -> Self {
        Self {
            root: root.to_path_buf(),
            store,
        }
    }

    // A failed load leaves the current snapshot in place
    pub fn reload(&self) -> Result<DirectoryCounts, ServiceError> {
        let snapshot = load_snapshot(&self.root)?;
        let counts = DirectoryCounts {
            users: snapshot.user_count(),
            teams: snapshot.team_count(),
            projects: snapshot.project_count(),
        };

        self.store.replace(snapshot)?;
        Ok(counts)
    }
}
