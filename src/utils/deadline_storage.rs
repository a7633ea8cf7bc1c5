// deadline-service/src/utils/deadline_storage.rs
use crate::models::{Deadline, ServiceError};
use crate::utils::directory_storage::read_records;
use async_trait::async_trait;
use log::{debug, error, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

const DEADLINES_DIR: &str = "deadlines";

// Read-only source of candidate deadlines
#[async_trait]
pub trait DeadlineStore: Send + Sync {
    async fn candidates(&self) -> Result<Vec<Deadline>, ServiceError>;

    async fn find_deadline(&self, deadline_id: &str) -> Result<Option<Deadline>, ServiceError>;
}

// Deadlines stored as `<root>/deadlines/<id>.json`
pub struct FsDeadlineStore {
    dir: PathBuf,
}

impl FsDeadlineStore {
    pub fn new(root: &Path) -> Self {
        Self {
            dir: root.join(DEADLINES_DIR),
        }
    }
}

#[async_trait]
impl DeadlineStore for FsDeadlineStore {
    async fn candidates(&self) -> Result<Vec<Deadline>, ServiceError> {
        let mut deadlines: Vec<Deadline> = read_records(&self.dir)?;
        // read_dir order is unspecified
        deadlines.sort_by(|a, b| a.id.cmp(&b.id));
        debug!("Loaded {} candidate deadlines", deadlines.len());
        Ok(deadlines)
    }

    async fn find_deadline(&self, deadline_id: &str) -> Result<Option<Deadline>, ServiceError> {
        if deadline_id.contains(['/', '\\']) || deadline_id.contains("..") {
            return Err(ServiceError::BadRequest("Invalid deadline id".to_string()));
        }

        // Fast path: the file named after the id
        let path = self.dir.join(format!("{}.json", deadline_id));
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                error!("Failed to read deadline file: {:?}", e);
                ServiceError::InternalServerError
            })?;

            match serde_json::from_str::<Deadline>(&content) {
                Ok(deadline) if deadline.id == deadline_id => return Ok(Some(deadline)),
                Ok(deadline) => warn!(
                    "File {} holds deadline {}, scanning for {}",
                    path.display(),
                    deadline.id,
                    deadline_id
                ),
                Err(e) => warn!("Skipping unparsable record {}: {:?}", path.display(), e),
            }
        }

        // File names are not authoritative; match on the stored id like candidates() does
        let deadlines: Vec<Deadline> = read_records(&self.dir)?;
        Ok(deadlines.into_iter().find(|d| d.id == deadline_id))
    }
}

// In-memory store for embedding and tests
#[derive(Default)]
pub struct MemoryDeadlineStore {
    deadlines: RwLock<Vec<Deadline>>,
}

impl MemoryDeadlineStore {
    pub fn new(deadlines: Vec<Deadline>) -> Self {
        Self {
            deadlines: RwLock::new(deadlines),
        }
    }

    pub fn insert(&self, deadline: Deadline) -> Result<(), ServiceError> {
        let mut deadlines = self.deadlines.write().map_err(|e| {
            error!("Lock error: {:?}", e);
            ServiceError::InternalServerError
        })?;
        deadlines.retain(|d| d.id != deadline.id);
        deadlines.push(deadline);
        Ok(())
    }
}

#[async_trait]
impl DeadlineStore for MemoryDeadlineStore {
    async fn candidates(&self) -> Result<Vec<Deadline>, ServiceError> {
        let deadlines = self.deadlines.read().map_err(|e| {
            error!("Lock error: {:?}", e);
            ServiceError::InternalServerError
        })?;
        Ok(deadlines.clone())
    }

    async fn find_deadline(&self, deadline_id: &str) -> Result<Option<Deadline>, ServiceError> {
        let deadlines = self.deadlines.read().map_err(|e| {
            error!("Lock error: {:?}", e);
            ServiceError::InternalServerError
        })?;
        Ok(deadlines.iter().find(|d| d.id == deadline_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Visibility;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_fs_store_reads_deadlines() {
        let root = std::env::temp_dir().join(format!("deadline-store-{}", Uuid::new_v4()));
        let dir = root.join(DEADLINES_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("d2.json"),
            r#"{"id": "d2", "creatorId": "u1", "visibility": "TEAM", "projectId": "p1"}"#,
        )
        .unwrap();
        fs::write(
            dir.join("d1.json"),
            r#"{"id": "d1", "creatorId": "u2", "visibility": "PRIVATE"}"#,
        )
        .unwrap();

        let store = FsDeadlineStore::new(&root);
        let ids: Vec<String> = store.candidates().await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["d1", "d2"]);

        let found = store.find_deadline("d2").await.unwrap().unwrap();
        assert_eq!(found.visibility, Visibility::Team);
        assert!(store.find_deadline("d9").await.unwrap().is_none());
        assert!(store.find_deadline("../d1").await.is_err());

        fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_fs_store_lookup_matches_listing_when_file_names_differ() {
        let root = std::env::temp_dir().join(format!("deadline-store-{}", Uuid::new_v4()));
        let dir = root.join(DEADLINES_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("export-001.json"),
            r#"{"id": "d1", "creatorId": "u1", "visibility": "ORGANIZATION"}"#,
        )
        .unwrap();
        fs::write(
            dir.join("d2.json"),
            r#"{"id": "d9", "creatorId": "u2", "visibility": "PRIVATE"}"#,
        )
        .unwrap();

        let store = FsDeadlineStore::new(&root);
        let listed: Vec<String> = store.candidates().await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(listed, vec!["d1", "d9"]);

        // Every listed deadline can be fetched by its own id
        for id in &listed {
            let found = store.find_deadline(id).await.unwrap().unwrap();
            assert_eq!(&found.id, id);
        }

        // d2.json does not hold d2
        assert!(store.find_deadline("d2").await.unwrap().is_none());

        fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_replaces_on_insert() {
        let store = MemoryDeadlineStore::new(vec![Deadline::new("d1", "u1", None, Visibility::Private)]);
        store
            .insert(Deadline::new("d1", "u1", None, Visibility::Organization))
            .unwrap();

        let all = store.candidates().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].visibility, Visibility::Organization);
    }
}
