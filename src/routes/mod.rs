// src/routes/mod.rs
pub mod deadline_routes;
pub mod directory_routes;

use crate::services::directory::DirectorySource;
use crate::utils::deadline_storage::DeadlineStore;
use crate::utils::directory_storage::DirectoryLoader;
use std::sync::Arc;

// Shared collaborators handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn DirectorySource>,
    pub deadlines: Arc<dyn DeadlineStore>,
    // None when the directory is not file-backed
    pub loader: Option<Arc<DirectoryLoader>>,
}

impl AppState {
    pub fn new(directory: Arc<dyn DirectorySource>, deadlines: Arc<dyn DeadlineStore>) -> Self {
        Self {
            directory,
            deadlines,
            loader: None,
        }
    }

    pub fn with_loader(mut self, loader: Arc<DirectoryLoader>) -> Self {
        self.loader = Some(loader);
        self
    }
}
