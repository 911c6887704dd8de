//! Project persistence port.
//!
//! The synthesis pipeline never touches storage directly; saving and
//! loading go through this keyed-map interface. Saves are whole-snapshot
//! replacements, never partial updates, so a loaded project is always
//! internally consistent.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::Project;

/// Keyed map of saved projects.
pub trait ProjectStore: Send + Sync {
    /// Load the saved snapshot under `name`.
    fn get(&self, name: &str) -> Option<Project>;
    /// Replace the snapshot under `name`.
    fn set(&self, name: &str, project: Project);
    /// Names of all saved projects, sorted.
    fn list(&self) -> Vec<String>;
}

/// Assign deployment identifiers on first save and write the complete
/// snapshot. Re-saving keeps existing identifiers stable.
pub fn save_project(store: &dyn ProjectStore, mut project: Project) -> Project {
    if project.id.is_empty() {
        project.id = Uuid::new_v4().to_string();
    }
    if project.share_id.is_empty() {
        project.share_id = Uuid::new_v4().simple().to_string();
    }
    store.set(&project.name, project.clone());
    project
}

// ---------------------------------------------------------------------------
// In-Memory Store
// ---------------------------------------------------------------------------

/// Thread-safe in-memory store. The browser host backs this trait with
/// local storage; tests and the CLI use this implementation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<HashMap<String, Project>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for InMemoryStore {
    fn get(&self, name: &str) -> Option<Project> {
        let map = self.inner.read().expect("project store poisoned");
        map.get(name).cloned()
    }

    fn set(&self, name: &str, project: Project) {
        let mut map = self.inner.write().expect("project store poisoned");
        map.insert(name.to_string(), project);
    }

    fn list(&self) -> Vec<String> {
        let map = self.inner.read().expect("project store poisoned");
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        names
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
