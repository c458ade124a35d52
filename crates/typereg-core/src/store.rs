//! External collaborators: the object store and the repository directory.
//!
//! The registry only consumes these interfaces. In-memory implementations are
//! provided for hosts that keep everything in process, and for tests.

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Reports whether stored objects reference a type.
///
/// Must reflect every committed object at call time. The call may be slow;
/// the registry never holds a hierarchy lock across its first invocation.
pub trait ObjectStore: Send + Sync {
    /// Check if at least one stored object uses `type_id`.
    fn is_type_in_use(&self, type_id: &str) -> bool;
}

/// Descriptive information about a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RepositoryInfo {
    /// Create repository info with `name` defaulting to the id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: None,
        }
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Knows which repositories exist.
pub trait RepositoryDirectory: Send + Sync {
    /// Info for a repository, if it exists.
    fn repository_info(&self, repository_id: &str) -> Option<RepositoryInfo>;

    /// Ids of all repositories.
    fn repository_ids(&self) -> Vec<String>;
}

/// Object store that only tracks live-object counts per type.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    usage: DashMap<String, usize>,
}

impl InMemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new object of `type_id`.
    pub fn add_object(&self, type_id: &str) {
        *self.usage.entry(type_id.to_string()).or_insert(0) += 1;
    }

    /// Forget one object of `type_id`. Returns false if none was recorded.
    pub fn remove_object(&self, type_id: &str) -> bool {
        let removed = match self.usage.get_mut(type_id) {
            Some(mut count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        };
        self.usage.remove_if(type_id, |_, count| *count == 0);
        removed
    }

    /// Number of live objects of `type_id`.
    pub fn object_count(&self, type_id: &str) -> usize {
        self.usage.get(type_id).map(|c| *c).unwrap_or(0)
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn is_type_in_use(&self, type_id: &str) -> bool {
        self.object_count(type_id) > 0
    }
}

/// Directory backed by an in-process list, in registration order.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    repositories: RwLock<Vec<RepositoryInfo>>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository, replacing any entry with the same id.
    pub fn register(&self, info: RepositoryInfo) {
        let mut repositories = self.repositories.write();
        match repositories.iter_mut().find(|r| r.id == info.id) {
            Some(existing) => *existing = info,
            None => repositories.push(info),
        }
    }

    /// Remove a repository. Returns its info if it was registered.
    pub fn unregister(&self, repository_id: &str) -> Option<RepositoryInfo> {
        let mut repositories = self.repositories.write();
        let pos = repositories.iter().position(|r| r.id == repository_id)?;
        Some(repositories.remove(pos))
    }
}

impl RepositoryDirectory for InMemoryDirectory {
    fn repository_info(&self, repository_id: &str) -> Option<RepositoryInfo> {
        self.repositories
            .read()
            .iter()
            .find(|r| r.id == repository_id)
            .cloned()
    }

    fn repository_ids(&self) -> Vec<String> {
        self.repositories.read().iter().map(|r| r.id.clone()).collect()
    }
}
