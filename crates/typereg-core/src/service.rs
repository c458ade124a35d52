//! Repository-scoped type service.
//!
//! Resolves a repository's hierarchy and dispatches to traversal (reads) or
//! the mutation guard (writes). Each repository has its own reader-writer
//! lock; independent repositories never contend.

use crate::access::{AccessPolicy, AllowAll, CallContext, TypeOperation};
use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::guard::MutationGuard;
use crate::hierarchy::TypeHierarchy;
use crate::store::{ObjectStore, RepositoryDirectory, RepositoryInfo};
use crate::traversal::{self, Paging, TypeContainer, TypeList};
use crate::types::{TypeCandidate, TypeNode};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One attached repository: its hierarchy and the store that reports type usage.
struct RepositoryTypes {
    hierarchy: RwLock<TypeHierarchy>,
    store: Arc<dyn ObjectStore>,
}

/// Public façade over all repositories' type hierarchies.
pub struct RepositoryTypeService {
    config: RegistryConfig,
    directory: Arc<dyn RepositoryDirectory>,
    access: Arc<dyn AccessPolicy>,
    repositories: DashMap<String, Arc<RepositoryTypes>>,
}

impl RepositoryTypeService {
    /// Create a service that admits every caller.
    pub fn new(directory: Arc<dyn RepositoryDirectory>, config: RegistryConfig) -> Self {
        Self {
            config,
            directory,
            access: Arc::new(AllowAll),
            repositories: DashMap::new(),
        }
    }

    /// Replace the access policy.
    pub fn with_access_policy(mut self, access: Arc<dyn AccessPolicy>) -> Self {
        self.access = access;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Create the hierarchy for a repository, seeded with the configured base
    /// types. The repository must also be known to the directory before any
    /// operation can resolve it.
    pub fn attach_repository(&self, repository_id: &str, store: Arc<dyn ObjectStore>) -> Result<()> {
        self.config.validate()?;
        let hierarchy = TypeHierarchy::with_base_types(&self.config.base_kinds)?;

        match self.repositories.entry(repository_id.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(Error::InvalidArgument(format!(
                "repository {repository_id} is already attached"
            ))),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(RepositoryTypes {
                    hierarchy: RwLock::new(hierarchy),
                    store,
                }));
                info!(repository_id, base_types = self.config.base_kinds.len(), "repository attached");
                Ok(())
            }
        }
    }

    /// Drop a repository's hierarchy. Returns false if it was not attached.
    pub fn detach_repository(&self, repository_id: &str) -> bool {
        let removed = self.repositories.remove(repository_id).is_some();
        if removed {
            info!(repository_id, "repository detached");
        }
        removed
    }

    /// Info for one repository.
    pub fn repository_info(&self, ctx: &CallContext, repository_id: &str) -> Result<RepositoryInfo> {
        self.access
            .check(ctx, repository_id, TypeOperation::RepositoryInfo)?;
        self.checked_info(repository_id)
    }

    /// Info for every repository the directory knows.
    pub fn repository_infos(&self, ctx: &CallContext) -> Result<Vec<RepositoryInfo>> {
        self.access.check(ctx, "*", TypeOperation::RepositoryInfo)?;
        Ok(self
            .directory
            .repository_ids()
            .iter()
            .filter_map(|id| self.directory.repository_info(id))
            .collect())
    }

    /// Get one type definition.
    pub fn get_type_definition(
        &self,
        ctx: &CallContext,
        repository_id: &str,
        type_id: &str,
    ) -> Result<TypeNode> {
        let repo = self.resolve(ctx, repository_id, TypeOperation::GetTypeDefinition)?;
        let hierarchy = repo.hierarchy.read();
        debug!(repository_id, type_id, "get type definition");
        hierarchy
            .get(type_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(type_id.to_string()))
    }

    /// Page through the children of a type, or the base types if `type_id` is `None`.
    pub fn get_type_children(
        &self,
        ctx: &CallContext,
        repository_id: &str,
        type_id: Option<&str>,
        include_property_definitions: bool,
        paging: Paging,
    ) -> Result<TypeList> {
        let repo = self.resolve(ctx, repository_id, TypeOperation::GetTypeChildren)?;
        let hierarchy = repo.hierarchy.read();
        debug!(
            repository_id,
            type_id,
            skip = paging.skip,
            max_items = paging.max_items,
            "get type children"
        );
        traversal::list_children(&hierarchy, type_id, include_property_definitions, paging)
    }

    /// Descendant forest of a type, or of all base types if `type_id` is `None`.
    pub fn get_type_descendants(
        &self,
        ctx: &CallContext,
        repository_id: &str,
        type_id: Option<&str>,
        depth: Option<i64>,
        include_property_definitions: bool,
    ) -> Result<Vec<TypeContainer>> {
        let repo = self.resolve(ctx, repository_id, TypeOperation::GetTypeDescendants)?;
        let hierarchy = repo.hierarchy.read();
        debug!(repository_id, type_id, depth, "get type descendants");
        traversal::list_descendants(&hierarchy, type_id, depth, include_property_definitions)
    }

    /// Create a new type.
    pub fn create_type(
        &self,
        ctx: &CallContext,
        repository_id: &str,
        candidate: TypeCandidate,
    ) -> Result<TypeNode> {
        let repo = self.resolve(ctx, repository_id, TypeOperation::CreateType)?;
        let mut hierarchy = repo.hierarchy.write();

        let node = MutationGuard::new(repository_id, &hierarchy, &self.config)
            .prepare_for_create(candidate)?;
        hierarchy.insert(node.clone())?;

        info!(
            repository_id,
            type_id = %node.id,
            parent_id = ?node.parent_id,
            "type created"
        );
        Ok(node)
    }

    /// Update an existing type in place.
    ///
    /// Property definitions added to the type are passed down to all of its
    /// subtypes in the same write.
    pub fn update_type(&self, ctx: &CallContext, repository_id: &str, updated: TypeNode) -> Result<TypeNode> {
        let repo = self.resolve(ctx, repository_id, TypeOperation::UpdateType)?;
        let mut hierarchy = repo.hierarchy.write();

        let (merged, descendants) = {
            let guard = MutationGuard::new(repository_id, &hierarchy, &self.config);
            let merged = guard.prepare_for_update(updated).inspect_err(|e| {
                warn!(repository_id, error = %e, "type update rejected");
            })?;
            let descendants = guard.propagate_inherited(&merged).inspect_err(|e| {
                warn!(repository_id, error = %e, "type update rejected");
            })?;
            (merged, descendants)
        };

        hierarchy.replace(merged.clone())?;
        let propagated = descendants.len();
        for node in descendants {
            hierarchy.replace(node)?;
        }

        info!(repository_id, type_id = %merged.id, propagated, "type updated");
        Ok(merged)
    }

    /// Delete a type.
    ///
    /// Structural checks run under a read lock, the object-store call runs
    /// with no lock held, and everything is checked again under the write
    /// lock before the node is removed.
    pub fn delete_type(&self, ctx: &CallContext, repository_id: &str, type_id: &str) -> Result<()> {
        let repo = self.resolve(ctx, repository_id, TypeOperation::DeleteType)?;

        {
            let hierarchy = repo.hierarchy.read();
            MutationGuard::new(repository_id, &hierarchy, &self.config).check_deletable(type_id)?;
        }

        if repo.store.is_type_in_use(type_id) {
            warn!(repository_id, type_id, "type delete rejected, type is in use");
            return Err(Error::TypeInUse(type_id.to_string()));
        }

        let mut hierarchy = repo.hierarchy.write();
        MutationGuard::new(repository_id, &hierarchy, &self.config)
            .authorize_delete(type_id, repo.store.as_ref())?;
        hierarchy.remove(type_id)?;

        info!(repository_id, type_id, "type deleted");
        Ok(())
    }

    fn checked_info(&self, repository_id: &str) -> Result<RepositoryInfo> {
        match self.directory.repository_info(repository_id) {
            Some(info) if info.id == repository_id => Ok(info),
            _ => Err(Error::RepositoryNotFound(repository_id.to_string())),
        }
    }

    fn resolve(
        &self,
        ctx: &CallContext,
        repository_id: &str,
        operation: TypeOperation,
    ) -> Result<Arc<RepositoryTypes>> {
        self.access.check(ctx, repository_id, operation)?;
        self.checked_info(repository_id)?;
        self.repositories
            .get(repository_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::RepositoryNotFound(repository_id.to_string()))
    }
}
