//! Access checks run before every service operation.
//!
//! The policy is injected into the service; the registry has no built-in
//! notion of users beyond the [`CallContext`] handed to each call.

use crate::error::{Error, Result};
use std::collections::HashSet;

/// Capabilities a caller may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCapability {
    /// Read type definitions and repository info.
    Read,
    /// Create, update and delete type definitions.
    Manage,
}

/// Service entry points, as seen by an access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeOperation {
    RepositoryInfo,
    GetTypeDefinition,
    GetTypeChildren,
    GetTypeDescendants,
    CreateType,
    UpdateType,
    DeleteType,
}

impl TypeOperation {
    /// Check if the operation changes the hierarchy.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            TypeOperation::CreateType | TypeOperation::UpdateType | TypeOperation::DeleteType
        )
    }
}

impl std::fmt::Display for TypeOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeOperation::RepositoryInfo => "getRepositoryInfo",
            TypeOperation::GetTypeDefinition => "getTypeDefinition",
            TypeOperation::GetTypeChildren => "getTypeChildren",
            TypeOperation::GetTypeDescendants => "getTypeDescendants",
            TypeOperation::CreateType => "createType",
            TypeOperation::UpdateType => "updateType",
            TypeOperation::DeleteType => "deleteType",
        };
        f.write_str(name)
    }
}

/// Identity and capabilities of the caller of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Authenticated principal name.
    pub principal: String,
    /// Granted capabilities.
    pub capabilities: HashSet<TypeCapability>,
}

impl CallContext {
    /// Create a context with no capabilities.
    pub fn new(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            capabilities: HashSet::new(),
        }
    }

    /// Context allowed to read and manage types.
    pub fn admin() -> Self {
        Self::new("admin")
            .with_capability(TypeCapability::Read)
            .with_capability(TypeCapability::Manage)
    }

    /// Context allowed to read only.
    pub fn reader(principal: impl Into<String>) -> Self {
        Self::new(principal).with_capability(TypeCapability::Read)
    }

    /// Grant a capability.
    pub fn with_capability(mut self, capability: TypeCapability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Check if a capability is granted.
    pub fn has(&self, capability: TypeCapability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Decides whether a caller may run an operation on a repository.
pub trait AccessPolicy: Send + Sync {
    /// Return `PermissionDenied` to reject the call.
    fn check(&self, ctx: &CallContext, repository_id: &str, operation: TypeOperation) -> Result<()>;
}

/// Policy that admits every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn check(&self, _ctx: &CallContext, _repository_id: &str, _operation: TypeOperation) -> Result<()> {
        Ok(())
    }
}

/// Policy driven by the context's capabilities.
///
/// Reads need `Read` or `Manage`; mutations need `Manage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityPolicy;

impl AccessPolicy for CapabilityPolicy {
    fn check(&self, ctx: &CallContext, repository_id: &str, operation: TypeOperation) -> Result<()> {
        let allowed = if operation.is_mutation() {
            ctx.has(TypeCapability::Manage)
        } else {
            ctx.has(TypeCapability::Read) || ctx.has(TypeCapability::Manage)
        };

        if allowed {
            Ok(())
        } else {
            Err(Error::PermissionDenied(format!(
                "{} may not call {} on repository {}",
                ctx.principal, operation, repository_id
            )))
        }
    }
}
