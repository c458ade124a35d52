//! typereg core - per-repository object-type registry.
//!
//! A repository's types form a forest rooted at its base types. This crate
//! keeps that forest, answers paged child and depth-bounded descendant
//! queries, and guards creation, update, and deletion of custom types.

pub mod access;
pub mod config;
pub mod error;
pub mod guard;
pub mod hierarchy;
pub mod service;
pub mod store;
pub mod traversal;
pub mod types;

pub use access::{AccessPolicy, AllowAll, CallContext, CapabilityPolicy, TypeCapability, TypeOperation};
pub use config::RegistryConfig;
pub use error::{Error, ErrorKind, Result};
pub use guard::MutationGuard;
pub use hierarchy::TypeHierarchy;
pub use service::RepositoryTypeService;
pub use store::{
    InMemoryDirectory, InMemoryObjectStore, ObjectStore, RepositoryDirectory, RepositoryInfo,
};
pub use traversal::{list_children, list_descendants, Paging, TypeContainer, TypeList};
pub use types::{
    BaseKind, Cardinality, ContentStreamAllowed, PropertyDefinition, PropertyType, TypeCandidate,
    TypeMutability, TypeNode, Updatability,
};
