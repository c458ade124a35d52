//! Type-definition model.
//!
//! Type nodes, property definitions, and the base types every repository
//! starts from.

mod base;
mod kind;
mod node;
mod property;

pub use base::{base_type, base_types};
pub use kind::{BaseKind, ContentStreamAllowed, TypeMutability};
pub use node::{TypeCandidate, TypeNode};
pub use property::{Cardinality, PropertyDefinition, PropertyType, Updatability};
