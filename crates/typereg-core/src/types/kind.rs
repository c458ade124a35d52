//! Base kinds and type-level enums.

use serde::{Deserialize, Serialize};

/// The base kind of an object type. Every type descends from exactly one
/// base type of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseKind {
    /// Documents, the only kind that may carry a content stream.
    Document,
    /// Folders.
    Folder,
    /// Items (fileable objects without content).
    Item,
    /// Relationships between two objects.
    Relationship,
    /// Policies applied to objects.
    Policy,
    /// Secondary types, attached to objects alongside their primary type.
    Secondary,
}

impl BaseKind {
    /// All base kinds, in seeding order.
    pub const ALL: [BaseKind; 6] = [
        BaseKind::Document,
        BaseKind::Folder,
        BaseKind::Item,
        BaseKind::Relationship,
        BaseKind::Policy,
        BaseKind::Secondary,
    ];

    /// Id of the base type for this kind.
    pub fn base_type_id(&self) -> &'static str {
        match self {
            BaseKind::Document => "cmis:document",
            BaseKind::Folder => "cmis:folder",
            BaseKind::Item => "cmis:item",
            BaseKind::Relationship => "cmis:relationship",
            BaseKind::Policy => "cmis:policy",
            BaseKind::Secondary => "cmis:secondary",
        }
    }

    /// Whether objects of this kind can be filed in folders.
    pub fn is_fileable(&self) -> bool {
        matches!(
            self,
            BaseKind::Document | BaseKind::Folder | BaseKind::Item | BaseKind::Policy
        )
    }
}

impl std::fmt::Display for BaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.base_type_id())
    }
}

/// Content-stream eligibility of a Document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentStreamAllowed {
    NotAllowed,
    #[default]
    Allowed,
    Required,
}

/// Which mutations a type permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMutability {
    /// Subtypes may be created under this type.
    pub create: bool,
    /// This type may be updated.
    pub update: bool,
    /// This type may be deleted.
    pub delete: bool,
}

impl TypeMutability {
    /// Fully mutable.
    pub fn all() -> Self {
        Self {
            create: true,
            update: true,
            delete: true,
        }
    }

    /// Mutability of a seeded base type: subtypes allowed, the type itself fixed.
    pub fn base() -> Self {
        Self {
            create: true,
            update: false,
            delete: false,
        }
    }
}

impl Default for TypeMutability {
    fn default() -> Self {
        Self::all()
    }
}
