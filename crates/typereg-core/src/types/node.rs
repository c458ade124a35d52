//! Type definitions as stored in a hierarchy, and candidates for creation.

use super::kind::{BaseKind, ContentStreamAllowed, TypeMutability};
use super::property::PropertyDefinition;
use serde::{Deserialize, Serialize};

/// One object-type definition.
///
/// Children are not stored here; the owning hierarchy keeps all structural
/// links and the node only names its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeNode {
    /// Type id, unique within a repository.
    pub id: String,
    /// Base kind, fixed at creation.
    pub base_kind: BaseKind,
    /// Parent type id; `None` only for base types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub display_name: String,
    pub local_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_namespace: Option<String>,
    /// Name used by queries; unique within a repository.
    pub query_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub creatable: bool,
    pub fileable: bool,
    pub queryable: bool,
    pub included_in_supertype_query: bool,
    pub mutability: TypeMutability,
    /// Document kinds only.
    #[serde(default)]
    pub versionable: bool,
    /// Document kinds only; `None` on every other kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_stream_allowed: Option<ContentStreamAllowed>,
    /// Relationship kinds only. Empty means unrestricted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_source_types: Vec<String>,
    /// Relationship kinds only. Empty means unrestricted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_target_types: Vec<String>,
    /// Inherited definitions first, then the type's own, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_definitions: Vec<PropertyDefinition>,
}

impl TypeNode {
    /// Check if this is a base (parentless) type.
    pub fn is_base(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Get a property definition by id.
    pub fn property(&self, id: &str) -> Option<&PropertyDefinition> {
        self.property_definitions.iter().find(|p| p.id == id)
    }

    /// Properties declared by this type itself.
    pub fn own_properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.property_definitions.iter().filter(|p| !p.inherited)
    }

    /// Properties copied from supertypes.
    pub fn inherited_properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.property_definitions.iter().filter(|p| p.inherited)
    }

    /// Copy without property definitions, for listings that omit them.
    pub fn summary(&self) -> Self {
        Self {
            property_definitions: Vec::new(),
            ..self.clone()
        }
    }

    /// Copy shaped for a listing.
    pub fn view(&self, include_property_definitions: bool) -> Self {
        if include_property_definitions {
            self.clone()
        } else {
            self.summary()
        }
    }
}

/// A type definition submitted for creation.
///
/// Everything except the base kind is optional; missing names and flags are
/// derived when the candidate is normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCandidate {
    #[serde(default)]
    pub id: Option<String>,
    pub base_kind: BaseKind,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub local_name: Option<String>,
    #[serde(default)]
    pub local_namespace: Option<String>,
    #[serde(default)]
    pub query_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creatable: Option<bool>,
    #[serde(default)]
    pub fileable: Option<bool>,
    #[serde(default)]
    pub queryable: Option<bool>,
    #[serde(default)]
    pub included_in_supertype_query: Option<bool>,
    #[serde(default)]
    pub mutability: Option<TypeMutability>,
    #[serde(default)]
    pub versionable: Option<bool>,
    #[serde(default)]
    pub content_stream_allowed: Option<ContentStreamAllowed>,
    #[serde(default)]
    pub allowed_source_types: Vec<String>,
    #[serde(default)]
    pub allowed_target_types: Vec<String>,
    #[serde(default)]
    pub property_definitions: Vec<PropertyDefinition>,
}

impl TypeCandidate {
    /// Create a candidate of the given kind under `parent_id`.
    pub fn new(base_kind: BaseKind, parent_id: impl Into<String>) -> Self {
        Self {
            id: None,
            base_kind,
            parent_id: Some(parent_id.into()),
            display_name: None,
            local_name: None,
            local_namespace: None,
            query_name: None,
            description: None,
            creatable: None,
            fileable: None,
            queryable: None,
            included_in_supertype_query: None,
            mutability: None,
            versionable: None,
            content_stream_allowed: None,
            allowed_source_types: Vec::new(),
            allowed_target_types: Vec::new(),
            property_definitions: Vec::new(),
        }
    }

    /// Document subtype of `parent_id`.
    pub fn document(parent_id: impl Into<String>) -> Self {
        Self::new(BaseKind::Document, parent_id)
    }

    /// Folder subtype of `parent_id`.
    pub fn folder(parent_id: impl Into<String>) -> Self {
        Self::new(BaseKind::Folder, parent_id)
    }

    /// Set the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the query name.
    pub fn with_query_name(mut self, name: impl Into<String>) -> Self {
        self.query_name = Some(name.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the mutability.
    pub fn with_mutability(mut self, mutability: TypeMutability) -> Self {
        self.mutability = Some(mutability);
        self
    }

    /// Set the content-stream rule (Document kinds).
    pub fn with_content_stream(mut self, allowed: ContentStreamAllowed) -> Self {
        self.content_stream_allowed = Some(allowed);
        self
    }

    /// Mark as versionable (Document kinds).
    pub fn versionable(mut self) -> Self {
        self.versionable = Some(true);
        self
    }

    /// Restrict relationship endpoints (Relationship kinds).
    pub fn with_endpoints(
        mut self,
        sources: impl IntoIterator<Item = impl Into<String>>,
        targets: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.allowed_source_types = sources.into_iter().map(Into::into).collect();
        self.allowed_target_types = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Add a property definition.
    pub fn with_property(mut self, property: PropertyDefinition) -> Self {
        self.property_definitions.push(property);
        self
    }

    /// Add multiple property definitions.
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = PropertyDefinition>) -> Self {
        self.property_definitions.extend(properties);
        self
    }
}
