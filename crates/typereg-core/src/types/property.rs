//! Property definitions for object types.

use serde::{Deserialize, Serialize};

/// Value type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    Boolean,
    Id,
    Integer,
    DateTime,
    Decimal,
    Html,
    String,
    Uri,
}

/// Single- or multi-valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cardinality {
    #[default]
    Single,
    Multi,
}

/// When a property value may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Updatability {
    /// Maintained by the repository only.
    ReadOnly,
    /// Writable at any time.
    #[default]
    ReadWrite,
    /// Writable only on a private working copy.
    WhenCheckedOut,
    /// Writable only when the object is created.
    OnCreate,
}

/// A property definition within an object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    /// Property id (unique within the type, inherited properties included).
    pub id: String,
    #[serde(default)]
    pub local_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub query_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Value type.
    pub property_type: PropertyType,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default)]
    pub updatability: Updatability,
    /// A value must be supplied when an object is created.
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_true")]
    pub queryable: bool,
    #[serde(default)]
    pub orderable: bool,
    /// Copied from a supertype rather than declared by this type.
    #[serde(default)]
    pub inherited: bool,
}

fn default_true() -> bool {
    true
}

impl PropertyDefinition {
    /// Create a single-valued, read-write, optional property.
    pub fn new(id: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            id: id.into(),
            local_name: None,
            display_name: None,
            query_name: None,
            description: None,
            property_type,
            cardinality: Cardinality::Single,
            updatability: Updatability::ReadWrite,
            required: false,
            queryable: true,
            orderable: false,
            inherited: false,
        }
    }

    /// Create a read-only system property.
    pub fn system(id: impl Into<String>, property_type: PropertyType) -> Self {
        Self::new(id, property_type)
            .with_updatability(Updatability::ReadOnly)
            .orderable()
    }

    /// Set the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the cardinality.
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Make the property multi-valued.
    pub fn multi(self) -> Self {
        self.with_cardinality(Cardinality::Multi)
    }

    /// Set the updatability.
    pub fn with_updatability(mut self, updatability: Updatability) -> Self {
        self.updatability = updatability;
        self
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as orderable.
    pub fn orderable(mut self) -> Self {
        self.orderable = true;
        self
    }

    /// Copy of this definition as seen by a subtype.
    pub fn as_inherited(&self) -> Self {
        Self {
            inherited: true,
            ..self.clone()
        }
    }

    /// Check if writes are possible at all after creation.
    pub fn is_updatable(&self) -> bool {
        !matches!(self.updatability, Updatability::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_builder() {
        let prop = PropertyDefinition::new("amount", PropertyType::Decimal)
            .with_display_name("Amount")
            .required()
            .orderable();

        assert_eq!(prop.id, "amount");
        assert_eq!(prop.display_name.as_deref(), Some("Amount"));
        assert!(prop.required);
        assert!(prop.orderable);
        assert!(prop.is_updatable());
        assert!(!prop.inherited);
    }

    #[test]
    fn test_system_property() {
        let prop = PropertyDefinition::system("cmis:objectId", PropertyType::Id);
        assert_eq!(prop.updatability, Updatability::ReadOnly);
        assert!(!prop.is_updatable());
        assert!(prop.as_inherited().inherited);
    }

    #[test]
    fn test_property_deserialize_defaults() {
        let prop: PropertyDefinition =
            serde_json::from_str(r#"{"id":"tags","propertyType":"string","cardinality":"multi"}"#)
                .unwrap();
        assert_eq!(prop.cardinality, Cardinality::Multi);
        assert_eq!(prop.updatability, Updatability::ReadWrite);
        assert!(prop.queryable);
        assert!(!prop.required);
    }
}
