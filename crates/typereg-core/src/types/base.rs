//! Base type definitions seeded into every new repository.

use super::kind::{BaseKind, ContentStreamAllowed, TypeMutability};
use super::node::TypeNode;
use super::property::{PropertyDefinition, PropertyType, Updatability};

/// Properties shared by every object kind except secondary types.
fn object_properties() -> Vec<PropertyDefinition> {
    vec![
        PropertyDefinition::new("cmis:name", PropertyType::String)
            .with_display_name("Name")
            .required()
            .orderable(),
        PropertyDefinition::new("cmis:description", PropertyType::String)
            .with_display_name("Description"),
        PropertyDefinition::system("cmis:objectId", PropertyType::Id).with_display_name("Object Id"),
        PropertyDefinition::system("cmis:baseTypeId", PropertyType::Id)
            .with_display_name("Base Type Id"),
        PropertyDefinition::new("cmis:objectTypeId", PropertyType::Id)
            .with_display_name("Type Id")
            .with_updatability(Updatability::OnCreate)
            .required(),
        PropertyDefinition::new("cmis:secondaryObjectTypeIds", PropertyType::Id)
            .with_display_name("Secondary Type Ids")
            .multi(),
        PropertyDefinition::system("cmis:createdBy", PropertyType::String)
            .with_display_name("Created By"),
        PropertyDefinition::system("cmis:creationDate", PropertyType::DateTime)
            .with_display_name("Creation Date"),
        PropertyDefinition::system("cmis:lastModifiedBy", PropertyType::String)
            .with_display_name("Last Modified By"),
        PropertyDefinition::system("cmis:lastModificationDate", PropertyType::DateTime)
            .with_display_name("Last Modification Date"),
        PropertyDefinition::system("cmis:changeToken", PropertyType::String)
            .with_display_name("Change Token"),
    ]
}

fn kind_properties(kind: BaseKind) -> Vec<PropertyDefinition> {
    match kind {
        BaseKind::Document => vec![
            PropertyDefinition::system("cmis:isImmutable", PropertyType::Boolean),
            PropertyDefinition::system("cmis:isLatestVersion", PropertyType::Boolean),
            PropertyDefinition::system("cmis:isMajorVersion", PropertyType::Boolean),
            PropertyDefinition::system("cmis:isLatestMajorVersion", PropertyType::Boolean),
            PropertyDefinition::system("cmis:versionLabel", PropertyType::String),
            PropertyDefinition::system("cmis:versionSeriesId", PropertyType::Id),
            PropertyDefinition::system("cmis:isVersionSeriesCheckedOut", PropertyType::Boolean),
            PropertyDefinition::system("cmis:checkinComment", PropertyType::String),
            PropertyDefinition::system("cmis:contentStreamLength", PropertyType::Integer),
            PropertyDefinition::system("cmis:contentStreamMimeType", PropertyType::String),
            PropertyDefinition::system("cmis:contentStreamFileName", PropertyType::String),
            PropertyDefinition::system("cmis:contentStreamId", PropertyType::Id),
        ],
        BaseKind::Folder => vec![
            PropertyDefinition::system("cmis:parentId", PropertyType::Id),
            PropertyDefinition::system("cmis:path", PropertyType::String),
            PropertyDefinition::system("cmis:allowedChildObjectTypeIds", PropertyType::Id).multi(),
        ],
        BaseKind::Relationship => vec![
            PropertyDefinition::new("cmis:sourceId", PropertyType::Id)
                .with_updatability(Updatability::OnCreate)
                .required(),
            PropertyDefinition::new("cmis:targetId", PropertyType::Id)
                .with_updatability(Updatability::OnCreate)
                .required(),
        ],
        BaseKind::Policy => vec![PropertyDefinition::new("cmis:policyText", PropertyType::String)],
        BaseKind::Item | BaseKind::Secondary => Vec::new(),
    }
}

/// Build the base type for `kind`.
pub fn base_type(kind: BaseKind) -> TypeNode {
    let id = kind.base_type_id().to_string();
    let display_name = match kind {
        BaseKind::Document => "Document",
        BaseKind::Folder => "Folder",
        BaseKind::Item => "Item",
        BaseKind::Relationship => "Relationship",
        BaseKind::Policy => "Policy",
        BaseKind::Secondary => "Secondary Type",
    };

    let mut property_definitions = match kind {
        BaseKind::Secondary => Vec::new(),
        _ => object_properties(),
    };
    property_definitions.extend(kind_properties(kind));

    TypeNode {
        local_name: id.clone(),
        query_name: id.clone(),
        id,
        base_kind: kind,
        parent_id: None,
        display_name: display_name.to_string(),
        local_namespace: None,
        description: Some(format!("{display_name} base type")),
        creatable: kind != BaseKind::Secondary,
        fileable: kind.is_fileable(),
        queryable: true,
        included_in_supertype_query: true,
        mutability: TypeMutability::base(),
        versionable: false,
        content_stream_allowed: (kind == BaseKind::Document).then_some(ContentStreamAllowed::Allowed),
        allowed_source_types: Vec::new(),
        allowed_target_types: Vec::new(),
        property_definitions,
    }
}

/// Base types for the given kinds, in the given order.
pub fn base_types(kinds: &[BaseKind]) -> Vec<TypeNode> {
    kinds.iter().copied().map(base_type).collect()
}
