//! Validation of type mutations.
//!
//! The guard never mutates the hierarchy. It turns candidates into complete
//! nodes, checks updates and deletions, and leaves the write to the caller
//! once every check has passed.

mod naming;

pub use naming::check_id;

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::hierarchy::TypeHierarchy;
use crate::store::ObjectStore;
use crate::types::{
    BaseKind, PropertyDefinition, TypeCandidate, TypeNode, Updatability,
};
use naming::{first_present, id_from_name, normalize_property, present};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Validates mutations against one repository's hierarchy.
pub struct MutationGuard<'a> {
    repository_id: &'a str,
    hierarchy: &'a TypeHierarchy,
    config: &'a RegistryConfig,
}

impl<'a> MutationGuard<'a> {
    /// Create a guard over `hierarchy`.
    pub fn new(
        repository_id: &'a str,
        hierarchy: &'a TypeHierarchy,
        config: &'a RegistryConfig,
    ) -> Self {
        Self {
            repository_id,
            hierarchy,
            config,
        }
    }

    /// Normalize and validate a candidate, producing the node to insert.
    pub fn prepare_for_create(&self, candidate: TypeCandidate) -> Result<TypeNode> {
        // An explicit id must already be legal; a name-derived one is mapped.
        let id = match present(candidate.id.as_deref()) {
            Some(id) => id,
            None => first_present([
                candidate.local_name.as_deref(),
                candidate.display_name.as_deref(),
            ])
            .map(|name| id_from_name(&name))
            .ok_or_else(|| Error::validation("<unnamed>", "a type id or name is required"))?,
        };
        self.check_id(&id, &id)?;

        if self.hierarchy.contains(&id) {
            return Err(Error::Conflict(id));
        }

        let parent = self.resolve_parent(&id, &candidate)?;

        let query_name = present(candidate.query_name.as_deref()).unwrap_or_else(|| id.clone());
        self.check_id(&id, &query_name)?;
        if let Some(other) = self.hierarchy.find_by_query_name(&query_name) {
            return Err(Error::Conflict(format!(
                "query name {query_name} is used by {}",
                other.id
            )));
        }

        let node = TypeNode {
            display_name: present(candidate.display_name.as_deref()).unwrap_or_else(|| id.clone()),
            local_name: present(candidate.local_name.as_deref()).unwrap_or_else(|| id.clone()),
            local_namespace: candidate
                .local_namespace
                .clone()
                .or_else(|| parent.local_namespace.clone()),
            query_name,
            description: candidate.description.clone(),
            base_kind: candidate.base_kind,
            parent_id: Some(parent.id.clone()),
            creatable: candidate.creatable.unwrap_or(parent.creatable),
            fileable: candidate.fileable.unwrap_or(parent.fileable),
            queryable: candidate.queryable.unwrap_or(parent.queryable),
            included_in_supertype_query: candidate
                .included_in_supertype_query
                .unwrap_or(parent.included_in_supertype_query),
            mutability: candidate
                .mutability
                .unwrap_or(self.config.custom_type_mutability),
            versionable: candidate.versionable.unwrap_or(parent.versionable),
            content_stream_allowed: candidate
                .content_stream_allowed
                .or(parent.content_stream_allowed),
            allowed_source_types: candidate.allowed_source_types.clone(),
            allowed_target_types: candidate.allowed_target_types.clone(),
            property_definitions: Vec::new(),
            id,
        };
        self.check_kind_attributes(&node, &candidate)?;

        let inherited: Vec<PropertyDefinition> = parent
            .property_definitions
            .iter()
            .map(PropertyDefinition::as_inherited)
            .collect();
        let own = self.normalize_own_properties(&node, &candidate.property_definitions, &inherited)?;

        let mut node = node;
        node.property_definitions = inherited.into_iter().chain(own).collect();

        debug!(
            repository_id = self.repository_id,
            type_id = %node.id,
            parent_id = %parent.id,
            properties = node.property_definitions.len(),
            "type candidate validated"
        );
        Ok(node)
    }

    /// Validate an update, producing the merged node.
    ///
    /// Identity, base kind, parent and mutability are fixed. Descriptive
    /// attributes may change, own properties may be added and re-described
    /// but not removed or retyped. Inherited properties in `updated` are
    /// ignored and re-derived from the stored node.
    pub fn prepare_for_update(&self, updated: TypeNode) -> Result<TypeNode> {
        let existing = self
            .hierarchy
            .get(&updated.id)
            .ok_or_else(|| Error::NotFound(updated.id.clone()))?;

        if updated.base_kind != existing.base_kind {
            return Err(Error::validation(&updated.id, "base kind cannot change"));
        }
        if updated.parent_id != existing.parent_id {
            return Err(Error::validation(&updated.id, "parent type cannot change"));
        }
        if !existing.mutability.update {
            return Err(Error::validation(&updated.id, "type is not updatable"));
        }
        if updated.mutability != existing.mutability {
            return Err(Error::validation(&updated.id, "type mutability cannot change"));
        }

        let id = existing.id.clone();
        let query_name = present(Some(updated.query_name.as_str())).unwrap_or_else(|| id.clone());
        self.check_id(&id, &query_name)?;
        if let Some(other) = self.hierarchy.find_by_query_name(&query_name) {
            if other.id != id {
                return Err(Error::Conflict(format!(
                    "query name {query_name} is used by {}",
                    other.id
                )));
            }
        }

        let candidate = TypeCandidate {
            content_stream_allowed: updated.content_stream_allowed,
            versionable: Some(updated.versionable),
            allowed_source_types: updated.allowed_source_types.clone(),
            allowed_target_types: updated.allowed_target_types.clone(),
            ..TypeCandidate::new(updated.base_kind, "")
        };
        let mut merged = TypeNode {
            display_name: present(Some(updated.display_name.as_str())).unwrap_or_else(|| id.clone()),
            local_name: present(Some(updated.local_name.as_str())).unwrap_or_else(|| id.clone()),
            query_name,
            content_stream_allowed: match existing.base_kind {
                BaseKind::Document => updated
                    .content_stream_allowed
                    .or(existing.content_stream_allowed),
                _ => updated.content_stream_allowed,
            },
            property_definitions: Vec::new(),
            ..updated.clone()
        };
        self.check_kind_attributes(&merged, &candidate)?;

        let inherited: Vec<PropertyDefinition> = existing.inherited_properties().cloned().collect();
        let own = self.normalize_own_properties(&merged, &updated.property_definitions, &inherited)?;

        for previous in existing.own_properties() {
            match own.iter().find(|p| p.id == previous.id) {
                None => {
                    return Err(Error::validation(
                        &id,
                        format!("property {} cannot be removed", previous.id),
                    ))
                }
                Some(next) if next.property_type != previous.property_type => {
                    return Err(Error::validation(
                        &id,
                        format!("property type of {} cannot change", previous.id),
                    ))
                }
                Some(next) if next.cardinality != previous.cardinality => {
                    return Err(Error::validation(
                        &id,
                        format!("cardinality of {} cannot change", previous.id),
                    ))
                }
                Some(_) => {}
            }
        }

        merged.property_definitions = inherited.into_iter().chain(own).collect();
        debug!(
            repository_id = self.repository_id,
            type_id = %merged.id,
            properties = merged.property_definitions.len(),
            "type update validated"
        );
        Ok(merged)
    }

    /// Descendants of `updated` with their inherited properties re-derived.
    ///
    /// Fails if a descendant already declares a property that `updated` now
    /// passes down.
    pub fn propagate_inherited(&self, updated: &TypeNode) -> Result<Vec<TypeNode>> {
        let mut resolved: HashMap<String, Vec<PropertyDefinition>> = HashMap::new();
        resolved.insert(updated.id.clone(), updated.property_definitions.clone());

        let mut out = Vec::new();
        for descendant_id in self.hierarchy.descendant_ids(&updated.id) {
            let Some(descendant) = self.hierarchy.get(&descendant_id) else {
                continue;
            };
            let Some(parent_props) = descendant
                .parent_id
                .as_ref()
                .and_then(|parent| resolved.get(parent))
            else {
                continue;
            };

            let inherited: Vec<PropertyDefinition> =
                parent_props.iter().map(PropertyDefinition::as_inherited).collect();
            if let Some(clash) = descendant
                .own_properties()
                .find(|own| inherited.iter().any(|p| p.id == own.id))
            {
                return Err(Error::validation(
                    &updated.id,
                    format!(
                        "property {} is already defined by subtype {}",
                        clash.id, descendant.id
                    ),
                ));
            }

            let mut node = descendant.clone();
            node.property_definitions = inherited
                .into_iter()
                .chain(descendant.own_properties().cloned())
                .collect();
            resolved.insert(node.id.clone(), node.property_definitions.clone());
            out.push(node);
        }
        Ok(out)
    }

    /// Structural delete checks that need no object-store call.
    ///
    /// Order: unknown type, child types, delete not permitted, relationship
    /// endpoint.
    pub fn check_deletable(&self, type_id: &str) -> Result<&'a TypeNode> {
        let node = self
            .hierarchy
            .get(type_id)
            .ok_or_else(|| Error::NotFound(type_id.to_string()))?;
        if self.hierarchy.has_children(type_id) {
            return Err(Error::HasChildren(type_id.to_string()));
        }
        if !node.mutability.delete {
            return Err(Error::validation(type_id, "type is not deletable"));
        }
        if let Some(relationship) = self.hierarchy.iter().find(|n| {
            n.base_kind == BaseKind::Relationship
                && n.id != type_id
                && n.allowed_source_types
                    .iter()
                    .chain(&n.allowed_target_types)
                    .any(|t| t.as_str() == type_id)
        }) {
            return Err(Error::validation(
                type_id,
                format!("type is an endpoint of relationship {}", relationship.id),
            ));
        }
        Ok(node)
    }

    /// Full delete authorization: structural checks, then the in-use check.
    pub fn authorize_delete(&self, type_id: &str, store: &dyn ObjectStore) -> Result<()> {
        self.check_deletable(type_id)?;
        if store.is_type_in_use(type_id) {
            return Err(Error::TypeInUse(type_id.to_string()));
        }
        Ok(())
    }

    fn check_id(&self, type_id: &str, value: &str) -> Result<()> {
        check_id(value, self.config.max_id_length).map_err(|msg| Error::validation(type_id, msg))
    }

    fn resolve_parent(&self, id: &str, candidate: &TypeCandidate) -> Result<&'a TypeNode> {
        let parent_id = candidate
            .parent_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::invalid_parent("", format!("type {id} declares no parent")))?;

        let parent = self
            .hierarchy
            .get(parent_id)
            .ok_or_else(|| Error::invalid_parent(parent_id, "parent type does not exist"))?;

        if parent.base_kind != candidate.base_kind {
            return Err(Error::invalid_parent(
                parent_id,
                format!(
                    "parent is a {} type, candidate is a {} type",
                    parent.base_kind, candidate.base_kind
                ),
            ));
        }
        if !parent.mutability.create {
            return Err(Error::invalid_parent(parent_id, "parent type does not allow subtypes"));
        }
        Ok(parent)
    }

    fn check_kind_attributes(&self, node: &TypeNode, candidate: &TypeCandidate) -> Result<()> {
        if node.base_kind != BaseKind::Document {
            if candidate.content_stream_allowed.is_some() {
                return Err(Error::validation(
                    &node.id,
                    "only document types define content stream rules",
                ));
            }
            if candidate.versionable == Some(true) {
                return Err(Error::validation(&node.id, "only document types are versionable"));
            }
        }

        let endpoints = candidate
            .allowed_source_types
            .iter()
            .chain(&candidate.allowed_target_types);
        if node.base_kind != BaseKind::Relationship {
            if !candidate.allowed_source_types.is_empty() || !candidate.allowed_target_types.is_empty() {
                return Err(Error::validation(
                    &node.id,
                    "only relationship types restrict source and target types",
                ));
            }
        } else if let Some(missing) = endpoints.into_iter().find(|t| !self.hierarchy.contains(t)) {
            return Err(Error::validation(
                &node.id,
                format!("relationship endpoint type {missing} does not exist"),
            ));
        }
        Ok(())
    }

    fn normalize_own_properties(
        &self,
        node: &TypeNode,
        properties: &[PropertyDefinition],
        inherited: &[PropertyDefinition],
    ) -> Result<Vec<PropertyDefinition>> {
        let inherited_ids: HashSet<&str> = inherited.iter().map(|p| p.id.as_str()).collect();
        let mut seen: HashSet<String> = HashSet::new();
        let mut own = Vec::new();

        for property in properties.iter().filter(|p| !p.inherited) {
            let property = normalize_property(property.clone());
            self.check_id(&node.id, &property.id)?;

            if inherited_ids.contains(property.id.as_str()) {
                return Err(Error::validation(
                    &node.id,
                    format!("property {} is already defined by a supertype", property.id),
                ));
            }
            if !seen.insert(property.id.clone()) {
                return Err(Error::validation(
                    &node.id,
                    format!("duplicate property id: {}", property.id),
                ));
            }
            if property.required && property.updatability == Updatability::ReadOnly {
                return Err(Error::validation(
                    &node.id,
                    format!("read-only property {} cannot be required", property.id),
                ));
            }
            if property.updatability == Updatability::WhenCheckedOut
                && !(node.base_kind == BaseKind::Document && node.versionable)
            {
                return Err(Error::validation(
                    &node.id,
                    format!(
                        "property {} is writable when checked out, but the type is not a versionable document",
                        property.id
                    ),
                ));
            }
            own.push(property);
        }
        Ok(own)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryObjectStore;
    use crate::types::{Cardinality, ContentStreamAllowed, PropertyType, TypeMutability};

    fn hierarchy() -> TypeHierarchy {
        TypeHierarchy::with_base_types(&BaseKind::ALL).unwrap()
    }

    fn invoice() -> TypeCandidate {
        TypeCandidate::document("cmis:document")
            .with_id("custom:invoice")
            .with_display_name("Invoice")
            .with_property(PropertyDefinition::new("amount", PropertyType::Decimal))
    }

    fn create(h: &mut TypeHierarchy, config: &RegistryConfig, candidate: TypeCandidate) -> TypeNode {
        let node = MutationGuard::new("repo", h, config)
            .prepare_for_create(candidate)
            .unwrap();
        h.insert(node.clone()).unwrap();
        node
    }

    #[test]
    fn test_create_normalizes_names() {
        let h = hierarchy();
        let config = RegistryConfig::default();
        let guard = MutationGuard::new("repo", &h, &config);

        let node = guard
            .prepare_for_create(TypeCandidate::document("cmis:document").with_display_name("invoice"))
            .unwrap();
        assert_eq!(node.id, "invoice");
        assert_eq!(node.local_name, "invoice");
        assert_eq!(node.query_name, "invoice");
        assert_eq!(node.mutability, TypeMutability::all());

        let node = guard
            .prepare_for_create(TypeCandidate::document("cmis:document").with_id("custom:invoice"))
            .unwrap();
        assert_eq!(node.display_name, "custom:invoice");
    }

    #[test]
    fn test_create_derives_legal_id_from_name() {
        let h = hierarchy();
        let config = RegistryConfig::default();
        let guard = MutationGuard::new("repo", &h, &config);

        let node = guard
            .prepare_for_create(TypeCandidate::document("cmis:document").with_display_name("Tax Invoice"))
            .unwrap();
        assert_eq!(node.id, "Tax_Invoice");
        assert_eq!(node.display_name, "Tax Invoice");
        assert_eq!(node.query_name, "Tax_Invoice");

        let mut candidate = TypeCandidate::document("cmis:document");
        candidate.local_name = Some("2024 Report".into());
        let node = guard.prepare_for_create(candidate).unwrap();
        assert_eq!(node.id, "_2024_Report");
        assert_eq!(node.local_name, "2024 Report");

        // Explicit ids are never rewritten.
        let explicit = TypeCandidate::document("cmis:document").with_id("Tax Invoice");
        assert!(matches!(guard.prepare_for_create(explicit), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_create_requires_some_name() {
        let h = hierarchy();
        let config = RegistryConfig::default();
        let err = MutationGuard::new("repo", &h, &config)
            .prepare_for_create(TypeCandidate::document("cmis:document").with_display_name("  "))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_create_inherits_properties_and_attributes() {
        let h = hierarchy();
        let config = RegistryConfig::default();
        let node = MutationGuard::new("repo", &h, &config)
            .prepare_for_create(invoice())
            .unwrap();

        let parent = h.get("cmis:document").unwrap();
        assert_eq!(node.inherited_properties().count(), parent.property_definitions.len());
        assert_eq!(node.own_properties().count(), 1);
        assert!(node.property("cmis:name").unwrap().inherited);
        assert_eq!(node.content_stream_allowed, Some(ContentStreamAllowed::Allowed));
        assert!(node.fileable);
    }

    #[test]
    fn test_create_discards_echoed_inherited_properties() {
        let h = hierarchy();
        let config = RegistryConfig::default();
        let candidate = invoice().with_property(
            PropertyDefinition::new("cmis:name", PropertyType::Integer).as_inherited(),
        );
        let node = MutationGuard::new("repo", &h, &config)
            .prepare_for_create(candidate)
            .unwrap();
        assert_eq!(node.property("cmis:name").unwrap().property_type, PropertyType::String);
    }

    #[test]
    fn test_create_conflicts() {
        let mut h = hierarchy();
        let config = RegistryConfig::default();
        create(&mut h, &config, invoice());

        let guard = MutationGuard::new("repo", &h, &config);
        assert!(matches!(guard.prepare_for_create(invoice()), Err(Error::Conflict(_))));

        let same_query_name = TypeCandidate::document("cmis:document")
            .with_id("custom:bill")
            .with_query_name("custom:invoice");
        assert!(matches!(guard.prepare_for_create(same_query_name), Err(Error::Conflict(_))));
    }

    #[test]
    fn test_create_parent_rules() {
        let mut h = hierarchy();
        let config = RegistryConfig::default();
        create(
            &mut h,
            &config,
            TypeCandidate::document("cmis:document")
                .with_id("custom:sealed")
                .with_mutability(TypeMutability {
                    create: false,
                    update: true,
                    delete: true,
                }),
        );
        let guard = MutationGuard::new("repo", &h, &config);

        let missing = TypeCandidate::document("custom:missing").with_id("a");
        assert!(matches!(guard.prepare_for_create(missing), Err(Error::InvalidParent { .. })));

        let wrong_kind = TypeCandidate::folder("cmis:document").with_id("b");
        assert!(matches!(guard.prepare_for_create(wrong_kind), Err(Error::InvalidParent { .. })));

        let sealed = TypeCandidate::document("custom:sealed").with_id("c");
        assert!(matches!(guard.prepare_for_create(sealed), Err(Error::InvalidParent { .. })));

        let mut root = TypeCandidate::document("cmis:document").with_id("d");
        root.parent_id = None;
        assert!(matches!(guard.prepare_for_create(root), Err(Error::InvalidParent { .. })));
    }

    #[test]
    fn test_create_property_rules() {
        let h = hierarchy();
        let config = RegistryConfig::default();
        let guard = MutationGuard::new("repo", &h, &config);

        let duplicate = invoice().with_property(PropertyDefinition::new("amount", PropertyType::Integer));
        assert!(matches!(guard.prepare_for_create(duplicate), Err(Error::Validation { .. })));

        let shadowing = invoice().with_property(PropertyDefinition::new("cmis:name", PropertyType::String));
        assert!(matches!(guard.prepare_for_create(shadowing), Err(Error::Validation { .. })));

        let read_only_required = invoice().with_property(
            PropertyDefinition::system("custom:total", PropertyType::Decimal).required(),
        );
        assert!(matches!(
            guard.prepare_for_create(read_only_required),
            Err(Error::Validation { .. })
        ));

        let checked_out = invoice().with_property(
            PropertyDefinition::new("custom:draft", PropertyType::String)
                .with_updatability(Updatability::WhenCheckedOut),
        );
        assert!(matches!(
            guard.prepare_for_create(checked_out.clone()),
            Err(Error::Validation { .. })
        ));
        assert!(guard.prepare_for_create(checked_out.versionable()).is_ok());

        let bad_id = invoice().with_property(PropertyDefinition::new("9lives", PropertyType::Integer));
        assert!(matches!(guard.prepare_for_create(bad_id), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_create_kind_attribute_rules() {
        let h = hierarchy();
        let config = RegistryConfig::default();
        let guard = MutationGuard::new("repo", &h, &config);

        let folder_with_content = TypeCandidate::folder("cmis:folder")
            .with_id("custom:box")
            .with_content_stream(ContentStreamAllowed::Required);
        assert!(matches!(
            guard.prepare_for_create(folder_with_content),
            Err(Error::Validation { .. })
        ));

        let link = TypeCandidate::new(BaseKind::Relationship, "cmis:relationship")
            .with_id("custom:link")
            .with_endpoints(["cmis:document"], ["cmis:missing"]);
        assert!(matches!(guard.prepare_for_create(link), Err(Error::Validation { .. })));

        let link = TypeCandidate::new(BaseKind::Relationship, "cmis:relationship")
            .with_id("custom:link")
            .with_endpoints(["cmis:document"], ["cmis:folder"]);
        let node = guard.prepare_for_create(link).unwrap();
        assert_eq!(node.allowed_target_types, vec!["cmis:folder"]);
        assert!(node.content_stream_allowed.is_none());
    }

    #[test]
    fn test_update_identity_fixed() {
        let mut h = hierarchy();
        let config = RegistryConfig::default();
        let node = create(&mut h, &config, invoice());
        let guard = MutationGuard::new("repo", &h, &config);

        let mut reparented = node.clone();
        reparented.parent_id = Some("cmis:folder".into());
        assert!(matches!(guard.prepare_for_update(reparented), Err(Error::Validation { .. })));

        let mut rekinded = node.clone();
        rekinded.base_kind = BaseKind::Item;
        assert!(matches!(guard.prepare_for_update(rekinded), Err(Error::Validation { .. })));

        let mut unknown = node;
        unknown.id = "custom:unknown".into();
        assert!(matches!(guard.prepare_for_update(unknown), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_update_base_type_rejected() {
        let h = hierarchy();
        let config = RegistryConfig::default();
        let mut doc = h.get("cmis:document").unwrap().clone();
        doc.description = Some("changed".into());
        let err = MutationGuard::new("repo", &h, &config)
            .prepare_for_update(doc)
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_update_property_rules() {
        let mut h = hierarchy();
        let config = RegistryConfig::default();
        let node = create(&mut h, &config, invoice());
        let guard = MutationGuard::new("repo", &h, &config);

        let mut added = node.clone();
        added.description = Some("Outgoing invoices".into());
        added
            .property_definitions
            .push(PropertyDefinition::new("currency", PropertyType::String));
        let merged = guard.prepare_for_update(added).unwrap();
        assert_eq!(merged.description.as_deref(), Some("Outgoing invoices"));
        assert!(merged.property("currency").is_some());
        assert_eq!(merged.inherited_properties().count(), node.inherited_properties().count());

        let mut removed = node.clone();
        removed.property_definitions.retain(|p| p.id != "amount");
        assert!(matches!(guard.prepare_for_update(removed), Err(Error::Validation { .. })));

        let mut retyped = node.clone();
        for p in retyped.property_definitions.iter_mut().filter(|p| p.id == "amount") {
            p.cardinality = Cardinality::Multi;
        }
        assert!(matches!(guard.prepare_for_update(retyped), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_update_keeps_content_stream_rule() {
        let mut h = hierarchy();
        let config = RegistryConfig::default();
        let node = create(
            &mut h,
            &config,
            invoice().with_content_stream(ContentStreamAllowed::Required),
        );
        let guard = MutationGuard::new("repo", &h, &config);

        let mut cleared = node.clone();
        cleared.content_stream_allowed = None;
        let merged = guard.prepare_for_update(cleared).unwrap();
        assert_eq!(merged.content_stream_allowed, Some(ContentStreamAllowed::Required));

        let mut changed = node;
        changed.content_stream_allowed = Some(ContentStreamAllowed::NotAllowed);
        let merged = guard.prepare_for_update(changed).unwrap();
        assert_eq!(merged.content_stream_allowed, Some(ContentStreamAllowed::NotAllowed));
    }

    #[test]
    fn test_propagate_inherited() {
        let mut h = hierarchy();
        let config = RegistryConfig::default();
        let parent = create(&mut h, &config, invoice());
        create(
            &mut h,
            &config,
            TypeCandidate::document("custom:invoice")
                .with_id("custom:vatInvoice")
                .with_property(PropertyDefinition::new("vatRate", PropertyType::Decimal)),
        );
        let guard = MutationGuard::new("repo", &h, &config);

        let mut updated = parent.clone();
        updated
            .property_definitions
            .push(PropertyDefinition::new("currency", PropertyType::String));
        let merged = guard.prepare_for_update(updated).unwrap();
        let descendants = guard.propagate_inherited(&merged).unwrap();
        assert_eq!(descendants.len(), 1);
        let vat = &descendants[0];
        assert!(vat.property("currency").unwrap().inherited);
        assert!(!vat.property("vatRate").unwrap().inherited);

        let mut clashing = parent;
        clashing
            .property_definitions
            .push(PropertyDefinition::new("vatRate", PropertyType::Decimal));
        let merged = guard.prepare_for_update(clashing).unwrap();
        assert!(matches!(guard.propagate_inherited(&merged), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_delete_checks_in_order() {
        let mut h = hierarchy();
        let config = RegistryConfig::default();
        create(&mut h, &config, invoice());
        create(
            &mut h,
            &config,
            TypeCandidate::document("custom:invoice").with_id("custom:vatInvoice"),
        );
        let store = InMemoryObjectStore::new();
        store.add_object("custom:invoice");
        let guard = MutationGuard::new("repo", &h, &config);

        assert!(matches!(guard.authorize_delete("nope", &store), Err(Error::NotFound(_))));
        // Children are reported before the type being in use.
        assert!(matches!(
            guard.authorize_delete("custom:invoice", &store),
            Err(Error::HasChildren(_))
        ));
        assert!(matches!(
            guard.authorize_delete("cmis:folder", &store),
            Err(Error::Validation { .. })
        ));
        assert!(guard.authorize_delete("custom:vatInvoice", &store).is_ok());

        store.add_object("custom:vatInvoice");
        assert!(matches!(
            guard.authorize_delete("custom:vatInvoice", &store),
            Err(Error::TypeInUse(_))
        ));
    }

    #[test]
    fn test_delete_relationship_endpoint_rejected() {
        let mut h = hierarchy();
        let config = RegistryConfig::default();
        create(&mut h, &config, invoice());
        create(
            &mut h,
            &config,
            TypeCandidate::new(BaseKind::Relationship, "cmis:relationship")
                .with_id("custom:pays")
                .with_endpoints(["custom:invoice"], ["custom:invoice"]),
        );
        let store = InMemoryObjectStore::new();

        {
            let guard = MutationGuard::new("repo", &h, &config);
            let err = guard.authorize_delete("custom:invoice", &store).unwrap_err();
            assert!(matches!(err, Error::Validation { ref type_id, .. } if type_id == "custom:invoice"));
            assert!(guard.authorize_delete("custom:pays", &store).is_ok());
        }

        h.remove("custom:pays").unwrap();
        let guard = MutationGuard::new("repo", &h, &config);
        assert!(guard.authorize_delete("custom:invoice", &store).is_ok());
    }
}
