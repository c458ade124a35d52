//! Per-repository type hierarchy.
//!
//! Owns every [`TypeNode`] of one repository and keeps the parent index that
//! all structural queries go through. Nodes reference their parent by id
//! only; child lists live here and nowhere else.

use crate::error::{Error, Result};
use crate::types::{base_types, BaseKind, TypeNode};
use std::collections::HashMap;

/// Mapping from type id to node, plus the ordered parent index.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    /// Nodes keyed by id.
    nodes: HashMap<String, TypeNode>,
    /// Ids in insertion order.
    order: Vec<String>,
    /// Parentless ids in insertion order.
    roots: Vec<String>,
    /// Child ids per parent id, in insertion order.
    children: HashMap<String, Vec<String>>,
}

impl TypeHierarchy {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hierarchy holding the base types of the given kinds.
    pub fn with_base_types(kinds: &[BaseKind]) -> Result<Self> {
        let mut hierarchy = Self::new();
        for node in base_types(kinds) {
            hierarchy.insert(node)?;
        }
        Ok(hierarchy)
    }

    /// Look up a node by id.
    pub fn get(&self, id: &str) -> Option<&TypeNode> {
        self.nodes.get(id)
    }

    /// Check if a type id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of types.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the hierarchy holds no types.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Ids of the immediate children of `parent`, in insertion order.
    ///
    /// `None` selects the root (base) types.
    pub fn child_ids(&self, parent: Option<&str>) -> &[String] {
        match parent {
            None => &self.roots,
            Some(id) => self.children.get(id).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Immediate children of `parent`, in insertion order.
    ///
    /// `None` selects the root (base) types.
    pub fn children(&self, parent: Option<&str>) -> Vec<&TypeNode> {
        self.child_ids(parent)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    /// Check if a type has any subtypes.
    pub fn has_children(&self, id: &str) -> bool {
        !self.child_ids(Some(id)).is_empty()
    }

    /// Root (base) types in insertion order.
    pub fn roots(&self) -> Vec<&TypeNode> {
        self.children(None)
    }

    /// Ids of all descendants of `id`, depth-first, children in insertion order.
    pub fn descendant_ids(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack: Vec<&String> = self.child_ids(Some(id)).iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next.clone());
            stack.extend(self.child_ids(Some(next)).iter().rev());
        }
        out
    }

    /// Find a node by query name.
    pub fn find_by_query_name(&self, query_name: &str) -> Option<&TypeNode> {
        self.iter().find(|n| n.query_name == query_name)
    }

    /// Insert a new node.
    ///
    /// Fails with `Conflict` if the id is taken and `InvalidParent` if the
    /// declared parent is absent. A parentless node must be the base type of
    /// its kind. The node is appended after its siblings.
    pub fn insert(&mut self, node: TypeNode) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(Error::Conflict(node.id));
        }

        match &node.parent_id {
            Some(parent) => {
                // The existing tree is acyclic and the new id is not in it, so
                // an existing parent always chains back to a root.
                if !self.nodes.contains_key(parent) {
                    return Err(Error::invalid_parent(parent.as_str(), "parent type does not exist"));
                }
                self.children
                    .entry(parent.clone())
                    .or_default()
                    .push(node.id.clone());
            }
            None => {
                let base_id = node.base_kind.base_type_id();
                if node.id != base_id {
                    return Err(Error::invalid_parent(
                        "",
                        format!("type {} has no parent; only {base_id} may be a root", node.id),
                    ));
                }
                self.roots.push(node.id.clone());
            }
        }

        self.order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Replace a node in place, keeping its position among its siblings.
    ///
    /// Identity, base kind, and parent must match the stored node.
    pub fn replace(&mut self, node: TypeNode) -> Result<TypeNode> {
        let existing = self
            .nodes
            .get_mut(&node.id)
            .ok_or_else(|| Error::NotFound(node.id.clone()))?;

        if existing.base_kind != node.base_kind || existing.parent_id != node.parent_id {
            return Err(Error::validation(
                node.id.as_str(),
                "base kind and parent cannot change",
            ));
        }

        Ok(std::mem::replace(existing, node))
    }

    /// Remove a node.
    ///
    /// Fails with `NotFound` if absent and `HasChildren` if it still has
    /// subtypes.
    pub fn remove(&mut self, id: &str) -> Result<TypeNode> {
        let parent_id = match self.nodes.get(id) {
            Some(node) => node.parent_id.clone(),
            None => return Err(Error::NotFound(id.to_string())),
        };
        if self.has_children(id) {
            return Err(Error::HasChildren(id.to_string()));
        }

        let siblings = match &parent_id {
            Some(parent) => self.children.get_mut(parent),
            None => Some(&mut self.roots),
        };
        if let Some(siblings) = siblings {
            siblings.retain(|child| child != id);
        }
        if let Some(parent) = &parent_id {
            if self.children.get(parent).is_some_and(Vec::is_empty) {
                self.children.remove(parent);
            }
        }

        self.order.retain(|existing| existing != id);
        self.nodes
            .remove(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}
