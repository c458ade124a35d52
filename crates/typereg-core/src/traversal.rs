//! Read-only traversal over a [`TypeHierarchy`].
//!
//! Child listing with skip/max-items paging, and depth-bounded descendant
//! trees. Output order is always depth-first with siblings in insertion
//! order, so repeated calls return identical results.

use crate::error::{Error, Result};
use crate::hierarchy::TypeHierarchy;
use crate::types::TypeNode;
use serde::Serialize;

/// Paging window for child listings.
///
/// `skip` absent or negative means 0 and is clamped to the number of items.
/// `max_items` absent or negative means no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Paging {
    pub skip: Option<i64>,
    pub max_items: Option<i64>,
}

impl Paging {
    /// No skip, no limit.
    pub fn all() -> Self {
        Self::default()
    }

    /// Explicit window.
    pub fn new(skip: i64, max_items: i64) -> Self {
        Self {
            skip: Some(skip),
            max_items: Some(max_items),
        }
    }

    /// Resolve against `total` items into `(skip, take)`.
    pub fn window(&self, total: usize) -> (usize, usize) {
        let skip = self
            .skip
            .map(|s| usize::try_from(s.max(0)).unwrap_or(usize::MAX))
            .unwrap_or(0)
            .min(total);
        let remaining = total - skip;
        let take = match self.max_items {
            Some(max) if max >= 0 => usize::try_from(max).unwrap_or(usize::MAX).min(remaining),
            _ => remaining,
        };
        (skip, take)
    }
}

/// One page of type definitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeList {
    /// Definitions in this page.
    pub items: Vec<TypeNode>,
    /// More items follow this page.
    pub has_more_items: bool,
    /// Size of the full, unpaged set.
    pub num_items: usize,
}

/// A type definition together with its descendant forest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeContainer {
    pub type_definition: TypeNode,
    pub children: Vec<TypeContainer>,
}

impl TypeContainer {
    /// Number of definitions in this subtree, including this one.
    pub fn count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(container) = stack.pop() {
            count += 1;
            stack.extend(&container.children);
        }
        count
    }

    /// Ids in the subtree, depth-first.
    pub fn ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(container) = stack.pop() {
            out.push(container.type_definition.id.as_str());
            stack.extend(container.children.iter().rev());
        }
        out
    }
}

impl Drop for TypeContainer {
    // Flatten before dropping so deep chains don't recurse.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut container) = stack.pop() {
            stack.append(&mut container.children);
        }
    }
}

/// List the immediate children of `type_id`, or the base types if `None`.
pub fn list_children(
    hierarchy: &TypeHierarchy,
    type_id: Option<&str>,
    include_property_definitions: bool,
    paging: Paging,
) -> Result<TypeList> {
    if let Some(id) = type_id {
        if !hierarchy.contains(id) {
            return Err(Error::NotFound(id.to_string()));
        }
    }

    let children = hierarchy.children(type_id);
    let total = children.len();
    let (skip, take) = paging.window(total);

    let items: Vec<TypeNode> = children
        .into_iter()
        .skip(skip)
        .take(take)
        .map(|node| node.view(include_property_definitions))
        .collect();

    Ok(TypeList {
        has_more_items: total > skip + items.len(),
        num_items: total,
        items,
    })
}

/// List the descendants of `type_id` down to `depth` levels.
///
/// Depth `None` or negative is unbounded; depth 0 is rejected. With no type
/// id the requested depth is ignored and the complete forest of base types is
/// returned.
pub fn list_descendants(
    hierarchy: &TypeHierarchy,
    type_id: Option<&str>,
    depth: Option<i64>,
    include_property_definitions: bool,
) -> Result<Vec<TypeContainer>> {
    if depth == Some(0) {
        return Err(Error::InvalidArgument(
            "depth == 0 is illegal in getTypeDescendants".to_string(),
        ));
    }

    match type_id {
        None => Ok(build_forest(hierarchy, None, None, include_property_definitions)),
        Some(id) => {
            if !hierarchy.contains(id) {
                return Err(Error::InvalidArgument(format!("unknown type id: {id}")));
            }
            let levels = depth
                .filter(|d| *d > 0)
                .map(|d| usize::try_from(d).unwrap_or(usize::MAX));
            Ok(build_forest(hierarchy, Some(id), levels, include_property_definitions))
        }
    }
}

/// A node whose children are still being expanded.
struct Frame<'h> {
    node: &'h TypeNode,
    level: usize,
    pending: std::vec::IntoIter<&'h TypeNode>,
    built: Vec<TypeContainer>,
}

impl<'h> Frame<'h> {
    fn new(hierarchy: &'h TypeHierarchy, node: &'h TypeNode, level: usize, levels: Option<usize>) -> Self {
        let pending = if levels.map_or(true, |max| level < max) {
            hierarchy.children(Some(node.id.as_str()))
        } else {
            Vec::new()
        };
        Self {
            node,
            level,
            pending: pending.into_iter(),
            built: Vec::new(),
        }
    }
}

/// Post-order build with an explicit stack; `levels` counts the top nodes as 1.
fn build_forest(
    hierarchy: &TypeHierarchy,
    parent: Option<&str>,
    levels: Option<usize>,
    include_property_definitions: bool,
) -> Vec<TypeContainer> {
    let mut forest = Vec::new();
    if levels == Some(0) {
        return forest;
    }

    let mut stack: Vec<Frame<'_>> = Vec::new();
    for top in hierarchy.children(parent) {
        stack.push(Frame::new(hierarchy, top, 1, levels));
        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.pending.next() {
                let level = frame.level + 1;
                stack.push(Frame::new(hierarchy, child, level, levels));
                continue;
            }
            let Some(done) = stack.pop() else { break };
            let container = TypeContainer {
                type_definition: done.node.view(include_property_definitions),
                children: done.built,
            };
            match stack.last_mut() {
                Some(outer) => outer.built.push(container),
                None => forest.push(container),
            }
        }
    }
    forest
}
