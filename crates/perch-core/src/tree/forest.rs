//! Ordered forest of tree nodes and the operations the editors run on it.
//!
//! All searches are depth-first and pre-order: a node is checked before its
//! children, and its children before its next sibling. A search stops at the
//! first match or when the forest is exhausted.

use super::changes::ForestChange;
use super::node::TreeNode;
use crate::config::AppConfig;
use crate::{PerchError, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Where to put a new node relative to the selected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Before,
    After,
}

/// Where an insert relative to a selection actually landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPlacement {
    /// Next to the selected node, in its sibling collection.
    Adjacent,
    /// The selection could not be resolved; the node went to the end of the root.
    AppendedToRoot,
}

/// The ordered top-level collection of one tree kind.
#[derive(Debug, Clone)]
pub struct Forest<T: TreeNode> {
    nodes: Vec<T>,
    changes: Vec<ForestChange>,
}

impl<T: TreeNode> Default for Forest<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: TreeNode + PartialEq> PartialEq for Forest<T> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl<T: TreeNode> From<Vec<T>> for Forest<T> {
    fn from(nodes: Vec<T>) -> Self {
        Self::new(nodes)
    }
}

impl<T: TreeNode> Forest<T> {
    pub fn new(nodes: Vec<T>) -> Self {
        Self {
            nodes,
            changes: Vec::new(),
        }
    }

    /// Root nodes in order.
    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<T> {
        self.nodes
    }

    /// True when there are no root nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(|_, _| count += 1);
        count
    }

    /// Visit every node depth-first with its depth (roots are depth 0).
    pub fn walk<F: FnMut(&T, usize)>(&self, mut visit: F) {
        walk_nodes(&self.nodes, 0, &mut visit);
    }

    // ========================================
    // Lookup
    // ========================================

    pub fn find_by_id(&self, id: &str) -> Option<&T> {
        find_in(&self.nodes, id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut T> {
        find_in_mut(&mut self.nodes, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Every node matching `predicate`, at any depth, sorted by title (ordinal).
    pub fn find_by_predicate<P: Fn(&T) -> bool>(&self, predicate: P) -> Vec<&T> {
        let mut found = Vec::new();
        collect_in(&self.nodes, &predicate, &mut found);
        found.sort_by(|a, b| a.title().cmp(b.title()));
        found
    }

    /// Whether the node has a non-empty child collection.
    ///
    /// Editors ask this before deleting so they can confirm the cascade.
    pub fn has_children(&self, id: &str) -> bool {
        self.find_by_id(id)
            .and_then(|node| node.children())
            .is_some_and(|children| !children.is_empty())
    }

    /// First node still carrying the untitled sentinel (case-insensitive).
    pub fn find_untitled(&self) -> Option<&T> {
        self.find_by_predicate(|node| is_untitled(node.title()))
            .into_iter()
            .next()
    }

    /// Refuse to go on while some node is still untitled.
    pub fn validate_no_untitled(&self) -> Result<()> {
        match self.find_untitled() {
            Some(node) => {
                debug!("Untitled node {} blocks creation", node.item_id());
                Err(PerchError::UntitledExists {
                    title: node.title().to_string(),
                })
            }
            None => Ok(()),
        }
    }

    /// Ids that occur more than once, sorted.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        self.walk(|node, _| {
            *counts.entry(node.item_id().to_string()).or_default() += 1;
        });
        let mut duplicates: Vec<String> = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id)
            .collect();
        duplicates.sort();
        duplicates
    }

    // ========================================
    // Mutation
    // ========================================

    /// Remove the node with `id` from its parent collection, taking its subtree with it.
    pub fn remove_by_id(&mut self, id: &str) -> Option<T> {
        let removed = remove_in(&mut self.nodes, id);
        if removed.is_some() {
            self.changes.push(ForestChange::Removed { id: id.to_string() });
        } else {
            debug!("Remove: no node with id {}", id);
        }
        removed
    }

    /// Insert `node` next to `selected_id`, or append it to the root when the
    /// selection is absent or cannot be found.
    pub fn insert_relative_to_selected(
        &mut self,
        selected_id: Option<&str>,
        node: T,
        position: InsertPosition,
    ) -> InsertPlacement {
        let id = node.item_id().to_string();
        let placement = match selected_id {
            Some(selected) => match insert_relative_in(&mut self.nodes, selected, node, position) {
                Ok(()) => InsertPlacement::Adjacent,
                Err(node) => {
                    debug!("Selected node {} not found, appending to root", selected);
                    self.nodes.push(node);
                    InsertPlacement::AppendedToRoot
                }
            },
            None => {
                self.nodes.push(node);
                InsertPlacement::AppendedToRoot
            }
        };
        self.changes.push(ForestChange::Inserted { id });
        placement
    }

    /// The editor's "New" action: reject while an untitled node exists, then insert.
    pub fn create_untitled(
        &mut self,
        selected_id: Option<&str>,
        node: T,
        position: InsertPosition,
    ) -> Result<InsertPlacement> {
        self.validate_no_untitled()?;
        Ok(self.insert_relative_to_selected(selected_id, node, position))
    }

    /// Insert a node the user is adding. A node titled with the untitled
    /// sentinel goes through [`Forest::create_untitled`], so at most one exists.
    pub fn add(
        &mut self,
        selected_id: Option<&str>,
        node: T,
        position: InsertPosition,
    ) -> Result<InsertPlacement> {
        if is_untitled(node.title()) {
            self.create_untitled(selected_id, node, position)
        } else {
            Ok(self.insert_relative_to_selected(selected_id, node, position))
        }
    }

    /// Insert `node` at `index` under `parent_id` (`None` = root).
    ///
    /// The index is clamped to the length of the target collection.
    pub fn insert_at(&mut self, parent_id: Option<&str>, index: usize, node: T) -> Result<()> {
        let id = node.item_id().to_string();
        place_in(&mut self.nodes, parent_id, index, node).map_err(|(err, _)| err)?;
        self.changes.push(ForestChange::Inserted { id });
        Ok(())
    }

    /// Move a node (with its subtree) to `index` under `parent_id` (`None` = root).
    ///
    /// `index` refers to the target collection after the node has been taken
    /// out. The move is all-or-nothing: on failure the forest is unchanged.
    pub fn move_node(&mut self, id: &str, parent_id: Option<&str>, index: usize) -> Result<()> {
        let node = self.find_by_id(id).ok_or_else(|| PerchError::NodeNotFound {
            id: id.to_string(),
        })?;

        if let Some(parent) = parent_id {
            let into_self = parent == id
                || node
                    .children()
                    .is_some_and(|children| find_in(children, parent).is_some());
            if into_self {
                return Err(PerchError::InvalidMove {
                    message: format!("cannot move {} into itself or its descendants", id),
                });
            }
        }

        let (origin_parent, origin_index) =
            locate_in(&self.nodes, id, None).ok_or_else(|| PerchError::NodeNotFound {
                id: id.to_string(),
            })?;
        let node = remove_in(&mut self.nodes, id).ok_or_else(|| PerchError::NodeNotFound {
            id: id.to_string(),
        })?;

        if let Err((err, node)) = place_in(&mut self.nodes, parent_id, index, node) {
            if place_in(&mut self.nodes, origin_parent.as_deref(), origin_index, node).is_err() {
                warn!("Failed to restore node {} after rejected move", id);
            }
            return Err(err);
        }

        self.changes.push(ForestChange::Moved { id: id.to_string() });
        Ok(())
    }

    /// Apply `edit` to the node with `id`. Returns false if there is no such node.
    pub fn update<F: FnOnce(&mut T)>(&mut self, id: &str, edit: F) -> bool {
        match find_in_mut(&mut self.nodes, id) {
            Some(node) => {
                edit(node);
                self.changes.push(ForestChange::Updated { id: id.to_string() });
                true
            }
            None => false,
        }
    }

    /// Rename a node; shorthand for [`Forest::update`].
    pub fn rename(&mut self, id: &str, title: impl Into<String>) -> bool {
        let title = title.into();
        self.update(id, |node| node.set_title(title))
    }

    /// Swap in a whole new set of roots (import).
    pub fn replace_all(&mut self, nodes: Vec<T>) {
        self.nodes = nodes;
        self.changes.push(ForestChange::Replaced);
    }

    /// Take the changes recorded since the last drain.
    pub fn drain_changes(&mut self) -> Vec<ForestChange> {
        std::mem::take(&mut self.changes)
    }
}

fn is_untitled(title: &str) -> bool {
    title.trim().eq_ignore_ascii_case(AppConfig::UNTITLED)
}

fn walk_nodes<T: TreeNode, F: FnMut(&T, usize)>(nodes: &[T], depth: usize, visit: &mut F) {
    for node in nodes {
        visit(node, depth);
        if let Some(children) = node.children() {
            walk_nodes(children, depth + 1, visit);
        }
    }
}

fn find_in<'a, T: TreeNode>(nodes: &'a [T], id: &str) -> Option<&'a T> {
    for node in nodes {
        if node.item_id() == id {
            return Some(node);
        }
        if let Some(found) = node.children().and_then(|children| find_in(children, id)) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a, T: TreeNode>(nodes: &'a mut [T], id: &str) -> Option<&'a mut T> {
    for node in nodes.iter_mut() {
        if node.item_id() == id {
            return Some(node);
        }
        if let Some(children) = node.children_mut() {
            if let Some(found) = find_in_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn collect_in<'a, T: TreeNode, P: Fn(&T) -> bool>(
    nodes: &'a [T],
    predicate: &P,
    found: &mut Vec<&'a T>,
) {
    for node in nodes {
        if predicate(node) {
            found.push(node);
        }
        if let Some(children) = node.children() {
            collect_in(children, predicate, found);
        }
    }
}

fn remove_in<T: TreeNode>(nodes: &mut Vec<T>, id: &str) -> Option<T> {
    for i in 0..nodes.len() {
        if nodes[i].item_id() == id {
            return Some(nodes.remove(i));
        }
        if let Some(children) = nodes[i].children_mut() {
            if let Some(removed) = remove_in(children, id) {
                return Some(removed);
            }
        }
    }
    None
}

/// Hands `node` back when `selected` is not in this subtree.
fn insert_relative_in<T: TreeNode>(
    nodes: &mut Vec<T>,
    selected: &str,
    mut node: T,
    position: InsertPosition,
) -> std::result::Result<(), T> {
    for i in 0..nodes.len() {
        if nodes[i].item_id() == selected {
            let at = match position {
                InsertPosition::Before => i,
                InsertPosition::After => i + 1,
            };
            nodes.insert(at, node);
            return Ok(());
        }
        if let Some(children) = nodes[i].children_mut() {
            match insert_relative_in(children, selected, node, position) {
                Ok(()) => return Ok(()),
                Err(back) => node = back,
            }
        }
    }
    Err(node)
}

/// Parent id (`None` = root) and index of the node with `id`.
fn locate_in<T: TreeNode>(
    nodes: &[T],
    id: &str,
    parent: Option<&str>,
) -> Option<(Option<String>, usize)> {
    for (i, node) in nodes.iter().enumerate() {
        if node.item_id() == id {
            return Some((parent.map(str::to_string), i));
        }
        if let Some(children) = node.children() {
            if let Some(found) = locate_in(children, id, Some(node.item_id())) {
                return Some(found);
            }
        }
    }
    None
}

fn place_in<T: TreeNode>(
    nodes: &mut Vec<T>,
    parent_id: Option<&str>,
    index: usize,
    node: T,
) -> std::result::Result<(), (PerchError, T)> {
    let target = match parent_id {
        None => nodes,
        Some(parent) => match find_in_mut(nodes, parent) {
            None => {
                return Err((
                    PerchError::NodeNotFound {
                        id: parent.to_string(),
                    },
                    node,
                ))
            }
            Some(parent_node) => match parent_node.children_mut() {
                Some(children) => children,
                None => {
                    return Err((
                        PerchError::InvalidMove {
                            message: format!("{} cannot hold child items", parent),
                        },
                        node,
                    ))
                }
            },
        },
    };
    let at = index.min(target.len());
    target.insert(at, node);
    Ok(())
}
