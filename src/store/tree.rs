//! In-memory folder tree index: traversal and the cycle guard.
//!
//! Built from a full folder scan, so traversal never trusts the stored data
//! to be acyclic: every walk carries a visited set and surfaces
//! [`StoreError::CorruptTree`] instead of looping on malformed input.

use crate::domain::{Folder, ROOT_FOLDER_ID};
use crate::store::{StoreError, StoreResult};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One step of a breadcrumb path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathEntry {
    pub id: i64,
    pub name: String,
}

/// Adjacency index over a snapshot of the folder table.
#[derive(Debug)]
pub struct FolderTree {
    nodes: HashMap<i64, Node>,
    children: HashMap<i64, Vec<i64>>,
}

#[derive(Debug)]
struct Node {
    name: String,
    parent_id: i64,
}

impl FolderTree {
    /// Builds the index from a folder snapshot.
    ///
    /// The root's self-referential parent is a sentinel and is not recorded
    /// as a child edge.
    pub fn new(folders: &[Folder]) -> Self {
        let mut nodes = HashMap::with_capacity(folders.len());
        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();

        for folder in folders {
            nodes.insert(
                folder.id,
                Node {
                    name: folder.name.clone(),
                    parent_id: folder.parent_id,
                },
            );
            if folder.id != folder.parent_id {
                children.entry(folder.parent_id).or_default().push(folder.id);
            }
        }

        // Deterministic child ordering regardless of scan order
        for ids in children.values_mut() {
            ids.sort_unstable();
        }

        Self { nodes, children }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn name(&self, id: i64) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: i64) -> Option<i64> {
        self.nodes.get(&id).map(|n| n.parent_id)
    }

    /// Direct children of a folder, ascending by id.
    pub fn children(&self, id: i64) -> &[i64] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Finds a direct child by exact name match.
    pub fn child_named(&self, parent_id: i64, name: &str) -> Option<i64> {
        self.children(parent_id)
            .iter()
            .copied()
            .find(|&id| self.name(id) == Some(name))
    }

    /// The folder plus all folders transitively parented by it.
    ///
    /// Guarded against malformed data: revisiting a folder aborts with
    /// `CorruptTree` instead of expanding forever.
    pub fn descendants(&self, id: i64) -> StoreResult<Vec<i64>> {
        if !self.contains(id) {
            return Err(StoreError::FolderNotFound { id });
        }

        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = vec![id];

        while let Some(current) = queue.pop() {
            if !visited.insert(current) {
                return Err(StoreError::CorruptTree(format!(
                    "cycle detected while expanding folder {id} (revisited {current})"
                )));
            }
            result.push(current);
            queue.extend_from_slice(self.children(current));
        }

        Ok(result)
    }

    /// Breadcrumb path from the root to the folder, root first.
    ///
    /// Ascends via `parent_id`, stopping at the root; a revisited id or a
    /// dangling parent reference yields `CorruptTree`.
    pub fn ancestors(&self, id: i64) -> StoreResult<Vec<PathEntry>> {
        if !self.contains(id) {
            return Err(StoreError::FolderNotFound { id });
        }

        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current = id;

        loop {
            if !visited.insert(current) {
                return Err(StoreError::CorruptTree(format!(
                    "cycle detected while resolving the path of folder {id} (revisited {current})"
                )));
            }
            let node = self.nodes.get(&current).ok_or_else(|| {
                StoreError::CorruptTree(format!(
                    "folder {id} has a dangling ancestor reference to {current}"
                ))
            })?;
            path.push(PathEntry {
                id: current,
                name: node.name.clone(),
            });
            if current == ROOT_FOLDER_ID {
                break;
            }
            current = node.parent_id;
        }

        path.reverse();
        Ok(path)
    }

    /// Whether reparenting `source` under `target` would make `source` an
    /// ancestor of itself.
    pub fn would_cycle(&self, source: i64, target: i64) -> StoreResult<bool> {
        if source == target {
            return Ok(true);
        }
        Ok(self.descendants(source)?.contains(&target))
    }
}
