//! # Tree Index
//!
//! The navigation hierarchy of a theme is stored separately from the page rows,
//! as an ordered forest of file names. It drives navigation menus and cascade
//! deletes.
//!
//! ## Persisted Form
//!
//! The index persists as a nested JSON object, one per theme:
//!
//! ```text
//! {
//!   "about": {},
//!   "products": {
//!     "widgets": {},
//!     "gadgets": { "gadget-pro": {} }
//!   }
//! }
//! ```
//!
//! Leaves are written as `{}`; `null`, `[]` and `""` are accepted as leaves on
//! read. Key order is page order.
//!
//! ## Cycles
//!
//! An owned tree cannot loop, but the persisted form is keyed by name, so a
//! page can show up again below itself (`{"a": {"b": {"a": {}}}}`) or under two
//! parents (`{"a": {"x": {}}, "b": {"x": {}}}`). Name-based lookups over such
//! an index would resolve to the wrong node, so it is rejected on load: a name
//! below itself with [`PagesError::TreeCycle`], any other repeat with
//! [`PagesError::DuplicateTreeEntry`].
//!
//! ## Search Policy
//!
//! Lookups are depth-first, pre-order, first match wins.

use crate::error::{PagesError, Result};
use crate::store::TreeStore;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub file_name: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(file_name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            file_name: file_name.into(),
            children,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeIndex {
    roots: Vec<TreeNode>,
}

impl TreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roots(roots: Vec<TreeNode>) -> Result<Self> {
        let index = Self { roots };
        index.validate()?;
        Ok(index)
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Rejects indexes where a file name appears more than once.
    pub fn validate(&self) -> Result<()> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::new();
        for root in &self.roots {
            check_entries(root, &mut ancestors, &mut seen)?;
        }
        Ok(())
    }

    /// First node with this file name, depth-first.
    pub fn find(&self, file_name: &str) -> Option<&TreeNode> {
        let mut stack: Vec<&TreeNode> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.file_name == file_name {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Children of the first matching node; empty for leaves and unknown names.
    pub fn find_subtree(&self, file_name: &str) -> &[TreeNode] {
        self.find(file_name)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.find(file_name).is_some()
    }

    /// Every file name below `file_name`, depth-first, excluding the node itself.
    pub fn descendants(&self, file_name: &str) -> Vec<String> {
        let mut result = Vec::new();
        let mut stack: Vec<&TreeNode> = self.find_subtree(file_name).iter().rev().collect();
        while let Some(node) = stack.pop() {
            result.push(node.file_name.clone());
            stack.extend(node.children.iter().rev());
        }
        result
    }

    /// All file names, depth-first.
    pub fn file_names(&self) -> Vec<String> {
        let mut result = Vec::new();
        let mut stack: Vec<&TreeNode> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            result.push(node.file_name.clone());
            stack.extend(node.children.iter().rev());
        }
        result
    }

    /// Appends a page as the last child of `parent`, or as the last top-level
    /// entry when the parent is absent or unknown.
    ///
    /// Returns `false` when the page is already indexed.
    pub fn append(&mut self, file_name: &str, parent: Option<&str>) -> Result<bool> {
        if parent == Some(file_name) {
            return Err(PagesError::TreeCycle(file_name.to_string()));
        }
        if self.contains(file_name) {
            return Ok(false);
        }

        let leaf = TreeNode::leaf(file_name);
        match parent.and_then(|p| find_mut(&mut self.roots, p)) {
            Some(parent_node) => parent_node.children.push(leaf),
            None => self.roots.push(leaf),
        }
        Ok(true)
    }

    /// Detaches the first matching node together with its whole subtree.
    pub fn remove_subtree(&mut self, file_name: &str) -> Option<TreeNode> {
        remove_from(&mut self.roots, file_name)
    }

    /// Removes every node for which `keep` is false, lifting its children into
    /// its place. Returns the removed file names.
    pub fn prune<F>(&mut self, keep: F) -> Vec<String>
    where
        F: Fn(&str) -> bool + Copy,
    {
        let mut removed = Vec::new();
        self.roots = prune_level(std::mem::take(&mut self.roots), keep, &mut removed);
        removed
    }
}

fn check_entries<'a>(
    node: &'a TreeNode,
    ancestors: &mut Vec<&'a str>,
    seen: &mut HashSet<&'a str>,
) -> Result<()> {
    if ancestors.contains(&node.file_name.as_str()) {
        return Err(PagesError::TreeCycle(node.file_name.clone()));
    }
    if !seen.insert(&node.file_name) {
        return Err(PagesError::DuplicateTreeEntry(node.file_name.clone()));
    }
    ancestors.push(&node.file_name);
    for child in &node.children {
        check_entries(child, ancestors, seen)?;
    }
    ancestors.pop();
    Ok(())
}

fn find_mut<'a>(nodes: &'a mut [TreeNode], file_name: &str) -> Option<&'a mut TreeNode> {
    for node in nodes.iter_mut() {
        if node.file_name == file_name {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, file_name) {
            return Some(found);
        }
    }
    None
}

fn remove_from(nodes: &mut Vec<TreeNode>, file_name: &str) -> Option<TreeNode> {
    for i in 0..nodes.len() {
        if nodes[i].file_name == file_name {
            return Some(nodes.remove(i));
        }
        if let Some(found) = remove_from(&mut nodes[i].children, file_name) {
            return Some(found);
        }
    }
    None
}

fn prune_level<F>(nodes: Vec<TreeNode>, keep: F, removed: &mut Vec<String>) -> Vec<TreeNode>
where
    F: Fn(&str) -> bool + Copy,
{
    let mut kept = Vec::with_capacity(nodes.len());
    for node in nodes {
        let children = prune_level(node.children, keep, removed);
        if keep(&node.file_name) {
            kept.push(TreeNode::with_children(node.file_name, children));
        } else {
            removed.push(node.file_name);
            kept.extend(children);
        }
    }
    kept
}

fn nodes_to_map(nodes: &[TreeNode]) -> Map<String, Value> {
    nodes
        .iter()
        .map(|node| {
            (
                node.file_name.clone(),
                Value::Object(nodes_to_map(&node.children)),
            )
        })
        .collect()
}

fn nodes_from_map(map: Map<String, Value>) -> std::result::Result<Vec<TreeNode>, String> {
    let mut nodes = Vec::with_capacity(map.len());
    for (file_name, value) in map {
        let children = match value {
            Value::Object(children) => nodes_from_map(children)?,
            Value::Null => Vec::new(),
            Value::Array(items) if items.is_empty() => Vec::new(),
            Value::String(s) if s.is_empty() => Vec::new(),
            other => {
                return Err(format!(
                    "tree entry {} must be an object, got {}",
                    file_name, other
                ))
            }
        };
        nodes.push(TreeNode::with_children(file_name, children));
    }
    Ok(nodes)
}

impl Serialize for TreeIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let map = nodes_to_map(&self.roots);
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (key, value) in &map {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

impl<'de> Deserialize<'de> for TreeIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let roots = match Value::deserialize(deserializer)? {
            Value::Null => Vec::new(),
            Value::Object(map) => nodes_from_map(map).map_err(D::Error::custom)?,
            other => {
                return Err(D::Error::custom(format!(
                    "tree index must be an object, got {}",
                    other
                )))
            }
        };
        Ok(TreeIndex { roots })
    }
}

/// Tree Index operations bound to one theme's persisted index.
pub struct PageList<'a, S: TreeStore + ?Sized> {
    store: &'a mut S,
    theme: &'a str,
}

impl<'a, S: TreeStore + ?Sized> PageList<'a, S> {
    pub fn new(store: &'a mut S, theme: &'a str) -> Self {
        Self { store, theme }
    }

    pub fn load_config(&self) -> Result<TreeIndex> {
        let tree = self.store.load_tree(self.theme)?;
        tree.validate()?;
        Ok(tree)
    }

    /// Adds a page to the index; a page already present is left where it is.
    pub fn append_page(&mut self, file_name: &str, parent: Option<&str>) -> Result<()> {
        let mut tree = self.load_config()?;
        if tree.append(file_name, parent)? {
            tracing::debug!(theme = self.theme, file_name, ?parent, "appended page to tree");
            self.store.save_tree(self.theme, &tree)?;
        }
        Ok(())
    }

    /// Drops a page and all its descendants from the index.
    pub fn remove_subtree(&mut self, file_name: &str) -> Result<Option<TreeNode>> {
        let mut tree = self.load_config()?;
        let removed = tree.remove_subtree(file_name);
        if removed.is_some() {
            tracing::debug!(theme = self.theme, file_name, "removed subtree from tree");
            self.store.save_tree(self.theme, &tree)?;
        }
        Ok(removed)
    }
}
