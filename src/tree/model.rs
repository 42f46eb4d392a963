//! Arena-backed game tree.
//!
//! Nodes live in a slot vector and refer to each other by [`NodeId`];
//! children order is significant (index 0 is the main line). Removed
//! subtrees free their slots for reuse, so a `NodeId` is only meaningful
//! while its node is in the tree. Anything held across edits should be a
//! [`Path`].

use std::collections::HashSet;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tree::node::{GameNode, NodeId};
use crate::tree::path::Path;

/// Where a new child lands among its siblings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertPolicy {
    /// Splice at index 0, shifting the existing main line to index 1.
    Mainline,
    /// Push after the existing children (index 0 when there are none).
    #[default]
    Variation,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Nodes including the root.
    pub total: usize,
    /// Leaf nodes, i.e. distinct lines.
    pub leaves: usize,
    /// Plies along the longest line.
    pub depth: usize,
}

/// Highest root ply a FEN can produce (full-move number is at most `u16::MAX`).
const MAX_ROOT_PLY: u32 = u16::MAX as u32 * 2 + 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameTree {
    slots: Vec<Option<GameNode>>,
    #[serde(default)]
    free: Vec<NodeId>,
    root: NodeId,
}

impl GameTree {
    pub(crate) fn with_root(root: GameNode) -> Self {
        Self { slots: vec![Some(root)], free: Vec::new(), root: NodeId(0) }
    }

    pub fn root(&self) -> NodeId { self.root }
    pub fn root_node(&self) -> &GameNode { &self[self.root] }

    pub fn get(&self, id: NodeId) -> Option<&GameNode> {
        self.slots.get(id.idx()).and_then(|s| s.as_ref())
    }

    /// Live node count.
    pub fn len(&self) -> usize { self.slots.len() - self.free.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    fn alloc(&mut self, node: GameNode) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.idx()] = Some(node);
            id
        } else {
            self.slots.push(Some(node));
            NodeId((self.slots.len() - 1) as u32)
        }
    }

    /// Walks `path` from the root.
    pub fn locate(&self, path: &Path) -> Result<NodeId> {
        let mut cur = self.root;
        for &i in path.indices() {
            cur = *self[cur].children.get(i).ok_or_else(|| Error::PathNotFound(path.clone()))?;
        }
        Ok(cur)
    }

    /// Longest prefix of `path` that still resolves, and the node it reaches.
    pub fn locate_clamped(&self, path: &Path) -> (NodeId, Path) {
        let mut cur = self.root;
        let mut valid = Path::root();
        for &i in path.indices() {
            match self[cur].children.get(i) {
                Some(&c) => { cur = c; valid.push(i); }
                None => break,
            }
        }
        (cur, valid)
    }

    pub fn node_at(&self, path: &Path) -> Result<&GameNode> {
        let id = self.locate(path)?;
        Ok(&self[id])
    }

    /// Recomputes the path of a live node from parent links.
    pub fn path_of(&self, id: NodeId) -> Path {
        let mut rev = Vec::new();
        let mut cur = id;
        while let Some(parent) = self[cur].parent {
            let idx = self[parent].children.iter().position(|&c| c == cur).unwrap_or(0);
            rev.push(idx);
            cur = parent;
        }
        rev.reverse();
        Path::from(rev)
    }

    /// Index among `parent`'s children of the child reached by `uci`.
    pub fn find_child(&self, parent: NodeId, uci: &str) -> Option<usize> {
        self[parent].children.iter().position(|&c| self[c].uci.as_deref() == Some(uci))
    }

    /// Creates the node for `uci` under `parent` and returns its child index.
    pub fn append_child(&mut self, parent: NodeId, uci: String, san: String, fen: String, policy: InsertPolicy) -> usize {
        let node = GameNode::child_of(parent, self[parent].half_moves, uci, san, fen);
        let id = self.alloc(node);
        let children = &mut self[parent].children;
        match policy {
            InsertPolicy::Mainline => { children.insert(0, id); 0 }
            InsertPolicy::Variation => { children.push(id); children.len() - 1 }
        }
    }

    /// Nodes along `children[0]` below `from`, excluding `from` itself.
    pub fn mainline(&self, from: NodeId) -> Mainline<'_> {
        Mainline { tree: self, cur: from }
    }

    /// Path of the main-line leaf reached from the node at `from`.
    pub fn mainline_end(&self, from: &Path) -> Result<Path> {
        let start = self.locate(from)?;
        let mut path = from.clone();
        for _ in self.mainline(start) { path.push(0); }
        Ok(path)
    }

    /// Detaches `id` from its parent and frees its whole subtree. Returns the
    /// number of nodes removed; the root cannot be removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        let parent = match self.get(id).and_then(|n| n.parent) {
            Some(p) => p,
            None => return 0,
        };
        self[parent].children.retain(|&c| c != id);
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.slots[cur.idx()].take() {
                stack.extend(node.children);
                self.free.push(cur);
                removed += 1;
            }
        }
        removed
    }

    /// Swaps `id` one slot toward the main line. False when already at index 0.
    pub fn promote_variation(&mut self, id: NodeId) -> bool {
        let parent = match self.get(id).and_then(|n| n.parent) {
            Some(p) => p,
            None => return false,
        };
        let children = &mut self[parent].children;
        match children.iter().position(|&c| c == id) {
            Some(i) if i > 0 => { children.swap(i - 1, i); true }
            _ => false,
        }
    }

    /// Moves every node from the root down to `id` to index 0 of its
    /// siblings, making `id` part of the main line.
    pub fn promote_to_mainline(&mut self, id: NodeId) -> bool {
        let mut changed = false;
        let mut cur = id;
        while let Some(parent) = self.get(cur).and_then(|n| n.parent) {
            let children = &mut self[parent].children;
            if let Some(i) = children.iter().position(|&c| c == cur) {
                if i > 0 {
                    let c = children.remove(i);
                    children.insert(0, c);
                    changed = true;
                }
            }
            cur = parent;
        }
        changed
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            stats.total += 1;
            let node = &self[id];
            if node.children.is_empty() {
                stats.leaves += 1;
                stats.depth = stats.depth.max(depth);
            }
            stack.extend(node.children.iter().map(|&c| (c, depth + 1)));
        }
        stats
    }

    /// Checks that parent/child links agree and reach only live slots, as
    /// required after loading a snapshot from outside.
    pub(crate) fn check_links(&self) -> std::result::Result<(), String> {
        let root = self.get(self.root).ok_or("root slot is empty")?;
        if root.parent.is_some() || root.uci.is_some() { return Err("root has a parent or a move".into()); }
        if root.half_moves > MAX_ROOT_PLY { return Err(format!("root ply {} out of range", root.half_moves)); }
        let mut seen = 0usize;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            seen += 1;
            if seen > self.slots.len() { return Err("cycle in children links".into()); }
            let node = self.get(id).ok_or_else(|| format!("dangling node {}", id.0))?;
            for &c in &node.children {
                let child = self.get(c).ok_or_else(|| format!("dangling child {}", c.0))?;
                if child.parent != Some(id) { return Err(format!("node {} has wrong parent link", c.0)); }
                if child.uci.is_none() { return Err(format!("node {} has no move", c.0)); }
                if child.half_moves != node.half_moves + 1 { return Err(format!("node {} has wrong ply", c.0)); }
                stack.push(c);
            }
        }
        let live = self.slots.iter().filter(|s| s.is_some()).count();
        if seen != live { return Err("unreachable nodes in arena".into()); }
        let mut free = HashSet::with_capacity(self.free.len());
        for &f in &self.free {
            if f.idx() >= self.slots.len() { return Err(format!("free slot {} out of range", f.0)); }
            if !free.insert(f) { return Err(format!("free slot {} listed twice", f.0)); }
            if self.slots[f.idx()].is_some() { return Err(format!("free slot {} holds a node", f.0)); }
        }
        if free.len() != self.slots.len() - live {
            return Err("free list does not match empty slots".into());
        }
        Ok(())
    }
}

impl Index<NodeId> for GameTree {
    type Output = GameNode;

    fn index(&self, id: NodeId) -> &GameNode {
        match self.slots[id.idx()].as_ref() {
            Some(n) => n,
            None => panic!("stale node id {}", id.0),
        }
    }
}

impl IndexMut<NodeId> for GameTree {
    fn index_mut(&mut self, id: NodeId) -> &mut GameNode {
        match self.slots[id.idx()].as_mut() {
            Some(n) => n,
            None => panic!("stale node id {}", id.0),
        }
    }
}

/// Lazy walk down `children[0]`; clone it to restart from the same node.
#[derive(Clone)]
pub struct Mainline<'a> {
    tree: &'a GameTree,
    cur: NodeId,
}

impl<'a> Iterator for Mainline<'a> {
    type Item = (NodeId, &'a GameNode);

    fn next(&mut self) -> Option<Self::Item> {
        let next = *self.tree[self.cur].children.first()?;
        self.cur = next;
        Some((next, &self.tree[next]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> GameTree {
        GameTree::with_root(GameNode::root("start".into(), 0))
    }

    fn add(t: &mut GameTree, parent: NodeId, mv: &str, policy: InsertPolicy) -> NodeId {
        let i = t.append_child(parent, mv.into(), mv.into(), format!("fen-{mv}"), policy);
        t[parent].children[i]
    }

    #[test]
    fn mainline_policy_splices_at_front() {
        let mut t = tree();
        let r = t.root();
        add(&mut t, r, "e2e4", InsertPolicy::Variation);
        add(&mut t, r, "d2d4", InsertPolicy::Mainline);
        add(&mut t, r, "c2c4", InsertPolicy::Variation);
        let ucis: Vec<_> = t[r].children.iter().map(|&c| t[c].uci.clone().unwrap()).collect();
        assert_eq!(ucis, vec!["d2d4", "e2e4", "c2c4"]);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut t = tree();
        let r = t.root();
        let a = add(&mut t, r, "e2e4", InsertPolicy::Variation);
        add(&mut t, a, "e7e5", InsertPolicy::Variation);
        assert_eq!(t.remove_subtree(a), 2);
        assert_eq!(t.len(), 1);
        add(&mut t, r, "d2d4", InsertPolicy::Variation);
        assert_eq!(t.len(), 2);
        assert!(t.check_links().is_ok());
    }
}
