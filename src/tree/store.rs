//! Mutable, per-document owner of one [`TreeState`].
//!
//! Every call is synchronous and in-memory. Calls that would step outside the
//! tree (past a leaf, above the root, onto a stale path) are no-ops or clamp
//! to the nearest valid node; only parse failures and illegal moves are
//! reported as errors.

use cozy_chess::{Board, Move};
use log::{debug, warn};

use crate::board::cozy;
use crate::error::{Error, Result};
use crate::tree::model::{GameTree, InsertPolicy, TreeStats};
use crate::tree::node::{Annotation, GameNode, NodeId, Shape};
use crate::tree::path::Path;
use crate::tree::state::{GameHeaders, TreeState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOptions {
    /// Advance `position` to the played node.
    pub change_position: bool,
    /// Write the `Result` tag when the move ends the game.
    pub change_headers: bool,
    pub policy: InsertPolicy,
}

impl Default for MoveOptions {
    fn default() -> Self { Self { change_position: true, change_headers: true, policy: InsertPolicy::Variation } }
}

impl MoveOptions {
    /// Records the move without navigating to it.
    pub fn stay() -> Self { Self { change_position: false, ..Self::default() } }
}

#[derive(Clone, Debug, Default)]
pub struct TreeStore {
    state: TreeState,
    dirty: bool,
}

impl TreeStore {
    pub fn new() -> Self { Self::default() }

    /// Seeds a store from a parsed game or a restored session; starts clean.
    pub fn from_state(state: TreeState) -> Self {
        let mut store = Self { state, dirty: false };
        store.clamp_position();
        store
    }

    pub fn state(&self) -> &TreeState { &self.state }
    pub fn into_state(self) -> TreeState { self.state }
    pub fn position(&self) -> &Path { &self.state.position }
    pub fn headers(&self) -> &GameHeaders { &self.state.headers }
    pub fn is_dirty(&self) -> bool { self.dirty }
    pub fn stats(&self) -> TreeStats { self.state.tree.stats() }
    pub fn tree(&self) -> &GameTree { &self.state.tree }

    pub fn root(&self) -> &GameNode { self.state.tree.root_node() }

    pub fn current_node(&self) -> &GameNode {
        let (id, _) = self.state.tree.locate_clamped(&self.state.position);
        &self.state.tree[id]
    }

    /// Rules-library board for the current node.
    pub fn current_board(&self) -> Result<Board> { cozy::board_from_fen(&self.current_node().fen) }

    /// Resets `position` to its longest valid prefix and returns the node there.
    fn clamp_position(&mut self) -> NodeId {
        let (id, valid) = self.state.tree.locate_clamped(&self.state.position);
        if valid != self.state.position {
            warn!("position {} not found, clamped to {}", self.state.position, valid);
            self.state.position = valid;
        }
        id
    }

    pub fn reset(&mut self) {
        self.state = TreeState::default();
        self.dirty = false;
    }

    pub fn set_state(&mut self, state: TreeState) {
        self.state = state;
        self.clamp_position();
        self.dirty = false;
    }

    /// Replaces the tree with a lone root at `fen`; other headers are kept.
    pub fn set_start_fen(&mut self, fen: &str) -> Result<()> {
        let fresh = TreeState::from_fen(fen)?;
        let mut headers = std::mem::take(&mut self.state.headers);
        headers.remove("FEN");
        headers.remove("SetUp");
        for tag in ["FEN", "SetUp"] {
            if let Some(v) = fresh.headers.get(tag) { headers.set(tag, v); }
        }
        self.state = TreeState { headers, ..fresh };
        self.dirty = true;
        Ok(())
    }

    pub fn save(&mut self) { self.dirty = false; }

    /// Plays `mv` (legal in the current node's position) below the current
    /// node, reusing an existing child reached by the same move. Returns the
    /// path of the played node.
    pub fn make_move(&mut self, mv: Move, opts: MoveOptions) -> Result<Path> {
        let at = self.clamp_position();
        let board = cozy::board_from_fen(&self.state.tree[at].fen)?;
        if !board.is_legal(mv) {
            return Err(Error::IllegalMove { uci: cozy::uci(&board, mv), fen: cozy::fen(&board) });
        }
        let idx = self.insert(at, &board, mv, opts.policy, opts.change_headers);
        let played = self.state.position.child(idx);
        if opts.change_position { self.state.position = played.clone(); }
        self.dirty = true;
        Ok(played)
    }

    /// [`make_move`](Self::make_move) from standard UCI text.
    pub fn make_move_uci(&mut self, uci: &str, opts: MoveOptions) -> Result<Path> {
        let board = self.current_board()?;
        let mv = cozy::parse_uci(&board, uci)?;
        self.make_move(mv, opts)
    }

    /// Plays a UCI sequence from the current node, each move from the previous
    /// result, and moves `position` to the last one. The whole sequence is
    /// checked before the tree is touched.
    pub fn make_moves<S: AsRef<str>>(&mut self, moves: &[S], policy: InsertPolicy, change_headers: bool) -> Result<Path> {
        let at = self.clamp_position();
        let mut board = cozy::board_from_fen(&self.state.tree[at].fen)?;
        let mut parsed = Vec::with_capacity(moves.len());
        for m in moves {
            let mv = cozy::parse_uci(&board, m.as_ref())?;
            parsed.push((board.clone(), mv));
            board.play(mv);
        }
        if parsed.is_empty() { return Ok(self.state.position.clone()); }

        let mut cur = at;
        for (board, mv) in &parsed {
            let idx = self.insert(cur, board, *mv, policy, change_headers);
            cur = self.state.tree[cur].children[idx];
            self.state.position.push(idx);
        }
        self.dirty = true;
        Ok(self.state.position.clone())
    }

    fn insert(&mut self, parent: NodeId, board: &Board, mv: Move, policy: InsertPolicy, change_headers: bool) -> usize {
        let uci = cozy::uci(board, mv);
        let mut child = board.clone();
        child.play(mv);
        if change_headers {
            if let Some(result) = cozy::result_token(&child) { self.state.headers.set("Result", result); }
        }
        if let Some(i) = self.state.tree.find_child(parent, &uci) {
            debug!("reuse existing child {uci} at index {i}");
            return i;
        }
        let san = cozy::san(board, mv);
        debug!("new node {san} ({uci}) {policy:?}");
        self.state.tree.append_child(parent, uci, san, cozy::fen(&child), policy)
    }

    /// Navigates to `path`; a path that does not resolve lands on its longest
    /// valid prefix. Never marks the store dirty.
    pub fn go_to_move(&mut self, path: &Path) {
        self.state.position = path.clone();
        self.clamp_position();
    }

    pub fn go_to_start(&mut self) { self.state.position = Path::root(); }

    pub fn go_to_next(&mut self) {
        let at = self.clamp_position();
        if !self.state.tree[at].children.is_empty() { self.state.position.push(0); }
    }

    pub fn go_to_previous(&mut self) {
        self.clamp_position();
        self.state.position.pop();
    }

    /// Main-line leaf below the current node.
    pub fn go_to_end(&mut self) {
        self.clamp_position();
        if let Ok(end) = self.state.tree.mainline_end(&self.state.position) { self.state.position = end; }
    }

    /// Up to the nearest ancestor where the line forks, or the root.
    pub fn go_to_branch_start(&mut self) {
        let mut id = self.clamp_position();
        let tree = &self.state.tree;
        while let Some(parent) = tree[id].parent() {
            self.state.position.pop();
            id = parent;
            if tree[id].children.len() > 1 { break; }
        }
    }

    /// Down the main line to the next fork or the leaf.
    pub fn go_to_branch_end(&mut self) {
        let mut id = self.clamp_position();
        let tree = &self.state.tree;
        while let Some(&next) = tree[id].children.first() {
            self.state.position.push(0);
            id = next;
            if tree[id].children.len() > 1 { break; }
        }
    }

    pub fn next_branch(&mut self) { self.cycle_branch(true); }
    pub fn previous_branch(&mut self) { self.cycle_branch(false); }

    /// Switches to the sibling variation at the deepest fork above the
    /// current node.
    fn cycle_branch(&mut self, forward: bool) {
        self.clamp_position();
        let tree = &self.state.tree;
        let indices = self.state.position.indices().to_vec();
        let mut parent = tree.root();
        let mut fork = None;
        for (depth, &i) in indices.iter().enumerate() {
            let n = tree[parent].children.len();
            if n > 1 { fork = Some((depth, i, n)); }
            parent = tree[parent].children[i];
        }
        if let Some((depth, i, n)) = fork {
            let j = if forward { (i + 1) % n } else { (i + n - 1) % n };
            let mut p = Path::from(&indices[..depth]);
            p.push(j);
            self.state.position = p;
        }
    }

    /// Removes the node at `path` and its subtree. A `position` inside the
    /// removed subtree moves to its parent; one on a later sibling line is
    /// re-indexed. Deleting the root or a missing path does nothing.
    pub fn delete_move(&mut self, path: &Path) {
        let (id, parent_path) = match (self.state.tree.locate(path), path.parent()) {
            (Ok(id), Some(pp)) => (id, pp),
            (Err(e), _) => { warn!("delete_move: {e}"); return; }
            _ => return,
        };
        let removed = self.state.tree.remove_subtree(id);
        debug!("deleted {removed} nodes at {path}");

        let depth = parent_path.len();
        let pos = &self.state.position;
        if pos.starts_with(path) {
            self.state.position = parent_path;
        } else if pos.len() > depth && pos.starts_with(&parent_path) && pos.indices()[depth] > path.indices()[depth] {
            let mut v = pos.indices().to_vec();
            v[depth] -= 1;
            self.state.position = Path::from(v);
        }
        self.clamp_position();
        self.dirty = true;
    }

    fn reorder(&mut self, path: &Path, op: fn(&mut GameTree, NodeId) -> bool) {
        let target = match self.state.tree.locate(path) {
            Ok(id) => id,
            Err(e) => { warn!("{e}"); return; }
        };
        let current = self.clamp_position();
        if op(&mut self.state.tree, target) {
            self.state.position = self.state.tree.path_of(current);
            self.dirty = true;
        }
    }

    pub fn promote_variation(&mut self, path: &Path) {
        self.reorder(path, GameTree::promote_variation);
    }

    pub fn promote_to_mainline(&mut self, path: &Path) {
        self.reorder(path, GameTree::promote_to_mainline);
    }

    fn current_mut(&mut self) -> &mut GameNode {
        let id = self.clamp_position();
        self.dirty = true;
        &mut self.state.tree[id]
    }

    /// Sets the glyph on the current node; setting the glyph already there
    /// clears it, as does `None`.
    pub fn set_annotation(&mut self, annotation: Option<Annotation>) {
        let node = self.current_mut();
        node.annotation = match (node.annotation, annotation) {
            (Some(cur), Some(new)) if cur == new => None,
            (_, new) => new,
        };
    }

    pub fn set_comment(&mut self, comment: &str) {
        let node = self.current_mut();
        let trimmed = comment.trim();
        node.comment = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
    }

    pub fn set_shapes(&mut self, shapes: Vec<Shape>) { self.current_mut().shapes = shapes; }

    /// Adds `shape`, or removes it if an identical one is already drawn.
    pub fn toggle_shape(&mut self, shape: Shape) {
        let node = self.current_mut();
        if let Some(i) = node.shapes.iter().position(|s| *s == shape) {
            node.shapes.remove(i);
        } else {
            node.shapes.push(shape);
        }
    }

    pub fn clear_shapes(&mut self) { self.current_mut().shapes.clear(); }

    pub fn set_headers(&mut self, headers: GameHeaders) {
        self.state.headers = headers;
        self.dirty = true;
    }
}
