use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::board::cozy;
use crate::board::START_FEN;
use crate::error::{Error, Result};
use crate::tree::model::GameTree;
use crate::tree::node::GameNode;
use crate::tree::path::Path;

/// PGN tag pairs, one set per game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameHeaders(BTreeMap<String, String>);

const SEVEN_TAG_ROSTER: [(&str, &str); 7] = [
    ("Event", "?"),
    ("Site", "?"),
    ("Date", "????.??.??"),
    ("Round", "?"),
    ("White", "?"),
    ("Black", "?"),
    ("Result", "*"),
];

impl Default for GameHeaders {
    fn default() -> Self {
        Self(SEVEN_TAG_ROSTER.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }
}

impl GameHeaders {
    pub fn get(&self, tag: &str) -> Option<&str> { self.0.get(tag).map(|s| s.as_str()) }

    pub fn set(&mut self, tag: impl Into<String>, value: impl Into<String>) { self.0.insert(tag.into(), value.into()); }

    pub fn remove(&mut self, tag: &str) -> Option<String> { self.0.remove(tag) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> { self.0.iter().map(|(k, v)| (k.as_str(), v.as_str())) }

    pub fn result(&self) -> &str { self.get("Result").unwrap_or("*") }
}

/// Tree, current position and headers of one open game; the unit handed to
/// session persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeState {
    #[serde(rename = "root")]
    pub tree: GameTree,
    pub position: Path,
    pub headers: GameHeaders,
}

impl Default for TreeState {
    fn default() -> Self {
        Self { tree: GameTree::with_root(GameNode::root(START_FEN.to_string(), 0)), position: Path::root(), headers: GameHeaders::default() }
    }
}

impl TreeState {
    pub fn new() -> Self { Self::default() }

    /// Single-root state at a custom start position. Non-standard starts get
    /// the `FEN`/`SetUp` tags PGN expects.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let board = cozy::board_from_fen(fen)?;
        let fen = cozy::fen(&board);
        let ply = (board.fullmove_number() as u32).saturating_sub(1) * 2 + u32::from(board.side_to_move() == cozy_chess::Color::Black);
        let mut headers = GameHeaders::default();
        if fen != START_FEN {
            headers.set("FEN", fen.clone());
            headers.set("SetUp", "1");
        }
        Ok(Self { tree: GameTree::with_root(GameNode::root(fen, ply)), position: Path::root(), headers })
    }

    pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

    /// Restores a snapshot. Broken tree links are rejected; a position that no
    /// longer resolves is clamped to its longest valid prefix.
    pub fn from_json(s: &str) -> Result<Self> {
        let mut state: TreeState = serde_json::from_str(s)?;
        state.tree.check_links().map_err(|e| Error::Session(<serde_json::Error as serde::de::Error>::custom(e)))?;
        let (_, valid) = state.tree.locate_clamped(&state.position);
        if valid != state.position {
            warn!("session position {} not in tree, clamped to {}", state.position, valid);
            state.position = valid;
        }
        Ok(state)
    }
}
