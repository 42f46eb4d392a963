use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Square;

/// Arena slot of a node inside one [`crate::tree::GameTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn idx(self) -> usize { self.0 as usize }
}

/// Move-quality or evaluation glyph with its NAG code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Annotation {
    #[serde(rename = "!")] Good,
    #[serde(rename = "?")] Mistake,
    #[serde(rename = "!!")] Brilliant,
    #[serde(rename = "??")] Blunder,
    #[serde(rename = "!?")] Interesting,
    #[serde(rename = "?!")] Dubious,
    #[serde(rename = "=")] Equal,
    #[serde(rename = "∞")] Unclear,
    #[serde(rename = "⩲")] WhiteSlightlyBetter,
    #[serde(rename = "⩱")] BlackSlightlyBetter,
    #[serde(rename = "±")] WhiteBetter,
    #[serde(rename = "∓")] BlackBetter,
    #[serde(rename = "+-")] WhiteWinning,
    #[serde(rename = "-+")] BlackWinning,
    #[serde(rename = "N")] Novelty,
}

const GLYPHS: [(Annotation, &str, u8); 15] = [
    (Annotation::Good, "!", 1),
    (Annotation::Mistake, "?", 2),
    (Annotation::Brilliant, "!!", 3),
    (Annotation::Blunder, "??", 4),
    (Annotation::Interesting, "!?", 5),
    (Annotation::Dubious, "?!", 6),
    (Annotation::Equal, "=", 10),
    (Annotation::Unclear, "∞", 13),
    (Annotation::WhiteSlightlyBetter, "⩲", 14),
    (Annotation::BlackSlightlyBetter, "⩱", 15),
    (Annotation::WhiteBetter, "±", 16),
    (Annotation::BlackBetter, "∓", 17),
    (Annotation::WhiteWinning, "+-", 18),
    (Annotation::BlackWinning, "-+", 19),
    (Annotation::Novelty, "N", 146),
];

impl Annotation {
    pub fn glyph(self) -> &'static str {
        GLYPHS.iter().find(|(a, _, _)| *a == self).map(|(_, g, _)| *g).unwrap_or("")
    }

    pub fn nag(self) -> u8 {
        GLYPHS.iter().find(|(a, _, _)| *a == self).map(|(_, _, n)| *n).unwrap_or(0)
    }

    pub fn from_nag(nag: u8) -> Option<Self> {
        GLYPHS.iter().find(|(_, _, n)| *n == nag).map(|(a, _, _)| *a)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.glyph()) }
}

impl FromStr for Annotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix('$') {
            return rest.parse::<u8>().ok().and_then(Self::from_nag).ok_or_else(|| format!("unknown NAG {s}"));
        }
        GLYPHS.iter().find(|(_, g, _)| *g == s).map(|(a, _, _)| *a).ok_or_else(|| format!("unknown glyph {s:?}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brush {
    Green,
    Red,
    Blue,
    Yellow,
}

/// Arrow (`dest` set) or square highlight (`dest` absent) drawn on a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub orig: Square,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<Square>,
    pub brush: Brush,
}

impl Shape {
    pub fn arrow(orig: Square, dest: Square, brush: Brush) -> Self { Self { orig, dest: Some(dest), brush } }
    pub fn highlight(sq: Square, brush: Brush) -> Self { Self { orig: sq, dest: None, brush } }
}

/// One position of the game tree and the move that led to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameNode {
    /// Standard UCI of the move from the parent; `None` only on the root.
    pub uci: Option<String>,
    pub san: Option<String>,
    pub fen: String,
    /// Plies since the start of the game.
    pub half_moves: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl GameNode {
    pub(crate) fn root(fen: String, half_moves: u32) -> Self {
        Self { uci: None, san: None, fen, half_moves, annotation: None, comment: None, shapes: Vec::new(), parent: None, children: Vec::new() }
    }

    pub(crate) fn child_of(parent: NodeId, parent_half_moves: u32, uci: String, san: String, fen: String) -> Self {
        Self {
            uci: Some(uci),
            san: Some(san),
            fen,
            half_moves: parent_half_moves + 1,
            annotation: None,
            comment: None,
            shapes: Vec::new(),
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> { self.parent }
    pub fn children(&self) -> &[NodeId] { &self.children }

    /// Move number as printed in PGN, e.g. 1 for both 1.e4 and 1...e5.
    pub fn move_number(&self) -> u32 { (self.half_moves + 1) / 2 }
}
