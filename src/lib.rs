// Game-tree store for analysis boards plus the pseudo-legal generator used by exercise boards
pub mod board;
pub mod error;
pub mod puzzle;
pub mod tree;

pub use error::{Error, Result};
pub use puzzle::{Attempt, Puzzle, PuzzleSession};
pub use tree::{GameHeaders, InsertPolicy, MoveOptions, Path, TreeState, TreeStore};

/// Builds a store from the standard start and a UCI move list, main line only.
pub fn store_from_moves<S: AsRef<str>>(moves: &[S]) -> Result<TreeStore> {
    let mut store = TreeStore::new();
    store.make_moves(moves, InsertPolicy::Mainline, true)?;
    store.save();
    Ok(store)
}
