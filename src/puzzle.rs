//! Puzzle solving on top of a [`TreeStore`].
//!
//! The solution line is kept on the main line of the tree; wrong tries are
//! recorded as side variations without moving the board there.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::cozy;
use crate::error::Result;
use crate::tree::model::InsertPolicy;
use crate::tree::state::TreeState;
use crate::tree::store::{MoveOptions, TreeStore};

/// Puzzle position and its UCI solution: the solver's move first, then the
/// scripted reply, alternating.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub fen: String,
    pub moves: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attempt {
    Correct { solved: bool },
    Incorrect,
    AlreadySolved,
}

#[derive(Debug)]
pub struct PuzzleSession {
    puzzle: Puzzle,
    store: TreeStore,
    mate_finish: bool,
    failed: bool,
}

impl PuzzleSession {
    /// Seeds a store at the puzzle position. The solution must be a legal line.
    pub fn start(puzzle: Puzzle) -> Result<Self> {
        let mut board = cozy::board_from_fen(&puzzle.fen)?;
        for m in &puzzle.moves {
            let mv = cozy::parse_uci(&board, m)?;
            board.play(mv);
        }
        let mate_finish = cozy::is_checkmate(&board);
        let store = TreeStore::from_state(TreeState::from_fen(&puzzle.fen)?);
        Ok(Self { puzzle, store, mate_finish, failed: false })
    }

    pub fn puzzle(&self) -> &Puzzle { &self.puzzle }
    pub fn store(&self) -> &TreeStore { &self.store }
    pub fn failed(&self) -> bool { self.failed }

    /// Solution plies already on the board.
    pub fn ply(&self) -> usize { self.store.position().len() }

    pub fn is_solved(&self) -> bool { self.ply() >= self.puzzle.moves.len() }

    /// Checks the solver's move against the solution. A correct move is played
    /// on the main line together with the scripted reply; a wrong one is
    /// recorded in place and the board stays put.
    pub fn attempt(&mut self, uci: &str) -> Result<Attempt> {
        if self.is_solved() { return Ok(Attempt::AlreadySolved); }
        let ply = self.ply();
        let board = self.store.current_board()?;
        let mv = cozy::parse_uci(&board, uci)?;

        let last = ply + 1 == self.puzzle.moves.len();
        let matches = self.puzzle.moves[ply] == uci;
        let alt_mate = last && self.mate_finish && {
            let mut after = board.clone();
            after.play(mv);
            cozy::is_checkmate(&after)
        };

        let mainline = MoveOptions { change_position: true, change_headers: false, policy: InsertPolicy::Mainline };
        if matches || alt_mate {
            self.store.make_move(mv, mainline)?;
            if let Some(reply) = self.puzzle.moves.get(ply + 1) {
                let reply = reply.clone();
                self.store.make_move_uci(&reply, mainline)?;
            }
            debug!("puzzle ply {ply}: {uci} correct");
            return Ok(Attempt::Correct { solved: self.is_solved() });
        }

        debug!("puzzle ply {ply}: {uci} wrong, expected {}", self.puzzle.moves[ply]);
        self.failed = true;
        self.store.make_move(mv, MoveOptions { change_position: false, change_headers: false, policy: InsertPolicy::Variation })?;
        Ok(Attempt::Incorrect)
    }

    /// Plays out the rest of the solution on the main line. Counts as a failure.
    pub fn reveal(&mut self) -> Result<()> {
        if self.is_solved() { return Ok(()); }
        self.failed = true;
        let rest = self.puzzle.moves[self.ply()..].to_vec();
        self.store.make_moves(&rest, InsertPolicy::Mainline, false)?;
        Ok(())
    }
}
