//! Pseudo-legal destination generator for exercise and lesson boards.
//!
//! Moves obey piece movement, board edges and friendly blocking, but king
//! safety is never checked and castling is never offered. Authoritative
//! legality for the analysis board lives in [`crate::board::cozy`].

use std::collections::BTreeMap;

use crate::board::codec::{Color, PieceKind, Position, Square};
use crate::error::Result;

/// Origin square to its destination squares.
pub type Dests = BTreeMap<Square, Vec<Square>>;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const KING_OFFSETS: [(i8, i8); 8] = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];
const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Destinations for the piece on `from`. Empty when the square is empty or
/// holds a piece of the side not to move.
pub fn destinations(pos: &Position, from: Square) -> Vec<Square> {
    let piece = match pos.piece_at(from) {
        Some(p) if p.color == pos.side_to_move() => p,
        _ => return Vec::new(),
    };
    let mut out = Vec::new();
    match piece.kind {
        PieceKind::Pawn => pawn(pos, from, piece.color, &mut out),
        PieceKind::Knight => leaper(pos, from, piece.color, &KNIGHT_OFFSETS, &mut out),
        PieceKind::King => leaper(pos, from, piece.color, &KING_OFFSETS, &mut out),
        PieceKind::Bishop => slider(pos, from, piece.color, &BISHOP_DIRS, &mut out),
        PieceKind::Rook => slider(pos, from, piece.color, &ROOK_DIRS, &mut out),
        PieceKind::Queen => {
            slider(pos, from, piece.color, &ROOK_DIRS, &mut out);
            slider(pos, from, piece.color, &BISHOP_DIRS, &mut out);
        }
    }
    out
}

/// Every origin of the side to move with at least one destination.
pub fn all_destinations(pos: &Position) -> Dests {
    let stm = pos.side_to_move();
    pos.pieces()
        .filter(|(_, p)| p.color == stm)
        .filter_map(|(sq, _)| {
            let d = destinations(pos, sq);
            if d.is_empty() { None } else { Some((sq, d)) }
        })
        .collect()
}

/// Parses `fen` and returns [`all_destinations`] for it.
pub fn destinations_for_fen(fen: &str) -> Result<Dests> {
    Ok(all_destinations(&Position::from_fen(fen)?))
}

fn is_enemy(pos: &Position, sq: Square, color: Color) -> bool {
    matches!(pos.piece_at(sq), Some(p) if p.color != color)
}

fn pawn(pos: &Position, from: Square, color: Color, out: &mut Vec<Square>) {
    let fwd = color.forward();
    let start_rank = if color == Color::White { 1 } else { 6 };

    if let Some(one) = from.offset(0, fwd) {
        if pos.piece_at(one).is_none() {
            out.push(one);
            if from.rank() == start_rank {
                if let Some(two) = one.offset(0, fwd) {
                    if pos.piece_at(two).is_none() { out.push(two); }
                }
            }
        }
    }

    // En passant target sits directly behind the double-pushed pawn, so a
    // diagonal step onto it is rank-correct by construction.
    for df in [-1i8, 1] {
        if let Some(to) = from.offset(df, fwd) {
            if is_enemy(pos, to, color) || (pos.en_passant() == Some(to) && en_passant_rank_ok(from, color)) {
                out.push(to);
            }
        }
    }
}

fn en_passant_rank_ok(from: Square, color: Color) -> bool {
    match color { Color::White => from.rank() == 4, Color::Black => from.rank() == 3 }
}

fn leaper(pos: &Position, from: Square, color: Color, offsets: &[(i8, i8)], out: &mut Vec<Square>) {
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            match pos.piece_at(to) {
                Some(p) if p.color == color => {}
                _ => out.push(to),
            }
        }
    }
}

fn slider(pos: &Position, from: Square, color: Color, dirs: &[(i8, i8)], out: &mut Vec<Square>) {
    for &(df, dr) in dirs {
        let mut cur = from;
        while let Some(to) = cur.offset(df, dr) {
            match pos.piece_at(to) {
                None => out.push(to),
                Some(p) => {
                    if p.color != color { out.push(to); }
                    break;
                }
            }
            cur = to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square { s.parse().unwrap() }

    #[test]
    fn rook_in_corner_of_empty_board() {
        let pos = Position::from_fen("8/8/8/8/8/8/8/R6k w - - 0 1").unwrap();
        let d = destinations(&pos, sq("a1"));
        assert_eq!(d.len(), 14);
    }

    #[test]
    fn black_pawn_double_push() {
        let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        let mut d = destinations(&pos, sq("d7"));
        d.sort();
        assert_eq!(d, vec![sq("d5"), sq("d6")]);
    }
}
