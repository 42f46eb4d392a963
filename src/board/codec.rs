//! FEN parsing for the exercise boards.
//!
//! This is deliberately independent of `cozy-chess`: exercise and lesson
//! boards only need occupancy plus the side to move to offer move hints, and
//! a parse of all six fields keeps malformed input from slipping through.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{malformed, Error, Result};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Board square, `rank * 8 + file` with a1 = 0 and h8 = 63.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square(u8);

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 { Some(Self(rank * 8 + file)) } else { None }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        if idx < 64 { Some(Self(idx as u8)) } else { None }
    }

    pub fn index(self) -> usize { self.0 as usize }
    pub fn file(self) -> u8 { self.0 % 8 }
    pub fn rank(self) -> u8 { self.0 / 8 }

    /// Square shifted by a file/rank delta, or `None` when that leaves the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Self> {
        let f = self.file() as i8 + df;
        let r = self.rank() as i8 + dr;
        if (0..8).contains(&f) && (0..8).contains(&r) { Self::new(f as u8, r as u8) } else { None }
    }

    pub fn all() -> impl Iterator<Item = Square> { (0u8..64).map(Square) }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, (b'1' + self.rank()) as char)
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let b = s.as_bytes();
        if b.len() != 2 { return Err(malformed(format!("bad square {s:?}"))); }
        let (f, r) = (b[0], b[1]);
        if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
            return Err(malformed(format!("bad square {s:?}")));
        }
        Ok(Self((r - b'1') * 8 + (f - b'a')))
    }
}

impl TryFrom<String> for Square {
    type Error = Error;
    fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self { sq.to_string() }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }

    /// Rank direction pawns of this color advance in.
    pub fn forward(self) -> i8 {
        match self { Color::White => 1, Color::Black => -1 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn from_char(c: char) -> Option<Self> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Self { kind, color })
    }

    pub fn to_char(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        if self.color == Color::White { c.to_ascii_uppercase() } else { c }
    }
}

/// Plain decimal FEN counter; signs and other non-digits are rejected.
fn parse_counter(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) { return None; }
    field.parse().ok()
}

/// Parsed six-field FEN snapshot. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; 64],
    side_to_move: Color,
    castling: String,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Position {
    pub fn startpos() -> Self {
        // START_FEN is a constant that parses.
        match Self::from_fen(START_FEN) {
            Ok(p) => p,
            Err(e) => unreachable!("start position must parse: {e}"),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(malformed(format!("expected 6 fields, got {}", fields.len())));
        }

        let board = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(malformed(format!("bad side to move {other:?}"))),
        };

        let castling = fields[2];
        if castling != "-" {
            let mut seen = Vec::with_capacity(4);
            for c in castling.chars() {
                if !matches!(c, 'K' | 'Q' | 'k' | 'q') || seen.contains(&c) {
                    return Err(malformed(format!("bad castling rights {castling:?}")));
                }
                seen.push(c);
            }
        }

        let en_passant = match fields[3] {
            "-" => None,
            s => {
                let sq: Square = s.parse()?;
                if sq.rank() != 2 && sq.rank() != 5 {
                    return Err(malformed(format!("en passant square {s} not on rank 3 or 6")));
                }
                Some(sq)
            }
        };

        let halfmove_clock = parse_counter(fields[4]).ok_or_else(|| malformed(format!("bad half-move clock {:?}", fields[4])))?;
        let fullmove_number = parse_counter(fields[5]).ok_or_else(|| malformed(format!("bad full-move number {:?}", fields[5])))?;

        Ok(Self { board, side_to_move, castling: castling.to_string(), en_passant, halfmove_clock, fullmove_number })
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> { self.board[sq.index()] }
    pub fn side_to_move(&self) -> Color { self.side_to_move }
    pub fn castling(&self) -> &str { &self.castling }
    pub fn en_passant(&self) -> Option<Square> { self.en_passant }
    pub fn halfmove_clock(&self) -> u32 { self.halfmove_clock }
    pub fn fullmove_number(&self) -> u32 { self.fullmove_number }

    /// Occupied squares with their pieces, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::with_capacity(72);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match Square::new(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some(p) => {
                        if empty > 0 { placement.push((b'0' + empty) as char); empty = 0; }
                        placement.push(p.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 { placement.push((b'0' + empty) as char); }
            if rank > 0 { placement.push('/'); }
        }
        let stm = if self.side_to_move == Color::White { "w" } else { "b" };
        let ep = self.en_passant.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        format!("{placement} {stm} {} {ep} {} {}", self.castling, self.halfmove_clock, self.fullmove_number)
    }
}

impl FromStr for Position {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> { Self::from_fen(s) }
}

fn parse_placement(placement: &str) -> Result<[Option<Piece>; 64]> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(malformed(format!("expected 8 ranks, got {}", ranks.len())));
    }
    let mut board = [None; 64];
    // FEN lists rank 8 first.
    for (i, row) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;
        for c in row.chars() {
            if let Some(d) = c.to_digit(10) {
                if d == 0 || d > 8 { return Err(malformed(format!("bad empty-run {c} in rank {}", rank + 1))); }
                file += d as u8;
            } else {
                let piece = Piece::from_char(c).ok_or_else(|| malformed(format!("bad piece letter {c:?}")))?;
                if let Some(sq) = Square::new(file, rank) { board[sq.index()] = Some(piece); }
                file += 1;
            }
            if file > 8 { break; }
        }
        if file != 8 {
            return Err(malformed(format!("rank {} covers {file} files", rank + 1)));
        }
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_names() {
        let e4: Square = "e4".parse().unwrap();
        assert_eq!(e4.file(), 4);
        assert_eq!(e4.rank(), 3);
        assert_eq!(e4.to_string(), "e4");
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert_eq!(Square::new(0, 0).unwrap().offset(-1, 0), None);
    }

    #[test]
    fn startpos_occupancy() {
        let p = Position::startpos();
        assert_eq!(p.pieces().count(), 32);
        assert_eq!(p.piece_at("e1".parse().unwrap()), Some(Piece { kind: PieceKind::King, color: Color::White }));
        assert_eq!(p.piece_at("d8".parse().unwrap()), Some(Piece { kind: PieceKind::Queen, color: Color::Black }));
        assert_eq!(p.to_fen(), START_FEN);
    }
}
