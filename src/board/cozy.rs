//! Full-rules adapter over `cozy-chess` for the analysis board.
//!
//! cozy-chess encodes castling as "king takes own rook"; everything leaving
//! this module uses standard UCI (`e1g1`) instead.

use cozy_chess::{Board, File, GameStatus, Move, Piece, Square};

use crate::error::{malformed, Error, Result};

pub fn board_from_fen(fen: &str) -> Result<Board> {
    Board::from_fen(fen, false).map_err(|e| malformed(format!("{fen:?}: {e:?}")))
}

pub fn fen(board: &Board) -> String { format!("{}", board) }

pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    board.generate_moves(|ml| { moves.extend(ml); false });
    moves
}

fn is_castle(board: &Board, mv: Move) -> bool {
    board.piece_on(mv.from) == Some(Piece::King) && board.color_on(mv.to) == Some(board.side_to_move())
}

fn castle_king_dest(mv: Move) -> Square {
    let file = if mv.to.file() as usize > mv.from.file() as usize { File::G } else { File::C };
    Square::new(file, mv.from.rank())
}

/// Standard UCI text for a legal move of `board`.
pub fn uci(board: &Board, mv: Move) -> String {
    if is_castle(board, mv) {
        format!("{}{}", mv.from, castle_king_dest(mv))
    } else {
        format!("{}", mv)
    }
}

fn looks_like_uci(s: &str) -> bool {
    let b = s.as_bytes();
    let sq = |f: u8, r: u8| (b'a'..=b'h').contains(&f) && (b'1'..=b'8').contains(&r);
    match b.len() {
        4 => sq(b[0], b[1]) && sq(b[2], b[3]),
        5 => sq(b[0], b[1]) && sq(b[2], b[3]) && matches!(b[4], b'n' | b'b' | b'r' | b'q'),
        _ => false,
    }
}

/// Resolves standard UCI text to a legal move of `board`.
pub fn parse_uci(board: &Board, s: &str) -> Result<Move> {
    if !looks_like_uci(s) { return Err(Error::InvalidUci(s.to_string())); }
    let mut found = None;
    board.generate_moves(|ml| {
        for m in ml {
            if uci(board, m) == s { found = Some(m); break; }
        }
        found.is_some()
    });
    found.ok_or_else(|| Error::IllegalMove { uci: s.to_string(), fen: fen(board) })
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

/// Standard algebraic notation for a legal move of `board`, with `+`/`#`.
pub fn san(board: &Board, mv: Move) -> String {
    let mut out = String::new();
    let piece = board.piece_on(mv.from).unwrap_or(Piece::Pawn);
    let from = mv.from.to_string();
    let to = mv.to.to_string();

    if is_castle(board, mv) {
        out.push_str(if castle_king_dest(mv).file() == File::G { "O-O" } else { "O-O-O" });
    } else {
        let stm = board.side_to_move();
        let captures = board.color_on(mv.to).map_or(false, |c| c != stm)
            || (piece == Piece::Pawn && mv.from.file() != mv.to.file());
        if piece == Piece::Pawn {
            if captures { out.push_str(&from[..1]); }
        } else {
            out.push(piece_letter(piece));
            let rivals: Vec<Move> = legal_moves(board)
                .into_iter()
                .filter(|m| m.to == mv.to && m.from != mv.from && board.piece_on(m.from) == Some(piece))
                .collect();
            if !rivals.is_empty() {
                let same_file = rivals.iter().any(|m| m.from.file() == mv.from.file());
                let same_rank = rivals.iter().any(|m| m.from.rank() == mv.from.rank());
                if !same_file { out.push_str(&from[..1]); }
                else if !same_rank { out.push_str(&from[1..]); }
                else { out.push_str(&from); }
            }
        }
        if captures { out.push('x'); }
        out.push_str(&to);
        if let Some(p) = mv.promotion {
            out.push('=');
            out.push(piece_letter(p));
        }
    }

    let mut child = board.clone();
    child.play(mv);
    if child.status() == GameStatus::Won { out.push('#'); } else if !child.checkers().is_empty() { out.push('+'); }
    out
}

pub fn is_checkmate(board: &Board) -> bool { board.status() == GameStatus::Won }

/// PGN result token for a finished game, `None` while play continues.
pub fn result_token(board: &Board) -> Option<&'static str> {
    match board.status() {
        GameStatus::Won => Some(if board.side_to_move() == cozy_chess::Color::White { "0-1" } else { "1-0" }),
        GameStatus::Drawn => Some("1/2-1/2"),
        GameStatus::Ongoing => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castling_uses_king_destination() {
        let b = board_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let short = parse_uci(&b, "e1g1").unwrap();
        assert_eq!(san(&b, short), "O-O");
        let long = parse_uci(&b, "e1c1").unwrap();
        assert_eq!(san(&b, long), "O-O-O");
        assert_eq!(uci(&b, long), "e1c1");
    }

    #[test]
    fn san_disambiguates_by_file() {
        let b = board_from_fen("4k3/8/8/8/8/8/4K3/R6R w - - 0 1").unwrap();
        let m = parse_uci(&b, "a1d1").unwrap();
        assert_eq!(san(&b, m), "Rad1");
    }

    #[test]
    fn san_marks_mate() {
        let b = board_from_fen("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2").unwrap();
        let m = parse_uci(&b, "d8h4").unwrap();
        assert_eq!(san(&b, m), "Qh4#");
        let mut after = b.clone();
        after.play(m);
        assert!(is_checkmate(&after));
        assert_eq!(result_token(&after), Some("0-1"));
    }

    #[test]
    fn rejects_garbage() {
        let b = Board::default();
        assert!(matches!(parse_uci(&b, "e2e9"), Err(Error::InvalidUci(_))));
        assert!(matches!(parse_uci(&b, "e2e5"), Err(Error::IllegalMove { .. })));
    }
}
