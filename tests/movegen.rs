use gametree::board::{all_destinations, destinations, destinations_for_fen, PieceKind, Position, Square, START_FEN};
use pretty_assertions::assert_eq;

fn sq(s: &str) -> Square { s.parse().expect("valid square") }

fn sorted(mut v: Vec<Square>) -> Vec<Square> { v.sort(); v }

fn squares(names: &[&str]) -> Vec<Square> { sorted(names.iter().map(|s| sq(s)).collect()) }

const SAMPLE_FENS: [&str; 6] = [
    START_FEN,
    "rnbqkbnr/pppp1ppp/8/4p3/5P2/8/PPPPP1PP/RNBQKBNR w KQkq - 0 2",
    "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
    "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 0 1",
];

#[test]
fn startpos_pawn_and_knight() {
    let p = Position::startpos();
    assert_eq!(sorted(destinations(&p, sq("e2"))), squares(&["e3", "e4"]));
    assert_eq!(sorted(destinations(&p, sq("g1"))), squares(&["f3", "h3"]));
    assert!(destinations(&p, sq("a1")).is_empty(), "rook is boxed in");
}

#[test]
fn pawn_captures_diagonally() {
    let p = Position::from_fen("rnbqkbnr/pppp1ppp/8/4p3/5P2/8/PPPPP1PP/RNBQKBNR w KQkq - 0 2").unwrap();
    assert_eq!(sorted(destinations(&p, sq("f4"))), squares(&["e5", "f5"]));
}

#[test]
fn pawn_takes_en_passant() {
    let p = Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
    assert_eq!(sorted(destinations(&p, sq("e5"))), squares(&["e6", "f6"]));
    // d5 was not the last double push
    assert!(!destinations(&p, sq("e5")).contains(&sq("d6")));
}

#[test]
fn blocked_pawn_has_no_push() {
    let p = Position::from_fen("4k3/8/8/8/8/4p3/4P3/4K3 w - - 0 1").unwrap();
    assert!(destinations(&p, sq("e2")).is_empty());
    let p = Position::from_fen("4k3/8/8/8/4p3/8/4P3/4K3 w - - 0 1").unwrap();
    assert_eq!(destinations(&p, sq("e2")), vec![sq("e3")]);
}

#[test]
fn empty_or_opponent_square_yields_nothing() {
    let p = Position::startpos();
    assert!(destinations(&p, sq("e4")).is_empty());
    assert!(destinations(&p, sq("e7")).is_empty());
    assert!(destinations(&p, sq("g8")).is_empty());
}

#[test]
fn king_has_no_castling() {
    let p = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    assert_eq!(sorted(destinations(&p, sq("e1"))), squares(&["d1", "d2", "e2", "f1", "f2"]));
}

#[test]
fn pseudo_legal_ignores_pins() {
    // The e2 knight is pinned against the king but still offers moves.
    let p = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
    assert_eq!(destinations(&p, sq("e2")).len(), 6);
}

#[test]
fn bulk_startpos_offers_twenty_moves() {
    let dests = all_destinations(&Position::startpos());
    assert_eq!(dests.len(), 10);
    assert_eq!(dests.values().map(|d| d.len()).sum::<usize>(), 20);
    assert!(!dests.contains_key(&sq("a1")), "origins without moves are omitted");
}

#[test]
fn bulk_from_fen_propagates_parse_errors() {
    assert!(destinations_for_fen("not a fen").is_err());
    let black = destinations_for_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
    assert!(black.keys().all(|s| s.rank() >= 6));
}

fn between(a: Square, b: Square) -> Vec<Square> {
    let df = (b.file() as i8 - a.file() as i8).signum();
    let dr = (b.rank() as i8 - a.rank() as i8).signum();
    let mut out = Vec::new();
    let mut cur = a;
    while let Some(next) = cur.offset(df, dr) {
        if next == b { break; }
        out.push(next);
        cur = next;
    }
    out
}

#[test]
fn destinations_respect_occupancy_everywhere() {
    for fen in SAMPLE_FENS {
        let p = Position::from_fen(fen).unwrap();
        for (from, piece) in p.pieces() {
            let dests = destinations(&p, from);
            if piece.color != p.side_to_move() {
                assert!(dests.is_empty(), "{fen}: opponent piece on {from} offered moves");
                continue;
            }
            for to in &dests {
                assert_ne!(*to, from, "{fen}: {from} moves onto itself");
                if let Some(target) = p.piece_at(*to) {
                    assert_ne!(target.color, piece.color, "{fen}: {from}->{to} lands on a friend");
                }
                if matches!(piece.kind, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen) {
                    for mid in between(from, *to) {
                        assert!(p.piece_at(mid).is_none(), "{fen}: {from}->{to} jumps over {mid}");
                    }
                }
            }
        }
    }
}

#[test]
fn dests_serialize_as_object() {
    let dests = destinations_for_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
    let v: serde_json::Value = serde_json::to_value(&dests).unwrap();
    assert!(v.get("a1").is_some());
    assert!(v.get("e1").is_some());
}
