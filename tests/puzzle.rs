use gametree::{Attempt, Puzzle, PuzzleSession};
use gametree::board::START_FEN;
use pretty_assertions::assert_eq;

fn drill() -> Puzzle {
    Puzzle { fen: START_FEN.to_string(), moves: vec!["e2e4".into(), "e7e5".into(), "g1f3".into()] }
}

fn mainline(session: &PuzzleSession) -> Vec<String> {
    let tree = session.store().tree();
    tree.mainline(tree.root()).map(|(_, n)| n.uci.clone().unwrap()).collect()
}

#[test]
fn correct_moves_advance_with_scripted_reply() {
    let mut s = PuzzleSession::start(drill()).unwrap();
    assert_eq!(s.attempt("e2e4").unwrap(), Attempt::Correct { solved: false });
    assert_eq!(s.ply(), 2);
    assert_eq!(s.attempt("g1f3").unwrap(), Attempt::Correct { solved: true });
    assert!(s.is_solved());
    assert!(!s.failed());
    assert_eq!(s.attempt("b8c6").unwrap(), Attempt::AlreadySolved);
    assert_eq!(mainline(&s), vec!["e2e4", "e7e5", "g1f3"]);
}

#[test]
fn wrong_move_is_recorded_off_the_main_line() {
    let mut s = PuzzleSession::start(drill()).unwrap();
    assert_eq!(s.attempt("d2d4").unwrap(), Attempt::Incorrect);
    assert!(s.failed());
    assert_eq!(s.ply(), 0, "board stays on the puzzle position");
    assert_eq!(s.attempt("e2e4").unwrap(), Attempt::Correct { solved: false });

    let tree = s.store().tree();
    let root = tree.root_node();
    let ucis: Vec<String> = root.children().iter().map(|&c| tree[c].uci.clone().unwrap()).collect();
    assert_eq!(ucis, vec!["e2e4", "d2d4"]);
}

#[test]
fn any_mate_finishes_a_mating_puzzle() {
    let p = Puzzle { fen: "6k1/5ppp/8/8/8/8/5PPP/RR4K1 w - - 0 1".into(), moves: vec!["a1a8".into()] };
    let mut s = PuzzleSession::start(p.clone()).unwrap();
    assert_eq!(s.attempt("b1b8").unwrap(), Attempt::Correct { solved: true });

    let mut s = PuzzleSession::start(p).unwrap();
    assert_eq!(s.attempt("b1b7").unwrap(), Attempt::Incorrect);
}

#[test]
fn reveal_plays_out_the_rest() {
    let mut s = PuzzleSession::start(drill()).unwrap();
    s.attempt("e2e4").unwrap();
    s.reveal().unwrap();
    assert!(s.is_solved());
    assert!(s.failed());
    assert_eq!(mainline(&s), vec!["e2e4", "e7e5", "g1f3"]);
}

#[test]
fn broken_puzzles_fail_to_start() {
    assert!(PuzzleSession::start(Puzzle { fen: "nope".into(), moves: vec![] }).is_err());
    assert!(PuzzleSession::start(Puzzle { fen: START_FEN.into(), moves: vec!["e2e5".into()] }).is_err());
}

#[test]
fn illegal_attempt_is_an_error_not_a_failure() {
    let mut s = PuzzleSession::start(drill()).unwrap();
    assert!(s.attempt("e2e5").is_err());
    assert!(!s.failed());
}
