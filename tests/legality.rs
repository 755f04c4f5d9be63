//! Behavioral legality tests: specific rules checked move-by-move rather
//! than through aggregate perft counts.

use scoperta::board::{move_from_sq, move_piece, move_to_string};
use scoperta::{Board, GameStatus, PieceKind, Tables};

fn moves_of(fen: &str, tables: &Tables) -> Vec<String> {
    Board::from_fen(fen)
        .expect("valid FEN")
        .generate_moves(tables)
        .into_iter()
        .map(move_to_string)
        .collect()
}

#[test]
fn absolute_pin_freezes_the_knight() {
    let tables = Tables::new();
    // Knight d5 sits between its king on a2 and the bishop on g8.
    let board = Board::from_fen("6b1/8/8/3N4/8/8/K7/7k w - - 0 1").unwrap();
    for mv in board.generate_moves(&tables) {
        assert_ne!(
            move_from_sq(mv),
            35, // d5
            "pinned knight moved: {}",
            move_to_string(mv)
        );
    }
}

#[test]
fn double_check_forces_the_king_to_move() {
    let tables = Tables::new();
    // Rook on e8 and bishop on h4 both attack the king on e1.
    let board = Board::from_fen("4r2k/8/8/8/7b/8/8/4K3 w - - 0 1").unwrap();
    let moves = board.generate_moves(&tables);
    assert!(!moves.is_empty(), "king should have an escape");
    for mv in &moves {
        assert_eq!(move_piece(*mv), PieceKind::King);
    }
}

#[test]
fn blocking_and_capturing_resolve_a_single_check() {
    let tables = Tables::new();
    let names = moves_of("4r2k/8/8/8/8/8/3B4/R3K3 w - - 0 1", &tables);
    // Bishop interposes on e3, rook captures the checker from a1 via... a1 is
    // on the first rank, so only the interposition and king moves apply.
    assert!(names.contains(&"d2e3".to_string()));
    assert!(!names.contains(&"d2c3".to_string()), "c3 does not block");
    assert!(!names.contains(&"a1a2".to_string()), "rook move ignores the check");
}

#[test]
fn en_passant_is_rejected_when_it_exposes_the_king() {
    let tables = Tables::new();
    let names = moves_of("8/8/8/K2pP2q/8/8/8/7k w - d6 0 1", &tables);
    assert!(
        !names.contains(&"e5d6".to_string()),
        "rank-pinned en passant must be illegal"
    );
    // The plain advance does not clear the rank and stays available.
    assert!(names.contains(&"e5e6".to_string()));
}

#[test]
fn en_passant_is_rejected_when_the_captured_pawn_shields_the_king() {
    let tables = Tables::new();
    // Black just played d7d5; the d5 pawn is now the only piece between the
    // a8 bishop and the king on g2. Taking it en passant lands on d6, off the
    // diagonal, and uncovers the bishop.
    let names = moves_of("b3k3/8/8/3pP3/8/8/6K1/8 w - d6 0 1", &tables);
    assert!(
        !names.contains(&"e5d6".to_string()),
        "capturing the king's diagonal shield must be illegal"
    );
    // The plain advance keeps the shield in place and stays available.
    assert!(names.contains(&"e5e6".to_string()));

    // Nothing generated here may leave white in check.
    let board = Board::from_fen("b3k3/8/8/3pP3/8/8/6K1/8 w - d6 0 1").unwrap();
    for mv in board.generate_moves(&tables) {
        let next = board.apply_move(mv);
        let flipped = Board { side: next.side.opponent(), ..next };
        assert!(
            !flipped.in_check(&tables),
            "{} leaves the king hanging",
            move_to_string(mv)
        );
    }
}

#[test]
fn en_passant_along_a_diagonal_pin_stays_legal() {
    let tables = Tables::new();
    // The e5 pawn is pinned by the bishop on h8 through f6; capturing on f6
    // keeps it on the pin diagonal.
    let names = moves_of("7b/8/8/4Pp2/8/2K5/8/7k w - f6 0 1", &tables);
    assert!(names.contains(&"e5f6".to_string()));
    assert!(
        !names.contains(&"e5e6".to_string()),
        "advancing leaves the pin diagonal"
    );
}

#[test]
fn castling_rights_survive_unrelated_moves_only() {
    let tables = Tables::new();
    let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

    let castling_field = |b: &Board| {
        b.to_fen().split(' ').nth(2).unwrap().to_string()
    };

    // A rook move drops that wing's right.
    let rook_lift = board
        .generate_moves(&tables)
        .into_iter()
        .find(|&mv| move_to_string(mv) == "h1h4")
        .unwrap();
    assert_eq!(castling_field(&board.apply_move(rook_lift)), "Qkq");

    // Capturing a rook on its home square drops the victim's right.
    let grab = board
        .generate_moves(&tables)
        .into_iter()
        .find(|&mv| move_to_string(mv) == "a1a8")
        .unwrap();
    assert_eq!(castling_field(&board.apply_move(grab)), "Kk");
}

#[test]
fn smothered_mate_is_terminal() {
    let tables = Tables::new();
    let board = Board::from_fen("6rk/5Npp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
    assert_eq!(board.status(&tables), GameStatus::Checkmate);
}

#[test]
fn cornered_king_with_no_square_is_stalemate() {
    let tables = Tables::new();
    // The queen fences in h8 without giving check.
    let board = Board::from_fen("7k/8/6QK/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(board.status(&tables), GameStatus::Stalemate);
}

#[test]
fn successors_match_generated_moves() {
    let tables = Tables::new();
    let board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    let moves = board.generate_moves(&tables);
    let successors = board.successors(&tables);
    assert_eq!(moves.len(), successors.len());
    // Every successor hands the move to the other side.
    for next in &successors {
        assert_ne!(next.side, board.side);
    }
}
