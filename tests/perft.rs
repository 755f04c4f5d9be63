use scoperta::{perft, Board, Tables, START_FEN};

#[test]
fn perft_regression_starting_pos() {
    let tables = Tables::new();
    let board = Board::from_fen(START_FEN).expect("valid FEN");

    let expected = [20u64, 400, 8_902, 197_281, 4_865_609];
    for (i, &nodes) in expected.iter().enumerate() {
        let depth = (i + 1) as u32;
        let got = perft(&board, depth, &tables);
        assert_eq!(
            got, nodes,
            "perft mismatch at depth {}: got {} expected {}",
            depth, got, nodes
        );
    }
}

#[test]
#[ignore] // ~119M nodes, run with `cargo test --release -- --ignored`
fn perft_starting_pos_depth_six() {
    let tables = Tables::new();
    let board = Board::from_fen(START_FEN).expect("valid FEN");
    assert_eq!(perft(&board, 6, &tables), 119_060_324);
}
