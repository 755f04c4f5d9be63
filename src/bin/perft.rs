use clap::Parser;
use scoperta::board::START_FEN;
use scoperta::{perft, Board, Tables};
use shakmaty::fen::Fen;
use shakmaty::{Chess, Position};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    #[arg(short, long, default_value_t = 4)]
    depth: u32,

    /// Print the per-root-move breakdown instead of a single total.
    #[arg(long, default_value_t = false)]
    divide: bool,

    /// Also run shakmaty on the same position and compare node counts.
    #[arg(long, default_value_t = false)]
    check: bool,
}

fn main() {
    let args = Args::parse();

    let board = match Board::from_fen(&args.fen) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("Invalid FEN '{}': {}", args.fen, err);
            std::process::exit(1);
        }
    };
    let tables = Tables::new();

    println!("Running perft on FEN: '{}' at depth {}", args.fen, args.depth);

    if args.divide {
        scoperta::perft::print_divide(&board, args.depth, &tables);
        return;
    }

    let start = std::time::Instant::now();
    let nodes = perft(&board, args.depth, &tables);
    let duration = start.elapsed();

    println!(
        "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        args.depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / (duration.as_micros() as f64)
    );

    if args.check {
        let pos: Chess = if args.fen != START_FEN {
            let fen: Fen = args.fen.parse().unwrap();
            fen.into_position(shakmaty::CastlingMode::Standard).unwrap()
        } else {
            Chess::default()
        };
        let reference = perft_shakmaty(&pos, args.depth);
        println!("Shakmaty perft({}) = {} nodes", args.depth, reference);
        if reference == nodes {
            println!("OK: node counts agree");
        } else {
            println!("MISMATCH: {} vs {}", nodes, reference);
            std::process::exit(1);
        }
    }
}

fn perft_shakmaty(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    let moves = pos.legal_moves();
    for m in moves {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}
