pub mod analysis;
pub mod bits;
pub mod board;
pub mod magic;
pub mod movegen;
pub mod perft;
pub mod tables;

pub use board::{Board, Color, Move, PieceKind, START_FEN};
pub use movegen::GameStatus;
pub use perft::{divide, perft};
pub use tables::Tables;
