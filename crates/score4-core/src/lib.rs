//! Core Score Four types: the bitboard position, the winning-line table,
//! and the rules that drive move generation and terminal detection.

mod bitboard;
mod color;
mod lines;
mod position;

pub use bitboard::Bitboard;
pub use color::Side;
pub use lines::{CELL_LINES, LINE_COUNT, LINES, MAX_LINES_PER_CELL, lines_through};
pub use position::{Outcome, Position};
