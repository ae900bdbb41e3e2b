//! Plain-text board rendering: one 4x4 panel per floor, top floor first.

use score4_core::{Bitboard, Position};
use std::fmt::Write as _;

pub fn render(pos: Position) -> String {
    let mut out = String::new();
    for floor in 0..4u8 {
        let _ = writeln!(out, "floor {floor}");
        let _ = writeln!(out, "+---+---+---+---+");
        for row in 0..4u8 {
            let _ = write!(out, "|");
            for col in 0..4u8 {
                let cell = floor * 16 + row * 4 + col;
                let mark = cell_mark(pos, cell);
                let _ = write!(out, " {mark} |");
            }
            out.push('\n');
            let _ = writeln!(out, "+---+---+---+---+");
        }
    }
    out
}

fn cell_mark(pos: Position, cell: u8) -> char {
    if pos.black.contains_index(cell) {
        'X'
    } else if pos.white.contains_index(cell) {
        'O'
    } else {
        ' '
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use score4_core::Side;

    #[test]
    fn empty_board_has_four_floors_and_no_marks() {
        let rendered = render(Position::EMPTY);
        assert_eq!(rendered.matches("floor").count(), 4);
        assert!(!rendered.contains('X'));
        assert!(!rendered.contains('O'));
    }

    #[test]
    fn placed_stones_show_the_right_marks() {
        let pos = Position::EMPTY
            .apply_move(Side::Black, Bitboard::bit_of(48))
            .apply_move(Side::White, Bitboard::bit_of(49));
        let rendered = render(pos);
        assert!(rendered.contains('X'));
        assert!(rendered.contains('O'));
    }
}
