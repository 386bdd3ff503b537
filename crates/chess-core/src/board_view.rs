//! Text renderings of a position for display.

use shakmaty::{Chess, Color, File, Position, Rank, Square};

/// Piece placement field of the FEN, e.g. `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`.
pub fn placement_fen(pos: &Chess) -> String {
    pos.board().to_string()
}

/// 8x8 grid, rank 8 first, pieces as letters (white upper-case) and `.` for
/// empty squares, separated by spaces.
pub fn ascii_board(pos: &Chess) -> String {
    let board = pos.board();
    let mut rows = Vec::with_capacity(8);

    for rank in (0..8u32).rev() {
        let row: Vec<String> = (0..8u32)
            .map(|file| {
                let sq = Square::from_coords(File::new(file), Rank::new(rank));
                board
                    .piece_at(sq)
                    .map(|p| p.char())
                    .unwrap_or('.')
                    .to_string()
            })
            .collect();
        rows.push(row.join(" "));
    }

    rows.join("\n")
}

pub fn side_to_move(pos: &Chess) -> &'static str {
    match pos.turn() {
        Color::White => "white",
        Color::Black => "black",
    }
}
