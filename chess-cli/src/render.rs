//! 终端棋盘绘制

use chess_core::{Board, GameStatus, Position, Square, BOARD_SIZE};

/// 将棋盘绘制为文本，大写为白方，小写为黑方
pub fn board(position: &Position) -> String {
    let board: &Board = position.board();
    let mut out = String::new();

    for row in 0..BOARD_SIZE as u8 {
        let sq = Square::new_unchecked(row, 0);
        out.push_str(&format!("{} ", sq.rank()));
        for col in 0..BOARD_SIZE as u8 {
            let c = board
                .get(Square::new_unchecked(row, col))
                .map(|p| p.to_fen_char())
                .unwrap_or('.');
            out.push(' ');
            out.push(c);
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h");
    out
}

/// 终局描述
pub fn status(status: GameStatus) -> Option<String> {
    match status {
        GameStatus::Ongoing => None,
        GameStatus::Checkmate { loser } => Some(format!("checkmate, {} wins", loser.opponent())),
        GameStatus::Stalemate => Some("stalemate, draw".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color;

    #[test]
    fn test_render_initial() {
        let text = board(&Position::initial());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[4], "4  . . . . . . . .");
        assert_eq!(lines[7], "1  R N B Q K B N R");
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status(GameStatus::Ongoing), None);
        assert_eq!(
            status(GameStatus::Checkmate { loser: Color::White }).as_deref(),
            Some("checkmate, black wins")
        );
        assert_eq!(status(GameStatus::Stalemate).as_deref(), Some("stalemate, draw"));
    }
}
