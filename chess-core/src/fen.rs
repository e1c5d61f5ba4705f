//! FEN 格式解析和生成
//!
//! 国际象棋 FEN 格式：
//! `<棋盘> <走子方> <易位权> <吃过路兵目标> <半回合计数> <回合数>`
//!
//! 示例：
//! `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1`
//!
//! 半回合计数不参与规则判断，解析时忽略，生成时固定为 0。

use crate::board::{Board, CastlingRights, Position};
use crate::constants::BOARD_SIZE;
use crate::error::ChessError;
use crate::piece::{Color, Piece, Square};

/// 初始局面 FEN
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析 FEN 字符串为局面
    ///
    /// 只有棋盘部分是必需的，其余字段缺省为：白方走、无易位权、无吃过路兵目标、第 1 回合。
    pub fn parse(fen: &str) -> Result<Position, ChessError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.is_empty() {
            return Err(ChessError::InvalidFen {
                reason: "Empty FEN string".to_string(),
            });
        }

        let board = Self::parse_board(parts[0])?;

        let side_to_move = match parts.get(1) {
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next().and_then(Color::from_fen_char), chars.next()) {
                    (Some(color), None) => color,
                    _ => {
                        return Err(ChessError::InvalidFen {
                            reason: format!("Invalid side to move: {}", s),
                        })
                    }
                }
            }
            None => Color::White,
        };

        let castling = match parts.get(2) {
            Some(s) => Self::parse_castling(s)?,
            None => CastlingRights::none(),
        };

        let en_passant = match parts.get(3) {
            Some(&"-") | None => None,
            Some(s) => Some(s.parse::<Square>().map_err(|_| ChessError::InvalidFen {
                reason: format!("Invalid en passant square: {}", s),
            })?),
        };

        let fullmove = match parts.get(5) {
            Some(s) => s.parse().map_err(|_| ChessError::InvalidFen {
                reason: format!("Invalid fullmove number: {}", s),
            })?,
            None => 1,
        };

        Position::from_parts(board, side_to_move, castling, en_passant, fullmove)
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Board, ChessError> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != BOARD_SIZE {
            return Err(ChessError::InvalidFen {
                reason: format!("Expected 8 rows, got {}", rows.len()),
            });
        }

        // FEN 从第 8 横线开始，正好对应 row 0
        for (row, text) in rows.iter().enumerate() {
            let mut col = 0usize;

            for c in text.chars() {
                if col >= BOARD_SIZE {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Row {} has too many columns", row),
                    });
                }

                if let Some(empty_count) = c.to_digit(10) {
                    col += empty_count as usize;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    board.set(Square::new_unchecked(row as u8, col as u8), Some(piece));
                    col += 1;
                } else {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Invalid piece character: {}", c),
                    });
                }
            }

            if col != BOARD_SIZE {
                return Err(ChessError::InvalidFen {
                    reason: format!("Row {} has {} columns, expected 8", row, col),
                });
            }
        }

        Ok(board)
    }

    /// 解析易位权部分
    fn parse_castling(s: &str) -> Result<CastlingRights, ChessError> {
        let mut rights = CastlingRights::none();
        if s == "-" {
            return Ok(rights);
        }
        for c in s.chars() {
            match c {
                'K' => rights.white_kingside = true,
                'Q' => rights.white_queenside = true,
                'k' => rights.black_kingside = true,
                'q' => rights.black_queenside = true,
                _ => {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Invalid castling rights: {}", s),
                    })
                }
            }
        }
        Ok(rights)
    }

    /// 将局面转换为 FEN 字符串
    pub fn to_string(position: &Position) -> String {
        let en_passant = position
            .en_passant_target()
            .map(|sq| sq.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {} 0 {}",
            Self::board_to_string(position.board()),
            position.side_to_move().to_fen_char(),
            Self::castling_to_string(position.castling_rights()),
            en_passant,
            position.fullmove_number()
        )
    }

    /// 将棋盘转换为 FEN 棋盘部分
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE);

        for row in 0..BOARD_SIZE as u8 {
            let mut text = String::new();
            let mut empty_count = 0;

            for col in 0..BOARD_SIZE as u8 {
                if let Some(piece) = board.get(Square::new_unchecked(row, col)) {
                    if empty_count > 0 {
                        text.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    text.push(piece.to_fen_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                text.push_str(&empty_count.to_string());
            }

            rows.push(text);
        }

        rows.join("/")
    }

    fn castling_to_string(rights: CastlingRights) -> String {
        let text: String = [
            (rights.white_kingside, 'K'),
            (rights.white_queenside, 'Q'),
            (rights.black_kingside, 'k'),
            (rights.black_queenside, 'q'),
        ]
        .iter()
        .filter(|(allowed, _)| *allowed)
        .map(|(_, c)| *c)
        .collect();

        if text.is_empty() {
            "-".to_string()
        } else {
            text
        }
    }
}
