//! 错误类型定义

use thiserror::Error;

use crate::piece::Square;

/// 国际象棋规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// 坐标越界
    #[error("Invalid square: ({row}, {col})")]
    InvalidSquare { row: i8, col: i8 },

    /// 起点没有棋子
    #[error("No piece at {square}")]
    NoPiece { square: Square },

    /// 不是该方走棋
    #[error("Not your turn")]
    NotYourTurn,

    /// 走法不在合法走法列表中
    #[error("Illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    /// 对局已经结束（将死或逼和）
    #[error("Game is already over")]
    GameOver,

    /// 无效的 FEN 字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },

    /// 无法解析的坐标或走法文本
    #[error("Invalid notation: {input}")]
    InvalidNotation { input: String },
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
