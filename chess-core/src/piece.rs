//! 棋子与坐标定义

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;
use crate::error::ChessError;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    /// 兵
    Pawn,
    /// 马
    Knight,
    /// 象
    Bishop,
    /// 车
    Rook,
    /// 后
    Queen,
    /// 王
    King,
}

impl PieceType {
    /// 子力分值（百分兵，用于 AI 评估）
    pub fn value(&self) -> i32 {
        match self {
            PieceType::Pawn => 100,
            PieceType::Knight => 300,
            PieceType::Bishop => 300,
            PieceType::Rook => 500,
            PieceType::Queen => 900,
            PieceType::King => 0,
        }
    }

    /// 记谱字母（大写）
    pub fn letter(&self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    /// 获取 FEN 字符（白方大写，黑方小写）
    pub fn to_fen_char(&self, color: Color) -> char {
        let c = self.letter();
        match color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<(PieceType, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece_type = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        Some((piece_type, color))
    }
}

/// 颜色（阵营）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// 白方（先手，在下方）
    White,
    /// 黑方（后手，在上方）
    Black,
}

impl Color {
    /// 获取对方
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 数组索引（白 0，黑 1）
    pub fn index(&self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// 兵的前进方向（行增量）
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// 兵的起始行
    pub fn pawn_start_row(&self) -> u8 {
        match self {
            Color::White => crate::constants::WHITE_PAWN_ROW,
            Color::Black => crate::constants::BLACK_PAWN_ROW,
        }
    }

    /// 底线所在行
    pub fn back_row(&self) -> u8 {
        match self {
            Color::White => crate::constants::WHITE_BACK_ROW,
            Color::Black => crate::constants::BLACK_BACK_ROW,
        }
    }

    /// 兵的升变行（对方底线）
    pub fn promotion_row(&self) -> u8 {
        self.opponent().back_row()
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Color> {
        match c {
            'w' | 'W' => Some(Color::White),
            'b' | 'B' => Some(Color::Black),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
}

impl Piece {
    /// 创建新棋子
    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        Self { color, piece_type }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        self.piece_type.to_fen_char(self.color)
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        PieceType::from_fen_char(c).map(|(piece_type, color)| Piece { color, piece_type })
    }

    /// 获取棋子分值
    pub fn value(&self) -> i32 {
        self.piece_type.value()
    }
}

/// 棋盘格子坐标
///
/// `row` 0 为第 8 横线（黑方底线），`col` 0 为 a 线。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    /// 行 (0-7)
    pub row: u8,
    /// 列 (0-7)
    pub col: u8,
}

impl Square {
    /// 创建新坐标，越界返回 None
    pub fn new(row: i8, col: i8) -> Option<Self> {
        if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// 创建新坐标，越界返回 `InvalidSquare` 错误
    pub fn try_new(row: i8, col: i8) -> Result<Self, ChessError> {
        Self::new(row, col).ok_or(ChessError::InvalidSquare { row, col })
    }

    /// 创建新坐标（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 获取偏移后的坐标
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        Square::new(self.row as i8 + dr, self.col as i8 + dc)
    }

    /// 上下翻转（第 1 横线与第 8 横线互换）
    pub fn flip_vertical(&self) -> Square {
        Square::new_unchecked(BOARD_SIZE as u8 - 1 - self.row, self.col)
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Square {
                row: (index / BOARD_SIZE) as u8,
                col: (index % BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// 所有格子，按行优先顺序
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE * BOARD_SIZE).filter_map(Square::from_index)
    }

    /// 纵线字母（a-h）
    pub fn file_char(&self) -> char {
        (b'a' + self.col) as char
    }

    /// 横线数字（1-8）
    pub fn rank(&self) -> u8 {
        BOARD_SIZE as u8 - self.row
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank())
    }
}

impl FromStr for Square {
    type Err = ChessError;

    /// 解析 `e4` 形式的坐标
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChessError::InvalidNotation {
            input: s.to_string(),
        };
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        let col = file - b'a';
        let row = BOARD_SIZE as u8 - (rank - b'0');
        Ok(Square::new_unchecked(row, col))
    }
}
