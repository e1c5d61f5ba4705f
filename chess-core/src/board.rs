//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{
    BOARD_SIZE, KING_START_COL, KINGSIDE_ROOK_COL, QUEENSIDE_ROOK_COL,
};
use crate::error::{ChessError, Result};
use crate::executor::MoveRecord;
use crate::piece::{Color, Piece, PieceType, Square};

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// 8x8 棋盘，按 `[row][col]` 存放
    squares: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// 创建初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (col, piece_type) in back_rank.into_iter().enumerate() {
            let col = col as u8;
            // 黑方在上方（row 0），白方在下方（row 7）
            board.set(
                Square::new_unchecked(Color::Black.back_row(), col),
                Some(Piece::new(Color::Black, piece_type)),
            );
            board.set(
                Square::new_unchecked(Color::Black.pawn_start_row(), col),
                Some(Piece::new(Color::Black, PieceType::Pawn)),
            );
            board.set(
                Square::new_unchecked(Color::White.pawn_start_row(), col),
                Some(Piece::new(Color::White, PieceType::Pawn)),
            );
            board.set(
                Square::new_unchecked(Color::White.back_row(), col),
                Some(Piece::new(Color::White, piece_type)),
            );
        }

        board
    }

    /// 获取指定格子的棋子
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares
            .get(sq.row as usize)
            .and_then(|row| row.get(sq.col as usize))
            .copied()
            .flatten()
    }

    /// 按行列查询，棋盘外视为空格
    pub fn piece_at(&self, row: i8, col: i8) -> Option<Piece> {
        Square::new(row, col).and_then(|sq| self.get(sq))
    }

    /// 指定格子棋子的颜色
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.get(sq).map(|p| p.color)
    }

    /// 指定格子棋子的类型
    pub fn type_at(&self, sq: Square) -> Option<PieceType> {
        self.get(sq).map(|p| p.piece_type)
    }

    /// 坐标是否在棋盘内
    pub fn in_bounds(row: i8, col: i8) -> bool {
        Square::new(row, col).is_some()
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        if let Some(cell) = self
            .squares
            .get_mut(sq.row as usize)
            .and_then(|row| row.get_mut(sq.col as usize))
        {
            *cell = piece;
        }
    }

    /// 移动棋子（不检查规则），返回目标格原有的棋子
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, piece);
        captured
    }

    /// 扫描棋盘查找指定颜色的王
    pub fn find_king(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.get(sq) == Some(Piece::new(color, PieceType::King)))
    }

    /// 统计指定棋子的数量
    pub fn count(&self, piece: Piece) -> usize {
        Square::all().filter(|&sq| self.get(sq) == Some(piece)).count()
    }

    /// 获取指定颜色的所有棋子
    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    /// 获取所有棋子
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        Square::all()
            .filter_map(|sq| self.get(sq).map(|piece| (sq, piece)))
            .collect()
    }

    /// 镜像棋盘：上下翻转并交换颜色
    pub fn mirrored(&self) -> Board {
        let mut board = Board::empty();
        for (sq, piece) in self.all_pieces() {
            board.set(
                sq.flip_vertical(),
                Some(Piece::new(piece.color.opponent(), piece.piece_type)),
            );
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

/// 易位权
///
/// 只会被清除，不会被重新授予（悔棋恢复除外）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    /// 四个易位权全部保留
    pub const fn all() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    /// 无易位权
    pub const fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    /// 短易位权
    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    /// 长易位权
    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    /// 王移动后清除该方全部易位权
    pub fn clear_color(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    /// 车离开（或在）角格被吃掉时，清除对应易位权
    pub fn clear_rook_square(&mut self, sq: Square) {
        for color in [Color::White, Color::Black] {
            if sq.row != color.back_row() {
                continue;
            }
            match (color, sq.col) {
                (Color::White, KINGSIDE_ROOK_COL) => self.white_kingside = false,
                (Color::White, QUEENSIDE_ROOK_COL) => self.white_queenside = false,
                (Color::Black, KINGSIDE_ROOK_COL) => self.black_kingside = false,
                (Color::Black, QUEENSIDE_ROOK_COL) => self.black_queenside = false,
                _ => {}
            }
        }
    }

    /// 去掉王或车不在初始格的易位权
    pub fn restricted_to(mut self, board: &Board) -> Self {
        for color in [Color::White, Color::Black] {
            let row = color.back_row();
            let king_home = board.get(Square::new_unchecked(row, KING_START_COL))
                == Some(Piece::new(color, PieceType::King));
            let rook = Some(Piece::new(color, PieceType::Rook));
            if !king_home {
                self.clear_color(color);
                continue;
            }
            if board.get(Square::new_unchecked(row, KINGSIDE_ROOK_COL)) != rook {
                self.clear_rook_square(Square::new_unchecked(row, KINGSIDE_ROOK_COL));
            }
            if board.get(Square::new_unchecked(row, QUEENSIDE_ROOK_COL)) != rook {
                self.clear_rook_square(Square::new_unchecked(row, QUEENSIDE_ROOK_COL));
            }
        }
        self
    }

    /// 交换黑白双方的易位权
    pub fn swapped(&self) -> Self {
        Self {
            white_kingside: self.black_kingside,
            white_queenside: self.black_queenside,
            black_kingside: self.white_kingside,
            black_queenside: self.white_queenside,
        }
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

/// 对局终局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// 对局进行中
    Ongoing,
    /// 将死，`loser` 为被将死的一方
    Checkmate { loser: Color },
    /// 逼和
    Stalemate,
}

/// 完整局面（包含走子方、易位权、吃过路兵目标等）
///
/// 只有走子执行器（`apply` / `undo`）会修改局面。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    /// 仅在双步兵之后的一步内有效
    pub(crate) en_passant: Option<Square>,
    /// 王的位置缓存 [白, 黑]
    pub(crate) king_squares: [Square; 2],
    pub(crate) history: Vec<MoveRecord>,
    /// 完整回合数（黑方走完后 +1）
    pub(crate) fullmove: u32,
    pub(crate) checkmate: bool,
    pub(crate) stalemate: bool,
}

impl Position {
    /// 创建初始局面
    pub fn initial() -> Self {
        let board = Board::initial();
        Self {
            king_squares: [
                Square::new_unchecked(Color::White.back_row(), KING_START_COL),
                Square::new_unchecked(Color::Black.back_row(), KING_START_COL),
            ],
            board,
            side_to_move: Color::White,
            castling: CastlingRights::all(),
            en_passant: None,
            history: Vec::new(),
            fullmove: 1,
            checkmate: false,
            stalemate: false,
        }
    }

    /// 从各组成部分构建局面
    ///
    /// 要求双方各有且仅有一个王；不可能成立的易位权会被去掉，
    /// 终局标志根据当前走子方重新计算。
    pub fn from_parts(
        board: Board,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        fullmove: u32,
    ) -> Result<Self> {
        let mut king_squares = [Square::new_unchecked(0, 0); 2];
        for color in [Color::White, Color::Black] {
            let king = Piece::new(color, PieceType::King);
            let count = board.count(king);
            if count != 1 {
                return Err(ChessError::InvalidFen {
                    reason: format!("Expected exactly one {} king, found {}", color, count),
                });
            }
            if let Some(sq) = board.find_king(color) {
                king_squares[color.index()] = sq;
            }
        }

        let castling = castling.restricted_to(&board);
        let en_passant = en_passant.filter(|&target| {
            let possible = Self::en_passant_possible(&board, side_to_move, target);
            if !possible {
                tracing::debug!("dropping impossible en passant target {}", target);
            }
            possible
        });
        let mut position = Self {
            board,
            side_to_move,
            castling,
            en_passant,
            king_squares,
            history: Vec::new(),
            fullmove: fullmove.max(1),
            checkmate: false,
            stalemate: false,
        };
        if position.is_in_check(side_to_move.opponent()) {
            return Err(ChessError::InvalidFen {
                reason: format!("{} king is in check but it is not its turn", side_to_move.opponent()),
            });
        }
        position.update_status();
        Ok(position)
    }

    /// 吃过路兵目标格只能是对方兵刚刚双步越过的那一格
    fn en_passant_possible(board: &Board, side_to_move: Color, target: Square) -> bool {
        let mover = side_to_move.opponent();
        let dir = mover.pawn_direction();
        if target.row as i8 != mover.pawn_start_row() as i8 + dir {
            return false;
        }
        let (Some(pawn_sq), Some(origin)) = (target.offset(dir, 0), target.offset(-dir, 0)) else {
            return false;
        };
        board.get(target).is_none()
            && board.get(origin).is_none()
            && board.get(pawn_sq) == Some(Piece::new(mover, PieceType::Pawn))
    }

    /// 棋盘
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 指定格子的棋子
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.get(sq)
    }

    /// 当前走子方
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// 当前易位权
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// 吃过路兵目标格
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    /// 王的位置（缓存值）
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    /// 已执行的走法记录
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// 完整回合数
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove
    }

    /// 是否被将死
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// 是否逼和
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    /// 终局状态
    pub fn status(&self) -> GameStatus {
        if self.checkmate {
            GameStatus::Checkmate {
                loser: self.side_to_move,
            }
        } else if self.stalemate {
            GameStatus::Stalemate
        } else {
            GameStatus::Ongoing
        }
    }

    /// 镜像局面：上下翻转、交换颜色与走子方，不保留走法历史
    pub fn mirrored(&self) -> Position {
        let king_squares = [
            self.king_squares[Color::Black.index()].flip_vertical(),
            self.king_squares[Color::White.index()].flip_vertical(),
        ];
        Position {
            board: self.board.mirrored(),
            side_to_move: self.side_to_move.opponent(),
            castling: self.castling.swapped(),
            en_passant: self.en_passant.map(|sq| sq.flip_vertical()),
            king_squares,
            history: Vec::new(),
            fullmove: self.fullmove,
            checkmate: self.checkmate,
            stalemate: self.stalemate,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}
