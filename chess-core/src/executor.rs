//! 走子执行器
//!
//! 负责执行与撤销走法，包括吃过路兵、易位时车的移动和兵升变。
//! 每一步都会留下一条 [`MoveRecord`]，撤销只能按后进先出的顺序进行。

use serde::{Deserialize, Serialize};

use crate::board::{CastlingRights, Position};
use crate::constants::{
    KINGSIDE_ROOK_COL, KINGSIDE_ROOK_TARGET_COL, QUEENSIDE_ROOK_COL, QUEENSIDE_ROOK_TARGET_COL,
};
use crate::error::{ChessError, Result};
use crate::moves::{Move, SpecialMove};
use crate::notation::Notation;
use crate::piece::{Color, Piece, PieceType, Square};

/// 走法记录
///
/// 保存撤销一步棋所需的全部信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 执行的走法
    pub mv: Move,
    /// 移动的棋子（升变前）
    pub piece: Piece,
    /// 目标格上被吃的棋子
    pub captured: Option<Piece>,
    /// 吃过路兵时被吃的兵（不在目标格上）
    pub en_passant_victim: Option<Piece>,
    /// 是否发生升变
    pub promoted: bool,
    /// 走棋前的易位权
    pub prior_castling: CastlingRights,
    /// 走棋前的吃过路兵目标格
    pub prior_en_passant: Option<Square>,
    /// 走棋前走子方王的位置
    pub prior_king_square: Square,
    /// 走棋前的完整回合数
    pub prior_fullmove: u32,
}

impl MoveRecord {
    /// 是否吃子（含吃过路兵）
    pub fn is_capture(&self) -> bool {
        self.captured.is_some() || self.en_passant_victim.is_some()
    }

    /// 走棋方
    pub fn color(&self) -> Color {
        self.piece.color
    }

    /// 记谱
    pub fn notation(&self) -> String {
        Notation::from_record(self)
    }
}

/// 易位时车的起点和终点
fn castling_rook_squares(special: SpecialMove, row: u8) -> Option<(Square, Square)> {
    match special {
        SpecialMove::CastleKingside => Some((
            Square::new_unchecked(row, KINGSIDE_ROOK_COL),
            Square::new_unchecked(row, KINGSIDE_ROOK_TARGET_COL),
        )),
        SpecialMove::CastleQueenside => Some((
            Square::new_unchecked(row, QUEENSIDE_ROOK_COL),
            Square::new_unchecked(row, QUEENSIDE_ROOK_TARGET_COL),
        )),
        _ => None,
    }
}

impl Position {
    /// 执行一步走法，并重新计算终局标志
    ///
    /// 调用方需保证走法来自走法生成器；起点为空或不是走子方的棋子时返回错误。
    pub fn apply(&mut self, mv: Move) -> Result<MoveRecord> {
        match self.board.get(mv.from) {
            None => return Err(ChessError::NoPiece { square: mv.from }),
            Some(piece) if piece.color != self.side_to_move => {
                return Err(ChessError::NotYourTurn)
            }
            Some(_) => {}
        }

        let record = self
            .make(mv)
            .ok_or(ChessError::NoPiece { square: mv.from })?;
        self.history.push(record);
        self.update_status();
        Ok(record)
    }

    /// 撤销最近一步，历史为空时返回 None
    ///
    /// 终局标志总是被清除。
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        self.unmake(&record);
        self.checkmate = false;
        self.stalemate = false;
        Some(record)
    }

    /// 执行走法但不记录历史、不计算终局标志
    ///
    /// 供合法性试探和 [`Position::apply`] 使用。
    pub(crate) fn make(&mut self, mv: Move) -> Option<MoveRecord> {
        let piece = self.board.get(mv.from)?;
        let color = piece.color;

        // 特殊走法的附带效果
        let mut en_passant_victim = None;
        match mv.special {
            Some(SpecialMove::EnPassant) => {
                let victim = Square::new_unchecked(mv.from.row, mv.to.col);
                en_passant_victim = self.board.get(victim);
                self.board.set(victim, None);
            }
            Some(special) => {
                if let Some((rook_from, rook_to)) = castling_rook_squares(special, mv.from.row) {
                    self.board.move_piece(rook_from, rook_to);
                }
            }
            None => {}
        }

        let captured = self.board.move_piece(mv.from, mv.to);

        // 兵到达底线固定升变为后
        let is_pawn = piece.piece_type == PieceType::Pawn;
        let promoted = is_pawn && mv.to.row == color.promotion_row();
        if promoted {
            self.board.set(mv.to, Some(Piece::new(color, PieceType::Queen)));
        }

        let prior_en_passant = self.en_passant;
        self.en_passant = if is_pawn && mv.from.row.abs_diff(mv.to.row) == 2 {
            Some(Square::new_unchecked((mv.from.row + mv.to.row) / 2, mv.from.col))
        } else {
            None
        };

        let prior_king_square = self.king_squares[color.index()];
        let prior_castling = self.castling;
        match piece.piece_type {
            PieceType::King => {
                self.king_squares[color.index()] = mv.to;
                self.castling.clear_color(color);
            }
            PieceType::Rook => self.castling.clear_rook_square(mv.from),
            _ => {}
        }
        if captured.map(|p| p.piece_type) == Some(PieceType::Rook) {
            self.castling.clear_rook_square(mv.to);
        }

        let prior_fullmove = self.fullmove;
        if color == Color::Black {
            self.fullmove += 1;
        }
        self.side_to_move = color.opponent();

        Some(MoveRecord {
            mv,
            piece,
            captured,
            en_passant_victim,
            promoted,
            prior_castling,
            prior_en_passant,
            prior_king_square,
            prior_fullmove,
        })
    }

    /// 按记录还原一步走法（不处理历史和终局标志）
    pub(crate) fn unmake(&mut self, record: &MoveRecord) {
        let mv = record.mv;
        let color = record.piece.color;

        self.side_to_move = color;
        self.fullmove = record.prior_fullmove;

        self.board.set(mv.from, Some(record.piece));
        self.board.set(mv.to, record.captured);

        match mv.special {
            Some(SpecialMove::EnPassant) => {
                let victim = Square::new_unchecked(mv.from.row, mv.to.col);
                self.board.set(victim, record.en_passant_victim);
            }
            Some(special) => {
                if let Some((rook_from, rook_to)) = castling_rook_squares(special, mv.from.row) {
                    self.board.move_piece(rook_to, rook_from);
                }
            }
            None => {}
        }

        self.king_squares[color.index()] = record.prior_king_square;
        self.castling = record.prior_castling;
        self.en_passant = record.prior_en_passant;
    }
}
