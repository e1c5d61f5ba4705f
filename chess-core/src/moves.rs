//! 走法生成和验证

use serde::{Deserialize, Serialize};

use crate::board::{Board, Position};
use crate::constants::{
    KING_START_COL, KINGSIDE_KING_TARGET_COL, KINGSIDE_ROOK_COL, QUEENSIDE_KING_TARGET_COL,
    QUEENSIDE_ROOK_COL,
};
use crate::piece::{Color, Piece, PieceType, Square};

/// 特殊走法标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialMove {
    /// 吃过路兵
    EnPassant,
    /// 短易位
    CastleKingside,
    /// 长易位
    CastleQueenside,
    /// 兵升变（固定升变为后）
    Promotion,
}

/// 候选走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始格
    pub from: Square,
    /// 目标格
    pub to: Square,
    /// 是否吃子（含吃过路兵）
    pub capture: bool,
    /// 特殊走法
    pub special: Option<SpecialMove>,
}

impl Move {
    /// 创建普通走法
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            capture: false,
            special: None,
        }
    }

    /// 创建吃子走法
    pub fn with_capture(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            capture: true,
            special: None,
        }
    }

    /// 附加特殊走法标记
    pub fn with_special(mut self, special: SpecialMove) -> Self {
        self.special = Some(special);
        self
    }

    /// 是否为易位
    pub fn is_castle(&self) -> bool {
        matches!(
            self.special,
            Some(SpecialMove::CastleKingside) | Some(SpecialMove::CastleQueenside)
        )
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.special == Some(SpecialMove::Promotion) {
            write!(f, "q")?;
        }
        Ok(())
    }
}

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// 走法生成器
///
/// 对棋盘只读；合法性过滤通过执行器的走子/撤销试探完成，不复制棋盘。
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成指定格子棋子的伪合法走法（不考虑自身是否被将军）
    pub fn pseudo_legal_moves(position: &Position, from: Square) -> Vec<Move> {
        let mut moves = Vec::with_capacity(32);
        if let Some(piece) = position.board.get(from) {
            Self::generate_piece_moves(position, from, piece, &mut moves);
        }
        moves
    }

    /// 生成指定格子棋子的合法走法
    ///
    /// 只有走子方的棋子才有走法。返回时局面与调用前完全一致。
    pub fn legal_moves(position: &mut Position, from: Square) -> Vec<Move> {
        match position.board.get(from) {
            Some(piece) if piece.color == position.side_to_move => {}
            _ => return Vec::new(),
        }

        let mut moves = Self::pseudo_legal_moves(position, from);
        moves.retain(|&mv| Self::leaves_king_safe(position, mv));
        moves
    }

    /// 生成走子方全部合法走法（按棋盘行优先顺序）
    pub fn all_legal_moves(position: &mut Position) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for sq in Square::all() {
            moves.extend(Self::legal_moves(position, sq));
        }
        moves
    }

    /// 走子方是否至少有一步合法走法
    pub fn has_legal_move(position: &mut Position) -> bool {
        let color = position.side_to_move;
        for sq in Square::all() {
            if position.board.color_at(sq) != Some(color) {
                continue;
            }
            for mv in Self::pseudo_legal_moves(position, sq) {
                if Self::leaves_king_safe(position, mv) {
                    return true;
                }
            }
        }
        false
    }

    /// 试走一步，检查走子方的王是否安全，然后撤销
    fn leaves_king_safe(position: &mut Position, mv: Move) -> bool {
        let mover = position.side_to_move;
        match position.make(mv) {
            Some(record) => {
                let king = position.king_square(mover);
                let safe = !Self::is_square_attacked(&position.board, king, mover.opponent());
                position.unmake(&record);
                safe
            }
            None => false,
        }
    }

    /// 生成指定棋子的所有伪合法走法
    fn generate_piece_moves(position: &Position, from: Square, piece: Piece, moves: &mut Vec<Move>) {
        let board = &position.board;
        let color = piece.color;
        match piece.piece_type {
            PieceType::Pawn => Self::generate_pawn_moves(position, from, color, moves),
            PieceType::Knight => Self::generate_step_moves(board, from, color, &KNIGHT_OFFSETS, moves),
            PieceType::Bishop => Self::generate_slider_moves(board, from, color, &DIAGONAL, moves),
            PieceType::Rook => Self::generate_slider_moves(board, from, color, &ORTHOGONAL, moves),
            PieceType::Queen => {
                Self::generate_slider_moves(board, from, color, &ORTHOGONAL, moves);
                Self::generate_slider_moves(board, from, color, &DIAGONAL, moves);
            }
            PieceType::King => {
                Self::generate_step_moves(board, from, color, &KING_OFFSETS, moves);
                Self::generate_castling_moves(position, from, color, moves);
            }
        }
    }

    /// 生成兵的走法
    fn generate_pawn_moves(position: &Position, from: Square, color: Color, moves: &mut Vec<Move>) {
        let board = &position.board;
        let direction = color.pawn_direction();
        let promotion_row = color.promotion_row();
        let tag = |mv: Move| {
            if mv.to.row == promotion_row {
                mv.with_special(SpecialMove::Promotion)
            } else {
                mv
            }
        };

        // 前进一步，起始行可再前进一步
        if let Some(one) = from.offset(direction, 0) {
            if board.get(one).is_none() {
                moves.push(tag(Move::new(from, one)));

                if from.row == color.pawn_start_row() {
                    if let Some(two) = one.offset(direction, 0) {
                        if board.get(two).is_none() {
                            moves.push(Move::new(from, two));
                        }
                    }
                }
            }
        }

        // 斜向吃子
        for dc in [-1i8, 1i8] {
            let Some(to) = from.offset(direction, dc) else {
                continue;
            };

            if let Some(target) = board.get(to) {
                if target.color != color {
                    moves.push(tag(Move::with_capture(from, to)));
                }
            } else if position.en_passant == Some(to) {
                // 被吃的兵在起始行的同一横线上
                let victim = Square::new_unchecked(from.row, to.col);
                if board.get(victim) == Some(Piece::new(color.opponent(), PieceType::Pawn)) {
                    moves.push(Move::with_capture(from, to).with_special(SpecialMove::EnPassant));
                }
            }
        }
    }

    /// 生成固定偏移的走法（马、王）
    fn generate_step_moves(
        board: &Board,
        from: Square,
        color: Color,
        offsets: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, dc) in offsets {
            if let Some(to) = from.offset(dr, dc) {
                Self::try_add_move(board, from, to, color, moves);
            }
        }
    }

    /// 生成滑行棋子的走法（车、象、后）
    fn generate_slider_moves(
        board: &Board,
        from: Square,
        color: Color,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, dc) in directions {
            let mut current = from;
            while let Some(to) = current.offset(dr, dc) {
                if let Some(target) = board.get(to) {
                    if target.color != color {
                        moves.push(Move::with_capture(from, to));
                    }
                    break;
                }
                moves.push(Move::new(from, to));
                current = to;
            }
        }
    }

    /// 生成易位走法
    ///
    /// 要求：易位权仍在、王与车之间全空、王当前所在格及经过的格子都不受攻击。
    fn generate_castling_moves(position: &Position, from: Square, color: Color, moves: &mut Vec<Move>) {
        let board = &position.board;
        let row = color.back_row();
        if from != Square::new_unchecked(row, KING_START_COL) {
            return;
        }

        let enemy = color.opponent();
        let rights = position.castling;
        if !rights.kingside(color) && !rights.queenside(color) {
            return;
        }
        if Self::is_square_attacked(board, from, enemy) {
            return;
        }

        let rook = Some(Piece::new(color, PieceType::Rook));
        let sq = |col: u8| Square::new_unchecked(row, col);
        let empty = |cols: &[u8]| cols.iter().all(|&c| board.get(sq(c)).is_none());
        let safe = |cols: &[u8]| cols.iter().all(|&c| !Self::is_square_attacked(board, sq(c), enemy));

        if rights.kingside(color)
            && board.get(sq(KINGSIDE_ROOK_COL)) == rook
            && empty(&[5, 6])
            && safe(&[5, 6])
        {
            moves.push(
                Move::new(from, sq(KINGSIDE_KING_TARGET_COL)).with_special(SpecialMove::CastleKingside),
            );
        }

        if rights.queenside(color)
            && board.get(sq(QUEENSIDE_ROOK_COL)) == rook
            && empty(&[1, 2, 3])
            && safe(&[3, 2])
        {
            moves.push(
                Move::new(from, sq(QUEENSIDE_KING_TARGET_COL)).with_special(SpecialMove::CastleQueenside),
            );
        }
    }

    /// 尝试添加走法（目标为空或敌方棋子）
    fn try_add_move(board: &Board, from: Square, to: Square, color: Color, moves: &mut Vec<Move>) {
        match board.get(to) {
            Some(target) if target.color != color => moves.push(Move::with_capture(from, to)),
            Some(_) => {}
            None => moves.push(Move::new(from, to)),
        }
    }

    /// 检查格子是否受到指定颜色的攻击
    ///
    /// 只看攻击范围（兵只看斜向、王不含易位），不做合法性过滤。
    pub fn is_square_attacked(board: &Board, target: Square, by: Color) -> bool {
        Square::all().any(|from| match board.get(from) {
            Some(piece) if piece.color == by => Self::can_attack(board, from, piece, target),
            _ => false,
        })
    }

    /// 检查指定颜色是否被将军
    pub fn is_in_check(position: &Position, color: Color) -> bool {
        Self::is_square_attacked(&position.board, position.king_square(color), color.opponent())
    }

    /// 检查棋子是否能攻击到目标格
    fn can_attack(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
        if from == target {
            return false;
        }
        let dr = target.row as i8 - from.row as i8;
        let dc = target.col as i8 - from.col as i8;

        match piece.piece_type {
            PieceType::Pawn => dr == piece.color.pawn_direction() && dc.abs() == 1,
            PieceType::Knight => {
                (dr.abs() == 1 && dc.abs() == 2) || (dr.abs() == 2 && dc.abs() == 1)
            }
            PieceType::King => dr.abs() <= 1 && dc.abs() <= 1,
            PieceType::Rook => (dr == 0 || dc == 0) && Self::ray_clear(board, from, target),
            PieceType::Bishop => dr.abs() == dc.abs() && Self::ray_clear(board, from, target),
            PieceType::Queen => {
                (dr == 0 || dc == 0 || dr.abs() == dc.abs()) && Self::ray_clear(board, from, target)
            }
        }
    }

    /// 检查两格之间（不含两端）是否全空
    fn ray_clear(board: &Board, from: Square, target: Square) -> bool {
        let dr = (target.row as i8 - from.row as i8).signum();
        let dc = (target.col as i8 - from.col as i8).signum();

        let mut current = from;
        while let Some(next) = current.offset(dr, dc) {
            if next == target {
                return true;
            }
            if board.get(next).is_some() {
                return false;
            }
            current = next;
        }
        false
    }
}

impl Position {
    /// 指定格子棋子的合法走法
    pub fn legal_moves(&mut self, from: Square) -> Vec<Move> {
        MoveGenerator::legal_moves(self, from)
    }

    /// 走子方全部合法走法
    pub fn all_legal_moves(&mut self) -> Vec<Move> {
        MoveGenerator::all_legal_moves(self)
    }

    /// 格子是否受到指定颜色的攻击
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        MoveGenerator::is_square_attacked(&self.board, sq, by)
    }

    /// 指定颜色是否被将军
    pub fn is_in_check(&self, color: Color) -> bool {
        MoveGenerator::is_in_check(self, color)
    }

    /// 重新计算将死/逼和标志
    pub(crate) fn update_status(&mut self) {
        self.checkmate = false;
        self.stalemate = false;

        if MoveGenerator::has_legal_move(self) {
            return;
        }

        if self.is_in_check(self.side_to_move) {
            tracing::debug!("{} is checkmated", self.side_to_move);
            self.checkmate = true;
        } else {
            tracing::debug!("{} is stalemated", self.side_to_move);
            self.stalemate = true;
        }
    }
}
