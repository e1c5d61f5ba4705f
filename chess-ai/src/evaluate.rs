//! 局面评估函数
//!
//! 分值单位为百分兵（centipawn），正值对白方有利。

use chess_core::{Color, Piece, PieceType, Position, Square};

/// 将死分值，取负即为白方被将死
pub const CHECKMATE: i32 = i32::MAX;

/// 逼和分值
pub const STALEMATE: i32 = 0;

/// 评估器
pub struct Evaluator;

/// 棋子位置分值表（白方视角，row 0 为第 8 横线），黑方使用上下翻转后的表
#[rustfmt::skip]
mod position_tables {
    pub const KNIGHT: [[i32; 8]; 8] = [
        [ 0, 10, 20, 20, 20, 20, 10,  0],
        [10, 30, 50, 50, 50, 50, 30, 10],
        [20, 50, 60, 65, 65, 60, 50, 20],
        [20, 55, 65, 70, 70, 65, 55, 20],
        [20, 50, 65, 70, 70, 65, 50, 20],
        [20, 55, 60, 65, 65, 60, 55, 20],
        [10, 30, 50, 55, 55, 50, 30, 10],
        [ 0, 10, 20, 20, 20, 20, 10,  0],
    ];

    pub const BISHOP: [[i32; 8]; 8] = [
        [ 0, 20, 20, 20, 20, 20, 20,  0],
        [20, 40, 40, 40, 40, 40, 40, 20],
        [20, 40, 50, 60, 60, 50, 40, 20],
        [20, 50, 50, 60, 60, 50, 50, 20],
        [20, 40, 60, 60, 60, 60, 40, 20],
        [20, 60, 60, 60, 60, 60, 60, 20],
        [20, 50, 40, 40, 40, 40, 50, 20],
        [ 0, 20, 20, 20, 20, 20, 20,  0],
    ];

    pub const ROOK: [[i32; 8]; 8] = [
        [25, 25, 25, 25, 25, 25, 25, 25],
        [50, 75, 75, 75, 75, 75, 75, 50],
        [ 0, 25, 25, 25, 25, 25, 25,  0],
        [ 0, 25, 25, 25, 25, 25, 25,  0],
        [ 0, 25, 25, 25, 25, 25, 25,  0],
        [ 0, 25, 25, 25, 25, 25, 25,  0],
        [ 0, 25, 25, 25, 25, 25, 25,  0],
        [25, 25, 25, 50, 50, 25, 25, 25],
    ];

    pub const QUEEN: [[i32; 8]; 8] = [
        [ 0, 20, 20, 30, 30, 20, 20,  0],
        [20, 40, 40, 40, 40, 40, 40, 20],
        [20, 40, 50, 50, 50, 50, 40, 20],
        [30, 40, 50, 50, 50, 50, 40, 30],
        [40, 40, 50, 50, 50, 50, 40, 30],
        [20, 50, 50, 50, 50, 50, 40, 20],
        [20, 40, 50, 40, 40, 40, 40, 20],
        [ 0, 20, 20, 30, 30, 20, 20,  0],
    ];

    pub const PAWN: [[i32; 8]; 8] = [
        [80, 80, 80, 80, 80, 80, 80, 80],
        [70, 70, 70, 70, 70, 70, 70, 70],
        [30, 30, 40, 50, 50, 40, 30, 30],
        [25, 25, 30, 45, 45, 30, 25, 25],
        [20, 20, 20, 40, 40, 20, 20, 20],
        [25, 15, 10, 20, 20, 10, 15, 25],
        [25, 30, 30,  0,  0, 30, 30, 25],
        [20, 20, 20, 20, 20, 20, 20, 20],
    ];
}

impl Evaluator {
    /// 评估局面（白方视角）
    ///
    /// 将死返回 `±CHECKMATE`，符号取决于被将死的一方；逼和返回 0。
    pub fn evaluate(position: &Position) -> i32 {
        if position.is_checkmate() {
            return match position.side_to_move() {
                Color::White => -CHECKMATE,
                Color::Black => CHECKMATE,
            };
        }
        if position.is_stalemate() {
            return STALEMATE;
        }

        let mut score = 0;
        for (sq, piece) in position.board().all_pieces() {
            let piece_score = Self::evaluate_piece(sq, piece);
            match piece.color {
                Color::White => score += piece_score,
                Color::Black => score -= piece_score,
            }
        }
        score
    }

    /// 单个棋子的子力分加位置分
    fn evaluate_piece(sq: Square, piece: Piece) -> i32 {
        piece.value() + Self::position_bonus(sq, piece)
    }

    fn position_bonus(sq: Square, piece: Piece) -> i32 {
        let row = match piece.color {
            Color::White => sq.row as usize,
            Color::Black => 7 - sq.row as usize,
        };
        let col = sq.col as usize;

        match piece.piece_type {
            PieceType::Pawn => position_tables::PAWN[row][col],
            PieceType::Knight => position_tables::KNIGHT[row][col],
            PieceType::Bishop => position_tables::BISHOP[row][col],
            PieceType::Rook => position_tables::ROOK[row][col],
            PieceType::Queen => position_tables::QUEEN[row][col],
            PieceType::King => 0,
        }
    }

    /// 仅计算子力差
    pub fn evaluate_material(position: &Position) -> i32 {
        position
            .board()
            .all_pieces()
            .iter()
            .map(|(_, piece)| match piece.color {
                Color::White => piece.value(),
                Color::Black => -piece.value(),
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Fen, Notation};

    fn play(position: &mut Position, moves: &[&str]) {
        for text in moves {
            let (from, to) = Notation::parse_coordinate(text).unwrap();
            let mv = position
                .legal_moves(from)
                .into_iter()
                .find(|m| m.to == to)
                .unwrap();
            position.apply(mv).unwrap();
        }
    }

    #[test]
    fn test_initial_position_balanced() {
        let position = Position::initial();
        assert_eq!(Evaluator::evaluate(&position), 0);
        assert_eq!(Evaluator::evaluate_material(&position), 0);
    }

    #[test]
    fn test_material_advantage() {
        // 白方多一个后
        let position = Fen::parse("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        assert_eq!(Evaluator::evaluate_material(&position), 900);
        // d1 上的后位置分为 30
        assert_eq!(Evaluator::evaluate(&position), 930);
    }

    #[test]
    fn test_black_table_is_mirrored() {
        // e2 白兵和 e7 黑兵位置分相同，互相抵消
        let position = Fen::parse("4k3/4p3/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(Evaluator::evaluate(&position), 0);

        // 白兵前进一步，e3 位置分 20，e2 为 0
        let position = Fen::parse("4k3/4p3/8/8/8/4P3/8/4K3 w - - 0 1").unwrap();
        assert_eq!(Evaluator::evaluate(&position), 20);
    }

    #[test]
    fn test_checkmate_scores() {
        // 白方被将死
        let mut position = Position::initial();
        play(&mut position, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(Evaluator::evaluate(&position), -CHECKMATE);

        // 黑方被将死
        let mut position = Fen::parse("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        play(&mut position, &["a1a8"]);
        assert_eq!(Evaluator::evaluate(&position), CHECKMATE);
    }

    #[test]
    fn test_stalemate_scores_zero() {
        let position = Fen::parse("8/8/8/8/8/kq6/8/K7 w - - 0 1").unwrap();
        assert!(position.is_stalemate());
        assert_eq!(Evaluator::evaluate(&position), STALEMATE);
    }

    #[test]
    fn test_mirror_negates_score() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ];
        for fen in fens {
            let position = Fen::parse(fen).unwrap();
            let score = Evaluator::evaluate(&position);
            assert_eq!(Evaluator::evaluate(&position.mirrored()), -score, "{}", fen);
        }

        // 终局局面同样对称
        let mut position = Position::initial();
        play(&mut position, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(
            Evaluator::evaluate(&position.mirrored()),
            -Evaluator::evaluate(&position)
        );
    }
}
