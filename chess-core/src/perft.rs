//! Perft 节点计数
//!
//! 统计指定深度下的叶子节点数，用来与公开的参考数据对照，检验走法生成。

use crate::board::Position;
use crate::moves::Move;

/// 统计 `depth` 层的叶子节点数，返回时局面不变
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.all_legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        if position.apply(mv).is_ok() {
            nodes += perft(position, depth - 1);
            position.undo();
        }
    }
    nodes
}

/// 按根节点走法分别统计
pub fn divide(position: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    let moves = position.all_legal_moves();
    let mut result = Vec::with_capacity(moves.len());
    for mv in moves {
        if position.apply(mv).is_ok() {
            let nodes = perft(position, depth.saturating_sub(1));
            position.undo();
            result.push((mv, nodes));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    #[test]
    fn test_perft_initial() {
        let mut position = Position::initial();
        assert_eq!(perft(&mut position, 1), 20);
        assert_eq!(perft(&mut position, 2), 400);
        assert_eq!(perft(&mut position, 3), 8902);
        assert_eq!(position, Position::initial());
    }

    #[test]
    fn test_perft_kiwipete() {
        let mut position = Fen::parse(KIWIPETE).unwrap();
        assert_eq!(perft(&mut position, 1), 48);
        assert_eq!(perft(&mut position, 2), 2039);
    }

    #[test]
    fn test_perft_endgame() {
        // 包含吃过路兵后暴露将军的情形
        let mut position = Fen::parse(ENDGAME).unwrap();
        assert_eq!(perft(&mut position, 1), 14);
        assert_eq!(perft(&mut position, 2), 191);
        assert_eq!(perft(&mut position, 3), 2812);
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let mut position = Position::initial();
        let total: u64 = divide(&mut position, 2).iter().map(|(_, n)| n).sum();
        assert_eq!(total, 400);
    }
}
