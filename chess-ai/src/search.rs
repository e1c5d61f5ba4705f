//! 搜索引擎
//!
//! 固定深度的 Minimax + Alpha-Beta 剪枝。白方取最大值，黑方取最小值。
//! 每一步都在原局面上执行再撤销，搜索结束后局面与调用前完全一致。

use std::time::Instant;

use chess_core::{Color, Move, Position};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::evaluate::{Evaluator, CHECKMATE};

/// 默认搜索深度（半回合）
pub const DEFAULT_DEPTH: u8 = 3;

/// AI 难度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单：depth=2
    Easy,
    /// 中等：depth=3
    #[default]
    Medium,
    /// 困难：depth=4
    Hard,
}

impl Difficulty {
    /// 对应的搜索深度
    pub fn depth(&self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => DEFAULT_DEPTH,
            Difficulty::Hard => 4,
        }
    }
}

/// AI 配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    pub max_depth: u8,
    /// 搜索前打乱走法顺序，让同分走法之间有变化
    pub shuffle_moves: bool,
    /// 打乱顺序用的随机种子，None 时每次随机
    pub seed: Option<u64>,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            max_depth: difficulty.depth(),
            shuffle_moves: true,
            seed: None,
        }
    }

    /// 固定随机种子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::default())
    }
}

/// AI 引擎
#[derive(Debug, Clone)]
pub struct AiEngine {
    config: AiConfig,
    rng: ChaCha8Rng,
    nodes_searched: u64,
    last_score: Option<i32>,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            nodes_searched: 0,
            last_score: None,
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 按配置深度搜索最佳走法
    pub fn best_move(&mut self, position: &mut Position) -> Option<Move> {
        self.search_depth(position, self.config.max_depth)
    }

    /// 按指定深度搜索最佳走法，没有合法走法时返回 None
    ///
    /// 同分走法取（打乱后）顺序中的第一个。
    pub fn search_depth(&mut self, position: &mut Position, depth: u8) -> Option<Move> {
        let start = Instant::now();
        self.nodes_searched = 0;
        self.last_score = None;

        let mut moves = position.all_legal_moves();
        if moves.is_empty() {
            debug!("no legal moves for {}", position.side_to_move());
            return None;
        }
        if self.config.shuffle_moves {
            moves.shuffle(&mut self.rng);
        }

        let maximizing = position.side_to_move() == Color::White;
        let mut alpha = -CHECKMATE;
        let mut beta = CHECKMATE;
        let mut best: Option<(Move, i32)> = None;

        for mv in moves {
            if let Err(e) = position.apply(mv) {
                error!("failed to apply {} during search: {}", mv, e);
                continue;
            }
            let score = self.minimax(position, depth.max(1) - 1, alpha, beta);
            position.undo();

            let better = match best {
                None => true,
                Some((_, best_score)) if maximizing => score > best_score,
                Some((_, best_score)) => score < best_score,
            };
            if better {
                best = Some((mv, score));
                if maximizing {
                    alpha = alpha.max(score);
                } else {
                    beta = beta.min(score);
                }
            }
        }

        let (mv, score) = best?;
        self.last_score = Some(score);
        info!(
            "search finished: depth={} best={} score={} nodes={} elapsed={:?}",
            depth,
            mv,
            score,
            self.nodes_searched,
            start.elapsed()
        );
        Some(mv)
    }

    /// Minimax + Alpha-Beta
    fn minimax(&mut self, position: &mut Position, depth: u8, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 || position.is_checkmate() || position.is_stalemate() {
            return Evaluator::evaluate(position);
        }

        let moves = position.all_legal_moves();
        if moves.is_empty() {
            return Evaluator::evaluate(position);
        }

        let maximizing = position.side_to_move() == Color::White;
        let mut best = if maximizing { -CHECKMATE } else { CHECKMATE };

        for mv in moves {
            if let Err(e) = position.apply(mv) {
                error!("failed to apply {} during search: {}", mv, e);
                continue;
            }
            let score = self.minimax(position, depth - 1, alpha, beta);
            position.undo();

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if beta <= alpha {
                break;
            }
        }

        best
    }

    /// 上一次搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 上一次搜索选中走法的分值（白方视角）
    pub fn last_score(&self) -> Option<i32> {
        self.last_score
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

    fn seeded(depth: u8, seed: u64) -> AiEngine {
        let config = AiConfig {
            max_depth: depth,
            ..AiConfig::default()
        };
        AiEngine::new(config.with_seed(seed))
    }

    #[test]
    fn test_search_initial_position() {
        let mut position = Position::initial();
        let mut engine = seeded(2, 1);

        let mv = engine.best_move(&mut position);
        assert!(mv.is_some());
        assert!(engine.nodes_searched() > 20);
        assert!(engine.last_score().is_some());
    }

    #[test]
    fn test_finds_mate_in_one_for_white() {
        let mut position = Fen::parse("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        for seed in 0..4 {
            let mut engine = seeded(2, seed);
            let mv = engine.best_move(&mut position).unwrap();
            assert_eq!(mv.to_string(), "a1a8");
            assert_eq!(engine.last_score(), Some(CHECKMATE));
        }
    }

    #[test]
    fn test_finds_mate_in_one_for_black() {
        let mut position = Position::initial();
        play(&mut position, &["f2f3", "e7e5", "g2g4"]);

        let mut engine = seeded(2, 7);
        let mv = engine.best_move(&mut position).unwrap();
        assert_eq!(mv.to_string(), "d8h4");
        assert_eq!(engine.last_score(), Some(-CHECKMATE));
    }

    #[test]
    fn test_search_leaves_position_unchanged() {
        let mut position =
            Fen::parse("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        play(&mut position, &["e1g1"]);
        let before = position.clone();

        let mut engine = seeded(2, 3);
        engine.best_move(&mut position);
        assert_eq!(position, before);
        assert_eq!(position.history().len(), 1);
    }

    #[test]
    fn test_seeded_search_is_deterministic() {
        let mut position = Position::initial();
        let first = seeded(2, 42).best_move(&mut position);
        let second = seeded(2, 42).best_move(&mut position);
        assert_eq!(first, second);

        // 不打乱时按生成顺序取第一个同分走法
        let config = AiConfig {
            max_depth: 2,
            shuffle_moves: false,
            ..AiConfig::default()
        };
        let a = AiEngine::new(config.clone()).best_move(&mut position);
        let b = AiEngine::new(config).best_move(&mut position);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_moves_returns_none() {
        // 逼和
        let mut position = Fen::parse("8/8/8/8/8/kq6/8/K7 w - - 0 1").unwrap();
        let mut engine = seeded(2, 0);
        assert_eq!(engine.best_move(&mut position), None);
        assert_eq!(engine.last_score(), None);

        // 将死
        let mut position = Position::initial();
        play(&mut position, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(engine.best_move(&mut position), None);
    }

    #[test]
    fn test_lost_position_still_returns_move() {
        // 黑方唯一的 Kg8 之后 Ra8 将死，仍然要给出这步棋
        let mut position = Fen::parse("7k/8/6K1/8/8/8/8/R7 b - - 0 1").unwrap();
        let mut engine = seeded(3, 5);
        let mv = engine.best_move(&mut position).unwrap();
        assert_eq!(mv.to_string(), "h8g8");
        assert_eq!(engine.last_score(), Some(CHECKMATE));
    }

    #[test]
    fn test_difficulty_config() {
        assert_eq!(AiConfig::from_difficulty(Difficulty::Easy).max_depth, 2);
        assert_eq!(AiConfig::from_difficulty(Difficulty::Medium).max_depth, 3);
        assert_eq!(AiConfig::from_difficulty(Difficulty::Hard).max_depth, 4);

        let config = AiConfig::default();
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.max_depth, DEFAULT_DEPTH);
        assert!(config.shuffle_moves);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_config_from_json() {
        let config: AiConfig = serde_json::from_str(r#"{"difficulty":"Hard","seed":9}"#).unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.seed, Some(9));
        // 未给出的字段取默认值
        assert_eq!(config.max_depth, DEFAULT_DEPTH);
        assert!(config.shuffle_moves);
    }
}
