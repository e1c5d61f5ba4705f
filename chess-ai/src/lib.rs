//! 国际象棋 AI 引擎
//!
//! 包含:
//! - 棋局评估函数（子力 + 位置分值表）
//! - 固定深度的 Minimax + Alpha-Beta 搜索
//! - 可设随机种子的走法顺序打乱

mod evaluate;
mod search;

pub use evaluate::{Evaluator, CHECKMATE, STALEMATE};
pub use search::{AiConfig, AiEngine, Difficulty, DEFAULT_DEPTH};
