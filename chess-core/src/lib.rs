//! 国际象棋规则核心
//!
//! 包含:
//! - 棋子、棋盘、完整局面等核心数据结构
//! - 走法生成（伪合法走法、合法性过滤、攻击检测、将死/逼和判定）
//! - 走子执行器（执行/撤销，支持吃过路兵、易位、升变）
//! - 记谱、FEN、Perft
//! - 面向界面层的对局会话

mod board;
mod constants;
mod error;
mod executor;
mod fen;
mod game;
mod moves;
mod notation;
mod perft;
mod piece;

pub use board::{Board, CastlingRights, GameStatus, Position};
pub use constants::*;
pub use error::{ChessError, Result};
pub use executor::MoveRecord;
pub use fen::{Fen, INITIAL_FEN};
pub use game::{Game, SelectOutcome};
pub use moves::{Move, MoveGenerator, SpecialMove};
pub use notation::Notation;
pub use perft::{divide, perft};
pub use piece::{Color, Piece, PieceType, Square};
