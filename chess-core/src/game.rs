//! 对局会话
//!
//! 面向界面层的两段式交互：先选中己方棋子，再点击目标格走棋。
//! 选中状态只保存在这里，[`Position`] 本身不包含任何界面概念。

use tracing::debug;

use crate::board::{GameStatus, Position};
use crate::error::{ChessError, Result};
use crate::executor::MoveRecord;
use crate::moves::Move;
use crate::notation::Notation;
use crate::piece::{Color, Square};

/// 一次点击的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// 选中了己方棋子，附带其合法走法
    Selected(Vec<Move>),
    /// 走了一步棋
    Moved(MoveRecord),
    /// 无效点击，选中状态被清除
    Rejected,
}

/// 对局会话
#[derive(Debug, Clone, Default)]
pub struct Game {
    position: Position,
    selected: Option<Square>,
    valid_moves: Vec<Move>,
}

impl Game {
    /// 从初始局面开始新对局
    pub fn new() -> Self {
        Self::default()
    }

    /// 从指定局面开始
    pub fn from_position(position: Position) -> Self {
        Self {
            position,
            selected: None,
            valid_moves: Vec::new(),
        }
    }

    /// 当前局面
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// 当前走子方
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    /// 当前选中的格子
    pub fn selected_square(&self) -> Option<Square> {
        self.selected
    }

    /// 处理一次点击
    pub fn select(&mut self, sq: Square) -> SelectOutcome {
        if self.is_over() {
            self.clear_selection();
            return SelectOutcome::Rejected;
        }

        let Some(from) = self.selected.take() else {
            return self.try_select(sq);
        };

        let valid_moves = std::mem::take(&mut self.valid_moves);
        if let Some(mv) = valid_moves.into_iter().find(|m| m.from == from && m.to == sq) {
            return match self.position.apply(mv) {
                Ok(record) => SelectOutcome::Moved(record),
                Err(e) => {
                    debug!("apply {} failed: {}", mv, e);
                    SelectOutcome::Rejected
                }
            };
        }

        // 点到另一个己方棋子时改为选中它
        self.try_select(sq)
    }

    /// 按行列点击，返回是否真的走了一步棋
    pub fn select_square_or_move(&mut self, row: i8, col: i8) -> bool {
        match Square::try_new(row, col) {
            Ok(sq) => matches!(self.select(sq), SelectOutcome::Moved(_)),
            Err(e) => {
                debug!("click rejected: {}", e);
                self.clear_selection();
                false
            }
        }
    }

    fn try_select(&mut self, sq: Square) -> SelectOutcome {
        if self.position.board().color_at(sq) != Some(self.position.side_to_move()) {
            debug!("rejected selection at {}", sq);
            self.clear_selection();
            return SelectOutcome::Rejected;
        }

        let moves = self.position.legal_moves(sq);
        self.selected = Some(sq);
        self.valid_moves = moves.clone();
        SelectOutcome::Selected(moves)
    }

    /// 清除选中状态
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.valid_moves.clear();
    }

    /// 查询指定格子棋子的合法走法（只读）
    pub fn valid_moves_for_piece(&mut self, row: i8, col: i8) -> Vec<Move> {
        match Square::try_new(row, col) {
            Ok(sq) => self.position.legal_moves(sq),
            Err(e) => {
                debug!("query rejected: {}", e);
                Vec::new()
            }
        }
    }

    /// 走子方全部合法走法
    pub fn all_valid_moves(&mut self) -> Vec<Move> {
        self.position.all_legal_moves()
    }

    /// 按起点和终点走棋，返回具体的失败原因
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<MoveRecord> {
        if self.is_over() {
            return Err(ChessError::GameOver);
        }
        match self.position.piece_at(from) {
            None => return Err(ChessError::NoPiece { square: from }),
            Some(piece) if piece.color != self.position.side_to_move() => {
                return Err(ChessError::NotYourTurn)
            }
            Some(_) => {}
        }

        let mv = self
            .position
            .legal_moves(from)
            .into_iter()
            .find(|m| m.to == to)
            .ok_or(ChessError::IllegalMove { from, to })?;

        self.clear_selection();
        self.position.apply(mv)
    }

    /// 执行一步走法（例如 AI 给出的走法），必须在合法走法列表中
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveRecord> {
        self.try_move(mv.from, mv.to)
    }

    /// 悔一步棋，历史为空时返回 false
    pub fn undo_move(&mut self) -> bool {
        self.clear_selection();
        self.position.undo().is_some()
    }

    /// 指定颜色是否被将军
    pub fn is_in_check(&self, color: Color) -> bool {
        self.position.is_in_check(color)
    }

    /// 是否将死
    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    /// 是否逼和
    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    /// 对局是否结束
    pub fn is_over(&self) -> bool {
        self.status() != GameStatus::Ongoing
    }

    /// 终局状态
    pub fn status(&self) -> GameStatus {
        self.position.status()
    }

    /// 全部走法的记谱
    pub fn move_log(&self) -> Vec<String> {
        Notation::move_log(self.position.history())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_select_then_move() {
        let mut game = Game::new();

        // 第一次点击选中 e2 兵
        match game.select(sq("e2")) {
            SelectOutcome::Selected(moves) => assert_eq!(moves.len(), 2),
            other => panic!("应该选中棋子: {:?}", other),
        }
        assert_eq!(game.selected_square(), Some(sq("e2")));

        // 第二次点击走到 e4
        assert!(matches!(game.select(sq("e4")), SelectOutcome::Moved(_)));
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.selected_square(), None);
        assert_eq!(game.move_log(), vec!["e2-e4"]);
    }

    #[test]
    fn test_select_square_or_move_by_row_col() {
        let mut game = Game::new();
        // g1 = (7, 6)，f3 = (5, 5)
        assert!(!game.select_square_or_move(7, 6));
        assert!(game.select_square_or_move(5, 5));
        assert_eq!(game.move_log(), vec!["Ng1-f3"]);
    }

    #[test]
    fn test_invalid_selection() {
        let mut game = Game::new();
        // 空格
        assert_eq!(game.select(sq("e4")), SelectOutcome::Rejected);
        // 对方棋子
        assert_eq!(game.select(sq("e7")), SelectOutcome::Rejected);
        // 棋盘外的点击同样清除已有的选中
        game.select(sq("e2"));
        assert!(!game.select_square_or_move(8, 0));
        assert_eq!(game.selected_square(), None);
        assert!(game.position().history().is_empty());
    }

    #[test]
    fn test_invalid_destination_clears_selection() {
        let mut game = Game::new();
        game.select(sq("e2"));
        assert_eq!(game.select(sq("e5")), SelectOutcome::Rejected);
        assert_eq!(game.selected_square(), None);
        assert!(game.position().history().is_empty());
    }

    #[test]
    fn test_reselect_own_piece() {
        let mut game = Game::new();
        game.select(sq("e2"));
        assert!(matches!(game.select(sq("d2")), SelectOutcome::Selected(_)));
        assert_eq!(game.selected_square(), Some(sq("d2")));
        assert!(matches!(game.select(sq("d4")), SelectOutcome::Moved(_)));
    }

    #[test]
    fn test_valid_moves_for_piece() {
        let mut game = Game::new();
        assert_eq!(game.valid_moves_for_piece(7, 1).len(), 2);
        assert!(game.valid_moves_for_piece(0, 1).is_empty());
        assert!(game.valid_moves_for_piece(-1, 1).is_empty());
        assert_eq!(game.all_valid_moves().len(), 20);
    }

    #[test]
    fn test_try_move_errors() {
        let mut game = Game::new();
        assert_eq!(
            game.try_move(sq("e4"), sq("e5")),
            Err(ChessError::NoPiece { square: sq("e4") })
        );
        assert_eq!(game.try_move(sq("e7"), sq("e5")), Err(ChessError::NotYourTurn));
        assert_eq!(
            game.try_move(sq("e2"), sq("e5")),
            Err(ChessError::IllegalMove {
                from: sq("e2"),
                to: sq("e5")
            })
        );
        assert!(game.try_move(sq("e2"), sq("e4")).is_ok());
    }

    #[test]
    fn test_undo_move() {
        let mut game = Game::new();
        assert!(!game.undo_move());

        game.try_move(sq("e2"), sq("e4")).unwrap();
        assert!(game.undo_move());
        assert_eq!(game.position(), &Position::initial());
    }

    #[test]
    fn test_checkmate_status() {
        let mut game = Game::new();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            game.try_move(sq(from), sq(to)).unwrap();
        }
        assert!(game.is_checkmate());
        assert!(game.is_in_check(Color::White));
        assert!(game.is_over());
        assert_eq!(game.status(), GameStatus::Checkmate { loser: Color::White });
        assert_eq!(game.try_move(sq("e1"), sq("f2")), Err(ChessError::GameOver));
        assert_eq!(game.select(sq("e1")), SelectOutcome::Rejected);
        assert_eq!(game.move_log(), vec!["f2-f3", "e7-e5", "g2-g4", "Qd8-h4"]);
    }

    #[test]
    fn test_stalemate_status() {
        let game = Game::from_position(Fen::parse("8/8/8/8/8/kq6/8/K7 w - - 0 1").unwrap());
        assert!(game.is_stalemate());
        assert!(!game.is_checkmate());
        assert_eq!(game.status(), GameStatus::Stalemate);
    }
}
