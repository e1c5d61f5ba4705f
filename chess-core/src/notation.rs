//! 走法记谱
//!
//! 记谱格式：`<棋子字母?><起点><'x'|'-'><终点>[=Q]`
//! - 兵省略棋子字母
//! - 吃子用 `x`，普通走法用 `-`
//! - 升变追加 `=Q`
//!
//! 例：`e2-e4`、`Ng1-f3`、`e5xd6`、`Ke1-g1`、`a7xb8=Q`

use crate::error::{ChessError, Result};
use crate::executor::MoveRecord;
use crate::piece::{PieceType, Square};

/// 记谱工具
pub struct Notation;

impl Notation {
    /// 根据走法记录生成记谱，不依赖当前局面
    pub fn from_record(record: &MoveRecord) -> String {
        let mut text = String::with_capacity(8);
        if record.piece.piece_type != PieceType::Pawn {
            text.push(record.piece.piece_type.letter());
        }
        text.push_str(&record.mv.from.to_string());
        text.push(if record.is_capture() { 'x' } else { '-' });
        text.push_str(&record.mv.to.to_string());
        if record.promoted {
            text.push_str("=Q");
        }
        text
    }

    /// 整局记谱
    pub fn move_log(history: &[MoveRecord]) -> Vec<String> {
        history.iter().map(Self::from_record).collect()
    }

    /// 解析坐标记法（`e2e4`、`e2-e4`、`e7e8q`），返回起点和终点
    ///
    /// 升变后缀只接受 `q`，因为升变固定为后。
    pub fn parse_coordinate(input: &str) -> Result<(Square, Square)> {
        let invalid = || ChessError::InvalidNotation {
            input: input.to_string(),
        };

        let cleaned: String = input
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | 'x' | '='))
            .collect();

        let body = match cleaned.len() {
            4 => cleaned.as_str(),
            5 if cleaned.ends_with(['q', 'Q']) => &cleaned[..4],
            _ => return Err(invalid()),
        };

        let from: Square = body.get(0..2).ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        let to: Square = body.get(2..4).ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        Ok((from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;
    use crate::fen::Fen;

    fn play(position: &mut Position, text: &str) -> MoveRecord {
        let (from, to) = Notation::parse_coordinate(text).unwrap();
        let mv = position
            .legal_moves(from)
            .into_iter()
            .find(|m| m.to == to)
            .unwrap();
        position.apply(mv).unwrap()
    }

    #[test]
    fn test_pawn_and_piece_notation() {
        let mut position = Position::initial();
        assert_eq!(play(&mut position, "e2e4").notation(), "e2-e4");
        assert_eq!(play(&mut position, "d7d5").notation(), "d7-d5");
        assert_eq!(play(&mut position, "e4d5").notation(), "e4xd5");
        assert_eq!(play(&mut position, "g8f6").notation(), "Ng8-f6");
        assert_eq!(play(&mut position, "f1b5").notation(), "Bf1-b5");
        assert_eq!(play(&mut position, "c7c6").notation(), "c7-c6");
        assert_eq!(play(&mut position, "d5c6").notation(), "d5xc6");

        let log = Notation::move_log(position.history());
        assert_eq!(log.len(), 7);
        assert_eq!(log[3], "Ng8-f6");
    }

    #[test]
    fn test_castle_and_promotion_notation() {
        let mut position = Fen::parse("1n2k3/P7/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert_eq!(play(&mut position, "e1g1").notation(), "Ke1-g1");
        position.undo();
        assert_eq!(play(&mut position, "a7b8").notation(), "a7xb8=Q");
        position.undo();
        assert_eq!(play(&mut position, "a7a8").notation(), "a7-a8=Q");
    }

    #[test]
    fn test_en_passant_notation() {
        let mut position = Fen::parse("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(play(&mut position, "e5d6").notation(), "e5xd6");
    }

    #[test]
    fn test_parse_coordinate() {
        let e2 = Square::new_unchecked(6, 4);
        let e4 = Square::new_unchecked(4, 4);
        assert_eq!(Notation::parse_coordinate("e2e4"), Ok((e2, e4)));
        assert_eq!(Notation::parse_coordinate("e2-e4"), Ok((e2, e4)));
        assert_eq!(Notation::parse_coordinate(" E2E4 "), Ok((e2, e4)));
        assert!(Notation::parse_coordinate("a7a8q").is_ok());
        assert!(Notation::parse_coordinate("a7a8n").is_err());
        assert!(Notation::parse_coordinate("e2").is_err());
        assert!(Notation::parse_coordinate("z9e4").is_err());
    }
}
