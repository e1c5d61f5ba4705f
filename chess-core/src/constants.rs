//! 规则常量定义

/// 棋盘边长（行数与列数相同）
pub const BOARD_SIZE: usize = 8;

/// 白方底线所在行（第 1 横线）
pub const WHITE_BACK_ROW: u8 = 7;

/// 黑方底线所在行（第 8 横线）
pub const BLACK_BACK_ROW: u8 = 0;

/// 白兵起始行
pub const WHITE_PAWN_ROW: u8 = 6;

/// 黑兵起始行
pub const BLACK_PAWN_ROW: u8 = 1;

/// 王的初始列（e 线）
pub const KING_START_COL: u8 = 4;

/// 王翼车的初始列（h 线）
pub const KINGSIDE_ROOK_COL: u8 = 7;

/// 后翼车的初始列（a 线）
pub const QUEENSIDE_ROOK_COL: u8 = 0;

/// 短易位后车落点列（f 线）
pub const KINGSIDE_ROOK_TARGET_COL: u8 = 5;

/// 长易位后车落点列（d 线）
pub const QUEENSIDE_ROOK_TARGET_COL: u8 = 3;

/// 短易位后王落点列（g 线）
pub const KINGSIDE_KING_TARGET_COL: u8 = 6;

/// 长易位后王落点列（c 线）
pub const QUEENSIDE_KING_TARGET_COL: u8 = 2;
