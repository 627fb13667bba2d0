// src/search/eval.rs
// Static evaluation: material, piece-square tables, a discrete king-table
// switch, bishop pair, isolated/passed pawns, and rook/queen file bonuses.
// Every term is computed once per color from color-relative accessors and
// combined as `white - black`, then negated for the side to move — this is
// what keeps `evaluate(pos) == -evaluate(mirror(pos))` true by construction.

use crate::board::{Board, Color, PieceType};
use crate::search::pesto;
use crate::square::Square;

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 330;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;

const BISHOP_PAIR_BONUS: i32 = 50;
const ISOLATED_PAWN_PENALTY: i32 = 15;
const OPEN_FILE_BONUS: i32 = 25;
const SEMI_OPEN_FILE_BONUS: i32 = 12;

/// Non-pawn material (in centipawns) below which a side is considered to be
/// in the endgame for king-table purposes. Chosen as roughly "two minor
/// pieces and a rook or less" remaining for the opponent.
const KING_ENDGAME_MATERIAL_THRESHOLD: i32 = ROOK_VALUE + BISHOP_VALUE;

const PASSED_PAWN_BONUS: [i32; 8] = [0, 10, 20, 40, 80, 150, 300, 0];

fn piece_value(piece_type: PieceType) -> i32 {
    match piece_type {
        PieceType::Pawn => PAWN_VALUE,
        PieceType::Knight => KNIGHT_VALUE,
        PieceType::Bishop => BISHOP_VALUE,
        PieceType::Rook => ROOK_VALUE,
        PieceType::Queen => QUEEN_VALUE,
        PieceType::King => 0,
    }
}

fn psqt_index(color: Color, sq64: u8) -> usize {
    match color {
        Color::White => sq64 as usize,
        Color::Black => (sq64 ^ 56) as usize,
    }
}

fn psqt_value(piece_type: PieceType, color: Color, sq64: u8, king_table: &[i32; 64]) -> i32 {
    let idx = psqt_index(color, sq64);
    match piece_type {
        PieceType::Pawn => pesto::PAWN_TABLE[idx],
        PieceType::Knight => pesto::KNIGHT_TABLE[idx],
        PieceType::Bishop => pesto::BISHOP_TABLE[idx],
        PieceType::Rook => pesto::ROOK_TABLE[idx],
        PieceType::Queen => pesto::QUEEN_TABLE[idx],
        PieceType::King => king_table[idx],
    }
}

fn non_pawn_material(board: &Board, color: Color) -> i32 {
    let ci = color as usize;
    let count = |pt: PieceType| board.piece_count[ci][pt as usize] as i32;
    count(PieceType::Knight) * KNIGHT_VALUE
        + count(PieceType::Bishop) * BISHOP_VALUE
        + count(PieceType::Rook) * ROOK_VALUE
        + count(PieceType::Queen) * QUEEN_VALUE
}

fn king_table_for(board: &Board, color: Color) -> &'static [i32; 64] {
    if non_pawn_material(board, color.opposite()) < KING_ENDGAME_MATERIAL_THRESHOLD {
        &pesto::KING_EG_TABLE
    } else {
        &pesto::KING_MG_TABLE
    }
}

fn material_and_psqt(board: &Board, color: Color) -> i32 {
    let king_table = king_table_for(board, color);
    let ci = color as usize;
    let mut score = 0;
    for &pt in &PieceType::ALL {
        let count = board.piece_count[ci][pt as usize] as usize;
        let value = piece_value(pt);
        for i in 0..count {
            let sq = board.piece_list[ci][pt as usize][i];
            let sq64 = sq.to64().expect("piece-list square is on-board");
            score += value + psqt_value(pt, color, sq64, king_table);
        }
    }
    score
}

fn bishop_pair_bonus(board: &Board, color: Color) -> i32 {
    let ci = color as usize;
    if board.piece_count[ci][PieceType::Bishop as usize] >= 2 {
        BISHOP_PAIR_BONUS
    } else {
        0
    }
}

fn pawn_files(board: &Board, color: Color) -> [u8; 8] {
    let ci = color as usize;
    let count = board.piece_count[ci][PieceType::Pawn as usize] as usize;
    let mut files = [0u8; 8];
    for i in 0..count {
        let sq = board.piece_list[ci][PieceType::Pawn as usize][i];
        files[sq.file() as usize] += 1;
    }
    files
}

fn isolated_pawn_penalty(own_files: &[u8; 8]) -> i32 {
    let mut penalty = 0;
    for file in 0..8usize {
        if own_files[file] == 0 {
            continue;
        }
        let left = file > 0 && own_files[file - 1] > 0;
        let right = file < 7 && own_files[file + 1] > 0;
        if !left && !right {
            penalty += ISOLATED_PAWN_PENALTY * own_files[file] as i32;
        }
    }
    penalty
}

fn passed_pawn_bonus(board: &Board, color: Color) -> i32 {
    let ci = color as usize;
    let enemy = color.opposite();
    let enemy_ci = enemy as usize;
    let count = board.piece_count[ci][PieceType::Pawn as usize] as usize;
    let enemy_count = board.piece_count[enemy_ci][PieceType::Pawn as usize] as usize;

    let mut bonus = 0;
    for i in 0..count {
        let sq = board.piece_list[ci][PieceType::Pawn as usize][i];
        let file = sq.file() as i16;
        let rank = sq.rank();

        let mut blocked = false;
        for j in 0..enemy_count {
            let esq = board.piece_list[enemy_ci][PieceType::Pawn as usize][j];
            let efile = esq.file() as i16;
            if (efile - file).abs() > 1 {
                continue;
            }
            let ahead = match color {
                Color::White => esq.rank() > rank,
                Color::Black => esq.rank() < rank,
            };
            if ahead {
                blocked = true;
                break;
            }
        }
        if !blocked {
            let rel_rank = match color {
                Color::White => rank,
                Color::Black => 7 - rank,
            };
            bonus += PASSED_PAWN_BONUS[rel_rank as usize];
        }
    }
    bonus
}

fn file_bonus(board: &Board, color: Color) -> i32 {
    let ci = color as usize;
    let own_files = pawn_files(board, color);
    let enemy_files = pawn_files(board, color.opposite());

    let mut bonus = 0;
    for &pt in &[PieceType::Rook, PieceType::Queen] {
        let count = board.piece_count[ci][pt as usize] as usize;
        for i in 0..count {
            let sq = board.piece_list[ci][pt as usize][i];
            let file = sq.file() as usize;
            if own_files[file] == 0 && enemy_files[file] == 0 {
                bonus += OPEN_FILE_BONUS;
            } else if own_files[file] == 0 {
                bonus += SEMI_OPEN_FILE_BONUS;
            }
        }
    }
    bonus
}

fn side_score(board: &Board, color: Color) -> i32 {
    material_and_psqt(board, color)
        + bishop_pair_bonus(board, color)
        - isolated_pawn_penalty(&pawn_files(board, color))
        + passed_pawn_bonus(board, color)
        + file_bonus(board, color)
}

fn is_insufficient_material(board: &Board) -> bool {
    let has_major_or_pawn = |c: Color| {
        let ci = c as usize;
        board.piece_count[ci][PieceType::Pawn as usize] > 0
            || board.piece_count[ci][PieceType::Rook as usize] > 0
            || board.piece_count[ci][PieceType::Queen as usize] > 0
    };
    if has_major_or_pawn(Color::White) || has_major_or_pawn(Color::Black) {
        return false;
    }

    let minors = |c: Color| {
        let ci = c as usize;
        board.piece_count[ci][PieceType::Knight as usize] as i32
            + board.piece_count[ci][PieceType::Bishop as usize] as i32
    };
    let w_minors = minors(Color::White);
    let b_minors = minors(Color::Black);

    // KvK, K+minor vK, K+minor vK+minor are all insufficient; anything with
    // two-or-more minors on one side can (in principle) mate, except the
    // well-known KBNvKB drawing subset named in the glossary.
    if w_minors <= 1 && b_minors <= 1 {
        return true;
    }
    let bishop_knight_vs_bishop = |major: Color, minor: Color| {
        let mci = major as usize;
        board.piece_count[mci][PieceType::Bishop as usize] == 1
            && board.piece_count[mci][PieceType::Knight as usize] == 1
            && board.piece_count[minor as usize][PieceType::Bishop as usize] == 1
            && board.piece_count[minor as usize][PieceType::Knight as usize] == 0
    };
    bishop_knight_vs_bishop(Color::White, Color::Black)
        || bishop_knight_vs_bishop(Color::Black, Color::White)
}

/// Centipawn score from the side-to-move's perspective. Positive favors the
/// mover.
pub fn evaluate(board: &Board) -> i32 {
    if is_insufficient_material(board) {
        return 0;
    }

    let score = side_score(board, Color::White) - side_score(board, Color::Black);
    match board.side_to_move {
        Color::White => score,
        Color::Black => -score,
    }
}
