// src/moves/movegen.rs
// Pseudo-legal move generation by ray-scanning the mailbox board, plus the
// legal-move filter (generate pseudo-legal, then trial make/unmake each one).

use crate::board::{Board, Color, PieceType};
use crate::moves::attacks::{in_check, is_legal_castling};
use crate::moves::make::{make_move, undo_move};
use crate::moves::types::{FLAG_CAPTURE, FLAG_CASTLE, FLAG_EN_PASSANT, FLAG_PAWN_START, Move, MoveList};
use crate::square::{Square, offsets};

const PROMOTIONS: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

fn push_quiet(moves: &mut MoveList, from: Square, to: Square, flags: u8) {
    moves.push(Move {
        from,
        to,
        captured: None,
        promoted: None,
        flags,
        score: 0,
    });
}

fn push_capture(moves: &mut MoveList, from: Square, to: Square, captured: PieceType, flags: u8) {
    moves.push(Move {
        from,
        to,
        captured: Some(captured),
        promoted: None,
        flags: flags | FLAG_CAPTURE,
        score: 0,
    });
}

fn push_promotions(moves: &mut MoveList, from: Square, to: Square, captured: Option<PieceType>) {
    let flags = if captured.is_some() { FLAG_CAPTURE } else { 0 };
    for &promo in &PROMOTIONS {
        moves.push(Move {
            from,
            to,
            captured,
            promoted: Some(promo),
            flags,
            score: 0,
        });
    }
}

fn generate_pawn_moves(board: &Board, color: Color, moves: &mut MoveList, captures_only: bool) {
    let push_delta = offsets::PAWN_PUSH[color as usize];
    let double_delta = offsets::PAWN_DOUBLE_PUSH[color as usize];
    let capture_deltas = offsets::PAWN_CAPTURE[color as usize];
    let start_rank = if color == Color::White { 1 } else { 6 };
    let promo_rank = if color == Color::White { 7 } else { 0 };

    let ci = color as usize;
    let count = board.piece_count[ci][PieceType::Pawn as usize] as usize;
    for i in 0..count {
        let from = board.piece_list[ci][PieceType::Pawn as usize][i];

        if !captures_only {
            let one = from.offset(push_delta);
            if board.piece_at(one).is_none() {
                if one.rank() == promo_rank {
                    push_promotions(moves, from, one, None);
                } else {
                    push_quiet(moves, from, one, 0);
                    if from.rank() == start_rank {
                        let two = from.offset(double_delta);
                        if board.piece_at(two).is_none() {
                            push_quiet(moves, from, two, FLAG_PAWN_START);
                        }
                    }
                }
            }
        }

        for &delta in &capture_deltas {
            let to = from.offset(delta);
            let target = board.piece_at(to);
            if target.is_offboard() {
                continue;
            }
            if let Some(victim_color) = target.color_of() {
                if victim_color != color {
                    let victim_type = target.type_of().unwrap();
                    if to.rank() == promo_rank {
                        push_promotions(moves, from, to, Some(victim_type));
                    } else {
                        push_capture(moves, from, to, victim_type, 0);
                    }
                }
                continue;
            }
            if Some(to) == board.en_passant {
                moves.push(Move {
                    from,
                    to,
                    captured: Some(PieceType::Pawn),
                    promoted: None,
                    flags: FLAG_CAPTURE | FLAG_EN_PASSANT,
                    score: 0,
                });
            }
        }
    }
}

fn generate_stepper_moves(
    board: &Board,
    color: Color,
    piece_type: PieceType,
    deltas: &[i8],
    moves: &mut MoveList,
    captures_only: bool,
) {
    let ci = color as usize;
    let ti = piece_type as usize;
    let count = board.piece_count[ci][ti] as usize;
    for i in 0..count {
        let from = board.piece_list[ci][ti][i];
        for &delta in deltas {
            let to = from.offset(delta);
            let target = board.piece_at(to);
            if target.is_offboard() {
                continue;
            }
            match target.color_of() {
                None => {
                    if !captures_only {
                        push_quiet(moves, from, to, 0);
                    }
                }
                Some(victim_color) if victim_color != color => {
                    push_capture(moves, from, to, target.type_of().unwrap(), 0);
                }
                _ => {}
            }
        }
    }
}

fn generate_slider_moves(
    board: &Board,
    color: Color,
    piece_type: PieceType,
    dirs: &[i8],
    moves: &mut MoveList,
    captures_only: bool,
) {
    let ci = color as usize;
    let ti = piece_type as usize;
    let count = board.piece_count[ci][ti] as usize;
    for i in 0..count {
        let from = board.piece_list[ci][ti][i];
        for &delta in dirs {
            let mut to = from.offset(delta);
            loop {
                let target = board.piece_at(to);
                if target.is_offboard() {
                    break;
                }
                match target.color_of() {
                    None => {
                        if !captures_only {
                            push_quiet(moves, from, to, 0);
                        }
                        to = to.offset(delta);
                        continue;
                    }
                    Some(victim_color) if victim_color != color => {
                        push_capture(moves, from, to, target.type_of().unwrap(), 0);
                    }
                    _ => {}
                }
                break;
            }
        }
    }
}

fn generate_castling(board: &Board, color: Color, moves: &mut MoveList) {
    use crate::board::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
    let rank = if color == Color::White { 0 } else { 7 };
    let king_from = Square::from_file_rank(4, rank);

    let (kingside_flag, queenside_flag) = if color == Color::White {
        (CASTLE_WK, CASTLE_WQ)
    } else {
        (CASTLE_BK, CASTLE_BQ)
    };

    if board.has_castling(kingside_flag) {
        let f = Square::from_file_rank(5, rank);
        let g = Square::from_file_rank(6, rank);
        if board.piece_at(f).is_none()
            && board.piece_at(g).is_none()
            && is_legal_castling(board, color, true)
        {
            push_quiet(moves, king_from, g, FLAG_CASTLE);
        }
    }

    if board.has_castling(queenside_flag) {
        let d = Square::from_file_rank(3, rank);
        let c = Square::from_file_rank(2, rank);
        let b = Square::from_file_rank(1, rank);
        if board.piece_at(d).is_none()
            && board.piece_at(c).is_none()
            && board.piece_at(b).is_none()
            && is_legal_castling(board, color, false)
        {
            push_quiet(moves, king_from, c, FLAG_CASTLE);
        }
    }
}

fn generate_internal(board: &Board, moves: &mut MoveList, captures_only: bool) {
    moves.clear();
    let color = board.side_to_move;

    generate_pawn_moves(board, color, moves, captures_only);
    generate_stepper_moves(board, color, PieceType::Knight, &offsets::KNIGHT, moves, captures_only);
    generate_slider_moves(board, color, PieceType::Bishop, &offsets::BISHOP, moves, captures_only);
    generate_slider_moves(board, color, PieceType::Rook, &offsets::ROOK, moves, captures_only);
    generate_slider_moves(board, color, PieceType::Queen, &offsets::BISHOP, moves, captures_only);
    generate_slider_moves(board, color, PieceType::Queen, &offsets::ROOK, moves, captures_only);
    generate_stepper_moves(board, color, PieceType::King, &offsets::KING, moves, captures_only);
    if !captures_only {
        generate_castling(board, color, moves);
    }
}

/// All pseudo-legal moves for the side to move: quiets, captures, promotions,
/// en passant, castling. Does not check for leaving one's own king in check.
pub fn generate_all_moves(board: &Board, moves: &mut MoveList) {
    generate_internal(board, moves, false);
}

/// Pseudo-legal captures and capture-promotions only, for quiescence search.
pub fn generate_all_captures(board: &Board, moves: &mut MoveList) {
    generate_internal(board, moves, true);
}

fn leaves_own_king_safe(board: &mut Board, mv: Move) -> bool {
    let mover = board.side_to_move;
    make_move(board, mv);
    let safe = !in_check(board, mover);
    undo_move(board);
    safe
}

/// Pseudo-legal moves filtered down to legal ones by a trial make/unmake of
/// each candidate — simple and unconditionally correct, at the cost of a
/// full `is_square_attacked` scan per candidate move.
pub fn generate_legal_moves(board: &mut Board, moves: &mut MoveList) {
    let mut pseudo = MoveList::new();
    generate_all_moves(board, &mut pseudo);
    moves.clear();
    for mv in pseudo {
        if leaves_own_king_safe(board, mv) {
            moves.push(mv);
        }
    }
}

pub fn is_legal_move(board: &mut Board, mv: Move) -> bool {
    leaves_own_king_safe(board, mv)
}
