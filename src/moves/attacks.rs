// src/moves/attacks.rs
// Square-attacked queries via mailbox ray-scanning: walk each direction from
// the target square until an off-board sentinel or an occupied cell stops
// the ray, instead of precomputed sliding-attack tables.

use crate::board::{Board, Color, PieceType};
use crate::square::{Square, offsets};

/// True if any `attacker`-colored piece pseudo-legally attacks `sq`.
pub fn is_square_attacked(board: &Board, sq: Square, attacker: Color) -> bool {
    // Pawns: look from `sq` backwards along the attacker's capture offsets —
    // if an attacker pawn sits there, it attacks `sq`.
    let pawn_offsets = offsets::PAWN_CAPTURE[attacker as usize];
    for &delta in &pawn_offsets {
        let from = sq.offset(-delta);
        let piece = board.piece_at(from);
        if piece.color_of() == Some(attacker) && piece.type_of() == Some(PieceType::Pawn) {
            return true;
        }
    }

    for &delta in &offsets::KNIGHT {
        let from = sq.offset(delta);
        let piece = board.piece_at(from);
        if piece.color_of() == Some(attacker) && piece.type_of() == Some(PieceType::Knight) {
            return true;
        }
    }

    for &delta in &offsets::KING {
        let from = sq.offset(delta);
        let piece = board.piece_at(from);
        if piece.color_of() == Some(attacker) && piece.type_of() == Some(PieceType::King) {
            return true;
        }
    }

    if ray_hits(board, sq, attacker, &offsets::BISHOP, PieceType::Bishop, PieceType::Queen) {
        return true;
    }
    if ray_hits(board, sq, attacker, &offsets::ROOK, PieceType::Rook, PieceType::Queen) {
        return true;
    }

    false
}

/// Walks each direction in `dirs` from `sq` until it hits an off-board cell
/// (stop) or an occupied one (stop, and check whether it's an attacker whose
/// type matches `slider` or `also`).
fn ray_hits(
    board: &Board,
    sq: Square,
    attacker: Color,
    dirs: &[i8],
    slider: PieceType,
    also: PieceType,
) -> bool {
    for &delta in dirs {
        let mut cur = sq.offset(delta);
        loop {
            let piece = board.piece_at(cur);
            if piece.is_offboard() {
                break;
            }
            if piece.is_none() {
                cur = cur.offset(delta);
                continue;
            }
            if piece.color_of() == Some(attacker) {
                let pt = piece.type_of().expect("occupied, non-offboard cell has a type");
                if pt == slider || pt == also {
                    return true;
                }
            }
            break;
        }
    }
    false
}

#[inline]
pub fn in_check(board: &Board, side: Color) -> bool {
    is_square_attacked(board, board.king_square(side), side.opposite())
}

/// Checks the king-path-clear side-condition for castling: none of the
/// start/transit/landing squares may be attacked, and the king may not
/// already be in check. Rook path emptiness is checked by the move
/// generator before this is ever called.
pub fn is_legal_castling(board: &Board, color: Color, kingside: bool) -> bool {
    if in_check(board, color) {
        return false;
    }

    let rank = match color {
        Color::White => 0,
        Color::Black => 7,
    };
    let squares: [Square; 3] = if kingside {
        [
            Square::from_file_rank(4, rank),
            Square::from_file_rank(5, rank),
            Square::from_file_rank(6, rank),
        ]
    } else {
        [
            Square::from_file_rank(4, rank),
            Square::from_file_rank(3, rank),
            Square::from_file_rank(2, rank),
        ]
    };

    let opp = color.opposite();
    squares.iter().all(|&sq| !is_square_attacked(board, sq, opp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_e1_not_attacked() {
        let board = Board::new();
        assert!(!is_square_attacked(&board, "e1".parse().unwrap(), Color::Black));
    }

    #[test]
    fn knight_attacks_f3_from_g1() {
        let board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
            .parse()
            .unwrap();
        assert!(is_square_attacked(&board, "f3".parse().unwrap(), Color::White));
        assert!(is_square_attacked(&board, "h3".parse().unwrap(), Color::White));
    }

    #[test]
    fn bishop_attack_through_open_diagonal() {
        let board: Board = "4k3/8/8/8/8/8/6B1/4K3 w - - 0 1".parse().unwrap();
        assert!(is_square_attacked(&board, "a8".parse().unwrap(), Color::White));
    }

    #[test]
    fn bishop_attack_blocked_by_piece() {
        let board: Board = "4k3/8/4p3/8/8/8/6B1/4K3 w - - 0 1".parse().unwrap();
        assert!(!is_square_attacked(&board, "a8".parse().unwrap(), Color::White));
    }

    #[test]
    fn rook_attacks_along_rank() {
        let board: Board = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
        assert!(is_square_attacked(&board, "d1".parse().unwrap(), Color::White));
    }

    #[test]
    fn queen_checks_king_in_check() {
        let board: Board = "4k3/8/8/8/8/8/8/4K2q b - - 0 1".parse().unwrap();
        assert!(is_square_attacked(&board, "e1".parse().unwrap(), Color::Black));
        assert!(in_check(&board, Color::White));
    }

    #[test]
    fn castling_blocked_when_path_attacked() {
        let board: Board = "4k3/8/8/8/8/5r2/8/4K2R w K - 0 1".parse().unwrap();
        assert!(!is_legal_castling(&board, Color::White, true));
    }

    #[test]
    fn castling_allowed_when_path_clear() {
        let board: Board = "4k3/8/8/8/8/8/8/4K2R w K - 0 1".parse().unwrap();
        assert!(is_legal_castling(&board, Color::White, true));
    }
}
