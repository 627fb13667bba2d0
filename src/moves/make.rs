// src/moves/make.rs
// Make/unmake protocol. Board owns the undo stack (`history: Vec<HistoryEntry>`);
// each entry carries everything needed to restore prior state, including the
// exact pre-move Zobrist hash, so unmake never has to manually reverse the
// incremental hash updates made during make.

use crate::board::castle_bits::*;
use crate::board::{Board, Color, HistoryEntry, Piece, PieceType};
use crate::hash::zobrist::{ep_file_to_hash, xor_castling_rights_delta, zobrist_keys};
use crate::moves::types::Move;
use crate::square::{Square, offsets};

fn rook_castle_squares(king_to: Square) -> (Square, Square) {
    let rank = king_to.rank();
    if king_to.file() == 6 {
        (Square::from_file_rank(7, rank), Square::from_file_rank(5, rank))
    } else {
        (Square::from_file_rank(0, rank), Square::from_file_rank(3, rank))
    }
}

fn rook_right_mask(color: Color, sq: Square) -> u8 {
    match (color, sq.file(), sq.rank()) {
        (Color::White, 0, 0) => CASTLE_WQ,
        (Color::White, 7, 0) => CASTLE_WK,
        (Color::Black, 0, 7) => CASTLE_BQ,
        (Color::Black, 7, 7) => CASTLE_BK,
        _ => 0,
    }
}

/// Applies `mv` to `board` and pushes an undo entry. Assumes `mv` is at
/// least pseudo-legal; legality (own king left in check) is the caller's
/// concern (see `moves::movegen::generate_legal_moves`).
pub fn make_move(board: &mut Board, mv: Move) {
    let start_zobrist = board.zobrist;
    let color = board.side_to_move;
    let moved_piece = board.piece_at(mv.from);
    let moved_type = moved_piece
        .type_of()
        .expect("make_move: mv.from must hold a piece of the side to move");

    if let Some(f) = ep_file_to_hash(board) {
        board.zobrist ^= zobrist_keys().ep_file[f as usize];
    }
    let prev_en_passant = board.en_passant;
    let prev_castling = board.castling_rights;
    let prev_halfmove = board.halfmove_clock;
    let prev_fullmove = board.fullmove_number;
    board.en_passant = None;

    let captured = if mv.is_en_passant() {
        let cap_sq = mv.to.offset(-offsets::PAWN_PUSH[color as usize]);
        board.remove_piece(cap_sq)
    } else {
        board.remove_piece(mv.to)
    };

    let mut mask_to_clear = 0u8;
    if moved_type == PieceType::King {
        mask_to_clear |= match color {
            Color::White => CASTLE_WK | CASTLE_WQ,
            Color::Black => CASTLE_BK | CASTLE_BQ,
        };
    }
    if moved_type == PieceType::Rook {
        mask_to_clear |= rook_right_mask(color, mv.from);
    }
    if let Some(PieceType::Rook) = captured.type_of() {
        mask_to_clear |= rook_right_mask(color.opposite(), mv.to);
    }
    let new_castling = prev_castling & !mask_to_clear;
    if new_castling != prev_castling {
        xor_castling_rights_delta(&mut board.zobrist, zobrist_keys(), prev_castling, new_castling);
        board.castling_rights = new_castling;
    }

    board.remove_piece(mv.from);
    if let Some(promoted) = mv.promoted {
        board.place_piece(mv.to, Piece::from_color_type(color, promoted));
    } else {
        board.place_piece(mv.to, moved_piece);
    }

    if mv.is_castle() {
        let (rook_from, rook_to) = rook_castle_squares(mv.to);
        let rook = board.remove_piece(rook_from);
        board.place_piece(rook_to, rook);
    }

    if moved_type == PieceType::Pawn && mv.is_pawn_start() {
        board.en_passant = Some(mv.from.offset(offsets::PAWN_PUSH[color as usize]));
    }

    board.halfmove_clock = if !captured.is_none() || moved_type == PieceType::Pawn {
        0
    } else {
        prev_halfmove + 1
    };
    if color == Color::Black {
        board.fullmove_number = prev_fullmove + 1;
    }

    board.side_to_move = color.opposite();
    board.zobrist ^= zobrist_keys().side_to_move;
    if let Some(f) = ep_file_to_hash(board) {
        board.zobrist ^= zobrist_keys().ep_file[f as usize];
    } else {
        // No enemy pawn can actually capture onto the crossed square (or
        // there was no double push this ply): the stored ep square must be
        // absent, not just excluded from the hash.
        board.en_passant = None;
    }

    board.repetition_trail.push(start_zobrist);
    board.ply += 1;
    board.history.push(HistoryEntry {
        mv,
        castling_rights: prev_castling,
        en_passant: prev_en_passant,
        halfmove_clock: prev_halfmove,
        fullmove_number: prev_fullmove,
        captured,
        zobrist: start_zobrist,
    });

    #[cfg(all(debug_assertions, feature = "paranoid_hash"))]
    board.assert_hash();
}

/// Pops the most recent undo entry and restores `board` to the position
/// before that move. Panics if called with no moves on the stack.
pub fn undo_move(board: &mut Board) {
    let entry = board.history.pop().expect("undo_move: history stack is empty");
    board.repetition_trail.pop();
    board.ply -= 1;

    board.side_to_move = board.side_to_move.opposite();
    let mover = board.side_to_move;
    let mv = entry.mv;

    if let Some(promoted) = mv.promoted {
        let taken = board.remove_piece(mv.to);
        debug_assert_eq!(taken.type_of(), Some(promoted));
        board.place_piece(mv.from, Piece::from_color_type(mover, PieceType::Pawn));
    } else {
        let moved = board.remove_piece(mv.to);
        board.place_piece(mv.from, moved);
    }

    if mv.is_castle() {
        let (rook_from, rook_to) = rook_castle_squares(mv.to);
        let rook = board.remove_piece(rook_to);
        board.place_piece(rook_from, rook);
    }

    if let Some(cap_type) = entry.captured.type_of() {
        let cap_color = mover.opposite();
        let cap_sq = if mv.is_en_passant() {
            mv.to.offset(-offsets::PAWN_PUSH[mover as usize])
        } else {
            mv.to
        };
        board.place_piece(cap_sq, Piece::from_color_type(cap_color, cap_type));
    }

    board.castling_rights = entry.castling_rights;
    board.en_passant = entry.en_passant;
    board.halfmove_clock = entry.halfmove_clock;
    board.fullmove_number = entry.fullmove_number;
    board.zobrist = entry.zobrist;

    #[cfg(all(debug_assertions, feature = "paranoid_hash"))]
    board.assert_hash();
}

pub struct NullMoveUndo {
    prev_en_passant: Option<Square>,
    prev_halfmove_clock: u32,
}

/// Passes the move without moving a piece, for null-move pruning. Illegal
/// while in check; the caller (`search::search`) is responsible for that check.
pub fn make_null_move(board: &mut Board) -> NullMoveUndo {
    let start_zobrist = board.zobrist;
    let undo = NullMoveUndo {
        prev_en_passant: board.en_passant,
        prev_halfmove_clock: board.halfmove_clock,
    };

    if let Some(f) = ep_file_to_hash(board) {
        board.zobrist ^= zobrist_keys().ep_file[f as usize];
    }
    board.en_passant = None;
    board.side_to_move = board.side_to_move.opposite();
    board.zobrist ^= zobrist_keys().side_to_move;

    board.repetition_trail.push(start_zobrist);
    board.ply += 1;
    undo
}

pub fn undo_null_move(board: &mut Board, undo: NullMoveUndo) {
    board.repetition_trail.pop();
    board.ply -= 1;

    board.side_to_move = board.side_to_move.opposite();
    board.zobrist ^= zobrist_keys().side_to_move;
    board.en_passant = undo.prev_en_passant;
    if let Some(f) = ep_file_to_hash(board) {
        board.zobrist ^= zobrist_keys().ep_file[f as usize];
    }
    board.halfmove_clock = undo.prev_halfmove_clock;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::movegen::generate_legal_moves;
    use crate::moves::types::MoveList;

    fn find(board: &mut Board, uci: &str) -> Move {
        let mut moves = MoveList::new();
        generate_legal_moves(board, &mut moves);
        moves
            .into_iter()
            .find(|m| m.to_uci() == uci)
            .unwrap_or_else(|| panic!("no legal move {uci} in {}", board.to_fen()))
    }

    #[test]
    fn make_unmake_restores_startpos() {
        let mut board = Board::new();
        let before = board.to_fen();
        let mv = find(&mut board, "e2e4");
        make_move(&mut board, mv);
        assert_ne!(board.to_fen(), before);
        undo_move(&mut board);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn en_passant_capture_removes_correct_pawn() {
        let mut board: Board = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"
            .parse()
            .unwrap();
        let before = board.to_fen();
        let mv = find(&mut board, "e5d6");
        assert!(mv.is_en_passant());
        make_move(&mut board, mv);
        assert!(board.piece_at("d5".parse().unwrap()).is_none());
        assert!(board.piece_at("d6".parse().unwrap()) == Piece::WP);
        undo_move(&mut board);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn castling_moves_the_rook_too() {
        let mut board: Board = "4k3/8/8/8/8/8/8/4K2R w K - 0 1".parse().unwrap();
        let before = board.to_fen();
        let mv = find(&mut board, "e1g1");
        assert!(mv.is_castle());
        make_move(&mut board, mv);
        assert_eq!(board.piece_at("f1".parse().unwrap()), Piece::WR);
        assert_eq!(board.piece_at("h1".parse().unwrap()), Piece::None);
        undo_move(&mut board);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn promotion_round_trips() {
        let mut board: Board = "8/P3k3/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let before = board.to_fen();
        let mv = find(&mut board, "a7a8q");
        make_move(&mut board, mv);
        assert_eq!(board.piece_at("a8".parse().unwrap()), Piece::WQ);
        undo_move(&mut board);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn null_move_round_trips() {
        let mut board = Board::new();
        let before = board.to_fen();
        let original_side = board.side_to_move;
        let undo = make_null_move(&mut board);
        assert_eq!(board.side_to_move, original_side.opposite());
        undo_null_move(&mut board, undo);
        assert_eq!(board.to_fen(), before);
    }
}
