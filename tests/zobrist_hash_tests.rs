//! Board-level zobrist behavior. Key-table generation and the castling-delta
//! helper have their own unit tests in `hash/zobrist.rs`; make/undo
//! incremental-vs-full-recompute parity is fuzzed in perft_tests.rs. This
//! file covers hash semantics that depend on board state: FEN round-trips,
//! castling-rights sensitivity, the relaxed en passant hashing rule, and
//! promotion.
use huginn::board::Board;
use huginn::hash::zobrist::ep_file_to_hash;
use huginn::moves::make::{make_move, undo_move};
use huginn::moves::movegen::generate_legal_moves;
use huginn::moves::types::{Move, MoveList};
use std::str::FromStr;

fn find(board: &mut Board, uci: &str) -> Move {
    let mut moves = MoveList::new();
    generate_legal_moves(board, &mut moves);
    moves
        .into_iter()
        .find(|m| m.to_uci() == uci)
        .unwrap_or_else(|| panic!("no legal move {uci} in {}", board.to_fen()))
}

#[test]
fn start_position_hash_is_stable_across_reparse() {
    let a = Board::new();
    let b = Board::from_str(&a.to_fen()).unwrap();
    assert_eq!(a.zobrist, b.zobrist);
    assert_eq!(a.zobrist, a.compute_zobrist_full());
}

#[test]
fn differing_castling_rights_change_the_hash_for_an_identical_board() {
    let full_rights = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let no_rights = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
    assert_ne!(full_rights.zobrist, no_rights.zobrist);
}

#[test]
fn ep_square_only_hashes_when_a_pawn_can_actually_capture_it() {
    // Black pawn on d5 can capture the double-pushed pawn that just landed
    // on e5, so the ep file must contribute to the hash.
    let capturable =
        Board::from_str("rnbqkbnr/pp1ppppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR b KQkq e6 0 2").unwrap();
    assert_eq!(ep_file_to_hash(&capturable), Some(4));

    // Same ep rank, but no black pawn adjacent to the target file: must not
    // contribute to the hash even though the FEN records the square.
    let not_capturable =
        Board::from_str("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR b KQkq d6 0 2").unwrap();
    assert_eq!(ep_file_to_hash(&not_capturable), None);
}

#[test]
fn castling_rights_are_revoked_when_the_rook_that_grants_them_moves() {
    let mut b = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let before = b.zobrist;

    let mv = find(&mut b, "h1g1");
    make_move(&mut b, mv);
    assert_ne!(b.zobrist, before, "losing kingside rights must change the hash");
    assert_eq!(b.zobrist, b.compute_zobrist_full());

    undo_move(&mut b);
    assert_eq!(b.zobrist, before, "undo restores both the position and its rights");
}

#[test]
fn promoting_a_pawn_produces_a_hash_consistent_with_a_full_recompute() {
    let mut b = Board::from_str("n6k/P7/8/8/8/8/8/7K w - - 0 1").unwrap();
    let before = b.zobrist;
    let mv = find(&mut b, "a7a8q");
    make_move(&mut b, mv);
    assert_ne!(b.zobrist, before);
    assert_eq!(b.zobrist, b.compute_zobrist_full());

    undo_move(&mut b);
    assert_eq!(b.zobrist, before);
}

#[test]
fn identical_placement_with_different_side_to_move_hashes_differently() {
    let white_to_move = Board::from_str("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let black_to_move = Board::from_str("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
    assert_ne!(white_to_move.zobrist, black_to_move.zobrist);
}
