// src/moves/perft.rs
// Node-count move-generator verification, with an optional breakdown by
// move category for cross-checking against published perft tables.

use crate::board::Board;
use crate::moves::attacks::in_check;
use crate::moves::make::{make_move, undo_move};
use crate::moves::movegen::generate_legal_moves;
use crate::moves::types::Move;
use tracing::{debug, instrument};

const MAX_LOG_DEPTH: u32 = 3;

#[derive(Debug, Default)]
pub struct PerftCounters {
    pub nodes: u64,
    pub captures: u64,
    pub ep_captures: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounters {
    pub fn add(&mut self, o: &PerftCounters) {
        self.nodes += o.nodes;
        self.captures += o.captures;
        self.ep_captures += o.ep_captures;
        self.castles += o.castles;
        self.promotions += o.promotions;
        self.checks += o.checks;
        self.checkmates += o.checkmates;
    }
}

fn perft_recursive(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = crate::moves::types::MoveList::new();
    generate_legal_moves(board, &mut moves);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        make_move(board, mv);
        nodes += perft_recursive(board, depth - 1);
        undo_move(board);
    }
    nodes
}

#[instrument(skip(board), fields(depth))]
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    perft_recursive(board, depth)
}

#[instrument(skip(board), fields(depth))]
pub fn perft_divide(board: &mut Board, depth: u32) -> u64 {
    let mut moves = crate::moves::types::MoveList::new();
    generate_legal_moves(board, &mut moves);

    if depth <= MAX_LOG_DEPTH {
        debug!(depth, moves = moves.len(), "divide: root legal moves");
    }

    let mut total = 0u64;
    for mv in moves {
        make_move(board, mv);
        let count = if depth == 1 { 1 } else { perft_recursive(board, depth - 1) };
        undo_move(board);

        println!("{mv}: {count}");
        total += count;
    }

    debug!(depth, total, "divide: total");
    println!("Total: {total}");
    total
}

fn perft_count_recursive(board: &mut Board, depth: u32, out: &mut PerftCounters) {
    if depth == 0 {
        out.nodes += 1;
        let side_in_check = in_check(board, board.side_to_move);
        if side_in_check {
            out.checks += 1;
        }
        let mut moves = crate::moves::types::MoveList::new();
        generate_legal_moves(board, &mut moves);
        if moves.is_empty() && side_in_check {
            out.checkmates += 1;
        }
        return;
    }

    let mut moves = crate::moves::types::MoveList::new();
    generate_legal_moves(board, &mut moves);

    for mv in moves {
        if mv.is_capture() {
            out.captures += 1;
            if mv.is_en_passant() {
                out.ep_captures += 1;
            }
        }
        if mv.is_castle() {
            out.castles += 1;
        }
        if mv.is_promotion() {
            out.promotions += 1;
        }

        #[cfg(debug_assertions)]
        let z0 = board.zobrist;

        make_move(board, mv);
        perft_count_recursive(board, depth - 1, out);
        undo_move(board);

        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(board.zobrist, z0, "zobrist changed across make/undo");
            debug_assert_eq!(board.compute_zobrist_full(), board.zobrist, "full recompute mismatch");
        }
    }
}

pub fn perft_count_with_breakdown(board: &mut Board, depth: u32, out: &mut PerftCounters) {
    perft_count_recursive(board, depth, out);
}

pub fn perft_divide_with_breakdown(board: &mut Board, depth: u32) -> Vec<(Move, PerftCounters)> {
    let mut moves = crate::moves::types::MoveList::new();
    generate_legal_moves(board, &mut moves);

    let mut out = Vec::with_capacity(moves.len());
    for mv in moves {
        make_move(board, mv);
        let mut pc = PerftCounters::default();
        if depth > 1 {
            perft_count_recursive(board, depth - 1, &mut pc);
        } else {
            pc.nodes = 1;
        }
        undo_move(board);
        out.push((mv, pc));
    }
    out
}
