// src/search/search.rs
// Iterative-deepening alpha-beta over the mailbox position, with a
// transposition table, null-move pruning, a check extension, and
// MVV-LVA/killer/history move ordering. Pruning is deliberately limited to
// what is named explicitly: no RFP/futility/LMP/LMR/aspiration windows.

use crate::board::Board;
use crate::moves::attacks::in_check;
use crate::moves::make::{make_move, make_null_move, undo_move, undo_null_move};
use crate::moves::movegen::{generate_all_moves, generate_legal_moves, is_legal_move};
use crate::moves::types::{Move, MoveList};
use crate::search::context::{SearchContext, MAX_PLY};
use crate::search::eval::evaluate;
use crate::search::picker::{pick_best, score_moves};
use crate::search::tt::{Bound, TranspositionTable};
use std::time::{Duration, Instant};
use tracing::debug;

pub const INF: i32 = 32_000;
pub const MATE_SCORE: i32 = 31_000;
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;
const DRAW_SCORE: i32 = 0;
const NODE_POLL_MASK: u64 = 2047;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Running,
    Stopping,
}

pub struct SearchLimits {
    pub max_depth: i32,
    pub movetime: Option<Duration>,
    pub infinite: bool,
}

impl SearchLimits {
    pub fn depth(max_depth: i32) -> Self {
        Self { max_depth, movetime: None, infinite: false }
    }

    pub fn time(max_depth: i32, movetime: Duration) -> Self {
        Self { max_depth, movetime: Some(movetime), infinite: false }
    }
}

/// Ephemeral context threaded through recursive search calls. `poll` is the
/// asynchronous input check (e.g. "did the GUI send `stop`?"); it is called
/// alongside the clock check every [`NODE_POLL_MASK`] nodes.
pub struct SearchInfo<'a> {
    pub start_time: Instant,
    pub movetime: Option<Duration>,
    pub max_depth: i32,
    pub node_count: u64,
    pub state: SearchState,
    pub quit: bool,
    pub infinite: bool,
    pub fail_high_count: u64,
    pub fail_high_first_count: u64,
    pub null_cut_count: u64,
    poll: Option<&'a mut dyn FnMut() -> bool>,
}

impl<'a> SearchInfo<'a> {
    pub fn new(limits: &SearchLimits, poll: Option<&'a mut dyn FnMut() -> bool>) -> Self {
        Self {
            start_time: Instant::now(),
            movetime: limits.movetime,
            max_depth: limits.max_depth,
            node_count: 0,
            state: SearchState::Running,
            quit: false,
            infinite: limits.infinite,
            fail_high_count: 0,
            fail_high_first_count: 0,
            null_cut_count: 0,
            poll,
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.state == SearchState::Stopping {
            return true;
        }
        if !self.infinite {
            if let Some(limit) = self.movetime {
                if self.start_time.elapsed() >= limit {
                    self.state = SearchState::Stopping;
                    return true;
                }
            }
        }
        if let Some(poll) = self.poll.as_deref_mut() {
            if poll() {
                self.state = SearchState::Stopping;
                return true;
            }
        }
        false
    }

    fn poll_at_node_boundary(&mut self) -> bool {
        self.node_count += 1;
        if self.node_count & NODE_POLL_MASK == 0 {
            self.should_stop()
        } else {
            self.state == SearchState::Stopping
        }
    }
}

fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

pub fn quiescence(board: &mut Board, info: &mut SearchInfo, mut alpha: i32, beta: i32) -> i32 {
    if info.poll_at_node_boundary() {
        return evaluate(board);
    }

    let stand_pat = evaluate(board);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut moves = MoveList::new();
    generate_all_moves(board, &mut moves);
    moves.retain(|m| m.is_capture());
    let ctx = SearchContext::new();
    score_moves(&mut moves, board, &ctx, 0, None);

    let mut idx = 0;
    while let Some(mv) = pick_best(&mut moves, idx) {
        idx += 1;
        if !is_legal_move(board, mv) {
            continue;
        }
        make_move(board, mv);
        let score = -quiescence(board, info, -beta, -alpha);
        undo_move(board);

        if info.state == SearchState::Stopping {
            return alpha;
        }
        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }
    alpha
}

#[allow(clippy::too_many_arguments)]
pub fn alpha_beta(
    board: &mut Board,
    tt: &mut TranspositionTable,
    ctx: &mut SearchContext,
    info: &mut SearchInfo,
    mut depth: i32,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    allow_null: bool,
) -> (i32, Option<Move>) {
    if info.poll_at_node_boundary() {
        return (0, None);
    }

    if ply > 0 && (board.halfmove_clock >= 100 || board.is_repetition()) {
        return (DRAW_SCORE, None);
    }
    if ply >= MAX_PLY {
        return (evaluate(board), None);
    }

    let hash = board.zobrist;
    let mut tt_move = None;
    if let Some(entry) = tt.probe(hash) {
        tt_move = entry.best_move;
        if entry.depth >= depth && ply > 0 {
            let tt_score = score_from_tt(entry.score, ply as i32);
            match entry.flag {
                Bound::Exact => return (tt_score, entry.best_move),
                Bound::Lower if tt_score >= beta => return (tt_score, entry.best_move),
                Bound::Upper if tt_score <= alpha => return (tt_score, entry.best_move),
                _ => {}
            }
        }
    }

    let own_color = board.side_to_move;
    let in_check_now = in_check(board, own_color);
    if in_check_now {
        depth += 1;
    }

    if depth <= 0 {
        return (quiescence(board, info, alpha, beta), None);
    }

    if allow_null
        && depth >= 4
        && !in_check_now
        && ply > 0
        && board.has_non_pawn_material(own_color)
    {
        let r = if depth >= 6 { 3 } else { 2 };
        let undo = make_null_move(board);
        let (val, _) = alpha_beta(board, tt, ctx, info, depth - 1 - r, ply + 1, -beta, -beta + 1, false);
        undo_null_move(board, undo);
        let score = -val;
        if info.state != SearchState::Stopping && score >= beta {
            info.null_cut_count += 1;
            return (beta, None);
        }
    }

    let mut moves = MoveList::new();
    generate_legal_moves(board, &mut moves);
    score_moves(&mut moves, board, ctx, ply, tt_move);

    if moves.is_empty() {
        return if in_check_now {
            (-MATE_SCORE + ply as i32, None)
        } else {
            (DRAW_SCORE, None)
        };
    }

    let original_alpha = alpha;
    let mut best_move = None;
    let mut best_score = -INF;
    let mut move_index = 0usize;
    let mut picked = 0usize;

    while let Some(mv) = pick_best(&mut moves, picked) {
        picked += 1;
        make_move(board, mv);
        let (val, _) = alpha_beta(board, tt, ctx, info, depth - 1, ply + 1, -beta, -alpha, true);
        undo_move(board);
        let score = -val;

        if info.state == SearchState::Stopping {
            return (0, None);
        }

        if score > best_score {
            best_score = score;
            if score > alpha {
                alpha = score;
                best_move = Some(mv);
            }
            if score >= beta {
                tt.store(hash, Some(mv), score_to_tt(beta, ply as i32), depth, Bound::Lower);
                if !mv.is_capture() {
                    ctx.update_killer(ply, mv);
                    let attacker = board.piece_at(mv.from).type_of().unwrap_or(crate::board::PieceType::Pawn);
                    ctx.update_history(own_color, attacker, mv.to, depth);
                }
                info.fail_high_count += 1;
                if move_index == 0 {
                    info.fail_high_first_count += 1;
                }
                return (beta, Some(mv));
            }
        }
        move_index += 1;
    }

    let flag = if best_score > original_alpha { Bound::Exact } else { Bound::Upper };
    tt.store(hash, best_move, score_to_tt(best_score, ply as i32), depth, flag);
    (best_score, best_move)
}

fn principal_variation(board: &mut Board, tt: &TranspositionTable, max_len: i32) -> Vec<Move> {
    let mut pv = Vec::new();
    let mut seen = Vec::new();
    let mut len = 0;
    while len < max_len {
        let Some(entry) = tt.probe(board.zobrist) else { break };
        let Some(mv) = entry.best_move else { break };
        if !is_legal_move(board, mv) || seen.contains(&board.zobrist) {
            break;
        }
        seen.push(board.zobrist);
        make_move(board, mv);
        pv.push(mv);
        len += 1;
    }
    for _ in 0..pv.len() {
        undo_move(board);
    }
    pv
}

fn mate_distance_report(score: i32) -> String {
    let plies = MATE_SCORE - score.abs();
    let moves = (plies + 1) / 2;
    if score > 0 {
        format!("mate {moves}")
    } else {
        format!("mate -{moves}")
    }
}

/// Iterative-deepening search entry point. `poll` is called periodically so
/// a caller (the UCI loop) can interrupt the search asynchronously.
pub fn search(
    board: &mut Board,
    tt: &mut TranspositionTable,
    limits: SearchLimits,
    mut poll: Option<&mut dyn FnMut() -> bool>,
) -> (i32, Option<Move>) {
    tt.new_search();
    let mut ctx = SearchContext::new();
    let mut best_move = None;
    let mut best_score = 0;

    for depth in 1..=limits.max_depth {
        let mut info = SearchInfo::new(&limits, poll.as_deref_mut());
        let (score, mv) = alpha_beta(board, tt, &mut ctx, &mut info, depth, 0, -INF, INF, true);

        if info.state == SearchState::Stopping && depth > 1 {
            break;
        }

        best_score = score;
        best_move = mv.or(best_move);
        ctx.age_history();

        let pv = principal_variation(board, tt, depth);
        let pv_str = pv.iter().map(|m| m.to_uci()).collect::<Vec<_>>().join(" ");
        let score_str = if score.abs() >= MATE_THRESHOLD {
            mate_distance_report(score)
        } else {
            format!("cp {score}")
        };
        // The UCI `info` line is protocol output, not a log record — it goes
        // to stdout via `engine_println!` regardless of the tracing filter.
        crate::output::engine_println!(
            "info depth {} score {} nodes {} time {} pv {}",
            depth,
            score_str,
            info.node_count,
            info.start_time.elapsed().as_millis(),
            pv_str
        );
        debug!(depth, nodes = info.node_count, "iteration complete");

        if info.fail_high_count > 0 {
            debug!(
                fail_high_first = info.fail_high_first_count,
                fail_high = info.fail_high_count,
                ratio = info.fail_high_first_count as f64 / info.fail_high_count as f64,
                "ordering quality"
            );
        }

        if score.abs() >= MATE_THRESHOLD {
            break;
        }
        if info.state == SearchState::Stopping {
            break;
        }
    }

    (best_score, best_move)
}
