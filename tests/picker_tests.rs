use huginn::board::{Board, Color, PieceType};
use huginn::moves::types::{FLAG_CAPTURE, Move, MoveList};
use huginn::search::context::SearchContext;
use huginn::search::picker::{pick_best, score_moves};
use huginn::square::Square;
use std::str::FromStr;

fn quiet(from: &str, to: &str) -> Move {
    Move::new(Square::from_str(from).unwrap(), Square::from_str(to).unwrap(), 0)
}

fn capture(from: &str, to: &str, victim: PieceType) -> Move {
    let mut mv = Move::new(Square::from_str(from).unwrap(), Square::from_str(to).unwrap(), FLAG_CAPTURE);
    mv.captured = Some(victim);
    mv
}

fn promotion_capture(from: &str, to: &str, victim: PieceType, promoted: PieceType) -> Move {
    let mut mv = capture(from, to, victim);
    mv.promoted = Some(promoted);
    mv
}

fn pick_all(moves: &mut MoveList) -> Vec<Move> {
    let mut out = Vec::with_capacity(moves.len());
    let mut i = 0;
    while let Some(mv) = pick_best(moves, i) {
        out.push(mv);
        i += 1;
    }
    out
}

#[test]
fn full_tier_order_tt_capture_killer_history() {
    // Board content doesn't matter for scoring (no captures computed from it
    // since every move here is hand-built with an explicit `captured`), but
    // `score_moves` still reads `board.piece_at` for the attacker's type on
    // quiet/history moves, so this needs a position where e1/h2/a2 hold the
    // pieces the moves claim to move.
    let board = Board::from_str("4k3/8/8/8/8/8/P6P/4K3 w - - 0 1").unwrap();

    let tt_move = quiet("e1", "d1");
    let cap = capture("h2", "h3", PieceType::Pawn); // not a real capture geometrically, scoring only
    let killer1 = quiet("a2", "a3");
    let killer2 = quiet("a2", "a4");
    let history_move = quiet("e1", "f1");

    let mut moves = MoveList::new();
    for mv in [history_move, cap, killer2, tt_move, killer1] {
        moves.push(mv);
    }

    let mut ctx = SearchContext::new();
    ctx.update_killer(0, killer2);
    ctx.update_killer(0, killer1); // killer1 pushed in last, becomes slot 0

    score_moves(&mut moves, &board, &ctx, 0, Some(tt_move));
    let ordered = pick_all(&mut moves);

    assert_eq!(ordered[0], tt_move, "TT move always sorts first");
    assert_eq!(ordered[1], cap, "captures outrank killers and history");
    assert_eq!(ordered[2], killer1, "killer slot 0 outranks slot 1");
    assert_eq!(ordered[3], killer2);
    assert_eq!(ordered[4], history_move, "plain history move sorts last");
}

#[test]
fn promotion_bonus_breaks_ties_among_equal_mvv_lva_captures() {
    let board = Board::from_str("q7/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();

    let promo_queen = promotion_capture("a7", "a8", PieceType::Queen, PieceType::Queen);
    let promo_knight = promotion_capture("a7", "a8", PieceType::Queen, PieceType::Knight);

    let mut moves = MoveList::new();
    moves.push(promo_knight);
    moves.push(promo_queen);

    let ctx = SearchContext::new();
    score_moves(&mut moves, &board, &ctx, 0, None);
    let ordered = pick_all(&mut moves);

    assert_eq!(ordered[0], promo_queen, "queen promotion outranks knight promotion");
    assert_eq!(ordered[1], promo_knight);
}

#[test]
fn mvv_lva_ranks_by_victim_then_by_cheapest_attacker() {
    let board = Board::from_str("8/8/8/8/8/1q4r1/P6P/4K3 w - - 0 1").unwrap();

    let pawn_takes_queen = capture("a2", "b3", PieceType::Queen);
    let pawn_takes_rook = capture("h2", "g3", PieceType::Rook);

    let mut moves = MoveList::new();
    moves.push(pawn_takes_rook);
    moves.push(pawn_takes_queen);

    let ctx = SearchContext::new();
    score_moves(&mut moves, &board, &ctx, 0, None);
    let ordered = pick_all(&mut moves);

    assert_eq!(ordered[0], pawn_takes_queen, "capturing the more valuable victim ranks first");
    assert_eq!(ordered[1], pawn_takes_rook);
}

#[test]
fn history_score_orders_quiet_moves_without_a_capture_or_killer() {
    let board = Board::new();
    let mv_a = quiet("a2", "a3");
    let mv_h = quiet("h2", "h3");

    let mut moves = MoveList::new();
    moves.push(mv_a);
    moves.push(mv_h);

    let mut ctx = SearchContext::new();
    ctx.update_history(Color::White, PieceType::Pawn, Square::from_str("h3").unwrap(), 20);
    ctx.update_history(Color::White, PieceType::Pawn, Square::from_str("a3").unwrap(), 4);

    score_moves(&mut moves, &board, &ctx, 0, None);
    let ordered = pick_all(&mut moves);

    assert_eq!(ordered[0], mv_h, "higher history score sorts first");
    assert_eq!(ordered[1], mv_a);
}
