use huginn::search::tt::{Bound, TranspositionTable};

#[test]
fn capacity_rounds_down_to_a_power_of_two() {
    let tt = TranspositionTable::new(1);
    assert!(tt.capacity().is_power_of_two());
    assert!(tt.capacity() > 0);
}

#[test]
fn entries_from_a_prior_generation_are_replaced_even_at_lower_depth() {
    let mut tt = TranspositionTable::new(1);
    tt.store(42, None, 10, 8, Bound::Exact);
    assert_eq!(tt.probe(42).unwrap().depth, 8);

    tt.new_search();
    tt.store(42, None, -5, 1, Bound::Upper);
    let entry = tt.probe(42).unwrap();
    assert_eq!(entry.depth, 1);
    assert_eq!(entry.score, -5);
}

#[test]
fn best_move_is_preserved_across_a_depth_only_refresh() {
    use huginn::moves::types::Move;
    use huginn::square::Square;
    use std::str::FromStr;

    let mv = Move::new(
        Square::from_str("e2").unwrap(),
        Square::from_str("e4").unwrap(),
        huginn::moves::types::FLAG_PAWN_START,
    );

    let mut tt = TranspositionTable::new(1);
    tt.store(7, Some(mv), 0, 4, Bound::Exact);
    // A later store for the same position with no move attached should keep
    // the previously-found best move rather than discarding it.
    tt.store(7, None, 0, 9, Bound::Exact);

    assert_eq!(tt.probe(7).unwrap().best_move, Some(mv));
}
