// src/hash/zobrist.rs

use crate::board::castle_bits::*;
use crate::board::{Board, Color, PieceType};
use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

#[cfg(feature = "deterministic_zobrist")]
const ZOBRIST_SEED: u64 = 0x9E37_79B9_AAAC_5C87;

fn make_zobrist_rng() -> StdRng {
    #[cfg(feature = "deterministic_zobrist")]
    {
        StdRng::seed_from_u64(ZOBRIST_SEED)
    }
    #[cfg(not(feature = "deterministic_zobrist"))]
    {
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        StdRng::from_seed(seed)
    }
}

pub struct ZobristKeys {
    /// `[color][piece_type - 1][sq64]`, piece_type in {Pawn..King}.
    pub piece: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    /// Bit order matches `castle_bits`: [0]=WK [1]=WQ [2]=BK [3]=BQ
    pub castling: [u64; 4],
    /// a..h => 0..7
    pub ep_file: [u64; 8],
}

#[inline]
pub fn xor_castling_rights_delta(hash: &mut u64, keys: &ZobristKeys, old: u8, new_: u8) {
    let d = old ^ new_;
    if d & CASTLE_WK != 0 {
        *hash ^= keys.castling[0];
    }
    if d & CASTLE_WQ != 0 {
        *hash ^= keys.castling[1];
    }
    if d & CASTLE_BK != 0 {
        *hash ^= keys.castling[2];
    }
    if d & CASTLE_BQ != 0 {
        *hash ^= keys.castling[3];
    }
}

#[inline]
pub fn piece_key(keys: &ZobristKeys, color: Color, piece_type: PieceType, sq64: u8) -> u64 {
    keys.piece[color as usize][piece_type as usize - 1][sq64 as usize]
}

/// Returns Some(file 0..7) if EP should contribute to the hash this ply;
/// else None. Rule: include EP only if side-to-move has a pawn that could
/// pseudo-legally capture onto it (ignores pins/king safety).
pub fn ep_file_to_hash(board: &Board) -> Option<u8> {
    let ep = board.en_passant?;
    let ep_file = ep.file();
    let ep_rank = ep.rank();

    let (capture_rank, mover) = match board.side_to_move {
        Color::White => {
            if ep_rank != 5 {
                return None;
            }
            (4u8, Color::White)
        }
        Color::Black => {
            if ep_rank != 2 {
                return None;
            }
            (3u8, Color::Black)
        }
    };

    let has_pawn_on = |file: i16| -> bool {
        if !(0..8).contains(&file) {
            return false;
        }
        let sq = crate::square::Square::from_file_rank(file as u8, capture_rank);
        let piece = board.piece_at(sq);
        piece.color_of() == Some(mover) && piece.type_of() == Some(PieceType::Pawn)
    };

    if has_pawn_on(ep_file as i16 - 1) || has_pawn_on(ep_file as i16 + 1) {
        Some(ep_file)
    } else {
        None
    }
}

pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_zobrist_keys_with_rng(make_zobrist_rng()))
}

fn generate_zobrist_keys_with_rng(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(r: &mut StdRng) -> u64 {
        let mut v = r.next_u64();
        while v == 0 {
            v = r.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[[0u64; 64]; 6]; 2],
        side_to_move: 0,
        castling: [0u64; 4],
        ep_file: [0u64; 8],
    };

    for c in 0..2 {
        for p in 0..6 {
            for sq in 0..64 {
                keys.piece[c][p][sq] = non_zero(&mut rng);
            }
        }
    }

    for slot in keys.castling.iter_mut() {
        *slot = non_zero(&mut rng);
    }
    for slot in keys.ep_file.iter_mut() {
        *slot = non_zero(&mut rng);
    }
    keys.side_to_move = non_zero(&mut rng);

    keys
}
