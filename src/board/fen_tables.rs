// src/board/fen_tables.rs
// O(1) FEN glyph <-> Piece maps.

use super::Piece;

pub(super) const CHAR_TO_PIECE: [Option<Piece>; 128] = {
    let mut table: [Option<Piece>; 128] = [None; 128];

    table[b'P' as usize] = Some(Piece::WP);
    table[b'N' as usize] = Some(Piece::WN);
    table[b'B' as usize] = Some(Piece::WB);
    table[b'R' as usize] = Some(Piece::WR);
    table[b'Q' as usize] = Some(Piece::WQ);
    table[b'K' as usize] = Some(Piece::WK);

    table[b'p' as usize] = Some(Piece::BP);
    table[b'n' as usize] = Some(Piece::BN);
    table[b'b' as usize] = Some(Piece::BB);
    table[b'r' as usize] = Some(Piece::BR);
    table[b'q' as usize] = Some(Piece::BQ);
    table[b'k' as usize] = Some(Piece::BK);

    table
};

#[inline]
pub(super) const fn piece_to_char(piece: Piece) -> char {
    match piece {
        Piece::WP => 'P',
        Piece::WN => 'N',
        Piece::WB => 'B',
        Piece::WR => 'R',
        Piece::WQ => 'Q',
        Piece::WK => 'K',
        Piece::BP => 'p',
        Piece::BN => 'n',
        Piece::BB => 'b',
        Piece::BR => 'r',
        Piece::BQ => 'q',
        Piece::BK => 'k',
        _ => '.',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_round_trip() {
        const GLYPHS: [u8; 12] = *b"PNBRQKpnbrqk";
        for &g in &GLYPHS {
            let piece = CHAR_TO_PIECE[g as usize].expect("glyph missing from CHAR_TO_PIECE");
            assert_eq!(piece_to_char(piece), g as char);
        }
    }
}
