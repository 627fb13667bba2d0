// src/board/fen.rs
// FEN <-> Board conversion over the mailbox representation.

use super::fen_tables::{CHAR_TO_PIECE, piece_to_char};
use super::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color};
use crate::square::Square;

impl Board {
    pub fn set_fen(&mut self, fen: &str) -> Result<(), String> {
        let mut fields = fen.split_whitespace();

        let placement = fields.next().ok_or("FEN missing piece placement field")?;
        let side = fields.next().ok_or("FEN missing side-to-move field")?;
        let castling = fields.next().ok_or("FEN missing castling field")?;
        let ep = fields.next().ok_or("FEN missing en passant field")?;
        let halfmove = fields.next().unwrap_or("0");
        let fullmove = fields.next().unwrap_or("1");

        *self = Board::new_empty();

        let mut rank = 7i32;
        let mut file = 0i32;
        for c in placement.chars() {
            match c {
                '/' => {
                    if file != 8 {
                        return Err(format!("rank {rank} does not sum to 8 files"));
                    }
                    rank -= 1;
                    file = 0;
                }
                '1'..='8' => {
                    file += c.to_digit(10).unwrap() as i32;
                }
                _ => {
                    if !(0..8).contains(&file) || !(0..8).contains(&rank) {
                        return Err(format!("piece '{c}' falls outside the board"));
                    }
                    let piece = CHAR_TO_PIECE[c as usize]
                        .ok_or_else(|| format!("unrecognized piece glyph '{c}'"))?;
                    let sq = Square::from_file_rank(file as u8, rank as u8);
                    self.place_piece(sq, piece);
                    file += 1;
                }
            }
        }
        if rank != 0 || file != 8 {
            return Err("piece placement does not cover exactly 8 ranks".to_string());
        }

        self.side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(format!("bad side-to-move field '{other}'")),
        };

        self.castling_rights = 0;
        if castling != "-" {
            for c in castling.chars() {
                self.castling_rights |= match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    other => return Err(format!("bad castling glyph '{other}'")),
                };
            }
        }

        self.en_passant = if ep == "-" {
            None
        } else {
            Some(ep.parse::<Square>().map_err(|_| format!("bad en passant square '{ep}'"))?)
        };

        self.halfmove_clock = halfmove
            .parse()
            .map_err(|_| format!("bad halfmove clock '{halfmove}'"))?;
        self.fullmove_number = fullmove
            .parse()
            .map_err(|_| format!("bad fullmove number '{fullmove}'"))?;

        self.zobrist = self.compute_zobrist_full();
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(64);

        for rank in (0..8u8).rev() {
            let mut empty_run = 0u8;
            for file in 0..8u8 {
                let sq = Square::from_file_rank(file, rank);
                let piece = self.piece_at(sq);
                if piece.is_none() {
                    empty_run += 1;
                    continue;
                }
                if empty_run > 0 {
                    out.push((b'0' + empty_run) as char);
                    empty_run = 0;
                }
                out.push(piece_to_char(piece));
            }
            if empty_run > 0 {
                out.push((b'0' + empty_run) as char);
            }
            if rank != 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(if self.side_to_move == Color::White { 'w' } else { 'b' });

        out.push(' ');
        if self.castling_rights == 0 {
            out.push('-');
        } else {
            if self.has_castling(CASTLE_WK) {
                out.push('K');
            }
            if self.has_castling(CASTLE_WQ) {
                out.push('Q');
            }
            if self.has_castling(CASTLE_BK) {
                out.push('k');
            }
            if self.has_castling(CASTLE_BQ) {
                out.push('q');
            }
        }

        out.push(' ');
        match self.en_passant {
            Some(sq) => out.push_str(&sq.to_string()),
            None => out.push('-'),
        }

        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }
}
