// src/bin/cli.rs
// UCI command loop. Runs single-threaded: the same thread that reads
// commands also drives the search, which polls a background stdin reader
// for a pending `stop`/`quit` line every few thousand nodes rather than
// blocking on input itself.

use huginn::book::PolyglotBook;
use huginn::board::Board;
use huginn::moves::movegen::generate_legal_moves;
use huginn::moves::types::{Move, MoveList};
use huginn::search::search::{SearchLimits, search};
use huginn::search::tt::TranspositionTable;
use std::io::{self, BufRead};
use std::str::FromStr;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const ENGINE_NAME: &str = "Huginn";
const ENGINE_AUTHOR: &str = "Huginn Contributors";
const DEFAULT_TT_MB: usize = 64;
const DEFAULT_BOOK_FILE: &str = "book.bin";

/// Non-blocking line source for the duration of a search: a background
/// thread owns the actual blocking `stdin` reads and forwards each line
/// through a channel, so the search thread can ask "is anything waiting?"
/// without ever blocking on it.
struct PollableLineReader {
    rx: mpsc::Receiver<String>,
}

impl PollableLineReader {
    fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(l) => {
                        if tx.send(l).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });
        Self { rx }
    }

    fn try_read_line(&self) -> Option<String> {
        self.rx.try_recv().ok()
    }

    /// Blocks until a line arrives, or returns `None` once stdin is closed.
    fn read_line(&self) -> Option<String> {
        self.rx.recv().ok()
    }
}

struct Engine {
    board: Board,
    tt: TranspositionTable,
    reader: PollableLineReader,
    own_book: bool,
    book_file: String,
    book: Option<PolyglotBook>,
    quit: bool,
}

impl Engine {
    fn new() -> Self {
        Self {
            board: Board::new(),
            tt: TranspositionTable::new(DEFAULT_TT_MB),
            reader: PollableLineReader::spawn(),
            own_book: true,
            book_file: DEFAULT_BOOK_FILE.to_string(),
            book: None,
            quit: false,
        }
    }

    fn run(&mut self) {
        while !self.quit {
            let Some(line) = self.reader.read_line() else { break };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            self.dispatch(&line);
        }
    }

    fn dispatch(&mut self, line: &str) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "uci" => self.handle_uci(),
            "isready" => println!("readyok"),
            "ucinewgame" => {
                self.board = Board::new();
                self.tt.clear();
            }
            "setoption" => self.handle_setoption(&parts),
            "position" => self.handle_position(&parts),
            "go" => self.handle_go(&parts),
            "stop" => {}
            "quit" => self.quit = true,
            "d" | "display" => println!("{}", self.board),
            "fen" => println!("{}", self.board.to_fen()),
            _ => {}
        }
    }

    fn handle_uci(&self) {
        println!("id name {} {}", ENGINE_NAME, env!("CARGO_PKG_VERSION"));
        println!("id author {}", ENGINE_AUTHOR);
        println!("option name Threads type spin default 1 min 1 max 64");
        println!("option name Ponder type check default false");
        println!("option name OwnBook type check default true");
        println!("option name BookFile type string default {}", DEFAULT_BOOK_FILE);
        println!("uciok");
    }

    /// `Threads`/`Ponder` are accepted and echoed but have no behavioral
    /// effect — this engine only ever runs one search thread and never
    /// ponders (see the Non-goals).
    fn handle_setoption(&mut self, parts: &[&str]) {
        let Some(name_idx) = parts.iter().position(|&p| p == "name") else { return };
        let value_idx = parts.iter().position(|&p| p == "value");
        let name_end = value_idx.unwrap_or(parts.len());
        let name = parts[name_idx + 1..name_end].join(" ");
        let value = value_idx.map(|i| parts[i + 1..].join(" ")).unwrap_or_default();

        match name.as_str() {
            "OwnBook" => self.own_book = value.eq_ignore_ascii_case("true"),
            "BookFile" if !value.is_empty() => {
                self.book_file = value;
                self.book = None;
            }
            _ => {}
        }
    }

    fn handle_position(&mut self, parts: &[&str]) {
        let mut board = if parts.len() > 1 && parts[1] == "fen" {
            let moves_idx = parts.iter().position(|&p| p == "moves").unwrap_or(parts.len());
            let fen = parts[2..moves_idx].join(" ");
            match Board::from_str(&fen) {
                Ok(b) => b,
                Err(_) => return,
            }
        } else {
            Board::new()
        };

        if let Some(moves_idx) = parts.iter().position(|&p| p == "moves") {
            for mv_str in &parts[moves_idx + 1..] {
                match parse_uci_move(&mut board, mv_str) {
                    Some(mv) => huginn::moves::make::make_move(&mut board, mv),
                    None => return,
                }
            }
        }

        self.board = board;
    }

    fn handle_go(&mut self, parts: &[&str]) {
        if self.own_book {
            self.ensure_book_loaded();
            if let Some(book) = &self.book {
                if let Some(mv) = book.probe(&self.board) {
                    println!("info string book move");
                    println!("bestmove {}", mv.to_uci());
                    return;
                }
            }
        }

        let limits = self.parse_go_limits(parts);
        let reader = &self.reader;
        let mut saw_quit = false;
        let mut poll = || {
            let Some(line) = reader.try_read_line() else { return false };
            if line.trim_start().starts_with("quit") {
                saw_quit = true;
            }
            true
        };

        let (_score, best_move) = search(&mut self.board, &mut self.tt, limits, Some(&mut poll));
        match best_move {
            Some(mv) => println!("bestmove {}", mv.to_uci()),
            None => println!("bestmove 0000"),
        }
        if saw_quit {
            self.quit = true;
        }
    }

    fn ensure_book_loaded(&mut self) {
        if self.book.is_some() {
            return;
        }
        match PolyglotBook::load(&self.book_file) {
            Ok(book) => self.book = Some(book),
            Err(_) => tracing::warn!(file = %self.book_file, "opening book failed to load"),
        }
    }

    fn parse_go_limits(&self, parts: &[&str]) -> SearchLimits {
        const MAX_DEPTH: i32 = 64;

        let mut depth = None;
        let mut movetime = None;
        let mut wtime = None;
        let mut btime = None;
        let mut winc = 0u64;
        let mut binc = 0u64;
        let mut movestogo = None;
        let mut infinite = false;

        let take_u64 = |i: usize| -> Option<u64> { parts.get(i + 1).and_then(|s| s.parse().ok()) };
        let mut i = 1;
        while i < parts.len() {
            match parts[i] {
                "depth" => {
                    depth = parts.get(i + 1).and_then(|s| s.parse().ok());
                    i += 2;
                }
                "movetime" => {
                    movetime = take_u64(i);
                    i += 2;
                }
                "wtime" => {
                    wtime = take_u64(i);
                    i += 2;
                }
                "btime" => {
                    btime = take_u64(i);
                    i += 2;
                }
                "winc" => {
                    winc = take_u64(i).unwrap_or(0);
                    i += 2;
                }
                "binc" => {
                    binc = take_u64(i).unwrap_or(0);
                    i += 2;
                }
                "movestogo" => {
                    movestogo = take_u64(i);
                    i += 2;
                }
                "infinite" => {
                    infinite = true;
                    i += 1;
                }
                _ => i += 1,
            }
        }

        if infinite {
            return SearchLimits { max_depth: MAX_DEPTH, movetime: None, infinite: true };
        }
        if let Some(d) = depth {
            return SearchLimits::depth(d);
        }
        if let Some(ms) = movetime {
            return SearchLimits::time(MAX_DEPTH, Duration::from_millis(ms));
        }

        let (my_time, my_inc) = if self.board.side_to_move == huginn::board::Color::White {
            (wtime, winc)
        } else {
            (btime, binc)
        };
        match my_time {
            Some(t) => SearchLimits::time(MAX_DEPTH, allocate_time(t, my_inc, movestogo)),
            None => SearchLimits::depth(MAX_DEPTH),
        }
    }
}

/// `T/max(1,M) + I/2`, minus a safety reserve of `min(1000ms, T/10)`, capped
/// at 60% of `T`, clamped to at least 50ms.
fn allocate_time(t_ms: u64, inc_ms: u64, movestogo: Option<u64>) -> Duration {
    let m = movestogo.unwrap_or(30).max(1);
    let reserve = (t_ms / 10).min(1000);
    let usable = t_ms.saturating_sub(reserve);
    let alloc = usable / m + inc_ms / 2;
    let cap = t_ms * 6 / 10;
    Duration::from_millis(alloc.min(cap).max(50))
}

fn parse_uci_move(board: &mut Board, move_str: &str) -> Option<Move> {
    if move_str.len() < 4 {
        return None;
    }
    let from: huginn::square::Square = move_str[0..2].parse().ok()?;
    let to: huginn::square::Square = move_str[2..4].parse().ok()?;
    let promotion = move_str.as_bytes().get(4).and_then(|&b| match b {
        b'q' => Some(huginn::board::PieceType::Queen),
        b'r' => Some(huginn::board::PieceType::Rook),
        b'b' => Some(huginn::board::PieceType::Bishop),
        b'n' => Some(huginn::board::PieceType::Knight),
        _ => None,
    });

    let mut moves = MoveList::new();
    generate_legal_moves(board, &mut moves);
    moves.into_iter().find(|mv| mv.from == from && mv.to == to && mv.promoted == promotion)
}

fn main() {
    huginn::logger::init_logging("logs/huginn.log", "info");
    Engine::new().run();
}
