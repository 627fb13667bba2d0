// src/search/tt.rs
// Transposition table: a fixed-capacity array addressed by `hash & (capacity - 1)`,
// storing the best move, score, depth, and bound type found for a position.

use crate::moves::types::Move;

pub const MATE_THRESHOLD: i32 = 30000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower, // failed high (beta cutoff)
    Upper, // failed low (alpha cutoff)
}

#[derive(Clone, Copy, Debug)]
pub struct TTEntry {
    pub hash: u64,
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: i32,
    pub flag: Bound,
    pub age: u16,
}

impl TTEntry {
    fn empty() -> Self {
        TTEntry {
            hash: 0,
            best_move: None,
            score: 0,
            depth: -1,
            flag: Bound::Exact,
            age: 0,
        }
    }
}

pub struct TranspositionTable {
    entries: Vec<TTEntry>,
    pub age: u16,
}

impl TranspositionTable {
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<TTEntry>();
        let num_entries = (size_mb * 1024 * 1024) / entry_size.max(1);

        let mut capacity = 1usize;
        while capacity * 2 <= num_entries {
            capacity *= 2;
        }
        capacity = capacity.max(1);

        Self {
            entries: vec![TTEntry::empty(); capacity],
            age: 0,
        }
    }

    /// Starts a new search generation: entries from a prior generation are
    /// eligible for replacement regardless of depth.
    pub fn new_search(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = TTEntry::empty();
        }
        self.age = 0;
    }

    fn index(&self, hash: u64) -> usize {
        (hash as usize) & (self.entries.len() - 1)
    }

    pub fn store(&mut self, hash: u64, mv: Option<Move>, score: i32, depth: i32, flag: Bound) {
        let index = self.index(hash);
        let entry = &mut self.entries[index];

        if entry.hash == 0 || entry.age != self.age || depth >= entry.depth {
            let best_move = mv.or(if entry.hash == hash { entry.best_move } else { None });
            *entry = TTEntry {
                hash,
                best_move,
                score,
                depth,
                flag,
                age: self.age,
            };
        }
    }

    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        let entry = &self.entries[self.index(hash)];
        if entry.hash == hash {
            Some(*entry)
        } else {
            None
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}
