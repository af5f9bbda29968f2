use std::marker::PhantomData;

use crate::error::{Error, Result};

/// How a stored value relates to the true value of its position
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    // the true value is at least the stored value
    Lower,
    // the true value is at most the stored value
    Upper,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub value: i32,
    pub bound: Bound,
    /// Remaining search depth the value was computed with
    pub depth: u32,
}

#[derive(Copy, Clone)]
struct Slot {
    key: u64,
    entry: Entry,
}

const TABLE_DEFAULT_SIZE: usize = (1 << 20) - 3; // prime value

/// Fixed-size, always-replace table keyed by [`Board::key`](crate::board::Board::key)
///
/// The full key is kept in each slot so a lookup never returns the entry of
/// a different position that shares the slot. Values only mean something for
/// the scorer that produced them, so the table is typed by that scorer and a
/// solver only accepts a table of its own scorer:
///
/// ```compile_fail
/// use connect4_search::{
///     board::Board,
///     score::{MatrixScorer, MobilityScorer},
///     solver::Solver,
///     transposition_table::TranspositionTable,
/// };
///
/// let table: TranspositionTable<MatrixScorer> = TranspositionTable::new();
/// let solver = Solver::new(Board::new(), MobilityScorer).with_transposition_table(table);
/// ```
pub struct TranspositionTable<S> {
    slots: Vec<Option<Slot>>,
    scorer: PhantomData<fn() -> S>,
}

impl<S> TranspositionTable<S> {
    pub fn new() -> Self {
        Self {
            slots: vec![None; TABLE_DEFAULT_SIZE],
            scorer: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidSearchParameter(
                "table capacity must be > 0".to_string(),
            ));
        }
        Ok(Self {
            slots: vec![None; capacity],
            scorer: PhantomData,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn set(&mut self, key: u64, entry: Entry) {
        let len = self.slots.len();
        self.slots[key as usize % len] = Some(Slot { key, entry });
    }

    pub fn get(&self, key: u64) -> Option<Entry> {
        match self.slots[key as usize % self.slots.len()] {
            Some(slot) if slot.key == key => Some(slot.entry),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }
}

impl<S> Clone for TranspositionTable<S> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            scorer: PhantomData,
        }
    }
}

impl<S> Default for TranspositionTable<S> {
    fn default() -> Self {
        Self::new()
    }
}
