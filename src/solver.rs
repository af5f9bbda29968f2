//! Game tree search over Connect 4 positions

use log::{debug, trace};

use crate::{
    board::Board,
    config::{validate_depth, validate_window, Algorithm, ScorerKind, SearchConfig},
    error::{Error, Result},
    score::{MatrixScorer, MobilityScorer, Scorer},
    transposition_table::{Bound, Entry, TranspositionTable},
    WIDTH,
};

/// Larger than any score, and safe to negate
pub const INFINITY: i32 = i32::MAX;

/// An agent to search Connect 4 positions
///
/// # Notes
/// A `Solver` owns everything one search mutates: the board, which is walked
/// with play/undo, the node counter with its optional budget, and the
/// transposition table. Independent solvers never share state, so separate
/// searches can run on separate threads.
///
/// # Position Scoring
/// Values are from the point of view of the player to move. A leaf is scored
/// by the [`Scorer`] when the depth runs out, when the board is full or holds
/// four-in-a-row, or once the node budget is spent. Inner nodes take the
/// maximum of their negated children.
pub struct Solver<S: Scorer> {
    board: Board,
    scorer: S,

    /// The number of nodes visited by the last top-level search
    pub node_count: u64,
    node_budget: Option<u64>,
    // allocated on the first memoized search
    transposition_table: Option<TranspositionTable<S>>,
}

impl<S: Scorer> Solver<S> {
    /// Creates a new `Solver` for a position
    pub fn new(board: Board, scorer: S) -> Self {
        Self {
            board,
            scorer,
            node_count: 0,
            node_budget: None,
            transposition_table: None,
        }
    }

    /// Limits every top-level search to roughly `budget` nodes
    ///
    /// Once the budget is spent the remaining nodes are scored as leaves, so
    /// the result becomes a heuristic value instead of a proven one.
    pub fn with_node_budget(mut self, budget: u64) -> Self {
        self.node_budget = Some(budget);
        self
    }

    /// Uses an existing transposition table, e.g. one filled by a previous solver
    pub fn with_transposition_table(
        mut self,
        transposition_table: TranspositionTable<S>,
    ) -> Self {
        self.transposition_table = Some(transposition_table);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn transposition_table(&self) -> Option<&TranspositionTable<S>> {
        self.transposition_table.as_ref()
    }

    pub fn into_transposition_table(self) -> Option<TranspositionTable<S>> {
        self.transposition_table
    }

    /// True if the last search ran out of nodes
    pub fn budget_exhausted(&self) -> bool {
        matches!(self.node_budget, Some(budget) if self.node_count > budget)
    }

    /// Exhaustive negamax to `depth` plies
    pub fn negamax(&mut self, depth: i32) -> Result<i32> {
        let depth = validate_depth(depth)?;
        self.node_count = 0;
        let score = self._negamax(depth);
        self.log_search(Algorithm::Negamax, depth, score);
        Ok(score)
    }

    /// Alpha-beta negamax to `depth` plies within the window `[alpha, beta]`
    pub fn negabeta(&mut self, alpha: i32, beta: i32, depth: i32) -> Result<i32> {
        let depth = validate_depth(depth)?;
        validate_window(alpha, beta)?;
        self.node_count = 0;
        let score = self._negabeta(alpha, beta, depth);
        self.log_search(Algorithm::Negabeta, depth, score);
        Ok(score)
    }

    /// Alpha-beta negamax that stores and reuses bounds in the transposition table
    pub fn transposition(&mut self, alpha: i32, beta: i32, depth: i32) -> Result<i32> {
        let depth = validate_depth(depth)?;
        validate_window(alpha, beta)?;
        self.node_count = 0;
        let score = self._transposition(alpha, beta, depth);
        self.log_search(Algorithm::Transposition, depth, score);
        Ok(score)
    }

    /// Runs `algorithm`, the window is ignored by plain negamax
    pub fn search(
        &mut self,
        algorithm: Algorithm,
        alpha: i32,
        beta: i32,
        depth: i32,
    ) -> Result<i32> {
        match algorithm {
            Algorithm::Negamax => self.negamax(depth),
            Algorithm::Negabeta => self.negabeta(alpha, beta, depth),
            Algorithm::Transposition => self.transposition(alpha, beta, depth),
        }
    }

    /// Returns the score of the position and the best column to play
    ///
    /// Ties go to the leftmost column.
    pub fn best_move(&mut self, depth: i32) -> Result<(i32, usize)> {
        let depth = validate_depth(depth)?;
        if depth == 0 {
            return Err(Error::InvalidSearchParameter(
                "a best move needs a depth of at least 1".to_string(),
            ));
        }
        if self.board.is_terminal() {
            return Err(Error::InvalidSearchParameter(
                "the position is already decided".to_string(),
            ));
        }
        self.node_count = 1;

        let mut alpha = -INFINITY;
        let mut best = (-INFINITY, WIDTH);
        for column in self.board.legal_columns() {
            self.board.play_unchecked(column);
            // the search window is flipped for the other player
            let score = -self._negabeta(-INFINITY, -alpha, depth - 1);
            self.board.undo();

            if score > best.0 {
                best = (score, column);
            }
            alpha = alpha.max(score);
        }

        debug!(
            "best move at depth {}: column {} with score {}, {} nodes",
            depth,
            best.1 + 1,
            best.0,
            self.node_count
        );
        Ok(best)
    }

    fn is_leaf(&self, depth: u32) -> bool {
        depth == 0 || self.board.is_terminal()
    }

    fn _negamax(&mut self, depth: u32) -> i32 {
        self.node_count += 1;

        if self.is_leaf(depth) {
            return self.scorer.score(&self.board);
        }

        let mut value = -INFINITY;
        for column in self.board.legal_columns() {
            self.board.play_unchecked(column);
            value = value.max(-self._negamax(depth - 1));
            self.board.undo();
        }
        value
    }

    fn _negabeta(&mut self, mut alpha: i32, beta: i32, depth: u32) -> i32 {
        self.node_count += 1;

        if self.is_leaf(depth) || self.budget_exhausted() {
            return self.scorer.score(&self.board);
        }

        let mut value = -INFINITY;
        for column in self.board.legal_columns() {
            self.board.play_unchecked(column);
            value = value.max(-self._negabeta(-beta, -alpha, depth - 1));
            self.board.undo();

            alpha = alpha.max(value);
            // a perfect opponent will not allow this branch
            if alpha >= beta {
                break;
            }
        }
        value
    }

    fn _transposition(&mut self, mut alpha: i32, mut beta: i32, depth: u32) -> i32 {
        self.node_count += 1;

        let alpha_original = alpha;
        let key = self.board.key();

        // try to fetch the value or a bound on it from the transposition table
        if let Some(entry) = self.table().get(key) {
            if entry.depth >= depth {
                trace!("table hit at depth {}: {:?}", depth, entry);
                match entry.bound {
                    Bound::Exact => return entry.value,
                    Bound::Lower => alpha = alpha.max(entry.value),
                    Bound::Upper => beta = beta.min(entry.value),
                }
                if alpha >= beta {
                    return entry.value;
                }
            }
        }

        if self.is_leaf(depth) || self.budget_exhausted() {
            return self.scorer.score(&self.board);
        }

        let mut value = -INFINITY;
        for column in self.board.legal_columns() {
            self.board.play_unchecked(column);
            value = value.max(-self._transposition(-beta, -alpha, depth - 1));
            self.board.undo();

            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }

        // values computed after the budget ran out are not proven
        if !self.budget_exhausted() {
            let bound = if value <= alpha_original {
                Bound::Upper
            } else if value >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.table().set(key, Entry { value, bound, depth });
        }
        value
    }

    fn table(&mut self) -> &mut TranspositionTable<S> {
        self.transposition_table
            .get_or_insert_with(TranspositionTable::new)
    }

    fn log_search(&self, algorithm: Algorithm, depth: u32, score: i32) {
        debug!(
            "{} at depth {}: score {}, {} nodes{}",
            algorithm,
            depth,
            score,
            self.node_count,
            if self.budget_exhausted() {
                " (node budget exhausted)"
            } else {
                ""
            }
        );
    }
}

/// Outcome of a configured search
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Analysis {
    pub score: i32,
    pub node_count: u64,
    pub budget_exhausted: bool,
}

/// Validates `config` and runs the search it describes on `board`
pub fn analyse(board: Board, config: &SearchConfig) -> Result<Analysis> {
    config.validate()?;
    match config.scorer {
        ScorerKind::Matrix => run(Solver::new(board, MatrixScorer), config),
        ScorerKind::Mobility => run(Solver::new(board, MobilityScorer), config),
    }
}

fn run<S: Scorer>(solver: Solver<S>, config: &SearchConfig) -> Result<Analysis> {
    let mut solver = match config.node_budget {
        Some(budget) => solver.with_node_budget(budget),
        None => solver,
    };
    if config.algorithm == Algorithm::Transposition {
        solver = solver.with_transposition_table(TranspositionTable::with_capacity(
            config.table_capacity,
        )?);
    }
    let score = solver.search(config.algorithm, config.alpha, config.beta, config.depth)?;
    Ok(Analysis {
        score,
        node_count: solver.node_count,
        budget_exhausted: solver.budget_exhausted(),
    })
}
