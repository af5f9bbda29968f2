use std::fmt;

use crate::error::{Error, Result};

/// Search algorithm to run at the top level
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    /// Exhaustive negamax within the depth bound
    Negamax,
    /// Alpha-beta pruned negamax
    Negabeta,
    /// Alpha-beta negamax with a transposition table
    Transposition,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Negamax => "negamax",
            Algorithm::Negabeta => "negabeta",
            Algorithm::Transposition => "transposition",
        };
        write!(f, "{}", name)
    }
}

/// Leaf evaluation used by the search
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ScorerKind {
    /// Loss or nothing, from a cell scan of the grid
    Matrix,
    /// Loss, or the difference in playable winning squares
    Mobility,
}

/// Everything a top-level search needs besides the position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    pub scorer: ScorerKind,
    pub depth: i32,
    pub alpha: i32,
    pub beta: i32,
    /// Nodes to visit before leaves are scored without being proven
    pub node_budget: Option<u64>,
    pub table_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            algorithm: Algorithm::Negabeta,
            scorer: ScorerKind::Mobility,
            depth: 6,
            alpha: -1000,
            beta: 1000,
            node_budget: None,
            table_capacity: (1 << 20) - 3,
        }
    }
}

impl SearchConfig {
    /// Rejects settings that would make a search misbehave.
    pub fn validate(&self) -> Result<()> {
        validate_depth(self.depth)?;
        validate_window(self.alpha, self.beta)?;
        if self.node_budget == Some(0) {
            return Err(Error::InvalidSearchParameter(
                "node budget must be > 0".to_string(),
            ));
        }
        if self.table_capacity == 0 {
            return Err(Error::InvalidSearchParameter(
                "table capacity must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_depth(depth: i32) -> Result<u32> {
    if depth < 0 {
        return Err(Error::InvalidSearchParameter(format!(
            "depth must be >= 0, got {}",
            depth
        )));
    }
    Ok(depth as u32)
}

pub(crate) fn validate_window(alpha: i32, beta: i32) -> Result<()> {
    if alpha >= beta {
        return Err(Error::InvalidSearchParameter(format!(
            "empty search window [{}, {}]",
            alpha, beta
        )));
    }
    // the window is negated at every ply
    if alpha == i32::MIN {
        return Err(Error::InvalidSearchParameter(
            "alpha must be > i32::MIN".to_string(),
        ));
    }
    Ok(())
}
