//! Checks search results against positions with known solved scores
//!
//! A test file has one case per line: a move string and the solved score of
//! the resulting position, e.g. `4455 18`. A positive score means the player to
//! move wins, with `22 - score` tiles of their own on the board when the four
//! is completed. Negative scores mirror this for the opponent, 0 is a draw.

use std::{
    cmp::Ordering,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::mpsc::channel,
    thread,
};

use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;

use crate::{board::Board, score::MatrixScorer, solver::Solver, HEIGHT, WIDTH};

/// Tiles a player owns after their last possible move, plus one
const SCORE_BASE: i32 = (WIDTH * HEIGHT) as i32 / 2 + 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub moves: String,
    pub expected: i32,
}

impl TestCase {
    pub fn parse(line: &str) -> Result<Self> {
        let mut test_data = line.split_whitespace();
        let moves = test_data
            .next()
            .ok_or_else(|| anyhow!("invalid test data: '{}'", line))?;
        let expected = test_data
            .next()
            .ok_or_else(|| anyhow!("invalid test data: '{}'", line))?
            .parse::<i32>()?;
        if test_data.next().is_some() {
            return Err(anyhow!("invalid test data: '{}'", line));
        }
        Ok(Self {
            moves: moves.to_string(),
            expected,
        })
    }

    pub fn board(&self) -> Result<Board> {
        Ok(Board::from_moves(&self.moves)?)
    }

    /// Plies needed to reach the end of the game under perfect play
    pub fn horizon(&self, board: &Board) -> Result<u32> {
        let num_moves = board.num_moves() as i32;
        let plies = match self.expected.cmp(&0) {
            Ordering::Equal => (WIDTH * HEIGHT) as i32 - num_moves,
            // the player to move makes the last move
            Ordering::Greater => 2 * (SCORE_BASE - self.expected - num_moves / 2) - 1,
            // the opponent makes the last move
            Ordering::Less => 2 * (SCORE_BASE + self.expected - (num_moves + 1) / 2),
        };
        if plies < 0 || plies > (WIDTH * HEIGHT) as i32 - num_moves {
            return Err(anyhow!(
                "score {} is impossible after {} moves",
                self.expected,
                num_moves
            ));
        }
        Ok(plies as u32)
    }
}

/// Reads every non-blank line of `reader` as a test case
pub fn parse_cases<R: BufRead>(reader: R) -> Result<Vec<TestCase>> {
    let mut cases = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        cases.push(TestCase::parse(&line)?);
    }
    Ok(cases)
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<TestCase>> {
    parse_cases(BufReader::new(File::open(path)?))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed { score: i32 },
    /// The game lasts longer than the allowed search depth
    Skipped { horizon: u32 },
}

#[derive(Clone, Debug)]
pub struct CaseResult {
    pub case: TestCase,
    pub verdict: Verdict,
    pub node_count: u64,
}

#[derive(Clone, Debug, Default)]
pub struct Report {
    pub results: Vec<CaseResult>,
}

impl Report {
    fn count(&self, predicate: impl Fn(&Verdict) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.verdict)).count()
    }

    pub fn passed(&self) -> usize {
        self.count(|v| *v == Verdict::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Skipped { .. }))
    }

    pub fn node_count(&self) -> u64 {
        self.results.iter().map(|r| r.node_count).sum()
    }
}

/// Searches one case to its horizon and compares win/draw/loss
pub fn check(case: &TestCase, max_depth: u32) -> Result<CaseResult> {
    let board = case.board()?;
    let horizon = case.horizon(&board)?;
    if horizon > max_depth {
        return Ok(CaseResult {
            case: case.clone(),
            verdict: Verdict::Skipped { horizon },
            node_count: 0,
        });
    }

    // a window of [-1, 1] only separates wins, draws and losses
    let mut solver = Solver::new(board, MatrixScorer);
    let score = solver.negabeta(-1, 1, horizon as i32)?;
    let verdict = if score.signum() == case.expected.signum() {
        Verdict::Passed
    } else {
        Verdict::Failed { score }
    };
    Ok(CaseResult {
        case: case.clone(),
        verdict,
        node_count: solver.node_count,
    })
}

/// Checks all `cases` in parallel, keeping the input order in the report
pub fn run(cases: Vec<TestCase>, max_depth: u32, show_progress: bool) -> Result<Report> {
    let total = cases.len();
    let progress = if show_progress {
        ProgressBar::new(total as u64)
    } else {
        ProgressBar::hidden()
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Checking positions: {bar:40.cyan/blue} {pos}/{len} {msg} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let (tx, rx) = channel();
    let worker = thread::spawn(move || {
        cases
            .into_par_iter()
            .enumerate()
            .for_each_with(tx, |tx, (index, case)| {
                // the receiver only hangs up after an error was reported
                let _ = tx.send((index, check(&case, max_depth)));
            });
    });

    let mut results = Vec::with_capacity(total);
    let mut failed = 0;
    for (index, result) in rx {
        let result = result?;
        if let Verdict::Failed { score } = result.verdict {
            warn!(
                "{}: expected {}, search returned {}",
                result.case.moves, result.case.expected, score
            );
            failed += 1;
            progress.set_message(&format!("({} failed)", failed));
        }
        results.push((index, result));
        progress.inc(1);
    }
    worker
        .join()
        .map_err(|_| anyhow!("test suite worker panicked"))?;
    progress.finish();

    results.sort_unstable_by_key(|(index, _)| *index);
    let report = Report {
        results: results.into_iter().map(|(_, result)| result).collect(),
    };
    info!(
        "{} passed, {} failed, {} skipped, {} nodes",
        report.passed(),
        report.failed(),
        report.skipped(),
        report.node_count()
    );
    Ok(report)
}
