use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};
use std::path::PathBuf;

use connect4_search::{
    board::Board,
    config::{Algorithm, ScorerKind, SearchConfig},
    grid::Cell,
    score::{MatrixScorer, MobilityScorer, Scorer},
    solver::{analyse, Solver},
    test_suite, WIDTH,
};

#[derive(Parser)]
#[command(name = "connect4", version, about = "Search Connect 4 positions")]
struct Cli {
    /// Log more, repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score the position reached by a move string such as 4453
    Analyse {
        /// 1-indexed columns, played in order
        #[arg(default_value = "")]
        moves: String,

        #[arg(short, long, value_enum)]
        algorithm: Option<Algorithm>,

        #[arg(short, long, value_enum)]
        scorer: Option<ScorerKind>,

        /// Search depth in plies
        #[arg(short, long)]
        depth: Option<i32>,

        #[arg(long, allow_hyphen_values = true)]
        alpha: Option<i32>,

        #[arg(long, allow_hyphen_values = true)]
        beta: Option<i32>,

        /// Stop proving once this many nodes have been visited
        #[arg(short, long)]
        node_budget: Option<u64>,

        /// Slots in the transposition table
        #[arg(long)]
        table_capacity: Option<usize>,

        /// Also report the best column to play
        #[arg(short, long)]
        best_move: bool,

        /// Print the board as plain text
        #[arg(long)]
        plain: bool,
    },
    /// Check searches against files of "<moves> <score>" lines
    Suite {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Skip positions that need a deeper search than this
        #[arg(short, long, default_value_t = 8)]
        max_depth: u32,

        #[arg(long)]
        no_progress: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Analyse {
            moves,
            algorithm,
            scorer,
            depth,
            alpha,
            beta,
            node_budget,
            table_capacity,
            best_move,
            plain,
        } => {
            let defaults = SearchConfig::default();
            let config = SearchConfig {
                algorithm: algorithm.unwrap_or(defaults.algorithm),
                scorer: scorer.unwrap_or(defaults.scorer),
                depth: depth.unwrap_or(defaults.depth),
                alpha: alpha.unwrap_or(defaults.alpha),
                beta: beta.unwrap_or(defaults.beta),
                node_budget: node_budget.or(defaults.node_budget),
                table_capacity: table_capacity.unwrap_or(defaults.table_capacity),
            };
            let board = Board::from_moves(&moves)?;

            if plain {
                println!("{}", board);
            } else {
                display(&board)?;
            }

            let analysis = analyse(board, &config)?;
            println!(
                "{}: score: {}, visits: {}{}",
                config.algorithm,
                analysis.score,
                analysis.node_count,
                if analysis.budget_exhausted {
                    " (node budget exhausted, score is not proven)"
                } else {
                    ""
                }
            );

            if best_move {
                let (score, column) = match config.scorer {
                    ScorerKind::Matrix => find_best_move(board, MatrixScorer, &config)?,
                    ScorerKind::Mobility => find_best_move(board, MobilityScorer, &config)?,
                };
                println!("Best move: {} (score {})", column + 1, score);
            }
        }
        Command::Suite {
            files,
            max_depth,
            no_progress,
        } => {
            for file in files {
                let cases = test_suite::load(&file)?;
                let report = test_suite::run(cases, max_depth, !no_progress)?;
                println!(
                    "{}: {} passed, {} failed, {} skipped, {} positions searched",
                    file.display(),
                    report.passed(),
                    report.failed(),
                    report.skipped(),
                    report.node_count()
                );
            }
        }
    }
    Ok(())
}

fn find_best_move<S: Scorer>(
    board: Board,
    scorer: S,
    config: &SearchConfig,
) -> Result<(i32, usize)> {
    let mut solver = Solver::new(board, scorer);
    if let Some(budget) = config.node_budget {
        solver = solver.with_node_budget(budget);
    }
    Ok(solver.best_move(config.depth)?)
}

fn display(board: &Board) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;

    for row in board.grid().rows() {
        for cell in row.iter() {
            stdout.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(match cell {
                        Cell::PlayerOne => Color::Red,
                        Cell::PlayerTwo => Color::Yellow,
                        Cell::Empty => Color::DarkBlue,
                    }),
            ))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;
    Ok(())
}
