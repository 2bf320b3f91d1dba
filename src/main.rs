//! Trigo: three-player Go in the terminal.
//!
//! ## Usage
//!
//! - `trigo play` - Start a new game (one human against two computer players by default)
//! - `trigo resume game.json` - Continue a saved game
//! - `trigo scores` - Show the leaderboard
//!
//! Human seats type a point as `x y` or `x,y`, or one of `pass`, `save`, `quit`.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use trigo::board::Board;
use trigo::config::GameConfig;
use trigo::constants::DEFAULT_SCOREBOARD_FILE;
use trigo::game::{Game, Turn};
use trigo::player::SeatKind;
use trigo::scoreboard::Scoreboard;
use trigo::snapshot::Snapshot;

/// Trigo: Go for three players
#[derive(Parser)]
#[command(name = "trigo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new game
    Play(PlayArgs),
    /// Continue a saved game
    Resume {
        /// Snapshot written by `save`
        file: PathBuf,
        /// Where to save on `save`/`quit` (defaults to FILE)
        #[arg(long)]
        save: Option<PathBuf>,
        /// Seed for the computer players
        #[arg(long)]
        seed: Option<u64>,
        /// Leaderboard file
        #[arg(long, default_value = DEFAULT_SCOREBOARD_FILE)]
        scoreboard: PathBuf,
    },
    /// Show the leaderboard
    Scores {
        /// Board size as WxH; all sizes when omitted
        #[arg(long)]
        size: Option<String>,
        /// Leaderboard file
        #[arg(long, default_value = DEFAULT_SCOREBOARD_FILE)]
        file: PathBuf,
    },
}

#[derive(Args, Default)]
struct PlayArgs {
    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Board size as WxH
    #[arg(long)]
    size: Option<String>,
    /// Seat kinds in turn order, e.g. human,heuristic,random
    #[arg(long)]
    players: Option<String>,
    /// Clock per color in seconds
    #[arg(long)]
    time: Option<f64>,
    /// Seconds added to a clock after each turn
    #[arg(long)]
    increment: Option<f64>,
    /// Seed for the computer players
    #[arg(long)]
    seed: Option<u64>,
    /// Where to save on `save`/`quit`
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Play(args)) => play(args),
        None => play(PlayArgs::default()),
        Some(Commands::Resume {
            file,
            save,
            seed,
            scoreboard,
        }) => {
            let snapshot = Snapshot::load(&file)
                .with_context(|| format!("failed to load game from {}", file.display()))?;
            let mut game = snapshot.restore(seed)?;
            let save = save.unwrap_or(file);
            run_game(&mut game, Some(&save), &scoreboard)
        }
        Some(Commands::Scores { size, file }) => show_scores(size.as_deref(), &file),
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(size) = &args.size {
        let board = Board::parse_size(size)?;
        config.width = board.width();
        config.height = board.height();
    }
    if let Some(players) = &args.players {
        config.players = parse_players(players)?;
    }
    if args.time.is_some() {
        config.time_limit_secs = args.time;
    }
    if let Some(increment) = args.increment {
        config.increment_secs = increment;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;

    let mut game = Game::from_config(&config)?;
    run_game(&mut game, args.save.as_deref(), &config.scoreboard)
}

fn parse_players(list: &str) -> Result<[SeatKind; 3]> {
    let kinds = list
        .split(',')
        .map(|s| s.parse::<SeatKind>().map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()?;
    match <[SeatKind; 3]>::try_from(kinds) {
        Ok(kinds) => Ok(kinds),
        Err(kinds) => bail!("expected 3 players, got {}", kinds.len()),
    }
}

/// Drive the game, reading human moves from stdin.
fn run_game(game: &mut Game, save: Option<&Path>, scoreboard: &Path) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    println!("{}", game.state());
    loop {
        match game.step() {
            Turn::Finished => break,
            Turn::Skipped(_) => {}
            Turn::Passed(color) => println!("{color} passes"),
            Turn::Played(color, placed) => {
                println!(
                    "{color} plays {:?}, captures {}",
                    placed.point, placed.captured
                );
                println!("{}", game.state());
            }
            Turn::AwaitingInput(color) => {
                write!(stdout, "{color} to move> ")?;
                stdout.flush()?;

                let Some(line) = lines.next() else {
                    return quit(game, save);
                };
                match line?.trim() {
                    "pass" => {
                        game.pass();
                    }
                    "save" => save_game(game, save)?,
                    "quit" => return quit(game, save),
                    text => {
                        let board = game.state().board();
                        match board.parse_point(text).and_then(|pt| game.play_point(pt)) {
                            Ok(_) => println!("{}", game.state()),
                            Err(e) if e.is_illegal_move() => {
                                debug!(error = %e, "rejected move");
                                println!("illegal move ({e}), try again");
                            }
                            Err(e) => println!("{e}; enter \"x,y\", pass, save or quit"),
                        }
                    }
                }
            }
        }
    }

    report(game, &mut lines, scoreboard)
}

fn report(
    game: &Game,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    scoreboard: &Path,
) -> Result<()> {
    let Some(outcome) = game.outcome() else {
        return Ok(());
    };
    println!("{}", game.state());
    for (color, score) in trigo::state::Color::PLAYERS.iter().zip(outcome.scores) {
        println!("{color}: {score}");
    }
    if outcome.is_draw() {
        let names: Vec<_> = outcome.winners.iter().map(|c| c.name()).collect();
        println!("Draw between {}", names.join(", "));
    } else {
        println!("{} wins", outcome.winners[0]);
    }

    if let Some((color, score)) = game.leaderboard_entry() {
        print!("Name for the scoreboard [{color}]: ");
        io::stdout().flush()?;
        let name = match lines.next() {
            Some(line) => line?.trim().to_string(),
            None => String::new(),
        };
        let name = if name.is_empty() { color.name().to_string() } else { name };
        let mut board = Scoreboard::open(scoreboard)
            .with_context(|| format!("failed to open scoreboard {}", scoreboard.display()))?;
        board.add_score(game.state().board(), &name, score)?;
        println!("recorded in {}", board.path().display());
    }
    Ok(())
}

fn save_game(game: &Game, save: Option<&Path>) -> Result<()> {
    match save {
        Some(path) => {
            Snapshot::capture(game)
                .save(path)
                .with_context(|| format!("failed to save game to {}", path.display()))?;
            println!("saved to {}", path.display());
        }
        None => println!("no save file given (use --save)"),
    }
    Ok(())
}

fn quit(game: &Game, save: Option<&Path>) -> Result<()> {
    if save.is_some() {
        save_game(game, save)?;
    }
    Ok(())
}

fn show_scores(size: Option<&str>, file: &Path) -> Result<()> {
    let scoreboard = Scoreboard::open(file)
        .with_context(|| format!("failed to open scoreboard {}", file.display()))?;

    let boards = match size {
        Some(size) => vec![Board::parse_size(size)?],
        None => scoreboard
            .sizes()
            .filter_map(|key| Board::parse_size(key).ok())
            .collect(),
    };

    for board in boards {
        println!("{board}:");
        for (rank, (name, score)) in scoreboard.scores(board).iter().enumerate() {
            println!("{:>3}. {name:<20} {score}", rank + 1);
        }
    }
    Ok(())
}
