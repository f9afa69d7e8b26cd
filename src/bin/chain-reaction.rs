use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use chain_reaction::{
    AgentEndpoint, Board, Color, ExchangeAgent, ExchangeConfig, FileChannel, GameConfig, GameMode,
    MoveOutcome, Position, RandomAgent, Seat, Session, WaveReport,
};

/// Consecutive failed agent turns tolerated before giving up.
const MAX_AGENT_FAULTS: u32 = 10;

/// Chain Reaction in the terminal, or as an external agent.
#[derive(Parser, Debug)]
#[command(name = "chain-reaction", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game in the terminal. Enter moves as `row col`.
    Play {
        /// Game mode: hvh, hva or ava.
        #[arg(long, default_value = "hvh")]
        mode: GameMode,

        /// Board rows.
        #[arg(long, default_value_t = 9)]
        rows: usize,

        /// Board columns.
        #[arg(long, default_value_t = 6)]
        cols: usize,

        /// What plays Blue when Blue is an agent. Red's agent is always random.
        #[arg(long, value_enum, default_value_t = AgentKind::Random)]
        agent: AgentKind,

        /// Exchange file for `--agent file`.
        #[arg(long, default_value = "gamestate.txt")]
        file: PathBuf,

        /// Seed for random agents.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Print the board after every explosion wave.
        #[arg(long)]
        waves: bool,
    },

    /// Serve random moves over an exchange file.
    Agent {
        /// Exchange file shared with the host.
        #[arg(long, default_value = "gamestate.txt")]
        file: PathBuf,

        /// Colour this agent plays (R or B).
        #[arg(long, default_value = "B", value_parser = parse_color)]
        color: Color,

        /// RNG seed.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Poll interval in milliseconds.
        #[arg(long, default_value_t = 500)]
        poll_ms: u64,

        /// Stop after this many moves.
        #[arg(long)]
        turns: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    /// In-process random moves.
    Random,
    /// Another process, through the exchange file.
    File,
}

fn parse_color(text: &str) -> Result<Color, String> {
    let mut chars = text.trim().chars();
    let color = chars
        .next()
        .and_then(|c| Color::from_symbol(c.to_ascii_uppercase()));
    match (color, chars.next()) {
        (Some(color), None) => Ok(color),
        _ => Err(format!("expected R or B, got {text:?}")),
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Play {
            mode,
            rows,
            cols,
            agent,
            file,
            seed,
            waves,
        } => {
            let config = GameConfig::default().with_dimensions(rows, cols).with_mode(mode);
            run_play(config, agent, file, seed, waves)
        }
        Command::Agent {
            file,
            color,
            seed,
            poll_ms,
            turns,
        } => run_agent(file, color, seed, poll_ms, turns),
    }
}

fn run_play(
    config: GameConfig,
    agent: AgentKind,
    file: PathBuf,
    seed: u64,
    waves: bool,
) -> ExitCode {
    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let (red, blue) = RandomAgent::pair(seed);
    session.set_agent(Color::Red, Box::new(red));
    match agent {
        AgentKind::Random => {
            session.set_agent(Color::Blue, Box::new(blue));
        }
        AgentKind::File => {
            let exchange = ExchangeConfig::default().with_path(file);
            let channel = FileChannel::new(exchange.path.clone());
            session.set_agent(Color::Blue, Box::new(ExchangeAgent::new(channel, exchange)));
        }
    }

    let mut show_wave = |report: &WaveReport, board: &Board| {
        if waves {
            println!("-- wave {} ({} explosions)", report.wave, report.detonated.len());
            print!("{board}");
        }
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut faults = 0;
    loop {
        print!("{}", session.board());
        println!("{}", session.status());
        if session.status().is_over() {
            return ExitCode::SUCCESS;
        }

        if session.controller().seat_to_move() == Seat::Agent {
            match session.step_agent(&mut show_wave) {
                Ok(_) => faults = 0,
                Err(e) if e.is_recoverable() && faults < MAX_AGENT_FAULTS => {
                    faults += 1;
                    eprintln!("Agent fault ({faults}/{MAX_AGENT_FAULTS}): {e}, asking again");
                }
                Err(e) => {
                    eprintln!("Agent error: {e}");
                    return ExitCode::FAILURE;
                }
            }
            continue;
        }

        print!("> ");
        // A failed flush only delays the prompt.
        let _ = io::stdout().flush();
        let Some(Ok(line)) = lines.next() else {
            return ExitCode::SUCCESS;
        };
        match line.trim() {
            "q" | "quit" => return ExitCode::SUCCESS,
            "r" | "reset" => {
                session.reset();
                continue;
            }
            input => match parse_move(input) {
                Some(pos) => {
                    let outcome = session.human_move_observed(pos, &mut show_wave);
                    if let MoveOutcome::Rejected(reason) = outcome {
                        println!("Ignored: {reason}");
                    }
                }
                None => println!("Enter `row col`, `r` to reset or `q` to quit"),
            },
        }
    }
}

fn parse_move(input: &str) -> Option<Position> {
    let mut parts = input.split_whitespace().map(str::parse::<usize>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(row)), Some(Ok(col)), None) => Some(Position::new(row, col)),
        _ => None,
    }
}

fn run_agent(
    file: PathBuf,
    color: Color,
    seed: u64,
    poll_ms: u64,
    turns: Option<usize>,
) -> ExitCode {
    let poll = Duration::from_millis(poll_ms);
    let config = ExchangeConfig::default().with_path(file).with_polling(poll, poll);
    if let Err(e) = config.validate() {
        eprintln!("Config error: {e}");
        return ExitCode::FAILURE;
    }

    eprintln!("Agent playing {color} on {}. Waiting for Human Move...", config.path.display());
    let endpoint = AgentEndpoint::new(FileChannel::new(config.path.clone()), config);
    let mut agent = RandomAgent::new(seed);
    match endpoint.serve(&mut agent, color, turns) {
        Ok(served) => {
            eprintln!("Served {served} moves");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Agent error: {e}");
            ExitCode::FAILURE
        }
    }
}
