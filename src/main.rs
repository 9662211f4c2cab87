use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use keyfall::app::App;
use keyfall::config::Config;
use keyfall::engine::progression::{self, LevelState, Progression};
use keyfall::event::NullSink;
use keyfall::generator::{ContentProvider, Curriculum};
use keyfall::logging::{LogConfig, init_logging};
use keyfall::session::Mode;
use keyfall::session::result::SessionResult;

#[derive(Parser)]
#[command(name = "keyfall", version, about = "Typing-practice sessions: falling letters and text drills")]
struct Cli {
    #[arg(short, long, action = ArgAction::Count, global = true, help = "More log output (-v, -vv, -vvv)")]
    verbose: u8,

    #[arg(long, global = true, help = "Config file (default: user config dir)")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the falling-mode letters for a level
    Letters {
        #[arg(long)]
        level: u32,
        #[arg(long, help = "Number of letters (default from config)")]
        count: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the text-mode block for a level
    Text {
        #[arg(long)]
        level: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the stage that follows a finished one
    Next {
        #[arg(long, value_enum)]
        mode: ModeArg,
        #[arg(long)]
        level: u32,
    },
    /// Type `keys` into a fresh session and print its result as JSON
    Replay {
        #[arg(long, value_enum)]
        mode: ModeArg,
        #[arg(long)]
        level: u32,
        #[arg(long)]
        keys: String,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Falling,
    Text,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Falling => Mode::Falling,
            ModeArg::Text => Mode::Text,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose))?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Command::Letters { level, count, seed } => {
            let mut curriculum = load_curriculum(&config, seed)?;
            let count = count.unwrap_or(config.falling_letter_count);
            let letters = curriculum.letters_for_falling(level, count);
            if letters.is_empty() {
                bail!("no content for level {level}");
            }
            let line: Vec<String> = letters.iter().map(|c| c.to_string()).collect();
            println!("{}", line.join(" "));
        }
        Command::Text { level, seed } => {
            let mut curriculum = load_curriculum(&config, seed)?;
            let text = curriculum.text_for_level(level);
            if text.is_empty() {
                bail!("no content for level {level}");
            }
            println!("{text}");
        }
        Command::Next { mode, level } => {
            let mut curriculum = load_curriculum(&config, None)?;
            let finished = LevelState::new(level, mode.into());
            match progression::next(finished, &mut curriculum) {
                Progression::Next(state) => println!("{}", serde_json::to_string(&state)?),
                Progression::EndOfContent => println!("end of content"),
            }
        }
        Command::Replay {
            mode,
            level,
            keys,
            seed,
        } => {
            let curriculum = load_curriculum(&config, seed)?;
            let result = replay(config, curriculum, LevelState::new(level, mode.into()), &keys)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn load_curriculum(config: &Config, seed: Option<u64>) -> Result<Curriculum> {
    let curriculum = Curriculum::load(&config.curriculum)
        .with_context(|| format!("loading curriculum {:?}", config.curriculum))?
        .with_new_symbol_fraction(config.new_symbol_fraction);
    Ok(match seed {
        Some(seed) => curriculum.with_seed(seed),
        None => curriculum,
    })
}

/// Feeds `keys` one character at a time until they run out or the session ends.
fn replay(config: Config, curriculum: Curriculum, stage: LevelState, keys: &str) -> Result<SessionResult> {
    let mut app = App::new(config, curriculum, NullSink).with_level(stage);
    app.start_stage()?;
    for key in keys.chars() {
        let finished = app.session().is_none_or(|s| s.state().is_terminal());
        if finished {
            break;
        }
        app.submit_key(key)?;
    }
    let session = app.session().context("session disappeared during replay")?;
    Ok(SessionResult::from_session(session, stage.level, Instant::now()))
}
