use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use codetype::config::Config;
use codetype::engine::history::{HistorySummary, SessionRecord, Timeframe};
use codetype::engine::progress::UserProgress;
use codetype::session::analysis::SessionAnalysis;
use codetype::session::result::{self, SessionResult};
use codetype::snippets::{Difficulty, SnippetLibrary};
use codetype::store::json_store::JsonStore;
use codetype::store::{ProgressRepository, UserKey};

#[derive(Parser)]
#[command(name = "codetype", version, about = "Typing practice for code")]
struct Cli {
    #[arg(short, long, global = true, help = "User id (guest progress when omitted)")]
    user: Option<String>,

    #[arg(short, long, global = true, help = "Path to config.toml")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score typed text against a target without recording it
    Score(ScoreArgs),
    /// Score a finished session and add it to the user's progress
    Record {
        #[command(flatten)]
        score: ScoreArgs,
        #[arg(short, long, help = "Snippet language")]
        language: Option<String>,
        #[arg(short, long, value_enum, help = "Snippet difficulty")]
        difficulty: Option<Difficulty>,
    },
    /// Show level, XP and stats
    Status,
    /// Print a snippet that hasn't been served recently
    Snippet {
        #[arg(short, long)]
        language: Option<String>,
        #[arg(short, long, value_enum)]
        difficulty: Option<Difficulty>,
    },
    /// Summarize recorded sessions
    History {
        #[arg(short, long, value_enum, default_value = "all")]
        timeframe: Timeframe,
    },
    /// Wipe the user's progress
    Reset {
        #[arg(long, help = "Also clear session history")]
        history: bool,
    },
}

#[derive(Args)]
struct ScoreArgs {
    #[arg(long, help = "File holding the target snippet")]
    target: PathBuf,
    #[arg(long, help = "File holding what was typed")]
    typed: PathBuf,
    #[arg(long, help = "Seconds spent typing")]
    elapsed: f64,
    #[arg(long, help = "Seconds left on the timer")]
    time_left: Option<u32>,
    #[arg(long, help = "Session length in seconds (config default when omitted)")]
    duration: Option<u32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let library = match &config.snippets_file {
        Some(path) => SnippetLibrary::from_file(Path::new(path))?,
        None => SnippetLibrary::builtin()?,
    };
    config.validate(&library.languages());

    let store = JsonStore::with_base_dir(PathBuf::from(&config.data_dir))?;
    let user = UserKey::from_option(cli.user.as_deref());

    match cli.command {
        Command::Score(args) => {
            let (target, typed, result) = score_from_args(&args, &config)?;
            let analysis = SessionAnalysis::new(&target, &typed, &result);
            print_json(&json!({ "result": result, "analysis": analysis }))
        }
        Command::Record {
            score,
            language,
            difficulty,
        } => {
            let (target, typed, result) = score_from_args(&score, &config)?;
            let analysis = SessionAnalysis::new(&target, &typed, &result);
            let record = SessionRecord {
                recorded_at: Utc::now(),
                language: language.unwrap_or_else(|| config.language.clone()),
                difficulty: difficulty.unwrap_or(config.difficulty),
                result: result.clone(),
                missed: analysis.missed.clone(),
            };
            let today = Local::now().date_naive();
            let outcome = store.record_session(&user, record, today, config.history_limit)?;

            let unlocked: Vec<_> = outcome
                .newly_unlocked
                .iter()
                .map(|def| json!({ "id": def.id, "name": def.name, "xp": def.xp_reward }))
                .collect();
            print_json(&json!({
                "result": result,
                "analysis": analysis,
                "earned_xp": outcome.earned_xp,
                "total_xp": outcome.progress.total_xp,
                "level": outcome.level(),
                "newly_unlocked": unlocked,
            }))
        }
        Command::Status => {
            let progress = store.load_progress(&user)?;
            print_status(&user, &progress);
            Ok(())
        }
        Command::Snippet {
            language,
            difficulty,
        } => {
            let language = language.unwrap_or_else(|| config.language.clone());
            let difficulty = difficulty.unwrap_or(config.difficulty);
            let mut rotation = store.load_rotation()?;
            let snippet =
                rotation.pick(&library, &language, difficulty, &mut rand::thread_rng())?;
            store.save_rotation(&rotation)?;
            println!("# {} ({} {}, {})", snippet.description, language, difficulty, snippet.id);
            println!("{}", snippet.code);
            Ok(())
        }
        Command::History { timeframe } => {
            let sessions = store.load_history(&user)?;
            match HistorySummary::from_records(&sessions, timeframe, Utc::now()) {
                Some(summary) => print_json(&summary),
                None => {
                    println!("No sessions recorded for {user} in that timeframe.");
                    Ok(())
                }
            }
        }
        Command::Reset { history } => {
            store.reset_progress(&user)?;
            if history {
                store.clear_history(&user)?;
            }
            println!("Progress reset for {user}.");
            Ok(())
        }
    }
}

fn score_from_args(args: &ScoreArgs, config: &Config) -> Result<(String, String, SessionResult)> {
    let target = read_text(&args.target)?;
    let typed = read_text(&args.typed)?;
    let duration = args.duration.unwrap_or(config.session_duration_secs);
    let time_left = args
        .time_left
        .unwrap_or_else(|| (duration as f64 - args.elapsed).max(0.0).ceil() as u32);
    let result = result::score(&target, &typed, args.elapsed, time_left, duration)?;
    Ok((target, typed, result))
}

/// Read a text file, dropping one trailing newline added by editors.
fn read_text(path: &Path) -> Result<String> {
    let mut text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_status(user: &UserKey, progress: &UserProgress) {
    let level = progress.level_progress();
    let stats = &progress.stats;
    println!("User:         {user}");
    println!(
        "Level:        {} ({} XP, {:.0}% to level {}, {} XP to go)",
        level.level,
        progress.total_xp,
        level.percent,
        level.level + 1,
        level.xp_to_next_level(progress.total_xp)
    );
    println!("Sessions:     {}", stats.total_sessions);
    println!("Words typed:  {}", stats.total_words_typed);
    println!("Time typing:  {:.0}s", stats.total_time_secs);
    println!("Best WPM:     {}", stats.best_wpm);
    println!("Best acc:     {}%", stats.best_accuracy);
    println!("Perfect:      {}", stats.perfect_sessions);
    println!(
        "Streak:       {} day(s) (best {})",
        stats.streak_days, stats.best_streak
    );
    if progress.achievements.is_empty() {
        println!("Achievements: none yet");
    } else {
        let names: Vec<&str> = progress
            .achievements
            .iter()
            .filter_map(|id| codetype::engine::achievements::find(*id))
            .map(|def| def.name)
            .collect();
        println!("Achievements: {}", names.join(", "));
    }
}
