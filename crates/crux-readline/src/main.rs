mod helper;
mod offline;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing_subscriber::EnvFilter;

use crux_core::{ChallengeEngine, EngineConfig, IntensityFeedback, OrgContext, UserContext};
use crux_interaction::{ConversationSession, SessionSummary, TurnOutcome};

use helper::CliHelper;
use offline::OfflineCompletion;

type Repl = Editor<CliHelper, DefaultHistory>;

#[derive(Debug, PartialEq)]
enum Command {
    Say(String),
    Document { json: bool },
    Summary,
    Phase,
    Feedback(IntensityFeedback),
    End,
    Quit,
    Unknown(String),
}

fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Command::Say(trimmed.to_string());
    }

    let mut parts = trimmed.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (name, arg) {
        ("/doc", None) => Command::Document { json: false },
        ("/doc", Some("json")) => Command::Document { json: true },
        ("/summary", None) => Command::Summary,
        ("/phase", None) => Command::Phase,
        ("/soften", None) => Command::Feedback(IntensityFeedback::Soften),
        ("/sharpen", None) => Command::Feedback(IntensityFeedback::Sharpen),
        ("/end", None) => Command::End,
        ("/quit", None) | ("/exit", None) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crux=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `$CRUX_CONFIG`, then `~/.config/crux/config.toml` if it exists.
fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("CRUX_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir()
        .map(|home| home.join(".config").join("crux").join("config.toml"))
        .filter(|path| path.exists())
}

fn load_config() -> Result<EngineConfig> {
    match config_path() {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => {
            tracing::debug!("No configuration file found, using defaults");
            Ok(EngineConfig::default())
        }
    }
}

/// Reads one line. `None` means the user wants out (Ctrl-C or Ctrl-D).
fn read_line(rl: &mut Repl, prompt: &str) -> Result<Option<String>> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Asks for a persona until the engine accepts one. Returns `false` on exit.
fn start_session(
    rl: &mut Repl,
    engine: &ChallengeEngine,
    session: &mut ConversationSession,
) -> Result<bool> {
    let ids: Vec<String> = engine.catalog().ids().iter().map(|id| id.to_string()).collect();
    println!("{}", format!("Challengers: {}", ids.join(", ")).bright_black());

    let Some(name) = read_line(rl, "Your name: ")? else {
        return Ok(false);
    };
    let Some(company) = read_line(rl, "Company: ")? else {
        return Ok(false);
    };
    let user = if name.is_empty() {
        UserContext::default()
    } else {
        UserContext::new(name)
    };

    loop {
        let Some(persona) = read_line(rl, "Challenger: ")? else {
            return Ok(false);
        };
        match session.start(&persona, user.clone(), OrgContext::new(company.clone())) {
            Ok(_) => {
                let definition = engine.persona(&persona)?;
                println!(
                    "{}",
                    format!("{} is listening. Tell them what you're working on.", definition.display_name)
                        .bright_magenta()
                        .bold()
                );
                return Ok(true);
            }
            Err(e) if e.is_unknown_persona() => {
                println!("{}", format!("{}. Pick one of: {}", e, ids.join(", ")).yellow());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn print_outcome(engine: &ChallengeEngine, session: &ConversationSession, outcome: &TurnOutcome) {
    let speaker = session
        .persona()
        .and_then(|id| engine.catalog().get_by_id(id).ok())
        .map(|persona| persona.display_name.clone())
        .unwrap_or_else(|| "Challenger".to_string());

    println!("{}", format!("[{} | {}]", speaker, outcome.expression).bright_magenta());
    for line in outcome.text().lines() {
        println!("{}", line.bright_blue());
    }
    for failure in &outcome.degraded {
        println!(
            "{}",
            format!("({} unavailable: {})", failure.service, failure.reason).yellow()
        );
    }
    if outcome.advance_pending {
        if let Some(next) = outcome.turn.phase.next() {
            println!("{}", format!("Phase complete. Next up: {}", next.title()).bright_black());
        }
    }
    println!();
}

fn print_summary(summary: &SessionSummary) {
    println!("{}", "Session summary".bright_yellow().bold());
    println!("  persona:    {}", summary.persona);
    println!("  phase:      {}", summary.phase.title());
    println!("  intensity:  {:.1}", summary.intensity);
    println!(
        "  turns:      {} ({} yours, {} challenger)",
        summary.total_turns, summary.user_turns, summary.challenger_turns
    );
    for (phase, count) in &summary.turns_per_phase {
        println!("    {:<12}{}", phase.title(), count);
    }
    println!("  duration:   {}s", summary.duration_secs);
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let engine = Arc::new(ChallengeEngine::new(load_config()?));
    let mut session = ConversationSession::new(Arc::clone(&engine), Arc::new(OfflineCompletion));

    let mut rl: Repl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Crux ===".bright_magenta().bold());
    println!(
        "{}",
        "Commands: /doc, /doc json, /summary, /phase, /soften, /sharpen, /end, /quit".bright_black()
    );
    println!();

    'sessions: loop {
        if !start_session(&mut rl, &engine, &mut session)? {
            break;
        }

        loop {
            let prompt = match session.phase() {
                Some(phase) => format!("[{}] >> ", phase.title()),
                None => ">> ".to_string(),
            };
            let line = match rl.readline(&prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
                    continue;
                }
                Err(ReadlineError::Eof) => break 'sessions,
                Err(err) => {
                    eprintln!("{}", format!("Error: {:?}", err).red());
                    break 'sessions;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let _ = rl.add_history_entry(line.as_str());

            match parse_command(&line) {
                Command::Say(text) => match session.submit_user_utterance(&text).await {
                    Ok(outcome) => print_outcome(&engine, &session, &outcome),
                    Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                },
                Command::Document { json } => match session.request_document() {
                    Ok(document) if json => println!("{}", serde_json::to_string_pretty(&document)?),
                    Ok(document) => println!("{}", document.to_markdown()),
                    Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                },
                Command::Summary => match session.summary() {
                    Ok(summary) => print_summary(&summary),
                    Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                },
                Command::Phase => {
                    if let Some(phase) = session.phase() {
                        println!("{}", phase.title().bright_yellow().bold());
                        println!("{}", phase.guidance().bright_black());
                    }
                }
                Command::Feedback(feedback) => match session.apply_feedback(feedback) {
                    Ok(value) => println!("{}", format!("Intensity is now {:.1}", value).bright_black()),
                    Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                },
                Command::End => {
                    if let Some(summary) = session.end() {
                        print_summary(&summary);
                    }
                    continue 'sessions;
                }
                Command::Quit => break 'sessions,
                Command::Unknown(input) => {
                    println!("{}", format!("Unknown command: {}", input).bright_black());
                }
            }
        }
    }

    session.end();
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}
