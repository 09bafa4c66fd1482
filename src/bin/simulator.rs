// Line protocol front end: an external renderer writes commands on stdin and
// reads render and effect commands from stdout. Logs go to a file.
use clap::Parser;
use drill_core::collab::{fetcher_for, pronunciation_url, AudioPlayer, Scroller};
use drill_core::config::{DrillConfig, SourceLocation};
use drill_core::core::highlight::render_markup;
use drill_core::persistence::JsonFileStore;
use drill_core::{shuffle_rng, Action, DrillEngine, DrillError};
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

type Engine = DrillEngine<JsonFileStore, ProtocolPlayer, ProtocolScroller>;

#[derive(Debug, Parser)]
#[command(name = "drill_simulator", version)]
struct Cli {
    #[arg(long, short)]
    source: Option<String>,

    #[arg(long)]
    state: Option<PathBuf>,

    #[arg(long)]
    audio_url: Option<String>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "target/root_drill_simulator.log")]
    log_file: PathBuf,
}

/// Asks the renderer to play the pronunciation URL.
struct ProtocolPlayer {
    url_template: String,
}

impl AudioPlayer for ProtocolPlayer {
    fn play(&mut self, word: &str) {
        send(&format!("PLAY_AUDIO {}", pronunciation_url(&self.url_template, word)));
    }
}

struct ProtocolScroller;

impl Scroller for ProtocolScroller {
    fn ensure_visible(&mut self, group_index: usize, word_index: usize) {
        send(&format!("ENSURE_VISIBLE {group_index} {word_index}"));
    }
}

fn send(line: &str) {
    tracing::debug!("-> '{line}'");
    let mut stdout = io::stdout();
    if let Err(e) = writeln!(stdout, "{line}").and_then(|()| stdout.flush()) {
        tracing::error!(error = %e, "Could not write to renderer");
    }
}

fn init_logging(path: &Path) {
    if let Some(parent) = path.parent() {
        // The subscriber is not installed yet, so this goes to stderr.
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("warning: cannot create log directory {}: {e}", parent.display());
        }
    }
    // Old log is truncated on start.
    match File::create(path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init(),
        Err(e) => eprintln!("warning: logging disabled, cannot open {}: {e}", path.display()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_file);
    tracing::info!("--- Root drill simulator starting ---");

    let mut config = DrillConfig::default();
    if let Some(source) = cli.source {
        config.source = SourceLocation::parse(&source);
    }
    if let Some(state) = cli.state {
        config.state_path = state;
    }
    if let Some(template) = cli.audio_url {
        config.audio_url_template = template;
    }
    config.seed = cli.seed;

    if let Err(e) = run(&config) {
        tracing::error!(error = %e, "Simulator stopped");
        send(&format!("FATAL {e}"));
        std::process::exit(1);
    }
    tracing::info!("Shutting down");
}

fn run(config: &DrillConfig) -> Result<(), DrillError> {
    let fetcher = fetcher_for(&config.source);
    let mut engine: Engine = DrillEngine::start(
        fetcher.as_ref(),
        JsonFileStore::new(config.state_path.clone()),
        ProtocolPlayer {
            url_template: config.audio_url_template.clone(),
        },
        ProtocolScroller,
        shuffle_rng(config.seed),
    )?;
    render(&engine);

    for line in io::stdin().lock().lines() {
        let input = line?;
        tracing::debug!("<- '{input}'");
        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or("");

        let action = match command {
            "SELECT_WORD" => match parts.get(1).and_then(|s| s.parse().ok()) {
                Some(index) => Action::SelectWord(index),
                None => {
                    send("ERROR SELECT_WORD needs a row index");
                    continue;
                }
            },
            "ADVANCE_WORD" => Action::AdvanceWord,
            "NEXT_GROUP" => Action::NextGroup,
            "PREV_GROUP" => Action::PrevGroup,
            "RESET" => Action::Reset,
            "TOGGLE_MASK" => Action::ToggleMask,
            "TOGGLE_DARK_MODE" => Action::ToggleDarkMode,
            "PLAY" => {
                engine.play_current();
                continue;
            }
            "RENDER" => {
                render(&engine);
                continue;
            }
            "EXIT" => break,
            _ => {
                tracing::warn!(command, "Received unknown command");
                send(&format!("ERROR unknown command {command}"));
                continue;
            }
        };

        match engine.dispatch(action) {
            Ok(outcome) => send(&format!("OUTCOME {outcome:?}")),
            Err(e) => {
                tracing::error!(error = %e, "Could not save session");
                send(&format!("ERROR {e}"));
            }
        }
        render(&engine);
    }
    Ok(())
}

fn render(engine: &Engine) {
    let session = engine.session();
    let progress = engine.progress();

    send("BEGIN_RENDER");
    send(if session.dark_mode { "THEME dark" } else { "THEME light" });
    if let Some(group) = session.current_group() {
        send(&format!("HEADER {}", group.display_header()));
    }
    send(&format!("PROGRESS {} {}", progress.current, progress.total));
    send(&format!("MASK {}", session.mask_enabled));
    for row in engine.rows() {
        let definition = if session.mask_enabled { "" } else { row.definition.as_str() };
        send(&format!(
            "ROW {} {} {}\t[{}]\t{}",
            row.index,
            u8::from(row.selected),
            render_markup(&row.headword),
            row.phonetic,
            definition
        ));
    }
    send("END_RENDER");
}
