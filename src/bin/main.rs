// File: src/bin/main.rs
use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Colors, Print, ResetColor, SetColors, StyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use drill_core::collab::{fetcher_for, AudioPlayer, CommandPlayer, SilentPlayer, ViewportScroller};
use drill_core::config::{DrillConfig, SourceLocation};
use drill_core::core::highlight::{HighlightNode, HighlightTag};
use drill_core::persistence::JsonFileStore;
use drill_core::{shuffle_rng, DrillEngine, DrillError};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

type Engine = DrillEngine<JsonFileStore, Box<dyn AudioPlayer>, ViewportScroller>;

/// Root-grouped vocabulary drill for the terminal.
#[derive(Debug, Parser)]
#[command(name = "drill", version)]
struct Cli {
    /// Word list: a file path or an http(s) URL.
    #[arg(long, short)]
    source: Option<String>,

    /// Session file (defaults to the platform config directory).
    #[arg(long)]
    state: Option<PathBuf>,

    /// Audio player command, e.g. "mpv --no-video". The pronunciation URL is appended.
    #[arg(long)]
    player: Option<String>,

    /// Pronunciation URL template; `{word}` is replaced by the headword.
    #[arg(long)]
    audio_url: Option<String>,

    /// Seed for the shuffle performed by reset.
    #[arg(long)]
    seed: Option<u64>,

    /// Rows of the current group shown at once.
    #[arg(long)]
    rows: Option<usize>,
}

impl Cli {
    fn into_config(self) -> DrillConfig {
        let mut config = DrillConfig::default();
        if let Some(source) = self.source {
            config.source = SourceLocation::parse(&source);
        }
        if let Some(state) = self.state {
            config.state_path = state;
        }
        if let Some(player) = self.player {
            let parts: Vec<String> = player.split_whitespace().map(str::to_string).collect();
            config.player_command = (!parts.is_empty()).then_some(parts);
        }
        if let Some(template) = self.audio_url {
            config.audio_url_template = template;
        }
        config.seed = self.seed.or(config.seed);
        config.visible_rows = self.rows.unwrap_or(config.visible_rows);
        config
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_config();
    if let Err(e) = run(&config) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn build_player(config: &DrillConfig) -> Box<dyn AudioPlayer> {
    match config.player_command.as_deref() {
        Some([program, args @ ..]) => Box::new(CommandPlayer::new(
            program.clone(),
            args.to_vec(),
            config.audio_url_template.clone(),
        )),
        _ => Box::new(SilentPlayer::new(config.audio_url_template.clone())),
    }
}

fn run(config: &DrillConfig) -> Result<(), DrillError> {
    let fetcher = fetcher_for(&config.source);
    let mut engine: Engine = DrillEngine::start(
        fetcher.as_ref(),
        JsonFileStore::new(config.state_path.clone()),
        build_player(config),
        ViewportScroller::new(config.visible_rows),
        shuffle_rng(config.seed),
    )?;

    loop {
        engine.reveal_current();
        print_ui(&engine)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }

        let result = match input.trim() {
            "q" | "exit" => break,
            "" => engine.advance_word(),
            "n" => engine.next_group(),
            "p" => engine.prev_group(),
            "m" => engine.toggle_mask(),
            "d" => engine.toggle_dark_mode(),
            "r" => engine.reset(),
            "s" => {
                engine.play_current();
                continue;
            }
            s if s.starts_with(':') && s.len() > 1 => match s[1..].parse::<usize>() {
                // Rows are numbered from 1 on screen.
                Ok(n) if n > 0 => engine.select_word(n - 1),
                _ => continue,
            },
            _ => continue,
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "Could not save session");
        }
    }

    let mut out = stdout();
    queue!(out, ResetColor, Print("\n"))?;
    out.flush()?;
    Ok(())
}

fn print_ui(engine: &Engine) -> Result<(), DrillError> {
    let session = engine.session();
    let mut out = stdout();

    let colors = if session.dark_mode {
        Colors::new(Color::White, Color::Black)
    } else {
        Colors::new(Color::Black, Color::White)
    };
    queue!(out, SetColors(colors), Clear(ClearType::All), MoveTo(0, 0))?;

    let progress = engine.progress();
    let header = session.current_group().map(|g| g.display_header()).unwrap_or_default();
    queue!(
        out,
        Print(format!("{}/{}\r\n", progress.current, progress.total)),
        Print(format!("{}\r\n", header.bold())),
        Print("---------------------------------------------------------------\r\n")
    )?;

    let rows = engine.rows();
    for row in &rows[engine.scroller().visible_range(rows.len())] {
        let marker = if row.selected { ">" } else { " " };
        queue!(out, Print(format!("{marker} {:>3} ", row.index + 1)))?;
        for piece in styled_headword(&row.headword) {
            queue!(out, Print(piece))?;
        }
        let definition = if session.mask_enabled { "····" } else { row.definition.as_str() };
        queue!(out, Print(format!("  [{}]  {}\r\n", row.phonetic, definition)))?;
    }

    queue!(
        out,
        Print("---------------------------------------------------------------\r\n"),
        Print("[Enter] next word  :N select  n/p group  s play  m mask  d dark  r reset  q quit\r\n"),
        Print("> ")
    )?;
    out.flush()?;
    Ok(())
}

/// Flattens the highlight tree into styled leaves: sibling text in yellow,
/// base text underlined, both when nested.
fn styled_headword(nodes: &[HighlightNode]) -> Vec<StyledContent<String>> {
    fn walk(nodes: &[HighlightNode], sibling: bool, base: bool, out: &mut Vec<StyledContent<String>>) {
        for node in nodes {
            match node {
                HighlightNode::Text(text) => {
                    let mut styled = text.clone().stylize();
                    if sibling {
                        styled = styled.yellow();
                    }
                    if base {
                        styled = styled.underlined();
                    }
                    out.push(styled);
                }
                HighlightNode::Span { tag, children, .. } => walk(
                    children,
                    sibling || *tag == HighlightTag::Sibling,
                    base || *tag == HighlightTag::Base,
                    out,
                ),
            }
        }
    }

    let mut out = Vec::new();
    walk(nodes, false, false, &mut out);
    out
}
