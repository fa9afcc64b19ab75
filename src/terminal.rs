use anyhow::{Context, Result};
use campusgate::cell::{Cell, CellContent};
use campusgate::{
    Briefing, Event, GateConfig, Notice, Presenter, RoundInstance, SelectionState, TimeDisplay,
    Verdict, Verifier, build_cells, check_full_playthrough, odds,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play(Event),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "q" | "quit" => Some(Command::Quit),
        "s" | "submit" => Some(Command::Play(Event::Submit)),
        "?" | "h" | "help" => Some(Command::Help),
        other => match other.parse::<usize>() {
            Ok(number) if number > 0 => Some(Command::Play(Event::Toggle(number - 1))),
            _ => None,
        },
    }
}

/// Text renderer; alerts block until the next line of input.
struct TerminalPresenter<'a> {
    input: &'a Receiver<String>,
    out: io::Stdout,
    cols: usize,
    round_loaded: bool,
    closed: bool,
}

impl TerminalPresenter<'_> {
    fn print(&mut self, text: &str) {
        let mut out = self.out.lock();
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }

    fn print_cells(&mut self, cells: &[Cell]) {
        let mut grid = String::new();

        for cell in cells {
            let marker = match &cell.content {
                CellContent::Thumbnail(image) => format!("{}x{}", image.width(), image.height()),
                CellContent::Placeholder { .. } => "no preview".to_string(),
            };

            match cell.row_col(self.cols.max(1)) {
                (0, 0) => {}
                (_, 0) => grid.push('\n'),
                _ => grid.push_str("  "),
            }
            grid.push_str(&format!(
                "[{:>2}] {:<20} ({marker})",
                cell.position + 1,
                cell.asset.display_name()
            ));
        }

        self.print(&grid);
    }
}

impl Presenter for TerminalPresenter<'_> {
    fn show_round(&mut self, instance: &RoundInstance, briefing: &Briefing) {
        self.cols = instance.spec().cols;
        self.round_loaded = true;

        self.print(&format!(
            "\n== {} ==  Total Points: {}\n{}",
            briefing.status, briefing.points, briefing.instructions
        ));
        let cells = build_cells(instance);
        self.print_cells(&cells);
        self.print("Enter a cell number to toggle it, `s` to submit, `q` to quit.");
    }

    fn show_selection(&mut self, selection: &SelectionState) {
        let picked: Vec<String> = selection
            .positions()
            .map(|position| (position + 1).to_string())
            .collect();

        if selection.submit_enabled() {
            self.print(&format!("Selected: {}", picked.join(", ")));
        } else {
            self.print("Selected: none (submit disabled)");
        }
    }

    fn show_verdict(&mut self, verdict: &Verdict) {
        if !verdict.incorrect_positions.is_empty() {
            let wrong: Vec<String> = verdict
                .incorrect_positions
                .iter()
                .map(|position| (position + 1).to_string())
                .collect();
            self.print(&format!("Incorrect picks: {}", wrong.join(", ")));
        }
        if verdict.missed_count() > 0 {
            self.print(&format!("Campus images missed: {}", verdict.missed_count()));
        }
    }

    fn show_time(&mut self, display: &TimeDisplay) {
        if display.urgent || display.remaining % 10 == 0 {
            let flag = if display.urgent { " !" } else { "" };
            self.print(&format!("{display}{flag}"));
        }
    }

    fn alert(&mut self, notice: &Notice) {
        self.print(&format!(
            "\n*** {} ***\n{}\n(press Enter to continue)",
            notice.title(),
            notice.message()
        ));

        if !discard_pending(self.input) || self.input.recv().is_err() {
            self.closed = true;
        }
    }
}

/// Drops lines typed before an alert appeared, so only a fresh Enter dismisses it.
/// Returns `false` once stdin has closed.
fn discard_pending(input: &Receiver<String>) -> bool {
    loop {
        match input.try_recv() {
            Ok(line) => tracing::debug!(%line, "discarding input typed before alert"),
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });

    receiver
}

fn init_tracing(config: &GateConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

pub fn run() -> Result<()> {
    let mut config_path = None;
    for arg in std::env::args().skip(1) {
        if arg == "--odds" {
            for line in odds::report() {
                println!("{line}");
            }
            return Ok(());
        }
        config_path = Some(PathBuf::from(arg));
    }

    let config = GateConfig::load(config_path.as_deref()).unwrap_or_default();
    init_tracing(&config);
    tracing::debug!(path = ?GateConfig::path(), "configuration resolved");

    let catalog = config.catalog().context("failed to load image catalog")?;
    check_full_playthrough(&catalog).context("image catalog cannot cover every level")?;
    for line in odds::report() {
        tracing::debug!("bot odds {line}");
    }

    let input = spawn_stdin_reader();
    let mut presenter = TerminalPresenter {
        input: &input,
        out: io::stdout(),
        cols: 1,
        round_loaded: false,
        closed: false,
    };

    let mut verifier = Verifier::new(catalog, StdRng::from_entropy(), config.variant());
    verifier
        .start(&mut presenter)
        .context("cannot start verification")?;

    let mut next_tick = Instant::now() + TICK;

    while !presenter.closed {
        if std::mem::take(&mut presenter.round_loaded) {
            next_tick = Instant::now() + TICK;
        }

        let timeout = next_tick.saturating_duration_since(Instant::now());
        let event = match input.recv_timeout(timeout) {
            Ok(line) => match parse_command(&line) {
                Some(Command::Play(event)) => event,
                Some(Command::Quit) => break,
                Some(Command::Help) | None => {
                    presenter.print("Commands: <cell number>, s (submit), q (quit)");
                    continue;
                }
            },
            Err(RecvTimeoutError::Timeout) => {
                next_tick += TICK;
                Event::Tick
            }
            Err(RecvTimeoutError::Disconnected) => break,
        };

        verifier
            .handle(event, &mut presenter)
            .context("verification cannot continue")?;
    }

    tracing::info!(points = verifier.session().points(), "exiting");
    Ok(())
}
