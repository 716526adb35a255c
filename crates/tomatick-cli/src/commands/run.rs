//! The `run` command: periodic tick source and presentation layer.
//!
//! Drives the core engine once per configured interval and renders each
//! callback as a rewritten countdown line (interactive terminals), plain
//! lines (piped output), or one JSON object per tick (`--json`). The engine
//! never self-schedules; the single select loop here both fires the ticks
//! and serializes the start/reset key presses against them.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use clap::Args;
use crossterm::cursor::MoveToColumn;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use futures::StreamExt;
use notify_rust::Notification;
use tokio::time::MissedTickBehavior;
use tomatick_core::{Config, CountdownEngine, PhaseKind, TickObserver};

#[derive(Args)]
pub struct RunArgs {
    /// Start counting immediately instead of waiting for `s`
    #[arg(long)]
    start: bool,
    /// Initial phase index (0-7)
    #[arg(long, default_value_t = 0)]
    phase: usize,
    /// Override the configured tick interval in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: Option<u64>,
    /// Exit after this many ticks (for scripting)
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Emit one JSON line per tick instead of redrawing the countdown
    #[arg(long)]
    json: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut engine = CountdownEngine::new(config.phase_table());
    engine.reset(args.phase)?;
    if args.start {
        engine.start();
    }

    let interval_ms = args.interval_ms.unwrap_or(config.timer.tick_interval_ms);
    let interactive = io::stdout().is_terminal() && !args.json;
    let notify = config.notifications.enabled && interactive;
    let mut presenter = Presenter::new(args.json, interactive, notify);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    if interactive {
        runtime.block_on(interactive_loop(
            &mut engine,
            &mut presenter,
            interval_ms,
            args.max_ticks,
        ))
    } else {
        runtime.block_on(headless_loop(
            &mut engine,
            &mut presenter,
            interval_ms,
            args.max_ticks,
        ));
        Ok(())
    }
}

fn tick_interval(interval_ms: u64) -> tokio::time::Interval {
    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
    // A delayed tick must not be followed by a burst; keep wall-clock pacing.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Non-interactive loop: no raw mode, no key handling. Used for piped
/// output and `--json` so the command stays scriptable.
async fn headless_loop(
    engine: &mut CountdownEngine,
    presenter: &mut Presenter,
    interval_ms: u64,
    max_ticks: Option<u64>,
) {
    let mut ticker = tick_interval(interval_ms);
    let mut ticks = 0u64;
    loop {
        ticker.tick().await;
        engine.tick(presenter);
        ticks += 1;
        if max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }
    }
}

async fn interactive_loop(
    engine: &mut CountdownEngine,
    presenter: &mut Presenter,
    interval_ms: u64,
    max_ticks: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let _guard = RawModeGuard::enable()?;
    execute!(io::stdout(), Print("s: start  r: reset  q: quit\r\n"))?;

    let mut events = EventStream::new();
    let mut ticker = tick_interval(interval_ms);
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                engine.tick(presenter);
                ticks += 1;
                if max_ticks.is_some_and(|max| ticks >= max) {
                    break;
                }
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match key.code {
                        KeyCode::Char('s') => engine.start(),
                        KeyCode::Char('r') => engine.reset(0)?,
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            break;
                        }
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        _ => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            }
        }
    }

    let snap = engine.snapshot();
    execute!(
        io::stdout(),
        Print(format!(
            "\r\nstopped at {} ({})\r\n",
            snap.display, snap.phase_label
        ))
    )?;
    Ok(())
}

/// Restores the terminal even when the loop exits through `?`.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Renders each tick callback and fires the phase-change cue.
///
/// The engine reports only the display string and the phase index; the
/// phase label, the check-mark row, and the change detection are all
/// derived here, on the consumer side of the callback contract.
struct Presenter {
    json: bool,
    rewrite_line: bool,
    notify: bool,
    prev_phase: Option<usize>,
}

impl Presenter {
    fn new(json: bool, rewrite_line: bool, notify: bool) -> Self {
        Self {
            json,
            rewrite_line,
            notify,
            prev_phase: None,
        }
    }

    /// True when the phase differs from the previous callback's. Never true
    /// on the first callback.
    fn phase_changed(&mut self, phase: usize) -> bool {
        let changed = self.prev_phase.is_some_and(|prev| prev != phase);
        self.prev_phase = Some(phase);
        changed
    }
}

impl TickObserver for Presenter {
    fn on_tick(&mut self, display: &str, phase: usize) {
        let kind = PhaseKind::of(phase);
        let changed = self.phase_changed(phase);

        if self.json {
            let line = serde_json::json!({
                "display": display,
                "phase_index": phase,
                "phase": kind.label(),
                "phase_changed": changed,
            });
            let mut stdout = io::stdout();
            let _ = writeln!(stdout, "{line}");
            let _ = stdout.flush();
        } else if self.rewrite_line {
            let marks = "\u{2714}".repeat(phase + 1);
            let bell = if changed { "\x07" } else { "" };
            let line = format!("{:<10} {display}  {marks}{bell}", kind.label());
            let _ = execute!(
                io::stdout(),
                MoveToColumn(0),
                Clear(ClearType::CurrentLine),
                Print(line)
            );
        } else {
            println!("{} {display}", kind.label());
        }

        if changed && self.notify {
            notify_phase_change(kind);
        }
    }
}

fn notify_phase_change(kind: PhaseKind) {
    let body = match kind {
        PhaseKind::Work => "Rest is over. Back to work.",
        PhaseKind::ShortRest => "Work block complete. Take a short rest.",
        PhaseKind::LongRest => "Cycle complete. Take a long rest.",
    };
    if let Err(e) = Notification::new()
        .summary("Tomatick")
        .body(body)
        .show()
    {
        tracing::warn!("failed to send desktop notification: {e}");
    }
}
