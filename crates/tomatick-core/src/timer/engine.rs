//! Countdown engine implementation.
//!
//! The engine is a tick-driven state machine. It has no internal clock and
//! spawns no threads - the caller invokes [`CountdownEngine::tick`] once per
//! interval, and the engine notifies a [`TickObserver`] exactly once per
//! call, synchronously, before `tick` returns.
//!
//! ## Phase cycle
//!
//! ```text
//! 0 Work -> 1 Short Rest -> 2 Work -> ... -> 6 Work -> 7 Long Rest -> 0
//! ```
//!
//! The only transition is the forward edge `i -> (i + 1) % 8`, taken when a
//! running phase drains to zero. Rolling over onto phase 0 also stops the
//! engine; the next cycle does not begin until `start()` is called again.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new(PhaseTable::default());
//! engine.start();
//! // Once per interval:
//! engine.tick(&mut |display: &str, phase: usize| render(display, phase));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::phase::{PhaseKind, PhaseTable, PHASE_COUNT};
use crate::error::CoreError;

/// Per-tick notification contract.
///
/// Invoked synchronously by [`CountdownEngine::tick`], exactly once per
/// call, with the authoritative display string and phase index at that
/// instant. Consumers that need to react to phase changes compare the phase
/// index against the previous invocation's value.
pub trait TickObserver {
    fn on_tick(&mut self, display: &str, phase: usize);
}

impl<F> TickObserver for F
where
    F: FnMut(&str, usize),
{
    fn on_tick(&mut self, display: &str, phase: usize) {
        self(display, phase)
    }
}

/// Point-in-time view of the engine, for status output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub running: bool,
    pub phase_index: usize,
    pub phase_kind: PhaseKind,
    pub phase_label: String,
    pub remaining_secs: u64,
    pub display: String,
    pub at: DateTime<Utc>,
}

/// Core countdown engine.
///
/// Owns the session state and advances it deterministically once per `tick`
/// call, cycling forever through the 8-phase table. One explicit value per
/// session - callers hold and pass the engine themselves; there is no
/// process-wide instance.
#[derive(Debug, Clone)]
pub struct CountdownEngine {
    table: PhaseTable,
    phase_index: usize,
    /// Seconds left in the current phase, counting down to zero.
    remaining_secs: u64,
    running: bool,
    /// "MM:SS" rendering of `remaining_secs`, recomputed on every change.
    display: String,
}

impl CountdownEngine {
    /// Create a new engine positioned at phase 0, not running.
    pub fn new(table: PhaseTable) -> Self {
        let remaining_secs = table.duration_secs(0);
        Self {
            table,
            phase_index: 0,
            remaining_secs,
            running: false,
            display: format_clock(remaining_secs),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current countdown as "MM:SS", zero-padded.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.table.kind(self.phase_index)
    }

    pub fn table(&self) -> &PhaseTable {
        &self.table
    }

    /// Build a full state snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let kind = self.phase_kind();
        Snapshot {
            running: self.running,
            phase_index: self.phase_index,
            phase_kind: kind,
            phase_label: kind.label().to_string(),
            remaining_secs: self.remaining_secs,
            display: self.display.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Reposition the engine at the start of `phase`.
    ///
    /// Resetting to phase 0 also stops the countdown; resetting to any other
    /// phase leaves the running flag alone, which is what lets an in-flight
    /// session roll from one phase into the next without pausing.
    ///
    /// # Errors
    ///
    /// Rejects `phase` outside the cycle with [`CoreError::InvalidPhase`],
    /// leaving the session state unchanged.
    pub fn reset(&mut self, phase: usize) -> Result<(), CoreError> {
        if phase >= PHASE_COUNT {
            return Err(CoreError::InvalidPhase { phase });
        }
        self.apply_reset(phase);
        Ok(())
    }

    /// Begin (or continue) counting down. Idempotent; touches neither the
    /// phase index nor the remaining time.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Advance the countdown by one tick.
    ///
    /// Exactly one observer invocation per call:
    /// - stopped: state is untouched, the observer still sees the current
    ///   display and phase so a presentation layer stays fresh while paused
    /// - counting: the remaining time drops by one second
    /// - drained: the engine rolls over to the next phase and the observer
    ///   sees the new phase's values
    pub fn tick<O: TickObserver + ?Sized>(&mut self, observer: &mut O) {
        if self.running {
            if self.remaining_secs > 0 {
                self.remaining_secs -= 1;
                self.display = format_clock(self.remaining_secs);
            } else {
                let next = (self.phase_index + 1) % PHASE_COUNT;
                self.apply_reset(next);
            }
        }
        observer.on_tick(&self.display, self.phase_index);
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Reset body, shared by the public `reset` and the rollover path.
    /// Infallible: callers guarantee `phase < PHASE_COUNT`.
    fn apply_reset(&mut self, phase: usize) {
        if phase == 0 {
            self.running = false;
        }
        self.phase_index = phase;
        self.remaining_secs = self.table.duration_secs(phase);
        self.display = format_clock(self.remaining_secs);
        debug!(
            phase,
            minutes = self.table.duration_min(phase),
            "phase reset"
        );
    }
}

fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
