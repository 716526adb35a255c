mod engine;
mod phase;

pub use engine::{CountdownEngine, Snapshot, TickObserver};
pub use phase::{PhaseKind, PhaseTable, PHASE_COUNT};
