use serde::{Deserialize, Serialize};

/// Number of phases in one full session cycle.
pub const PHASE_COUNT: usize = 8;

/// Category of a phase within the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Work,
    ShortRest,
    LongRest,
}

impl PhaseKind {
    /// Classify a phase index: even slots are work, odd slots are short
    /// rests, and the final slot of the cycle is the long rest.
    pub fn of(phase: usize) -> PhaseKind {
        if phase == PHASE_COUNT - 1 {
            PhaseKind::LongRest
        } else if phase % 2 == 1 {
            PhaseKind::ShortRest
        } else {
            PhaseKind::Work
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PhaseKind::Work => "Work",
            PhaseKind::ShortRest => "Short Rest",
            PhaseKind::LongRest => "Long Rest",
        }
    }
}

/// Fixed mapping from phase index to kind and duration, cyclic with period
/// [`PHASE_COUNT`]. All work phases share one duration, all short rests
/// another, and the final slot carries the long rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTable {
    /// Work phase duration in minutes.
    pub work_min: u64,
    /// Short rest duration in minutes.
    pub short_rest_min: u64,
    /// Long rest duration in minutes.
    pub long_rest_min: u64,
}

impl PhaseTable {
    pub fn new(work_min: u64, short_rest_min: u64, long_rest_min: u64) -> Self {
        Self {
            work_min,
            short_rest_min,
            long_rest_min,
        }
    }

    pub fn kind(&self, phase: usize) -> PhaseKind {
        PhaseKind::of(phase)
    }

    /// Duration of `phase` in minutes.
    pub fn duration_min(&self, phase: usize) -> u64 {
        match PhaseKind::of(phase) {
            PhaseKind::Work => self.work_min,
            PhaseKind::ShortRest => self.short_rest_min,
            PhaseKind::LongRest => self.long_rest_min,
        }
    }

    /// Duration of `phase` in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_secs(&self, phase: usize) -> u64 {
        self.duration_min(phase).saturating_mul(60)
    }
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self::new(25, 5, 20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_the_cycle_layout() {
        let expected = [
            PhaseKind::Work,
            PhaseKind::ShortRest,
            PhaseKind::Work,
            PhaseKind::ShortRest,
            PhaseKind::Work,
            PhaseKind::ShortRest,
            PhaseKind::Work,
            PhaseKind::LongRest,
        ];
        for (phase, kind) in expected.iter().enumerate() {
            assert_eq!(PhaseKind::of(phase), *kind, "phase {phase}");
        }
    }

    #[test]
    fn default_table_durations() {
        let table = PhaseTable::default();
        let expected = [25, 5, 25, 5, 25, 5, 25, 20];
        for (phase, min) in expected.iter().enumerate() {
            assert_eq!(table.duration_min(phase), *min, "phase {phase}");
        }
    }

    #[test]
    fn long_rest_duration_in_seconds() {
        let table = PhaseTable::default();
        assert_eq!(table.duration_secs(PHASE_COUNT - 1), 1200);
    }

    #[test]
    fn duration_secs_saturates() {
        let table = PhaseTable::new(u64::MAX, 5, 20);
        assert_eq!(table.duration_secs(0), u64::MAX);
    }

    #[test]
    fn labels() {
        assert_eq!(PhaseKind::Work.label(), "Work");
        assert_eq!(PhaseKind::ShortRest.label(), "Short Rest");
        assert_eq!(PhaseKind::LongRest.label(), "Long Rest");
    }
}
