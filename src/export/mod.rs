//! Export d'une séquence de frames pour un balayage du plafond d'itérations.

pub mod schedule;
pub mod sweep;

pub use schedule::{repeat_count, SweepSchedule, SweepStep, DEFAULT_CEILING, DEFAULT_START};
pub use sweep::{export_sweep, FrameOutcome, SweepExporter, SweepSummary};
