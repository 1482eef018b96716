//! Sweep - the scan-and-aggregate pipeline.
//!
//! One sweep resolves each configured target into remote log directories,
//! selects the requested day's files, stages them into the local work area
//! (the source shares hold transient locks, so copies retry), and tallies the
//! exception class names found in the staged copies. Targets run on a bounded
//! worker pool; everything that goes wrong below the run level is recorded as
//! a problem entry on the affected target instead of aborting the batch.
//!
//! Data flows one direction only:
//! resolve -> filter -> stage -> extract -> outcome -> run summary.

pub mod extract;
pub mod filter;
pub mod outcome;
pub mod resolve;
pub mod run;
pub mod stage;
pub mod task;
pub mod types;

pub use extract::{ExceptionExtractor, DEFAULT_SUPPRESSED_MARKERS};
pub use filter::LogFileFilter;
pub use outcome::ScanOutcome;
pub use resolve::resolve_paths;
pub use run::{run_sweep, SweepContext, SweepSummary};
pub use stage::{local_destination, Stager};
pub use task::scan_target;
pub use types::{AccessRegistry, Problem, ScanDate, ScanTarget, StageLayout, TargetKind};
