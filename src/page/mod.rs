//! Page text pipeline
//!
//! Everything between the rendering backend's raw text runs and a located
//! character span: the run store, the reconciler that flattens runs into
//! one string with an exact offset map, and the locator that finds an
//! externally supplied phrase inside that string.

mod locate;
mod reconcile;
mod runs;

pub use locate::{locate, LocateOptions, MatchPolicy, MatchSpan};
pub use reconcile::{ReconciledPage, RunEntry};
pub use runs::{PageRuns, TextRun};
