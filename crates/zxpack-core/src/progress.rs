//! Progress reporting for long-running packing jobs.
//!
//! The optimal parsers are quadratic in the input size, so a 64 KiB input
//! can take a noticeable amount of time. The parsers report their position
//! through this trait every few hundred positions. Reporting is purely
//! observational: implementations must not influence the job in any way.

/// Fire-and-forget progress sink.
///
/// `done` is monotonically non-decreasing across calls within one job.
pub trait Progress {
    /// Report that `done` of `total` positions have been processed.
    fn report(&mut self, total: usize, done: usize);

    /// Called once when the job finishes.
    fn done(&mut self) {}
}

/// A progress sink that discards all reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl Progress for NullProgress {
    fn report(&mut self, _total: usize, _done: usize) {}
}
