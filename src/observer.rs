//! Per-iteration diagnostics for the HLWB projection.
//!
//! The projection hands an [`IterationRecord`] to a [`ProjectionObserver`]
//! after every iteration. Recording costs two O(n³) violation scans, so it
//! only happens when [`ProjectionObserver::is_active`] returns `true`. The
//! default observer `()` is inactive and compiles away.

use crate::diagnostics::ViolationCount;

/// Progress of one projection iteration.
///
/// "before" values are taken after the averaging step, "after" values after
/// the triangle repair pass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationRecord {
    /// 1-based iteration index.
    pub iteration: usize,
    /// Averaging weight used in this iteration.
    pub lambda: f64,
    /// `‖X − D‖² / ‖D‖²` before the repair pass.
    pub nmse_before: f64,
    /// Violations before the repair pass.
    pub violations_before: ViolationCount,
    /// Triples corrected by this iteration's repair pass.
    pub corrections: u64,
    /// Triples corrected since the first iteration.
    pub total_corrections: u64,
    /// `‖X − D‖² / ‖D‖²` after the repair pass.
    pub nmse_after: f64,
    /// Violations after the repair pass.
    pub violations_after: ViolationCount,
    /// Wall time of the repair pass in seconds.
    pub elapsed_secs: f64,
    /// `true` on the final iteration.
    pub last: bool,
}

/// Receiver for projection progress.
pub trait ProjectionObserver {
    /// Whether records should be computed at all.
    fn is_active(&self) -> bool;

    /// Called once per iteration with the finished record.
    fn on_iteration(&mut self, record: &IterationRecord);
}

/// Inactive observer.
impl ProjectionObserver for () {
    #[inline(always)]
    fn is_active(&self) -> bool {
        false
    }

    #[inline(always)]
    fn on_iteration(&mut self, _record: &IterationRecord) {}
}

/// Collects every record in order.
impl ProjectionObserver for Vec<IterationRecord> {
    fn is_active(&self) -> bool {
        true
    }

    fn on_iteration(&mut self, record: &IterationRecord) {
        self.push(record.clone());
    }
}

impl<O: ProjectionObserver + ?Sized> ProjectionObserver for &mut O {
    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn on_iteration(&mut self, record: &IterationRecord) {
        (**self).on_iteration(record)
    }
}

/// Writes progress through the `log` facade.
///
/// One `debug!` line per iteration, one `info!` summary after the last.
/// Active when info logging is enabled for this module.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl ProjectionObserver for LogObserver {
    fn is_active(&self) -> bool {
        log::log_enabled!(log::Level::Info)
    }

    fn on_iteration(&mut self, r: &IterationRecord) {
        log::debug!(
            "iter {}: lambda={:.6} nmse {:.7} -> {:.7}, violations {} -> {}, corrections={} ({:.3}s)",
            r.iteration,
            r.lambda,
            r.nmse_before,
            r.nmse_after,
            r.violations_before.triples,
            r.violations_after.triples,
            r.corrections,
            r.elapsed_secs,
        );
        if r.last {
            log::info!(
                "HLWB projection finished after {} iterations: nmse={:.7}, {} violating pairs, {} corrections",
                r.iteration,
                r.nmse_after,
                r.violations_after.pairs,
                r.total_corrections,
            );
        }
    }
}
