//! Progress reporting for long-running simulations. Reporting has no bearing on the results.

use tracing::info;

/// A sink notified after each completed trial. Trials may complete concurrently on several
/// worker threads, so implementations must be [Sync].
pub trait Progress: Sync {
    /// Invoked once per trial, where `completed` counts the trials finished so far (across all
    /// workers) and `total` is the number of trials in the run.
    fn trial_completed(&self, completed: u64, total: u64);
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    #[inline(always)]
    fn trial_completed(&self, _completed: u64, _total: u64) {}
}

/// Logs every `step`-th trial, as well as the final one.
#[derive(Debug, Clone)]
pub struct LogProgress {
    label: String,
    step: u64,
}
impl LogProgress {
    pub fn new(label: impl Into<String>, step: u64) -> Self {
        Self {
            label: label.into(),
            step: step.max(1),
        }
    }
}

impl Progress for LogProgress {
    fn trial_completed(&self, completed: u64, total: u64) {
        if completed % self.step == 0 || completed == total {
            info!("{}: trial {completed} of {total} completed", self.label);
        }
    }
}

impl<P: Progress + ?Sized> Progress for &P {
    #[inline(always)]
    fn trial_completed(&self, completed: u64, total: u64) {
        (**self).trial_completed(completed, total)
    }
}

impl<P: Progress> Progress for Option<P> {
    #[inline(always)]
    fn trial_completed(&self, completed: u64, total: u64) {
        if let Some(progress) = self {
            progress.trial_completed(completed, total);
        }
    }
}
