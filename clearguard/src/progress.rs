//! Cooperative progress reporting and cancellation

/// Items processed between two progress callbacks.
pub const PROGRESS_INTERVAL: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Abort,
}

/// Told how far a long pass has got; may ask it to stop.
pub trait ProgressReporter {
    fn report(&mut self, done: usize, total: usize) -> Progress;
}

impl<F> ProgressReporter for F
where
    F: FnMut(usize, usize) -> Progress,
{
    fn report(&mut self, done: usize, total: usize) -> Progress {
        self(done, total)
    }
}

/// Polls a reporter every [`PROGRESS_INTERVAL`] items and latches an abort.
pub(crate) struct Poller<'a> {
    reporter: &'a mut dyn ProgressReporter,
    aborted: bool,
}

impl<'a> Poller<'a> {
    pub(crate) fn new(reporter: &'a mut dyn ProgressReporter) -> Self {
        Self {
            reporter,
            aborted: false,
        }
    }

    /// True once cancellation was requested.
    pub(crate) fn should_stop(&mut self, done: usize, total: usize) -> bool {
        if !self.aborted && done > 0 && done % PROGRESS_INTERVAL == 0 {
            self.aborted = self.reporter.report(done, total) == Progress::Abort;
        }
        self.aborted
    }

    pub(crate) fn aborted(&self) -> bool {
        self.aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poller_calls_at_interval() {
        let mut calls = Vec::new();
        let mut reporter = |done: usize, _total: usize| {
            calls.push(done);
            Progress::Continue
        };
        let mut poller = Poller::new(&mut reporter);
        for i in 0..1200 {
            assert!(!poller.should_stop(i, 1200));
        }
        drop(poller);
        assert_eq!(calls, vec![500, 1000]);
    }

    #[test]
    fn test_abort_latches() {
        let mut reporter = |_done: usize, _total: usize| Progress::Abort;
        let mut poller = Poller::new(&mut reporter);
        assert!(!poller.should_stop(1, 10));
        assert!(poller.should_stop(PROGRESS_INTERVAL, 10));
        assert!(poller.should_stop(PROGRESS_INTERVAL + 1, 10));
        assert!(poller.aborted());
    }
}
