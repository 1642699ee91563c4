//! Design rule check engine
//!
//! [`DrcEngine::run_all_checks`] runs the sub-checks in a fixed order:
//! netclasses, pad to pad, tracks and vias, zones, unconnected items,
//! keepout areas, copper text and courtyards. A netclass below the board
//! minimums stops the run after every netclass error is reported, since
//! all clearances downstream derive from netclasses.
//!
//! Each sub-check lives in its own module and pushes [`Violation`]s to the
//! caller's sink as soon as it builds them.

mod courtyard;
mod keepout;
mod netclass;
mod pads;
mod texts;
mod tracks;
mod unconnected;
mod zones;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::clearance::{ClearanceResolver, NetclassClearance};
use crate::connectivity::{BoardConnectivity, ConnectivityOracle};
use crate::core::{DrcOptions, DrcReport};
use crate::progress::{Poller, Progress, ProgressReporter};
use crate::violation::{UnconnectedItem, Violation, ViolationSink};

pub use netclass::test_netclasses;

/// Refreshes zone fills before the zone tests.
pub trait ZoneFiller {
    fn refill(&self, board: &mut Board);
}

/// What a run did besides emitting violations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub unconnected: Vec<UnconnectedItem>,
    pub netclass_failed: bool,
    pub cancelled: bool,
}

/// Shared read-only state of one pass.
pub(crate) struct Context<'a> {
    pub board: &'a Board,
    pub clearance: &'a dyn ClearanceResolver,
    pub connectivity: &'a dyn ConnectivityOracle,
}

/// Sink wrapper counting what a sub-check emitted.
struct Counted<'s> {
    inner: &'s mut dyn ViolationSink,
    count: usize,
}

impl<'s> Counted<'s> {
    fn new(inner: &'s mut dyn ViolationSink) -> Self {
        Self { inner, count: 0 }
    }

    /// Return the count since the last call.
    fn take(&mut self) -> usize {
        std::mem::take(&mut self.count)
    }
}

impl ViolationSink for Counted<'_> {
    fn push(&mut self, violation: Violation) {
        self.count += 1;
        self.inner.push(violation);
    }
}

pub struct DrcEngine {
    options: DrcOptions,
    clearance: Box<dyn ClearanceResolver>,
    connectivity: Box<dyn ConnectivityOracle>,
    zone_filler: Option<Box<dyn ZoneFiller>>,
}

impl Default for DrcEngine {
    fn default() -> Self {
        Self::new(DrcOptions::default())
    }
}

impl DrcEngine {
    pub fn new(options: DrcOptions) -> Self {
        Self {
            options,
            clearance: Box::new(NetclassClearance),
            connectivity: Box::new(BoardConnectivity),
            zone_filler: None,
        }
    }

    pub fn with_clearance_resolver(mut self, resolver: impl ClearanceResolver + 'static) -> Self {
        self.clearance = Box::new(resolver);
        self
    }

    pub fn with_connectivity(mut self, oracle: impl ConnectivityOracle + 'static) -> Self {
        self.connectivity = Box::new(oracle);
        self
    }

    pub fn with_zone_filler(mut self, filler: impl ZoneFiller + 'static) -> Self {
        self.zone_filler = Some(Box::new(filler));
        self
    }

    pub fn options(&self) -> &DrcOptions {
        &self.options
    }

    fn context<'a>(&'a self, board: &'a Board) -> Context<'a> {
        Context {
            board,
            clearance: self.clearance.as_ref(),
            connectivity: self.connectivity.as_ref(),
        }
    }

    /// Run every enabled check, pushing violations to `sink` in check order.
    /// Cancellation stops the run and keeps what was already pushed.
    pub fn run_all_checks(
        &self,
        board: &mut Board,
        sink: &mut dyn ViolationSink,
        progress: &mut dyn ProgressReporter,
    ) -> RunOutcome {
        let mut outcome = RunOutcome::default();
        let mut sink = Counted::new(sink);
        let mut poller = Poller::new(progress);

        if !netclass::test_netclasses(board, &mut sink) {
            warn!(errors = sink.take(), "netclass sizes below board minimums, aborting");
            outcome.netclass_failed = true;
            return outcome;
        }

        if self.options.pad_to_pad {
            pads::test_pad_to_pad(&self.context(board), &mut sink, &mut poller);
            info!(violations = sink.take(), "pad clearances");
            if poller.aborted() {
                return cancelled(outcome);
            }
        }

        tracks::test_tracks(&self.context(board), &mut sink, &mut poller);
        info!(violations = sink.take(), "track clearances");
        if poller.aborted() {
            return cancelled(outcome);
        }

        if self.options.refill_zones {
            if let Some(filler) = &self.zone_filler {
                debug!("refilling zones");
                filler.refill(board);
            }
        }

        if self.options.zones {
            zones::test_zones(&self.context(board), &mut sink);
            info!(violations = sink.take(), "zones");
        }

        if self.options.unconnected {
            outcome.unconnected = unconnected::list_unconnected(&self.context(board));
            info!(unconnected = outcome.unconnected.len(), "unconnected items");
        }

        if self.options.keepout {
            keepout::test_keepout_areas(&self.context(board), &mut sink);
            info!(violations = sink.take(), "keepout areas");
        }

        texts::test_texts(&self.context(board), &mut sink, &mut poller);
        info!(violations = sink.take(), "texts");
        if poller.aborted() {
            return cancelled(outcome);
        }

        if self.options.footprint_overlap || self.options.missing_courtyard {
            courtyard::test_courtyards(board, &self.options, &mut sink);
            info!(violations = sink.take(), "courtyards");
        }

        outcome
    }

    /// Run all enabled checks into a fresh report.
    pub fn run(&self, board: &mut Board) -> DrcReport {
        let mut violations: Vec<Violation> = Vec::new();
        let mut never_cancel = |_done: usize, _total: usize| Progress::Continue;
        let outcome = self.run_all_checks(board, &mut violations, &mut never_cancel);
        let mut report = DrcReport::new(&board.name, violations, outcome.unconnected);
        report.netclass_failed = outcome.netclass_failed;
        report.cancelled = outcome.cancelled;
        report
    }

    /// Check one track or via of the sequence against the rest of the
    /// board and the keepout areas, as done while editing.
    pub fn check_track(&self, board: &Board, index: usize) -> Option<Violation> {
        let ctx = self.context(board);
        tracks::check_single(&ctx, index).or_else(|| keepout::check_track_item(&ctx, index))
    }

    /// Check the outline edge starting at `corner` of zone `zone` against the
    /// other zones.
    pub fn check_zone_corner(&self, board: &Board, zone: usize, corner: usize) -> Option<Violation> {
        zones::check_zone_corner(&self.context(board), zone, corner)
    }
}

fn cancelled(mut outcome: RunOutcome) -> RunOutcome {
    warn!("design rule check cancelled");
    outcome.cancelled = true;
    outcome
}
