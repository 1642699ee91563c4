//! ClearGuard - design rule checks for printed circuit board layouts
//!
//! This library checks a board model for clearance, connectivity and
//! placement mistakes: pads, tracks and vias too close to each other, copper
//! in keepout areas or in copper text, suspicious or overlapping zones,
//! unrouted nets and overlapping footprint courtyards.
//!
//! # Quick Start
//!
//! ```no_run
//! use clearguard::{ClearGuardCore, DrcOptions};
//! use std::path::Path;
//!
//! let report = ClearGuardCore::check_board_file(
//!     Path::new("board.json"),
//!     DrcOptions::default(),
//! ).unwrap();
//!
//! for violation in &report.violations {
//!     println!("{}", violation);
//! }
//! ```
//!
//! # Features
//!
//! - **Netclass sizes** against the board minimums; a failure stops the run
//! - **Pad to pad** clearances with a sorted sweep
//! - **Tracks and vias** against pads, holes and each other, plus size checks
//! - **Zones** with dead nets, bad outlines or too-close neighbours
//! - **Keepout areas**, **copper text** and **footprint courtyards**
//! - **Unconnected items** from a pluggable connectivity oracle

pub mod board;
pub mod clearance;
pub mod connectivity;
pub mod core;
pub mod drc;
pub mod geometry;
pub mod progress;
pub mod report;
pub mod violation;

// Re-export main types
pub use board::{Board, ItemRef};
pub use clearance::{ClearanceResolver, NetclassClearance};
pub use connectivity::{BoardConnectivity, ConnectivityOracle, RatsnestEdge};
pub use core::{ClearGuardCore, DrcError, DrcOptions, DrcReport, DrcStats};
pub use drc::{DrcEngine, RunOutcome, ZoneFiller};
pub use progress::{Progress, ProgressReporter};
pub use violation::{Severity, UnconnectedItem, Violation, ViolationKind, ViolationSink};

/// Load a board snapshot (convenience wrapper).
pub fn load_board(path: &std::path::Path) -> Result<Board, DrcError> {
    Board::load(path)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Board, ClearGuardCore, DrcEngine, DrcError, DrcOptions, DrcReport, ItemRef, Severity, Violation,
        ViolationKind,
    };
}
