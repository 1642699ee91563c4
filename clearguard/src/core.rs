//! Core DRC entry points shared by the library API and the CLI.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::Board;
use crate::drc::DrcEngine;
use crate::violation::{Severity, UnconnectedItem, Violation};

#[derive(Debug, thiserror::Error)]
pub enum DrcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid board: {0}")]
    InvalidBoard(String),
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Which sub-checks a run performs. Every check is enabled by default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrcOptions {
    pub pad_to_pad: bool,
    pub unconnected: bool,
    pub zones: bool,
    pub keepout: bool,
    pub footprint_overlap: bool,
    pub missing_courtyard: bool,
    /// Ask the zone filler, when one is set, to refresh fills before the zone tests
    pub refill_zones: bool,
}

impl Default for DrcOptions {
    fn default() -> Self {
        Self {
            pad_to_pad: true,
            unconnected: true,
            zones: true,
            keepout: true,
            footprint_overlap: true,
            missing_courtyard: true,
            refill_zones: true,
        }
    }
}

impl DrcOptions {
    pub fn from_json_file(path: &Path) -> Result<Self, DrcError> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| DrcError::InvalidOptions(format!("{}: {}", path.display(), e)))
    }
}

/// Result of a full run over one board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrcReport {
    pub board: String,
    pub generated_at: DateTime<Utc>,
    pub violations: Vec<Violation>,
    pub unconnected: Vec<UnconnectedItem>,
    /// A netclass is below the board minimums; no other check ran
    pub netclass_failed: bool,
    pub cancelled: bool,
    pub stats: DrcStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrcStats {
    pub errors: usize,
    pub warnings: usize,
    pub unconnected: usize,
}

impl DrcReport {
    pub fn new(board: &str, violations: Vec<Violation>, unconnected: Vec<UnconnectedItem>) -> Self {
        let stats = report_stats(&violations, &unconnected);
        Self {
            board: board.to_string(),
            generated_at: Utc::now(),
            violations,
            unconnected,
            netclass_failed: false,
            cancelled: false,
            stats,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.stats.errors > 0
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.unconnected.is_empty()
    }

    pub fn total_issues(&self) -> usize {
        self.stats.errors + self.stats.warnings + self.stats.unconnected
    }
}

fn report_stats(violations: &[Violation], unconnected: &[UnconnectedItem]) -> DrcStats {
    let mut errors = 0;
    let mut warnings = 0;
    for v in violations {
        match v.kind.severity() {
            Severity::Error => errors += 1,
            Severity::Warning => warnings += 1,
        }
    }
    DrcStats {
        errors,
        warnings,
        unconnected: unconnected.len(),
    }
}

/// Core DRC API used by the CLI.
pub struct ClearGuardCore;

impl ClearGuardCore {
    /// Load a board snapshot and run every enabled check on it.
    pub fn check_board_file(path: &Path, options: DrcOptions) -> Result<DrcReport, DrcError> {
        let mut board = Board::load(path)?;
        info!(board = %board.name, "running design rule check");
        Ok(Self::check_board(&mut board, options))
    }

    pub fn check_board(board: &mut Board, options: DrcOptions) -> DrcReport {
        DrcEngine::new(options).run(board)
    }
}
