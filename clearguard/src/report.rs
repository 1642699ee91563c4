//! Text and JSON reports of a run
//!
//! The text report lists one violation per entry, the item lines indented
//! below it:
//!
//! ```text
//! ** Drc report for demo **
//! ** Created on 2024-01-01 12:00:00 UTC **
//!
//! ** Found 1 DRC violations **
//! ErrType(18): Pad too close to pad
//!     @(0.0000 mm, 0.0000 mm): Pad 1 of R1 on F.Cu, net [GND]
//!     @(1.1000 mm, 0.0000 mm): Pad 1 of R2 on F.Cu, net [VCC]
//!
//! ** Found 0 unconnected pads **
//!
//! ** End of Report **
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::board::Board;
use crate::core::{DrcError, DrcReport};
use crate::violation::Violation;

/// Write the text report. `board` supplies the item labels.
pub fn write_report<W: Write>(out: &mut W, report: &DrcReport, board: &Board) -> io::Result<()> {
    writeln!(out, "** Drc report for {} **", report.board)?;
    writeln!(
        out,
        "** Created on {} **",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    if report.netclass_failed {
        writeln!(out, "** Netclass errors, other checks skipped **")?;
    }
    if report.cancelled {
        writeln!(out, "** Check cancelled, results are incomplete **")?;
    }

    writeln!(out)?;
    writeln!(out, "** Found {} DRC violations **", report.violations.len())?;
    for violation in &report.violations {
        write_violation(out, violation, board)?;
    }

    writeln!(out)?;
    writeln!(out, "** Found {} unconnected pads **", report.unconnected.len())?;
    for item in &report.unconnected {
        writeln!(out, "{}", item)?;
    }

    writeln!(out)?;
    writeln!(out, "** End of Report **")
}

fn write_violation<W: Write>(out: &mut W, violation: &Violation, board: &Board) -> io::Result<()> {
    writeln!(out, "ErrType({}): {}", violation.kind.code(), violation.message)?;
    if let Some(main) = violation.main {
        writeln!(out, "    @{}: {}", violation.position, board.describe(main))?;
    }
    if let (Some(aux), Some(at)) = (violation.aux, violation.aux_position) {
        writeln!(out, "    @{}: {}", at, board.describe(aux))?;
    }
    Ok(())
}

/// Write the text report to `path`, replacing any existing file.
pub fn save_report(path: &Path, report: &DrcReport, board: &Board) -> Result<(), DrcError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_report(&mut out, report, board)?;
    out.flush()?;
    Ok(())
}

pub fn to_json(report: &DrcReport) -> Result<String, DrcError> {
    Ok(serde_json::to_string_pretty(report)?)
}
