//! Integration tests for the ClearGuard library

use clearguard::prelude::*;
use clearguard::report;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn check(name: &str) -> DrcReport {
    ClearGuardCore::check_board_file(&fixture_path(name), DrcOptions::default())
        .expect("fixture should load")
}

fn kinds(report: &DrcReport) -> Vec<ViolationKind> {
    report.violations.iter().map(|v| v.kind).collect()
}

#[test]
fn test_clean_board() {
    let report = check("clean_board.json");
    assert!(
        report.is_clean(),
        "Clean board should have no issues: {:?}",
        report.violations.iter().map(|v| v.to_string()).collect::<Vec<_>>()
    );
    assert_eq!(report.board, "clean_board");
    assert!(!report.netclass_failed);
}

#[test]
fn test_netclass_failure_stops_run() {
    let report = check("netclass_abort.json");
    assert!(report.netclass_failed);
    // the pads are too close as well, but no other check ran
    assert_eq!(kinds(&report), vec![ViolationKind::NetclassTrackWidth]);
    assert!(report.unconnected.is_empty());
}

#[test]
fn test_duplicate_pad_exemption() {
    let report = check("duplicate_pad.json");
    assert!(report.violations.is_empty(), "{:?}", kinds(&report));
}

#[test]
fn test_dead_net_zone() {
    let report = check("dead_net_zone.json");
    assert_eq!(kinds(&report), vec![ViolationKind::SuspiciousNetForZoneOutline]);
    assert_eq!(report.stats.warnings, 1);
    assert_eq!(report.stats.errors, 0);
    assert!(!report.has_errors());
}

#[test]
fn test_keepout_blocking_vias_only() {
    let report = check("keepout_vias_only.json");
    assert_eq!(kinds(&report), vec![ViolationKind::ViaInsideKeepout]);
    assert_eq!(report.violations[0].main, Some(ItemRef::Via(1)));
    assert_eq!(report.violations[0].aux, Some(ItemRef::Zone(0)));
}

#[test]
fn test_courtyard_overlap_count() {
    let report = check("courtyard_overlap.json");
    assert_eq!(kinds(&report), vec![ViolationKind::OverlappingFootprints]);
    assert_eq!(
        report.violations[0].message,
        "footprints 'U1' and 'C1' overlap on front (top) layer"
    );
}

#[test]
fn test_disabled_checks_are_skipped() {
    let options = DrcOptions {
        zones: false,
        ..Default::default()
    };
    let report = ClearGuardCore::check_board_file(&fixture_path("dead_net_zone.json"), options).unwrap();
    assert!(report.violations.is_empty());

    let options = DrcOptions {
        keepout: false,
        ..Default::default()
    };
    let report = ClearGuardCore::check_board_file(&fixture_path("keepout_vias_only.json"), options).unwrap();
    assert!(report.violations.is_empty());
}

#[test]
fn test_runs_are_repeatable() {
    let mut board = clearguard::load_board(&fixture_path("netclass_abort.json")).unwrap();
    board.netclasses.default.track_width = 0.25;
    let engine = DrcEngine::default();

    let first = engine.run(&mut board);
    let second = engine.run(&mut board);
    assert!(!first.violations.is_empty());
    assert_eq!(first.violations, second.violations);
    assert_eq!(first.unconnected, second.unconnected);
}

#[test]
fn test_text_report_for_fixture() {
    let path = fixture_path("courtyard_overlap.json");
    let mut board = Board::load(&path).unwrap();
    let result = DrcEngine::default().run(&mut board);

    let mut out = Vec::new();
    report::write_report(&mut out, &result, &board).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("** Drc report for courtyard_overlap **"));
    assert!(text.contains("** Found 1 DRC violations **"));
    assert!(text.contains("Footprint U1"));
    assert!(text.contains("Footprint C1"));
    assert!(text.trim_end().ends_with("** End of Report **"));
}

#[test]
fn test_missing_file_is_an_error() {
    let result = ClearGuardCore::check_board_file(&fixture_path("no_such_board.json"), DrcOptions::default());
    assert!(matches!(result, Err(DrcError::Io(_))));
}

#[test]
fn test_invalid_board_is_rejected() {
    let json = r#"{ "design": { "copper_layer_count": 3 } }"#;
    assert!(matches!(Board::from_json_str(json), Err(DrcError::InvalidBoard(_))));

    let json = r#"{ "tracks": [ { "type": "track", "start": { "x": 0, "y": 0 }, "end": { "x": 1, "y": 0 }, "width": 0.2, "layer": "Nope.Cu" } ] }"#;
    assert!(matches!(Board::from_json_str(json), Err(DrcError::Json(_))));
}
