//! Netclass sizes against the board minimums

use crate::board::{Board, DesignSettings, NetClass};
use crate::geometry::Point;
use crate::violation::{Violation, ViolationKind, ViolationSink};

/// Check the default netclass then every named one. Returns false when any
/// size is below its board minimum.
pub fn test_netclasses(board: &Board, sink: &mut dyn ViolationSink) -> bool {
    let mut ok = true;
    for netclass in board.netclasses.iter() {
        ok &= test_netclass(netclass, &board.design, sink);
    }
    ok
}

fn test_netclass(nc: &NetClass, design: &DesignSettings, sink: &mut dyn ViolationSink) -> bool {
    let checks = [
        (ViolationKind::NetclassTrackWidth, "TrackWidth", nc.track_width, design.min_track_width),
        (ViolationKind::NetclassViaSize, "Via Dia", nc.via_diameter, design.min_via_diameter),
        (ViolationKind::NetclassViaDrillSize, "Via Drill", nc.via_drill, design.min_via_drill),
        (
            ViolationKind::NetclassMicroViaSize,
            "uVia Dia",
            nc.micro_via_diameter,
            design.min_micro_via_diameter,
        ),
        (
            ViolationKind::NetclassMicroViaDrillSize,
            "uVia Drill",
            nc.micro_via_drill,
            design.min_micro_via_drill,
        ),
    ];

    let mut ok = true;
    for (kind, field, value, minimum) in checks {
        if value < minimum {
            let message = format!(
                "NETCLASS: '{}' has {}:{:.4} mm which is less than global:{:.4} mm",
                nc.name, field, value, minimum
            );
            sink.push(Violation::board_level(kind, Point::default(), message));
            ok = false;
        }
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_violation_per_undersized_field() {
        let mut board = Board::default();
        board.netclasses.named.insert(
            "Fine".into(),
            NetClass {
                name: "Fine".into(),
                track_width: 0.1,
                via_drill: 0.2,
                micro_via_drill: 0.05,
                ..Default::default()
            },
        );
        let mut sink: Vec<Violation> = Vec::new();
        assert!(!test_netclasses(&board, &mut sink));
        let kinds: Vec<_> = sink.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::NetclassTrackWidth,
                ViolationKind::NetclassViaDrillSize,
                ViolationKind::NetclassMicroViaDrillSize,
            ]
        );
        assert_eq!(
            sink[0].message,
            "NETCLASS: 'Fine' has TrackWidth:0.1000 mm which is less than global:0.2000 mm"
        );
    }

    #[test]
    fn test_equal_to_minimum_passes() {
        let mut board = Board::default();
        board.netclasses.default.track_width = board.design.min_track_width;
        let mut sink: Vec<Violation> = Vec::new();
        assert!(test_netclasses(&board, &mut sink));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_every_netclass_is_reported() {
        let mut board = Board::default();
        board.netclasses.default.via_diameter = 0.3;
        for name in ["B", "A"] {
            board.netclasses.named.insert(
                name.into(),
                NetClass {
                    name: name.into(),
                    via_diameter: 0.3,
                    ..Default::default()
                },
            );
        }
        let mut sink: Vec<Violation> = Vec::new();
        assert!(!test_netclasses(&board, &mut sink));
        let names: Vec<_> = sink
            .iter()
            .map(|v| v.message.split('\'').nth(1).unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["Default", "A", "B"]);
    }
}
