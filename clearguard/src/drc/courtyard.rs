//! Footprint courtyards: malformed, missing and overlapping

use tracing::debug;

use crate::board::{Board, ItemRef, Side};
use crate::core::DrcOptions;
use crate::geometry::polygon::overlap_location;
use crate::violation::{Violation, ViolationKind, ViolationSink};

/// Rebuild every courtyard, then report malformed and missing ones and
/// footprints overlapping on either side.
pub(crate) fn test_courtyards(board: &mut Board, options: &DrcOptions, sink: &mut dyn ViolationSink) {
    for (index, footprint) in board.footprints.iter_mut().enumerate() {
        let built = footprint.build_courtyard();
        if let Err(err) = &built {
            debug!(footprint = %footprint.reference, %err, "courtyard build failed");
            if options.footprint_overlap {
                sink.push(
                    Violation::on_item(ViolationKind::MalformedCourtyard, ItemRef::Footprint(index), footprint.position)
                        .with_message(format!("footprint '{}' has malformed courtyard", footprint.reference)),
                );
            }
        }

        if options.missing_courtyard && built.is_ok() && footprint.courtyard.is_empty() {
            sink.push(
                Violation::on_item(ViolationKind::MissingCourtyard, ItemRef::Footprint(index), footprint.position)
                    .with_message(format!("footprint '{}' has no courtyard defined", footprint.reference)),
            );
        }
    }

    if options.footprint_overlap {
        test_overlaps(board, Side::Front, sink);
        test_overlaps(board, Side::Back, sink);
    }
}

fn test_overlaps(board: &Board, side: Side, sink: &mut dyn ViolationSink) {
    let label = match side {
        Side::Front => "front (top)",
        Side::Back => "back (bottom)",
    };
    let footprints = &board.footprints;

    for (i, first) in footprints.iter().enumerate() {
        let area = first.courtyard.side(side);
        if area.0.is_empty() {
            continue;
        }
        for (j, second) in footprints.iter().enumerate().skip(i + 1) {
            let Some(at) = overlap_location(area, second.courtyard.side(side)) else {
                continue;
            };
            let message = format!(
                "footprints '{}' and '{}' overlap on {} layer",
                first.reference, second.reference, label
            );
            sink.push(
                Violation::between(
                    ViolationKind::OverlappingFootprints,
                    ItemRef::Footprint(i),
                    at,
                    Some((ItemRef::Footprint(j), second.position)),
                )
                .with_message(message),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Footprint, FootprintGraphic, GraphicShape, Layer};
    use crate::geometry::Point;

    fn boxed(reference: &str, layer: Layer, x0: f64, y0: f64, x1: f64, y1: f64) -> Footprint {
        Footprint::new(reference, Point::new((x0 + x1) / 2.0, (y0 + y1) / 2.0)).with_courtyard_rect(
            layer,
            Point::new(x0, y0),
            Point::new(x1, y1),
        )
    }

    fn run(board: &mut Board, options: &DrcOptions) -> Vec<Violation> {
        let mut sink: Vec<Violation> = Vec::new();
        test_courtyards(board, options, &mut sink);
        sink
    }

    #[test]
    fn test_disjoint_and_overlapping_rectangles() {
        let mut board = Board::default();
        board.footprints.push(boxed("R1", Layer::F_CRTYD, 0.0, 0.0, 2.0, 1.0));
        board.footprints.push(boxed("R2", Layer::F_CRTYD, 3.0, 0.0, 5.0, 1.0));
        assert!(run(&mut board, &DrcOptions::default()).is_empty());

        board.footprints.push(boxed("R3", Layer::F_CRTYD, 1.5, 0.5, 3.5, 2.0));
        let found = run(&mut board, &DrcOptions::default());
        let messages: Vec<_> = found.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "footprints 'R1' and 'R3' overlap on front (top) layer",
                "footprints 'R2' and 'R3' overlap on front (top) layer",
            ]
        );
        assert_eq!(found[0].main, Some(ItemRef::Footprint(0)));
        assert_eq!(found[0].aux, Some(ItemRef::Footprint(2)));
    }

    #[test]
    fn test_touching_rectangles_do_not_overlap() {
        let mut board = Board::default();
        board.footprints.push(boxed("C1", Layer::B_CRTYD, 0.0, 0.0, 1.0, 1.0));
        board.footprints.push(boxed("C2", Layer::B_CRTYD, 1.0, 0.0, 2.0, 1.0));
        assert!(run(&mut board, &DrcOptions::default()).is_empty());
    }

    #[test]
    fn test_sides_are_separate() {
        let mut board = Board::default();
        board.footprints.push(boxed("U1", Layer::F_CRTYD, 0.0, 0.0, 2.0, 2.0));
        board.footprints.push(boxed("U2", Layer::B_CRTYD, 0.0, 0.0, 2.0, 2.0));
        board.footprints.push(boxed("U3", Layer::B_CRTYD, 1.0, 1.0, 3.0, 3.0));
        let found = run(&mut board, &DrcOptions::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "footprints 'U2' and 'U3' overlap on back (bottom) layer");
    }

    #[test]
    fn test_missing_and_malformed_courtyards() {
        let mut board = Board::default();
        board.footprints.push(Footprint::new("TP1", Point::new(0.0, 0.0)));
        let mut open = Footprint::new("J1", Point::new(5.0, 0.0));
        open.graphics.push(FootprintGraphic {
            layer: Layer::F_CRTYD,
            width: 0.05,
            shape: GraphicShape::Segment {
                start: Point::new(4.0, -1.0),
                end: Point::new(6.0, -1.0),
            },
        });
        board.footprints.push(open);

        let found = run(&mut board, &DrcOptions::default());
        let kinds: Vec<_> = found.iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ViolationKind::MissingCourtyard, ViolationKind::MalformedCourtyard]);
        assert_eq!(found[0].message, "footprint 'TP1' has no courtyard defined");
        assert_eq!(found[1].message, "footprint 'J1' has malformed courtyard");

        let only_missing = DrcOptions {
            footprint_overlap: false,
            ..Default::default()
        };
        let found = run(&mut board, &only_missing);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ViolationKind::MissingCourtyard);

        let only_overlap = DrcOptions {
            missing_courtyard: false,
            ..Default::default()
        };
        let found = run(&mut board, &only_overlap);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ViolationKind::MalformedCourtyard);
    }
}
