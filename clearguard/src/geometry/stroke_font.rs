//! Built-in single-stroke font
//!
//! Each glyph is a 16-segment pattern on a unit cell (x and y in 0..1, y up).
//! This is coarse next to a full Hershey font, but it covers the same copper
//! area closely enough for clearance checks and needs no external font file.

use super::distance::Segment;
use super::{Point, Size};

const A1: u16 = 1 << 0;
const A2: u16 = 1 << 1;
const B: u16 = 1 << 2;
const C: u16 = 1 << 3;
const D2: u16 = 1 << 4;
const D1: u16 = 1 << 5;
const E: u16 = 1 << 6;
const F: u16 = 1 << 7;
const G1: u16 = 1 << 8;
const G2: u16 = 1 << 9;
const H: u16 = 1 << 10;
const I: u16 = 1 << 11;
const J: u16 = 1 << 12;
const K: u16 = 1 << 13;
const L: u16 = 1 << 14;
const M: u16 = 1 << 15;

const OUTER: u16 = A1 | A2 | B | C | D1 | D2 | E | F;

/// Stroke endpoints in cell units, indexed by bit position.
const STROKES: [((f64, f64), (f64, f64)); 16] = [
    ((0.0, 1.0), (0.5, 1.0)), // A1
    ((0.5, 1.0), (1.0, 1.0)), // A2
    ((1.0, 1.0), (1.0, 0.5)), // B
    ((1.0, 0.5), (1.0, 0.0)), // C
    ((1.0, 0.0), (0.5, 0.0)), // D2
    ((0.5, 0.0), (0.0, 0.0)), // D1
    ((0.0, 0.0), (0.0, 0.5)), // E
    ((0.0, 0.5), (0.0, 1.0)), // F
    ((0.0, 0.5), (0.5, 0.5)), // G1
    ((0.5, 0.5), (1.0, 0.5)), // G2
    ((0.0, 1.0), (0.5, 0.5)), // H
    ((0.5, 1.0), (0.5, 0.5)), // I
    ((1.0, 1.0), (0.5, 0.5)), // J
    ((0.0, 0.0), (0.5, 0.5)), // K
    ((0.5, 0.0), (0.5, 0.5)), // L
    ((1.0, 0.0), (0.5, 0.5)), // M
];

/// Character pitch as a multiple of the glyph width.
pub const CHAR_PITCH: f64 = 1.25;
/// Line pitch as a multiple of the glyph height.
pub const LINE_PITCH: f64 = 1.6;

pub fn glyph_mask(c: char) -> u16 {
    match c.to_ascii_uppercase() {
        '0' => OUTER | J | K,
        '1' => B | C | J,
        '2' => A1 | A2 | B | G1 | G2 | E | D1 | D2,
        '3' => A1 | A2 | B | C | D1 | D2 | G2,
        '4' => F | G1 | G2 | B | C,
        '5' => A1 | A2 | F | G1 | G2 | C | D1 | D2,
        '6' => (OUTER & !B) | G1 | G2,
        '7' => A1 | A2 | B | C,
        '8' => OUTER | G1 | G2,
        '9' => (OUTER & !E) | G1 | G2,
        'A' => E | F | A1 | A2 | B | C | G1 | G2,
        'B' => A1 | A2 | B | C | D1 | D2 | I | L | G2,
        'C' => A1 | A2 | F | E | D1 | D2,
        'D' => A1 | A2 | B | C | D1 | D2 | I | L,
        'E' => A1 | A2 | F | E | D1 | D2 | G1,
        'F' => A1 | A2 | F | E | G1,
        'G' => A1 | A2 | F | E | D1 | D2 | C | G2,
        'H' => F | E | B | C | G1 | G2,
        'I' => A1 | A2 | I | L | D1 | D2,
        'J' => B | C | D1 | D2 | E,
        'K' => F | E | G1 | J | M,
        'L' => F | E | D1 | D2,
        'M' => F | E | B | C | H | J,
        'N' => F | E | B | C | H | M,
        'O' => OUTER,
        'P' => A1 | A2 | B | F | E | G1 | G2,
        'Q' => OUTER | M,
        'R' => A1 | A2 | B | F | E | G1 | G2 | M,
        'S' => A1 | A2 | F | G1 | G2 | C | D1 | D2,
        'T' => A1 | A2 | I | L,
        'U' => F | E | D1 | D2 | C | B,
        'V' => F | E | K | J,
        'W' => F | E | B | C | K | M,
        'X' => H | J | K | M,
        'Y' => H | J | L,
        'Z' => A1 | A2 | J | K | D1 | D2,
        '-' => G1 | G2,
        '+' => G1 | G2 | I | L,
        '_' => D1 | D2,
        '/' => J | K,
        '\\' => H | M,
        '*' => G1 | G2 | H | I | J | K | L | M,
        '=' => G1 | G2 | D1 | D2,
        '.' => D1,
        ',' => K,
        '(' | '<' => J | M,
        ')' | '>' => H | K,
        '[' => A1 | F | E | D1,
        ']' => A2 | B | C | D2,
        '|' | '!' => I | L,
        '\'' => I,
        '"' => F | I,
        '?' => A1 | A2 | B | G2 | L,
        '$' => A1 | A2 | F | G1 | G2 | C | D1 | D2 | I | L,
        '#' => B | C | G1 | G2 | I | L | D1 | D2,
        '%' => A1 | F | G1 | I | J | K | C | D2 | G2 | L,
        '&' => A1 | H | I | G1 | E | D1 | D2 | M,
        '@' => A1 | A2 | B | C | D2 | G2 | I | F | E | D1,
        ':' | ';' => I | L,
        _ => 0,
    }
}

/// Strokes of one glyph in cell units.
pub fn glyph_strokes(c: char) -> impl Iterator<Item = (Point, Point)> {
    let mask = glyph_mask(c);
    STROKES
        .iter()
        .enumerate()
        .filter(move |(bit, _)| mask & (1u16 << *bit) != 0)
        .map(|(_, ((x0, y0), (x1, y1)))| (Point::new(*x0, *y0), Point::new(*x1, *y1)))
}

/// Lay out `text` centred on the origin, one glyph cell of `size` per char.
/// Lines are separated by `\n`, the first line on top.
pub fn text_strokes(text: &str, size: Size) -> Vec<Segment> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() || size.is_empty() {
        return Vec::new();
    }

    let pitch = size.width * CHAR_PITCH;
    let line_pitch = size.height * LINE_PITCH;
    let block_height = size.height + line_pitch * (lines.len() - 1) as f64;

    let mut segments = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        let count = line.chars().count();
        if count == 0 {
            continue;
        }
        let line_width = pitch * (count - 1) as f64 + size.width;
        let x0 = -line_width / 2.0;
        let y0 = block_height / 2.0 - size.height - line_pitch * row as f64;

        for (col, c) in line.chars().enumerate() {
            let origin = Point::new(x0 + pitch * col as f64, y0);
            for (a, b) in glyph_strokes(c) {
                segments.push(Segment::new(
                    origin + Point::new(a.x * size.width, a.y * size.height),
                    origin + Point::new(b.x * size.width, b.y * size.height),
                ));
            }
        }
    }
    segments
}
