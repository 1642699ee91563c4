//! Simple DRC example: check a board snapshot and print the text report.

use clearguard::prelude::*;
use clearguard::report;
use std::path::Path;

fn main() -> Result<(), DrcError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/clean_board.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_drc [path/to/board.json]");
        std::process::exit(1);
    }

    let mut board = Board::load(path)?;
    let result = DrcEngine::default().run(&mut board);

    let stdout = std::io::stdout();
    report::write_report(&mut stdout.lock(), &result, &board)?;

    if result.has_errors() {
        println!("\nDRC failed ({} errors).", result.stats.errors);
        std::process::exit(1);
    }

    println!("\nDRC passed ({} warnings).", result.stats.warnings);
    Ok(())
}
