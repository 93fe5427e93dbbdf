//! Render a document request to PDF
//!
//! Reads a JSON `DocumentRequest` (`title`, `subtitle`, `lines`, `footer`)
//! and writes a single-page PDF.
//!
//! Usage:
//!   cargo run --bin render_document -- request.json report.pdf

use dignipay_emit::writer::{build, DocumentRequest};
use std::fs;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <request.json> <output.pdf>", args[0]);
        std::process::exit(1);
    }
    let input = PathBuf::from(&args[1]);
    let output = PathBuf::from(&args[2]);

    let json = match fs::read_to_string(&input) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input.display(), e);
            std::process::exit(1);
        },
    };
    let request: DocumentRequest = match serde_json::from_str(&json) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Invalid document request: {}", e);
            std::process::exit(1);
        },
    };

    let pdf = build(&request);
    if let Err(e) = pdf.save(&output) {
        eprintln!("Failed to write {}: {}", output.display(), e);
        std::process::exit(1);
    }
    println!("Wrote {} ({} bytes)", output.display(), pdf.len());
}
