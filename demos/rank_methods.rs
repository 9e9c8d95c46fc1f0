//! Rank every background estimator on one capture
//!
//! Usage: `cargo run --example rank_methods -- <capture.png> <foreground> <reference>`
//!
//! `foreground` accepts `rgb(...)`, `rgba(...)` or `#rrggbb`; `reference` is
//! the known true background as `#rrggbb`.

use contrast_scan::{
    evaluate_all, image_loader, parse_css_color, rank_outcomes, to_hex, AnalysisError,
    EstimatorConfig,
};
use std::env;
use std::path::Path;
use std::process;

fn run(args: &[String]) -> contrast_scan::Result<()> {
    let [image_path, foreground, reference] = args else {
        return Err(AnalysisError::invalid_parameter(
            "arguments",
            "expected <capture> <foreground> <reference>",
        ));
    };

    let image = image_loader::load_image(Path::new(image_path))?;
    let foreground = parse_css_color(foreground)?;
    let reference = parse_css_color(reference)?;

    let outcomes = evaluate_all(&image, foreground, &EstimatorConfig::default());
    let ranked = rank_outcomes(outcomes, reference);

    println!(
        "foreground {}  reference {}",
        to_hex(foreground),
        to_hex(reference)
    );
    for (rank, entry) in ranked.iter().enumerate() {
        let name = entry.outcome.estimator.display_name();
        match &entry.outcome.result {
            Ok(estimate) => println!(
                "{:>2}. {:<26} {}  distance {:.2}",
                rank + 1,
                name,
                estimate.hex,
                entry.distance
            ),
            Err(e) => println!("{:>2}. {:<26} -        {}", rank + 1, name, e),
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("{}", e.user_message());
        process::exit(1);
    }
}
