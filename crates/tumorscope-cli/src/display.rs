//! Human-readable cards for `inspect` and `predict --probabilities`.

use std::fmt::Write;
use std::path::Path;

use tumorscope_model::{ARTIFACT_FILES, BundleSummary, Prediction};

const BAR_WIDTH: usize = 30;

// ── Public API ──

/// Print a model bundle as a vertical card.
pub fn print_bundle_card(dir: &Path, summary: &BundleSummary) {
    print!("{}", render_bundle_card(dir, summary));
}

/// Print per-class probabilities to stderr, most likely first, keeping
/// stdout for the JSON response.
pub fn print_probabilities(prediction: &Prediction) {
    eprint!("{}", render_probabilities(prediction));
}

// ── Rendering ──

pub fn render_bundle_card(dir: &Path, summary: &BundleSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", dir.display());
    let _ = writeln!(out);

    let _ = writeln!(out, "Artifacts");
    for name in ARTIFACT_FILES {
        let _ = writeln!(out, "  {name}");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Pipeline");
    let _ = writeln!(out, "  {:<26} {}", "gene columns", summary.n_features);
    let _ = writeln!(out, "  {:<26} {}", "pca components", summary.n_components);
    let _ = writeln!(out, "  {:<26} {}", "pca whitening", summary.whiten);
    let _ = writeln!(out, "  {:<26} {}", "trees", summary.n_trees);
    let _ = writeln!(out, "  {:<26} {}", "tree nodes", summary.n_nodes);
    let _ = writeln!(out);

    let _ = writeln!(out, "Classes ({})", summary.classes.len());
    for (i, class) in summary.classes.iter().enumerate() {
        let _ = writeln!(out, "  {i:>3}  {class}");
    }
    out
}

pub fn render_probabilities(prediction: &Prediction) -> String {
    let mut rows: Vec<&(String, f64)> = prediction.probabilities.iter().collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut out = String::new();
    for (label, p) in rows {
        let filled = (p.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        let marker = if *label == prediction.label { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {label:<12} {:>6.1}%  {}",
            p * 100.0,
            "#".repeat(filled)
        );
    }
    out
}
