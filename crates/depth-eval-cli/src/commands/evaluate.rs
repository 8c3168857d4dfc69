//! Dataset evaluation command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use depth_eval::stats::Summary;
use depth_eval::{
    dataset, DetailReport, EvalConfig, EvalEvent, Evaluator, MetricConfig, PairMetrics,
    ResampleFilter, SummaryReport,
};

pub fn run(
    predictions: PathBuf,
    ground_truths: PathBuf,
    output: Option<PathBuf>,
    accuracy_ratio: f64,
    filter: ResampleFilter,
    progress_interval: usize,
    verbose: bool,
) -> Result<()> {
    let (prediction_paths, ground_truth_paths) =
        dataset::paired_files(&predictions, &ground_truths)
            .context("Failed to list dataset directories")?;

    if verbose {
        eprintln!(
            "Found {} predictions in {}, {} ground truths in {}",
            prediction_paths.len(),
            predictions.display(),
            ground_truth_paths.len(),
            ground_truths.display()
        );
    }

    let config = EvalConfig::builder()
        .metrics(MetricConfig { accuracy_ratio })
        .filter(filter)
        .progress_interval(progress_interval)
        .build();

    let mut evaluator = Evaluator::new(config);
    evaluator.set_observer(Box::new(move |event| match event {
        EvalEvent::Progress { current, total } => {
            if verbose {
                eprintln!("{current}/{total}");
            }
        }
        EvalEvent::PairSkipped { name, reason } => {
            eprintln!("Skipped {name}: {reason}");
        }
        _ => {}
    }));

    let (summary, detail) = evaluator
        .evaluate(&prediction_paths, &ground_truth_paths)
        .context("Evaluation failed")?;

    print_summary(&summary);
    println!();
    print_distributions(&detail);

    if let Some(dir) = output {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        summary.write_csv(&dir.join("summary.csv"))?;
        summary.write_json(&dir.join("summary.json"))?;
        detail.write_csv(&dir.join("detailed.csv"))?;
        detail.write_json(&dir.join("detailed.json"))?;

        println!();
        println!("Reports written to {}", dir.display());
    }

    Ok(())
}

fn print_summary(summary: &SummaryReport) {
    println!("Summary:");
    println!("{:-<60}", "");

    if summary.is_empty() {
        println!(
            "No pairs evaluated ({} skipped). Nothing to aggregate.",
            summary.skipped
        );
        return;
    }

    print_mean("mse_mean", summary.mse_mean);
    print_mean("rmse_mean", summary.rmse_mean);
    print_mean("mare_mean", summary.mare_mean);
    print_mean("mrse_mean", summary.mrse_mean);
    print_mean("accval_mean", summary.accval_mean);

    if let (Some(mse), Some(img)) = (summary.best_mse, summary.best_img.as_deref()) {
        println!("  {:<12} {} (mse {:.6})", "best:", img, mse);
    }
    if let (Some(mse), Some(img)) = (summary.worst_mse, summary.worst_img.as_deref()) {
        println!("  {:<12} {} (mse {:.6})", "worst:", img, mse);
    }

    println!(
        "Evaluated {} pairs, skipped {}.",
        summary.evaluated, summary.skipped
    );
}

fn print_mean(label: &str, value: Option<f64>) {
    if let Some(v) = value {
        println!("  {:<12} {:.6}", format!("{label}:"), v);
    }
}

fn print_distributions(detail: &DetailReport) {
    println!("Metric distributions:");
    println!("{:-<60}", "");
    println!(
        "{:<8} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Metric", "Mean", "Median", "StdDev", "Min", "Max"
    );

    let columns: [(&str, fn(&PairMetrics) -> f64); 5] = [
        ("mse", |m| m.mse),
        ("rmse", |m| m.rmse),
        ("mare", |m| m.mare),
        ("mrse", |m| m.mrse),
        ("accval", |m| m.accval),
    ];

    for (label, select) in columns {
        if let Some(s) = Summary::compute(&detail.metric_column(select)) {
            println!(
                "{:<8} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                label, s.mean, s.median, s.std_dev, s.min, s.max
            );
        }
    }
}
