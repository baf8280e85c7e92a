//! Snapshot description command
//!
//! Prints a text report of an analysis snapshot: a dataset summary, the box
//! limits and statistics tables, how many dimensions each box restricts, and
//! optionally the quasi-p value of every restriction.

mod table;

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use scendisc_analysis::{
    dataset::Dataset,
    limits::{self, BoxLimits},
    quasi_p,
    report::{self, BoxReport as _, BoxSequence},
};
use scendisc_stats::descriptive::DescriptiveStats;
use tracing::warn;

use self::table::TextTable;
use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct DescribeArg {
    /// Path to the analysis snapshot JSON file
    pub snapshot: PathBuf,

    /// Also compute quasi-p values for every restricted dimension
    #[arg(long)]
    pub quasi_p: bool,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let sequence = util::read_snapshot_file(&arg.snapshot)?;
    let box_init = sequence
        .box_init()
        .context("Failed to compute reference box")?;

    println!("Scenario Discovery Report");
    println!("=========================\n");

    print_dataset_summary(sequence.dataset());
    println!();

    println!("Boxes:");
    if sequence.boxes().is_empty() {
        println!("  (none)");
    } else {
        let boxes = sequence
            .boxes_to_table()
            .context("Failed to tabulate boxes")?;
        table::boxes_table(&boxes).print();
    }
    println!();

    println!("Statistics:");
    let stats = sequence.stats_to_table();
    if stats.index.is_empty() {
        println!("  (none)");
    } else {
        table::stats_table(&stats).print();
    }
    println!();

    print_restricted_counts(sequence.boxes(), &box_init)?;

    if arg.quasi_p {
        println!();
        print_quasi_p(&sequence, &box_init)?;
    }

    Ok(())
}

fn print_dataset_summary(dataset: &Dataset) {
    let names = dataset.x().names().collect::<Vec<_>>();
    println!("Dataset:");
    println!("  Rows       : {}", dataset.rows());
    println!("  Dimensions : {} ({})", names.len(), names.join(", "));
    println!("  Mode       : {}", dataset.mode());

    match DescriptiveStats::new(dataset.y().iter().copied()) {
        Some(stats) => {
            println!(
                "  Outcome    : mean {:.3}, median {:.3}, min {:.3}, max {:.3}, std {:.3}",
                stats.mean, stats.median, stats.min, stats.max, stats.std_dev
            );
            println!(
                "  Positive   : {} ({:.1}%)",
                stats.positive_count,
                100.0 * stats.positive_fraction()
            );
        }
        None => println!("  Outcome    : (empty)"),
    }
}

fn print_restricted_counts(boxes: &[BoxLimits], box_init: &BoxLimits) -> anyhow::Result<()> {
    println!("Restricted dimensions:");
    let mut text = TextTable::new(["Box", "Count", "Dimensions"]);
    for (i, boxed) in boxes.iter().enumerate() {
        let dims = limits::restricted_dims(boxed, box_init)
            .with_context(|| format!("Failed to compare {}", report::box_label(i)))?;
        text.push_row(vec![
            report::box_label(i),
            dims.len().to_string(),
            dims.join(", "),
        ]);
    }
    text.print();
    Ok(())
}

/// Prints one row per restricted dimension of every box.
///
/// A box whose quasi-p values cannot be computed is shown with `N/A` values.
fn print_quasi_p(sequence: &BoxSequence, box_init: &BoxLimits) -> anyhow::Result<()> {
    println!("Quasi-p values:");
    let mut text = TextTable::new(["Box", "Dimension", "Quasi-p"]);
    for (i, boxed) in sequence.boxes().iter().enumerate() {
        let label = report::box_label(i);
        let dims = limits::restricted_dims(boxed, box_init)
            .with_context(|| format!("Failed to compare {label}"))?;
        let values = quasi_p::quasi_p(sequence.dataset(), boxed, box_init)
            .inspect_err(|error| warn!(%label, %error, "quasi-p unavailable"))
            .ok();
        for dim in dims {
            let value = values
                .as_ref()
                .and_then(|values| values.get(&dim))
                .map_or("N/A".to_owned(), |p| format!("{p:.3e}"));
            text.push_row(vec![label.clone(), dim, value]);
        }
    }
    text.print();
    Ok(())
}
