//! Display geometry export
//!
//! Writes the normalized box geometry of a snapshot for an external plotting
//! front end. Every box but the last (the unrestricted reference box) is laid
//! out, either overlaid in one bundle or one bundle per box.

use std::path::PathBuf;

use clap::Args;
use scendisc_analysis::report::BoxReport as _;
use tracing::info;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct GeometryArg {
    /// Path to the analysis snapshot JSON file
    pub snapshot: PathBuf,

    /// Overlay all boxes in a single bundle
    #[arg(long)]
    pub together: bool,

    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GeometryArg) -> anyhow::Result<()> {
    let sequence = util::read_snapshot_file(&arg.snapshot)?;
    let geometry = sequence.display_boxes(arg.together)?;
    info!(
        bundles = geometry.bundles.len(),
        dims = geometry.dims.len(),
        "box geometry computed"
    );
    Output::save_json(&geometry, arg.output.clone())
}
