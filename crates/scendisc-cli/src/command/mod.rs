use clap::{Parser, Subcommand};

use self::{describe::DescribeArg, geometry::GeometryArg};

mod describe;
mod geometry;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Print the dataset summary, box and statistics tables of a snapshot
    Describe(#[clap(flatten)] DescribeArg),
    /// Write box display geometry as JSON
    Geometry(#[clap(flatten)] GeometryArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Describe(arg) => describe::run(&arg)?,
        Mode::Geometry(arg) => geometry::run(&arg)?,
    }
    Ok(())
}
