use std::io;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod command;
mod schema;
mod util;

fn main() -> anyhow::Result<()> {
    // report output goes to stdout, diagnostics to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    command::run()
}
