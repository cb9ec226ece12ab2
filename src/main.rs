//! Command-line travel dashboard.
//!
//! Lists travel requests and batches, shows the calendar and the dashboard
//! statistics, and drives the request form.

mod cli;

use clap::Parser;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
