//! # stackrl
//!
//! Trains an agent on a pixel arcade environment through the frame-stacking
//! adapter. See [`stackrl::cli::Args`] for the flags.

use anyhow::Result;
use clap::Parser;
use stackrl::cli::Args;

fn main() -> Result<()> {
    stackrl::app::run(&Args::parse())
}
