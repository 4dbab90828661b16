//! Solar Rooftop - rooftop solar potential and ROI from satellite images
//!
//! A CLI tool that estimates energy yield, cost, savings and payback for
//! uploaded rooftop images and exports the results.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
