//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "expctr")]
#[command(author, version, about = "Interactive controller for guided user-study experiments", long_about = None)]
pub struct Args {
    /// Development mode: bind the local experiments/ tree into the editor
    /// container and echo every container command
    #[arg(long)]
    pub dev: bool,

    /// Load task and group definitions from a JSON catalog file instead of
    /// the built-in study catalog
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Write the session log to this file
    /// (default: experiments_<timestamp>.log in the working directory)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}
