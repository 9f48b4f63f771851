//! CLI entry point for photographic mosaic generation

use clap::Parser;
use tilemosaic::io::cli::{Cli, CommandRunner};

fn main() -> tilemosaic::Result<()> {
    let cli = Cli::parse();
    CommandRunner::new(cli).run()
}
