pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "safeurl")]
#[command(about = "Analyse XOR-URLs and remap public-name sub-names", version)]
pub struct Args {
    /// Path to the safeurl state directory (defaults to ~/.safeurl)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
