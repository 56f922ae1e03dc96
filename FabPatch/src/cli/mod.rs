//! FabPatch CLI - Command-line interface for patching Fabric mods

pub mod args;
pub mod patch_cmd;
pub mod progress;
pub mod prompt;
pub mod summary;

use clap::Parser;
use tracing::Level;

pub use args::PatchArgs;

/// Run the FabPatch CLI
pub fn run_cli() -> anyhow::Result<()> {
    let args = PatchArgs::parse();

    // Setup logging
    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    patch_cmd::execute(&args)
}
