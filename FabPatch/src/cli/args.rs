use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fabpatch")]
#[command(version, about = "FabPatch: retarget Fabric mods to a Minecraft version", long_about = None)]
pub struct PatchArgs {
    /// Mod archives to patch (defaults to archives in the current directory)
    pub archives: Vec<PathBuf>,

    /// Minecraft version to declare (prompted for if omitted)
    #[arg(short, long)]
    pub target_version: Option<String>,

    /// Output directory (default: ready)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Skip confirmation prompts and use the default version when none is given
    #[arg(short, long)]
    pub yes: bool,

    /// Config file (default: ./fabpatch.toml, then the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Patch archives in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Exit with status 0 even when some archives failed
    #[arg(long)]
    pub allow_errors: bool,

    /// Suppress progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Print debug diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
