//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// rtdist - Fetch and unpack runtime distributions for application packaging
#[derive(Parser)]
#[command(name = "rtdist")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch and unpack runtime distributions for application packaging")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to the rtdist log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Download (or copy) a runtime distribution into an output directory
    Unpack(UnpackArgs),
}

#[derive(Args)]
pub struct UnpackArgs {
    /// Target platform (linux, darwin, mas, win32)
    #[arg(long, default_value_t = host_platform())]
    pub platform: String,

    /// Target architecture (x64, ia32, arm64, armv7l)
    #[arg(long, default_value_t = host_arch())]
    pub arch: String,

    /// Runtime version, without a leading `v`
    #[arg(long = "version", value_name = "VERSION")]
    pub runtime_version: String,

    /// Output directory; its contents are replaced
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Unpack the forked distribution instead of the standard one
    #[arg(long)]
    pub fork: bool,

    /// Project directory that relative dist-dir paths resolve against
    #[arg(long, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// App bundle name inside the distribution (darwin and mas only)
    #[arg(long, value_name = "NAME")]
    pub bundle_name: Option<String>,

    /// Copy this unpacked distribution instead of downloading
    #[arg(long, value_name = "DIR")]
    pub dist_dir: Option<PathBuf>,

    /// Archive cache directory
    #[arg(long, value_name = "DIR")]
    pub cache: Option<PathBuf>,
}

/// Platform name of the running host in distribution naming
pub fn host_platform() -> String {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
    .to_string()
}

/// Architecture name of the running host in distribution naming
pub fn host_arch() -> String {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "x86" => "ia32",
        "aarch64" => "arm64",
        "arm" => "armv7l",
        other => other,
    }
    .to_string()
}
