use clap::Parser;
use std::path::PathBuf;

/// winmesh — a synthetic window that joins the shared window mesh.
#[derive(Parser, Debug)]
#[command(name = "winmesh", version, about)]
pub struct Args {
    /// Directory backing the shared store (all windows must agree on it).
    #[arg(short = 's', long)]
    pub store_dir: Option<PathBuf>,

    /// Label carried in this window's metadata.
    #[arg(short = 'l', long)]
    pub label: Option<String>,

    /// Milliseconds between ticks.
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Initial shape as `x,y,w,h`. Default is a random spot.
    #[arg(long)]
    pub rect: Option<String>,

    /// Drift along a slow orbit instead of standing still.
    #[arg(long)]
    pub drift: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
