//! Configuration for `issuetrackd`.
//!
//! Everything is a flag with an environment fallback; no config file.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// `issuetrackd` - project-scoped issue tracking CRUD service.
#[derive(Parser, Debug)]
#[command(name = "issuetrackd")]
#[command(
    author,
    version,
    about = "Issue tracking CRUD API over a JSONL document store",
    long_about = None
)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "ISSUETRACK_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Path to the JSONL data file (created on first write)
    #[arg(long, env = "ISSUETRACK_DATA", default_value = ".issuetrack/projects.jsonl")]
    pub data: PathBuf,

    /// Prefix for generated issue ids
    #[arg(long, env = "ISSUETRACK_ID_PREFIX", default_value = "it")]
    pub id_prefix: String,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,
}
