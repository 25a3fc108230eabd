use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "check-tcp")]
#[command(version, about = "Check TCP reachability of many servers at once.")]
pub struct CommandLine {
    /// Timeout waiting for responses, in seconds [default: 1]
    #[arg(short = 't', value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Show all servers, including OK status
    #[arg(short = 'a')]
    pub all: bool,

    /// Quietly exit when no servers are given
    #[arg(short = 'q')]
    pub quiet: bool,

    /// JSON file with default settings and extra servers
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Servers to check, as <ip> or <ip>:<port> (port 9 when omitted)
    #[arg(value_name = "SERVER")]
    pub targets: Vec<String>,
}

impl CommandLine {
    /// Parse the process arguments. Help and version exit 0; any usage error
    /// is printed to stderr and exits 1.
    pub fn parse_args() -> Self {
        Self::try_parse().unwrap_or_else(|e| {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        })
    }

    pub fn print_usage() {
        eprintln!("{}", Self::command().render_help());
    }
}
