//! Command line parsing

use std::path::PathBuf;

use anyhow::{bail, Result};

pub const USAGE: &str = "usage: hyprdock [--config <path>] [--once]";

/// Parsed command line
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Config file to use instead of the search path
    pub config: Option<PathBuf>,
    /// Print the dock view once as JSON and exit
    pub once: bool,
    pub help: bool,
}

impl Options {
    /// Parse `args` (including the program name).
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut options = Self::default();
        let mut rest = args.iter().skip(1);
        while let Some(arg) = rest.next() {
            match arg.as_str() {
                "--once" => options.once = true,
                "-h" | "--help" => options.help = true,
                "-c" | "--config" => match rest.next() {
                    Some(path) => options.config = Some(PathBuf::from(path)),
                    None => bail!("missing path after {arg}\n{USAGE}"),
                },
                other => match other.strip_prefix("--config=") {
                    Some(path) if !path.is_empty() => options.config = Some(PathBuf::from(path)),
                    _ => bail!("unknown argument: {other}\n{USAGE}"),
                },
            }
        }
        Ok(options)
    }
}
