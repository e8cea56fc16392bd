use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::link::Link;

/// Removes click-tracking redirects and tracking parameters from a URL.
#[derive(Debug, Parser)]
#[command(name = "untrack", version)]
pub struct Cli {
    /// The URL from which to remove trackers.
    #[arg(value_parser = Link::parse_web)]
    pub url: Link,

    #[arg(short, long, hide = true)]
    pub debug: bool,

    /// Do not show log messages.
    #[arg(short, long)]
    pub quiet: bool,

    /// Show verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Debug wins over verbose, verbose over quiet; warnings and errors
    /// otherwise.
    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::DEBUG
        } else if self.verbose {
            LevelFilter::INFO
        } else if self.quiet {
            LevelFilter::OFF
        } else {
            LevelFilter::WARN
        }
    }
}
