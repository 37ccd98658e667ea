//! Define the application's command line interface
use crate::config::Config;
use simplelog::LevelFilter;
use std::path::{Path, PathBuf};
use structopt::clap::AppSettings;
use structopt::StructOpt;

mod distance;
use distance::{distance_command, DistanceOpts};
mod status;
use status::{status_command, StatusOpts};
mod track;
use track::{track_command, TrackOpts};

/// Track distance and progress toward a destination from recorded positions
#[derive(Debug, StructOpt)]
pub struct Cli {
    /// Set logging level to debug, use a second time (e.g. -vv) to set logging to trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: i32,
    /// Suppress info logging messages use a second time (e.g. -qq) to hide warnings
    #[structopt(short, long, parse(from_occurrences))]
    quiet: i32,
    /// Configuration file to use instead of the default location
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
    #[structopt(subcommand)]
    cmd: Command,
}

impl Cli {
    /// Return the verbose flag counts as a log level filter
    pub fn verbosity(&self, default: LevelFilter) -> LevelFilter {
        if self.quiet == 1 {
            LevelFilter::Warn
        } else if self.quiet > 1 {
            LevelFilter::Error
        } else if self.verbose == 1 {
            LevelFilter::Debug
        } else if self.verbose > 1 {
            LevelFilter::Trace
        } else {
            default
        }
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Consume options struct and return the result of subcommand execution
    pub fn execute_subcommand(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        self.cmd.execute(config)
    }
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Replay a recorded trace and print progress toward its destination
    #[structopt(name = "track")]
    Track(TrackOpts),
    /// Print the great-circle distance between two coordinates
    #[structopt(name = "distance", setting = AppSettings::AllowNegativeNumbers)]
    Distance(DistanceOpts),
    /// Print the status message and colour for a progress fraction
    #[structopt(name = "status")]
    Status(StatusOpts),
}

impl Command {
    /// Consume enum variant and return the result of the command's execution
    fn execute(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Command::Track(opts) => track_command(config, opts),
            Command::Distance(opts) => distance_command(opts),
            Command::Status(opts) => status_command(opts),
        }
    }
}
