use closeby_tracker::cli::Cli;
use closeby_tracker::config::Config;
use log::debug;
use simplelog::{Config as LoggerConfig, TermLogger, TerminalMode};
use structopt::StructOpt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Cli::from_args();
    let config = Config::from_path(opt.config_path())?;
    let level_filter = opt.verbosity(config.log_level());
    TermLogger::init(level_filter, LoggerConfig::default(), TerminalMode::Mixed)?;
    debug!("Loaded configuration: {:?}", config);

    // execute subcommand
    opt.execute_subcommand(config)
}
