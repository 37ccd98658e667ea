//! Define the status subcommand
use crate::status::{format_progress, Status};
use structopt::StructOpt;

/// Show the message displayed for a given progress value
#[derive(Debug, StructOpt)]
pub struct StatusOpts {
    /// Progress fraction between 0 and 1
    #[structopt(name = "PROGRESS")]
    progress: f64,
}

pub fn status_command(opts: StatusOpts) -> Result<(), Box<dyn std::error::Error>> {
    if !opts.progress.is_finite() {
        return Err(Box::new(crate::Error::Other(format!(
            "progress must be a finite number: {}",
            opts.progress
        ))));
    }
    let progress = opts.progress.max(0.0).min(1.0);
    let status = Status::for_progress(progress);
    println!(
        "{} {} {}",
        format_progress(progress),
        status.color(),
        status.message()
    );
    Ok(())
}
