//! Define the track subcommand
use crate::config::Config;
use crate::region::RegionController;
use crate::source::{feed, ReplaySource, SharedTracker};
use crate::status::{format_distance, format_progress};
use crate::trace::Trace;
use crate::TrackingUpdate;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use structopt::StructOpt;

/// Replay a YAML position trace through the distance tracker
#[derive(Debug, StructOpt)]
pub struct TrackOpts {
    /// Trace file holding the destination and recorded samples
    #[structopt(name = "TRACE", parse(from_os_str))]
    trace: PathBuf,
    /// Also print the map region that follows the user
    #[structopt(long)]
    region: bool,
    /// Print the final route line as an encoded polyline
    #[structopt(long)]
    polyline: bool,
}

pub fn track_command(config: Config, opts: TrackOpts) -> Result<(), Box<dyn std::error::Error>> {
    let (destination, samples) = Trace::from_file(&opts.trace)?.into_parts();
    if samples.is_empty() {
        warn!("Trace {:?} has no position samples", opts.trace);
    }
    info!(
        "Replaying {} samples toward '{}' ({})",
        samples.len(),
        destination.name(),
        destination.address()
    );

    // the map follows every sample, tracking output is printed from the subscriber
    let region = Arc::new(Mutex::new(RegionController::from_config(config.region())));
    let shared = SharedTracker::default();
    let show_region = opts.region;
    let follower = Arc::clone(&region);
    shared.subscribe(move |update: &TrackingUpdate| {
        let mut line = format!(
            "{:>12} {:>5} {}",
            format_distance(update.distance()),
            format_progress(update.progress()),
            update.status().message()
        );
        if show_region {
            if let Ok(mut controller) = follower.lock() {
                controller.on_position_update(update.route_line().origin());
                let r = controller.region();
                line.push_str(&format!(
                    " [center {:.6},{:.6} span {:.3}x{:.3}]",
                    r.center.latitude(),
                    r.center.longitude(),
                    r.span.latitude_delta,
                    r.span.longitude_delta
                ));
            }
        }
        println!("{}", line);
    })?;

    shared.start(destination)?;
    let updates = feed(&mut ReplaySource::new(samples), &shared)?;
    info!("Processed {} tracking updates", updates);

    if let Some(update) = shared.last_update()? {
        if opts.polyline {
            println!("{}", update.route_line().to_polyline()?);
        }
        if opts.region {
            let controller = region
                .lock()
                .map_err(|_| crate::Error::Other("map region state poisoned".to_string()))?;
            let preview = controller.fit_route(&update.route_line());
            println!(
                "preview center {:.6},{:.6} span {:.4}x{:.4}",
                preview.center.latitude(),
                preview.center.longitude(),
                preview.span.latitude_delta,
                preview.span.longitude_delta
            );
        }
    }
    shared.stop()?;

    Ok(())
}
