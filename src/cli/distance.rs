//! Define the distance subcommand
use crate::status::format_distance;
use crate::{Coordinate, Error};
use log::debug;
use structopt::StructOpt;

/// Compute the straight-line distance between two points
#[derive(Debug, StructOpt)]
pub struct DistanceOpts {
    /// Latitude of the starting point in degrees
    #[structopt(name = "LAT1")]
    lat1: f64,
    /// Longitude of the starting point in degrees
    #[structopt(name = "LON1")]
    lon1: f64,
    /// Latitude of the end point in degrees
    #[structopt(name = "LAT2")]
    lat2: f64,
    /// Longitude of the end point in degrees
    #[structopt(name = "LON2")]
    lon2: f64,
    /// Print raw meters instead of a human readable distance
    #[structopt(short, long)]
    meters: bool,
}

impl DistanceOpts {
    /// Validate the positional degrees and return the (from, to) points
    fn endpoints(&self) -> Result<(Coordinate, Coordinate), Error> {
        Ok((
            Coordinate::new(self.lat1, self.lon1)?,
            Coordinate::new(self.lat2, self.lon2)?,
        ))
    }
}

pub fn distance_command(opts: DistanceOpts) -> Result<(), Box<dyn std::error::Error>> {
    let (from, to) = opts.endpoints()?;
    let distance = from.distance_to(&to);
    debug!("Distance from {:?} to {:?}: {} m", from, to, distance);
    if opts.meters {
        println!("{:.1}", distance);
    } else {
        println!("{}", format_distance(distance));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};

    fn parse(args: &[&str]) -> DistanceOpts {
        let mut argv = vec!["closeby", "distance"];
        argv.extend_from_slice(args);
        match Cli::from_iter_safe(argv).unwrap().cmd {
            Command::Distance(opts) => opts,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_southern_hemisphere_points() {
        let opts = parse(&["-33.8688", "151.2093", "-37.8136", "144.9631"]);
        let (from, to) = opts.endpoints().unwrap();
        assert_eq!(from.latitude(), -33.8688);
        assert_eq!(from.longitude(), 151.2093);
        assert_eq!(to.latitude(), -37.8136);
        assert_eq!(to.longitude(), 144.9631);
        assert!(!opts.meters);
        // Sydney to Melbourne is roughly 714 km
        let d = from.distance_to(&to);
        assert!(d > 700_000.0 && d < 730_000.0, "got {}", d);
    }

    #[test]
    fn test_negative_longitude_with_flag() {
        let opts = parse(&["-m", "40.7128", "-74.0060", "51.5074", "-0.1278"]);
        assert!(opts.meters);
        assert_eq!(opts.lon1, -74.006);
        assert_eq!(opts.lon2, -0.1278);
    }

    #[test]
    fn test_out_of_range_point_is_rejected() {
        let opts = parse(&["95.0", "0.0", "0.0", "0.0"]);
        match opts.endpoints() {
            Err(Error::InvalidCoordinate(lat, _)) => assert_eq!(lat, 95.0),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_coordinate() {
        assert!(Cli::from_iter_safe(&["closeby", "distance", "1.0", "2.0", "3.0"]).is_err());
    }
}
