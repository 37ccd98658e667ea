//! Recorded position traces used to replay a tracking session
use crate::gps::PositionSample;
use crate::tracker::Destination;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

/// A destination and the samples recorded while travelling toward it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trace {
    destination: Destination,
    #[serde(default)]
    samples: Vec<PositionSample>,
}

impl Trace {
    pub fn new(destination: Destination, samples: Vec<PositionSample>) -> Self {
        Trace {
            destination,
            samples,
        }
    }

    pub fn load<T: Read>(source: &mut T) -> Result<Self, Error> {
        Ok(serde_yaml::from_reader(source)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let mut fp = File::open(path)?;
        Trace::load(&mut fp)
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    /// Consume the trace returning its parts
    pub fn into_parts(self) -> (Destination, Vec<PositionSample>) {
        (self.destination, self.samples)
    }
}
