//! Plumbing between an upstream location source and the distance tracker
use crate::gps::{Coordinate, PositionSample};
use crate::tracker::{Destination, DistanceTracker, TrackingUpdate};
use crate::Error;
use log::{debug, warn};
use std::mem;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard};

/// trait that defines something able to deliver position samples in order
pub trait LocationSource {
    /// Block until the next sample is available, None once the source is exhausted
    fn next_sample(&mut self) -> Option<PositionSample>;
}

impl LocationSource for Receiver<PositionSample> {
    fn next_sample(&mut self) -> Option<PositionSample> {
        self.recv().ok()
    }
}

/// Replays a recorded list of samples
#[derive(Debug)]
pub struct ReplaySource {
    samples: std::vec::IntoIter<PositionSample>,
}

impl ReplaySource {
    pub fn new(samples: Vec<PositionSample>) -> Self {
        ReplaySource {
            samples: samples.into_iter(),
        }
    }
}

impl LocationSource for ReplaySource {
    fn next_sample(&mut self) -> Option<PositionSample> {
        self.samples.next()
    }
}

type Subscriber = Box<dyn FnMut(&TrackingUpdate) + Send>;

struct Inner {
    tracker: DistanceTracker,
    last_sample: Option<PositionSample>,
}

/// Thread safe handle to a single tracker, start, update and stop never interleave.
///
/// Subscribers are called after the tracker lock is released so they are free to
/// call back into the handle, e.g. to stop tracking once the destination is reached.
#[derive(Clone)]
pub struct SharedTracker {
    inner: Arc<Mutex<Inner>>,
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl Default for SharedTracker {
    fn default() -> Self {
        SharedTracker::new(DistanceTracker::new())
    }
}

impl SharedTracker {
    pub fn new(tracker: DistanceTracker) -> Self {
        SharedTracker {
            inner: Arc::new(Mutex::new(Inner {
                tracker,
                last_sample: None,
            })),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, Error> {
        self.inner.lock().map_err(|_| Error::TrackerPoisoned)
    }

    fn lock_subscribers(&self) -> Result<MutexGuard<'_, Vec<Subscriber>>, Error> {
        self.subscribers.lock().map_err(|_| Error::TrackerPoisoned)
    }

    /// Register a callback invoked with every update produced while tracking
    pub fn subscribe<F>(&self, callback: F) -> Result<(), Error>
    where
        F: FnMut(&TrackingUpdate) + Send + 'static,
    {
        self.lock_subscribers()?.push(Box::new(callback));
        Ok(())
    }

    /// Start tracking using the most recent sample seen as the current position
    pub fn start(&self, destination: Destination) -> Result<(), Error> {
        let update = {
            let mut inner = self.lock()?;
            let current = inner.last_sample.map(|s| s.coordinate());
            inner.tracker.start(destination, current);
            inner.tracker.last_update().copied()
        };
        if let Some(update) = update {
            self.notify(&update)?;
        }
        Ok(())
    }

    /// Feed a single sample to the tracker, subscribers are notified of the result
    pub fn on_position_update(
        &self,
        sample: PositionSample,
    ) -> Result<Option<TrackingUpdate>, Error> {
        let update = {
            let mut inner = self.lock()?;
            inner.last_sample = Some(sample);
            inner.tracker.on_position_update(sample.coordinate())
        };
        if let Some(update) = &update {
            self.notify(update)?;
        }
        Ok(update)
    }

    pub fn stop(&self) -> Result<(), Error> {
        self.lock()?.tracker.stop();
        Ok(())
    }

    pub fn is_tracking(&self) -> Result<bool, Error> {
        Ok(self.lock()?.tracker.is_tracking())
    }

    pub fn last_update(&self) -> Result<Option<TrackingUpdate>, Error> {
        Ok(self.lock()?.tracker.last_update().copied())
    }

    /// Latest known position regardless of tracking state
    pub fn last_position(&self) -> Result<Option<Coordinate>, Error> {
        Ok(self.lock()?.last_sample.map(|s| s.coordinate()))
    }

    /// Call every subscriber without holding any lock.
    ///
    /// The list is taken out while the callbacks run so a subscriber may also
    /// subscribe; nested updates raised from inside a callback are not republished.
    fn notify(&self, update: &TrackingUpdate) -> Result<(), Error> {
        let mut running = mem::take(&mut *self.lock_subscribers()?);
        for subscriber in running.iter_mut() {
            subscriber(update);
        }
        let mut subscribers = self.lock_subscribers()?;
        let added = mem::replace(&mut *subscribers, running);
        subscribers.extend(added);
        Ok(())
    }
}

/// Drain a location source into the tracker serially, returns the number of samples that
/// produced an update
pub fn feed<S: LocationSource>(source: &mut S, tracker: &SharedTracker) -> Result<usize, Error> {
    let mut updates = 0;
    while let Some(sample) = source.next_sample() {
        if let Some(accuracy) = sample.accuracy() {
            if accuracy < 0.0 {
                // negative accuracy marks an invalid fix on most platforms
                warn!("Skipping sample with invalid accuracy: {:?}", sample);
                continue;
            }
        }
        if tracker.on_position_update(sample)?.is_some() {
            updates += 1;
        }
    }
    debug!("Location source exhausted after {} tracking updates", updates);
    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::thread;
    use std::time::Duration;

    fn sample(lat: f64, lon: f64) -> PositionSample {
        PositionSample::new(Coordinate::new(lat, lon).unwrap())
    }

    fn destination() -> Destination {
        Destination::new(
            "Pier".to_string(),
            None,
            Coordinate::new(0.0, 0.01).unwrap(),
        )
    }

    #[test]
    fn test_start_uses_last_known_position() {
        let shared = SharedTracker::default();
        shared.on_position_update(sample(0.0, 0.0)).unwrap();
        shared.start(destination()).unwrap();
        let update = shared.last_update().unwrap().unwrap();
        assert_eq!(update.progress(), 0.0);
        assert!(update.distance() > 1100.0);
    }

    #[test]
    fn test_subscribers_receive_updates() {
        let shared = SharedTracker::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        shared
            .subscribe(move |u| sink.lock().unwrap().push(u.progress()))
            .unwrap();

        // no session yet so nothing is published
        shared.on_position_update(sample(0.0, 0.0)).unwrap();
        assert!(seen.lock().unwrap().is_empty());

        shared.start(destination()).unwrap();
        shared.on_position_update(sample(0.0, 0.005)).unwrap();
        shared.stop().unwrap();
        shared.on_position_update(sample(0.0, 0.01)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], 0.0);
        assert!((seen[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_feed_from_channel() {
        let shared = SharedTracker::default();
        shared.start(destination()).unwrap();
        let (tx, mut rx) = channel();
        let producer = thread::spawn(move || {
            for lon in &[0.0, 0.0025, 0.005, 0.0075, 0.01] {
                tx.send(sample(0.0, *lon)).unwrap();
            }
        });
        let updates = feed(&mut rx, &shared).unwrap();
        producer.join().unwrap();

        assert_eq!(updates, 5);
        let last = shared.last_update().unwrap().unwrap();
        assert!((last.progress() - 1.0).abs() < 1e-9);
        assert_eq!(
            last.status().message(),
            "You've arrived at your destination!"
        );
    }

    #[test]
    fn test_feed_skips_invalid_accuracy() {
        let shared = SharedTracker::default();
        shared.start(destination()).unwrap();
        let mut source = ReplaySource::new(vec![
            sample(0.0, 0.0),
            sample(0.0, 0.009).with_accuracy(Some(-1.0)),
            sample(0.0, 0.005).with_accuracy(Some(5.0)),
        ]);
        assert_eq!(feed(&mut source, &shared).unwrap(), 2);
        assert_eq!(
            shared.last_position().unwrap(),
            Some(Coordinate::new(0.0, 0.005).unwrap())
        );
    }

    #[test]
    fn test_feed_without_session_counts_nothing() {
        let shared = SharedTracker::default();
        let mut source = ReplaySource::new(vec![sample(1.0, 1.0), sample(1.0, 1.1)]);
        assert_eq!(feed(&mut source, &shared).unwrap(), 0);
        assert!(!shared.is_tracking().unwrap());
        assert_eq!(
            shared.last_position().unwrap(),
            Some(Coordinate::new(1.0, 1.1).unwrap())
        );
    }

    #[test]
    fn test_subscriber_can_stop_on_arrival() {
        let shared = SharedTracker::default();
        let handle = shared.clone();
        shared
            .subscribe(move |u| {
                if u.progress() >= 0.95 {
                    handle.stop().unwrap();
                }
            })
            .unwrap();

        let (done_tx, done_rx) = channel();
        let worker = shared.clone();
        thread::spawn(move || {
            worker.start(destination()).unwrap();
            worker.on_position_update(sample(0.0, 0.0)).unwrap();
            worker.on_position_update(sample(0.0, 0.01)).unwrap();
            done_tx.send(()).unwrap();
        });
        done_rx
            .recv_timeout(Duration::from_secs(3))
            .expect("tracker locked up while a subscriber stopped it");

        assert!(!shared.is_tracking().unwrap());
        assert!(shared.last_update().unwrap().is_none());
    }

    #[test]
    fn test_subscriber_added_from_callback_is_kept() {
        let shared = SharedTracker::default();
        let handle = shared.clone();
        let count = Arc::new(Mutex::new(0));
        let late = Arc::clone(&count);
        let mut registered = false;
        shared
            .subscribe(move |_| {
                if !registered {
                    let late = Arc::clone(&late);
                    handle
                        .subscribe(move |_| *late.lock().unwrap() += 1)
                        .unwrap();
                    registered = true;
                }
            })
            .unwrap();

        shared.start(destination()).unwrap();
        shared.on_position_update(sample(0.0, 0.0)).unwrap();
        shared.on_position_update(sample(0.0, 0.005)).unwrap();
        assert_eq!(*count.lock().unwrap(), 1);
    }
}
