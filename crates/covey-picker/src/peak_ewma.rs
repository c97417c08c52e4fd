//! Power-of-two-choices picker driven by peak-sensitive latency averages.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{Done, Picker};

/// Default decay time constant for the latency estimate.
pub const DEFAULT_TAU: Duration = Duration::from_millis(covey_types::DEFAULT_EWMA_TAU_MS);

/// Peak-sensitive exponentially weighted moving average of latency.
///
/// A sample above the current estimate replaces it outright; only recovery
/// is smoothed, with older observations decaying over the time constant
/// `tau`. A slow spell is therefore noticed after one bad response, while
/// a single fast response after a slow spell moves the estimate very
/// little.
struct EwmaEstimator {
    /// Fixed reference point for `stamp`.
    origin: Instant,
    /// Nanoseconds since `origin` at the last observation.
    stamp: AtomicU64,
    /// Current estimate in nanoseconds.
    value: AtomicU64,
    tau_nanos: f64,
}

impl EwmaEstimator {
    fn new(tau: Duration) -> Self {
        Self {
            origin: Instant::now(),
            stamp: AtomicU64::new(0),
            value: AtomicU64::new(0),
            tau_nanos: tau.as_nanos() as f64,
        }
    }

    fn observe(&self, rtt_nanos: u64) {
        let now = self.origin.elapsed().as_nanos() as u64;
        // Concurrent observers can reorder; a negative gap decays nothing.
        let dt = now.saturating_sub(self.stamp.swap(now, Ordering::Relaxed));
        let value = self.value.load(Ordering::Relaxed);
        let next = if rtt_nanos > value {
            rtt_nanos
        } else {
            let decay = (-(dt as f64) / self.tau_nanos).exp();
            (value as f64 * decay + rtt_nanos as f64 * (1.0 - decay)) as u64
        };
        self.value.store(next, Ordering::Relaxed);
    }

    fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

struct Node<T> {
    item: T,
    weight: f64,
    latency: EwmaEstimator,
}

/// P2C picker that prefers the item with the lower peak-EWMA latency per
/// unit of weight.
///
/// Latency is measured from pick to completion, so the strategy needs no
/// cooperation from the transport; callers only have to complete the
/// [`Done`] handle when the response arrives.
pub struct PeakEwma<T> {
    nodes: Vec<Arc<Node<T>>>,
    tau: Duration,
    rng: Mutex<StdRng>,
}

impl<T> PeakEwma<T> {
    /// Create an empty picker with the default decay constant and an
    /// OS-seeded RNG.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            tau: DEFAULT_TAU,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Set the decay time constant for items added afterwards. A zero
    /// duration falls back to the default.
    pub fn with_tau(mut self, tau: Duration) -> Self {
        self.tau = if tau.is_zero() { DEFAULT_TAU } else { tau };
        self
    }

    /// Set the RNG seed for deterministic behaviour.
    pub fn seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }
}

impl<T> Default for PeakEwma<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Picker<T> for PeakEwma<T> {
    fn pick(&self) -> Option<(T, Done)> {
        let started = Instant::now();
        let chosen = match self.nodes.len() {
            0 => return None,
            1 => &self.nodes[0],
            n => {
                let (a, b) = {
                    let mut rng = self.rng.lock().unwrap();
                    (rng.random_range(0..n), rng.random_range(0..n - 1))
                };
                let b = if b >= a { b + 1 } else { b };

                let first = &self.nodes[a];
                let second = &self.nodes[b];
                let first_latency = first.latency.value() as f64;
                let second_latency = second.latency.value() as f64;

                if first_latency * second.weight > second_latency * first.weight {
                    second
                } else {
                    first
                }
            }
        };

        let node = Arc::clone(chosen);
        let done = Done::from_fn(move || {
            node.latency.observe(started.elapsed().as_nanos() as u64);
        });
        Some((chosen.item.clone(), done))
    }

    fn add(&mut self, item: T, weight: f64) {
        self.nodes.push(Arc::new(Node {
            item,
            weight,
            latency: EwmaEstimator::new(self.tau),
        }));
    }

    fn reset(&mut self) {
        self.nodes.clear();
    }
}
