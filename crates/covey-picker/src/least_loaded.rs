//! Power-of-two-choices picker driven by outstanding request counts.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{Done, Picker};

struct Node<T> {
    item: T,
    weight: f64,
    /// Requests picked but not yet completed.
    inflight: AtomicI64,
}

/// P2C picker that prefers the item with fewer outstanding requests per
/// unit of weight.
///
/// Each pick draws two distinct items uniformly at random and keeps the
/// less loaded of the pair. Random pairing keeps herd behaviour out of the
/// comparison while the in-flight counts pull traffic away from slow or
/// stuck items, because their requests stay outstanding longer.
pub struct LeastLoaded<T> {
    nodes: Vec<Arc<Node<T>>>,
    rng: Mutex<StdRng>,
}

impl<T> LeastLoaded<T> {
    /// Create an empty picker with an OS-seeded RNG.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Set the RNG seed for deterministic behaviour.
    pub fn seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }
}

impl<T> Default for LeastLoaded<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Picker<T> for LeastLoaded<T> {
    fn pick(&self) -> Option<(T, Done)> {
        let chosen = match self.nodes.len() {
            0 => return None,
            1 => &self.nodes[0],
            n => {
                // Two distinct indices. The second draw is over n-1 slots
                // and shifted past the first, so the pair is uniform.
                // The RNG lock covers exactly the two draws.
                let (a, b) = {
                    let mut rng = self.rng.lock().unwrap();
                    (rng.random_range(0..n), rng.random_range(0..n - 1))
                };
                let b = if b >= a { b + 1 } else { b };

                let first = &self.nodes[a];
                let second = &self.nodes[b];
                let first_load = first.inflight.load(Ordering::Relaxed) as f64;
                let second_load = second.inflight.load(Ordering::Relaxed) as f64;

                // Compare load per unit weight by cross-multiplying, which
                // stays well-defined for zero weights.
                if first_load * second.weight > second_load * first.weight {
                    second
                } else {
                    first
                }
            }
        };

        chosen.inflight.fetch_add(1, Ordering::Relaxed);
        let node = Arc::clone(chosen);
        let done = Done::from_fn(move || {
            node.inflight.fetch_sub(1, Ordering::Relaxed);
        });
        Some((chosen.item.clone(), done))
    }

    fn add(&mut self, item: T, weight: f64) {
        self.nodes.push(Arc::new(Node {
            item,
            weight,
            inflight: AtomicI64::new(0),
        }));
    }

    fn reset(&mut self) {
        self.nodes.clear();
    }
}
