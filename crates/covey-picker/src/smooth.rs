//! Deterministic smooth weighted round-robin picker.

use std::sync::Mutex;

use crate::{Done, Picker};

struct Node<T> {
    item: T,
    weight: i64,
    current_weight: i64,
    effective_weight: i64,
}

/// Weighted round-robin that interleaves items instead of emitting them in
/// runs (the nginx algorithm).
///
/// Each pick raises every item's current weight by its effective weight,
/// selects the largest current weight, and lowers the winner by the total
/// just distributed. Over any window of `sum(weights)` picks each item is
/// selected exactly `weight` times, and for weights {5, 1, 1} the order is
/// a, a, b, a, c, a, a rather than five a's in a row.
///
/// Effective weights start equal to the configured weights and are only
/// relevant if a caller lowers one to shed load from an item; they climb
/// back by one per pick until they reach the configured weight again.
pub struct SmoothRoundRobin<T> {
    nodes: Mutex<Vec<Node<T>>>,
}

impl<T> SmoothRoundRobin<T> {
    /// Create an empty picker.
    pub fn new() -> Self {
        Self {
            nodes: Mutex::new(Vec::new()),
        }
    }
}

impl<T> Default for SmoothRoundRobin<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Picker<T> for SmoothRoundRobin<T> {
    fn pick(&self) -> Option<(T, Done)> {
        let mut nodes = self.nodes.lock().unwrap();
        match nodes.len() {
            0 => None,
            // A single item is returned without touching its weights.
            1 => Some((nodes[0].item.clone(), Done::none())),
            _ => {
                let mut total = 0;
                let mut best_index = 0;
                let mut best_weight = i64::MIN;
                for (i, node) in nodes.iter_mut().enumerate() {
                    node.current_weight += node.effective_weight;
                    total += node.effective_weight;
                    if node.effective_weight < node.weight {
                        node.effective_weight += 1;
                    }
                    // Strictly greater, so ties go to the earliest item.
                    if node.current_weight > best_weight {
                        best_weight = node.current_weight;
                        best_index = i;
                    }
                }

                let best = &mut nodes[best_index];
                best.current_weight -= total;
                Some((best.item.clone(), Done::none()))
            }
        }
    }

    fn add(&mut self, item: T, weight: f64) {
        // Fractional weights are floored; selection here is integral.
        let weight = weight.floor() as i64;
        self.nodes.get_mut().unwrap().push(Node {
            item,
            weight,
            current_weight: 0,
            effective_weight: weight,
        });
    }

    fn reset(&mut self) {
        self.nodes.get_mut().unwrap().clear();
    }
}
