//! Load-aware weighted pickers.
//!
//! A picker owns a population of weighted items and answers one question:
//! which item should the next request go to? Three strategies are provided,
//! all sharing the [`Picker`] trait:
//!
//! - [`LeastLoaded`]: power-of-two-choices on outstanding request counts.
//! - [`PeakEwma`]: power-of-two-choices on a peak-sensitive moving average
//!   of observed latency.
//! - [`SmoothRoundRobin`]: deterministic weighted rotation, no feedback.
//!
//! [`SetFilter`] wraps a picker and admits only items from a configured
//! locality.
//!
//! Selection is concurrent (`pick` takes `&self`); population changes are
//! exclusive (`add` and `reset` take `&mut self`). Callers that need to
//! change a live population build a fresh picker and swap it in, which is
//! how `covey-aperture` publishes rebuilt subsets.

mod least_loaded;
mod peak_ewma;
mod set;
mod smooth;

pub use least_loaded::LeastLoaded;
pub use peak_ewma::{DEFAULT_TAU, PeakEwma};
pub use set::SetFilter;
pub use smooth::SmoothRoundRobin;

use std::fmt;

/// A weighted item selector.
///
/// Implementations must tolerate `pick` being called from many threads at
/// once. Weights are relative, not normalized; an item with weight 2.0 is
/// meant to receive twice the share of an item with weight 1.0.
pub trait Picker<T>: Send + Sync {
    /// Select an item, or `None` when the population is empty.
    ///
    /// The returned [`Done`] must be completed when the request finishes so
    /// feedback-driven strategies see the outcome.
    fn pick(&self) -> Option<(T, Done)>;

    /// Append `item` to the population with the given selection weight.
    fn add(&mut self, item: T, weight: f64);

    /// Remove every item from the population.
    fn reset(&mut self);
}

/// Completion handle returned by [`Picker::pick`].
///
/// Call [`Done::complete`] exactly once when the picked item has finished
/// serving the request. Success or failure does not matter to the picker,
/// only that the request is no longer outstanding. A handle that is dropped
/// without completing leaves feedback-driven strategies counting the
/// request forever, which steers traffic away from that item.
pub struct Done(Option<Box<dyn FnOnce() + Send>>);

impl Done {
    /// A handle whose completion is a no-op, for strategies without
    /// feedback.
    pub fn none() -> Self {
        Self(None)
    }

    /// Wrap a completion callback.
    pub fn from_fn(f: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(f)))
    }

    /// Report the request as finished.
    pub fn complete(self) {
        if let Some(f) = self.0 {
            f();
        }
    }
}

impl fmt::Debug for Done {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.0.is_some() { "armed" } else { "noop" };
        write!(f, "Done({state})")
    }
}
