//! Locality gate in front of a weighted picker.

use covey_types::Locality;

use crate::{Done, Picker, SmoothRoundRobin};

/// Admits only items from a configured locality into an inner picker.
///
/// Items offered with a non-matching locality are dropped silently, so a
/// caller can feed an entire mixed roster through the filter and end up
/// with a picker over just its own set. The filter's locality may use a
/// wildcard unit to span a whole region.
pub struct SetFilter<T> {
    locality: Locality,
    inner: Box<dyn Picker<T>>,
}

impl<T: Clone + Send + Sync + 'static> SetFilter<T> {
    /// Create a filter that rotates over matching items with a
    /// [`SmoothRoundRobin`].
    pub fn new(locality: Locality) -> Self {
        Self::with_picker(locality, Box::new(SmoothRoundRobin::new()))
    }

    /// Create a filter over a caller-supplied picker.
    pub fn with_picker(locality: Locality, inner: Box<dyn Picker<T>>) -> Self {
        Self { locality, inner }
    }

    /// The locality this filter admits.
    pub fn locality(&self) -> &Locality {
        &self.locality
    }

    /// Offer an item; it joins the population only if `locality` matches.
    pub fn add(&mut self, item: T, weight: f64, locality: &Locality) {
        if self.locality.matches(locality) {
            self.inner.add(item, weight);
        }
    }

    /// Select among the admitted items.
    pub fn pick(&self) -> Option<(T, Done)> {
        self.inner.pick()
    }

    /// Remove every admitted item.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
