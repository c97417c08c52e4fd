//! Unit ring implementation.

/// A unit ring divided into equal-width slots.
///
/// The ring is the interval `[0, 1)`. A ring of size `n` assigns slot `i`
/// the sub-interval `[i/n, (i+1)/n)`. Arcs over the ring are described by
/// an `offset` in `[0, 1)` and a `width` in `(0, 1]`, and wrap past 1.0
/// back onto the start.
#[derive(Debug, Clone, Copy)]
pub struct Ring {
    /// Number of slots.
    size: usize,
    /// Width of a single slot, `1.0 / size`.
    unit_width: f64,
}

impl Ring {
    /// Create a ring with `size` slots. `size` must be at least 1.
    pub fn new(size: usize) -> Self {
        debug_assert!(size > 0, "ring size must be positive");
        Self {
            size,
            unit_width: 1.0 / size as f64,
        }
    }

    /// Return the number of slots.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Return the slot that `offset` falls in. Offsets at or past 1.0 wrap.
    pub fn index(&self, offset: f64) -> usize {
        ((offset * self.size as f64).floor() as usize) % self.size
    }

    /// Return the fraction of slot `index` covered by the arc
    /// `[offset, offset + width)`, in `[0, 1]`.
    pub fn weight(&self, index: usize, offset: f64, width: f64) -> f64 {
        let mut begin = index as f64 * self.unit_width;
        // Arcs wrap: when the arc extends past 1.0 and reaches this slot's
        // image on the second turn, measure the wrapped image instead.
        if begin + 1.0 < offset + width {
            begin += 1.0;
        }
        let end = begin + self.unit_width;
        intersect(begin, end, offset, offset + width) / self.unit_width
    }

    /// Return how many slots the arc `[offset, offset + width)` touches
    /// with nonzero coverage.
    pub fn range(&self, offset: f64, width: f64) -> usize {
        if width >= 1.0 {
            return self.size;
        }

        let begin = self.index(offset);
        let end = self.index((offset + width) % 1.0);
        if begin == end {
            // Either the arc sits inside a single slot, or it wraps almost
            // the whole way around and touches every slot.
            return if width > self.unit_width { self.size } else { 1 };
        }

        // An arc that ends exactly on a slot edge does not touch the slot
        // past the edge, so boundary slots with zero coverage are dropped.
        let mut adjusted_begin = begin as i64;
        if self.weight(begin, offset, width) <= 0.0 {
            adjusted_begin += 1;
        }
        let mut adjusted_end = end as i64;
        if self.weight(end, offset, width) > 0.0 {
            adjusted_end += 1;
        }

        let diff = adjusted_end - adjusted_begin;
        if diff <= 0 {
            (diff + self.size as i64) as usize
        } else {
            diff as usize
        }
    }

    /// Return the slots touched by the arc `[offset, offset + width)`, in
    /// ring order starting from the slot containing `offset`.
    pub fn slice(&self, offset: f64, width: f64) -> Vec<usize> {
        let begin = self.index(offset);
        (0..self.range(offset, width))
            .map(|i| (begin + i) % self.size)
            .collect()
    }
}

/// Length of the overlap between `[b0, e0)` and `[b1, e1)`, zero if disjoint.
fn intersect(b0: f64, e0: f64, b1: f64, e1: f64) -> f64 {
    (e0.min(e1) - b0.max(b1)).max(0.0)
}
