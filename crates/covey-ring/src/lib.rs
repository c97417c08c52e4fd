//! Continuous unit ring for deterministic peer subsetting.
//!
//! This crate maps the interval `[0, 1)` onto a fixed number of equal-width
//! slots, one per remote peer, and answers geometric questions about arcs
//! laid over those slots: which slot an offset lands in, how many slots an
//! arc touches, and what fraction of each slot the arc covers.
//!
//! The fractional coverage is what makes subsetting fair. When an arc ends
//! partway through a slot, the peer in that slot is still selectable, just
//! proportionally less often, so the total load seen by a peer stays
//! proportional to how much of the ring points at it regardless of how the
//! arcs happen to align.

mod ring;

pub use ring::Ring;
