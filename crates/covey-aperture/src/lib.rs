//! Deterministic peer subsetting with load-aware selection.
//!
//! In a service mesh every client talking to every backend wastes
//! connections and defeats per-client load statistics. This crate gives
//! each client process a small, stable subset of the remote roster (its
//! aperture) and balances requests within that subset.
//!
//! The subset is computed geometrically. Remote peers are laid out on a
//! unit ring, one equal slot each; every local peer claims an arc of the
//! ring sized to cover its share of `logical_aperture` remote peers and
//! positioned by its index in the local roster. Two clients with the same
//! rosters and the same position always claim the same arc, so the mapping
//! needs no coordination, and arcs of adjacent clients tile the ring so
//! every remote peer is covered. Peers only partially covered by an arc
//! join the subset with fractionally reduced weight, which keeps total
//! load per remote peer even regardless of alignment.
//!
//! [`Aperture`] owns the rosters, rebuilds the subset when they change,
//! and delegates per-request selection to a [`covey_picker`] strategy.

mod aperture;


pub use aperture::Aperture;
pub use covey_picker::{Done, Picker};
pub use covey_types::{ApertureConfig, Strategy};
