//! Shared plain types for the Covey peer-selection workspace.
//!
//! Everything here is passive data: selection strategy names, the
//! aperture configuration block, and the locality descriptor used to
//! gate set membership. The crates that do actual work (`covey-ring`,
//! `covey-picker`, `covey-aperture`) all depend on this one and never
//! on each other's internals.

mod error;
mod locality;

pub use error::LocalityError;
pub use locality::{Locality, WILDCARD_UNIT};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default number of remote peers a process aims to keep in its aperture.
pub const DEFAULT_LOGICAL_APERTURE: usize = 12;

/// Default decay time constant for the peak-EWMA latency estimate, in
/// milliseconds.
pub const DEFAULT_EWMA_TAU_MS: u64 = 10_000;

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// Load-distribution strategy used within an aperture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Power-of-two-choices on outstanding request counts.
    LeastLoaded,
    /// Power-of-two-choices on a peak-sensitive latency average.
    PeakEwma,
    /// Deterministic smooth weighted round-robin.
    SmoothRoundRobin,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for an aperture selector.
///
/// Every field has a serving-ready default, so a config file only needs
/// to name the fields it wants to override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApertureConfig {
    /// Strategy used to spread load across the selected subset.
    pub strategy: Strategy,
    /// Target number of remote peers in the subset. Clamped to the
    /// remote roster size on rebuild; zero falls back to the default.
    pub logical_aperture: usize,
    /// Decay time constant for the peak-EWMA strategy, in milliseconds.
    /// Ignored by the other strategies.
    pub ewma_tau_ms: u64,
}

impl Default for ApertureConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::LeastLoaded,
            logical_aperture: DEFAULT_LOGICAL_APERTURE,
            ewma_tau_ms: DEFAULT_EWMA_TAU_MS,
        }
    }
}
