//! Aperture state and subset rebuilds.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use covey_picker::{Done, LeastLoaded, PeakEwma, Picker, SmoothRoundRobin};
use covey_ring::Ring;
use covey_types::{ApertureConfig, DEFAULT_LOGICAL_APERTURE, Strategy};
use tracing::debug;

/// Roster inputs and the subset computed from them.
struct State<T> {
    /// This process's identifier, as it appears in `local_peers`.
    local_id: String,
    /// Every client participating in the subsetting, in agreed order.
    local_peers: Vec<String>,
    /// Position of each local peer in `local_peers`.
    local_index: HashMap<String, usize>,
    /// Selectable remote peers, in agreed order.
    remote_peers: Vec<T>,
    /// Target subset size; clamped to the remote roster on rebuild.
    logical_aperture: usize,
    /// Remote indices inside this process's arc, from the last rebuild.
    aperture_indices: Vec<usize>,
}

/// Client-side subset selector over a remote-peer roster.
///
/// Feed it the local roster (all cooperating client processes), the remote
/// roster, and this process's own ID; it carves out this process's arc of
/// the remote ring and keeps a picker built over just those peers. Any
/// roster change triggers a rebuild, and a rebuilt picker replaces the old
/// one atomically, so in-flight `pick` calls always see a complete subset.
///
/// All methods take `&self`; the selector is meant to be shared across
/// request threads.
pub struct Aperture<T> {
    config: ApertureConfig,
    state: Mutex<State<T>>,
    picker: RwLock<Box<dyn Picker<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Aperture<T> {
    /// Create a selector with the given strategy and default settings.
    pub fn new(strategy: Strategy) -> Self {
        Self::with_config(ApertureConfig {
            strategy,
            ..ApertureConfig::default()
        })
    }

    /// Create a selector from a full configuration block.
    pub fn with_config(config: ApertureConfig) -> Self {
        let logical_aperture = if config.logical_aperture == 0 {
            DEFAULT_LOGICAL_APERTURE
        } else {
            config.logical_aperture
        };
        let picker = RwLock::new(make_picker(&config));
        Self {
            config,
            state: Mutex::new(State {
                local_id: String::new(),
                local_peers: Vec::new(),
                local_index: HashMap::new(),
                remote_peers: Vec::new(),
                logical_aperture,
                aperture_indices: Vec::new(),
            }),
            picker,
        }
    }

    /// Shorthand for a [`Strategy::LeastLoaded`] selector.
    pub fn least_loaded() -> Self {
        Self::new(Strategy::LeastLoaded)
    }

    /// Shorthand for a [`Strategy::PeakEwma`] selector.
    pub fn peak_ewma() -> Self {
        Self::new(Strategy::PeakEwma)
    }

    /// Shorthand for a [`Strategy::SmoothRoundRobin`] selector.
    pub fn smooth_round_robin() -> Self {
        Self::new(Strategy::SmoothRoundRobin)
    }

    /// Replace the local roster. Every cooperating client must use the
    /// same order, or their arcs will overlap and leave gaps.
    pub fn set_local_peers(&self, peers: Vec<String>) {
        let mut state = self.state.lock().unwrap();
        state.local_index = peers
            .iter()
            .enumerate()
            .map(|(position, id)| (id.clone(), position))
            .collect();
        state.local_peers = peers;
        self.rebuild(&mut state);
    }

    /// Replace the remote roster. Every cooperating client must use the
    /// same order.
    pub fn set_remote_peers(&self, peers: Vec<T>) {
        let mut state = self.state.lock().unwrap();
        state.remote_peers = peers;
        self.rebuild(&mut state);
    }

    /// Set this process's identifier within the local roster.
    pub fn set_local_peer_id(&self, id: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.local_id = id.into();
        self.rebuild(&mut state);
    }

    /// Change the target subset size. Zero is ignored.
    pub fn set_logical_aperture(&self, width: usize) {
        if width == 0 {
            debug!("ignoring zero logical aperture");
            return;
        }
        let mut state = self.state.lock().unwrap();
        state.logical_aperture = width;
        self.rebuild(&mut state);
    }

    /// Select a remote peer from the current subset.
    ///
    /// Returns `None` until the selector has rebuilt at least once, or when
    /// the subset is empty.
    pub fn pick(&self) -> Option<(T, Done)> {
        self.picker.read().unwrap().pick()
    }

    /// Remote-roster indices currently inside this process's arc.
    pub fn aperture_indices(&self) -> Vec<usize> {
        self.state.lock().unwrap().aperture_indices.clone()
    }

    /// The current target subset size.
    pub fn logical_aperture(&self) -> usize {
        self.state.lock().unwrap().logical_aperture
    }

    /// The selection strategy this selector was built with.
    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    /// Recompute the arc and publish a fresh picker over it.
    ///
    /// No-op unless both rosters are non-empty and the local ID appears in
    /// the local roster; the previous picker stays live in the meantime.
    fn rebuild(&self, state: &mut State<T>) {
        if state.local_peers.is_empty() {
            debug!("skipping rebuild: local roster is empty");
            return;
        }
        if state.remote_peers.is_empty() {
            debug!("skipping rebuild: remote roster is empty");
            return;
        }
        let Some(&position) = state.local_index.get(&state.local_id) else {
            debug!(
                local_id = %state.local_id,
                "skipping rebuild: local ID not in the local roster"
            );
            return;
        };

        if state.logical_aperture > state.remote_peers.len() {
            state.logical_aperture = state.remote_peers.len();
        }

        let local_width = 1.0 / state.local_peers.len() as f64;
        let remote_width = 1.0 / state.remote_peers.len() as f64;
        let width = aperture_width(local_width, remote_width, state.logical_aperture);
        let offset = position as f64 * width;

        let ring = Ring::new(state.remote_peers.len());
        state.aperture_indices = ring.slice(offset, width);

        let mut picker = make_picker(&self.config);
        for &index in &state.aperture_indices {
            picker.add(
                state.remote_peers[index].clone(),
                ring.weight(index, offset, width),
            );
        }

        debug!(
            local_id = %state.local_id,
            local_peers = state.local_peers.len(),
            remote_peers = state.remote_peers.len(),
            logical_aperture = state.logical_aperture,
            offset,
            width,
            indices = ?state.aperture_indices,
            "rebuilt aperture"
        );

        *self.picker.write().unwrap() = picker;
    }
}

impl<T> fmt::Debug for Aperture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aperture")
            .field("strategy", &self.config.strategy)
            .finish_non_exhaustive()
    }
}

/// Arc width for one local peer: the logical aperture as a ring fraction,
/// rounded up to a whole number of local shares, capped at the full ring.
///
/// Rounding up to local-share multiples is what lets arcs tile the ring
/// exactly; it also means the effective subset can be somewhat larger than
/// requested when the rosters' sizes do not divide evenly.
fn aperture_width(local_width: f64, remote_width: f64, logical_aperture: usize) -> f64 {
    let unit_aperture = logical_aperture as f64 * remote_width;
    let slots = (unit_aperture / local_width).ceil();
    (slots * local_width).min(1.0)
}

fn make_picker<T: Clone + Send + Sync + 'static>(config: &ApertureConfig) -> Box<dyn Picker<T>> {
    match config.strategy {
        Strategy::LeastLoaded => Box::new(LeastLoaded::new()),
        Strategy::PeakEwma => {
            Box::new(PeakEwma::new().with_tau(Duration::from_millis(config.ewma_tau_ms)))
        }
        Strategy::SmoothRoundRobin => Box::new(SmoothRoundRobin::new()),
    }
}
