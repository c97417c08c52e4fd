//! Shared harness for cross-crate integration tests.
//!
//! Real deployments run one [`Aperture`] per client process, each fed the
//! same rosters through service discovery. [`Fleet`] models that: it holds
//! one selector per client so suites can assert properties no single client
//! can see, like whether the subsets tile the remote roster or how load
//! aggregates across the whole client fleet.

use std::collections::BTreeSet;

use covey_aperture::{Aperture, Done};
use covey_types::Strategy;

// ==================== Fleet ====================

/// One aperture per client process, all sharing the same rosters.
///
/// Remote peers are their roster indices so suites can tally picks into a
/// plain vector.
pub struct Fleet {
    clients: Vec<Aperture<usize>>,
    remote_count: usize,
}

impl Fleet {
    /// Builds `n_clients` selectors named `client-0..`, each configured with
    /// the full client roster, `n_remotes` remote peers, and the given
    /// logical aperture.
    pub fn new(strategy: Strategy, n_clients: usize, n_remotes: usize, logical: usize) -> Self {
        let names: Vec<String> = (0..n_clients).map(client_name).collect();
        let clients = (0..n_clients)
            .map(|position| {
                let aperture = Aperture::new(strategy);
                aperture.set_local_peers(names.clone());
                aperture.set_remote_peers((0..n_remotes).collect());
                aperture.set_local_peer_id(client_name(position));
                aperture.set_logical_aperture(logical);
                aperture
            })
            .collect();
        Self {
            clients,
            remote_count: n_remotes,
        }
    }

    pub fn clients(&self) -> &[Aperture<usize>] {
        &self.clients
    }

    pub fn remote_count(&self) -> usize {
        self.remote_count
    }

    /// Replaces the remote roster on every client.
    pub fn set_remotes(&mut self, n_remotes: usize) {
        for client in &self.clients {
            client.set_remote_peers((0..n_remotes).collect());
        }
        self.remote_count = n_remotes;
    }

    /// Resizes the logical aperture on every client.
    pub fn set_logical_aperture(&self, logical: usize) {
        for client in &self.clients {
            client.set_logical_aperture(logical);
        }
    }

    /// Announces a larger client roster to every selector, as if more client
    /// processes joined. The clients this fleet holds keep their IDs, so the
    /// new roster must not be smaller than the fleet itself.
    pub fn announce_clients(&self, n_clients: usize) {
        assert!(n_clients >= self.clients.len());
        let names: Vec<String> = (0..n_clients).map(client_name).collect();
        for client in &self.clients {
            client.set_local_peers(names.clone());
        }
    }

    /// Union of every client's subset indices.
    pub fn covered_remotes(&self) -> BTreeSet<usize> {
        self.clients
            .iter()
            .flat_map(|client| client.aperture_indices())
            .collect()
    }
}

fn client_name(position: usize) -> String {
    format!("client-{position}")
}

// ==================== Load tallies ====================

/// Issues `per_client` picks from every client while holding every pick's
/// completion, then returns how many landed on each remote.
///
/// Holding the completions makes load-aware strategies spread picks in
/// proportion to subset weights instead of collapsing onto one idle peer.
pub fn held_pick_tally(fleet: &Fleet, per_client: usize) -> Vec<usize> {
    let mut tally = vec![0usize; fleet.remote_count()];
    let mut held: Vec<Done> = Vec::with_capacity(per_client * fleet.clients().len());
    for client in fleet.clients() {
        for _ in 0..per_client {
            let (remote, done) = client.pick().expect("configured fleet serves picks");
            tally[remote] += 1;
            held.push(done);
        }
    }
    for done in held {
        done.complete();
    }
    tally
}
