//! Subset agreement under roster churn.
//!
//! Service discovery feeds roster updates to every client independently.
//! After any mix of remote churn and aperture resizing, every client must
//! hold a valid arc and the fleet together must still cover every remote.

use std::collections::BTreeSet;

use covey_tests::Fleet;
use covey_types::Strategy;

#[test]
fn fleet_tracks_remote_churn() {
    let mut fleet = Fleet::new(Strategy::LeastLoaded, 4, 8, 2);
    for n_remotes in [12, 5, 32, 8] {
        fleet.set_remotes(n_remotes);
        assert_eq!(fleet.covered_remotes().len(), n_remotes);
        for client in fleet.clients() {
            let (remote, done) = client.pick().expect("pick after remote churn");
            assert!(remote < n_remotes);
            done.complete();
        }
    }
}

#[test]
fn aperture_resizing_tracks_demand() {
    // Powers of two keep the arcs aligned on slot boundaries, so subset
    // sizes come out exact.
    let fleet = Fleet::new(Strategy::LeastLoaded, 4, 16, 1);
    for client in fleet.clients() {
        assert_eq!(client.aperture_indices().len(), 4);
    }

    fleet.set_logical_aperture(8);
    for client in fleet.clients() {
        assert_eq!(client.aperture_indices().len(), 8);
    }
    assert_eq!(fleet.covered_remotes().len(), 16);

    // Asking for more than the roster holds clamps to the whole ring.
    fleet.set_logical_aperture(20);
    for client in fleet.clients() {
        assert_eq!(client.aperture_indices().len(), 16);
        assert_eq!(client.logical_aperture(), 16);
    }

    fleet.set_logical_aperture(1);
    for client in fleet.clients() {
        assert_eq!(client.aperture_indices().len(), 4);
    }
}

#[test]
fn client_roster_growth_shrinks_arcs() {
    let fleet = Fleet::new(Strategy::LeastLoaded, 2, 8, 2);
    for client in fleet.clients() {
        assert_eq!(client.aperture_indices().len(), 4);
    }

    // Six more clients join; the two we hold now own a quarter of the ring
    // between them.
    fleet.announce_clients(8);
    for client in fleet.clients() {
        assert_eq!(client.aperture_indices().len(), 2);
    }
    let expected: BTreeSet<usize> = (0..4).collect();
    assert_eq!(fleet.covered_remotes(), expected);
}
