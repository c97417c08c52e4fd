//! Fleet-wide properties of the subset geometry.
//!
//! Each client serves an arc of the same ring, so the interesting claims
//! are about the fleet as a whole: together the arcs cover every remote,
//! and the aggregate load they send is flat across the remote roster even
//! though every individual client is heavily skewed toward its own arc.

use std::collections::BTreeSet;

use covey_tests::{Fleet, held_pick_tally};
use covey_types::Strategy;

#[test]
fn subsets_tile_the_remote_roster() {
    // 4 clients, logical aperture 3 over 16 remotes: each arc rounds up to
    // a quarter of the ring, so the subsets are disjoint and exhaustive.
    let fleet = Fleet::new(Strategy::SmoothRoundRobin, 4, 16, 3);

    let mut seen = BTreeSet::new();
    for client in fleet.clients() {
        let indices = client.aperture_indices();
        assert_eq!(indices.len(), 4);
        for index in indices {
            assert!(seen.insert(index), "remote {index} appears in two subsets");
        }
    }
    assert_eq!(seen.len(), fleet.remote_count());
}

#[test]
fn aggregate_load_is_flat_across_remotes() {
    // 3 clients with a logical aperture of 2 over 5 remotes. Arcs span 2/3
    // of the ring each and cover it exactly twice over, so every remote is
    // owed the same share of the fleet's traffic: 6000 picks / 5 remotes.
    let fleet = Fleet::new(Strategy::LeastLoaded, 3, 5, 2);
    let tally = held_pick_tally(&fleet, 2000);

    assert_eq!(tally.iter().sum::<usize>(), 6000);
    for (remote, &count) in tally.iter().enumerate() {
        assert!(
            (1100..=1300).contains(&count),
            "remote {remote} saw {count} picks, expected about 1200"
        );
    }
}

#[test]
fn picks_stay_inside_each_clients_arc() {
    let fleet = Fleet::new(Strategy::PeakEwma, 4, 16, 3);
    for client in fleet.clients() {
        let subset: BTreeSet<usize> = client.aperture_indices().into_iter().collect();
        for _ in 0..200 {
            let (remote, done) = client.pick().expect("configured fleet serves picks");
            assert!(subset.contains(&remote), "remote {remote} outside the arc");
            done.complete();
        }
    }
}
