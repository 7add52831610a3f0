use super::*;
use crate::handicap::HandicapTable;
use crate::pairing::{generate_pairs, CompetitorPools};
use crate::types::{Competitor, PairId, Role};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn roster(heads: usize, heels: usize, both: usize) -> Vec<Competitor> {
    let mut out = Vec::new();
    for i in 0..heads {
        out.push(Competitor::new(&format!("Head {i}"), "", Role::Head, 1.0).unwrap());
    }
    for i in 0..heels {
        out.push(Competitor::new(&format!("Heel {i}"), "", Role::Heel, 1.0).unwrap());
    }
    for i in 0..both {
        out.push(Competitor::new(&format!("Both {i}"), "", Role::Both, 1.0).unwrap());
    }
    out
}

fn pairs_for(roster: &[Competitor]) -> Vec<Pair> {
    let pools = CompetitorPools::from_roster(roster);
    generate_pairs(&pools, &HandicapTable::standard(), 10.0)
}

fn ids(pairs: &[Pair]) -> HashSet<PairId> {
    pairs.iter().map(|p| p.id()).collect()
}

#[test]
fn test_output_is_permutation() {
    let roster = roster(3, 4, 2);
    for seed in 0..50 {
        let input = pairs_for(&roster);
        let expected = ids(&input);
        let len = input.len();

        let output = sequence_pairs(input, &mut StdRng::seed_from_u64(seed));

        assert_eq!(output.len(), len);
        assert_eq!(ids(&output), expected);
    }
}

#[test]
fn test_conflicts_only_when_unavoidable() {
    let roster = roster(4, 3, 2);
    for seed in 0..50 {
        let output = sequence_pairs(pairs_for(&roster), &mut StdRng::seed_from_u64(seed));

        // At step i the remaining pool was output[i..].
        for i in 1..output.len() {
            let prev = &output[i - 1];
            if output[i].shares_competitor(prev) {
                assert!(
                    output[i..].iter().all(|p| p.shares_competitor(prev)),
                    "seed {seed}: conflict at {i} although a clean pair remained"
                );
            }
            if output[i].head().id == prev.head().id {
                assert!(
                    output[i..].iter().all(|p| p.head().id == prev.head().id),
                    "seed {seed}: repeated header at {i} although another header remained"
                );
            }
        }
    }
}

#[test]
fn test_disjoint_pool_has_no_back_to_back() {
    // 3 headers x 3 heelers: every pair has four clean successors, so the
    // first four steps always find one.
    let roster = roster(3, 3, 0);
    let output = sequence_pairs(pairs_for(&roster), &mut StdRng::seed_from_u64(7));

    assert_eq!(output.len(), 9);
    assert_eq!(back_to_back_count(&output[..5]), 0);
}

#[test]
fn test_single_header_terminates() {
    let roster = roster(1, 5, 0);
    let output = sequence_pairs(pairs_for(&roster), &mut StdRng::seed_from_u64(1));

    assert_eq!(output.len(), 5);
    assert_eq!(back_to_back_count(&output), 4);
}

#[test]
fn test_empty_and_single() {
    let mut rng = StdRng::seed_from_u64(5);
    assert!(sequence_pairs(Vec::new(), &mut rng).is_empty());

    let roster = roster(1, 1, 0);
    let output = sequence_pairs(pairs_for(&roster), &mut rng);
    assert_eq!(output.len(), 1);
}
