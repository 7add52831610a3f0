use super::*;
use crate::pairing::generate_pairs;
use crate::types::{Competitor, PairId, Role};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn roper(name: &str, role: Role, handicap: f64) -> Competitor {
    Competitor::new(name, "", role, handicap).unwrap()
}

fn find<'a>(pairs: &'a [Pair], head: &Competitor, heel: &Competitor) -> Option<&'a Pair> {
    pairs
        .iter()
        .find(|p| p.head().id == head.id && p.heel().id == heel.id)
}

#[test]
fn test_preserves_runs_for_surviving_keys() {
    let table = HandicapTable::standard();
    let ana = roper("Ana", Role::Head, 1.5);
    let bruno = roper("Bruno", Role::Heel, 2.0);
    let mut roster = vec![ana.clone(), bruno.clone()];

    let mut pairs = generate_pairs(&CompetitorPools::from_roster(&roster), &table, 7.0);
    let original_id = pairs[0].id();
    pairs[0].set_qualifying_run(0, RunTime::Seconds(8.4)).unwrap();

    let caio = roper("Caio", Role::Heel, 1.0);
    roster.push(caio.clone());
    let mut rng = StdRng::seed_from_u64(3);
    let updated = reconcile_pairs(
        pairs,
        &CompetitorPools::from_roster(&roster),
        &table,
        7.0,
        &mut rng,
    );

    assert_eq!(updated.len(), 2);
    let kept = find(&updated, &ana, &bruno).unwrap();
    assert_eq!(kept.id(), original_id);
    assert_eq!(kept.qualifying_runs(), &[RunTime::Seconds(8.4)]);

    let fresh = find(&updated, &ana, &caio).unwrap();
    assert!(fresh.qualifying_runs().iter().all(|r| !r.is_set()));
    assert!(!fresh.is_disqualified());
}

#[test]
fn test_resizes_sheet_at_tail() {
    let table = HandicapTable::standard();
    let mut ana = roper("Ana", Role::Head, 3.0);
    let bruno = roper("Bruno", Role::Heel, 3.0);

    // 6.0 combined -> 3 runs
    let roster = vec![ana.clone(), bruno.clone()];
    let mut pairs = generate_pairs(&CompetitorPools::from_roster(&roster), &table, 7.0);
    assert_eq!(pairs[0].run_quota(), 3);
    pairs[0].set_qualifying_run(0, RunTime::Seconds(8.0)).unwrap();
    pairs[0].set_qualifying_run(1, RunTime::Seconds(9.0)).unwrap();
    pairs[0].set_qualifying_run(2, RunTime::Seconds(10.0)).unwrap();

    // 4.0 combined -> 2 runs: the third run is dropped
    ana.handicap = 1.0;
    let roster = vec![ana.clone(), bruno.clone()];
    let mut rng = StdRng::seed_from_u64(5);
    let pairs = reconcile_pairs(pairs, &CompetitorPools::from_roster(&roster), &table, 7.0, &mut rng);
    assert_eq!(
        pairs[0].qualifying_runs(),
        &[RunTime::Seconds(8.0), RunTime::Seconds(9.0)]
    );
    assert_eq!(pairs[0].combined_handicap(), 4.0);
    assert_eq!(pairs[0].head().handicap, 1.0);

    // 7.0 combined -> 4 runs: two empty slots appended
    ana.handicap = 4.0;
    let roster = vec![ana, bruno];
    let pairs = reconcile_pairs(pairs, &CompetitorPools::from_roster(&roster), &table, 7.0, &mut rng);
    assert_eq!(
        pairs[0].qualifying_runs(),
        &[
            RunTime::Seconds(8.0),
            RunTime::Seconds(9.0),
            RunTime::Unset,
            RunTime::Unset
        ]
    );
}

#[test]
fn test_drops_pairs_no_longer_eligible() {
    let table = HandicapTable::standard();
    let mut ana = roper("Ana", Role::Head, 2.0);
    let bruno = roper("Bruno", Role::Heel, 2.0);
    let caio = roper("Caio", Role::Heel, 2.0);
    let roster = vec![ana.clone(), bruno.clone(), caio.clone()];
    let pairs = generate_pairs(&CompetitorPools::from_roster(&roster), &table, 5.0);
    assert_eq!(pairs.len(), 2);

    // Ana climbs to 3.5: 5.5 with either heeler is over the 5.0 ceiling.
    ana.handicap = 3.5;
    let roster = vec![ana, bruno, caio];
    let mut rng = StdRng::seed_from_u64(9);
    let updated = reconcile_pairs(pairs, &CompetitorPools::from_roster(&roster), &table, 5.0, &mut rng);

    assert!(updated.is_empty());
}

#[test]
fn test_keeps_disqualified_flag() {
    let table = HandicapTable::standard();
    let roster = vec![roper("Ana", Role::Head, 2.0), roper("Bruno", Role::Heel, 2.0)];
    let mut pairs = generate_pairs(&CompetitorPools::from_roster(&roster), &table, 7.0);
    pairs[0].set_qualifying_run(0, RunTime::NoScore).unwrap();
    let id: PairId = pairs[0].id();

    let mut rng = StdRng::seed_from_u64(11);
    let updated = reconcile_pairs(pairs, &CompetitorPools::from_roster(&roster), &table, 7.0, &mut rng);

    assert_eq!(updated[0].id(), id);
    assert!(updated[0].is_disqualified());
    assert_eq!(updated[0].qualifying_runs()[0], RunTime::NoScore);
}
