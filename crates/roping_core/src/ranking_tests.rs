use super::*;
use crate::types::{Competitor, Role, RunTime};

fn pair(head: &str, heel: &str, runs: u32) -> Pair {
    let head = Competitor::new(head, "", Role::Head, 2.0).unwrap();
    let heel = Competitor::new(heel, "", Role::Heel, 2.0).unwrap();
    Pair::new(&head, &heel, runs).unwrap()
}

fn timed(head: &str, heel: &str, qualifying: &[f64], final_run: Option<f64>) -> Pair {
    let mut p = pair(head, heel, qualifying.len() as u32);
    for (i, t) in qualifying.iter().enumerate() {
        p.set_qualifying_run(i, RunTime::Seconds(*t)).unwrap();
    }
    if let Some(t) = final_run {
        p.set_final_run(RunTime::Seconds(t)).unwrap();
    }
    p
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_worked_example() {
    let p = timed("Ana", "Bruno", &[9.2, 9.8], Some(9.0));

    assert!(approx(qualifying_average(&p).unwrap(), 9.5));
    assert!(approx(final_average(&p).unwrap(), (9.2 + 9.8 + 9.0) / 3.0));
}

#[test]
fn test_qualifying_average_undefined_when_incomplete() {
    let mut p = pair("Ana", "Bruno", 2);
    p.set_qualifying_run(0, RunTime::Seconds(8.0)).unwrap();

    assert!(qualifying_average(&p).is_none());
    assert!(final_average(&p).is_none());
}

#[test]
fn test_averages_undefined_when_disqualified() {
    let mut p = timed("Ana", "Bruno", &[8.0, 9.0], Some(7.0));
    assert!(final_average(&p).is_some());

    p.set_qualifying_run(1, RunTime::NoScore).unwrap();

    assert!(qualifying_average(&p).is_none());
    assert!(final_average(&p).is_none());
}

#[test]
fn test_final_average_needs_final_time() {
    let mut p = timed("Ana", "Bruno", &[8.0], None);
    assert!(final_average(&p).is_none());

    p.set_final_run(RunTime::NoScore).unwrap();
    assert!(final_average(&p).is_none());
    assert!(qualifying_average(&p).is_none());
}

#[test]
fn test_final_call_order_slowest_first() {
    let pairs = vec![
        timed("A", "B", &[8.0], None),
        timed("C", "D", &[11.0, 12.0], None),
        timed("E", "F", &[9.0], None),
        pair("G", "H", 1),
    ];

    let order = final_call_order(&pairs);

    let heads: Vec<&str> = order.iter().map(|s| s.pair.head().full_name.as_str()).collect();
    assert_eq!(heads, vec!["C", "E", "A"]);
    assert_eq!(order[0].place, 1);
    assert!(approx(order[0].average, 11.5));
}

#[test]
fn test_rank_fastest_first_and_stable_on_ties() {
    let pairs = vec![
        timed("A", "B", &[10.0], Some(10.0)),
        timed("C", "D", &[8.0], Some(9.0)),
        timed("E", "F", &[9.0], Some(11.0)),
        timed("G", "H", &[7.0], None),
    ];

    let standings = rank(&pairs);

    let heads: Vec<&str> = standings
        .iter()
        .map(|s| s.pair.head().full_name.as_str())
        .collect();
    // A and E both average 10.0; A was drawn first.
    assert_eq!(heads, vec!["C", "A", "E"]);
    assert_eq!(
        standings.iter().map(|s| s.place).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn test_round_overview() {
    let mut out = pair("A", "B", 3);
    out.set_qualifying_run(0, RunTime::NoScore).unwrap();
    let done = timed("C", "D", &[8.0, 9.0], None);
    let mut pending = pair("E", "F", 1);

    let pairs = vec![out.clone(), done.clone(), pending.clone()];
    assert_eq!(max_qualifying_rounds(&pairs), 3);
    assert!(!qualifying_complete(&pairs));
    assert_eq!(finalists(&pairs).len(), 1);

    pending.set_qualifying_run(0, RunTime::Seconds(10.0)).unwrap();
    let pairs = vec![out, done, pending];
    assert!(qualifying_complete(&pairs));
    assert_eq!(finalists(&pairs).len(), 2);
    assert_eq!(max_qualifying_rounds(&[]), 0);
}
