use super::*;
use crate::types::RunTime;

const BACKUP: &str = r#"{
  "settings": {
    "name": "Jackpot de Verão",
    "date": "2026-01-17",
    "timeLimit": 15.0,
    "maxHandicap": 7.0
  },
  "competitors": [
    {
      "id": "6f1c2b0e-0000-4000-8000-000000000001",
      "fullName": "Ana Souza",
      "nickname": "Ana",
      "role": "head",
      "handicap": 2.0
    },
    {
      "id": "6f1c2b0e-0000-4000-8000-000000000002",
      "fullName": "Bruno Lima",
      "nickname": "",
      "role": "both",
      "handicap": 2.0
    }
  ],
  "pairs": [
    {
      "id": "9a9a9a9a-0000-4000-8000-0000000000aa",
      "head": {
        "id": "6f1c2b0e-0000-4000-8000-000000000001",
        "fullName": "Ana Souza",
        "nickname": "Ana",
        "role": "head",
        "handicap": 2.0
      },
      "heel": {
        "id": "6f1c2b0e-0000-4000-8000-000000000002",
        "fullName": "Bruno Lima",
        "nickname": "",
        "role": "both",
        "handicap": 2.0
      },
      "combinedHandicap": 4.0,
      "qualifyingRuns": [9.2, "SAT"],
      "finalRun": null,
      "disqualified": true
    }
  ],
  "lockedRounds": [0],
  "finalLocked": false
}"#;

#[test]
fn test_reads_backup_without_rules() {
    let snapshot = Snapshot::from_json(BACKUP).unwrap();

    assert_eq!(snapshot.handicap_rules, HandicapTable::standard().rules());
    assert_eq!(snapshot.competitors.len(), 2);
    assert_eq!(
        snapshot.pairs[0].qualifying_runs(),
        &[RunTime::Seconds(9.2), RunTime::NoScore]
    );
    assert_eq!(snapshot.pairs[0].final_run(), RunTime::Unset);
    assert!(snapshot.pairs[0].is_disqualified());
    assert_eq!(snapshot.locked_rounds, vec![0]);
    assert!(snapshot.exported_at.is_none());
    assert!(snapshot.validate().is_ok());
}

#[test]
fn test_json_round_trip_is_exact() {
    let snapshot = Snapshot::from_json(BACKUP).unwrap();

    let json = snapshot.to_json().unwrap();
    let back = Snapshot::from_json(&json).unwrap();

    assert_eq!(back, snapshot);
    assert!(json.contains(r#""SAT""#));
}

#[test]
fn test_rejects_inconsistent_handicap() {
    let tampered = BACKUP.replace(r#""combinedHandicap": 4.0"#, r#""combinedHandicap": 5.0"#);
    let snapshot = Snapshot::from_json(&tampered).unwrap();

    assert!(matches!(
        snapshot.validate(),
        Err(SnapshotError::HandicapMismatch { stored, actual, .. }) if stored == 5.0 && actual == 4.0
    ));
}

#[test]
fn test_rejects_duplicate_rules() {
    let mut snapshot = Snapshot::from_json(BACKUP).unwrap();
    snapshot.handicap_rules.push(HandicapRule {
        max_handicap: 3.5,
        runs: 2,
    });

    assert!(matches!(
        snapshot.validate(),
        Err(SnapshotError::Validation(ValidationError::DuplicateThreshold(_)))
    ));
}

#[test]
fn test_rejects_negative_run_time() {
    let tampered = BACKUP.replace(r#"[9.2, "SAT"]"#, r#"[-9.2, "SAT"]"#);
    let snapshot = Snapshot::from_json(&tampered).unwrap();

    assert!(matches!(
        snapshot.validate(),
        Err(SnapshotError::Validation(ValidationError::InvalidTime(t))) if t == -9.2
    ));
}

#[test]
fn test_rejects_negative_final_time() {
    let tampered = BACKUP.replace(r#""finalRun": null"#, r#""finalRun": -1.0"#);
    let snapshot = Snapshot::from_json(&tampered).unwrap();

    assert!(snapshot.validate().is_err());
}

#[test]
fn test_rejects_garbage() {
    assert!(matches!(
        Snapshot::from_json("{\"settings\": 3}"),
        Err(SnapshotError::Json(_))
    ));
    let bad_marker = BACKUP.replace(r#""SAT""#, r#""NT""#);
    assert!(Snapshot::from_json(&bad_marker).is_err());
}
