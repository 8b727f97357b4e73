//! Integration tests for the tournament store, match updates, model parsing and config.

use billiard_tournament_web::config::ServerConfig;
use billiard_tournament_web::live::MatchHub;
use billiard_tournament_web::store::TournamentStore;
use billiard_tournament_web::{
    all_group_standings, bracket_sections, GameMatch, MatchStatus, MatchType, MatchUpdate,
    SectionKind, TournamentError, TournamentFormat, TournamentStatus,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

const SEED: &str = include_str!("../data/tournament.json");

fn seed_store() -> TournamentStore {
    TournamentStore::from_json(SEED, MatchHub::default()).unwrap()
}

#[test]
fn seed_file_loads() {
    let store = seed_store();

    assert_eq!(store.len(), 2);
    let all = store.all().unwrap();
    // Dated tournaments come first.
    assert_eq!(all[0].tournament.name, "Solidarity Cup 2025");
    assert_eq!(all[0].tournament.format, TournamentFormat::GroupKnockout);
    assert_eq!(all[1].tournament.format, TournamentFormat::DoubleElimination);

    let summaries = store.summaries().unwrap();
    assert_eq!(summaries[0].current_teams, all[0].teams.len());
}

#[test]
fn seed_tournaments_derive_tables_and_brackets() {
    let store = seed_store();
    let all = store.all().unwrap();
    let cup = &all[0];
    let friday = &all[1];

    let groups = all_group_standings(&cup.matches, &cup.teams);
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["group-1", "group-2"]);
    assert!(groups.iter().all(|g| g.standings.len() == 4));

    let cup_sections = bracket_sections(&cup.tournament.format, &cup.matches);
    assert_eq!(cup_sections.len(), 1);
    assert_eq!(cup_sections[0].kind, SectionKind::Knockout);

    let kinds: Vec<SectionKind> = bracket_sections(&friday.tournament.format, &friday.matches)
        .iter()
        .map(|s| s.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![SectionKind::Upper, SectionKind::Lower, SectionKind::GrandFinal]
    );
}

#[test]
fn invalid_seed_is_reported() {
    let err = TournamentStore::from_json("{\"tournaments\": 3}", MatchHub::default())
        .err()
        .unwrap();
    assert!(matches!(err, TournamentError::Seed(_)));
}

#[test]
fn unknown_ids_are_not_found() {
    let store = seed_store();
    let missing = Uuid::new_v4();
    assert_eq!(
        store.get(missing).unwrap_err(),
        TournamentError::TournamentNotFound(missing)
    );

    let tid = store.all().unwrap()[0].tournament.id;
    let err = store
        .update_match(tid, missing, &MatchUpdate::default())
        .unwrap_err();
    assert_eq!(err, TournamentError::MatchNotFound(missing));
}

fn first_pending(store: &TournamentStore) -> GameMatch {
    store.all().unwrap()[0]
        .matches
        .iter()
        .find(|m| m.status == MatchStatus::Pending && m.match_type == MatchType::Group)
        .cloned()
        .unwrap()
}

#[test]
fn completing_a_match_derives_the_winner() {
    let store = seed_store();
    let m = first_pending(&store);

    let updated = store
        .update_match(
            m.tournament_id,
            m.id,
            &MatchUpdate {
                status: Some(MatchStatus::Completed),
                team1_score: Some(2),
                team2_score: Some(5),
                team1_balls: Some(30),
                team2_balls: Some(41),
                ..MatchUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(updated.winner_id, m.team2_id);
    assert!(updated.updated_at.is_some());
    let stored = store.matches(m.tournament_id).unwrap();
    assert_eq!(stored.iter().find(|x| x.id == m.id), Some(&updated));
}

#[test]
fn incomplete_results_are_rejected_and_not_stored() {
    let store = seed_store();
    let m = first_pending(&store);

    let err = store
        .update_match(
            m.tournament_id,
            m.id,
            &MatchUpdate {
                status: Some(MatchStatus::Completed),
                team1_score: Some(3),
                ..MatchUpdate::default()
            },
        )
        .unwrap_err();

    assert_eq!(err, TournamentError::IncompleteResult(m.id));
    let stored = store.matches(m.tournament_id).unwrap();
    assert_eq!(stored.iter().find(|x| x.id == m.id), Some(&m));
}

#[test]
fn winner_must_play_in_the_match() {
    let store = seed_store();
    let m = first_pending(&store);

    let err = store
        .update_match(
            m.tournament_id,
            m.id,
            &MatchUpdate {
                winner_id: Some(Uuid::new_v4()),
                ..MatchUpdate::default()
            },
        )
        .unwrap_err();

    assert_eq!(err, TournamentError::InvalidWinner(m.id));
}

#[test]
fn drawn_result_has_no_winner() {
    let mut m = GameMatch::new(Uuid::new_v4(), MatchType::Group);
    m.team1_id = Some(Uuid::new_v4());
    m.team2_id = Some(Uuid::new_v4());
    m.winner_id = m.team1_id;

    m.apply_update(&MatchUpdate {
        status: Some(MatchStatus::Completed),
        team1_score: Some(4),
        team2_score: Some(4),
        ..MatchUpdate::default()
    })
    .unwrap();

    assert_eq!(m.winner_id, None);
    assert!(m.validate().is_ok());
}

#[test]
fn formats_parse_case_insensitively() {
    let parsed: Vec<TournamentFormat> =
        serde_json::from_str(r#"["Double_Elimination", "single_elimination", "round_robin"]"#)
            .unwrap();
    assert_eq!(
        parsed,
        vec![
            TournamentFormat::DoubleElimination,
            TournamentFormat::SingleElimination,
            TournamentFormat::Other("round_robin".to_string()),
        ]
    );
    assert_eq!(
        serde_json::to_string(&TournamentFormat::GroupKnockout).unwrap(),
        "\"group_knockout\""
    );
    let status: TournamentStatus = serde_json::from_str("\"group_stage\"").unwrap();
    assert_eq!(status.label(), "Group Stage");
}

#[test]
fn config_defaults_and_overrides() {
    assert_eq!(ServerConfig::from_lookup(|_| None), ServerConfig::default());

    let env: HashMap<&str, &str> = [
        ("HOST", "127.0.0.1"),
        ("PORT", "9000"),
        ("DATA_FILE", "/srv/cup.json"),
        ("POLL_INTERVAL_SECS", "12"),
    ]
    .into_iter()
    .collect();
    let config = ServerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 9000);
    assert_eq!(config.data_file, PathBuf::from("/srv/cup.json"));
    assert_eq!(config.poll_interval, Duration::from_secs(12));

    let bad = ServerConfig::from_lookup(|k| match k {
        "PORT" => Some("eighty".to_string()),
        "POLL_INTERVAL_SECS" => Some("0".to_string()),
        _ => None,
    });
    assert_eq!(bad.port, 8080);
    assert_eq!(bad.poll_interval, Duration::from_secs(5));
}
