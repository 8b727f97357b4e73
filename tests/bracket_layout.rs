//! Integration tests for bracket sections, round columns, and the layout engine.

use billiard_tournament_web::logic::build_section;
use billiard_tournament_web::{
    bracket_sections, build_rounds, layout_rounds, GameMatch, LayoutConfig, MatchType,
    RoundColumn, SectionKind, TournamentFormat,
};
use uuid::Uuid;

fn knockout(round_name: &str, round: u32, number: u32) -> GameMatch {
    let mut m = GameMatch::new(Uuid::nil(), MatchType::Knockout);
    m.round_name = Some(round_name.to_string());
    m.round_number = Some(round);
    m.match_number = Some(number);
    m
}

fn feeds(mut m: GameMatch, target: &GameMatch) -> GameMatch {
    m.next_match_id = Some(target.id);
    m
}

/// 4 quarterfinals → 2 semifinals → final.
fn single_elimination() -> (Vec<GameMatch>, [GameMatch; 2], GameMatch) {
    let final_match = knockout("Final", 3, 1);
    let s1 = feeds(knockout("Semifinal", 2, 1), &final_match);
    let s2 = feeds(knockout("Semifinal", 2, 2), &final_match);
    let quarters = vec![
        feeds(knockout("Quarterfinal", 1, 1), &s1),
        feeds(knockout("Quarterfinal", 1, 2), &s1),
        feeds(knockout("Quarterfinal", 1, 3), &s2),
        feeds(knockout("Quarterfinal", 1, 4), &s2),
    ];
    (quarters, [s1, s2], final_match)
}

fn column(round: u32, matches: Vec<GameMatch>) -> RoundColumn {
    RoundColumn {
        name: format!("Round {}", round),
        round,
        matches,
    }
}

#[test]
fn rounds_sorted_by_round_then_match_number() {
    let mut unnamed = knockout("", 3, 1);
    unnamed.round_name = None;
    let matches = vec![
        knockout("Semifinal", 2, 2),
        unnamed,
        knockout("Quarterfinal", 1, 2),
        knockout("Semifinal", 2, 1),
        knockout("Quarterfinal", 1, 1),
    ];

    let rounds = build_rounds(&matches);

    let shape: Vec<(u32, Vec<u32>)> = rounds
        .iter()
        .map(|r| (r.round, r.matches.iter().map(|m| m.match_number.unwrap()).collect()))
        .collect();
    assert_eq!(shape, vec![(1, vec![1, 2]), (2, vec![1, 2]), (3, vec![1])]);
    assert_eq!(rounds[0].name, "Quarterfinal");
    assert_eq!(rounds[2].name, "Round 3");
}

#[test]
fn double_elimination_splits_sections() {
    let format = TournamentFormat::from("Double_Elimination".to_string());
    let mut group = knockout("upper", 1, 1);
    group.match_type = MatchType::Group;
    let matches = vec![
        knockout("upper", 1, 1),
        knockout("upper", 2, 1),
        knockout("lower", 1, 1),
        knockout("Grand_Final", 1, 1),
        knockout("grandfinal", 2, 1),
        knockout("Quarterfinal", 1, 1),
        group,
    ];

    let sections = bracket_sections(&format, &matches);

    let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![SectionKind::Upper, SectionKind::Lower, SectionKind::GrandFinal]
    );
    let counts: Vec<usize> = sections
        .iter()
        .map(|s| s.rounds.iter().map(|r| r.matches.len()).sum())
        .collect();
    assert_eq!(counts, vec![2, 1, 2]);
}

#[test]
fn other_formats_use_one_knockout_section() {
    let matches = vec![knockout("upper", 1, 1), knockout("Final", 2, 1)];

    let sections = bracket_sections(&TournamentFormat::SingleElimination, &matches);

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].kind, SectionKind::Knockout);
    assert_eq!(sections[0].rounds.len(), 2);
}

#[test]
fn empty_section_has_empty_layout() {
    let section = build_section(
        SectionKind::Lower,
        &TournamentFormat::DoubleElimination,
        &[knockout("upper", 1, 1)],
    );

    assert!(section.is_empty());
    let layout = layout_rounds(&section.rounds, &LayoutConfig::default());
    assert!(layout.is_empty());
    assert!(bracket_sections(&TournamentFormat::DoubleElimination, &[]).is_empty());
}

#[test]
fn final_sits_at_midpoint_of_semifinals() {
    let (quarters, semis, final_match) = single_elimination();
    let mut all = quarters.clone();
    all.extend(semis.iter().cloned());
    all.push(final_match.clone());
    let config = LayoutConfig::default();

    let layout = layout_rounds(&build_rounds(&all), &config);

    let ys: Vec<f64> = quarters
        .iter()
        .map(|q| layout.position(q.id).unwrap().y)
        .collect();
    assert_eq!(ys, vec![60.0, 260.0, 460.0, 660.0]);
    let s1 = layout.position(semis[0].id).unwrap();
    let s2 = layout.position(semis[1].id).unwrap();
    assert_eq!((s1.x, s1.y), (340.0, 160.0));
    assert_eq!((s2.x, s2.y), (340.0, 560.0));
    let f = layout.position(final_match.id).unwrap();
    assert_eq!(f.y, (s1.y + s2.y) / 2.0);
    assert_eq!(f.x, 680.0);
    assert_eq!(layout.benchmark_round, Some(0));
    assert_eq!(layout.width, 3.0 * 340.0 + 10.0);
    assert_eq!(layout.height, 660.0 + 150.0);
}

#[test]
fn layout_is_deterministic() {
    let (quarters, semis, final_match) = single_elimination();
    let mut all = quarters;
    all.extend(semis);
    all.push(final_match);
    let rounds = build_rounds(&all);
    let config = LayoutConfig::default();

    assert_eq!(layout_rounds(&rounds, &config), layout_rounds(&rounds, &config));
}

#[test]
fn earlier_rounds_pair_around_their_target() {
    let t1 = knockout("R2", 2, 1);
    let t2 = knockout("R2", 2, 2);
    let t3 = knockout("R2", 2, 3);
    let a = feeds(knockout("R1", 1, 1), &t1);
    let b = feeds(knockout("R1", 1, 2), &t1);
    let rounds = vec![
        column(1, vec![a.clone(), b.clone()]),
        column(2, vec![t1.clone(), t2, t3]),
    ];

    let layout = layout_rounds(&rounds, &LayoutConfig::default());

    assert_eq!(layout.benchmark_round, Some(1));
    assert_eq!(layout.position(t1.id).unwrap().y, 60.0);
    assert_eq!(layout.position(a.id).unwrap().y, -40.0);
    assert_eq!(layout.position(b.id).unwrap().y, 160.0);
    assert_eq!(layout.position(a.id).unwrap().x, 0.0);
}

#[test]
fn single_feeder_aligns_with_target() {
    let t1 = knockout("R2", 2, 1);
    let t2 = knockout("R2", 2, 2);
    let a = feeds(knockout("R1", 1, 1), &t2);
    let rounds = vec![column(1, vec![a.clone()]), column(2, vec![t1, t2.clone()])];

    let layout = layout_rounds(&rounds, &LayoutConfig::default());

    assert_eq!(layout.position(a.id).unwrap().y, layout.position(t2.id).unwrap().y);
}

#[test]
fn unresolved_links_stack_in_their_column() {
    let s1 = knockout("Semifinal", 2, 1);
    let orphan_later = knockout("Semifinal", 2, 2);
    let q1 = feeds(knockout("Quarterfinal", 1, 1), &s1);
    let q2 = feeds(knockout("Quarterfinal", 1, 2), &s1);
    let mut dangling = knockout("Quarterfinal", 1, 3);
    dangling.next_match_id = Some(Uuid::new_v4());
    let rounds = build_rounds(&[q1, q2, dangling.clone(), s1.clone(), orphan_later.clone()]);

    let layout = layout_rounds(&rounds, &LayoutConfig::default());

    // Benchmark column is evenly spaced regardless of links.
    assert_eq!(layout.position(dangling.id).unwrap().y, 460.0);
    assert_eq!(layout.position(s1.id).unwrap().y, 160.0);
    // No feeders: one row below the lowest card already in the column.
    assert_eq!(layout.position(orphan_later.id).unwrap().y, 360.0);
    assert_eq!(layout.positions.len(), 5);
}

#[test]
fn orphan_before_benchmark_stacks_from_header() {
    let lone = knockout("R1", 1, 1);
    let t1 = knockout("R2", 2, 1);
    let t2 = knockout("R2", 2, 2);
    let rounds = vec![column(1, vec![lone.clone()]), column(2, vec![t1, t2])];

    let layout = layout_rounds(&rounds, &LayoutConfig::default());

    assert_eq!(layout.position(lone.id).unwrap().y, 60.0 + 200.0);
}

#[test]
fn layout_respects_config() {
    let (quarters, semis, final_match) = single_elimination();
    let mut all = quarters.clone();
    all.extend(semis);
    all.push(final_match.clone());
    let config = LayoutConfig {
        card_height: 50.0,
        column_width: 200.0,
        header_height: 10.0,
        ..LayoutConfig::default()
    };

    let layout = layout_rounds(&build_rounds(&all), &config);

    assert_eq!(layout.position(quarters[1].id).unwrap().y, 110.0);
    let f = layout.position(final_match.id).unwrap();
    assert_eq!((f.x, f.y), (400.0, 160.0));
}
