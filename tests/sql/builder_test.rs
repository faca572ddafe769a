//! Query builder properties: determinism, fixed clause shape, and
//! positionally consistent parameter binding.

use chrono::NaiveDate;
use uuid::Uuid;

use touchline::catalog::{Grouping, Metric};
use touchline::model::{Position, ReportFilters};
use touchline::sql::{build_report_query, SqlValue};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_player_grouping_no_filters_exact_sql() {
    let q = build_report_query(
        &ReportFilters::default(),
        &[Metric::Goals, Metric::Assists],
        Grouping::Player,
    );

    assert_eq!(
        q.sql,
        "SELECT p.id AS player_id, p.name AS player_name, p.position AS position, t.name AS team_name, \
         SUM(ms.goals) AS total_goals, AVG(ms.goals) AS avg_goals, \
         SUM(ms.assists) AS total_assists, AVG(ms.assists) AS avg_assists \
         FROM match_stats ms \
         JOIN players p ON ms.player_id = p.id \
         JOIN matches m ON ms.match_id = m.id \
         JOIN teams t ON p.team_id = t.id \
         GROUP BY p.id, p.name, p.position, t.name \
         ORDER BY COUNT(ms.id) DESC"
    );
    assert!(q.params.is_empty());
}

#[test]
fn test_build_is_deterministic() {
    let filters = ReportFilters {
        date_range: Some((date(2024, 8, 1), date(2024, 12, 31))),
        positions: vec![Position::Forward, Position::Midfielder],
        season: Some("2024-2025".to_string()),
        ..Default::default()
    };
    let metrics = [Metric::Goals, Metric::Rating, Metric::YellowCards];

    let a = build_report_query(&filters, &metrics, Grouping::Team);
    let b = build_report_query(&filters, &metrics, Grouping::Team);
    assert_eq!(a, b);
}

#[test]
fn test_all_filters_parameter_order() {
    let team = Uuid::new_v4();
    let player = Uuid::new_v4();
    let filters = ReportFilters {
        date_range: Some((date(2024, 8, 1), date(2024, 12, 31))),
        team_ids: vec![team],
        player_ids: vec![player],
        positions: vec![Position::Forward],
        competitions: vec!["Premier League".to_string()],
        season: Some("2024-2025".to_string()),
    };

    let q = build_report_query(&filters, &[Metric::Goals], Grouping::Player);

    // One parameter per predicate, in the fixed field order.
    assert_eq!(
        q.params,
        vec![
            SqlValue::Text("2024-08-01".to_string()),
            SqlValue::Text("2024-12-31".to_string()),
            SqlValue::Text(team.to_string()),
            SqlValue::Text(player.to_string()),
            SqlValue::Text("forward".to_string()),
            SqlValue::Text("Premier League".to_string()),
            SqlValue::Text("2024-2025".to_string()),
        ]
    );

    // Placeholder count matches the parameter list.
    assert_eq!(q.sql.matches('?').count(), q.params.len());

    // Predicates appear in the same fixed order as the parameters.
    let positions = [
        q.sql.find("m.match_date >= ?").unwrap(),
        q.sql.find("m.match_date <= ?").unwrap(),
        q.sql.find("p.team_id IN (?)").unwrap(),
        q.sql.find("ms.player_id IN (?)").unwrap(),
        q.sql.find("p.position IN (?)").unwrap(),
        q.sql.find("m.competition IN (?)").unwrap(),
        q.sql.find("m.season = ?").unwrap(),
    ];
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_absent_filters_contribute_nothing() {
    let filters = ReportFilters {
        season: Some("2024-2025".to_string()),
        ..Default::default()
    };

    let q = build_report_query(&filters, &[Metric::Goals], Grouping::Player);
    assert!(q.sql.contains(" WHERE m.season = ? GROUP BY "));
    assert!(!q.sql.contains(" AND "));
    assert_eq!(q.params, vec![SqlValue::Text("2024-2025".to_string())]);

    let empty = build_report_query(&ReportFilters::default(), &[Metric::Goals], Grouping::Player);
    assert!(!empty.sql.contains("WHERE"));
    assert!(empty.params.is_empty());
}

#[test]
fn test_in_lists_get_one_placeholder_per_value() {
    let filters = ReportFilters {
        team_ids: vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()],
        positions: vec![Position::Goalkeeper, Position::Defender],
        ..Default::default()
    };

    let q = build_report_query(&filters, &[Metric::Saves], Grouping::Player);
    assert!(q.sql.contains("p.team_id IN (?, ?, ?)"));
    assert!(q.sql.contains("p.position IN (?, ?)"));
    assert_eq!(q.params.len(), 5);
    assert_eq!(q.params[3], SqlValue::Text("goalkeeper".to_string()));
    assert_eq!(q.params[4], SqlValue::Text("defender".to_string()));
}

#[test]
fn test_repeated_metrics_expand_once() {
    let q = build_report_query(
        &ReportFilters::default(),
        &[Metric::Goals, Metric::Assists, Metric::Goals],
        Grouping::Player,
    );
    assert_eq!(q.sql.matches("SUM(ms.goals) AS total_goals").count(), 1);
    // First-seen order preserved.
    assert!(q.sql.find("total_goals").unwrap() < q.sql.find("total_assists").unwrap());
}

#[test]
fn test_metric_order_follows_input() {
    let q = build_report_query(
        &ReportFilters::default(),
        &[Metric::Assists, Metric::Goals],
        Grouping::Player,
    );
    assert!(q.sql.find("total_assists").unwrap() < q.sql.find("total_goals").unwrap());
}

#[test]
fn test_team_grouping_clauses() {
    let q = build_report_query(&ReportFilters::default(), &[Metric::Goals], Grouping::Team);
    assert!(q.sql.starts_with(
        "SELECT t.id AS team_id, t.name AS team_name, \
         COUNT(DISTINCT ms.player_id) AS player_count, COUNT(ms.id) AS appearances"
    ));
    assert!(q.sql.ends_with("GROUP BY t.id, t.name ORDER BY COUNT(ms.id) DESC"));
}

#[test]
fn test_month_grouping_orders_ascending() {
    let q = build_report_query(&ReportFilters::default(), &[Metric::Goals], Grouping::Month);
    assert!(q.sql.starts_with("SELECT strftime('%Y-%m', m.match_date) AS month"));
    assert!(q
        .sql
        .ends_with("GROUP BY strftime('%Y-%m', m.match_date) ORDER BY month ASC"));
}

#[test]
fn test_position_and_competition_groupings() {
    let q = build_report_query(
        &ReportFilters::default(),
        &[Metric::Tackles],
        Grouping::Position,
    );
    assert!(q.sql.contains("p.position AS position"));
    assert!(q.sql.ends_with("GROUP BY p.position ORDER BY COUNT(ms.id) DESC"));

    let q = build_report_query(
        &ReportFilters::default(),
        &[Metric::Goals],
        Grouping::Competition,
    );
    assert!(q.sql.contains("m.competition AS competition"));
    assert!(q.sql.ends_with("GROUP BY m.competition ORDER BY COUNT(ms.id) DESC"));
}

#[test]
fn test_single_expression_metrics() {
    let q = build_report_query(
        &ReportFilters::default(),
        &[Metric::YellowCards, Metric::RedCards],
        Grouping::Team,
    );
    assert!(q.sql.contains("SUM(ms.yellow_cards) AS total_yellow_cards"));
    assert!(q.sql.contains("SUM(ms.red_cards) AS total_red_cards"));
    assert!(!q.sql.contains("avg_yellow_cards"));
    assert!(!q.sql.contains("avg_red_cards"));
}
