//! Metric catalog - the fixed vocabulary a report specification may use.
//!
//! Every identifier that can influence query shape is enumerated here:
//! metrics expand to aggregate expressions over fact-table columns, and
//! groupings fix the non-aggregate select list together with the GROUP BY
//! and ORDER BY clauses. Nothing outside these tables ever reaches the
//! generated SQL text, which is what keeps user input value-only.

use serde::{Deserialize, Serialize};

// =============================================================================
// Aggregate Expressions
// =============================================================================

/// Aggregate function applied to a fact column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFunc {
    Sum,
    Avg,
    Max,
}

impl AggFunc {
    pub fn sql(self) -> &'static str {
        match self {
            AggFunc::Sum => "SUM",
            AggFunc::Avg => "AVG",
            AggFunc::Max => "MAX",
        }
    }
}

/// One aggregate column produced by a metric.
///
/// `source_column` is a column on the `match_stats` fact table (aliased
/// `ms` in the join graph); `output_alias` is the column name in the
/// result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateExpr {
    pub source_column: &'static str,
    pub function: AggFunc,
    pub output_alias: &'static str,
}

const fn agg(source_column: &'static str, function: AggFunc, output_alias: &'static str) -> AggregateExpr {
    AggregateExpr {
        source_column,
        function,
        output_alias,
    }
}

// =============================================================================
// Metrics
// =============================================================================

/// A named statistic a report may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Goals,
    Assists,
    Rating,
    Minutes,
    Passes,
    PassesCompleted,
    Shots,
    ShotsOnTarget,
    Saves,
    Tackles,
    YellowCards,
    RedCards,
}

use AggFunc::{Avg, Max, Sum};

// Expansion tables, one per metric. Named consts so `expand` can hand out
// `'static` slices.
const GOALS: [AggregateExpr; 2] = [
    agg("goals", Sum, "total_goals"),
    agg("goals", Avg, "avg_goals"),
];
const ASSISTS: [AggregateExpr; 2] = [
    agg("assists", Sum, "total_assists"),
    agg("assists", Avg, "avg_assists"),
];
const RATING: [AggregateExpr; 2] = [
    agg("rating", Avg, "avg_rating"),
    agg("rating", Max, "max_rating"),
];
const MINUTES: [AggregateExpr; 2] = [
    agg("minutes_played", Sum, "total_minutes"),
    agg("minutes_played", Avg, "avg_minutes"),
];
const PASSES: [AggregateExpr; 2] = [
    agg("passes", Sum, "total_passes"),
    agg("passes", Avg, "avg_passes"),
];
const PASSES_COMPLETED: [AggregateExpr; 2] = [
    agg("passes_completed", Sum, "total_passes_completed"),
    agg("passes_completed", Avg, "avg_passes_completed"),
];
const SHOTS: [AggregateExpr; 2] = [
    agg("shots", Sum, "total_shots"),
    agg("shots", Avg, "avg_shots"),
];
const SHOTS_ON_TARGET: [AggregateExpr; 2] = [
    agg("shots_on_target", Sum, "total_shots_on_target"),
    agg("shots_on_target", Avg, "avg_shots_on_target"),
];
const SAVES: [AggregateExpr; 2] = [
    agg("saves", Sum, "total_saves"),
    agg("saves", Avg, "avg_saves"),
];
const TACKLES: [AggregateExpr; 2] = [
    agg("tackles", Sum, "total_tackles"),
    agg("tackles", Avg, "avg_tackles"),
];
const YELLOW_CARDS: [AggregateExpr; 1] = [agg("yellow_cards", Sum, "total_yellow_cards")];
const RED_CARDS: [AggregateExpr; 1] = [agg("red_cards", Sum, "total_red_cards")];

impl Metric {
    /// The aggregate expressions this metric contributes to the select list.
    ///
    /// The expansion table is fixed; callers must not reorder it.
    pub fn expand(self) -> &'static [AggregateExpr] {
        match self {
            Metric::Goals => &GOALS,
            Metric::Assists => &ASSISTS,
            Metric::Rating => &RATING,
            Metric::Minutes => &MINUTES,
            Metric::Passes => &PASSES,
            Metric::PassesCompleted => &PASSES_COMPLETED,
            Metric::Shots => &SHOTS,
            Metric::ShotsOnTarget => &SHOTS_ON_TARGET,
            Metric::Saves => &SAVES,
            Metric::Tackles => &TACKLES,
            Metric::YellowCards => &YELLOW_CARDS,
            Metric::RedCards => &RED_CARDS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Goals => "goals",
            Metric::Assists => "assists",
            Metric::Rating => "rating",
            Metric::Minutes => "minutes",
            Metric::Passes => "passes",
            Metric::PassesCompleted => "passes_completed",
            Metric::Shots => "shots",
            Metric::ShotsOnTarget => "shots_on_target",
            Metric::Saves => "saves",
            Metric::Tackles => "tackles",
            Metric::YellowCards => "yellow_cards",
            Metric::RedCards => "red_cards",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "goals" => Metric::Goals,
            "assists" => Metric::Assists,
            "rating" => Metric::Rating,
            "minutes" => Metric::Minutes,
            "passes" => Metric::Passes,
            "passes_completed" => Metric::PassesCompleted,
            "shots" => Metric::Shots,
            "shots_on_target" => Metric::ShotsOnTarget,
            "saves" => Metric::Saves,
            "tackles" => Metric::Tackles,
            "yellow_cards" => Metric::YellowCards,
            "red_cards" => Metric::RedCards,
            _ => return None,
        })
    }
}

// =============================================================================
// Groupings
// =============================================================================

/// The axis aggregation rows are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    Player,
    Team,
    Position,
    Month,
    Competition,
}

impl Grouping {
    /// Non-aggregate select columns for this grouping.
    ///
    /// Appearance count is `COUNT(ms.id)`, distinct-player count is
    /// `COUNT(DISTINCT ms.player_id)`.
    pub fn select_columns(self) -> &'static str {
        match self {
            Grouping::Player => {
                "p.id AS player_id, p.name AS player_name, p.position AS position, t.name AS team_name"
            }
            Grouping::Team => {
                "t.id AS team_id, t.name AS team_name, COUNT(DISTINCT ms.player_id) AS player_count, COUNT(ms.id) AS appearances"
            }
            Grouping::Position => {
                "p.position AS position, COUNT(DISTINCT ms.player_id) AS player_count, COUNT(ms.id) AS appearances"
            }
            Grouping::Month => "strftime('%Y-%m', m.match_date) AS month",
            Grouping::Competition => {
                "m.competition AS competition, COUNT(ms.id) AS appearances, COUNT(DISTINCT ms.player_id) AS player_count"
            }
        }
    }

    pub fn group_by(self) -> &'static str {
        match self {
            Grouping::Player => "p.id, p.name, p.position, t.name",
            Grouping::Team => "t.id, t.name",
            Grouping::Position => "p.position",
            Grouping::Month => "strftime('%Y-%m', m.match_date)",
            Grouping::Competition => "m.competition",
        }
    }

    /// Month reports read chronologically; everything else is ranked by
    /// appearance count.
    pub fn order_by(self) -> &'static str {
        match self {
            Grouping::Month => "month ASC",
            _ => "COUNT(ms.id) DESC",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grouping::Player => "player",
            Grouping::Team => "team",
            Grouping::Position => "position",
            Grouping::Month => "month",
            Grouping::Competition => "competition",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "player" => Grouping::Player,
            "team" => Grouping::Team,
            "position" => Grouping::Position,
            "month" => Grouping::Month,
            "competition" => Grouping::Competition,
            _ => return None,
        })
    }
}
