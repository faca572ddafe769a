//! Shared stats fixture for integration tests.
//!
//! Three players across two teams and three matches, with hand-checkable
//! aggregates:
//!
//! | player | position   | team   | apps | goals      | assists   |
//! |--------|------------|--------|------|------------|-----------|
//! | Ana    | forward    | United | 3    | 2,1,3 (=6) | 1,1,1 (=3)|
//! | Bea    | midfielder | United | 2    | 1,0   (=1) | 0,2   (=2)|
//! | Cora   | defender   | Rovers | 1    | 0     (=0) | 0     (=0)|
//!
//! Matches: two Premier League games in August 2024 and one FA Cup game
//! in September 2024, all in season 2024-2025.

use rusqlite::Connection;

pub const TEAM_UNITED: &str = "11111111-1111-1111-1111-111111111111";
pub const TEAM_ROVERS: &str = "22222222-2222-2222-2222-222222222222";

pub const PLAYER_ANA: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";
pub const PLAYER_BEA: &str = "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb";
pub const PLAYER_CORA: &str = "cccccccc-cccc-cccc-cccc-cccccccccccc";

pub const MATCH_AUG_10: &str = "e1e1e1e1-e1e1-e1e1-e1e1-e1e1e1e1e1e1";
pub const MATCH_AUG_17: &str = "e2e2e2e2-e2e2-e2e2-e2e2-e2e2e2e2e2e2";
pub const MATCH_SEP_07: &str = "e3e3e3e3-e3e3-e3e3-e3e3-e3e3e3e3e3e3";

const SCHEMA: &str = "
CREATE TABLE teams (
    id   TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE players (
    id       TEXT PRIMARY KEY,
    name     TEXT NOT NULL,
    position TEXT NOT NULL,
    team_id  TEXT NOT NULL REFERENCES teams (id)
);

CREATE TABLE matches (
    id          TEXT PRIMARY KEY,
    match_date  TEXT NOT NULL,
    competition TEXT NOT NULL,
    season      TEXT NOT NULL
);

CREATE TABLE match_stats (
    id               INTEGER PRIMARY KEY,
    player_id        TEXT NOT NULL REFERENCES players (id),
    match_id         TEXT NOT NULL REFERENCES matches (id),
    goals            INTEGER NOT NULL DEFAULT 0,
    assists          INTEGER NOT NULL DEFAULT 0,
    rating           REAL    NOT NULL DEFAULT 0,
    minutes_played   INTEGER NOT NULL DEFAULT 0,
    passes           INTEGER NOT NULL DEFAULT 0,
    passes_completed INTEGER NOT NULL DEFAULT 0,
    shots            INTEGER NOT NULL DEFAULT 0,
    shots_on_target  INTEGER NOT NULL DEFAULT 0,
    saves            INTEGER NOT NULL DEFAULT 0,
    tackles          INTEGER NOT NULL DEFAULT 0,
    yellow_cards     INTEGER NOT NULL DEFAULT 0,
    red_cards        INTEGER NOT NULL DEFAULT 0
);
";

/// Open an in-memory stats database with the seeded fixture.
pub fn open_stats_fixture() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    seed(&conn);
    conn
}

/// Open an in-memory stats database with the schema but no rows.
pub fn open_empty_stats() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn
}

fn seed(conn: &Connection) {
    conn.execute_batch(&format!(
        "
        INSERT INTO teams (id, name) VALUES
            ('{TEAM_UNITED}', 'United'),
            ('{TEAM_ROVERS}', 'Rovers');

        INSERT INTO players (id, name, position, team_id) VALUES
            ('{PLAYER_ANA}', 'Ana', 'forward', '{TEAM_UNITED}'),
            ('{PLAYER_BEA}', 'Bea', 'midfielder', '{TEAM_UNITED}'),
            ('{PLAYER_CORA}', 'Cora', 'defender', '{TEAM_ROVERS}');

        INSERT INTO matches (id, match_date, competition, season) VALUES
            ('{MATCH_AUG_10}', '2024-08-10', 'Premier League', '2024-2025'),
            ('{MATCH_AUG_17}', '2024-08-17', 'Premier League', '2024-2025'),
            ('{MATCH_SEP_07}', '2024-09-07', 'FA Cup', '2024-2025');

        INSERT INTO match_stats
            (player_id, match_id, goals, assists, rating, minutes_played,
             shots, shots_on_target, tackles)
        VALUES
            ('{PLAYER_ANA}', '{MATCH_AUG_10}', 2, 1, 7.5, 90, 4, 2, 0),
            ('{PLAYER_ANA}', '{MATCH_AUG_17}', 1, 1, 8.0, 90, 3, 1, 1),
            ('{PLAYER_ANA}', '{MATCH_SEP_07}', 3, 1, 9.0, 90, 6, 4, 0),
            ('{PLAYER_BEA}', '{MATCH_AUG_10}', 1, 0, 7.0, 90, 2, 1, 3),
            ('{PLAYER_BEA}', '{MATCH_AUG_17}', 0, 2, 6.5, 45, 1, 0, 2),
            ('{PLAYER_CORA}', '{MATCH_AUG_10}', 0, 0, 6.0, 90, 0, 0, 5);
        "
    ))
    .unwrap();
}
