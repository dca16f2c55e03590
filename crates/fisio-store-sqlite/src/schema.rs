//! SQL schema for the fisio SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// All calendar dates are stored as `YYYY-MM-DD` text in the deployment's
/// local convention; timestamps are RFC 3339 UTC.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Players are never deleted, only deactivated.
CREATE TABLE IF NOT EXISTS players (
    player_id   TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    rut         TEXT NOT NULL,
    birth_date  TEXT NOT NULL,
    division    TEXT NOT NULL,
    photo       TEXT,
    active      INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL
);

-- One clinical episode. active=1 implies fecha_fin IS NULL; the finalize
-- transition is the only UPDATE ever issued against this table.
CREATE TABLE IF NOT EXISTS injuries (
    injury_id      TEXT PRIMARY KEY,
    player_id      TEXT NOT NULL REFERENCES players(player_id),
    diagnosis      TEXT NOT NULL,
    injury_type    TEXT NOT NULL,   -- 'muscular' | 'articular' | ...
    body_region    TEXT NOT NULL,
    severity       TEXT NOT NULL,   -- 'leve' | 'moderada' | 'grave'
    mechanism      TEXT NOT NULL,
    estimated_days INTEGER NOT NULL,
    fecha_lesion   TEXT NOT NULL,
    fecha_fin      TEXT,
    actual_days    INTEGER,
    active         INTEGER NOT NULL DEFAULT 1,
    CHECK ((active = 1 AND fecha_fin IS NULL) OR active = 0)
);

-- Daily entries are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS daily_entries (
    entry_id    TEXT PRIMARY KEY,
    injury_id   TEXT NOT NULL REFERENCES injuries(injury_id),
    fecha       TEXT NOT NULL,
    state       TEXT NOT NULL,      -- 'camilla' | 'gimnasio' | 'reintegro'
    observation TEXT,
    recorded_by TEXT NOT NULL,
    recorded_at TEXT NOT NULL,
    UNIQUE (injury_id, fecha)
);

-- One evaluation per (player, match); append-only.
CREATE TABLE IF NOT EXISTS checklists (
    checklist_id   TEXT PRIMARY KEY,
    player_id      TEXT NOT NULL REFERENCES players(player_id),
    match_id       TEXT NOT NULL,
    match_date     TEXT NOT NULL,
    has_pain       INTEGER NOT NULL,
    pain_intensity INTEGER,
    pain_zone      TEXT,
    mechanism      TEXT,
    phase          TEXT,
    diagnosis      TEXT,
    treatment      TEXT,
    observations   TEXT,
    recorded_by    TEXT NOT NULL,
    recorded_at    TEXT NOT NULL,
    UNIQUE (player_id, match_id)
);

CREATE INDEX IF NOT EXISTS injuries_player_idx ON injuries(player_id);
CREATE INDEX IF NOT EXISTS injuries_start_idx  ON injuries(fecha_lesion);
CREATE INDEX IF NOT EXISTS injuries_end_idx    ON injuries(fecha_fin);
CREATE INDEX IF NOT EXISTS entries_fecha_idx   ON daily_entries(fecha);

PRAGMA user_version = 1;
";
