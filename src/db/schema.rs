//! SQL DDL for the bank table.

/// `id` is assigned by SQLite on insert; AUTOINCREMENT keeps ids of deleted rows from being reused.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS banks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    location TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_banks_name ON banks(name);
"#;
