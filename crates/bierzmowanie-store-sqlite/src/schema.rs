//! SQL schema for the registry's SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS` / `OR IGNORE`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS cities (
    id    INTEGER PRIMARY KEY,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS streets (
    id       INTEGER PRIMARY KEY,
    city_id  INTEGER NOT NULL REFERENCES cities(id),
    name     TEXT NOT NULL
);

-- No dedup: equivalent addresses may exist as separate rows.
CREATE TABLE IF NOT EXISTS addresses (
    id               INTEGER PRIMARY KEY,
    street_id        INTEGER REFERENCES streets(id),
    building_number  TEXT NOT NULL,
    unit_number      TEXT,
    postal_code      TEXT NOT NULL
);

-- Accounts are soft-deleted only.
CREATE TABLE IF NOT EXISTS accounts (
    id             INTEGER PRIMARY KEY,
    username       TEXT NOT NULL UNIQUE,
    password_hash  TEXT NOT NULL,
    given_name     TEXT NOT NULL,
    family_name    TEXT NOT NULL,
    birth_date     TEXT,            -- YYYY-MM-DD
    address_id     INTEGER REFERENCES addresses(id),
    created_at     TEXT NOT NULL,   -- RFC 3339 UTC
    deleted_at     TEXT
);

CREATE TABLE IF NOT EXISTS roles (
    id    INTEGER PRIMARY KEY,
    name  TEXT NOT NULL UNIQUE
);

INSERT OR IGNORE INTO roles (name) VALUES
    ('administrator'), ('duszpasterz'), ('kancelaria'),
    ('animator'), ('rodzic'), ('kandydat');

CREATE TABLE IF NOT EXISTS account_roles (
    account_id  INTEGER NOT NULL REFERENCES accounts(id),
    role_id     INTEGER NOT NULL REFERENCES roles(id),
    PRIMARY KEY (account_id, role_id)
);

-- At most one primary and one secondary entry per channel per account.
CREATE TABLE IF NOT EXISTS emails (
    id          INTEGER PRIMARY KEY,
    account_id  INTEGER NOT NULL REFERENCES accounts(id),
    email       TEXT NOT NULL,
    is_primary  INTEGER NOT NULL DEFAULT 1,
    UNIQUE (account_id, is_primary)
);

CREATE TABLE IF NOT EXISTS phones (
    id          INTEGER PRIMARY KEY,
    account_id  INTEGER NOT NULL REFERENCES accounts(id),
    number      TEXT NOT NULL,
    is_primary  INTEGER NOT NULL DEFAULT 1,
    UNIQUE (account_id, is_primary)
);

CREATE TABLE IF NOT EXISTS schools (
    id    INTEGER PRIMARY KEY,
    name  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS formation_groups (
    id           INTEGER PRIMARY KEY,
    name         TEXT NOT NULL,
    animator_id  INTEGER REFERENCES accounts(id)
);

CREATE TABLE IF NOT EXISTS group_members (
    id            INTEGER PRIMARY KEY,
    group_id      INTEGER NOT NULL REFERENCES formation_groups(id),
    candidate_id  INTEGER NOT NULL UNIQUE REFERENCES accounts(id)
);

CREATE TABLE IF NOT EXISTS parishes (
    id          INTEGER PRIMARY KEY,
    invocation  TEXT NOT NULL,
    address_id  INTEGER REFERENCES addresses(id),
    email       TEXT,
    phone       TEXT
);

CREATE TABLE IF NOT EXISTS parish_members (
    id          INTEGER PRIMARY KEY,
    parish_id   INTEGER NOT NULL REFERENCES parishes(id),
    account_id  INTEGER NOT NULL UNIQUE REFERENCES accounts(id)
);

CREATE TABLE IF NOT EXISTS parents (
    id          INTEGER PRIMARY KEY,
    account_id  INTEGER NOT NULL UNIQUE REFERENCES accounts(id),
    address_id  INTEGER REFERENCES addresses(id)
);

-- Many-to-many is permitted; reads and updates use the lowest parent_id.
CREATE TABLE IF NOT EXISTS parent_candidates (
    parent_id     INTEGER NOT NULL REFERENCES parents(id),
    candidate_id  INTEGER NOT NULL REFERENCES accounts(id),
    PRIMARY KEY (parent_id, candidate_id)
);

CREATE TABLE IF NOT EXISTS witnesses (
    id            INTEGER PRIMARY KEY,
    candidate_id  INTEGER NOT NULL UNIQUE REFERENCES accounts(id),
    given_name    TEXT NOT NULL,
    family_name   TEXT NOT NULL,
    address_id    INTEGER REFERENCES addresses(id)
);

CREATE TABLE IF NOT EXISTS witness_contacts (
    id          INTEGER PRIMARY KEY,
    witness_id  INTEGER NOT NULL REFERENCES witnesses(id),
    email       TEXT,
    phone       TEXT,
    is_primary  INTEGER NOT NULL DEFAULT 1,
    UNIQUE (witness_id, is_primary)
);

CREATE TABLE IF NOT EXISTS school_enrollments (
    id            INTEGER PRIMARY KEY,
    candidate_id  INTEGER NOT NULL UNIQUE REFERENCES accounts(id),
    school_id     INTEGER NOT NULL REFERENCES schools(id),
    grade         TEXT NOT NULL,
    school_year   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS confirmation_names (
    id             INTEGER PRIMARY KEY,
    candidate_id   INTEGER NOT NULL UNIQUE REFERENCES accounts(id),
    name           TEXT NOT NULL,
    justification  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS parent_candidates_candidate_idx ON parent_candidates(candidate_id);
CREATE INDEX IF NOT EXISTS account_roles_account_idx       ON account_roles(account_id);
CREATE INDEX IF NOT EXISTS emails_email_idx                ON emails(email);

PRAGMA user_version = 1;
";
