//! Read queries. Each function is one independent lookup against a borrowed
//! connection; decoding of dates happens in the caller.

use bierzmowanie_core::{
  account::Credentials,
  address::AddressView,
  candidate::{
    ConfirmationNameView, GroupView, ParentView, ParishView, PersonRef,
    SchoolView, WitnessView,
  },
};
use rusqlite::{Connection, OptionalExtension as _, Row, params};

use crate::encode::{RawAccount, RawProfile};

/// Selected after the entity's own columns; read back with [`address_at`].
const ADDRESS_COLUMNS: &str =
  "ad.id, s.name, c.name, ad.building_number, ad.unit_number, ad.postal_code";

/// Joins `ad` (already joined by the caller) to its street and city.
const ADDRESS_JOINS: &str = "LEFT JOIN streets s ON s.id = ad.street_id
   LEFT JOIN cities  c ON c.id = s.city_id";

/// Read the six [`ADDRESS_COLUMNS`] starting at column `at`.
fn address_at(row: &Row<'_>, at: usize) -> rusqlite::Result<Option<AddressView>> {
  let Some(id) = row.get::<_, Option<i64>>(at)? else {
    return Ok(None);
  };
  Ok(Some(AddressView {
    id,
    street:          row.get(at + 1)?,
    city:            row.get(at + 2)?,
    building_number: row.get(at + 3)?,
    unit_number:     row.get(at + 4)?,
    postal_code:     row.get(at + 5)?,
  }))
}

// ─── Accounts ────────────────────────────────────────────────────────────────

pub fn credentials(
  conn: &Connection,
  identifier: &str,
) -> rusqlite::Result<Option<Credentials>> {
  let map = |row: &Row<'_>| {
    Ok(Credentials {
      account_id:    row.get(0)?,
      username:      row.get(1)?,
      password_hash: row.get(2)?,
    })
  };

  if identifier.contains('@') {
    conn
      .query_row(
        "SELECT a.id, a.username, a.password_hash
         FROM emails e
         JOIN accounts a ON a.id = e.account_id
         WHERE e.email = ?1 COLLATE NOCASE
           AND e.is_primary = 1
           AND a.deleted_at IS NULL
         ORDER BY a.id
         LIMIT 1",
        params![identifier],
        map,
      )
      .optional()
  } else {
    conn
      .query_row(
        "SELECT id, username, password_hash FROM accounts
         WHERE username = ?1 AND deleted_at IS NULL",
        params![identifier],
        map,
      )
      .optional()
  }
}

pub fn account(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawAccount>> {
  let base = conn
    .query_row(
      "SELECT id, username, given_name, family_name, birth_date, created_at
       FROM accounts WHERE id = ?1 AND deleted_at IS NULL",
      params![id],
      |row| {
        Ok(RawAccount {
          id:          row.get(0)?,
          username:    row.get(1)?,
          given_name:  row.get(2)?,
          family_name: row.get(3)?,
          birth_date:  row.get(4)?,
          created_at:  row.get(5)?,
          roles:       Vec::new(),
        })
      },
    )
    .optional()?;

  let Some(mut raw) = base else { return Ok(None) };

  let mut stmt = conn.prepare(
    "SELECT r.name FROM account_roles ar
     JOIN roles r ON r.id = ar.role_id
     WHERE ar.account_id = ?1
     ORDER BY r.id",
  )?;
  raw.roles = stmt
    .query_map(params![id], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;

  Ok(Some(raw))
}

// ─── Candidate aggregate ─────────────────────────────────────────────────────

pub fn profile(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawProfile>> {
  conn
    .query_row(
      &format!(
        "SELECT a.id, a.username, a.given_name, a.family_name, a.birth_date,
                e.email, p.number, {ADDRESS_COLUMNS}
         FROM accounts a
         JOIN account_roles ar ON ar.account_id = a.id
         JOIN roles r          ON r.id = ar.role_id AND r.name = 'kandydat'
         LEFT JOIN emails e    ON e.account_id = a.id AND e.is_primary = 1
         LEFT JOIN phones p    ON p.account_id = a.id AND p.is_primary = 1
         LEFT JOIN addresses ad ON ad.id = a.address_id
         {ADDRESS_JOINS}
         WHERE a.id = ?1 AND a.deleted_at IS NULL"
      ),
      params![id],
      |row| {
        Ok(RawProfile {
          id:          row.get(0)?,
          username:    row.get(1)?,
          given_name:  row.get(2)?,
          family_name: row.get(3)?,
          birth_date:  row.get(4)?,
          email:       row.get(5)?,
          phone:       row.get(6)?,
          address:     address_at(row, 7)?,
        })
      },
    )
    .optional()
}

pub fn group(conn: &Connection, candidate_id: i64) -> rusqlite::Result<Option<GroupView>> {
  conn
    .query_row(
      "SELECT g.id, g.name, an.id, an.given_name, an.family_name
       FROM group_members gm
       JOIN formation_groups g ON g.id = gm.group_id
       LEFT JOIN accounts an   ON an.id = g.animator_id AND an.deleted_at IS NULL
       WHERE gm.candidate_id = ?1",
      params![candidate_id],
      |row| {
        let animator = match row.get::<_, Option<i64>>(2)? {
          Some(id) => Some(PersonRef {
            id,
            given_name:  row.get(3)?,
            family_name: row.get(4)?,
          }),
          None => None,
        };
        Ok(GroupView { id: row.get(0)?, name: row.get(1)?, animator })
      },
    )
    .optional()
}

/// First match wins when several parents are linked.
pub fn parent(conn: &Connection, candidate_id: i64) -> rusqlite::Result<Option<ParentView>> {
  conn
    .query_row(
      &format!(
        "SELECT p.id, a.id, a.username, a.given_name, a.family_name,
                e.email, ph.number, {ADDRESS_COLUMNS}
         FROM parent_candidates pc
         JOIN parents p        ON p.id = pc.parent_id
         JOIN accounts a       ON a.id = p.account_id AND a.deleted_at IS NULL
         LEFT JOIN emails e    ON e.account_id = a.id AND e.is_primary = 1
         LEFT JOIN phones ph   ON ph.account_id = a.id AND ph.is_primary = 1
         LEFT JOIN addresses ad ON ad.id = p.address_id
         {ADDRESS_JOINS}
         WHERE pc.candidate_id = ?1
         ORDER BY pc.parent_id
         LIMIT 1"
      ),
      params![candidate_id],
      |row| {
        Ok(ParentView {
          id:          row.get(0)?,
          account_id:  row.get(1)?,
          username:    row.get(2)?,
          given_name:  row.get(3)?,
          family_name: row.get(4)?,
          email:       row.get(5)?,
          phone:       row.get(6)?,
          address:     address_at(row, 7)?,
        })
      },
    )
    .optional()
}

pub fn witness(conn: &Connection, candidate_id: i64) -> rusqlite::Result<Option<WitnessView>> {
  conn
    .query_row(
      &format!(
        "SELECT w.id, w.given_name, w.family_name, wc.email, wc.phone,
                {ADDRESS_COLUMNS}
         FROM witnesses w
         LEFT JOIN witness_contacts wc ON wc.witness_id = w.id AND wc.is_primary = 1
         LEFT JOIN addresses ad        ON ad.id = w.address_id
         {ADDRESS_JOINS}
         WHERE w.candidate_id = ?1"
      ),
      params![candidate_id],
      |row| {
        Ok(WitnessView {
          id:          row.get(0)?,
          given_name:  row.get(1)?,
          family_name: row.get(2)?,
          email:       row.get(3)?,
          phone:       row.get(4)?,
          address:     address_at(row, 5)?,
        })
      },
    )
    .optional()
}

pub fn confirmation_name(
  conn: &Connection,
  candidate_id: i64,
) -> rusqlite::Result<Option<ConfirmationNameView>> {
  conn
    .query_row(
      "SELECT name, justification FROM confirmation_names WHERE candidate_id = ?1",
      params![candidate_id],
      |row| {
        Ok(ConfirmationNameView { name: row.get(0)?, justification: row.get(1)? })
      },
    )
    .optional()
}

pub fn school(conn: &Connection, candidate_id: i64) -> rusqlite::Result<Option<SchoolView>> {
  conn
    .query_row(
      "SELECT se.school_id, sc.name, se.grade, se.school_year
       FROM school_enrollments se
       JOIN schools sc ON sc.id = se.school_id
       WHERE se.candidate_id = ?1",
      params![candidate_id],
      |row| {
        Ok(SchoolView {
          school_id:   row.get(0)?,
          school_name: row.get(1)?,
          grade:       row.get(2)?,
          school_year: row.get(3)?,
        })
      },
    )
    .optional()
}

pub fn parish(conn: &Connection, account_id: i64) -> rusqlite::Result<Option<ParishView>> {
  conn
    .query_row(
      &format!(
        "SELECT pa.id, pa.invocation, pa.email, pa.phone, {ADDRESS_COLUMNS}
         FROM parish_members pm
         JOIN parishes pa       ON pa.id = pm.parish_id
         LEFT JOIN addresses ad ON ad.id = pa.address_id
         {ADDRESS_JOINS}
         WHERE pm.account_id = ?1"
      ),
      params![account_id],
      |row| {
        Ok(ParishView {
          id:         row.get(0)?,
          invocation: row.get(1)?,
          email:      row.get(2)?,
          phone:      row.get(3)?,
          address:    address_at(row, 4)?,
        })
      },
    )
    .optional()
}
