//! The relationship upsert engine.
//!
//! Every public function here runs inside a transaction opened by
//! [`crate::SqliteStore`] with `BEGIN IMMEDIATE`, so the write lock is held
//! from the existence check to the insert. An `Err` from any of them rolls
//! the whole transaction back.

use bierzmowanie_core::{
  Error as CoreError, Role,
  account::NewAccount,
  address::AddressInput,
  input::{
    ConfirmationNameInput, NewGroup, NewParish, ParentInput, Saved,
    SavedParent, SchoolEnrollmentInput, WitnessInput, contact_change, present, require,
  },
  username::{parent_username_base, with_suffix},
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _, ToSql, params};

use crate::{
  Result,
  encode::{encode_date, encode_dt},
};

// ─── Existence checks ────────────────────────────────────────────────────────

fn exists(conn: &Connection, sql: &str, param: impl ToSql) -> rusqlite::Result<bool> {
  Ok(conn.query_row(sql, [param], |_| Ok(())).optional()?.is_some())
}

fn require_account(conn: &Connection, id: i64) -> Result<()> {
  if exists(conn, "SELECT 1 FROM accounts WHERE id = ?1 AND deleted_at IS NULL", id)? {
    Ok(())
  } else {
    Err(CoreError::AccountNotFound(id).into())
  }
}

fn has_role(conn: &Connection, id: i64, role: Role) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM accounts a
         JOIN account_roles ar ON ar.account_id = a.id
         JOIN roles r          ON r.id = ar.role_id
         WHERE a.id = ?1 AND a.deleted_at IS NULL AND r.name = ?2",
        params![id, role.as_ref()],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

fn require_candidate(conn: &Connection, id: i64) -> Result<()> {
  if has_role(conn, id, Role::Kandydat)? {
    Ok(())
  } else {
    Err(CoreError::CandidateNotFound(id).into())
  }
}

fn require_row(conn: &Connection, table: &'static str, entity: &'static str, id: i64) -> Result<()> {
  if exists(conn, &format!("SELECT 1 FROM {table} WHERE id = ?1"), id)? {
    Ok(())
  } else {
    Err(CoreError::NotFound { entity, id }.into())
  }
}

// ─── Shared pieces ───────────────────────────────────────────────────────────

/// Update the address row `existing` in place, or insert a new one.
fn upsert_address(conn: &Connection, existing: Option<i64>, input: &AddressInput) -> Result<i64> {
  if let Some(street_id) = input.street_id {
    require_row(conn, "streets", "street", street_id)?;
  }
  let unit = present(&input.unit_number);
  let building = input.building_number.trim();
  let postal = input.postal_code.trim();

  match existing {
    Some(id) => {
      conn.execute(
        "UPDATE addresses
         SET street_id = ?1, building_number = ?2, unit_number = ?3, postal_code = ?4
         WHERE id = ?5",
        params![input.street_id, building, unit, postal, id],
      )?;
      Ok(id)
    }
    None => {
      conn.execute(
        "INSERT INTO addresses (street_id, building_number, unit_number, postal_code)
         VALUES (?1, ?2, ?3, ?4)",
        params![input.street_id, building, unit, postal],
      )?;
      Ok(conn.last_insert_rowid())
    }
  }
}

/// Insert or overwrite the account's primary email.
fn upsert_email(conn: &Connection, account_id: i64, email: &str) -> Result<()> {
  conn.execute(
    "INSERT INTO emails (account_id, email, is_primary) VALUES (?1, ?2, 1)
     ON CONFLICT (account_id, is_primary) DO UPDATE SET email = excluded.email",
    params![account_id, email],
  )?;
  Ok(())
}

/// Insert or overwrite the account's primary phone.
fn upsert_phone(conn: &Connection, account_id: i64, phone: &str) -> Result<()> {
  conn.execute(
    "INSERT INTO phones (account_id, number, is_primary) VALUES (?1, ?2, 1)
     ON CONFLICT (account_id, is_primary) DO UPDATE SET number = excluded.number",
    params![account_id, phone],
  )?;
  Ok(())
}

fn upsert_contacts(
  conn: &Connection,
  account_id: i64,
  email: Option<&str>,
  phone: Option<&str>,
) -> Result<()> {
  if let Some(email) = email {
    upsert_email(conn, account_id, email)?;
  }
  if let Some(phone) = phone {
    upsert_phone(conn, account_id, phone)?;
  }
  Ok(())
}

/// Apply [`contact_change`] results to the account's primary contacts.
/// A cleared channel loses its primary row.
fn change_contacts(
  conn: &Connection,
  account_id: i64,
  email: Option<Option<String>>,
  phone: Option<Option<String>>,
) -> Result<()> {
  match email {
    Some(Some(email)) => upsert_email(conn, account_id, &email)?,
    Some(None) => {
      conn.execute(
        "DELETE FROM emails WHERE account_id = ?1 AND is_primary = 1",
        params![account_id],
      )?;
    }
    None => {}
  }
  match phone {
    Some(Some(phone)) => upsert_phone(conn, account_id, &phone)?,
    Some(None) => {
      conn.execute(
        "DELETE FROM phones WHERE account_id = ?1 AND is_primary = 1",
        params![account_id],
      )?;
    }
    None => {}
  }
  Ok(())
}

fn insert_roles(conn: &Connection, account_id: i64, roles: &[Role]) -> Result<()> {
  for role in roles {
    conn.execute(
      "INSERT OR IGNORE INTO account_roles (account_id, role_id)
       SELECT ?1, id FROM roles WHERE name = ?2",
      params![account_id, role.as_ref()],
    )?;
  }
  Ok(())
}

/// `base`, or `base` with the smallest numeric suffix not yet taken.
/// Deleted accounts keep their usernames.
fn unique_username(conn: &Connection, base: &str) -> Result<String> {
  for n in 0..=u32::MAX {
    let candidate = with_suffix(base, n);
    if !exists(conn, "SELECT 1 FROM accounts WHERE username = ?1", &candidate)? {
      return Ok(candidate);
    }
  }
  Err(CoreError::UsernameTaken(base.to_owned()).into())
}

// ─── Accounts ────────────────────────────────────────────────────────────────

/// Insert an account with its roles, primary contacts and address.
/// `input` must already be validated.
pub fn create_account(conn: &Connection, input: &NewAccount, now: DateTime<Utc>) -> Result<i64> {
  let username = input.username.trim();
  if exists(conn, "SELECT 1 FROM accounts WHERE username = ?1", username)? {
    return Err(CoreError::UsernameTaken(username.to_owned()).into());
  }

  let address_id = input
    .address
    .as_ref()
    .map(|a| upsert_address(conn, None, a))
    .transpose()?;

  conn.execute(
    "INSERT INTO accounts (
       username, password_hash, given_name, family_name,
       birth_date, address_id, created_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    params![
      username,
      input.password_hash,
      input.given_name.trim(),
      input.family_name.trim(),
      input.birth_date.map(encode_date),
      address_id,
      encode_dt(now),
    ],
  )?;
  let id = conn.last_insert_rowid();

  insert_roles(conn, id, &input.roles)?;
  upsert_contacts(
    conn,
    id,
    present(&input.email).as_deref(),
    present(&input.phone).as_deref(),
  )?;
  Ok(id)
}

pub fn set_roles(conn: &Connection, id: i64, roles: &[Role]) -> Result<()> {
  if roles.is_empty() {
    return Err(CoreError::validation("an account needs at least one role").into());
  }
  require_account(conn, id)?;
  conn.execute("DELETE FROM account_roles WHERE account_id = ?1", params![id])?;
  insert_roles(conn, id, roles)
}

pub fn soft_delete(conn: &Connection, id: i64, now: DateTime<Utc>) -> Result<bool> {
  let changed = conn.execute(
    "UPDATE accounts SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    params![encode_dt(now), id],
  )?;
  Ok(changed > 0)
}

// ─── Reference records ───────────────────────────────────────────────────────

pub fn create_school(conn: &Connection, name: &str) -> Result<i64> {
  let name = require("nazwa", name)?;
  conn.execute("INSERT INTO schools (name) VALUES (?1)", params![name])?;
  Ok(conn.last_insert_rowid())
}

pub fn create_group(conn: &Connection, input: &NewGroup) -> Result<i64> {
  let name = require("nazwa", &input.name)?;
  if let Some(animator_id) = input.animator_id {
    require_account(conn, animator_id)?;
    if !has_role(conn, animator_id, Role::Animator)? {
      return Err(
        CoreError::validation(format!("account {animator_id} is not an animator")).into(),
      );
    }
  }
  conn.execute(
    "INSERT INTO formation_groups (name, animator_id) VALUES (?1, ?2)",
    params![name, input.animator_id],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn create_parish(conn: &Connection, input: &NewParish) -> Result<i64> {
  let address_id = input
    .address
    .as_ref()
    .map(|a| upsert_address(conn, None, a))
    .transpose()?;
  conn.execute(
    "INSERT INTO parishes (invocation, address_id, email, phone) VALUES (?1, ?2, ?3, ?4)",
    params![
      input.invocation.trim(),
      address_id,
      present(&input.email),
      present(&input.phone),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

// ─── Parent ──────────────────────────────────────────────────────────────────

/// Update the candidate's first linked parent, or provision a parent account
/// and link it. `hash_password` runs only when provisioning.
pub fn save_parent(
  conn: &Connection,
  candidate_id: i64,
  input: &ParentInput,
  hash_password: impl FnOnce() -> bierzmowanie_core::Result<String>,
  now: DateTime<Utc>,
) -> Result<SavedParent> {
  require_candidate(conn, candidate_id)?;

  let given = input.given_name.trim();
  let family = input.family_name.trim();
  let email = contact_change(&input.email);
  let phone = contact_change(&input.phone);

  let existing: Option<(i64, i64, Option<i64>, String)> = conn
    .query_row(
      "SELECT p.id, p.account_id, p.address_id, a.username
       FROM parent_candidates pc
       JOIN parents p  ON p.id = pc.parent_id
       JOIN accounts a ON a.id = p.account_id AND a.deleted_at IS NULL
       WHERE pc.candidate_id = ?1
       ORDER BY pc.parent_id
       LIMIT 1",
      params![candidate_id],
      |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )
    .optional()?;

  if let Some((parent_id, account_id, address_id, username)) = existing {
    conn.execute(
      "UPDATE accounts SET given_name = ?1, family_name = ?2 WHERE id = ?3",
      params![given, family, account_id],
    )?;
    if let Some(address) = &input.address {
      let address_id = upsert_address(conn, address_id, address)?;
      conn.execute(
        "UPDATE parents SET address_id = ?1 WHERE id = ?2",
        params![address_id, parent_id],
      )?;
    }
    change_contacts(conn, account_id, email, phone)?;
    return Ok(SavedParent { parent_id, account_id, username, created: false });
  }

  let username = unique_username(conn, &parent_username_base(given, family))?;
  let account = NewAccount {
    username:      username.clone(),
    password_hash: hash_password()?,
    given_name:    given.to_owned(),
    family_name:   family.to_owned(),
    birth_date:    None,
    roles:         vec![Role::Rodzic],
    email:         email.flatten(),
    phone:         phone.flatten(),
    address:       None,
  };
  let account_id = create_account(conn, &account, now)?;

  let address_id = input
    .address
    .as_ref()
    .map(|a| upsert_address(conn, None, a))
    .transpose()?;
  conn.execute(
    "INSERT INTO parents (account_id, address_id) VALUES (?1, ?2)",
    params![account_id, address_id],
  )?;
  let parent_id = conn.last_insert_rowid();

  conn.execute(
    "INSERT INTO parent_candidates (parent_id, candidate_id) VALUES (?1, ?2)",
    params![parent_id, candidate_id],
  )?;

  Ok(SavedParent { parent_id, account_id, username, created: true })
}

// ─── Witness ─────────────────────────────────────────────────────────────────

pub fn save_witness(conn: &Connection, candidate_id: i64, input: &WitnessInput) -> Result<Saved> {
  require_candidate(conn, candidate_id)?;

  let given = input.given_name.trim();
  let family = input.family_name.trim();

  let existing: Option<(i64, Option<i64>)> = conn
    .query_row(
      "SELECT id, address_id FROM witnesses WHERE candidate_id = ?1",
      params![candidate_id],
      |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()?;

  let saved = match existing {
    Some((id, address_id)) => {
      let address_id = match &input.address {
        Some(a) => Some(upsert_address(conn, address_id, a)?),
        None => address_id,
      };
      conn.execute(
        "UPDATE witnesses SET given_name = ?1, family_name = ?2, address_id = ?3
         WHERE id = ?4",
        params![given, family, address_id, id],
      )?;
      Saved { id, created: false }
    }
    None => {
      let address_id = input
        .address
        .as_ref()
        .map(|a| upsert_address(conn, None, a))
        .transpose()?;
      conn.execute(
        "INSERT INTO witnesses (candidate_id, given_name, family_name, address_id)
         VALUES (?1, ?2, ?3, ?4)",
        params![candidate_id, given, family, address_id],
      )?;
      Saved { id: conn.last_insert_rowid(), created: true }
    }
  };

  let email = contact_change(&input.email);
  let phone = contact_change(&input.phone);
  if email.is_some() || phone.is_some() {
    // A channel missing from the body keeps its previous value.
    conn.execute(
      "INSERT INTO witness_contacts (witness_id, email, phone, is_primary)
       VALUES (?1, ?2, ?3, 1)
       ON CONFLICT (witness_id, is_primary) DO UPDATE SET
         email = CASE WHEN ?4 THEN excluded.email ELSE email END,
         phone = CASE WHEN ?5 THEN excluded.phone ELSE phone END",
      params![
        saved.id,
        email.clone().flatten(),
        phone.clone().flatten(),
        email.is_some(),
        phone.is_some(),
      ],
    )?;
  }

  Ok(saved)
}

// ─── School enrollment ───────────────────────────────────────────────────────

pub fn save_school_enrollment(
  conn: &Connection,
  candidate_id: i64,
  school_id: i64,
  input: &SchoolEnrollmentInput,
) -> Result<Saved> {
  require_candidate(conn, candidate_id)?;
  require_row(conn, "schools", "school", school_id)?;

  let grade = input.grade.trim();
  let year = input.school_year.trim();

  let existing: Option<i64> = conn
    .query_row(
      "SELECT id FROM school_enrollments WHERE candidate_id = ?1",
      params![candidate_id],
      |row| row.get(0),
    )
    .optional()?;

  match existing {
    Some(id) => {
      conn.execute(
        "UPDATE school_enrollments SET school_id = ?1, grade = ?2, school_year = ?3
         WHERE id = ?4",
        params![school_id, grade, year, id],
      )?;
      Ok(Saved { id, created: false })
    }
    None => {
      conn.execute(
        "INSERT INTO school_enrollments (candidate_id, school_id, grade, school_year)
         VALUES (?1, ?2, ?3, ?4)",
        params![candidate_id, school_id, grade, year],
      )?;
      Ok(Saved { id: conn.last_insert_rowid(), created: true })
    }
  }
}

// ─── Confirmation name ───────────────────────────────────────────────────────

pub fn save_confirmation_name(
  conn: &Connection,
  candidate_id: i64,
  input: &ConfirmationNameInput,
) -> Result<Saved> {
  require_candidate(conn, candidate_id)?;

  let name = input.name.trim();
  let justification = input.justification.trim();

  let existing: Option<i64> = conn
    .query_row(
      "SELECT id FROM confirmation_names WHERE candidate_id = ?1",
      params![candidate_id],
      |row| row.get(0),
    )
    .optional()?;

  match existing {
    Some(id) => {
      conn.execute(
        "UPDATE confirmation_names SET name = ?1, justification = ?2 WHERE id = ?3",
        params![name, justification, id],
      )?;
      Ok(Saved { id, created: false })
    }
    None => {
      conn.execute(
        "INSERT INTO confirmation_names (candidate_id, name, justification)
         VALUES (?1, ?2, ?3)",
        params![candidate_id, name, justification],
      )?;
      Ok(Saved { id: conn.last_insert_rowid(), created: true })
    }
  }
}

// ─── Memberships ─────────────────────────────────────────────────────────────

/// Replace-the-link: drop any membership, then insert the new one.
pub fn assign_group(conn: &Connection, candidate_id: i64, group_id: i64) -> Result<Saved> {
  require_candidate(conn, candidate_id)?;
  require_row(conn, "formation_groups", "group", group_id)?;

  let removed = conn.execute(
    "DELETE FROM group_members WHERE candidate_id = ?1",
    params![candidate_id],
  )?;
  conn.execute(
    "INSERT INTO group_members (group_id, candidate_id) VALUES (?1, ?2)",
    params![group_id, candidate_id],
  )?;
  Ok(Saved { id: conn.last_insert_rowid(), created: removed == 0 })
}

/// Replace-the-link: drop any membership, then insert the new one.
pub fn assign_parish(conn: &Connection, account_id: i64, parish_id: i64) -> Result<Saved> {
  require_account(conn, account_id)?;
  require_row(conn, "parishes", "parish", parish_id)?;

  let removed = conn.execute(
    "DELETE FROM parish_members WHERE account_id = ?1",
    params![account_id],
  )?;
  conn.execute(
    "INSERT INTO parish_members (parish_id, account_id) VALUES (?1, ?2)",
    params![parish_id, account_id],
  )?;
  Ok(Saved { id: conn.last_insert_rowid(), created: removed == 0 })
}
