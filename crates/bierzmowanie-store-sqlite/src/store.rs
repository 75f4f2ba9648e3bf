//! [`SqliteStore`], the SQLite implementation of [`ParishStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, TransactionBehavior};

use bierzmowanie_core::{
  Role,
  account::{Account, Credentials, NewAccount},
  candidate::CandidateView,
  input::{
    ConfirmationNameInput, NewGroup, NewParish, ParentInput, Saved,
    SavedParent, SchoolEnrollmentInput, WitnessInput, require,
  },
  store::ParishStore,
};

use crate::{Error, Result, read, schema::SCHEMA, write};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A parish registry backed by a single SQLite file.
///
/// Clones share one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` inside `BEGIN IMMEDIATE`. The write lock is taken up front, so
  /// a check followed by an insert cannot interleave with another writer.
  /// Any `Err` from `f` rolls back.
  async fn transaction<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        match f(&tx) {
          Ok(value) => {
            tx.commit()?;
            Ok(Ok(value))
          }
          Err(e) => {
            tx.rollback()?;
            Ok(Err(e))
          }
        }
      })
      .await?
  }

  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    T: Send + 'static,
  {
    Ok(self.conn.call(move |conn| Ok(f(conn)?)).await?)
  }

  /// Fetch an account that was just written; its absence is a storage fault.
  async fn fetch_account(&self, id: i64) -> Result<Account> {
    self
      .get_account(id)
      .await?
      .ok_or_else(|| Error::Decode(format!("account {id} vanished after write")))
  }

  /// Seed a city and street so addresses have something to reference.
  /// Streets are otherwise maintained outside this service.
  pub async fn add_street(&self, city: &str, street: &str) -> Result<i64> {
    let city = require("miasto", city)?.to_owned();
    let street = require("ulica", street)?.to_owned();
    self
      .transaction(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO cities (name) VALUES (?1)",
          rusqlite::params![city],
        )?;
        conn.execute(
          "INSERT INTO streets (city_id, name)
           SELECT id, ?2 FROM cities WHERE name = ?1",
          rusqlite::params![city, street],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
  }

  #[cfg(test)]
  pub(crate) async fn count_rows(&self, table: &'static str) -> i64 {
    self
      .read(move |conn| {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
      })
      .await
      .expect("count rows")
  }
}

// ─── ParishStore impl ────────────────────────────────────────────────────────

impl ParishStore for SqliteStore {
  type Error = Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn find_credentials<'a>(&'a self, identifier: &'a str) -> Result<Option<Credentials>> {
    let identifier = identifier.trim().to_owned();
    if identifier.is_empty() {
      return Ok(None);
    }
    self.read(move |conn| read::credentials(conn, &identifier)).await
  }

  async fn get_account(&self, id: i64) -> Result<Option<Account>> {
    self
      .read(move |conn| read::account(conn, id))
      .await?
      .map(|raw| raw.into_account())
      .transpose()
  }

  async fn create_account(&self, input: NewAccount) -> Result<Account> {
    input.validate()?;
    let now = Utc::now();
    let id = self
      .transaction(move |conn| write::create_account(conn, &input, now))
      .await?;
    self.fetch_account(id).await
  }

  async fn set_roles(&self, id: i64, roles: Vec<Role>) -> Result<Account> {
    self
      .transaction(move |conn| write::set_roles(conn, id, &roles))
      .await?;
    self.fetch_account(id).await
  }

  async fn delete_account(&self, id: i64) -> Result<bool> {
    let now = Utc::now();
    self
      .transaction(move |conn| write::soft_delete(conn, id, now))
      .await
  }

  // ── Reference records ─────────────────────────────────────────────────────

  async fn create_school(&self, name: String) -> Result<i64> {
    self
      .transaction(move |conn| write::create_school(conn, &name))
      .await
  }

  async fn create_group(&self, input: NewGroup) -> Result<i64> {
    require("nazwa", &input.name)?;
    self
      .transaction(move |conn| write::create_group(conn, &input))
      .await
  }

  async fn create_parish(&self, input: NewParish) -> Result<i64> {
    input.validate()?;
    self
      .transaction(move |conn| write::create_parish(conn, &input))
      .await
  }

  // ── Candidate relationships ───────────────────────────────────────────────

  async fn save_parent<H>(
    &self,
    candidate_id: i64,
    input: ParentInput,
    hash_password: H,
  ) -> Result<SavedParent>
  where
    H: FnOnce() -> bierzmowanie_core::Result<String> + Send + 'static,
  {
    input.validate()?;
    let now = Utc::now();
    let saved = self
      .transaction(move |conn| write::save_parent(conn, candidate_id, &input, hash_password, now))
      .await?;
    tracing::debug!(
      candidate_id,
      parent_id = saved.parent_id,
      created = saved.created,
      "parent saved"
    );
    Ok(saved)
  }

  async fn save_witness(&self, candidate_id: i64, input: WitnessInput) -> Result<Saved> {
    input.validate()?;
    self
      .transaction(move |conn| write::save_witness(conn, candidate_id, &input))
      .await
  }

  async fn save_school_enrollment(
    &self,
    candidate_id: i64,
    input: SchoolEnrollmentInput,
  ) -> Result<Saved> {
    let school_id = input.validate()?;
    self
      .transaction(move |conn| {
        write::save_school_enrollment(conn, candidate_id, school_id, &input)
      })
      .await
  }

  async fn save_confirmation_name(
    &self,
    candidate_id: i64,
    input: ConfirmationNameInput,
  ) -> Result<Saved> {
    input.validate()?;
    self
      .transaction(move |conn| write::save_confirmation_name(conn, candidate_id, &input))
      .await
  }

  async fn assign_group(&self, candidate_id: i64, group_id: i64) -> Result<Saved> {
    self
      .transaction(move |conn| write::assign_group(conn, candidate_id, group_id))
      .await
  }

  async fn assign_parish(&self, account_id: i64, parish_id: i64) -> Result<Saved> {
    self
      .transaction(move |conn| write::assign_parish(conn, account_id, parish_id))
      .await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn candidate_view(&self, candidate_id: i64) -> Result<Option<CandidateView>> {
    // One closure, so every part is read from the same connection state.
    let parts = self
      .read(move |conn| {
        let Some(profile) = read::profile(conn, candidate_id)? else {
          return Ok(None);
        };
        Ok(Some((
          profile,
          read::group(conn, candidate_id)?,
          read::parent(conn, candidate_id)?,
          read::witness(conn, candidate_id)?,
          read::confirmation_name(conn, candidate_id)?,
          read::school(conn, candidate_id)?,
          read::parish(conn, candidate_id)?,
        )))
      })
      .await?;

    let Some((profile, group, parent, witness, confirmation_name, school, parish)) = parts
    else {
      return Ok(None);
    };

    Ok(Some(CandidateView {
      candidate: profile.into_profile()?,
      group,
      parent,
      witness,
      confirmation_name,
      school,
      parish,
    }))
  }
}
