//! Database struct and open/close logic
//!
//! A `Database` owns one SQLite connection and the configuration it was
//! opened with. Every mutating entry point funnels through
//! [`Database::transaction`], every multi-statement read through
//! [`Database::read`]. Both hand the closure a [`NodeStore`] borrowed from
//! the open transaction, so nothing inside can start a second one.
//!
//! ## Transaction API
//!
//! ```text
//! let count = db.transaction(|store| {
//!     store.create_document("settings")?;
//!     store.node_count(doc)
//! })?;
//! ```
//!
//! `Ok` commits; `Err` rolls back and returns the closure's error unchanged.

pub mod config;
mod registry;

pub use config::{ArborConfig, CONFIG_FILE_NAME, DATABASE_FILE_NAME};

use arbor_core::{ArborError, ArborResult};
use arbor_storage::{schema, sql_err, NodeStore};
use parking_lot::Mutex;
use rusqlite::{Connection, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Handle to an open Arbor database
///
/// Shared as `Arc<Database>`; document handles keep a clone. The connection
/// sits behind a mutex, so concurrent callers on one handle are serialized
/// and concurrent handles rely on SQLite's own locking and busy timeout.
pub struct Database {
    /// SQLite connection (parking_lot mutex: no poisoning on panic)
    conn: Mutex<Connection>,

    /// Settings the database was opened with
    config: ArborConfig,

    /// Data directory; `None` for ephemeral databases
    data_dir: Option<PathBuf>,
}

impl Database {
    /// Open (or create) a database in `path`
    ///
    /// Creates the directory and a default `arbor.toml` if missing, then
    /// opens `arbor.db` with the settings from the file.
    ///
    /// # Example
    ///
    /// ```text
    /// use arbor_engine::Database;
    ///
    /// let db = Database::open("/path/to/data")?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> ArborResult<Arc<Self>> {
        let data_dir = path.as_ref().to_path_buf();
        create_data_dir(&data_dir)?;

        let config_path = data_dir.join(CONFIG_FILE_NAME);
        ArborConfig::write_default_if_missing(&config_path)?;
        let cfg = ArborConfig::from_file(&config_path)?;

        Self::open_with_config(path, cfg)
    }

    /// Open database at the given path with an explicit configuration
    ///
    /// The supplied config is written to `arbor.toml` so that later
    /// `Database::open()` calls pick up the same settings.
    ///
    /// ```text
    /// let cfg = ArborConfig {
    ///     synchronous: "full".into(),
    ///     ..Default::default()
    /// };
    /// let db = Database::open_with_config("/path/to/data", cfg)?;
    /// ```
    pub fn open_with_config<P: AsRef<Path>>(path: P, cfg: ArborConfig) -> ArborResult<Arc<Self>> {
        cfg.validate()?;
        let data_dir = path.as_ref().to_path_buf();
        create_data_dir(&data_dir)?;
        cfg.write_to_file(&data_dir.join(CONFIG_FILE_NAME))?;

        let db_path = data_dir.join(DATABASE_FILE_NAME);
        let conn = Connection::open(&db_path).map_err(sql_err)?;
        configure(&conn, &cfg, true)?;
        schema::initialize(&conn).map_err(|e| {
            warn!(target: "arbor::db", path = ?db_path, error = %e, "Schema initialization failed");
            e
        })?;

        info!(
            target: "arbor::db",
            path = ?db_path,
            journal_mode = %cfg.journal_mode,
            synchronous = %cfg.synchronous,
            busy_timeout_ms = cfg.busy_timeout_ms,
            "Opened database"
        );

        Ok(Arc::new(Self {
            conn: Mutex::new(conn),
            config: cfg,
            data_dir: Some(data_dir),
        }))
    }

    /// Create an in-memory database with default settings
    ///
    /// Nothing touches disk; all data is lost when the last handle drops.
    /// Intended for tests and scratch work.
    pub fn ephemeral() -> ArborResult<Arc<Self>> {
        let cfg = ArborConfig::default();
        let conn = Connection::open_in_memory().map_err(sql_err)?;
        configure(&conn, &cfg, false)?;
        schema::initialize(&conn)?;
        info!(target: "arbor::db", "Opened ephemeral database");

        Ok(Arc::new(Self {
            conn: Mutex::new(conn),
            config: cfg,
            data_dir: None,
        }))
    }

    /// Settings this database was opened with
    pub fn config(&self) -> &ArborConfig {
        &self.config
    }

    /// Data directory, or `None` for an ephemeral database
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// True if the database lives only in memory
    pub fn is_ephemeral(&self) -> bool {
        self.data_dir.is_none()
    }

    /// Run `f` inside an IMMEDIATE transaction
    ///
    /// The write lock is taken up front, so a competing writer waits up to
    /// `busy_timeout_ms` here and fails with `Busy` before any row changes.
    /// Commits if `f` returns `Ok`; otherwise the transaction is rolled back
    /// and `f`'s error is returned.
    pub fn transaction<F, T>(&self, f: F) -> ArborResult<T>
    where
        F: FnOnce(&NodeStore<'_>) -> ArborResult<T>,
    {
        self.run(TransactionBehavior::Immediate, f)
    }

    /// Run `f` inside a DEFERRED transaction
    ///
    /// Every statement in `f` observes the same snapshot.
    pub fn read<F, T>(&self, f: F) -> ArborResult<T>
    where
        F: FnOnce(&NodeStore<'_>) -> ArborResult<T>,
    {
        self.run(TransactionBehavior::Deferred, f)
    }

    fn run<F, T>(&self, behavior: TransactionBehavior, f: F) -> ArborResult<T>
    where
        F: FnOnce(&NodeStore<'_>) -> ArborResult<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(behavior).map_err(sql_err)?;
        let result = f(&NodeStore::new(&tx));
        match result {
            Ok(value) => {
                tx.commit().map_err(sql_err)?;
                Ok(value)
            }
            Err(e) => {
                // Failed reads are routine (a missing path is NotFound).
                if is_write(behavior) {
                    warn!(target: "arbor::db", error = %e, code = e.error_code(), "Rolling back transaction");
                } else {
                    debug!(target: "arbor::db", error = %e, code = e.error_code(), "Rolling back read");
                }
                if let Err(rollback) = tx.rollback() {
                    warn!(target: "arbor::db", error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        }
    }
}

fn is_write(behavior: TransactionBehavior) -> bool {
    !matches!(behavior, TransactionBehavior::Deferred)
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("data_dir", &self.data_dir)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn create_data_dir(dir: &Path) -> ArborResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        ArborError::storage(format!(
            "Failed to create data directory '{}': {}",
            dir.display(),
            e
        ))
    })
}

/// Apply connection pragmas from the config
///
/// In-memory databases always use the `memory` journal, so `journal_mode`
/// is only applied to files.
fn configure(conn: &Connection, cfg: &ArborConfig, on_disk: bool) -> ArborResult<()> {
    conn.busy_timeout(Duration::from_millis(cfg.busy_timeout_ms))
        .map_err(sql_err)?;
    if on_disk {
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", &cfg.journal_mode, |row| row.get(0))
            .map_err(sql_err)?;
        if !mode.eq_ignore_ascii_case(&cfg.journal_mode) {
            warn!(
                target: "arbor::db",
                requested = %cfg.journal_mode,
                actual = %mode,
                "SQLite refused the requested journal mode"
            );
        }
    }
    conn.pragma_update(None, "synchronous", &cfg.synchronous)
        .map_err(sql_err)?;
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(sql_err)?;
    Ok(())
}
