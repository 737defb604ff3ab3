//! Bounded connection pool with scoped unit-of-work execution.
//!
//! The pool opens a fixed number of SQLite connections at construction and
//! hands each out for exactly one unit of work at a time. A unit of work is
//! a closure run inside a transaction: if it returns `Ok` the transaction
//! commits, if it returns `Err` (or panics) the transaction rolls back. In
//! both cases the connection goes back into the idle set, so the pool's
//! capacity never drifts.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use rusqlite::{Connection, Transaction};
use tracing::{debug, info, warn};

use crate::config::PoolConfig;
use crate::error::DbError;
use crate::migrations;

/// A fixed-size, thread-safe pool of SQLite connections.
///
/// Construct one at the process composition root and pass it by reference
/// into the store layer. Callers interact with the database only through
/// [`ConnectionPool::with_transaction`]; raw connections never escape.
///
/// Note that `:memory:` paths give every pooled connection its own private
/// database; use a file path whenever capacity is greater than 1.
pub struct ConnectionPool {
    capacity: usize,
    acquire_timeout: Duration,
    idle: Mutex<VecDeque<Connection>>,
    available: Condvar,
}

/// RAII handle for one checked-out connection. Returns the connection to
/// the idle set (and wakes one waiter) when dropped, on every exit path
/// including panics inside the unit of work.
struct PooledConnection<'p> {
    pool: &'p ConnectionPool,
    conn: Option<Connection>,
}

impl PooledConnection<'_> {
    fn connection(&mut self) -> &mut Connection {
        // Present from acquire until drop.
        self.conn.as_mut().expect("pooled connection already returned")
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            let mut idle = lock_idle(&self.pool.idle);
            idle.push_back(conn);
            self.pool.available.notify_one();
        }
    }
}

/// A poisoned mutex only means another holder panicked while touching the
/// deque; the deque itself is still structurally valid, so recover it
/// rather than propagating the poison.
fn lock_idle(idle: &Mutex<VecDeque<Connection>>) -> MutexGuard<'_, VecDeque<Connection>> {
    idle.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ConnectionPool {
    /// Opens `config.capacity` connections eagerly and places them in the
    /// idle set. Failure to open any connection is fatal to construction;
    /// no partial pool is ever returned.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Config` if capacity is zero, or `DbError::Sqlite`
    /// if any connection cannot be opened.
    pub fn new(config: PoolConfig) -> Result<Self, DbError> {
        if config.capacity == 0 {
            return Err(DbError::Config(
                "pool capacity must be at least 1".to_string(),
            ));
        }

        let mut idle = VecDeque::with_capacity(config.capacity);
        for _ in 0..config.capacity {
            idle.push_back(open_connection(&config.database_path)?);
        }

        info!(
            path = %config.database_path,
            capacity = config.capacity,
            "connection pool ready"
        );

        Ok(Self {
            capacity: config.capacity,
            acquire_timeout: config.acquire_timeout,
            idle: Mutex::new(idle),
            available: Condvar::new(),
        })
    }

    /// Convenience constructor for the composition root: reads
    /// [`PoolConfig::from_env`] and builds the pool from it.
    ///
    /// # Errors
    ///
    /// Same as [`ConnectionPool::new`].
    pub fn from_env() -> Result<Self, DbError> {
        Self::new(PoolConfig::from_env())
    }

    /// Number of connections this pool owns.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of connections currently idle. With the number checked out,
    /// this always sums to [`ConnectionPool::capacity`].
    pub fn idle_count(&self) -> usize {
        lock_idle(&self.idle).len()
    }

    /// Runs one unit of work against a pooled connection.
    ///
    /// Blocks the calling thread until a connection becomes idle, then runs
    /// `work` inside a transaction. `Ok` commits, `Err` rolls back and the
    /// error is returned unchanged. The connection is returned to the idle
    /// set on every exit path.
    ///
    /// Once granted, the unit of work runs to completion with no deadline
    /// and no cancellation; the acquire wait is the only timeout.
    ///
    /// # Errors
    ///
    /// Returns `DbError::PoolExhausted` if no connection becomes idle
    /// within the configured acquire timeout, `DbError::Sqlite` if the
    /// transaction cannot be opened or committed, or whatever `work`
    /// itself returned.
    pub fn with_transaction<T, F>(&self, work: F) -> Result<T, DbError>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T, DbError>,
    {
        let mut held = self.acquire()?;
        let mut tx = held.connection().transaction()?;

        match work(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                // The triggering error wins; a rollback failure is logged
                // but never masks it.
                if let Err(rollback_err) = tx.rollback() {
                    warn!(error = %rollback_err, "rollback failed after unit of work error");
                }
                Err(err)
            }
        }
    }

    /// Applies pending schema migrations using one pooled connection.
    ///
    /// Migrations manage their own transactions, so this runs outside
    /// [`ConnectionPool::with_transaction`]. Returns the number applied.
    ///
    /// # Errors
    ///
    /// Returns `DbError::PoolExhausted` if no connection is available, or
    /// `DbError::Migration` if a migration fails.
    pub fn migrate(&self) -> Result<usize, DbError> {
        let mut held = self.acquire()?;
        let applied = migrations::run_migrations(held.connection())?;
        Ok(applied)
    }

    /// Drains the idle set and closes every connection.
    ///
    /// Taking `self` by value means in-flight units of work (which borrow
    /// the pool) must have finished before this can be called.
    pub fn close_all(self) {
        let mut idle = self
            .idle
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut closed = 0usize;
        while let Some(conn) = idle.pop_front() {
            if let Err((_conn, err)) = conn.close() {
                warn!(error = %err, "failed to close pooled connection");
            } else {
                closed += 1;
            }
        }
        info!(closed, "connection pool shut down");
    }

    /// Blocks until a connection is idle or the acquire timeout elapses.
    fn acquire(&self) -> Result<PooledConnection<'_>, DbError> {
        let deadline = Instant::now() + self.acquire_timeout;
        let mut idle = lock_idle(&self.idle);

        loop {
            if let Some(conn) = idle.pop_front() {
                debug!(idle = idle.len(), "connection checked out");
                return Ok(PooledConnection {
                    pool: self,
                    conn: Some(conn),
                });
            }

            let now = Instant::now();
            if now >= deadline {
                warn!(waited = ?self.acquire_timeout, "connection pool exhausted");
                return Err(DbError::PoolExhausted {
                    waited: self.acquire_timeout,
                });
            }

            idle = match self.available.wait_timeout(idle, deadline - now) {
                Ok((guard, _timed_out)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }
}

/// Opens a single connection with the pool's standard pragmas: WAL journal
/// mode (concurrent readers with a single writer) and a busy timeout so
/// writers queue instead of failing immediately.
fn open_connection(path: &str) -> Result<Connection, DbError> {
    let conn = Connection::open(path)?;

    // In-memory databases report "memory", which is fine.
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    conn.execute_batch("PRAGMA busy_timeout = 5000;")?;

    Ok(conn)
}
