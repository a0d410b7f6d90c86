//! Postgres [`Database`] implementation.
//!
//! The remote-store-backed repository backend. There are no multi-statement
//! transactions in this design: every operation is one independent
//! statement on a pooled connection.
//!
//! [`Database`]: crate::infra::Database

mod impls;

use std::sync::Arc;

use deadpool_postgres::Runtime;
use derive_more::{Display, Error as StdError, From};
use tokio::sync::{RwLock, RwLockReadGuard};
use tokio_postgres::{error::SqlState, types::ToSql, NoTls, Row};
use tracerr::Traced;

use crate::infra::database;

pub use deadpool_postgres::{
    Client, Config, CreatePoolError as PoolCreationError, Pool, PoolError,
};
pub use refinery::embed_migrations;

/// Postgres [`Database`] client.
///
/// [`Database`]: crate::infra::Database
#[derive(Clone, Debug)]
pub struct Postgres {
    /// [`Pool`] to retrieve [`Client`]s from.
    pool: Pool,

    /// Lazily initialized [`Client`] used for the operations.
    connection: Arc<RwLock<Option<Client>>>,
}

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create a new connection [`Pool`].
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self {
            pool,
            connection: Arc::new(RwLock::new(None)),
        })
    }

    /// Returns the underlying [`Client`] of this [`Postgres`] client,
    /// initializing it on first use.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, Client>, Traced<database::Error>> {
        let connection = self.connection.read().await;
        let guard = if connection.is_none() {
            drop(connection);

            let mut connection = self.connection.write().await;
            if connection.is_none() {
                *connection = Some(
                    self.pool
                        .get()
                        .await
                        .map_err(tracerr::from_and_wrap!(=> Error))
                        .map_err(tracerr::map_from)?,
                );
            }

            connection.downgrade()
        } else {
            connection
        };

        Ok(RwLockReadGuard::map(guard, |conn| {
            conn.as_ref()
                .expect("connection cannot be dropped while guard is alive")
        }))
    }

    /// Queries the provided statement with the given parameters and returns
    /// the resulting rows.
    pub(crate) async fn query(
        &self,
        stmt: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>> {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .query(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }

    /// Queries the provided statement with the given parameters and returns
    /// the optional resulting row.
    pub(crate) async fn query_opt(
        &self,
        stmt: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>> {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .query_opt(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }

    /// Executes the provided statement with the given parameters and returns
    /// the number of affected rows.
    pub(crate) async fn exec(
        &self,
        stmt: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>> {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .execute(stmt, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Connection error.
    #[display("`Connection` error: {_0}")]
    Connection(tokio_postgres::Error),

    /// Error of creating a new connection [`Pool`].
    #[display("Failed to create a new connection `Pool`: {_0}")]
    PoolCreation(PoolCreationError),

    /// Connection [`Pool`] error.
    #[display("`Pool` error: {_0}")]
    Pool(PoolError),
}

impl Error {
    /// Checks if the error is a unique violation of the specified constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            Self::Connection(e) => {
                e.code() == Some(&SqlState::UNIQUE_VIOLATION)
                    && constraint.map_or(true, |c| {
                        e.as_db_error().and_then(|e| e.constraint()) == Some(c)
                    })
            }
            Self::Pool(..) | Self::PoolCreation(..) => false,
        }
    }
}
