//! [`Database`]-related implementations.
//!
//! The [`Database`] trait (the [`Handler`] over operation types) is the
//! pluggable repository interface of the service: commands and queries are
//! generic over it and two backends implement it, the remote-store-backed
//! [`Postgres`] and the local-ephemeral [`Local`]. One is selected at
//! process start.
//!
//! [`Handler`]: common::Handler

pub mod local;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

pub use self::local::Local;
#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// Unique constraint guarding [`Contractor`] names, shared by both backends.
///
/// [`Contractor`]: crate::domain::Contractor
pub const CONTRACTOR_NAME_CONSTRAINT: &str = "contractors_name_uniq";

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Local`] error.
    Local(local::Error),

    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),
}

impl Error {
    /// Checks if the error is a unique violation of the specified constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            Self::Local(e) => e.is_unique_violation(constraint),
            #[cfg(feature = "postgres")]
            Self::Postgres(e) => e.is_unique_violation(constraint),
        }
    }
}
