//! In-memory [`Database`] implementation.
//!
//! The local-ephemeral repository backend: plain tables under one
//! [`RwLock`], dying with the process. It implements the same operation
//! set and raises the same typed conflict errors as the Postgres backend,
//! and doubles as the substrate of the service test-suite.
//!
//! [`Database`]: crate::infra::Database

mod impls;

use std::{collections::HashMap, sync::Arc};

use derive_more::{Display, Error as StdError};
use tokio::sync::RwLock;

use crate::domain::{
    contractor, member, Contractor, EquipmentIssuance, HistoryEntry, Member,
};

/// In-memory [`Database`] client.
///
/// [`Database`]: crate::infra::Database
#[derive(Clone, Debug, Default)]
pub struct Local {
    /// Shared state of this [`Local`] database.
    state: Arc<RwLock<State>>,
}

impl Local {
    /// Creates a new empty [`Local`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Tables of a [`Local`] database.
#[derive(Debug, Default)]
struct State {
    /// [`Member`] records by ID.
    members: HashMap<member::Id, Member>,

    /// [`Contractor`] records by ID.
    contractors: HashMap<contractor::Id, Contractor>,

    /// Append-only [`HistoryEntry`] records, in insertion order.
    history: Vec<HistoryEntry>,

    /// [`EquipmentIssuance`] records, in insertion order.
    equipment: Vec<EquipmentIssuance>,
}

/// [`Local`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Unique constraint violation.
    #[display("unique constraint `{constraint}` violated")]
    UniqueViolation {
        /// Name of the violated constraint.
        constraint: &'static str,
    },
}

impl Error {
    /// Checks if the error is a unique violation of the specified constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            Self::UniqueViolation { constraint: violated } => {
                constraint.map_or(true, |c| *violated == c)
            }
        }
    }
}
