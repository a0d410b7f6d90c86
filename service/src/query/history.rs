//! [`Query`] collection related to [`HistoryEntry`]s.

use common::operations::By;

use crate::domain::{member, HistoryEntry};
#[cfg(doc)]
use crate::{domain::Member, Query};

use super::DatabaseQuery;

/// Queries all [`HistoryEntry`]s of a [`Member`], ordered by occurrence
/// time, ascending.
pub type ByMember = DatabaseQuery<By<Vec<HistoryEntry>, member::Id>>;
