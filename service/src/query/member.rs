//! [`Query`] collection related to [`Member`]s.

use common::operations::By;

use crate::{
    domain::{contractor, member, Member},
    read,
};
#[cfg(doc)]
use crate::{domain::Contractor, Query};

use super::DatabaseQuery;

/// Queries a [`Member`] by its [`member::Id`].
pub type ById = DatabaseQuery<By<Option<Member>, member::Id>>;

/// Queries [`Member`]s matching a [`read::member::Filter`].
pub type List = DatabaseQuery<By<Vec<Member>, read::member::Filter>>;

/// Queries the count of active [`Member`]s assigned to a [`Contractor`].
pub type ActiveCount =
    DatabaseQuery<By<read::member::ActiveCount, contractor::Id>>;
