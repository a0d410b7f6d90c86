//! [`Query`] collection related to [`Contractor`]s.

use common::operations::By;

use crate::{
    domain::{contractor, Contractor},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Contractor`] by its [`contractor::Id`].
pub type ById = DatabaseQuery<By<Option<Contractor>, contractor::Id>>;

/// Queries a [`Contractor`] by its [`contractor::Name`], case-insensitively,
/// including deactivated ones.
pub type ByName = DatabaseQuery<By<Option<Contractor>, contractor::Name>>;

/// Queries [`Contractor`]s matching a [`read::contractor::Filter`].
pub type List = DatabaseQuery<By<Vec<Contractor>, read::contractor::Filter>>;
