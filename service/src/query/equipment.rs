//! [`Query`] collection related to [`EquipmentIssuance`]s.

use common::operations::By;

use crate::domain::{member, EquipmentIssuance};
#[cfg(doc)]
use crate::{domain::Member, Query};

use super::DatabaseQuery;

/// Queries all [`EquipmentIssuance`]s of a [`Member`], ordered by issuance
/// date, ascending.
pub type ByMember = DatabaseQuery<By<Vec<EquipmentIssuance>, member::Id>>;
