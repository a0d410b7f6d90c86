//! [`HistoryEntry`] definitions.
//!
//! History entries are append-only: once written they are never mutated or
//! deleted. Read ordering is by occurrence time, ascending.

use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, From, FromStr as DeriveFromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::{Contractor, Member};
use crate::domain::{
    contractor, equipment, member, EquipmentIssuance, Reason, Responsible,
};

/// Record of one contractor-related event of one [`Member`].
#[derive(Clone, Debug, From)]
pub struct HistoryEntry {
    /// ID of this [`HistoryEntry`].
    pub id: Id,

    /// ID of the [`Member`] this [`HistoryEntry`] belongs to.
    pub member_id: member::Id,

    /// [`Kind`] of the recorded event.
    pub kind: Kind,

    /// ID of the [`Contractor`] the [`Member`] was assigned to before the
    /// event, if any.
    pub previous_contractor: Option<contractor::Id>,

    /// ID of the [`Contractor`] the [`Member`] is assigned to after the
    /// event.
    ///
    /// Absent for [`Kind::Termination`] events.
    pub new_contractor: Option<contractor::Id>,

    /// [`Responsible`] who performed the event.
    pub responsible: Responsible,

    /// [`Reason`] of the event.
    pub reason: Option<Reason>,

    /// [`DateTime`] when the event occurred.
    ///
    /// [`DateTime`]: common::DateTime
    pub occurred_at: OccurrenceDateTime,

    /// [`EquipmentSnapshot`] captured at the event, carried by
    /// [`Kind::ContractorChange`] entries.
    pub equipment: Option<EquipmentSnapshot>,
}

/// ID of a [`HistoryEntry`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    DeriveFromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Kind of a [`HistoryEntry`]."]
    enum Kind {
        #[doc = "First contractor assignment, written once at registration."]
        InitialAssignment = 1,

        #[doc = "Reassignment from one contractor to another."]
        ContractorChange = 2,

        #[doc = "Member termination."]
        Termination = 3,

        #[doc = "Member reactivation."]
        Reactivation = 4,
    }
}

/// Point-in-time capture of the equipment issued to a [`Member`] at a
/// contractor change, tagged with the *previous* [`Contractor`]'s name.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EquipmentSnapshot {
    /// Name of the [`Contractor`] the equipment was issued under.
    pub contractor: contractor::Name,

    /// Issuances on record at capture time.
    pub items: Vec<SnapshotItem>,

    /// Sum of the quantities of all [`items`](EquipmentSnapshot::items).
    pub total_quantity: i64,
}

impl EquipmentSnapshot {
    /// Captures a new [`EquipmentSnapshot`] of the provided `issuances`,
    /// issued under the [`Contractor`] named `contractor`.
    #[must_use]
    pub fn capture(
        contractor: contractor::Name,
        issuances: &[EquipmentIssuance],
    ) -> Self {
        Self {
            contractor,
            items: issuances.iter().map(SnapshotItem::of).collect(),
            total_quantity: issuances
                .iter()
                .map(|i| i64::from(i.quantity.get()))
                .sum(),
        }
    }
}

/// One issuance captured in an [`EquipmentSnapshot`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SnapshotItem {
    /// Issued item.
    pub item: equipment::Item,

    /// Size of the issued item.
    pub size: Option<equipment::Size>,

    /// Issued quantity.
    pub quantity: equipment::Quantity,

    /// [`Date`] when the item was issued.
    ///
    /// [`Date`]: common::Date
    pub issued_on: equipment::IssuanceDate,
}

impl SnapshotItem {
    /// Creates a new [`SnapshotItem`] of the provided [`EquipmentIssuance`].
    fn of(issuance: &EquipmentIssuance) -> Self {
        Self {
            item: issuance.item.clone(),
            size: issuance.size.clone(),
            quantity: issuance.quantity,
            issued_on: issuance.issued_on,
        }
    }
}

/// [`DateTime`] when a [`HistoryEntry`]'s event occurred.
///
/// [`DateTime`]: common::DateTime
pub type OccurrenceDateTime = DateTimeOf<(HistoryEntry, unit::Occurrence)>;
