//! Contractor-history-related definitions.

use common::{Date, DateTime};
use derive_more::From;
use juniper::{graphql_object, GraphQLEnum, GraphQLObject};
use service::domain::{self, history};

use crate::{api, Context};

/// One contractor-related event of a `Member`.
#[derive(Clone, Debug, From)]
pub struct Entry(domain::HistoryEntry);

/// One contractor-related event of a `Member`.
#[graphql_object(context = Context, name = "HistoryEntry")]
impl Entry {
    /// Unique identifier of this `HistoryEntry`.
    pub fn id(&self) -> String {
        self.0.id.to_string()
    }

    /// Kind of the recorded event.
    pub fn kind(&self) -> EventKind {
        self.0.kind.into()
    }

    /// `Contractor` the `Member` was assigned to before the event, if any.
    pub fn previous_contractor_id(&self) -> Option<api::contractor::Id> {
        self.0.previous_contractor.map(Into::into)
    }

    /// `Contractor` the `Member` is assigned to after the event, if any.
    pub fn new_contractor_id(&self) -> Option<api::contractor::Id> {
        self.0.new_contractor.map(Into::into)
    }

    /// Who performed the event.
    pub fn responsible(&self) -> api::Responsible {
        self.0.responsible.clone().into()
    }

    /// Reason of the event, if any.
    pub fn reason(&self) -> Option<api::Reason> {
        self.0.reason.clone().map(Into::into)
    }

    /// `DateTime` when the event occurred.
    pub fn occurred_at(&self) -> DateTime {
        self.0.occurred_at.coerce()
    }

    /// Equipment snapshot captured at the event, carried by
    /// contractor-change entries.
    pub fn equipment(&self) -> Option<EquipmentSnapshot> {
        self.0.equipment.clone().map(Into::into)
    }
}

/// Kind of a `HistoryEntry` event.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum EventKind {
    /// First contractor assignment, written once at registration.
    InitialAssignment,

    /// Reassignment from one contractor to another.
    ContractorChange,

    /// Member termination.
    Termination,

    /// Member reactivation.
    Reactivation,
}

impl From<history::Kind> for EventKind {
    fn from(kind: history::Kind) -> Self {
        match kind {
            history::Kind::InitialAssignment => Self::InitialAssignment,
            history::Kind::ContractorChange => Self::ContractorChange,
            history::Kind::Termination => Self::Termination,
            history::Kind::Reactivation => Self::Reactivation,
        }
    }
}

/// Point-in-time capture of the equipment issued to a `Member` at a
/// contractor change, tagged with the previous `Contractor`'s name.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct EquipmentSnapshot {
    /// Name of the `Contractor` the equipment was issued under.
    pub contractor: String,

    /// Issuances on record at capture time.
    pub items: Vec<SnapshotItem>,

    /// Sum of the quantities of all items.
    pub total_quantity: i32,
}

impl From<history::EquipmentSnapshot> for EquipmentSnapshot {
    fn from(snapshot: history::EquipmentSnapshot) -> Self {
        Self {
            contractor: snapshot.contractor.to_string(),
            items: snapshot.items.into_iter().map(Into::into).collect(),
            total_quantity: i32::try_from(snapshot.total_quantity)
                .unwrap_or(i32::MAX),
        }
    }
}

/// One issuance captured in an `EquipmentSnapshot`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct SnapshotItem {
    /// Issued item.
    pub item: String,

    /// Size of the issued item, if any.
    pub size: Option<String>,

    /// Issued quantity.
    pub quantity: i32,

    /// `Date` when the item was issued.
    pub issued_on: Date,
}

impl From<history::SnapshotItem> for SnapshotItem {
    fn from(item: history::SnapshotItem) -> Self {
        Self {
            item: item.item.to_string(),
            size: item.size.map(|s| s.to_string()),
            quantity: item.quantity.get(),
            issued_on: item.issued_on.coerce(),
        }
    }
}
