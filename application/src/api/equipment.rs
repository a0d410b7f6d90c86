//! [`EquipmentIssuance`]-related definitions.
//!
//! [`EquipmentIssuance`]: service::domain::EquipmentIssuance

use common::Date;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;

use crate::{
    api::{self, scalar},
    Context,
};

/// One equipment issuance to a `Member`.
#[derive(Clone, Debug, From)]
pub struct Issuance(domain::EquipmentIssuance);

/// One equipment issuance to a `Member`.
#[graphql_object(context = Context, name = "EquipmentIssuance")]
impl Issuance {
    /// Unique identifier of this `EquipmentIssuance`.
    pub fn id(&self) -> String {
        self.0.id.to_string()
    }

    /// `Member` the equipment was issued to.
    pub fn member_id(&self) -> api::member::Id {
        self.0.member_id.into()
    }

    /// Issued item.
    pub fn item(&self) -> Item {
        self.0.item.clone().into()
    }

    /// Size of the issued item, if any.
    pub fn size(&self) -> Option<Size> {
        self.0.size.clone().map(Into::into)
    }

    /// Issued quantity.
    pub fn quantity(&self) -> i32 {
        self.0.quantity.get()
    }

    /// `Date` when the equipment was issued.
    pub fn issued_on(&self) -> Date {
        self.0.issued_on.coerce()
    }

    /// Who issued the equipment.
    pub fn issued_by(&self) -> api::Responsible {
        self.0.issued_by.clone().into()
    }
}

/// Issued equipment item.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentItem",
    with = scalar::Via::<domain::equipment::Item>,
)]
pub struct Item(domain::equipment::Item);

/// Size of an issued equipment item.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentSize",
    with = scalar::Via::<domain::equipment::Size>,
)]
pub struct Size(domain::equipment::Size);
