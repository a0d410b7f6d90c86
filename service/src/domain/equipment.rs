//! [`EquipmentIssuance`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::Date;
use common::{unit, DateOf};
use derive_more::{
    AsRef, Display, From, FromStr as DeriveFromStr, Into,
};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::Member;
use crate::domain::{member, Responsible};

/// Record of protective/uniform equipment issued to a [`Member`].
#[derive(Clone, Debug, From)]
pub struct EquipmentIssuance {
    /// ID of this [`EquipmentIssuance`].
    pub id: Id,

    /// ID of the [`Member`] the equipment was issued to.
    pub member_id: member::Id,

    /// Issued [`Item`].
    pub item: Item,

    /// [`Size`] of the issued item.
    pub size: Option<Size>,

    /// Issued [`Quantity`].
    pub quantity: Quantity,

    /// [`Date`] when the equipment was issued.
    pub issued_on: IssuanceDate,

    /// [`Responsible`] who issued the equipment.
    pub issued_by: Responsible,
}

/// ID of an [`EquipmentIssuance`].
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

/// Issued equipment item.
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Item(String);

impl Item {
    /// Creates a new [`Item`] if the given `item` is valid.
    #[must_use]
    pub fn new(item: impl Into<String>) -> Option<Self> {
        let item = item.into();
        Self::check(&item).then_some(Self(item))
    }

    /// Checks whether the given `item` is a valid [`Item`].
    fn check(item: impl AsRef<str>) -> bool {
        let item = item.as_ref();
        item.trim() == item && !item.is_empty() && item.len() <= 512
    }
}

impl FromStr for Item {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Item`")
    }
}

/// Size of an issued [`Item`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Size(String);

impl Size {
    /// Creates a new [`Size`] if the given `size` is valid.
    #[must_use]
    pub fn new(size: impl Into<String>) -> Option<Self> {
        let size = size.into();
        Self::check(&size).then_some(Self(size))
    }

    /// Checks whether the given `size` is a valid [`Size`].
    fn check(size: impl AsRef<str>) -> bool {
        let size = size.as_ref();
        size.trim() == size && !size.is_empty() && size.len() <= 64
    }
}

impl FromStr for Size {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Size`")
    }
}

/// Issued quantity, always at least 1.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Quantity(i32);

impl Quantity {
    /// Creates a new [`Quantity`] if the given `quantity` is at least 1.
    #[must_use]
    pub fn new(quantity: i32) -> Option<Self> {
        (quantity >= 1).then_some(Self(quantity))
    }

    /// Returns the numeric value of this [`Quantity`].
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// [`Date`] when an [`EquipmentIssuance`] happened.
pub type IssuanceDate = DateOf<(EquipmentIssuance, unit::Issuance)>;

#[cfg(test)]
mod spec {
    use super::Quantity;

    #[test]
    fn quantity_is_at_least_one() {
        assert_eq!(Quantity::new(1).unwrap().get(), 1);
        assert_eq!(Quantity::new(12).unwrap().get(), 12);
        assert!(Quantity::new(0).is_none());
        assert!(Quantity::new(-3).is_none());
    }
}
