//! [`Contractor`] definitions.

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

/// Organizational entity [`Member`]s are assigned to ("contratista").
///
/// [`Member`]: crate::domain::Member
#[derive(Clone, Debug, From)]
pub struct Contractor {
    /// ID of this [`Contractor`].
    pub id: Id,

    /// [`Name`] of this [`Contractor`].
    pub name: Name,

    /// [`Date`] when this [`Contractor`] was deactivated, if it was.
    ///
    /// [`Contractor`]s are never physically removed, only deactivated.
    pub deactivated_on: Option<DeactivationDate>,
}

impl Contractor {
    /// Returns whether this [`Contractor`] is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deactivated_on.is_none()
    }
}

/// ID of a [`Contractor`].
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
    Ord,
    PartialEq,
    PartialOrd,
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

/// Name of a [`Contractor`], unique case-insensitively.
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] from the given `name`, normalizing it by
    /// trimming surrounding whitespace.
    ///
    /// [`None`] is returned if the trimmed `name` is empty or too long.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref().trim();
        (!name.is_empty() && name.len() <= 512)
            .then(|| Self(name.to_owned()))
    }

    /// Returns whether this [`Name`] matches the `other` one,
    /// case-insensitively.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// [`Date`] when a [`Contractor`] was deactivated.
pub type DeactivationDate = DateOf<(Contractor, unit::Deactivation)>;

#[cfg(test)]
mod spec {
    use super::Name;

    #[test]
    fn name_is_trimmed_on_creation() {
        assert_eq!(
            <Name as AsRef<str>>::as_ref(&Name::new("Acme ").unwrap()),
            "Acme",
        );
        assert_eq!(
            <Name as AsRef<str>>::as_ref(&Name::new("  Acme S.A.").unwrap()),
            "Acme S.A.",
        );
        assert!(Name::new("   ").is_none());
        assert!(Name::new("").is_none());
    }

    #[test]
    fn name_matching_ignores_case() {
        let acme = Name::new("Acme").unwrap();
        assert!(acme.matches(&Name::new("ACME").unwrap()));
        assert!(acme.matches(&Name::new("acme ").unwrap()));
        assert!(!acme.matches(&Name::new("Acme S.A.").unwrap()));
    }
}
