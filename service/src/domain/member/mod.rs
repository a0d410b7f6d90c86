//! [`Member`] definitions.

pub mod uniqueness;

use std::{str::FromStr, sync::LazyLock};

#[cfg(doc)]
use common::Date;
use common::{unit, DateOf};
use derive_more::{
    AsRef, Display, From, FromStr as DeriveFromStr, Into,
};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{contractor, Reason, Responsible};

pub use self::uniqueness::Conflicts;

/// Person affiliated with the cooperative ("asociado").
#[derive(Clone, Debug, From)]
pub struct Member {
    /// ID of this [`Member`].
    pub id: Id,

    /// First name of this [`Member`].
    pub first_name: FirstName,

    /// Surname of this [`Member`].
    pub surname: Surname,

    /// National identity document number (DNI) of this [`Member`].
    pub national_id: Option<NationalId>,

    /// Fiscal identifier (CUIT) of this [`Member`].
    pub tax_id: Option<TaxId>,

    /// Internal file number ("legajo") of this [`Member`].
    pub file_number: Option<FileNumber>,

    /// Membership number of this [`Member`].
    pub membership_number: Option<MembershipNumber>,

    /// Indicator whether this [`Member`] is registered under the
    /// "monotributo" tax regime.
    pub monotributo: bool,

    /// ID of the [`Contractor`] this [`Member`] is currently assigned to.
    ///
    /// [`Contractor`]: crate::domain::Contractor
    pub contractor_id: Option<contractor::Id>,

    /// [`Date`] when this [`Member`] began working.
    pub started_on: Option<StartDate>,

    /// [`Date`] when this [`Member`] was registered in the system.
    ///
    /// Canonical date of the admission movement, distinct from
    /// [`started_on`](Member::started_on).
    pub registered_on: RegistrationDate,

    /// [`Termination`] of this [`Member`], if it was terminated.
    pub termination: Option<Termination>,
}

impl Member {
    /// Returns whether this [`Member`] is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.termination.is_none()
    }

    /// Returns the full display name of this [`Member`].
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

/// Termination of a [`Member`].
///
/// The date and the responsible are required together, so an inactive
/// [`Member`] always carries both.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Termination {
    /// [`Date`] when the [`Member`] was terminated.
    pub on: TerminationDate,

    /// [`Responsible`] who performed the termination.
    pub responsible: Responsible,

    /// [`Reason`] of the termination.
    pub reason: Option<Reason>,
}

/// ID of a [`Member`].
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

/// First name of a [`Member`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct FirstName(String);

impl FirstName {
    /// Creates a new [`FirstName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`FirstName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for FirstName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `FirstName`")
    }
}

/// Surname of a [`Member`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Surname(String);

impl Surname {
    /// Creates a new [`Surname`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Surname`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Surname {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Surname`")
    }
}

/// National identity document number (DNI) of a [`Member`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct NationalId(String);

impl NationalId {
    /// Creates a new [`NationalId`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`NationalId`].
    fn check(id: impl AsRef<str>) -> bool {
        /// Regular expression checking [`NationalId`] format: 6 to 10
        /// digits, optionally dot-separated.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\d{1,2}\.?\d{3}\.?\d{3}$|^\d{6,10}$")
                .expect("valid regex")
        });

        REGEX.is_match(id.as_ref())
    }
}

impl FromStr for NationalId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `NationalId`")
    }
}

/// Fiscal identifier (CUIT) of a [`Member`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct TaxId(String);

impl TaxId {
    /// Creates a new [`TaxId`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`TaxId`].
    fn check(id: impl AsRef<str>) -> bool {
        /// Regular expression checking [`TaxId`] format: 11 digits,
        /// optionally dash-separated as `XX-XXXXXXXX-X`.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\d{2}-?\d{8}-?\d$").expect("valid regex")
        });

        REGEX.is_match(id.as_ref())
    }
}

impl FromStr for TaxId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `TaxId`")
    }
}

/// Internal file number ("legajo") of a [`Member`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct FileNumber(String);

impl FileNumber {
    /// Creates a new [`FileNumber`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`FileNumber`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`FileNumber`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[0-9A-Za-z][0-9A-Za-z/-]{0,15}$")
                .expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for FileNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `FileNumber`")
    }
}

/// Membership number of a [`Member`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct MembershipNumber(String);

impl MembershipNumber {
    /// Creates a new [`MembershipNumber`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`MembershipNumber`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`MembershipNumber`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[0-9A-Za-z][0-9A-Za-z/-]{0,15}$")
                .expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for MembershipNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `MembershipNumber`")
    }
}

/// [`Date`] when a [`Member`] began working.
pub type StartDate = DateOf<(Member, unit::Start)>;

/// [`Date`] when a [`Member`] was registered.
pub type RegistrationDate = DateOf<(Member, unit::Registration)>;

/// [`Date`] when a [`Member`] was terminated.
pub type TerminationDate = DateOf<(Member, unit::Termination)>;
