//! [`Principal`] definitions.
//!
//! Authentication is delegated to the hosted provider: it issues and
//! refreshes session tokens, and this service only validates them and reads
//! the claims. The [`Principal`] is used to stamp [`Responsible`] onto
//! history entries and issuances.

use derive_more::{AsRef, Display, From, FromStr as DeriveFromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Responsible;

/// Session principal issued by the hosted authentication provider.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Principal {
    /// ID of the authenticated user at the provider.
    #[serde(rename = "sub")]
    pub id: Id,

    /// Email address of the authenticated user.
    pub email: String,

    /// Display name of the authenticated user, if the provider carries one.
    #[serde(default, rename = "name")]
    pub display_name: Option<String>,

    /// [`Role`] of the authenticated user.
    pub role: Role,
}

impl Principal {
    /// Returns the [`Responsible`] stamp of this [`Principal`]: its display
    /// name when present, its email otherwise.
    ///
    /// [`None`] is returned if neither forms a valid [`Responsible`].
    #[must_use]
    pub fn responsible(&self) -> Option<Responsible> {
        self.display_name
            .as_deref()
            .and_then(Responsible::new)
            .or_else(|| Responsible::new(self.email.clone()))
    }
}

/// ID of a [`Principal`].
#[derive(
    Clone,
    Copy,
    Debug,
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
pub struct Id(Uuid);

/// Role of a [`Principal`] at the provider.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access.
    Admin,

    /// Day-to-day operational access.
    Operator,

    /// Read-only access.
    Viewer,
}

/// Access token issued by the hosted authentication provider.
#[derive(AsRef, Clone, Debug, Display, DeriveFromStr)]
#[as_ref(str)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// The token is validated cryptographically when a session is
    /// authorized, not at construction.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}
