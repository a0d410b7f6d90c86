//! [`Member`] read model definition.
//!
//! [`Member`]: crate::domain::Member

use derive_more::{From, Into};

use crate::domain::contractor;
#[cfg(doc)]
use crate::domain::{Contractor, Member};

/// Filter for selecting [`Member`]s.
///
/// The default filter selects the full member set: lifecycle validation and
/// reporting both operate over all records on purpose.
#[derive(Clone, Copy, Debug, Default)]
pub struct Filter {
    /// Restricts to [`Member`]s assigned to the [`Contractor`].
    pub contractor: Option<contractor::Id>,

    /// Restricts to active [`Member`]s only.
    pub active_only: bool,
}

/// Count of active [`Member`]s assigned to a [`Contractor`].
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct ActiveCount(i64);

impl ActiveCount {
    /// Returns whether the count is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}
