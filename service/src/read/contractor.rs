//! [`Contractor`] read model definition.
//!
//! [`Contractor`]: crate::domain::Contractor

#[cfg(doc)]
use crate::domain::Contractor;

/// Filter for selecting [`Contractor`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct Filter {
    /// Includes deactivated [`Contractor`]s in the selection.
    pub include_inactive: bool,
}
