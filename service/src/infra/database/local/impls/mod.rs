//! [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

mod contractor;
mod equipment;
mod history;
mod member;
