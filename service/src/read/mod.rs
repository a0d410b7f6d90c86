//! Read model definitions.

pub mod contractor;
pub mod member;
