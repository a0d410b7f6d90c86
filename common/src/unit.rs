//! Marker types.

/// Marker type describing an entity registration.
#[derive(Clone, Copy, Debug)]
pub struct Registration;

/// Marker type describing a work start.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing an entity termination.
#[derive(Clone, Copy, Debug)]
pub struct Termination;

/// Marker type describing an entity deactivation.
#[derive(Clone, Copy, Debug)]
pub struct Deactivation;

/// Marker type describing an equipment issuance.
#[derive(Clone, Copy, Debug)]
pub struct Issuance;

/// Marker type describing an event occurrence.
#[derive(Clone, Copy, Debug)]
pub struct Occurrence;
