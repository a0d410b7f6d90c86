//! [`Command`] definition.

pub mod authorize_session;
pub mod create_contractor;
pub mod delete_contractor;
pub mod reactivate_member;
pub mod reassign_contractor;
pub mod record_equipment_issuance;
pub mod record_initial_assignment;
pub mod register_member;
pub mod terminate_member;
pub mod update_member;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_session::AuthorizeSession,
    create_contractor::CreateContractor,
    delete_contractor::DeleteContractor,
    reactivate_member::ReactivateMember,
    reassign_contractor::ReassignContractor,
    record_equipment_issuance::RecordEquipmentIssuance,
    record_initial_assignment::RecordInitialAssignment,
    register_member::RegisterMember, terminate_member::TerminateMember,
    update_member::UpdateMember,
};
