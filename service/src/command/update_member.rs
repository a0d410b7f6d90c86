//! [`Command`] for updating a [`Member`]'s identity fields.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        member::{self, uniqueness},
        Member,
    },
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for updating a [`Member`]'s identity fields.
///
/// The field set is a fixed allow-list: contractor assignment, registration
/// date and termination state are owned by their dedicated commands and
/// cannot be edited through this one.
#[derive(Clone, Debug)]
pub struct UpdateMember {
    /// ID of the [`Member`] to update.
    pub member_id: member::Id,

    /// New first name.
    pub first_name: member::FirstName,

    /// New surname.
    pub surname: member::Surname,

    /// New national identity document number.
    pub national_id: Option<member::NationalId>,

    /// New fiscal identifier.
    pub tax_id: Option<member::TaxId>,

    /// New internal file number.
    pub file_number: Option<member::FileNumber>,

    /// New membership number.
    pub membership_number: Option<member::MembershipNumber>,

    /// New "monotributo" tax regime indicator.
    pub monotributo: bool,

    /// New work start date.
    pub started_on: Option<member::StartDate>,
}

impl<Db> Command<UpdateMember> for Service<Db>
where
    Db: Database<
            Select<By<Option<Member>, member::Id>>,
            Ok = Option<Member>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Member>, read::member::Filter>>,
            Ok = Vec<Member>,
            Err = Traced<database::Error>,
        > + Database<Update<Member>, Err = Traced<database::Error>>,
{
    type Ok = Member;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateMember) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateMember {
            member_id,
            first_name,
            surname,
            national_id,
            tax_id,
            file_number,
            membership_number,
            monotributo,
            started_on,
        } = cmd;

        let mut member = self
            .database()
            .execute(Select(By::<Option<Member>, _>::new(member_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MemberNotExists(member_id))
            .map_err(tracerr::wrap!())?;

        let existing = self
            .database()
            .execute(Select(By::<Vec<Member>, _>::new(
                read::member::Filter::default(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let conflicts = uniqueness::conflicts(
            &uniqueness::Candidate {
                id: Some(member_id),
                national_id: national_id.clone(),
                tax_id: tax_id.clone(),
                file_number: file_number.clone(),
                membership_number: membership_number.clone(),
            },
            &existing,
        );
        if !conflicts.is_empty() {
            return Err(tracerr::new!(E::Uniqueness(conflicts)));
        }

        member.first_name = first_name;
        member.surname = surname;
        member.national_id = national_id;
        member.tax_id = tax_id;
        member.file_number = file_number;
        member.membership_number = membership_number;
        member.monotributo = monotributo;
        member.started_on = started_on;

        self.database()
            .execute(Update(member.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(member)
    }
}

/// Error of [`UpdateMember`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Member`] with the provided ID does not exist.
    #[display("`Member(id: {_0})` does not exist")]
    #[from(ignore)]
    MemberNotExists(#[error(not(source))] member::Id),

    /// Identity fields conflict with existing [`Member`]s.
    #[display("Uniqueness violation: {_0}")]
    #[from(ignore)]
    Uniqueness(#[error(not(source))] member::Conflicts),
}
