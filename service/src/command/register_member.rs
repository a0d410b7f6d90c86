//! [`Command`] for registering a new [`Member`].

use common::{
    operations::{By, Insert, Select},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        contractor, history,
        member::{self, uniqueness},
        Contractor, HistoryEntry, Member, Responsible,
    },
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for registering a new [`Member`].
#[derive(Clone, Debug)]
pub struct RegisterMember {
    /// First name of the new [`Member`].
    pub first_name: member::FirstName,

    /// Surname of the new [`Member`].
    pub surname: member::Surname,

    /// National identity document number of the new [`Member`].
    pub national_id: Option<member::NationalId>,

    /// Fiscal identifier of the new [`Member`].
    pub tax_id: Option<member::TaxId>,

    /// Internal file number of the new [`Member`].
    pub file_number: Option<member::FileNumber>,

    /// Membership number of the new [`Member`].
    pub membership_number: Option<member::MembershipNumber>,

    /// Indicator whether the new [`Member`] is under the "monotributo" tax
    /// regime.
    pub monotributo: bool,

    /// ID of the [`Contractor`] the new [`Member`] is assigned to.
    pub contractor_id: Option<contractor::Id>,

    /// Date when the new [`Member`] began working.
    pub started_on: Option<member::StartDate>,

    /// Date when the new [`Member`] is registered.
    ///
    /// Defaults to the current date.
    pub registered_on: Option<member::RegistrationDate>,

    /// [`Responsible`] performing the registration.
    pub responsible: Responsible,
}

impl<Db> Command<RegisterMember> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contractor>, contractor::Id>>,
            Ok = Option<Contractor>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Member>, read::member::Filter>>,
            Ok = Vec<Member>,
            Err = Traced<database::Error>,
        > + Database<Insert<Member>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<HistoryEntry>, (member::Id, history::Kind)>>,
            Ok = Option<HistoryEntry>,
            Err = Traced<database::Error>,
        > + Database<Insert<HistoryEntry>, Err = Traced<database::Error>>,
{
    type Ok = Member;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterMember,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterMember {
            first_name,
            surname,
            national_id,
            tax_id,
            file_number,
            membership_number,
            monotributo,
            contractor_id,
            started_on,
            registered_on,
            responsible,
        } = cmd;

        if let Some(id) = contractor_id {
            let contractor = self
                .database()
                .execute(Select(By::<Option<Contractor>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::ContractorNotExists(id))
                .map_err(tracerr::wrap!())?;
            if !contractor.is_active() {
                return Err(tracerr::new!(E::ContractorInactive(id)));
            }
        }

        let existing = self
            .database()
            .execute(Select(By::<Vec<Member>, _>::new(
                read::member::Filter::default(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let conflicts = uniqueness::conflicts(
            &uniqueness::Candidate {
                id: None,
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

        let member = Member {
            id: member::Id::new(),
            first_name,
            surname,
            national_id,
            tax_id,
            file_number,
            membership_number,
            monotributo,
            contractor_id,
            started_on,
            registered_on: registered_on
                .unwrap_or_else(|| Date::today().coerce()),
            termination: None,
        };

        self.database()
            .execute(Insert(member.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Check-then-write, same as the standalone retry command, so the
        // member ends up with exactly one initial-assignment entry.
        let initial = self
            .database()
            .execute(Select(By::<Option<HistoryEntry>, _>::new((
                member.id,
                history::Kind::InitialAssignment,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if initial.is_none() {
            self.database()
                .execute(Insert(HistoryEntry {
                    id: history::Id::new(),
                    member_id: member.id,
                    kind: history::Kind::InitialAssignment,
                    previous_contractor: None,
                    new_contractor: member.contractor_id,
                    responsible,
                    reason: None,
                    occurred_at: member.registered_on.midnight(),
                    equipment: None,
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        Ok(member)
    }
}

/// Error of [`RegisterMember`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contractor`] is deactivated.
    #[display("`Contractor(id: {_0})` is deactivated")]
    #[from(ignore)]
    ContractorInactive(#[error(not(source))] contractor::Id),

    /// [`Contractor`] with the provided ID does not exist.
    #[display("`Contractor(id: {_0})` does not exist")]
    #[from(ignore)]
    ContractorNotExists(#[error(not(source))] contractor::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Identity fields conflict with existing [`Member`]s.
    #[display("Uniqueness violation: {_0}")]
    #[from(ignore)]
    Uniqueness(#[error(not(source))] member::Conflicts),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        Date,
    };

    use crate::{
        domain::{history, HistoryEntry, Responsible},
        infra::{Database as _, Local},
        Config, Service,
    };

    use super::{Command as _, ExecutionError, RegisterMember};

    fn service() -> Service<Local> {
        Service::new(
            Config {
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                    b"test",
                ),
            },
            Local::new(),
        )
    }

    fn registration(national_id: &str) -> RegisterMember {
        RegisterMember {
            first_name: "Ana".parse().unwrap(),
            surname: "Gomez".parse().unwrap(),
            national_id: Some(national_id.parse().unwrap()),
            tax_id: None,
            file_number: None,
            membership_number: None,
            monotributo: false,
            contractor_id: None,
            started_on: None,
            registered_on: Some(
                Date::from_iso("2024-03-05").unwrap().coerce(),
            ),
            responsible: Responsible::new("J. Perez").unwrap(),
        }
    }

    #[tokio::test]
    async fn writes_exactly_one_initial_assignment_entry() {
        let svc = service();

        let member = svc.execute(registration("30111222")).await.unwrap();

        let entries: Vec<HistoryEntry> = svc
            .database()
            .execute(Select(By::<Vec<HistoryEntry>, _>::new(member.id)))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, history::Kind::InitialAssignment);
        assert_eq!(entries[0].new_contractor, None);
        assert_eq!(
            entries[0].occurred_at,
            Date::from_iso("2024-03-05").unwrap().midnight(),
        );
    }

    #[tokio::test]
    async fn rejects_duplicate_national_id() {
        let svc = service();

        drop(svc.execute(registration("30111222")).await.unwrap());
        let err = svc.execute(registration("30111222")).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::Uniqueness(conflicts)
                if !conflicts.is_empty()
        ));
    }

    #[tokio::test]
    async fn distinct_national_ids_register_fine() {
        let svc = service();

        drop(svc.execute(registration("30111222")).await.unwrap());
        let second = svc.execute(registration("30111223")).await.unwrap();

        assert!(second.is_active());
    }
}
