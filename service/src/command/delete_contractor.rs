//! [`Command`] for deactivating a [`Contractor`].

use common::{
    operations::{By, Select, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contractor, Contractor},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for deactivating a [`Contractor`].
///
/// [`Contractor`]s are never physically removed: deletion is a soft-delete
/// refused while any active [`Member`] still references the contractor.
///
/// [`Member`]: crate::domain::Member
#[derive(Clone, Copy, Debug)]
pub struct DeleteContractor {
    /// ID of the [`Contractor`] to deactivate.
    pub contractor_id: contractor::Id,
}

impl<Db> Command<DeleteContractor> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contractor>, contractor::Id>>,
            Ok = Option<Contractor>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::member::ActiveCount, contractor::Id>>,
            Ok = read::member::ActiveCount,
            Err = Traced<database::Error>,
        > + Database<Update<Contractor>, Err = Traced<database::Error>>,
{
    type Ok = Contractor;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteContractor,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteContractor { contractor_id } = cmd;

        let mut contractor = self
            .database()
            .execute(Select(By::<Option<Contractor>, _>::new(contractor_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractorNotExists(contractor_id))
            .map_err(tracerr::wrap!())?;

        if !contractor.is_active() {
            return Ok(contractor);
        }

        let assigned = self
            .database()
            .execute(Select(By::<read::member::ActiveCount, _>::new(
                contractor_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !assigned.is_zero() {
            return Err(tracerr::new!(E::MembersStillAssigned(
                assigned.into()
            )));
        }

        contractor.deactivated_on = Some(Date::today().coerce());
        self.database()
            .execute(Update(contractor.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contractor)
    }
}

/// Error of [`DeleteContractor`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contractor`] with the provided ID does not exist.
    #[display("`Contractor(id: {_0})` does not exist")]
    #[from(ignore)]
    ContractorNotExists(#[error(not(source))] contractor::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Active [`Member`]s still reference the [`Contractor`].
    ///
    /// Carries the blocking count so the caller can render it.
    ///
    /// [`Member`]: crate::domain::Member
    #[display("{_0} active member(s) are still assigned to the contractor")]
    #[from(ignore)]
    MembersStillAssigned(#[error(not(source))] i64),
}

#[cfg(test)]
mod spec {
    use common::Date;

    use crate::{
        command::{CreateContractor, RegisterMember, TerminateMember},
        domain::{Contractor, Member, Responsible},
        infra::Local,
        Config, Service,
    };

    use super::{Command as _, DeleteContractor, ExecutionError};

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

    fn responsible() -> Responsible {
        Responsible::new("J. Perez").unwrap()
    }

    async fn contractor(svc: &Service<Local>) -> Contractor {
        svc.execute(CreateContractor {
            name: "Acme".parse().unwrap(),
        })
        .await
        .unwrap()
    }

    async fn member(svc: &Service<Local>, contractor: &Contractor) -> Member {
        svc.execute(RegisterMember {
            first_name: "Ana".parse().unwrap(),
            surname: "Gomez".parse().unwrap(),
            national_id: None,
            tax_id: None,
            file_number: None,
            membership_number: None,
            monotributo: false,
            contractor_id: Some(contractor.id),
            started_on: None,
            registered_on: Some(Date::from_iso("2024-03-05").unwrap().coerce()),
            responsible: responsible(),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn refuses_while_active_members_reference_it() {
        let svc = service();
        let acme = contractor(&svc).await;
        drop(member(&svc, &acme).await);

        let err = svc
            .execute(DeleteContractor {
                contractor_id: acme.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::MembersStillAssigned(1),
        ));
    }

    #[tokio::test]
    async fn deactivates_once_members_are_terminated() {
        let svc = service();
        let acme = contractor(&svc).await;
        let m = member(&svc, &acme).await;

        drop(
            svc.execute(TerminateMember {
                member_id: m.id,
                responsible: responsible(),
                reason: None,
                on: Some(Date::from_iso("2024-06-10").unwrap().coerce()),
            })
            .await
            .unwrap(),
        );

        let deleted = svc
            .execute(DeleteContractor {
                contractor_id: acme.id,
            })
            .await
            .unwrap();

        assert!(!deleted.is_active());
    }
}
