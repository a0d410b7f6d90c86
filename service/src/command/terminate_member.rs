//! [`Command`] for terminating a [`Member`].

use common::{
    operations::{By, Insert, Select, Update},
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{history, member, HistoryEntry, Member, Reason, Responsible},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for terminating a [`Member`].
#[derive(Clone, Debug)]
pub struct TerminateMember {
    /// ID of the [`Member`] to terminate.
    pub member_id: member::Id,

    /// [`Responsible`] performing the termination.
    pub responsible: Responsible,

    /// [`Reason`] of the termination.
    pub reason: Option<Reason>,

    /// Date of the termination.
    ///
    /// Defaults to the current date.
    pub on: Option<member::TerminationDate>,
}

impl<Db> Command<TerminateMember> for Service<Db>
where
    Db: Database<
            Select<By<Option<Member>, member::Id>>,
            Ok = Option<Member>,
            Err = Traced<database::Error>,
        > + Database<Update<Member>, Err = Traced<database::Error>>
        + Database<Insert<HistoryEntry>, Err = Traced<database::Error>>,
{
    type Ok = Member;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: TerminateMember,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TerminateMember {
            member_id,
            responsible,
            reason,
            on,
        } = cmd;

        let mut member = self
            .database()
            .execute(Select(By::<Option<Member>, _>::new(member_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MemberNotExists(member_id))
            .map_err(tracerr::wrap!())?;

        // Re-terminating is an explicit error, not a silent no-op:
        // reactivation is its own command.
        if member.termination.is_some() {
            return Err(tracerr::new!(E::AlreadyTerminated(member_id)));
        }

        member.termination = Some(member::Termination {
            on: on.unwrap_or_else(|| Date::today().coerce()),
            responsible: responsible.clone(),
            reason: reason.clone(),
        });

        self.database()
            .execute(Update(member.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.database()
            .execute(Insert(HistoryEntry {
                id: history::Id::new(),
                member_id,
                kind: history::Kind::Termination,
                previous_contractor: member.contractor_id,
                new_contractor: None,
                responsible,
                reason,
                occurred_at: DateTime::now().coerce(),
                equipment: None,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(member)
    }
}

/// Error of [`TerminateMember`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Member`] is already terminated.
    #[display("`Member(id: {_0})` is already terminated")]
    #[from(ignore)]
    AlreadyTerminated(#[error(not(source))] member::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Member`] with the provided ID does not exist.
    #[display("`Member(id: {_0})` does not exist")]
    #[from(ignore)]
    MemberNotExists(#[error(not(source))] member::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        Date,
    };

    use crate::{
        command::{ReactivateMember, RegisterMember},
        domain::{history, HistoryEntry, Member, Responsible},
        infra::{Database as _, Local},
        Config, Service,
    };

    use super::{Command as _, ExecutionError, TerminateMember};

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

    async fn member(svc: &Service<Local>) -> Member {
        svc.execute(RegisterMember {
            first_name: "Ana".parse().unwrap(),
            surname: "Gomez".parse().unwrap(),
            national_id: None,
            tax_id: None,
            file_number: None,
            membership_number: None,
            monotributo: false,
            contractor_id: None,
            started_on: None,
            registered_on: Some(Date::from_iso("2024-03-05").unwrap().coerce()),
            responsible: responsible(),
        })
        .await
        .unwrap()
    }

    fn termination(member: &Member) -> TerminateMember {
        TerminateMember {
            member_id: member.id,
            responsible: responsible(),
            reason: None,
            on: Some(Date::from_iso("2024-06-10").unwrap().coerce()),
        }
    }

    #[tokio::test]
    async fn sets_both_termination_fields_and_appends_history() {
        let svc = service();
        let m = member(&svc).await;

        let terminated = svc.execute(termination(&m)).await.unwrap();

        assert!(!terminated.is_active());
        let t = terminated.termination.unwrap();
        assert_eq!(t.on, Date::from_iso("2024-06-10").unwrap().coerce());
        assert_eq!(t.responsible, responsible());

        let entries: Vec<HistoryEntry> = svc
            .database()
            .execute(Select(By::<Vec<HistoryEntry>, _>::new(m.id)))
            .await
            .unwrap();
        assert!(entries
            .iter()
            .any(|e| e.kind == history::Kind::Termination));
    }

    #[tokio::test]
    async fn terminating_twice_is_an_explicit_error() {
        let svc = service();
        let m = member(&svc).await;

        drop(svc.execute(termination(&m)).await.unwrap());
        let err = svc.execute(termination(&m)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::AlreadyTerminated(id) if *id == m.id,
        ));
    }

    #[tokio::test]
    async fn reactivation_clears_the_termination() {
        let svc = service();
        let m = member(&svc).await;

        drop(svc.execute(termination(&m)).await.unwrap());
        let reactivated = svc
            .execute(ReactivateMember {
                member_id: m.id,
                responsible: responsible(),
                reason: None,
            })
            .await
            .unwrap();

        assert!(reactivated.is_active());

        let entries: Vec<HistoryEntry> = svc
            .database()
            .execute(Select(By::<Vec<HistoryEntry>, _>::new(m.id)))
            .await
            .unwrap();
        assert!(entries
            .iter()
            .any(|e| e.kind == history::Kind::Reactivation));
    }
}
