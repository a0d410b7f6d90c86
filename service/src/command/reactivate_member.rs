//! [`Command`] for reactivating a terminated [`Member`].

use common::{
    operations::{By, Insert, Select, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{history, member, HistoryEntry, Member, Reason, Responsible},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for reactivating a terminated [`Member`].
#[derive(Clone, Debug)]
pub struct ReactivateMember {
    /// ID of the [`Member`] to reactivate.
    pub member_id: member::Id,

    /// [`Responsible`] performing the reactivation.
    pub responsible: Responsible,

    /// [`Reason`] of the reactivation.
    pub reason: Option<Reason>,
}

impl<Db> Command<ReactivateMember> for Service<Db>
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
        cmd: ReactivateMember,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReactivateMember {
            member_id,
            responsible,
            reason,
        } = cmd;

        let mut member = self
            .database()
            .execute(Select(By::<Option<Member>, _>::new(member_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MemberNotExists(member_id))
            .map_err(tracerr::wrap!())?;

        if member.termination.is_none() {
            return Err(tracerr::new!(E::NotTerminated(member_id)));
        }

        member.termination = None;

        self.database()
            .execute(Update(member.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.database()
            .execute(Insert(HistoryEntry {
                id: history::Id::new(),
                member_id,
                kind: history::Kind::Reactivation,
                previous_contractor: None,
                new_contractor: member.contractor_id,
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

/// Error of [`ReactivateMember`] [`Command`] execution.
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

    /// [`Member`] is not terminated.
    #[display("`Member(id: {_0})` is not terminated")]
    #[from(ignore)]
    NotTerminated(#[error(not(source))] member::Id),
}
