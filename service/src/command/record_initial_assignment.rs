//! [`Command`] recording the initial contractor assignment of a [`Member`].

use common::operations::{By, Insert, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{history, member, HistoryEntry, Member, Responsible},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] recording the initial contractor assignment of a [`Member`].
///
/// Check-then-write: if the [`Member`] already has an initial-assignment
/// entry, it is returned unchanged, so retries never produce a second one.
#[derive(Clone, Debug)]
pub struct RecordInitialAssignment {
    /// ID of the [`Member`] to record the assignment of.
    pub member_id: member::Id,

    /// [`Responsible`] performing the recording.
    pub responsible: Responsible,
}

impl<Db> Command<RecordInitialAssignment> for Service<Db>
where
    Db: Database<
            Select<By<Option<Member>, member::Id>>,
            Ok = Option<Member>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<HistoryEntry>, (member::Id, history::Kind)>>,
            Ok = Option<HistoryEntry>,
            Err = Traced<database::Error>,
        > + Database<Insert<HistoryEntry>, Err = Traced<database::Error>>,
{
    type Ok = HistoryEntry;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordInitialAssignment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordInitialAssignment {
            member_id,
            responsible,
        } = cmd;

        let member = self
            .database()
            .execute(Select(By::<Option<Member>, _>::new(member_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MemberNotExists(member_id))
            .map_err(tracerr::wrap!())?;

        let existing = self
            .database()
            .execute(Select(By::<Option<HistoryEntry>, _>::new((
                member_id,
                history::Kind::InitialAssignment,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(entry) = existing {
            return Ok(entry);
        }

        let entry = HistoryEntry {
            id: history::Id::new(),
            member_id,
            kind: history::Kind::InitialAssignment,
            previous_contractor: None,
            new_contractor: member.contractor_id,
            responsible,
            reason: None,
            occurred_at: member.registered_on.midnight(),
            equipment: None,
        };

        self.database()
            .execute(Insert(entry.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(entry)
    }
}

/// Error of [`RecordInitialAssignment`] [`Command`] execution.
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
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        Date,
    };

    use crate::{
        command::RegisterMember,
        domain::{history, HistoryEntry, Responsible},
        infra::{Database as _, Local},
        Config, Service,
    };

    use super::{Command as _, RecordInitialAssignment};

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

    #[tokio::test]
    async fn recording_twice_yields_one_entry() {
        let svc = service();
        let member = svc
            .execute(RegisterMember {
                first_name: "Ana".parse().unwrap(),
                surname: "Gomez".parse().unwrap(),
                national_id: None,
                tax_id: None,
                file_number: None,
                membership_number: None,
                monotributo: false,
                contractor_id: None,
                started_on: None,
                registered_on: Some(
                    Date::from_iso("2024-03-05").unwrap().coerce(),
                ),
                responsible: responsible(),
            })
            .await
            .unwrap();

        // Registration already wrote the initial entry; both retries below
        // must return it instead of appending.
        let first = svc
            .execute(RecordInitialAssignment {
                member_id: member.id,
                responsible: responsible(),
            })
            .await
            .unwrap();
        let second = svc
            .execute(RecordInitialAssignment {
                member_id: member.id,
                responsible: responsible(),
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);

        let entries: Vec<HistoryEntry> = svc
            .database()
            .execute(Select(By::<Vec<HistoryEntry>, _>::new(member.id)))
            .await
            .unwrap();
        let initial = entries
            .iter()
            .filter(|e| e.kind == history::Kind::InitialAssignment)
            .count();
        assert_eq!(initial, 1);
    }
}
