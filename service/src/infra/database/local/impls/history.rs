//! [`HistoryEntry`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{history, member, HistoryEntry},
    infra::{
        database::{
            self,
            local::{self, Local},
        },
        Database,
    },
};

/// Unique constraint keeping at most one initial-assignment entry per
/// member, mirroring the SQL schema.
const INITIAL_ASSIGNMENT_CONSTRAINT: &str = "member_history_initial_uniq";

impl Database<Insert<HistoryEntry>> for Local {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(entry): Insert<HistoryEntry>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.write().await;

        if entry.kind == history::Kind::InitialAssignment
            && state.history.iter().any(|e| {
                e.member_id == entry.member_id
                    && e.kind == history::Kind::InitialAssignment
            })
        {
            return Err(tracerr::new!(database::Error::Local(
                local::Error::UniqueViolation {
                    constraint: INITIAL_ASSIGNMENT_CONSTRAINT,
                }
            )));
        }

        state.history.push(entry);
        Ok(())
    }
}

impl Database<Select<By<Vec<HistoryEntry>, member::Id>>> for Local {
    type Ok = Vec<HistoryEntry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<HistoryEntry>, member::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let member_id = by.into_inner();

        let state = self.state.read().await;
        let mut entries: Vec<HistoryEntry> = state
            .history
            .iter()
            .filter(|e| e.member_id == member_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.occurred_at);

        Ok(entries)
    }
}

impl Database<Select<By<Option<HistoryEntry>, (member::Id, history::Kind)>>>
    for Local
{
    type Ok = Option<HistoryEntry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<HistoryEntry>, (member::Id, history::Kind)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (member_id, kind) = by.into_inner();

        Ok(self
            .state
            .read()
            .await
            .history
            .iter()
            .filter(|e| e.member_id == member_id && e.kind == kind)
            .min_by_key(|e| e.occurred_at)
            .cloned())
    }
}
