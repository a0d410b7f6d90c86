//! [`Contractor`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{contractor, Contractor},
    infra::{
        database::{
            self,
            local::{self, Local, State},
            CONTRACTOR_NAME_CONSTRAINT,
        },
        Database,
    },
    read,
};

impl Database<Select<By<Option<Contractor>, contractor::Id>>> for Local {
    type Ok = Option<Contractor>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contractor>, contractor::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.state.read().await.contractors.get(&id).cloned())
    }
}

impl Database<Select<By<Option<Contractor>, contractor::Name>>> for Local {
    type Ok = Option<Contractor>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contractor>, contractor::Name>>,
    ) -> Result<Self::Ok, Self::Err> {
        let name = by.into_inner();
        Ok(self
            .state
            .read()
            .await
            .contractors
            .values()
            .find(|c| c.name.matches(&name))
            .cloned())
    }
}

impl Database<Select<By<Vec<Contractor>, read::contractor::Filter>>>
    for Local
{
    type Ok = Vec<Contractor>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contractor>, read::contractor::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::contractor::Filter { include_inactive } = by.into_inner();

        let state = self.state.read().await;
        let mut contractors: Vec<Contractor> = state
            .contractors
            .values()
            .filter(|c| include_inactive || c.is_active())
            .cloned()
            .collect();
        contractors.sort_by(|a, b| {
            AsRef::<str>::as_ref(&a.name).cmp(AsRef::<str>::as_ref(&b.name))
        });

        Ok(contractors)
    }
}

impl Database<Insert<Contractor>> for Local
where
    Self: Database<Update<Contractor>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contractor): Insert<Contractor>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(contractor))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Database<Update<Contractor>> for Local {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contractor): Update<Contractor>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.write().await;

        if name_taken(&state, &contractor) {
            return Err(tracerr::new!(database::Error::Local(
                local::Error::UniqueViolation {
                    constraint: CONTRACTOR_NAME_CONSTRAINT,
                }
            )));
        }

        drop(state.contractors.insert(contractor.id, contractor));
        Ok(())
    }
}

/// Returns whether another [`Contractor`] already carries the candidate's
/// name, case-insensitively.
fn name_taken(state: &State, candidate: &Contractor) -> bool {
    state
        .contractors
        .values()
        .any(|c| c.id != candidate.id && c.name.matches(&candidate.name))
}
