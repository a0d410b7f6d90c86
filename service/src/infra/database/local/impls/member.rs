//! [`Member`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;
use uuid::Uuid;

use crate::{
    domain::{member, Member},
    infra::{
        database::{
            self,
            local::{self, Local, State},
        },
        Database,
    },
    read,
};

/// Unique constraints of the members table, mirroring the SQL schema.
const NATIONAL_ID_CONSTRAINT: &str = "members_national_id_uniq";
/// Unique constraint of the fiscal identifier column.
const TAX_ID_CONSTRAINT: &str = "members_tax_id_uniq";
/// Unique constraint of the file number column.
const FILE_NUMBER_CONSTRAINT: &str = "members_file_number_uniq";
/// Unique constraint of the membership number column.
const MEMBERSHIP_NUMBER_CONSTRAINT: &str = "members_membership_number_uniq";

impl Database<Select<By<Option<Member>, member::Id>>> for Local {
    type Ok = Option<Member>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Member>, member::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.state.read().await.members.get(&id).cloned())
    }
}

impl Database<Select<By<Vec<Member>, read::member::Filter>>> for Local {
    type Ok = Vec<Member>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Member>, read::member::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::member::Filter {
            contractor,
            active_only,
        } = by.into_inner();

        let state = self.state.read().await;
        let mut members: Vec<Member> = state
            .members
            .values()
            .filter(|m| {
                contractor.map_or(true, |c| m.contractor_id == Some(c))
            })
            .filter(|m| !active_only || m.is_active())
            .cloned()
            .collect();
        members.sort_by_key(|m| (m.registered_on, Uuid::from(m.id)));

        Ok(members)
    }
}

impl Database<Select<By<read::member::ActiveCount, crate::domain::contractor::Id>>>
    for Local
{
    type Ok = read::member::ActiveCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::member::ActiveCount, crate::domain::contractor::Id>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let count = self
            .state
            .read()
            .await
            .members
            .values()
            .filter(|m| m.contractor_id == Some(id) && m.is_active())
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX).into())
    }
}

impl Database<Insert<Member>> for Local
where
    Self: Database<Update<Member>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(member): Insert<Member>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(member)).await.map_err(tracerr::wrap!())
    }
}

impl Database<Update<Member>> for Local {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(member): Update<Member>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.write().await;

        if let Some(constraint) = conflict(&state, &member) {
            return Err(tracerr::new!(database::Error::Local(
                local::Error::UniqueViolation { constraint }
            )));
        }

        drop(state.members.insert(member.id, member));
        Ok(())
    }
}

/// Returns the name of the first unique constraint the provided candidate
/// [`Member`] violates, if any.
fn conflict(state: &State, candidate: &Member) -> Option<&'static str> {
    for existing in state.members.values() {
        if existing.id == candidate.id {
            continue;
        }

        if clash(
            candidate.national_id.as_ref(),
            existing.national_id.as_ref(),
        ) {
            return Some(NATIONAL_ID_CONSTRAINT);
        }
        if clash(candidate.tax_id.as_ref(), existing.tax_id.as_ref()) {
            return Some(TAX_ID_CONSTRAINT);
        }
        if clash(
            candidate.file_number.as_ref(),
            existing.file_number.as_ref(),
        ) {
            return Some(FILE_NUMBER_CONSTRAINT);
        }
        if clash(
            candidate.membership_number.as_ref(),
            existing.membership_number.as_ref(),
        ) {
            return Some(MEMBERSHIP_NUMBER_CONSTRAINT);
        }
    }
    None
}

/// Compares two optional identity values the way the SQL indexes do:
/// trimmed, case-insensitively, with unset values never clashing.
fn clash<T: AsRef<str>>(candidate: Option<&T>, existing: Option<&T>) -> bool {
    match (candidate, existing) {
        (Some(c), Some(e)) => {
            c.as_ref().trim().eq_ignore_ascii_case(e.as_ref().trim())
        }
        _ => false,
    }
}
