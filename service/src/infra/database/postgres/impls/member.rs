//! [`Member`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::{types::ToSql, Row};
use tracerr::Traced;

use crate::{
    domain::{contractor, member, Member, Responsible},
    infra::{
        database::{self, Postgres},
        Database,
    },
    read,
};

/// Columns of the members table, in select order.
const COLUMNS: &str = "\
    id, first_name, surname, \
    national_id, tax_id, \
    file_number, membership_number, \
    monotributo, contractor_id, \
    started_on, registered_on, \
    terminated_on, terminated_by, termination_reason";

/// Maps one members row onto a [`Member`].
fn from_row(row: &Row) -> Member {
    let termination = match (
        row.get::<_, Option<member::TerminationDate>>("terminated_on"),
        row.get::<_, Option<Responsible>>("terminated_by"),
    ) {
        (Some(on), Some(responsible)) => Some(member::Termination {
            on,
            responsible,
            reason: row.get("termination_reason"),
        }),
        _ => None,
    };

    Member {
        id: row.get("id"),
        first_name: row.get("first_name"),
        surname: row.get("surname"),
        national_id: row.get("national_id"),
        tax_id: row.get("tax_id"),
        file_number: row.get("file_number"),
        membership_number: row.get("membership_number"),
        monotributo: row.get("monotributo"),
        contractor_id: row.get("contractor_id"),
        started_on: row.get("started_on"),
        registered_on: row.get("registered_on"),
        termination,
    }
}

impl Database<Select<By<Option<Member>, member::Id>>> for Postgres {
    type Ok = Option<Member>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Member>, member::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM members \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl Database<Select<By<Vec<Member>, read::member::Filter>>> for Postgres {
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

        let mut ps: Vec<&(dyn ToSql + Sync)> = Vec::new();

        let contractor_filtering = if let Some(c) = contractor.as_ref() {
            ps.push(c);
            "AND contractor_id = $1::UUID"
        } else {
            ""
        };
        let active_filtering = if active_only {
            "AND terminated_on IS NULL"
        } else {
            ""
        };

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM members \
             WHERE TRUE \
                   {contractor_filtering} \
                   {active_filtering} \
             ORDER BY registered_on, id",
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl Database<Select<By<read::member::ActiveCount, contractor::Id>>>
    for Postgres
{
    type Ok = read::member::ActiveCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::member::ActiveCount, contractor::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: contractor::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT8 \
            FROM members \
            WHERE contractor_id = $1::UUID \
              AND terminated_on IS NULL";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i64>(0).into())
    }
}

impl Database<Insert<Member>> for Postgres
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

impl Database<Update<Member>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(member): Update<Member>,
    ) -> Result<Self::Ok, Self::Err> {
        let Member {
            id,
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
            termination,
        } = member;

        let (terminated_on, terminated_by, termination_reason) =
            match termination {
                Some(t) => (Some(t.on), Some(t.responsible), t.reason),
                None => (None, None, None),
            };

        const SQL: &str = "\
            INSERT INTO members (\
                id, first_name, surname, \
                national_id, tax_id, \
                file_number, membership_number, \
                monotributo, contractor_id, \
                started_on, registered_on, \
                terminated_on, terminated_by, termination_reason\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, \
                $4::VARCHAR, $5::VARCHAR, \
                $6::VARCHAR, $7::VARCHAR, \
                $8::BOOL, $9::UUID, \
                $10::DATE, $11::DATE, \
                $12::DATE, $13::VARCHAR, $14::VARCHAR\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET first_name = EXCLUDED.first_name, \
                surname = EXCLUDED.surname, \
                national_id = EXCLUDED.national_id, \
                tax_id = EXCLUDED.tax_id, \
                file_number = EXCLUDED.file_number, \
                membership_number = EXCLUDED.membership_number, \
                monotributo = EXCLUDED.monotributo, \
                contractor_id = EXCLUDED.contractor_id, \
                started_on = EXCLUDED.started_on, \
                registered_on = EXCLUDED.registered_on, \
                terminated_on = EXCLUDED.terminated_on, \
                terminated_by = EXCLUDED.terminated_by, \
                termination_reason = EXCLUDED.termination_reason";
        self.exec(
            SQL,
            &[
                &id,
                &first_name,
                &surname,
                &national_id,
                &tax_id,
                &file_number,
                &membership_number,
                &monotributo,
                &contractor_id,
                &started_on,
                &registered_on,
                &terminated_on,
                &terminated_by,
                &termination_reason,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
