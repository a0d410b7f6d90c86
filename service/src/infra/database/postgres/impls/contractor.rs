//! [`Contractor`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{contractor, Contractor},
    infra::{
        database::{self, Postgres},
        Database,
    },
    read,
};

/// Maps one contractors row onto a [`Contractor`].
fn from_row(row: &Row) -> Contractor {
    Contractor {
        id: row.get("id"),
        name: row.get("name"),
        deactivated_on: row.get("deactivated_on"),
    }
}

impl Database<Select<By<Option<Contractor>, contractor::Id>>> for Postgres {
    type Ok = Option<Contractor>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contractor>, contractor::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, deactivated_on \
            FROM contractors \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl Database<Select<By<Option<Contractor>, contractor::Name>>> for Postgres {
    type Ok = Option<Contractor>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contractor>, contractor::Name>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let name: contractor::Name = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, deactivated_on \
            FROM contractors \
            WHERE LOWER(name) = LOWER($1::VARCHAR) \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&name])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl Database<Select<By<Vec<Contractor>, read::contractor::Filter>>>
    for Postgres
{
    type Ok = Vec<Contractor>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contractor>, read::contractor::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::contractor::Filter { include_inactive } = by.into_inner();

        let active_filtering = if include_inactive {
            ""
        } else {
            "AND deactivated_on IS NULL"
        };

        let sql = format!(
            "SELECT id, name, deactivated_on \
             FROM contractors \
             WHERE TRUE \
                   {active_filtering} \
             ORDER BY name",
        );
        Ok(self
            .query(&sql, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl Database<Insert<Contractor>> for Postgres
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

impl Database<Update<Contractor>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contractor): Update<Contractor>,
    ) -> Result<Self::Ok, Self::Err> {
        let Contractor {
            id,
            name,
            deactivated_on,
        } = contractor;

        const SQL: &str = "\
            INSERT INTO contractors (id, name, deactivated_on) \
            VALUES ($1::UUID, $2::VARCHAR, $3::DATE) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                deactivated_on = EXCLUDED.deactivated_on";
        self.exec(SQL, &[&id, &name, &deactivated_on])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
