//! [`HistoryEntry`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use postgres_types::Json;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        history::{self, EquipmentSnapshot},
        member, HistoryEntry,
    },
    infra::{
        database::{self, Postgres},
        Database,
    },
};

/// Columns of the member_history table, in select order.
const COLUMNS: &str = "\
    id, member_id, kind, \
    previous_contractor, new_contractor, \
    responsible, reason, \
    occurred_at, equipment";

/// Maps one member_history row onto a [`HistoryEntry`].
fn from_row(row: &Row) -> HistoryEntry {
    HistoryEntry {
        id: row.get("id"),
        member_id: row.get("member_id"),
        kind: row.get("kind"),
        previous_contractor: row.get("previous_contractor"),
        new_contractor: row.get("new_contractor"),
        responsible: row.get("responsible"),
        reason: row.get("reason"),
        occurred_at: row.get("occurred_at"),
        equipment: row
            .get::<_, Option<Json<EquipmentSnapshot>>>("equipment")
            .map(|Json(snapshot)| snapshot),
    }
}

impl Database<Insert<HistoryEntry>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(entry): Insert<HistoryEntry>,
    ) -> Result<Self::Ok, Self::Err> {
        let HistoryEntry {
            id,
            member_id,
            kind,
            previous_contractor,
            new_contractor,
            responsible,
            reason,
            occurred_at,
            equipment,
        } = entry;

        let equipment = equipment.map(Json);

        // Append-only: entries are only ever inserted, never updated.
        const SQL: &str = "\
            INSERT INTO member_history (\
                id, member_id, kind, \
                previous_contractor, new_contractor, \
                responsible, reason, \
                occurred_at, equipment\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::INT2, \
                $4::UUID, $5::UUID, \
                $6::VARCHAR, $7::VARCHAR, \
                $8::TIMESTAMPTZ, $9::JSONB\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &member_id,
                &kind,
                &previous_contractor,
                &new_contractor,
                &responsible,
                &reason,
                &occurred_at,
                &equipment,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl Database<Select<By<Vec<HistoryEntry>, member::Id>>> for Postgres {
    type Ok = Vec<HistoryEntry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<HistoryEntry>, member::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let member_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM member_history \
             WHERE member_id = $1::UUID \
             ORDER BY occurred_at, id",
        );
        Ok(self
            .query(&sql, &[&member_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl Database<Select<By<Option<HistoryEntry>, (member::Id, history::Kind)>>>
    for Postgres
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

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM member_history \
             WHERE member_id = $1::UUID \
               AND kind = $2::INT2 \
             ORDER BY occurred_at \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&member_id, &kind])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}
