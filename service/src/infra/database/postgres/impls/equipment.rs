//! [`EquipmentIssuance`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{member, EquipmentIssuance},
    infra::{
        database::{self, Postgres},
        Database,
    },
};

/// Maps one equipment_issuances row onto an [`EquipmentIssuance`].
fn from_row(row: &Row) -> EquipmentIssuance {
    EquipmentIssuance {
        id: row.get("id"),
        member_id: row.get("member_id"),
        item: row.get("item"),
        size: row.get("size"),
        quantity: row.get("quantity"),
        issued_on: row.get("issued_on"),
        issued_by: row.get("issued_by"),
    }
}

impl Database<Insert<EquipmentIssuance>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(issuance): Insert<EquipmentIssuance>,
    ) -> Result<Self::Ok, Self::Err> {
        let EquipmentIssuance {
            id,
            member_id,
            item,
            size,
            quantity,
            issued_on,
            issued_by,
        } = issuance;

        const SQL: &str = "\
            INSERT INTO equipment_issuances (\
                id, member_id, item, size, \
                quantity, issued_on, issued_by\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, \
                $5::INT4, $6::DATE, $7::VARCHAR\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &member_id,
                &item,
                &size,
                &quantity,
                &issued_on,
                &issued_by,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl Database<Select<By<Vec<EquipmentIssuance>, member::Id>>> for Postgres {
    type Ok = Vec<EquipmentIssuance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<EquipmentIssuance>, member::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let member_id = by.into_inner();

        const SQL: &str = "\
            SELECT id, member_id, item, size, \
                   quantity, issued_on, issued_by \
            FROM equipment_issuances \
            WHERE member_id = $1::UUID \
            ORDER BY issued_on, id";
        Ok(self
            .query(SQL, &[&member_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}
