//! [`EquipmentIssuance`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;
use uuid::Uuid;

use crate::{
    domain::{member, EquipmentIssuance},
    infra::{
        database::{self, local::Local},
        Database,
    },
};

impl Database<Insert<EquipmentIssuance>> for Local {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(issuance): Insert<EquipmentIssuance>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state.write().await.equipment.push(issuance);
        Ok(())
    }
}

impl Database<Select<By<Vec<EquipmentIssuance>, member::Id>>> for Local {
    type Ok = Vec<EquipmentIssuance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<EquipmentIssuance>, member::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let member_id = by.into_inner();

        let state = self.state.read().await;
        let mut issuances: Vec<EquipmentIssuance> = state
            .equipment
            .iter()
            .filter(|i| i.member_id == member_id)
            .cloned()
            .collect();
        issuances.sort_by_key(|i| (i.issued_on, Uuid::from(i.id)));

        Ok(issuances)
    }
}
