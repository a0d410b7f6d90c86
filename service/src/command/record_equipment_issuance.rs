//! [`Command`] for recording an [`EquipmentIssuance`].

use common::{
    operations::{By, Insert, Select},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{equipment, member, EquipmentIssuance, Member, Responsible},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording an [`EquipmentIssuance`].
#[derive(Clone, Debug)]
pub struct RecordEquipmentIssuance {
    /// ID of the [`Member`] the equipment is issued to.
    pub member_id: member::Id,

    /// Issued item.
    pub item: equipment::Item,

    /// Size of the issued item.
    pub size: Option<equipment::Size>,

    /// Issued quantity.
    pub quantity: equipment::Quantity,

    /// Date of the issuance.
    ///
    /// Defaults to the current date.
    pub issued_on: Option<equipment::IssuanceDate>,

    /// [`Responsible`] issuing the equipment.
    pub issued_by: Responsible,
}

impl<Db> Command<RecordEquipmentIssuance> for Service<Db>
where
    Db: Database<
            Select<By<Option<Member>, member::Id>>,
            Ok = Option<Member>,
            Err = Traced<database::Error>,
        > + Database<Insert<EquipmentIssuance>, Err = Traced<database::Error>>,
{
    type Ok = EquipmentIssuance;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordEquipmentIssuance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordEquipmentIssuance {
            member_id,
            item,
            size,
            quantity,
            issued_on,
            issued_by,
        } = cmd;

        drop(
            self.database()
                .execute(Select(By::<Option<Member>, _>::new(member_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::MemberNotExists(member_id))
                .map_err(tracerr::wrap!())?,
        );

        let issuance = EquipmentIssuance {
            id: equipment::Id::new(),
            member_id,
            item,
            size,
            quantity,
            issued_on: issued_on.unwrap_or_else(|| Date::today().coerce()),
            issued_by,
        };

        self.database()
            .execute(Insert(issuance.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(issuance)
    }
}

/// Error of [`RecordEquipmentIssuance`] [`Command`] execution.
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
