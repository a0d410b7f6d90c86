//! [`Command`] for reassigning a [`Member`] to another [`Contractor`].

use common::{
    operations::{By, Insert, Select, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        contractor, history, member, Contractor, EquipmentIssuance,
        HistoryEntry, Member, Reason, Responsible,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for reassigning a [`Member`] to another [`Contractor`].
#[derive(Clone, Debug)]
pub struct ReassignContractor {
    /// ID of the [`Member`] to reassign.
    pub member_id: member::Id,

    /// ID of the [`Contractor`] to assign the [`Member`] to.
    pub new_contractor_id: contractor::Id,

    /// [`Responsible`] performing the reassignment.
    pub responsible: Responsible,

    /// [`Reason`] of the reassignment.
    pub reason: Option<Reason>,
}

impl<Db> Command<ReassignContractor> for Service<Db>
where
    Db: Database<
            Select<By<Option<Member>, member::Id>>,
            Ok = Option<Member>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contractor>, contractor::Id>>,
            Ok = Option<Contractor>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<EquipmentIssuance>, member::Id>>,
            Ok = Vec<EquipmentIssuance>,
            Err = Traced<database::Error>,
        > + Database<Insert<HistoryEntry>, Err = Traced<database::Error>>
        + Database<Update<Member>, Err = Traced<database::Error>>,
{
    type Ok = Member;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReassignContractor,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReassignContractor {
            member_id,
            new_contractor_id,
            responsible,
            reason,
        } = cmd;

        let mut member = self
            .database()
            .execute(Select(By::<Option<Member>, _>::new(member_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MemberNotExists(member_id))
            .map_err(tracerr::wrap!())?;

        // Identifier equality: reassigning to the current contractor writes
        // nothing and returns the member unchanged.
        if member.contractor_id == Some(new_contractor_id) {
            return Ok(member);
        }

        let new_contractor = self
            .database()
            .execute(Select(By::<Option<Contractor>, _>::new(
                new_contractor_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractorNotExists(new_contractor_id))
            .map_err(tracerr::wrap!())?;
        if !new_contractor.is_active() {
            return Err(tracerr::new!(E::ContractorInactive(
                new_contractor_id
            )));
        }

        let previous = match member.contractor_id {
            Some(id) => Some(
                self.database()
                    .execute(Select(By::<Option<Contractor>, _>::new(id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::ContractorNotExists(id))
                    .map_err(tracerr::wrap!())?,
            ),
            None => None,
        };

        // The snapshot means "equipment issued while assigned to the
        // previous contractor", so it is captured strictly before the
        // pointer moves.
        let equipment = match &previous {
            Some(previous) => {
                let issuances = self
                    .database()
                    .execute(Select(By::<Vec<EquipmentIssuance>, _>::new(
                        member_id,
                    )))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
                Some(history::EquipmentSnapshot::capture(
                    previous.name.clone(),
                    &issuances,
                ))
            }
            None => None,
        };

        // The history append and the pointer update below are two
        // independent remote writes: a crash in between leaves the entry
        // written with the pointer stale. Accepted inconsistency window,
        // since the design has no multi-statement transactions.
        self.database()
            .execute(Insert(HistoryEntry {
                id: history::Id::new(),
                member_id,
                kind: history::Kind::ContractorChange,
                previous_contractor: member.contractor_id,
                new_contractor: Some(new_contractor_id),
                responsible,
                reason,
                occurred_at: DateTime::now().coerce(),
                equipment,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        member.contractor_id = Some(new_contractor_id);
        self.database()
            .execute(Update(member.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(member)
    }
}

/// Error of [`ReassignContractor`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contractor`] is deactivated.
    #[display("`Contractor(id: {_0})` is deactivated")]
    #[from(ignore)]
    ContractorInactive(#[error(not(source))] contractor::Id),

    /// [`Contractor`] with the provided ID does not exist.
    #[display("`Contractor(id: {_0})` does not exist")]
    #[from(ignore)]
    ContractorNotExists(#[error(not(source))] contractor::Id),

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
        operations::{By, Insert, Select},
        Date, DateTime,
    };

    use crate::{
        command::{
            CreateContractor, RecordEquipmentIssuance, RegisterMember,
        },
        domain::{
            history, Contractor, HistoryEntry, Member, Responsible,
        },
        infra::{Database as _, Local},
        Config, Service,
    };

    use super::{Command as _, ReassignContractor};

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

    async fn contractor(svc: &Service<Local>, name: &str) -> Contractor {
        svc.execute(CreateContractor {
            name: name.parse().unwrap(),
        })
        .await
        .unwrap()
    }

    async fn member(
        svc: &Service<Local>,
        contractor: Option<&Contractor>,
    ) -> Member {
        svc.execute(RegisterMember {
            first_name: "Ana".parse().unwrap(),
            surname: "Gomez".parse().unwrap(),
            national_id: None,
            tax_id: None,
            file_number: None,
            membership_number: None,
            monotributo: false,
            contractor_id: contractor.map(|c| c.id),
            started_on: None,
            registered_on: Some(Date::from_iso("2024-03-05").unwrap().coerce()),
            responsible: responsible(),
        })
        .await
        .unwrap()
    }

    async fn history_of(
        svc: &Service<Local>,
        member: &Member,
    ) -> Vec<HistoryEntry> {
        svc.database()
            .execute(Select(By::<Vec<HistoryEntry>, _>::new(member.id)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn same_contractor_is_a_no_op() {
        let svc = service();
        let acme = contractor(&svc, "Acme").await;
        let m = member(&svc, Some(&acme)).await;

        let unchanged = svc
            .execute(ReassignContractor {
                member_id: m.id,
                new_contractor_id: acme.id,
                responsible: responsible(),
                reason: None,
            })
            .await
            .unwrap();

        assert_eq!(unchanged.contractor_id, Some(acme.id));
        // Only the initial-assignment entry exists, nothing was appended.
        let entries = history_of(&svc, &m).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, history::Kind::InitialAssignment);
    }

    #[tokio::test]
    async fn snapshot_is_tagged_with_the_previous_contractor() {
        let svc = service();
        let acme = contractor(&svc, "Acme").await;
        let zenith = contractor(&svc, "Zenith").await;
        let m = member(&svc, Some(&acme)).await;

        drop(
            svc.execute(RecordEquipmentIssuance {
                member_id: m.id,
                item: "Casco".parse().unwrap(),
                size: None,
                quantity: crate::domain::equipment::Quantity::new(2).unwrap(),
                issued_on: None,
                issued_by: responsible(),
            })
            .await
            .unwrap(),
        );

        let reassigned = svc
            .execute(ReassignContractor {
                member_id: m.id,
                new_contractor_id: zenith.id,
                responsible: responsible(),
                reason: None,
            })
            .await
            .unwrap();

        // The pointer moved, while the snapshot still names the previous
        // contractor the equipment was issued under.
        assert_eq!(reassigned.contractor_id, Some(zenith.id));
        let entries = history_of(&svc, &m).await;
        let change = entries
            .iter()
            .find(|e| e.kind == history::Kind::ContractorChange)
            .unwrap();
        assert_eq!(change.previous_contractor, Some(acme.id));
        assert_eq!(change.new_contractor, Some(zenith.id));
        let snapshot = change.equipment.as_ref().unwrap();
        assert_eq!(snapshot.contractor, acme.name);
        assert_eq!(snapshot.total_quantity, 2);
        assert_eq!(snapshot.items.len(), 1);
    }

    #[tokio::test]
    async fn interrupted_sequence_leaves_history_without_pointer() {
        // The append and the pointer update are independent writes; this
        // pins the accepted inconsistency window by stopping after the
        // first one.
        let svc = service();
        let acme = contractor(&svc, "Acme").await;
        let zenith = contractor(&svc, "Zenith").await;
        let m = member(&svc, Some(&acme)).await;

        svc.database()
            .execute(Insert(HistoryEntry {
                id: history::Id::new(),
                member_id: m.id,
                kind: history::Kind::ContractorChange,
                previous_contractor: Some(acme.id),
                new_contractor: Some(zenith.id),
                responsible: responsible(),
                reason: None,
                occurred_at: DateTime::now().coerce(),
                equipment: None,
            }))
            .await
            .unwrap();

        let stale: Option<Member> = svc
            .database()
            .execute(Select(By::<Option<Member>, _>::new(m.id)))
            .await
            .unwrap();
        assert_eq!(stale.unwrap().contractor_id, Some(acme.id));
        assert_eq!(history_of(&svc, &m).await.len(), 2);
    }
}
