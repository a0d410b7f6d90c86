//! [`Command`] for creating a [`Contractor`].

use common::operations::{By, Insert, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contractor, Contractor},
    infra::{
        database::{self, CONTRACTOR_NAME_CONSTRAINT},
        Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Contractor`].
///
/// Creation has reactivate-on-duplicate-name semantics: a deactivated
/// [`Contractor`] with the same name (case-insensitively) is reactivated
/// and returned instead of inserting a duplicate row, and an active one is
/// returned unchanged.
#[derive(Clone, Debug)]
pub struct CreateContractor {
    /// Name of the [`Contractor`], already trimmed by
    /// [`contractor::Name::new`].
    pub name: contractor::Name,
}

impl<Db> Command<CreateContractor> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contractor>, contractor::Name>>,
            Ok = Option<Contractor>,
            Err = Traced<database::Error>,
        > + Database<Insert<Contractor>, Err = Traced<database::Error>>
        + Database<Update<Contractor>, Err = Traced<database::Error>>,
{
    type Ok = Contractor;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContractor,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContractor { name } = cmd;

        if let Some(existing) = self
            .database()
            .execute(Select(By::<Option<Contractor>, _>::new(name.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return if existing.is_active() {
                Ok(existing)
            } else {
                self.reactivate(existing).await
            };
        }

        let contractor = Contractor {
            id: contractor::Id::new(),
            name: name.clone(),
            deactivated_on: None,
        };

        match self.database().execute(Insert(contractor.clone())).await {
            Ok(_) => Ok(contractor),
            Err(e)
                if e.as_ref()
                    .is_unique_violation(Some(CONTRACTOR_NAME_CONSTRAINT)) =>
            {
                // Concurrent creation of the same name: the row won the
                // race, so re-fetch it and reactivate if needed.
                tracing::warn!(
                    name = %name,
                    "contractor name conflict on insert, re-fetching",
                );
                let existing = self
                    .database()
                    .execute(Select(By::<Option<Contractor>, _>::new(name)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
                match existing {
                    Some(c) if c.is_active() => Ok(c),
                    Some(c) => self.reactivate(c).await,
                    None => {
                        Err(e).map_err(tracerr::map_from_and_wrap!(=> E))
                    }
                }
            }
            Err(e) => Err(e).map_err(tracerr::map_from_and_wrap!(=> E)),
        }
    }
}

impl<Db> Service<Db>
where
    Db: Database<Update<Contractor>, Err = Traced<database::Error>>,
{
    /// Reactivates the provided deactivated [`Contractor`].
    async fn reactivate(
        &self,
        mut contractor: Contractor,
    ) -> Result<Contractor, Traced<ExecutionError>> {
        use ExecutionError as E;

        contractor.deactivated_on = None;
        self.database()
            .execute(Update(contractor.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        Ok(contractor)
    }
}

/// Error of [`CreateContractor`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        Date,
    };

    use crate::{
        domain::Contractor,
        infra::{Database as _, Local},
        read, Config, Service,
    };

    use super::{Command as _, CreateContractor};

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

    #[tokio::test]
    async fn creating_twice_returns_the_same_row() {
        let svc = service();

        let first = svc
            .execute(CreateContractor {
                name: "Acme".parse().unwrap(),
            })
            .await
            .unwrap();
        let second = svc
            .execute(CreateContractor {
                name: "Acme".parse().unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);

        let all: Vec<Contractor> = svc
            .database()
            .execute(Select(By::<Vec<Contractor>, _>::new(
                read::contractor::Filter {
                    include_inactive: true,
                },
            )))
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn trailing_space_duplicate_reactivates_the_existing_row() {
        let svc = service();

        let mut acme = svc
            .execute(CreateContractor {
                name: "Acme".parse().unwrap(),
            })
            .await
            .unwrap();

        // Soft-delete it directly, then create "Acme " again.
        acme.deactivated_on = Some(Date::from_iso("2024-05-01").unwrap().coerce());
        svc.database()
            .execute(common::operations::Update(acme.clone()))
            .await
            .unwrap();

        let reborn = svc
            .execute(CreateContractor {
                name: "Acme ".parse().unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(reborn.id, acme.id);
        assert!(reborn.is_active());

        let all: Vec<Contractor> = svc
            .database()
            .execute(Select(By::<Vec<Contractor>, _>::new(
                read::contractor::Filter {
                    include_inactive: true,
                },
            )))
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn case_differing_duplicate_is_the_same_contractor() {
        let svc = service();

        let first = svc
            .execute(CreateContractor {
                name: "Acme".parse().unwrap(),
            })
            .await
            .unwrap();
        let second = svc
            .execute(CreateContractor {
                name: "ACME".parse().unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        // The original spelling stays.
        assert_eq!(second.name.to_string(), "Acme");
    }
}
