//! [`Contractor`]-related definitions.

use common::Date;
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, read, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// An organization members work under ("contratista").
#[derive(Clone, Debug)]
pub struct Contractor {
    /// ID of this [`Contractor`].
    pub id: Id,

    /// [`domain::Contractor`] representing this [`Contractor`].
    contractor: OnceCell<domain::Contractor>,
}

impl From<domain::Contractor> for Contractor {
    fn from(contractor: domain::Contractor) -> Self {
        Self {
            id: contractor.id.into(),
            contractor: OnceCell::new_with(Some(contractor)),
        }
    }
}

impl Contractor {
    /// Returns the [`domain::Contractor`] representing this [`Contractor`].
    ///
    /// # Errors
    ///
    /// Error if the [`domain::Contractor`] doesn't exist.
    async fn contractor(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Contractor, Error> {
        let id = self.id.into();
        self.contractor
            .get_or_try_init(|| async {
                ctx.service()
                    .execute(query::contractor::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .await?
                    .ok_or_else(|| api::ContractorError::NotExists.into())
                    .map_err(ctx.error())
            })
            .await
    }
}

/// An organization members work under ("contratista").
#[graphql_object(context = Context)]
impl Contractor {
    /// Unique identifier of this `Contractor`.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Display name of this `Contractor`.
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.contractor(ctx).await?.name.clone().into())
    }

    /// Indicator whether this `Contractor` is active.
    pub async fn active(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.contractor(ctx).await?.is_active())
    }

    /// `Date` when this `Contractor` was deactivated, if it was.
    pub async fn deactivated_on(
        &self,
        ctx: &Context,
    ) -> Result<Option<Date>, Error> {
        Ok(self
            .contractor(ctx)
            .await?
            .deactivated_on
            .map(|d| d.coerce()))
    }

    /// Count of active `Member`s currently assigned to this `Contractor`.
    pub async fn active_members(&self, ctx: &Context) -> Result<i32, Error> {
        ctx.service()
            .execute(query::member::ActiveCount::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|count| {
                i32::try_from(i64::from(count)).unwrap_or(i32::MAX)
            })
    }

    /// Active `Member`s currently assigned to this `Contractor`.
    pub async fn members(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Member>, Error> {
        ctx.service()
            .execute(query::member::List::by(read::member::Filter {
                contractor: Some(self.id.into()),
                active_only: true,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|members| members.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Contractor`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::contractor::Id)]
#[into(domain::contractor::Id)]
#[graphql(name = "ContractorId", transparent)]
pub struct Id(Uuid);

/// Display name of a `Contractor`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ContractorName",
    with = scalar::Via::<domain::contractor::Name>,
)]
pub struct Name(domain::contractor::Name);
