//! [`Member`]-related definitions.

use common::Date;
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A member ("asociado") of the cooperative.
#[derive(Clone, Debug)]
pub struct Member {
    /// ID of this [`Member`].
    pub id: Id,

    /// [`domain::Member`] representing this [`Member`].
    member: OnceCell<domain::Member>,
}

impl From<domain::Member> for Member {
    fn from(member: domain::Member) -> Self {
        Self {
            id: member.id.into(),
            member: OnceCell::new_with(Some(member)),
        }
    }
}

impl Member {
    /// Returns the [`domain::Member`] representing this [`Member`].
    ///
    /// # Errors
    ///
    /// Error if the [`domain::Member`] doesn't exist.
    async fn member(&self, ctx: &Context) -> Result<&domain::Member, Error> {
        let id = self.id.into();
        self.member
            .get_or_try_init(|| async {
                ctx.service()
                    .execute(query::member::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .await?
                    .ok_or_else(|| api::MemberError::NotExists.into())
                    .map_err(ctx.error())
            })
            .await
    }
}

/// A member ("asociado") of the cooperative.
#[graphql_object(context = Context)]
impl Member {
    /// Unique identifier of this `Member`.
    pub fn id(&self) -> Id {
        self.id
    }

    /// First name of this `Member`.
    pub async fn first_name(&self, ctx: &Context) -> Result<FirstName, Error> {
        Ok(self.member(ctx).await?.first_name.clone().into())
    }

    /// Surname of this `Member`.
    pub async fn surname(&self, ctx: &Context) -> Result<Surname, Error> {
        Ok(self.member(ctx).await?.surname.clone().into())
    }

    /// National identity document number (DNI) of this `Member`.
    pub async fn national_id(
        &self,
        ctx: &Context,
    ) -> Result<Option<NationalId>, Error> {
        Ok(self.member(ctx).await?.national_id.clone().map(Into::into))
    }

    /// Fiscal identifier (CUIT) of this `Member`.
    pub async fn tax_id(&self, ctx: &Context) -> Result<Option<TaxId>, Error> {
        Ok(self.member(ctx).await?.tax_id.clone().map(Into::into))
    }

    /// Internal file number ("legajo") of this `Member`.
    pub async fn file_number(
        &self,
        ctx: &Context,
    ) -> Result<Option<FileNumber>, Error> {
        Ok(self.member(ctx).await?.file_number.clone().map(Into::into))
    }

    /// Membership number of this `Member`.
    pub async fn membership_number(
        &self,
        ctx: &Context,
    ) -> Result<Option<MembershipNumber>, Error> {
        Ok(self
            .member(ctx)
            .await?
            .membership_number
            .clone()
            .map(Into::into))
    }

    /// Indicator whether this `Member` is under the "monotributo" tax
    /// regime.
    pub async fn monotributo(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.member(ctx).await?.monotributo)
    }

    /// Indicator whether this `Member` is active.
    pub async fn active(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.member(ctx).await?.is_active())
    }

    /// `Date` when this `Member` began working.
    pub async fn started_on(
        &self,
        ctx: &Context,
    ) -> Result<Option<Date>, Error> {
        Ok(self.member(ctx).await?.started_on.map(|d| d.coerce()))
    }

    /// `Date` when this `Member` was registered.
    pub async fn registered_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.member(ctx).await?.registered_on.coerce())
    }

    /// `Date` when this `Member` was terminated, if it was.
    pub async fn terminated_on(
        &self,
        ctx: &Context,
    ) -> Result<Option<Date>, Error> {
        Ok(self
            .member(ctx)
            .await?
            .termination
            .as_ref()
            .map(|t| t.on.coerce()))
    }

    /// Who terminated this `Member`, if it was terminated.
    pub async fn terminated_by(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Responsible>, Error> {
        Ok(self
            .member(ctx)
            .await?
            .termination
            .as_ref()
            .map(|t| t.responsible.clone().into()))
    }

    /// Reason of this `Member`'s termination, if it was terminated.
    pub async fn termination_reason(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Reason>, Error> {
        Ok(self
            .member(ctx)
            .await?
            .termination
            .as_ref()
            .and_then(|t| t.reason.clone())
            .map(Into::into))
    }

    /// `Contractor` this `Member` is currently assigned to.
    pub async fn contractor(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Contractor>, Error> {
        let Some(id) = self.member(ctx).await?.contractor_id else {
            return Ok(None);
        };
        ctx.service()
            .execute(query::contractor::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::ContractorError::NotExists.into())
            .map_err(ctx.error())
            .map(|c| Some(c.into()))
    }

    /// Contractor history of this `Member`, ascending by occurrence time.
    pub async fn history(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::history::Entry>, Error> {
        ctx.service()
            .execute(query::history::ByMember::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|entries| entries.into_iter().map(Into::into).collect())
    }

    /// Equipment issued to this `Member`, ascending by issuance date.
    pub async fn equipment(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::equipment::Issuance>, Error> {
        ctx.service()
            .execute(query::equipment::ByMember::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|issuances| issuances.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Member`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::member::Id)]
#[into(domain::member::Id)]
#[graphql(name = "MemberId", transparent)]
pub struct Id(Uuid);

/// First name of a `Member`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MemberFirstName",
    with = scalar::Via::<domain::member::FirstName>,
)]
pub struct FirstName(domain::member::FirstName);

/// Surname of a `Member`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MemberSurname",
    with = scalar::Via::<domain::member::Surname>,
)]
pub struct Surname(domain::member::Surname);

/// National identity document number (DNI) of a `Member`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MemberNationalId",
    with = scalar::Via::<domain::member::NationalId>,
)]
pub struct NationalId(domain::member::NationalId);

/// Fiscal identifier (CUIT) of a `Member`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MemberTaxId",
    with = scalar::Via::<domain::member::TaxId>,
)]
pub struct TaxId(domain::member::TaxId);

/// Internal file number ("legajo") of a `Member`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MemberFileNumber",
    with = scalar::Via::<domain::member::FileNumber>,
)]
pub struct FileNumber(domain::member::FileNumber);

/// Membership number of a `Member`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MemberMembershipNumber",
    with = scalar::Via::<domain::member::MembershipNumber>,
)]
pub struct MembershipNumber(domain::member::MembershipNumber);
