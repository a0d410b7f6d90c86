//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Member` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MEMBER_NOT_EXISTS` - the `Member` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "member",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn member(
        id: api::member::Id,
        ctx: &Context,
    ) -> Result<api::Member, Error> {
        drop(ctx.current_principal().await?);

        ctx.service()
            .execute(query::member::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::MemberError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the `Member`s, the full set by default.
    #[tracing::instrument(
        skip_all,
        fields(
            active_only = ?active_only,
            contractor_id = ?contractor_id,
            gql.name = "members",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn members(
        active_only: Option<bool>,
        contractor_id: Option<api::contractor::Id>,
        ctx: &Context,
    ) -> Result<Vec<api::Member>, Error> {
        drop(ctx.current_principal().await?);

        ctx.service()
            .execute(query::member::List::by(read::member::Filter {
                contractor: contractor_id.map(Into::into),
                active_only: active_only.unwrap_or(false),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|members| members.into_iter().map(Into::into).collect())
    }

    /// Returns the `Contractor` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACTOR_NOT_EXISTS` - the `Contractor` with the specified ID
    ///                             does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "contractor",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contractor(
        id: api::contractor::Id,
        ctx: &Context,
    ) -> Result<api::Contractor, Error> {
        drop(ctx.current_principal().await?);

        ctx.service()
            .execute(query::contractor::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::ContractorError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the `Contractor`s, active ones by default.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "contractors",
            include_inactive = ?include_inactive,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contractors(
        include_inactive: Option<bool>,
        ctx: &Context,
    ) -> Result<Vec<api::Contractor>, Error> {
        drop(ctx.current_principal().await?);

        ctx.service()
            .execute(query::contractor::List::by(read::contractor::Filter {
                include_inactive: include_inactive.unwrap_or(false),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|contractors| {
                contractors.into_iter().map(Into::into).collect()
            })
    }

    /// Returns the contractor history of the specified `Member`, ascending
    /// by occurrence time.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MEMBER_NOT_EXISTS` - the `Member` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "memberHistory",
            member_id = %member_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn member_history(
        member_id: api::member::Id,
        ctx: &Context,
    ) -> Result<Vec<api::history::Entry>, Error> {
        Self::member(member_id, ctx).await?.history(ctx).await
    }

    /// Returns the equipment issued to the specified `Member`, ascending by
    /// issuance date.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MEMBER_NOT_EXISTS` - the `Member` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "memberEquipment",
            member_id = %member_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn member_equipment(
        member_id: api::member::Id,
        ctx: &Context,
    ) -> Result<Vec<api::equipment::Issuance>, Error> {
        Self::member(member_id, ctx).await?.equipment(ctx).await
    }

    /// Builds a liquidation report for the requested period.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REPORT_INVALID_MONTH` - the requested month is out of the `1..=12`
    ///                            range.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "liquidationReport",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn liquidation_report(
        filter: api::report::Filter,
        ctx: &Context,
    ) -> Result<api::report::Report, Error> {
        drop(ctx.current_principal().await?);

        let filter = filter
            .into_service()
            .ok_or_else(|| ReportError::InvalidMonth.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::report::Liquidation(filter))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum ReportError {
        #[code = "REPORT_INVALID_MONTH"]
        #[status = BAD_REQUEST]
        #[message = "Report month must be between 1 and 12"]
        InvalidMonth,
    }
}
