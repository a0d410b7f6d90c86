//! GraphQL [`Mutation`]s definitions.

use common::Date;
use juniper::graphql_object;
use service::{command, domain, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Registers a new `Member`, writing its initial-assignment history
    /// entry.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACTOR_NOT_EXISTS` - the assigned `Contractor` does not exist;
    /// - `CONTRACTOR_INACTIVE` - the assigned `Contractor` is deactivated;
    /// - `UNIQUENESS_VIOLATION` - identity fields conflict with existing
    ///                            `Member`s; the message lists every
    ///                            conflicting field.
    #[tracing::instrument(
        skip_all,
        fields(
            first_name = %first_name,
            gql.name = "registerMember",
            otel.name = Self::SPAN_NAME,
            surname = %surname,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "flat GraphQL arguments")]
    pub async fn register_member(
        first_name: api::member::FirstName,
        surname: api::member::Surname,
        national_id: Option<api::member::NationalId>,
        tax_id: Option<api::member::TaxId>,
        file_number: Option<api::member::FileNumber>,
        membership_number: Option<api::member::MembershipNumber>,
        monotributo: bool,
        contractor_id: Option<api::contractor::Id>,
        started_on: Option<Date>,
        registered_on: Option<Date>,
        ctx: &Context,
    ) -> Result<api::Member, Error> {
        let responsible = ctx.responsible().await?;

        ctx.service()
            .execute(command::RegisterMember {
                first_name: first_name.into(),
                surname: surname.into(),
                national_id: national_id.map(Into::into),
                tax_id: tax_id.map(Into::into),
                file_number: file_number.map(Into::into),
                membership_number: membership_number.map(Into::into),
                monotributo,
                contractor_id: contractor_id.map(Into::into),
                started_on: started_on.map(Date::coerce),
                registered_on: registered_on.map(Date::coerce),
                responsible,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the identity fields of a `Member`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MEMBER_NOT_EXISTS` - the `Member` does not exist;
    /// - `UNIQUENESS_VIOLATION` - identity fields conflict with existing
    ///                            `Member`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateMember",
            member_id = %member_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "flat GraphQL arguments")]
    pub async fn update_member(
        member_id: api::member::Id,
        first_name: api::member::FirstName,
        surname: api::member::Surname,
        national_id: Option<api::member::NationalId>,
        tax_id: Option<api::member::TaxId>,
        file_number: Option<api::member::FileNumber>,
        membership_number: Option<api::member::MembershipNumber>,
        monotributo: bool,
        started_on: Option<Date>,
        ctx: &Context,
    ) -> Result<api::Member, Error> {
        drop(ctx.current_principal().await?);

        ctx.service()
            .execute(command::UpdateMember {
                member_id: member_id.into(),
                first_name: first_name.into(),
                surname: surname.into(),
                national_id: national_id.map(Into::into),
                tax_id: tax_id.map(Into::into),
                file_number: file_number.map(Into::into),
                membership_number: membership_number.map(Into::into),
                monotributo,
                started_on: started_on.map(Date::coerce),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Terminates a `Member`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MEMBER_NOT_EXISTS` - the `Member` does not exist;
    /// - `MEMBER_ALREADY_TERMINATED` - the `Member` is already terminated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "terminateMember",
            member_id = %member_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn terminate_member(
        member_id: api::member::Id,
        reason: Option<api::Reason>,
        on: Option<Date>,
        ctx: &Context,
    ) -> Result<api::Member, Error> {
        let responsible = ctx.responsible().await?;

        ctx.service()
            .execute(command::TerminateMember {
                member_id: member_id.into(),
                responsible,
                reason: reason.map(Into::into),
                on: on.map(Date::coerce),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Reactivates a terminated `Member`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MEMBER_NOT_EXISTS` - the `Member` does not exist;
    /// - `MEMBER_NOT_TERMINATED` - the `Member` is not terminated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "reactivateMember",
            member_id = %member_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reactivate_member(
        member_id: api::member::Id,
        reason: Option<api::Reason>,
        ctx: &Context,
    ) -> Result<api::Member, Error> {
        let responsible = ctx.responsible().await?;

        ctx.service()
            .execute(command::ReactivateMember {
                member_id: member_id.into(),
                responsible,
                reason: reason.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Reassigns a `Member` to another `Contractor`, capturing the
    /// equipment snapshot of the previous one.
    ///
    /// Reassigning to the current `Contractor` is a no-op.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MEMBER_NOT_EXISTS` - the `Member` does not exist;
    /// - `CONTRACTOR_NOT_EXISTS` - a referenced `Contractor` does not exist;
    /// - `CONTRACTOR_INACTIVE` - the new `Contractor` is deactivated.
    #[tracing::instrument(
        skip_all,
        fields(
            contractor_id = %contractor_id,
            gql.name = "reassignContractor",
            member_id = %member_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reassign_contractor(
        member_id: api::member::Id,
        contractor_id: api::contractor::Id,
        reason: Option<api::Reason>,
        ctx: &Context,
    ) -> Result<api::Member, Error> {
        let responsible = ctx.responsible().await?;

        ctx.service()
            .execute(command::ReassignContractor {
                member_id: member_id.into(),
                new_contractor_id: contractor_id.into(),
                responsible,
                reason: reason.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Contractor`, reactivating a deactivated one carrying
    /// the same name instead of inserting a duplicate.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createContractor",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_contractor(
        name: api::contractor::Name,
        ctx: &Context,
    ) -> Result<api::Contractor, Error> {
        drop(ctx.current_principal().await?);

        ctx.service()
            .execute(command::CreateContractor { name: name.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deactivates a `Contractor`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACTOR_NOT_EXISTS` - the `Contractor` does not exist;
    /// - `CONTRACTOR_STILL_REFERENCED` - active `Member`s are still assigned
    ///                                   to the `Contractor`; the message
    ///                                   carries their count.
    #[tracing::instrument(
        skip_all,
        fields(
            contractor_id = %contractor_id,
            gql.name = "deleteContractor",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_contractor(
        contractor_id: api::contractor::Id,
        ctx: &Context,
    ) -> Result<api::Contractor, Error> {
        drop(ctx.current_principal().await?);

        ctx.service()
            .execute(command::DeleteContractor {
                contractor_id: contractor_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Records an equipment issuance to a `Member`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MEMBER_NOT_EXISTS` - the `Member` does not exist;
    /// - `EQUIPMENT_INVALID_QUANTITY` - the quantity is below 1.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "recordEquipmentIssuance",
            item = %item,
            member_id = %member_id,
            otel.name = Self::SPAN_NAME,
            quantity = %quantity,
        ),
    )]
    pub async fn record_equipment_issuance(
        member_id: api::member::Id,
        item: api::equipment::Item,
        size: Option<api::equipment::Size>,
        quantity: i32,
        issued_on: Option<Date>,
        ctx: &Context,
    ) -> Result<api::equipment::Issuance, Error> {
        let issued_by = ctx.responsible().await?;

        let quantity = domain::equipment::Quantity::new(quantity)
            .ok_or_else(|| EquipmentError::InvalidQuantity.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::RecordEquipmentIssuance {
                member_id: member_id.into(),
                item: item.into(),
                size: size.map(Into::into),
                quantity,
                issued_on: issued_on.map(Date::coerce),
                issued_by,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum EquipmentError {
        #[code = "EQUIPMENT_INVALID_QUANTITY"]
        #[status = BAD_REQUEST]
        #[message = "Equipment quantity must be at least 1"]
        InvalidQuantity,
    }
}

impl AsError for command::register_member::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ContractorInactive(_) => {
                Some(api::ContractorError::Inactive.into())
            }
            Self::ContractorNotExists(_) => {
                Some(api::ContractorError::NotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
            Self::Uniqueness(conflicts) => {
                Some(Error::conflict("UNIQUENESS_VIOLATION", conflicts))
            }
        }
    }
}

impl AsError for command::update_member::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::MemberNotExists(_) => Some(api::MemberError::NotExists.into()),
            Self::Uniqueness(conflicts) => {
                Some(Error::conflict("UNIQUENESS_VIOLATION", conflicts))
            }
        }
    }
}

impl AsError for command::terminate_member::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::AlreadyTerminated(_) => {
                Some(api::MemberError::AlreadyTerminated.into())
            }
            Self::Db(e) => e.try_as_error(),
            Self::MemberNotExists(_) => Some(api::MemberError::NotExists.into()),
        }
    }
}

impl AsError for command::reactivate_member::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::MemberNotExists(_) => Some(api::MemberError::NotExists.into()),
            Self::NotTerminated(_) => {
                Some(api::MemberError::NotTerminated.into())
            }
        }
    }
}

impl AsError for command::reassign_contractor::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ContractorInactive(_) => {
                Some(api::ContractorError::Inactive.into())
            }
            Self::ContractorNotExists(_) => {
                Some(api::ContractorError::NotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
            Self::MemberNotExists(_) => Some(api::MemberError::NotExists.into()),
        }
    }
}

impl AsError for command::create_contractor::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_contractor::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ContractorNotExists(_) => {
                Some(api::ContractorError::NotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
            Self::MembersStillAssigned(count) => Some(Error::conflict(
                "CONTRACTOR_STILL_REFERENCED",
                &format!(
                    "{count} active member(s) are still assigned to the \
                     `Contractor`",
                ),
            )),
        }
    }
}

impl AsError for command::record_equipment_issuance::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::MemberNotExists(_) => Some(api::MemberError::NotExists.into()),
        }
    }
}
