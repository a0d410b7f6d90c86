//! GraphQL API definitions.

pub mod contractor;
pub mod equipment;
pub mod history;
pub mod member;
mod mutation;
mod query;
pub mod report;
pub mod scalar;

use derive_more::{AsRef, Display, From, Into};
use juniper::GraphQLScalar;
use service::domain;

use crate::{define_error, Context};

pub use self::{
    contractor::Contractor, member::Member, mutation::Mutation, query::Query,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<
    'static,
    Query,
    Mutation,
    juniper::EmptySubscription<Context>,
>;

/// Person responsible for performing an action.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = scalar::Via::<domain::Responsible>)]
pub struct Responsible(domain::Responsible);

/// Free-text reason attached to a lifecycle event.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = scalar::Via::<domain::Reason>)]
pub struct Reason(domain::Reason);

define_error! {
    enum MemberError {
        #[code = "MEMBER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Member` with the provided ID does not exist"]
        NotExists,

        #[code = "MEMBER_ALREADY_TERMINATED"]
        #[status = CONFLICT]
        #[message = "`Member` is already terminated"]
        AlreadyTerminated,

        #[code = "MEMBER_NOT_TERMINATED"]
        #[status = CONFLICT]
        #[message = "`Member` is not terminated"]
        NotTerminated,
    }
}

define_error! {
    enum ContractorError {
        #[code = "CONTRACTOR_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Contractor` with the provided ID does not exist"]
        NotExists,

        #[code = "CONTRACTOR_INACTIVE"]
        #[status = CONFLICT]
        #[message = "`Contractor` is deactivated"]
        Inactive,
    }
}
