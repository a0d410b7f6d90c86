//! [`Command`] for authorizing a session of the hosted auth provider.

use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::{principal, Principal},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a session of the hosted auth provider.
///
/// The provider issues and refreshes tokens; this command only validates
/// one and returns the decoded [`Principal`].
#[derive(Clone, Debug, From)]
pub struct AuthorizeSession {
    /// Session [`principal::Token`] to authorize.
    pub token: principal::Token,
}

impl<Db> Command<AuthorizeSession> for Service<Db> {
    type Ok = Principal;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeSession { token } = cmd;

        let principal = jsonwebtoken::decode::<Principal>(
            token.as_ref(),
            &self.config.jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        Ok(principal)
    }
}

/// Error of [`AuthorizeSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),
}

#[cfg(test)]
mod spec {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;
    use uuid::Uuid;

    use crate::{domain::principal, infra::Local, Config, Service};

    use super::{AuthorizeSession, Command as _};

    /// Claim set the way the hosted provider mints it.
    #[derive(Serialize)]
    struct Claims<'c> {
        sub: Uuid,
        email: &'c str,
        name: Option<&'c str>,
        role: &'c str,
        exp: i64,
    }

    fn service(secret: &[u8]) -> Service<Local> {
        Service::new(
            Config {
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                    secret,
                ),
            },
            Local::new(),
        )
    }

    fn token(secret: &[u8], name: Option<&str>) -> principal::Token {
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "operador@coop.example",
            name,
            role: "operator",
            exp: 4_102_444_800, // far in the future
        };
        principal::Token::new(
            encode(
                &Header::default(),
                &claims,
                &EncodingKey::from_secret(secret),
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn decodes_a_provider_token() {
        let svc = service(b"provider-secret");

        let principal = svc
            .execute(AuthorizeSession {
                token: token(b"provider-secret", Some("J. Perez")),
            })
            .await
            .unwrap();

        assert_eq!(principal.email, "operador@coop.example");
        assert_eq!(principal.role, principal::Role::Operator);
        assert_eq!(
            principal.responsible().unwrap().to_string(),
            "J. Perez",
        );
    }

    #[tokio::test]
    async fn responsible_falls_back_to_the_email() {
        let svc = service(b"provider-secret");

        let principal = svc
            .execute(AuthorizeSession {
                token: token(b"provider-secret", None),
            })
            .await
            .unwrap();

        assert_eq!(
            principal.responsible().unwrap().to_string(),
            "operador@coop.example",
        );
    }

    #[tokio::test]
    async fn rejects_a_token_signed_with_another_secret() {
        let svc = service(b"provider-secret");

        let result = svc
            .execute(AuthorizeSession {
                token: token(b"wrong-secret", None),
            })
            .await;

        assert!(result.is_err());
    }
}
