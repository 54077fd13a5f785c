//! Cookie session helpers so handlers never touch `actix_session` directly.
//!
//! The encrypted session cookie holds the identity provider's access token and
//! the identity it resolved to. Handlers treat the stored identity as the
//! caller; the token is only replayed to the provider (sign-out, refresh).

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AccessToken, AuthSession, Error, Identity};

pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";
pub(crate) const IDENTITY_KEY: &str = "identity";

/// Newtype wrapper exposing session operations in domain terms.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store a freshly authenticated session, replacing any previous one.
    pub fn persist(&self, auth: &AuthSession) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACCESS_TOKEN_KEY, auth.access_token.expose())
            .and_then(|()| self.0.insert(IDENTITY_KEY, &auth.identity))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The stored identity, if the cookie carries a readable one.
    pub fn identity(&self) -> Result<Option<Identity>, Error> {
        match self.0.get::<Identity>(IDENTITY_KEY) {
            Ok(identity) => Ok(identity),
            Err(error) => {
                warn!(%error, "unreadable identity in session cookie");
                self.0.purge();
                Ok(None)
            }
        }
    }

    /// The stored access token, if any.
    pub fn access_token(&self) -> Result<Option<AccessToken>, Error> {
        self.0
            .get::<String>(ACCESS_TOKEN_KEY)
            .map(|token| token.map(AccessToken::new))
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Rebuild the full [`AuthSession`] when both halves are present.
    pub fn auth_session(&self) -> Result<Option<AuthSession>, Error> {
        let Some(identity) = self.identity()? else {
            return Ok(None);
        };
        Ok(self.access_token()?.map(|access_token| AuthSession {
            identity,
            access_token,
        }))
    }

    /// Require a signed-in caller or fail with `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<Identity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("Please sign in to continue"))
    }

    /// Drop the session cookie entirely.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
