//! Session helpers that turn the cookie session into a domain [`Actor`].
//!
//! The authentication collaborator writes the caller's id, username, and
//! role into the session; handlers only read them back through
//! [`SessionContext`].

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Actor, Error, Role, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USERNAME_KEY: &str = "username";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype wrapper exposing actor-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

fn read_failure(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to read session: {error}"))
}

fn write_failure(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to persist session: {error}"))
}

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the authenticated actor in the session cookie.
    pub fn persist_actor(&self, actor: &Actor) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, actor.id().get())
            .map_err(write_failure)?;
        self.0
            .insert(USERNAME_KEY, actor.username())
            .map_err(write_failure)?;
        self.0
            .insert(ROLE_KEY, actor.role().as_str())
            .map_err(write_failure)
    }

    /// Fetch the current actor, if the session carries a complete one.
    ///
    /// A partially populated session is treated as anonymous.
    pub fn actor(&self) -> Result<Option<Actor>, Error> {
        let id = self.0.get::<i64>(USER_ID_KEY).map_err(read_failure)?;
        let username = self.0.get::<String>(USERNAME_KEY).map_err(read_failure)?;
        let role = self.0.get::<String>(ROLE_KEY).map_err(read_failure)?;
        match (id, username, role) {
            (Some(id), Some(username), Some(role)) if id > 0 => Ok(Some(Actor::new(
                UserId::new(id),
                username,
                Role::parse(&role),
            ))),
            (None, None, None) => Ok(None),
            _ => {
                warn!("incomplete actor in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated actor or fail with `401 Unauthorized`.
    pub fn require_actor(&self) -> Result<Actor, Error> {
        self.actor()?
            .ok_or_else(|| Error::unauthorized("login required"))
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
