// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! Handles user authentication in API requests
//!
//! Token issuance and verification belong to the external identity layer in
//! front of this service; by the time a request arrives here its bearer
//! token carries the already verified identity (the caller's user id) and is
//! trusted unconditionally. This middleware resolves that identity to the
//! [`User`] row and provides it as [`ReqData`](actix_web::web::ReqData) for
//! the subsequent services, so no handler ever reads the caller from
//! ambient state.

use crate::api::v1::response::error::AuthenticationError;
use crate::api::v1::response::ApiError;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::Error;
use actix_web::http::header::Header;
use actix_web::web::Data;
use actix_web::HttpMessage;
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use database::{Db, OptionalExt};
use db_storage::users::{User, UserId};
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::rc::Rc;
use std::str::FromStr;
use std::task::{Context, Poll};
use uuid::Uuid;

/// Middleware factory
///
/// Transforms into [`AuthMiddleware`]
pub struct Auth {
    pub db: Data<Db>,
}

impl<S> Transform<S, ServiceRequest> for Auth
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service: Rc::new(service),
            db: self.db.clone(),
        }))
    }
}

/// Authentication middleware
///
/// Whenever an API request is received, the AuthMiddleware resolves the
/// bearer identity and provides the associated user as
/// [`ReqData`](actix_web::web::ReqData) for the subsequent services.
pub struct AuthMiddleware<S> {
    service: Rc<S>,
    db: Data<Db>,
}

type ResultFuture<O, E> = Pin<Box<dyn Future<Output = Result<O, E>>>>;

impl<S> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Future = ResultFuture<Self::Response, Self::Error>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let db = self.db.clone();

        let auth = match Authorization::<Bearer>::parse(&req) {
            Ok(auth) => auth,
            Err(e) => {
                log::warn!("Unable to parse bearer token, {}", e);
                let error = ApiError::unauthorized()
                    .with_www_authenticate(AuthenticationError::InvalidAccessToken);
                return Box::pin(ready(Err(error.into())));
            }
        };

        let token = auth.into_scheme().token().to_string();

        Box::pin(async move {
            let current_user = resolve_identity(db, &token).await?;

            req.extensions_mut().insert(current_user);
            service.call(req).await
        })
    }
}

/// Resolves the verified identity carried in the token to its user row
async fn resolve_identity(db: Data<Db>, token: &str) -> Result<User, ApiError> {
    let user_id = match Uuid::from_str(token) {
        Ok(uuid) => UserId::from(uuid),
        Err(e) => {
            log::warn!("Malformed identity in bearer token, {}", e);
            return Err(ApiError::unauthorized()
                .with_www_authenticate(AuthenticationError::InvalidAccessToken));
        }
    };

    let user = crate::block(move || -> Result<Option<User>, ApiError> {
        let mut conn = db.get_conn()?;

        let user = User::get(&mut conn, user_id).optional()?;

        Ok(user)
    })
    .await??;

    match user {
        Some(user) => Ok(user),
        None => {
            log::warn!("The identity of the provided token is not registered");
            Err(ApiError::unauthorized()
                .with_www_authenticate(AuthenticationError::UnknownIdentity))
        }
    }
}
