//! Bearer token authentication.
//!
//! Requests carrying a valid token get their [`Claims`] attached to the request
//! extensions, everything else is answered with `401`.

use crate::AppState;
use actix_service::{Service, Transform};
use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    error::ErrorInternalServerError,
    http::{header::AUTHORIZATION, Method},
    web::Data,
    Error, HttpMessage, ResponseError,
};
use futures::{
    future::{ok, LocalBoxFuture, Ready},
    FutureExt,
};
use glow_error::web::WebError;
use glow_models::{constants::BEARER_TOKEN, domain::prelude::Claims};
use glow_utils::jwt::{decode_jwt, issuer_validation};
use std::{
    cell::RefCell,
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::debug;

/// Authentication middleware factory.
pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthenticationMiddleware {
            service: Rc::new(RefCell::new(service)),
        })
    }
}

pub struct AuthenticationMiddleware<S> {
    service: Rc<RefCell<S>>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = S::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        async move {
            // Preflight requests never carry credentials
            if Method::OPTIONS == req.method() {
                return srv.call(req).await.map(|res| res.map_into_left_body());
            }

            let state = req
                .app_data::<Data<Arc<AppState>>>()
                .cloned()
                .ok_or_else(|| ErrorInternalServerError("application state not configured"))?;

            let claims = match extract_bearer_token(&req) {
                Some(token) => {
                    let jwt = &state.settings.web.jwt;
                    decode_jwt::<Claims>(
                        token,
                        jwt.secret.as_bytes(),
                        Some(issuer_validation(&jwt.issuer)),
                    )
                    .map(|data| data.claims)
                    .map_err(|e| debug!("rejected bearer token: {e}"))
                    .ok()
                }
                None => None,
            };

            match claims {
                Some(claims) => {
                    req.extensions_mut().insert(claims);
                    srv.call(req).await.map(|res| res.map_into_left_body())
                }
                None => Ok(req
                    .into_response(WebError::Unauthorized.error_response())
                    .map_into_right_body()),
            }
        }
        .boxed_local()
    }
}

/// Bearer token from the `Authorization` header, if any.
#[inline]
fn extract_bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_TOKEN)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
