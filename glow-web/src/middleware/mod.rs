pub(crate) mod auth;
pub(crate) mod cors;

use actix_web::{dev::Payload, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};
use glow_error::{web::WebError, WebResult};
use glow_models::domain::prelude::Claims;

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub grant: Option<Claims>,
}

impl RequestContext {
    /// Claims of the authenticated caller
    pub fn claims(&self) -> WebResult<&Claims> {
        self.grant.as_ref().ok_or(WebError::Unauthorized)
    }

    /// Claims of the caller, who must be an administrator
    pub fn admin(&self) -> WebResult<&Claims> {
        let claims = self.claims()?;
        if claims.is_admin() {
            Ok(claims)
        } else {
            Err(WebError::Forbidden(
                "This action is unauthorized.".to_string(),
            ))
        }
    }
}

impl FromRequest for RequestContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let mut ctx = RequestContext::default();
        if let Some(grant) = req.extensions().get::<Claims>().cloned() {
            ctx.grant = Some(grant);
        }
        ready(Ok(ctx))
    }
}
