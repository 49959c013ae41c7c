//! Administrator-only user management

use super::auth::checked;
use crate::{form::FormPayload, middleware::RequestContext, AppState};
use actix_web::web;
use actix_web_validator::Path;
use glow_error::{validation::FieldErrors, web::WebError, WebResult};
use glow_models::{
    domain::prelude::{PathId, UpdateUser, UserInfo},
    entities::prelude::{UserActiveModel, UserModel},
    enums::common::{EntityType, Operation},
    web::WebResponse,
};
use glow_repository::UserRepository;
use std::sync::Arc;
use tracing::{info, instrument};

pub(super) const ROUTER_PREFIX: &str = "/users";

/// Configure user routes
///
/// # Routes
/// - GET ``: List all users
/// - GET `/{id}`: Retrieve a user
/// - PUT|PATCH `/{id}`: Update name, email or role
/// - DELETE `/{id}`: Delete a user other than the caller
/// - POST `/{id}/promote`: Grant the admin role
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list))
        .route("/{id:\\d+}", web::get().to(get_by_id))
        .route("/{id:\\d+}", web::put().to(update))
        .route("/{id:\\d+}", web::patch().to(update))
        .route("/{id:\\d+}", web::delete().to(delete))
        .route("/{id:\\d+}/promote", web::post().to(promote));
}

/// List all users
///
/// # Endpoint
/// `GET /users`
async fn list(
    ctx: RequestContext,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<Vec<UserInfo>>> {
    ctx.admin()?;
    Ok(WebResponse::ok(UserRepository::find_all(&state.db).await?))
}

/// Retrieve a user by ID
///
/// # Endpoint
/// `GET /users/{id}`
async fn get_by_id(
    ctx: RequestContext,
    params: Path<PathId>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<UserInfo>> {
    ctx.admin()?;
    Ok(WebResponse::ok(find_or_404(params.id, &state).await?.into()))
}

/// Update a user
///
/// # Endpoint
/// `PUT|PATCH /users/{id}`
///
/// # Errors
/// - Not Found (404): When the user is not found
/// - Unprocessable Entity (422): Invalid fields or the email is already taken
#[instrument(name = "update-user", skip_all)]
async fn update(
    ctx: RequestContext,
    params: Path<PathId>,
    payload: FormPayload,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<UserInfo>> {
    ctx.admin()?;
    let mut model: UserActiveModel = find_or_404(params.id, &state).await?.into();
    let mut errors = FieldErrors::new();
    let req = UpdateUser {
        name: payload.text("name", &mut errors).flatten(),
        email: payload.text("email", &mut errors).flatten(),
        role: payload.choice("role", &mut errors).flatten(),
    };
    checked(req, errors)?.apply(&mut model);
    state.validator.validate(&model, Operation::Write).await?;
    let user = UserRepository::update(model, &state.db).await?;
    Ok(WebResponse::ok(user.into()))
}

/// Delete a user
///
/// # Endpoint
/// `DELETE /users/{id}`
///
/// # Errors
/// - Unprocessable Entity (422): When deleting the caller's own account
#[instrument(name = "delete-user", skip_all)]
async fn delete(
    ctx: RequestContext,
    params: Path<PathId>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<()>> {
    let claims = ctx.admin()?;
    if claims.user_id == params.id {
        return Err(WebError::invalid("user", "You cannot delete your own account."));
    }
    find_or_404(params.id, &state).await?;
    UserRepository::delete(params.id, &state.db).await?;
    info!("User {} deleted user {}", claims.user_id, params.id);
    Ok(WebResponse::no_content())
}

/// Grant the admin role; already-admin users are returned unchanged
///
/// # Endpoint
/// `POST /users/{id}/promote`
#[instrument(name = "promote-user", skip_all)]
async fn promote(
    ctx: RequestContext,
    params: Path<PathId>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<UserInfo>> {
    ctx.admin()?;
    let user = find_or_404(params.id, &state).await?;
    let user = UserRepository::promote_to_admin(user, &state.db).await?;
    info!("Promoted user {} to admin", user.id);
    Ok(WebResponse::ok(user.into()))
}

async fn find_or_404(id: i32, state: &AppState) -> WebResult<UserModel> {
    UserRepository::find_by_id(id, &state.db)
        .await?
        .ok_or_else(|| WebError::NotFound(EntityType::User.name().to_string()))
}
