use crate::{form::FormPayload, middleware::RequestContext, AppState};
use actix_web::web;
use glow_error::{validation::FieldErrors, web::WebError, WebResult};
use glow_models::{
    constants::BEARER_TOKEN,
    domain::prelude::{Claims, LoginRequest, LoginResponse, RegisterUser, UpdateProfile, UserInfo},
    entities::prelude::{UserActiveModel, UserModel},
    enums::common::Operation,
    web::WebResponse,
};
use glow_repository::UserRepository;
use glow_utils::{hash::bcrypt_check, jwt::encode_jwt};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

pub(super) const ROUTER_PREFIX: &str = "/auth";

/// Configure authenticated auth routes
///
/// # Routes
/// - POST `/logout`: Logout endpoint
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/logout", web::post().to(logout));
}

/// Login endpoint
///
/// # Endpoint
/// `POST /auth/login`
///
/// # Errors
/// - Unauthorized (401): Unknown email or wrong password
#[instrument(name = "login", skip_all)]
pub(super) async fn login(
    payload: FormPayload,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<LoginResponse>> {
    let mut errors = FieldErrors::new();
    let req = LoginRequest {
        email: payload.text("email", &mut errors).flatten(),
        password: payload.text("password", &mut errors).flatten(),
    };
    let req = checked(req, errors)?;
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let user = match UserRepository::find_by_email(&email, &state.db).await? {
        Some(user) if bcrypt_check(&password, &user.password) => user,
        _ => {
            warn!("Failed login attempt for {email}");
            return Err(WebError::Unauthorized);
        }
    };

    let jwt = &state.settings.web.jwt;
    let claims = Claims::new(
        jwt.issuer.clone(),
        user.id,
        user.email.clone(),
        user.role,
        jwt.expire,
    );
    let token = encode_jwt(&claims, jwt.secret.as_bytes(), None)
        .map_err(|e| WebError::InternalError(e.to_string()))?;

    info!("User {} logged in", user.id);
    Ok(WebResponse::ok(LoginResponse {
        token,
        token_type: BEARER_TOKEN.to_string(),
        expires_in: jwt.expire,
        user: user.into(),
    }))
}

/// Self-registration with the `user` role
///
/// # Endpoint
/// `POST /auth/register`
///
/// # Errors
/// - Unprocessable Entity (422): Invalid fields or the email is already taken
#[instrument(name = "register", skip_all)]
pub(super) async fn register(
    payload: FormPayload,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<UserInfo>> {
    let mut errors = FieldErrors::new();
    let req = RegisterUser {
        name: payload.text("name", &mut errors).flatten(),
        email: payload.text("email", &mut errors).flatten(),
        password: payload.text("password", &mut errors).flatten(),
    };
    let model = checked(req, errors)?
        .into_active_model()
        .map_err(|e| WebError::InternalError(e.to_string()))?;
    state.validator.validate(&model, Operation::Create).await?;
    let user = UserRepository::create(model, &state.db).await?;
    info!("Registered user {}", user.id);
    Ok(WebResponse::created(user.into()))
}

/// Logout endpoint; tokens are stateless so this only acknowledges the client
///
/// # Endpoint
/// `POST /auth/logout`
async fn logout(ctx: RequestContext) -> WebResult<WebResponse<()>> {
    let claims = ctx.claims()?;
    info!("User {} logged out", claims.user_id);
    Ok(WebResponse::no_content())
}

/// User behind the bearer token
///
/// # Endpoint
/// `GET /current-user`
///
/// # Errors
/// - Unauthorized (401): The account no longer exists
pub(super) async fn current_user(
    ctx: RequestContext,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<UserInfo>> {
    Ok(WebResponse::ok(current(&ctx, &state).await?.into()))
}

/// Update the caller's own name, email or password
///
/// # Endpoint
/// `PUT|PATCH /profile`
pub(super) async fn update_profile(
    ctx: RequestContext,
    payload: FormPayload,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<UserInfo>> {
    let user = current(&ctx, &state).await?;
    let mut errors = FieldErrors::new();
    let req = UpdateProfile {
        name: payload.text("name", &mut errors).flatten(),
        email: payload.text("email", &mut errors).flatten(),
        password: payload.text("password", &mut errors).flatten(),
    };
    let mut model: UserActiveModel = user.into();
    checked(req, errors)?
        .apply(&mut model)
        .map_err(|e| WebError::InternalError(e.to_string()))?;
    state.validator.validate(&model, Operation::Write).await?;
    let user = UserRepository::update(model, &state.db).await?;
    Ok(WebResponse::ok(user.into()))
}

/// Field rules on top of the type errors collected while reading the body
pub(super) fn checked<T: Validate>(input: T, mut errors: FieldErrors) -> WebResult<T> {
    if let Err(e) = input.validate() {
        errors.merge_unreported(e.into());
    }
    errors.into_result()?;
    Ok(input)
}

async fn current(ctx: &RequestContext, state: &AppState) -> WebResult<UserModel> {
    let claims = ctx.claims()?;
    UserRepository::find_by_id(claims.user_id, &state.db)
        .await?
        .ok_or(WebError::Unauthorized)
}
