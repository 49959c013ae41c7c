//! Category endpoints

use crate::{form::FormPayload, AppState};
use actix_web::{http::Method, web, Either, HttpRequest};
use actix_web_validator::Path;
use glow_error::{validation::FieldErrors, web::WebError, WebResult};
use glow_models::{
    constants::CATEGORY_MEDIA_NAMESPACE,
    domain::prelude::{CategoryInfo, CategoryInput, PathId},
    entities::prelude::{CategoryActiveModel, CategoryModel},
    enums::common::{EntityType, Operation},
    web::WebResponse,
};
use glow_repository::CategoryRepository;
use glow_storage::UploadedFile;
use std::sync::Arc;
use tracing::{info, instrument};

pub(super) const ROUTER_PREFIX: &str = "/categories";

/// Configure authenticated category routes
///
/// # Routes
/// - POST ``: Create a category
/// - PUT|PATCH `/{id}`: Update a category
/// - DELETE `/{id}`: Delete a category
/// - POST `/{id}`: Update or delete through `_method`
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create))
        .route("/{id:\\d+}", web::put().to(update))
        .route("/{id:\\d+}", web::patch().to(update))
        .route("/{id:\\d+}", web::delete().to(delete))
        .route("/{id:\\d+}", web::post().to(dispatch_override));
}

/// List all categories
///
/// # Endpoint
/// `GET /categories`
pub(super) async fn list(
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<Vec<CategoryInfo>>> {
    let categories = CategoryRepository::find_all(&state.db).await?;
    Ok(WebResponse::ok(
        categories.into_iter().map(CategoryInfo::from).collect(),
    ))
}

/// Retrieve a category by ID
///
/// # Endpoint
/// `GET /categories/{id}`
///
/// # Errors
/// - Not Found (404): When the category is not found
pub(super) async fn get_by_id(
    params: Path<PathId>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<CategoryInfo>> {
    Ok(WebResponse::ok(find_or_404(params.id, &state).await?.into()))
}

/// Create a category from a JSON, urlencoded or multipart body
///
/// # Endpoint
/// `POST /categories`
///
/// # Errors
/// - Unprocessable Entity (422): When a field is invalid
async fn create(
    payload: FormPayload,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<CategoryInfo>> {
    let (input, file) = read_input(&payload, Operation::Create, &state)?;
    let uploaded = store_image(file, &state).await?;
    let model = input.into_new_model(uploaded.clone());

    let created = match persist(model, Operation::Create, &state).await {
        Ok(category) => category,
        Err(e) => {
            if let Some(url) = uploaded {
                state.media.discard(&url).await;
            }
            return Err(e);
        }
    };
    info!("Created category {} ({})", created.id, created.slug);
    Ok(WebResponse::created(created.into()))
}

/// Update a category
///
/// # Endpoint
/// `PUT|PATCH /categories/{id}`
///
/// # Errors
/// - Not Found (404): When the category is not found
/// - Unprocessable Entity (422): When a field is invalid
async fn update(
    params: Path<PathId>,
    payload: FormPayload,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<CategoryInfo>> {
    apply_update(params.id, payload, &state).await
}

/// Delete a category; its products keep existing without a category
///
/// # Endpoint
/// `DELETE /categories/{id}`
async fn delete(
    params: Path<PathId>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<()>> {
    remove(params.id, &state).await
}

/// `POST /categories/{id}` carrying a method override, as sent by multipart forms
async fn dispatch_override(
    req: HttpRequest,
    params: Path<PathId>,
    payload: FormPayload,
    state: web::Data<Arc<AppState>>,
) -> WebResult<Either<WebResponse<CategoryInfo>, WebResponse<()>>> {
    match payload.method_override(&req) {
        Some(Method::PUT) | Some(Method::PATCH) => Ok(Either::Left(
            apply_update(params.id, payload, &state).await?,
        )),
        Some(Method::DELETE) => Ok(Either::Right(remove(params.id, &state).await?)),
        _ => Err(WebError::MethodNotAllowed(
            "The POST method is not supported for this route. Supported methods: GET, PUT, PATCH, DELETE."
                .to_string(),
        )),
    }
}

#[instrument(name = "update-category", skip(payload, state))]
async fn apply_update(
    id: i32,
    payload: FormPayload,
    state: &AppState,
) -> WebResult<WebResponse<CategoryInfo>> {
    let existing = find_or_404(id, state).await?;
    let (input, file) = read_input(&payload, Operation::Write, state)?;
    let uploaded = store_image(file, state).await?;

    let mut model: CategoryActiveModel = existing.into();
    input.apply(&mut model, uploaded.clone());

    if let Err(e) = persist(model, Operation::Write, state).await {
        if let Some(url) = uploaded {
            state.media.discard(&url).await;
        }
        return Err(e);
    }
    // Re-read so the trigger-maintained updated_at is current
    Ok(WebResponse::ok(find_or_404(id, state).await?.into()))
}

#[instrument(name = "delete-category", skip(state))]
async fn remove(id: i32, state: &AppState) -> WebResult<WebResponse<()>> {
    if !CategoryRepository::exists_by_id(id, &state.db).await? {
        return Err(WebError::NotFound(EntityType::Category.name().to_string()));
    }
    CategoryRepository::delete(id, &state.db).await?;
    info!("Deleted category {id}");
    Ok(WebResponse::no_content())
}

async fn find_or_404(id: i32, state: &AppState) -> WebResult<CategoryModel> {
    CategoryRepository::find_by_id(id, &state.db)
        .await?
        .ok_or_else(|| WebError::NotFound(EntityType::Category.name().to_string()))
}

/// Typed fields plus the checked image upload, or every field error at once
fn read_input<'a>(
    payload: &'a FormPayload,
    operation: Operation,
    state: &AppState,
) -> WebResult<(CategoryInput, Option<&'a UploadedFile>)> {
    let mut errors = FieldErrors::new();
    let input = CategoryInput {
        name: payload.text("name", &mut errors),
        description: payload.text("description", &mut errors),
        image: payload.text("image", &mut errors),
    };
    if let Err(rule_errors) = input.check(operation) {
        errors.merge_unreported(rule_errors);
    }
    let file = payload.image_file("image", state.media.max_bytes(), &mut errors);
    errors.into_result()?;
    Ok((input, file))
}

async fn store_image(
    file: Option<&UploadedFile>,
    state: &AppState,
) -> WebResult<Option<String>> {
    match file {
        Some(file) => Ok(Some(
            state.media.store(CATEGORY_MEDIA_NAMESPACE, file).await?,
        )),
        None => Ok(None),
    }
}

async fn persist(
    model: CategoryActiveModel,
    operation: Operation,
    state: &AppState,
) -> WebResult<CategoryModel> {
    state.validator.validate(&model, operation).await?;
    let category = match operation {
        Operation::Create => CategoryRepository::create(model, &state.db).await?,
        _ => CategoryRepository::update(model, &state.db).await?,
    };
    Ok(category)
}
