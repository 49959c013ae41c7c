//! Product endpoints

use crate::{form::FormPayload, AppState};
use actix_web::{http::Method, web, Either, HttpRequest};
use actix_web_validator::{Path, Query};
use glow_error::{validation::FieldErrors, web::WebError, WebResult};
use glow_models::{
    constants::PRODUCT_MEDIA_NAMESPACE,
    domain::prelude::{
        InventoryStats, PathId, ProductInfo, ProductInput, ProductListParams, ProductListQuery,
    },
    entities::prelude::{ProductActiveModel, ProductModel},
    enums::common::{EntityType, Operation},
    web::WebResponse,
};
use glow_repository::ProductRepository;
use glow_storage::UploadedFile;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub(super) const ROUTER_PREFIX: &str = "/products";

/// Configure authenticated product routes
///
/// # Routes
/// - POST ``: Create a product
/// - GET `/stats`: Inventory summary
/// - PUT|PATCH `/{id}`: Update a product
/// - DELETE `/{id}`: Delete a product
/// - POST `/{id}`: Update or delete through `_method`
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create))
        .route("/stats", web::get().to(stats))
        .route("/{id:\\d+}", web::put().to(update))
        .route("/{id:\\d+}", web::patch().to(update))
        .route("/{id:\\d+}", web::delete().to(delete))
        .route("/{id:\\d+}", web::post().to(dispatch_override));
}

/// List products with their category attached
///
/// # Endpoint
/// `GET /products`
///
/// # Parameters
/// - `category`: category slug
/// - `search`, `min_price`, `max_price`, `featured`, `is_active`, `stock`, `sort`
///
/// Without parameters every product is returned in store order.
pub(super) async fn list(
    query: Query<ProductListQuery>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<Vec<ProductInfo>>> {
    let params = ProductListParams::try_from(query.into_inner())?;
    if params.blank_category() {
        return Ok(WebResponse::ok(Vec::new()));
    }
    let rows = ProductRepository::find_all(params.category_slug(), &state.db).await?;
    let products = rows
        .into_iter()
        .map(|(product, category)| ProductInfo::new(product, category))
        .collect();
    let products = params.apply(products, state.settings.catalog.low_stock_threshold);
    debug!("Listing {} products", products.len());
    Ok(WebResponse::ok(products))
}

/// Retrieve a product by ID
///
/// # Endpoint
/// `GET /products/{id}`
///
/// # Errors
/// - Not Found (404): When the product is not found
pub(super) async fn get_by_id(
    params: Path<PathId>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<ProductInfo>> {
    Ok(WebResponse::ok(find_info_or_404(params.id, &state).await?))
}

/// Inventory summary over the whole catalog
///
/// # Endpoint
/// `GET /products/stats`
async fn stats(state: web::Data<Arc<AppState>>) -> WebResult<WebResponse<InventoryStats>> {
    let products = ProductRepository::find_models(&state.db).await?;
    Ok(WebResponse::ok(InventoryStats::compute(
        &products,
        state.settings.catalog.low_stock_threshold,
    )))
}

/// Create a product
///
/// # Endpoint
/// `POST /products`
///
/// # Errors
/// - Unprocessable Entity (422): When a field is invalid or the category does not exist
async fn create(
    payload: FormPayload,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<ProductInfo>> {
    let (input, file) = read_input(&payload, Operation::Create, &state)?;
    let uploaded = store_image(file, &state).await?;
    let model = input.into_new_model(uploaded.clone());

    let created = match persist(model, Operation::Create, &state).await {
        Ok(product) => product,
        Err(e) => {
            if let Some(url) = uploaded {
                state.media.discard(&url).await;
            }
            return Err(e);
        }
    };
    info!("Created product {} ({})", created.id, created.slug);
    Ok(WebResponse::created(
        find_info_or_404(created.id, &state).await?,
    ))
}

/// Update a product
///
/// # Endpoint
/// `PUT|PATCH /products/{id}`
///
/// # Errors
/// - Not Found (404): When the product is not found
/// - Unprocessable Entity (422): When a field is invalid or the category does not exist
async fn update(
    params: Path<PathId>,
    payload: FormPayload,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<ProductInfo>> {
    apply_update(params.id, payload, &state).await
}

/// Delete a product
///
/// # Endpoint
/// `DELETE /products/{id}`
async fn delete(
    params: Path<PathId>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<WebResponse<()>> {
    remove(params.id, &state).await
}

/// `POST /products/{id}` carrying a method override
async fn dispatch_override(
    req: HttpRequest,
    params: Path<PathId>,
    payload: FormPayload,
    state: web::Data<Arc<AppState>>,
) -> WebResult<Either<WebResponse<ProductInfo>, WebResponse<()>>> {
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

#[instrument(name = "update-product", skip(payload, state))]
async fn apply_update(
    id: i32,
    payload: FormPayload,
    state: &AppState,
) -> WebResult<WebResponse<ProductInfo>> {
    let existing = ProductRepository::find_by_id(id, &state.db)
        .await?
        .ok_or_else(not_found)?;
    let (input, file) = read_input(&payload, Operation::Write, state)?;
    let uploaded = store_image(file, state).await?;

    let mut model: ProductActiveModel = existing.into();
    input.apply(&mut model, uploaded.clone());

    if let Err(e) = persist(model, Operation::Write, state).await {
        if let Some(url) = uploaded {
            state.media.discard(&url).await;
        }
        return Err(e);
    }
    Ok(WebResponse::ok(find_info_or_404(id, state).await?))
}

#[instrument(name = "delete-product", skip(state))]
async fn remove(id: i32, state: &AppState) -> WebResult<WebResponse<()>> {
    if ProductRepository::find_by_id(id, &state.db).await?.is_none() {
        return Err(not_found());
    }
    ProductRepository::delete(id, &state.db).await?;
    info!("Deleted product {id}");
    Ok(WebResponse::no_content())
}

#[inline]
fn not_found() -> WebError {
    WebError::NotFound(EntityType::Product.name().to_string())
}

async fn find_info_or_404(id: i32, state: &AppState) -> WebResult<ProductInfo> {
    let (product, category) = ProductRepository::find_with_category(id, &state.db)
        .await?
        .ok_or_else(not_found)?;
    Ok(ProductInfo::new(product, category))
}

fn read_input<'a>(
    payload: &'a FormPayload,
    operation: Operation,
    state: &AppState,
) -> WebResult<(ProductInput, Option<&'a UploadedFile>)> {
    let mut errors = FieldErrors::new();
    let input = ProductInput {
        name: payload.text("name", &mut errors),
        category_id: payload.integer("category_id", &mut errors),
        description: payload.text("description", &mut errors),
        price: payload.decimal("price", &mut errors),
        stock: payload.integer("stock", &mut errors),
        stock_quantity: payload.integer("stock_quantity", &mut errors),
        ingredients: payload.string_list("ingredients", &mut errors),
        image: payload.text("image", &mut errors),
        image_url: payload.text("image_url", &mut errors),
        is_active: payload.boolean("is_active", &mut errors),
        featured: payload.boolean("featured", &mut errors),
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
        Some(file) => Ok(Some(state.media.store(PRODUCT_MEDIA_NAMESPACE, file).await?)),
        None => Ok(None),
    }
}

async fn persist(
    model: ProductActiveModel,
    operation: Operation,
    state: &AppState,
) -> WebResult<ProductModel> {
    state.validator.validate(&model, operation).await?;
    let product = match operation {
        Operation::Create => ProductRepository::create(model, &state.db).await?,
        _ => ProductRepository::update(model, &state.db).await?,
    };
    Ok(product)
}
