use crate::{
    constants::MAX_PRICE,
    domain::{
        category::CategoryInfo,
        common::{parse_bool, require, round_price, serialize_price},
    },
    entities::prelude::{
        Category, CategoryModel, Ingredients, Product, ProductActiveModel, ProductColumn,
        ProductModel,
    },
    enums::{
        catalog::{ProductSort, StockStatus},
        common::Operation,
    },
    initializer::{InitContext, SeedOutcome, SeedableTrait},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use glow_error::validation::FieldErrors;
use glow_utils::slug::{fold_ascii, product_slug, slugify};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityName, EntityTrait,
    IntoActiveModel, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// Product as returned by the API, with its category attached
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductInfo {
    pub id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(serialize_with = "serialize_price")]
    pub price: Decimal,
    pub stock: i32,
    pub image: Option<String>,
    /// Read alias of `image`
    pub image_url: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub is_active: bool,
    pub featured: bool,
    pub category_name: Option<String>,
    pub category: Option<CategoryInfo>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProductInfo {
    pub fn new(product: ProductModel, category: Option<CategoryModel>) -> Self {
        let category = category.map(CategoryInfo::from);
        Self {
            id: product.id,
            category_id: product.category_id,
            name: product.name,
            slug: product.slug,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_url: product.image.clone(),
            image: product.image,
            ingredients: product.ingredients.map(|i| i.0),
            is_active: product.is_active,
            featured: product.featured,
            category_name: category.as_ref().map(|c| c.name.clone()),
            category,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Product fields as submitted on create or update.
///
/// Two pairs of names reach the same column: `stock_quantity` overrides `stock`
/// and `image_url` overrides `image`. An uploaded file overrides both image names.
#[derive(Clone, Debug, Default, PartialEq, Validate)]
pub struct ProductInput {
    #[validate(length(
        max = 255,
        message = "The name field must not be greater than 255 characters."
    ))]
    pub name: Option<Option<String>>,
    pub category_id: Option<Option<i32>>,
    pub description: Option<Option<String>>,
    pub price: Option<Option<Decimal>>,
    #[validate(range(min = 0, message = "The stock field must be at least 0."))]
    pub stock: Option<Option<i32>>,
    #[validate(range(min = 0, message = "The stock quantity field must be at least 0."))]
    pub stock_quantity: Option<Option<i32>>,
    pub ingredients: Option<Option<Vec<String>>>,
    pub image: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub is_active: Option<Option<bool>>,
    pub featured: Option<Option<bool>>,
}

impl ProductInput {
    /// Field rules for the operation: `name` and `price` are required on create
    /// and cannot be cleared on update
    pub fn check(&self, operation: Operation) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Err(e) = self.validate() {
            errors.merge(e.into());
        }
        require(&mut errors, "name", &self.name, operation.is_create());
        require(&mut errors, "price", &self.price, operation.is_create());
        if let Some(Some(price)) = &self.price {
            if *price < Decimal::ZERO {
                errors.add("price", "The price field must be at least 0.");
            } else if round_price(*price) > MAX_PRICE {
                errors.add(
                    "price",
                    format!("The price field must not be greater than {MAX_PRICE}."),
                );
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Canonical stock value: the alias wins when both names are sent
    pub fn resolved_stock(&self) -> Option<i32> {
        match (&self.stock_quantity, &self.stock) {
            (Some(Some(quantity)), _) => Some(*quantity),
            (_, Some(Some(stock))) => Some(*stock),
            _ => None,
        }
    }

    /// Writes the submitted fields onto `model`.
    ///
    /// A name change re-derives the slug with a fresh random suffix.
    pub fn apply(self, model: &mut ProductActiveModel, uploaded_image: Option<String>) {
        if let Some(stock) = self.resolved_stock() {
            model.stock = Set(stock);
        }
        if let Some(Some(name)) = self.name {
            model.slug = Set(product_slug(&name));
            model.name = Set(name);
        }
        if let Some(category_id) = self.category_id {
            model.category_id = Set(category_id);
        }
        if let Some(description) = self.description {
            model.description = Set(description);
        }
        if let Some(Some(price)) = self.price {
            model.price = Set(round_price(price));
        }
        if let Some(ingredients) = self.ingredients {
            model.ingredients = Set(ingredients.map(Ingredients));
        }
        match (uploaded_image, self.image_url) {
            (Some(path), _) => model.image = Set(Some(path)),
            (None, Some(Some(url))) => model.image = Set(Some(url)),
            _ => {
                if let Some(image) = self.image {
                    model.image = Set(image);
                }
            }
        }
        if let Some(Some(is_active)) = self.is_active {
            model.is_active = Set(is_active);
        }
        if let Some(Some(featured)) = self.featured {
            model.featured = Set(featured);
        }
    }

    /// Fresh active model for a create, column defaults applied first
    pub fn into_new_model(self, uploaded_image: Option<String>) -> ProductActiveModel {
        let mut model = ProductActiveModel {
            category_id: Set(None),
            description: Set(None),
            stock: Set(0),
            image: Set(None),
            ingredients: Set(None),
            is_active: Set(true),
            featured: Set(false),
            ..Default::default()
        };
        self.apply(&mut model, uploaded_image);
        model
    }
}

/// Raw query string of `GET /products`.
///
/// Values stay text until [`ProductListParams::try_from`] so a malformed one is
/// reported against its own name.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub featured: Option<String>,
    pub is_active: Option<String>,
    pub stock: Option<String>,
    pub sort: Option<String>,
}

/// Parsed filters of `GET /products`
#[derive(Clone, Debug, Default)]
pub struct ProductListParams {
    /// Category slug
    pub category: Option<String>,
    /// Case-insensitive substring of name or description
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
    pub stock: Option<StockStatus>,
    pub sort: Option<ProductSort>,
}

impl ProductListParams {
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                errors.add(
                    "min_price",
                    "The min price field must be less than or equal to max price.",
                );
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Category slug to filter on
    pub fn category_slug(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
    }

    /// `?category=` with no value still filters, and no category matches it
    pub fn blank_category(&self) -> bool {
        self.category
            .as_deref()
            .is_some_and(|slug| slug.trim().is_empty())
    }

    /// Filters and sorts an already category-scoped list; without parameters the
    /// list comes back untouched in store order
    pub fn apply(&self, products: Vec<ProductInfo>, low_stock_threshold: i32) -> Vec<ProductInfo> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut products: Vec<ProductInfo> = products
            .into_iter()
            .filter(|p| match &needle {
                Some(needle) => {
                    p.name.to_lowercase().contains(needle)
                        || p
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(needle))
                }
                None => true,
            })
            .filter(|p| self.min_price.map_or(true, |min| p.price >= min))
            .filter(|p| self.max_price.map_or(true, |max| p.price <= max))
            .filter(|p| self.featured.map_or(true, |f| p.featured == f))
            .filter(|p| self.is_active.map_or(true, |a| p.is_active == a))
            .filter(|p| {
                self.stock
                    .map_or(true, |s| StockStatus::of(p.stock, low_stock_threshold) == s)
            })
            .collect();

        match self.sort.unwrap_or_default() {
            ProductSort::Newest => {}
            ProductSort::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductSort::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSort::Name => {
                products.sort_by_cached_key(|p| fold_ascii(&p.name).to_lowercase())
            }
        }
        products
    }
}

impl TryFrom<ProductListQuery> for ProductListParams {
    type Error = FieldErrors;

    fn try_from(query: ProductListQuery) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::new();
        let params = ProductListParams {
            category: query.category,
            search: query.search,
            min_price: parse_query(&mut errors, "min_price", query.min_price, |v| {
                Decimal::from_str(v).ok()
            }),
            max_price: parse_query(&mut errors, "max_price", query.max_price, |v| {
                Decimal::from_str(v).ok()
            }),
            featured: parse_query(&mut errors, "featured", query.featured, parse_bool),
            is_active: parse_query(&mut errors, "is_active", query.is_active, parse_bool),
            stock: parse_query(&mut errors, "stock", query.stock, |v| v.parse().ok()),
            sort: parse_query(&mut errors, "sort", query.sort, |v| v.parse().ok()),
        };
        if let Err(e) = params.check() {
            errors.merge_unreported(e);
        }
        if errors.is_empty() {
            Ok(params)
        } else {
            Err(errors)
        }
    }
}

/// Blank values count as absent
fn parse_query<T>(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<String>,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = raw.filter(|v| !v.trim().is_empty())?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        let label = field.replace('_', " ");
        let message = match field {
            "min_price" | "max_price" => format!("The {label} field must be a number."),
            "featured" | "is_active" => format!("The {label} field must be true or false."),
            _ => format!("The selected {label} is invalid."),
        };
        errors.add(field, message);
    }
    parsed
}

/// Inventory summary over the whole catalog
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InventoryStats {
    pub total_products: usize,
    pub active_products: usize,
    pub featured_products: usize,
    pub total_stock: i64,
    pub low_stock: usize,
    pub out_of_stock: usize,
    #[serde(serialize_with = "serialize_price")]
    pub inventory_value: Decimal,
}

impl InventoryStats {
    pub fn compute(products: &[ProductModel], low_stock_threshold: i32) -> Self {
        products.iter().fold(Self::default(), |mut stats, p| {
            stats.total_products += 1;
            stats.active_products += usize::from(p.is_active);
            stats.featured_products += usize::from(p.featured);
            stats.total_stock += i64::from(p.stock);
            match StockStatus::of(p.stock, low_stock_threshold) {
                StockStatus::Low => stats.low_stock += 1,
                StockStatus::Out => stats.out_of_stock += 1,
                StockStatus::In => {}
            }
            // Saturates on rows outside the decimal(10, 2) range
            stats.inventory_value = p
                .price
                .checked_mul(Decimal::from(p.stock.max(0)))
                .and_then(|value| stats.inventory_value.checked_add(value))
                .unwrap_or(Decimal::MAX);
            stats
        })
    }
}

/// Seed product, upserted by the slug of its name
#[derive(Clone, Debug)]
pub struct SeedProduct {
    pub category_slug: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub image: String,
    pub featured: bool,
    pub ingredients: Vec<&'static str>,
}

impl SeedProduct {
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

#[async_trait]
impl SeedableTrait for SeedProduct {
    type Saved = ProductModel;

    fn natural_key(&self) -> &str {
        &self.name
    }

    async fn upsert(
        &self,
        transaction: &DatabaseTransaction,
        ctx: &InitContext,
    ) -> Result<(SeedOutcome, ProductModel), DbErr> {
        // Categories are seeded first and their stored rows shared through `ctx`
        let category_id = ctx
            .get::<CategoryModel>(Category.table_name())
            .map_err(|e| DbErr::Custom(e.to_string()))?
            .into_iter()
            .find(|category| category.slug == self.category_slug)
            .map(|category| category.id)
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!(
                    "seed category `{}` for product `{}`",
                    self.category_slug, self.name
                ))
            })?;

        let slug = self.slug();
        let existing = Product::find()
            .filter(ProductColumn::Slug.eq(slug.as_str()))
            .one(transaction)
            .await?;

        let (mut model, outcome) = match existing {
            Some(existing) => (existing.into_active_model(), SeedOutcome::Updated),
            None => (
                ProductActiveModel {
                    slug: Set(slug),
                    is_active: Set(true),
                    ..Default::default()
                },
                SeedOutcome::Inserted,
            ),
        };
        model.category_id = Set(Some(category_id));
        model.name = Set(self.name.clone());
        model.description = Set(Some(self.description.clone()));
        model.price = Set(self.price);
        model.stock = Set(self.stock);
        model.image = Set(Some(self.image.clone()));
        model.featured = Set(self.featured);
        model.ingredients = Set(Some(Ingredients(
            self.ingredients.iter().map(|i| i.to_string()).collect(),
        )));
        let saved = match outcome {
            SeedOutcome::Inserted => model.insert(transaction).await?,
            SeedOutcome::Updated => model.update(transaction).await?,
        };
        Ok((outcome, saved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn product(id: i32, name: &str, price: i64, stock: i32) -> ProductModel {
        ProductModel {
            id,
            category_id: None,
            name: name.into(),
            slug: slugify(name),
            description: None,
            price: Decimal::new(price * 100, 2),
            stock,
            image: None,
            ingredients: None,
            is_active: true,
            featured: false,
            created_at: None,
            updated_at: None,
        }
    }

    fn info(id: i32, name: &str, price: i64, stock: i32) -> ProductInfo {
        ProductInfo::new(product(id, name, price, stock), None)
    }

    fn valid_input() -> ProductInput {
        ProductInput {
            name: Some(Some("Sérum X".into())),
            price: Some(Some(Decimal::new(45, 0))),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_requires_name_and_price() {
        let errors = ProductInput::default()
            .check(Operation::Create)
            .unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("price"));
        assert!(ProductInput::default().check(Operation::Write).is_ok());
    }

    #[test]
    fn test_negative_values_rejected() {
        let input = ProductInput {
            price: Some(Some(Decimal::new(-1, 0))),
            stock: Some(Some(-3)),
            stock_quantity: Some(Some(-1)),
            ..valid_input()
        };
        let errors = input.check(Operation::Create).unwrap_err();
        assert_eq!(
            errors.get("price"),
            Some(&["The price field must be at least 0.".to_string()][..])
        );
        assert!(errors.contains("stock"));
        assert!(errors.contains("stock_quantity"));
    }

    #[test]
    fn test_price_upper_bound() {
        let input = ProductInput {
            price: Some(Some(Decimal::new(9_000_000_000, 0))),
            ..valid_input()
        };
        let errors = input.check(Operation::Create).unwrap_err();
        assert_eq!(
            errors.get("price"),
            Some(&["The price field must not be greater than 99999999.99.".to_string()][..])
        );

        let at_limit = ProductInput {
            price: Some(Some(MAX_PRICE)),
            ..valid_input()
        };
        assert!(at_limit.check(Operation::Create).is_ok());

        let rounds_over = ProductInput {
            price: Some(Some(Decimal::new(99_999_999_995, 3))),
            ..valid_input()
        };
        assert!(rounds_over.check(Operation::Write).unwrap_err().contains("price"));
    }

    #[test]
    fn test_price_rounds_half_away_from_zero() {
        let input = ProductInput {
            price: Some(Some(Decimal::new(45_125, 3))),
            ..valid_input()
        };
        let model = input.into_new_model(None);
        assert_eq!(model.price, ActiveValue::Set(Decimal::new(4513, 2)));
    }

    #[test]
    fn test_stock_quantity_wins_over_stock() {
        let input = ProductInput {
            stock: Some(Some(3)),
            stock_quantity: Some(Some(10)),
            ..valid_input()
        };
        assert_eq!(input.resolved_stock(), Some(10));
        let model = input.into_new_model(None);
        assert_eq!(model.stock, ActiveValue::Set(10));

        let input = ProductInput {
            stock: Some(Some(3)),
            stock_quantity: Some(None),
            ..valid_input()
        };
        assert_eq!(input.resolved_stock(), Some(3));
    }

    #[test]
    fn test_image_precedence() {
        let input = ProductInput {
            image: Some(Some("https://cdn.example.com/plain.jpg".into())),
            image_url: Some(Some("https://cdn.example.com/alias.jpg".into())),
            ..valid_input()
        };
        let model = input.clone().into_new_model(None);
        assert_eq!(
            model.image,
            ActiveValue::Set(Some("https://cdn.example.com/alias.jpg".to_string()))
        );

        let model = input.into_new_model(Some("/storage/products/x.png".into()));
        assert_eq!(
            model.image,
            ActiveValue::Set(Some("/storage/products/x.png".to_string()))
        );
    }

    #[test]
    fn test_new_model_defaults_and_slug() {
        let model = valid_input().into_new_model(None);
        assert_eq!(model.stock, ActiveValue::Set(0));
        assert_eq!(model.is_active, ActiveValue::Set(true));
        assert_eq!(model.featured, ActiveValue::Set(false));
        assert_eq!(model.price, ActiveValue::Set(Decimal::new(4500, 2)));

        let ActiveValue::Set(slug) = model.slug else {
            panic!("slug not set");
        };
        assert!(slug.starts_with("serum-x-"));
        assert_eq!(slug.len(), "serum-x-".len() + 6);
    }

    #[test]
    fn test_update_without_name_keeps_slug() {
        let mut model = product(1, "Mascara", 24, 150).into_active_model();
        ProductInput {
            featured: Some(Some(true)),
            stock: Some(None),
            ..Default::default()
        }
        .apply(&mut model, None);
        assert!(!model.slug.is_set());
        assert!(!model.stock.is_set());
        assert_eq!(model.featured, ActiveValue::Set(true));
    }

    #[test]
    fn test_read_view_aliases() {
        let mut model = product(7, "Parfum", 85, 30);
        model.image = Some("https://cdn.example.com/p.jpg".into());
        let category = CategoryModel {
            id: 3,
            name: "Parfums".into(),
            slug: "parfums".into(),
            description: None,
            image: None,
            created_at: None,
            updated_at: None,
        };
        model.category_id = Some(3);

        let view = ProductInfo::new(model, Some(category));
        assert_eq!(view.category_name.as_deref(), Some("Parfums"));
        assert_eq!(view.image_url, view.image);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["price"], "85.00");
        assert_eq!(json["stock"], 30);
        assert_eq!(json["category"]["slug"], "parfums");
        assert!(json.get("stock_quantity").is_none());
    }

    #[test]
    fn test_list_without_params_keeps_store_order() {
        let list = vec![info(1, "B", 10, 1), info(2, "A", 5, 0)];
        let result = ProductListParams::default().apply(list.clone(), 5);
        assert_eq!(result, list);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut with_desc = info(3, "Gommage", 18, 80);
        with_desc.description = Some("Exfolie en DOUCEUR".into());
        let list = vec![
            info(1, "Sérum Éclat Vitamine C", 45, 100),
            info(2, "Mascara", 24, 150),
            with_desc,
        ];

        let params = ProductListParams {
            search: Some("éCLAT".into()),
            ..Default::default()
        };
        let ids: Vec<i32> = params.apply(list.clone(), 5).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);

        let params = ProductListParams {
            search: Some("douceur".into()),
            ..Default::default()
        };
        let ids: Vec<i32> = params.apply(list, 5).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_price_bounds_and_sorting() {
        let list = vec![
            info(1, "Crème", 32, 50),
            info(2, "Rouge", 28, 200),
            info(3, "Eau de Parfum", 85, 30),
            info(4, "Gommage", 18, 80),
        ];

        let params = ProductListParams {
            min_price: Some(Decimal::new(20, 0)),
            max_price: Some(Decimal::new(40, 0)),
            sort: Some(ProductSort::PriceDesc),
            ..Default::default()
        };
        let ids: Vec<i32> = params.apply(list.clone(), 5).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let params = ProductListParams {
            sort: Some(ProductSort::Name),
            ..Default::default()
        };
        let ids: Vec<i32> = params.apply(list, 5).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 4, 2]);
    }

    #[test]
    fn test_stock_filter() {
        let list = vec![info(1, "A", 1, 0), info(2, "B", 1, 3), info(3, "C", 1, 40)];
        let ids = |status| -> Vec<i32> {
            ProductListParams {
                stock: Some(status),
                ..Default::default()
            }
            .apply(list.clone(), 5)
            .iter()
            .map(|p| p.id)
            .collect()
        };
        assert_eq!(ids(StockStatus::Out), vec![1]);
        assert_eq!(ids(StockStatus::Low), vec![2]);
        assert_eq!(ids(StockStatus::In), vec![3]);
    }

    #[test]
    fn test_query_values_are_parsed_per_field() {
        let query = ProductListQuery {
            min_price: Some("abc".into()),
            featured: Some("maybe".into()),
            sort: Some("cheapest".into()),
            stock: Some("low".into()),
            max_price: Some(" ".into()),
            ..Default::default()
        };
        let errors = ProductListParams::try_from(query).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.get("min_price"),
            Some(&["The min price field must be a number.".to_string()][..])
        );
        assert_eq!(
            errors.get("featured"),
            Some(&["The featured field must be true or false.".to_string()][..])
        );
        assert_eq!(
            errors.get("sort"),
            Some(&["The selected sort is invalid.".to_string()][..])
        );

        let query = ProductListQuery {
            min_price: Some("10.5".into()),
            is_active: Some("0".into()),
            sort: Some("price-asc".into()),
            ..Default::default()
        };
        let params = ProductListParams::try_from(query).unwrap();
        assert_eq!(params.min_price, Some(Decimal::new(105, 1)));
        assert_eq!(params.is_active, Some(false));
        assert_eq!(params.sort, Some(ProductSort::PriceAsc));
        assert_eq!(params.max_price, None);
    }

    #[test]
    fn test_blank_category_still_filters() {
        let params = ProductListParams {
            category: Some(String::new()),
            ..Default::default()
        };
        assert!(params.blank_category());
        assert_eq!(params.category_slug(), None);

        let params = ProductListParams {
            category: Some("parfums".into()),
            ..Default::default()
        };
        assert!(!params.blank_category());
        assert!(!ProductListParams::default().blank_category());
    }

    #[test]
    fn test_price_range_check() {
        let params = ProductListParams {
            min_price: Some(Decimal::new(50, 0)),
            max_price: Some(Decimal::new(10, 0)),
            ..Default::default()
        };
        assert!(params.check().unwrap_err().contains("min_price"));
        assert!(ProductListParams::default().check().is_ok());
    }

    #[test]
    fn test_inventory_stats() {
        let mut featured = product(3, "C", 10, 40);
        featured.featured = true;
        let products = vec![product(1, "A", 45, 0), product(2, "B", 32, 3), featured];

        let stats = InventoryStats::compute(&products, 5);
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.featured_products, 1);
        assert_eq!(stats.total_stock, 43);
        assert_eq!(stats.low_stock, 1);
        assert_eq!(stats.out_of_stock, 1);
        assert_eq!(stats.inventory_value, Decimal::new(496, 0));
        assert_eq!(
            serde_json::to_value(&stats).unwrap()["inventory_value"],
            "496.00"
        );
    }

    #[test]
    fn test_inventory_value_saturates() {
        let mut huge = product(1, "Huge", 0, 100);
        huge.price = Decimal::from_str_exact("8999999999999999844710088704").unwrap();
        let products = vec![huge, product(2, "B", 10, 1)];

        let stats = InventoryStats::compute(&products, 5);
        assert_eq!(stats.total_stock, 101);
        assert_eq!(stats.inventory_value, Decimal::MAX);
        assert!(serde_json::to_value(&stats).is_ok());
    }

    #[test]
    fn test_seed_slug_has_no_suffix() {
        let seed = SeedProduct {
            category_slug: "parfums".into(),
            name: "Eau de Parfum \"Jardin Secret\"".into(),
            description: String::new(),
            price: Decimal::new(8500, 2),
            stock: 30,
            image: String::new(),
            featured: true,
            ingredients: vec![],
        };
        assert_eq!(seed.slug(), "eau-de-parfum-jardin-secret");
    }
}
