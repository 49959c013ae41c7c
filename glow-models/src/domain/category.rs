use crate::{
    domain::common::require,
    entities::prelude::{Category, CategoryActiveModel, CategoryColumn, CategoryModel},
    enums::common::Operation,
    initializer::{InitContext, SeedOutcome, SeedableTrait},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use glow_error::validation::FieldErrors;
use glow_utils::slug::slugify;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, DerivePartialModel, EntityTrait,
    FromQueryResult, IntoActiveModel, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[sea_orm(entity = "Category")]
pub struct CategoryInfo {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<CategoryModel> for CategoryInfo {
    fn from(model: CategoryModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            image: model.image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Category fields as submitted on create or update.
///
/// `None` means the field was not sent, `Some(None)` that it was sent as null.
#[derive(Clone, Debug, Default, PartialEq, Validate)]
pub struct CategoryInput {
    #[validate(length(
        max = 255,
        message = "The name field must not be greater than 255 characters."
    ))]
    pub name: Option<Option<String>>,
    pub description: Option<Option<String>>,
    /// Image URL; an uploaded file takes precedence
    pub image: Option<Option<String>>,
}

impl CategoryInput {
    /// Field rules for the operation: `name` is required on create and cannot be cleared
    pub fn check(&self, operation: Operation) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Err(e) = self.validate() {
            errors.merge(e.into());
        }
        require(&mut errors, "name", &self.name, operation.is_create());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Writes the submitted fields onto `model`, recomputing the slug when the name changes
    pub fn apply(self, model: &mut CategoryActiveModel, uploaded_image: Option<String>) {
        if let Some(Some(name)) = self.name {
            model.slug = Set(slugify(&name));
            model.name = Set(name);
        }
        if let Some(description) = self.description {
            model.description = Set(description);
        }
        match uploaded_image {
            Some(path) => model.image = Set(Some(path)),
            None => {
                if let Some(image) = self.image {
                    model.image = Set(image);
                }
            }
        }
    }

    /// Fresh active model for a create
    pub fn into_new_model(self, uploaded_image: Option<String>) -> CategoryActiveModel {
        let mut model = CategoryActiveModel {
            description: Set(None),
            image: Set(None),
            ..Default::default()
        };
        self.apply(&mut model, uploaded_image);
        model
    }
}

/// Seed category, upserted by slug
#[derive(Clone, Debug)]
pub struct SeedCategory {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
}

impl SeedCategory {
    pub fn new(name: &str, slug: &str, description: &str, image: &str) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            description: description.into(),
            image: image.into(),
        }
    }
}

#[async_trait]
impl SeedableTrait for SeedCategory {
    type Saved = CategoryModel;

    fn natural_key(&self) -> &str {
        &self.slug
    }

    async fn upsert(
        &self,
        transaction: &DatabaseTransaction,
        _ctx: &InitContext,
    ) -> Result<(SeedOutcome, CategoryModel), DbErr> {
        let existing = Category::find()
            .filter(CategoryColumn::Slug.eq(self.slug.as_str()))
            .one(transaction)
            .await?;

        let (mut model, outcome) = match existing {
            Some(existing) => (existing.into_active_model(), SeedOutcome::Updated),
            None => (
                CategoryActiveModel {
                    slug: Set(self.slug.clone()),
                    ..Default::default()
                },
                SeedOutcome::Inserted,
            ),
        };
        model.name = Set(self.name.clone());
        model.description = Set(Some(self.description.clone()));
        model.image = Set(Some(self.image.clone()));
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

    fn named(name: &str) -> CategoryInput {
        CategoryInput {
            name: Some(Some(name.into())),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_requires_name() {
        let errors = CategoryInput::default()
            .check(Operation::Create)
            .unwrap_err();
        assert_eq!(
            errors.get("name"),
            Some(&["The name field is required.".to_string()][..])
        );
        assert!(CategoryInput::default().check(Operation::Write).is_ok());
    }

    #[test]
    fn test_update_cannot_clear_name() {
        let input = CategoryInput {
            name: Some(None),
            ..Default::default()
        };
        assert!(input.check(Operation::Write).unwrap_err().contains("name"));
    }

    #[test]
    fn test_name_length() {
        let errors = named(&"a".repeat(256)).check(Operation::Create).unwrap_err();
        assert_eq!(
            errors.get("name"),
            Some(&["The name field must not be greater than 255 characters.".to_string()][..])
        );
        assert!(named(&"é".repeat(255)).check(Operation::Create).is_ok());
    }

    #[test]
    fn test_apply_derives_slug() {
        let model = named("Soins Visage").into_new_model(None);
        assert_eq!(model.slug, ActiveValue::Set("soins-visage".to_string()));
        assert_eq!(model.name, ActiveValue::Set("Soins Visage".to_string()));
        assert_eq!(model.image, ActiveValue::Set(None));
    }

    #[test]
    fn test_uploaded_image_wins_over_url() {
        let input = CategoryInput {
            image: Some(Some("https://cdn.example.com/a.jpg".into())),
            ..named("Parfums")
        };
        let model = input.into_new_model(Some("/storage/categories/abc.jpg".into()));
        assert_eq!(
            model.image,
            ActiveValue::Set(Some("/storage/categories/abc.jpg".to_string()))
        );
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let mut model = CategoryModel {
            id: 1,
            name: "Maquillage".into(),
            slug: "maquillage".into(),
            description: Some("desc".into()),
            image: Some("https://cdn.example.com/m.jpg".into()),
            created_at: None,
            updated_at: None,
        }
        .into_active_model();

        CategoryInput {
            description: Some(None),
            ..Default::default()
        }
        .apply(&mut model, None);

        assert_eq!(model.description, ActiveValue::Set(None));
        assert!(!model.name.is_set());
        assert!(!model.slug.is_set());
        assert!(!model.image.is_set());
    }
}
