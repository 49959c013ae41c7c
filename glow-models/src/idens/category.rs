use crate::{
    domain::prelude::SeedCategory,
    initializer::{
        DataSeederTrait, GlowInitializer, InitContext, SeedableInitializerTrait, SeedableTrait,
    },
};
use glow_macros::SeedableInitializer;
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};

#[derive(DeriveIden, SeedableInitializer)]
#[seedable(meta(
    model = SeedCategory,
    name = "categories",
    order = super::INIT_CATEGORY_ORDER,
    create_table = create_category_table,
    create_indexes = create_category_indexes,
    seed_data = get_category_seed_data
))]
pub enum Category {
    #[sea_orm(iden = "categories")]
    Table,
    Id,
    Name,
    Slug,
    Description,
    Image,
    CreatedAt,
    UpdatedAt,
}

fn create_category_table(_backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Category::Table)
        .if_not_exists()
        .col(pk_auto(Category::Id))
        .col(ColumnDef::new(Category::Name).string_len(255).not_null())
        .col(ColumnDef::new(Category::Slug).string_len(255).not_null())
        .col(ColumnDef::new(Category::Description).text())
        .col(ColumnDef::new(Category::Image).string_len(2048))
        .col(
            ColumnDef::new(Category::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Category::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn create_category_indexes(_backend: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![Index::create()
        .if_not_exists()
        .name("idx_categories_slug")
        .table(Category::Table)
        .col(Category::Slug)
        .to_owned()])
}

async fn get_category_seed_data(_: &mut InitContext) -> Result<Option<Vec<SeedCategory>>, DbErr> {
    Ok(Some(vec![
        SeedCategory::new(
            "Soins Visage",
            "soins-visage",
            "Des produits essentiels pour une peau éclatante et saine.",
            "https://images.unsplash.com/photo-1596462502278-27bfdd403cc2?q=80&w=600&auto=format&fit=crop",
        ),
        SeedCategory::new(
            "Maquillage",
            "maquillage",
            "Mettez en valeur votre beauté naturelle.",
            "https://images.unsplash.com/photo-1596462502278-27bfdd403cc2?q=80&w=600&auto=format&fit=crop",
        ),
        SeedCategory::new(
            "Parfums",
            "parfums",
            "Des fragrances envoûtantes pour toutes les occasions.",
            "https://images.unsplash.com/photo-1541643600914-78b084683601?q=80&w=600&auto=format&fit=crop",
        ),
        SeedCategory::new(
            "Corps & Bain",
            "corps-et-bain",
            "Prenez soin de votre corps avec douceur.",
            "https://images.unsplash.com/photo-1542838132-92c53300491e?q=80&w=600&auto=format&fit=crop",
        ),
    ]))
}
