use super::category::Category;
use crate::{
    domain::prelude::SeedProduct,
    initializer::{
        DataSeederTrait, GlowInitializer, InitContext, SeedableInitializerTrait, SeedableTrait,
    },
};
use glow_macros::SeedableInitializer;
use rust_decimal::Decimal;
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};

#[derive(DeriveIden, SeedableInitializer)]
#[seedable(meta(
    model = SeedProduct,
    name = "products",
    order = super::INIT_PRODUCT_ORDER,
    create_table = create_product_table,
    create_indexes = create_product_indexes,
    seed_data = get_product_seed_data
))]
pub enum Product {
    #[sea_orm(iden = "products")]
    Table,
    Id,
    CategoryId,
    Name,
    Slug,
    Description,
    Price,
    Stock,
    Image,
    Ingredients,
    IsActive,
    Featured,
    CreatedAt,
    UpdatedAt,
}

fn create_product_table(_backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Product::Table)
        .if_not_exists()
        .col(pk_auto(Product::Id))
        .col(ColumnDef::new(Product::CategoryId).integer().null())
        .col(ColumnDef::new(Product::Name).string_len(255).not_null())
        .col(ColumnDef::new(Product::Slug).string_len(255).not_null())
        .col(ColumnDef::new(Product::Description).text())
        .col(
            ColumnDef::new(Product::Price)
                .decimal_len(10, 2)
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Product::Stock)
                .integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(Product::Image).string_len(2048))
        .col(ColumnDef::new(Product::Ingredients).json())
        .col(
            ColumnDef::new(Product::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Product::Featured)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Product::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Product::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_products_category_id")
                .from(Product::Table, Product::CategoryId)
                .to(Category::Table, Category::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .on_update(ForeignKeyAction::NoAction),
        )
        .to_owned()
}

fn create_product_indexes(_backend: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![
        Index::create()
            .if_not_exists()
            .name("idx_products_slug")
            .table(Product::Table)
            .col(Product::Slug)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_products_category_id")
            .table(Product::Table)
            .col(Product::CategoryId)
            .to_owned(),
    ])
}

async fn get_product_seed_data(_: &mut InitContext) -> Result<Option<Vec<SeedProduct>>, DbErr> {
    Ok(Some(vec![
        SeedProduct {
            category_slug: "soins-visage".into(),
            name: "Sérum Éclat Vitamine C".into(),
            description: "Un sérum puissant pour illuminer votre teint et réduire les taches pigmentaires.".into(),
            price: Decimal::new(4500, 2),
            stock: 100,
            image: "https://images.unsplash.com/photo-1620916566398-39f1143ab7be?q=80&w=600&auto=format&fit=crop".into(),
            featured: true,
            ingredients: vec!["Vitamin C", "Hyaluronic Acid", "Vitamin E", "Ferulic Acid"],
        },
        SeedProduct {
            category_slug: "soins-visage".into(),
            name: "Crème Hydratante Intense".into(),
            description: "Hydratation profonde de 24h pour les peaux sèches et sensibles.".into(),
            price: Decimal::new(3250, 2),
            stock: 50,
            image: "https://images.unsplash.com/photo-1629198688000-71f23e745b6e?q=80&w=600&auto=format&fit=crop".into(),
            featured: false,
            ingredients: vec!["Water", "Glycerin", "Ceramides", "Shea Butter"],
        },
        SeedProduct {
            category_slug: "maquillage".into(),
            name: "Rouge à Lèvres Velours".into(),
            description: "Fini mat confortable et longue tenue.".into(),
            price: Decimal::new(2800, 2),
            stock: 200,
            image: "https://images.unsplash.com/photo-1627384113743-6bd5a479fffd?q=80&w=600&auto=format&fit=crop".into(),
            featured: true,
            ingredients: vec!["Dimethicone", "Pigments", "Jojoba Oil"],
        },
        SeedProduct {
            category_slug: "maquillage".into(),
            name: "Mascara Volume Extrême".into(),
            description: "Pour des cils démultipliés et un regard intense.".into(),
            price: Decimal::new(2400, 2),
            stock: 150,
            image: "https://images.unsplash.com/photo-1631214500115-598fc2cb8d2d?q=80&w=600&auto=format&fit=crop".into(),
            featured: false,
            ingredients: vec!["Beeswax", "Carnauba Wax", "Pigments"],
        },
        SeedProduct {
            category_slug: "parfums".into(),
            name: "Eau de Parfum \"Jardin Secret\"".into(),
            description: "Notes florales et boisées pour une élégance intemporelle.".into(),
            price: Decimal::new(8500, 2),
            stock: 30,
            image: "https://images.unsplash.com/photo-1594035910387-fea4779426e9?q=80&w=600&auto=format&fit=crop".into(),
            featured: true,
            ingredients: vec!["Alcohol", "Parfum", "Water"],
        },
        SeedProduct {
            category_slug: "corps-et-bain".into(),
            name: "Gommage Corps Sucre & Miel".into(),
            description: "Exfolie en douceur pour une peau soyeuse.".into(),
            price: Decimal::new(1800, 2),
            stock: 80,
            image: "https://images.unsplash.com/photo-1616683693504-3ea7e9ad6fec?q=80&w=600&auto=format&fit=crop".into(),
            featured: false,
            ingredients: vec!["Sugar", "Honey", "Almond Oil"],
        },
    ]))
}
