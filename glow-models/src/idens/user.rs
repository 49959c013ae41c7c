use crate::{
    domain::prelude::SeedUser,
    enums::user::UserRole,
    initializer::{
        DataSeederTrait, GlowInitializer, InitContext, SeedableInitializerTrait, SeedableTrait,
    },
};
use glow_macros::SeedableInitializer;
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};

#[derive(DeriveIden, SeedableInitializer)]
#[seedable(meta(
    model = SeedUser,
    name = "users",
    order = super::INIT_USER_ORDER,
    create_table = create_user_table,
    create_indexes = create_user_indexes,
    seed_data = get_user_seed_data
))]
pub enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Name,
    Email,
    Password,
    Role,
    CreatedAt,
    UpdatedAt,
}

fn create_user_table(_backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(User::Table)
        .if_not_exists()
        .col(pk_auto(User::Id))
        .col(ColumnDef::new(User::Name).string_len(255).not_null())
        .col(ColumnDef::new(User::Email).string_len(255).not_null())
        .col(ColumnDef::new(User::Password).string_len(255).not_null())
        .col(
            ColumnDef::new(User::Role)
                .string_len(20)
                .not_null()
                .default(UserRole::User.as_str()),
        )
        .col(
            ColumnDef::new(User::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(User::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn create_user_indexes(_backend: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![Index::create()
        .if_not_exists()
        .name("idx_users_email")
        .table(User::Table)
        .col(User::Email)
        .unique()
        .to_owned()])
}

async fn get_user_seed_data(_: &mut InitContext) -> Result<Option<Vec<SeedUser>>, DbErr> {
    Ok(Some(vec![SeedUser {
        name: "Admin User".into(),
        email: "admin@glow.com".into(),
        password: "password".into(),
        role: UserRole::Admin,
    }]))
}
