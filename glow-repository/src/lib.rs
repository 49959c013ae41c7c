pub mod category;
pub mod product;
pub mod user;

pub use category::CategoryRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

#[cfg(test)]
pub(crate) mod test_support {
    use glow_models::{
        settings::{Db, Inner, Settings, Sqlite},
        DbManager,
    };
    use glow_storage::GlowDbManager;
    use sea_orm::DatabaseConnection;

    /// Migrated and seeded in-memory database
    pub async fn seeded_db() -> DatabaseConnection {
        let settings = Settings::from(Inner {
            db: Db {
                sqlite: Sqlite {
                    path: ":memory:".into(),
                    ..Default::default()
                },
            },
            ..Default::default()
        });
        GlowDbManager::init(&settings)
            .await
            .unwrap()
            .get_connection()
            .unwrap()
    }
}
