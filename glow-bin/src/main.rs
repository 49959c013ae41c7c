use clap::{Parser, Subcommand};
use glow_common::GlowAppContext;
use glow_error::{GlowError, GlowResult};
use glow_models::{constants::DEFAULT_CONFIG_FILE_NAME, domain::prelude::UserInfo};
use glow_repository::UserRepository;
use glow_storage::{run_seeders, GlowDbManager};
use glow_web::GlowWebServer;
use std::{env::current_dir, path::PathBuf};
use tracing::{info, Level};

/// Glow - catalog service for categories and products
///
/// Serves the catalog REST API and offers the maintenance commands that go
/// with it.
#[derive(Parser)]
#[command(name = "glow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Glow catalog service", long_about = None)]
struct Cli {
    /// Sets a custom config file with full path
    ///
    /// If not specified, 'glow.toml' in the current working directory is
    /// used when present.
    #[arg(short, long, env = "GLOW_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Overrides `general.log_level` once the logger is up
    #[arg(long, global = true)]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Default)]
enum Command {
    /// Run the HTTP API until a termination signal arrives (default)
    #[default]
    Serve,
    /// Upsert the seed categories, products and administrator
    Seed,
    /// Grant the admin role to a user
    PromoteAdmin {
        /// Email of the user; defaults to the first registered user
        #[arg(long)]
        email: Option<String>,
    },
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> GlowResult<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(p) => p,
        None => {
            let dir = current_dir()
                .map_err(|e| GlowError::from(format!("Failed to get current directory: {e}")))?;
            dir.join(DEFAULT_CONFIG_FILE_NAME)
        }
    };
    let config_path = config_path.to_string_lossy().to_string();

    match cli.command.unwrap_or_default() {
        Command::Serve => {
            GlowAppContext::init::<GlowDbManager, GlowWebServer>(config_path).await?;
            let ctx = GlowAppContext::instance().await?;
            if let Some(level) = cli.log_level {
                ctx.change_log_level(level);
            }
            ctx.run().await
        }
        Command::Seed => {
            let ctx = maintenance(config_path, cli.log_level).await?;
            let db = ctx.db_manager()?.get_connection()?;
            run_seeders(&db).await?;
            info!("Seed data is up to date");
            ctx.graceful_shutdown().await
        }
        Command::PromoteAdmin { email } => {
            let ctx = maintenance(config_path, cli.log_level).await?;
            let db = ctx.db_manager()?.get_connection()?;
            let user = match email.as_deref() {
                Some(email) => UserRepository::find_by_email(email, &db).await?,
                None => UserRepository::find_first(&db).await?,
            }
            .ok_or_else(|| match &email {
                Some(email) => GlowError::from(format!("No user with email {email}")),
                None => GlowError::from("No users to promote"),
            })?;
            let user: UserInfo = UserRepository::promote_to_admin(user, &db).await?.into();
            info!("{} ({}) is now {}", user.name, user.email, user.role);
            ctx.graceful_shutdown().await
        }
    }
}

/// Context with the database only, for one-shot commands
async fn maintenance(
    config_path: String,
    log_level: Option<Level>,
) -> GlowResult<tokio::sync::RwLockReadGuard<'static, GlowAppContext>> {
    GlowAppContext::bootstrap::<GlowDbManager>(config_path).await?;
    let ctx = GlowAppContext::instance().await?;
    if let Some(level) = log_level {
        ctx.change_log_level(level);
    }
    Ok(ctx)
}
