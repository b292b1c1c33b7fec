//! `nimba-manage`: administrative commands run against the site database.
//!
//! ```bash
//! nimba-manage create-categories
//! nimba-manage create-staff --username redaction --email redaction@nimba24.local --password '...'
//! nimba-manage unsubscribe lecteur@example.com
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use nimba_api::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use nimba_api::bootstrap::ensure_default_categories;
use nimba_api::newsletter::Newsletter;
use nimba_db::models::user::CreateUser;
use nimba_db::Repositories;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nimba-manage")]
#[command(about = "Nimba24 site administration", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default categories that do not exist yet
    CreateCategories,

    /// Create a user account (staff unless --no-staff)
    CreateStaff {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Create a regular account that cannot log in to the dashboard
        #[arg(long)]
        no_staff: bool,
    },

    /// Deactivate a newsletter subscription
    Unsubscribe {
        #[arg(value_name = "EMAIL")]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nimba_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = nimba_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    nimba_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    let repos = Repositories::postgres(pool);

    match cli.command {
        Commands::CreateCategories => {
            let created = ensure_default_categories(&repos).await?;
            println!("{created} categories created");
        }
        Commands::CreateStaff {
            username,
            email,
            password,
            no_staff,
        } => {
            if let Err(msg) = validate_password_strength(&password, MIN_PASSWORD_LENGTH) {
                bail!(msg);
            }
            let password_hash = hash_password(&password)
                .map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;
            let user = repos
                .users
                .create(&CreateUser {
                    username: username.trim().to_string(),
                    email: email.trim().to_string(),
                    password_hash,
                    is_staff: !no_staff,
                })
                .await?;
            println!("User '{}' created (id {})", user.username, user.id);
        }
        Commands::Unsubscribe { email } => {
            let site_url = std::env::var("SITE_URL").unwrap_or_default();
            let newsletter = Newsletter::new(repos.subscriptions.clone(), None, site_url)?;
            if newsletter.unsubscribe(&email).await? {
                println!("{} unsubscribed", email.trim());
            } else {
                println!("No active subscription for {}", email.trim());
            }
        }
    }

    Ok(())
}
