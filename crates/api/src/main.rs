use std::net::SocketAddr;
use std::sync::Arc;

use nimba_api::bootstrap::ensure_default_categories;
use nimba_api::config::ServerConfig;
use nimba_api::newsletter::Newsletter;
use nimba_api::router::build_app_router;
use nimba_api::state::AppState;
use nimba_db::Repositories;
use nimba_mail::{EmailConfig, Mailer, SmtpMailer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nimba_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = nimba_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    nimba_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    nimba_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let repos = Repositories::postgres(pool);

    let created = ensure_default_categories(&repos)
        .await
        .expect("Failed to create default categories");
    tracing::info!(created, "Default categories ensured");

    // --- Mail ---
    let mailer: Option<Arc<dyn Mailer>> = match EmailConfig::from_env() {
        Some(email_config) => {
            let mailer =
                SmtpMailer::new(&email_config).expect("Invalid SMTP configuration");
            tracing::info!(smtp_host = %email_config.smtp_host, "Newsletter mail enabled");
            Some(Arc::new(mailer) as Arc<dyn Mailer>)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, newsletter mail disabled");
            None
        }
    };

    let newsletter = Newsletter::new(repos.subscriptions.clone(), mailer, config.site_url.clone())
        .expect("Failed to load email templates");

    // --- App state ---
    let state = AppState {
        repos,
        config: Arc::new(config.clone()),
        newsletter: Arc::new(newsletter),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
