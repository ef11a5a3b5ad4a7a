use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use padron_api::config::ServerConfig;
use padron_api::state::AppState;
use padron_db::models::user::CreateUser;
use padron_db::repositories::UserRepo;
use padron_db::DbPool;
use padron_storage::{ObjectStorage, S3ObjectStorage, StorageConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "padron_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = padron_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    padron_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    padron_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    bootstrap_admin(&pool).await;

    // --- Photo storage ---
    let storage: Arc<dyn ObjectStorage> =
        Arc::new(S3ObjectStorage::connect(StorageConfig::from_env()).await);
    tracing::info!("Photo storage client created");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
    };

    // --- Router ---
    let app = padron_api::app::build(state);

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

/// Create the operator account named by `ADMIN_EMAIL` / `ADMIN_PASSWORD` if
/// it does not exist yet. There is no self-service signup; this is how the
/// first login becomes possible on a fresh database.
async fn bootstrap_admin(pool: &DbPool) {
    let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return;
    };

    let existing = UserRepo::find_by_email(pool, &email)
        .await
        .expect("Failed to look up admin user");
    if existing.is_some() {
        return;
    }

    let password_hash = padron_api::auth::password::hash_password(&password)
        .expect("Failed to hash admin password");

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email,
            password_hash,
        },
    )
    .await
    .expect("Failed to create admin user");

    tracing::info!(user_id = user.id, email = %user.email, "Admin user created");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
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
