use anyhow::{Context, Result};
use medibook_db::{create_pool, run_migrations, UserRepo};
use medibook_server::auth::hash_password;
use medibook_server::config::load_config;
use medibook_server::documents::DocumentStore;
use medibook_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting MediBook server");

    // Load configuration
    let config_path = std::env::var("MEDIBOOK_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    tracing::info!("Loading config from: {}", config_path);
    let config = load_config(&config_path)?;

    // Create database pool
    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.db.url)
        .await
        .context("Failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    // Seed the admin account if configured and no admin exists yet. The
    // doctor-application flow needs a resolvable admin.
    if let Some(initial_admin) = &config.auth.initial_admin {
        match UserRepo::find_by_role(&pool, "admin").await {
            Ok(Some(admin)) => {
                tracing::info!("Admin '{}' already exists, skipping seed", admin.email);
            }
            Ok(None) => {
                let password_hash = hash_password(&initial_admin.password)
                    .context("Failed to hash initial admin password")?;
                UserRepo::create(
                    &pool,
                    uuid::Uuid::new_v4(),
                    &initial_admin.full_name,
                    &initial_admin.email,
                    &password_hash,
                    "admin",
                )
                .await
                .context("Failed to create initial admin")?;
                tracing::info!("Created initial admin: {}", initial_admin.email);
            }
            Err(e) => {
                tracing::warn!("Failed to check for initial admin: {}", e);
            }
        }
    }

    // Initialize document storage
    let documents = DocumentStore::new(&config.document_storage.local_dir);

    // Build application state and router
    let listen = config.listen.clone();
    let state = AppState::new(pool, config, documents);
    let app = medibook_server::web::build_router(state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind to {}", listen))?;

    tracing::info!("Server listening on {}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping...");
}
