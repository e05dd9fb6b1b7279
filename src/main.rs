//! Vendorify application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Open the Redis store handle
//! 3. Build router with API routes, route gate and static file serving
//! 4. Start Axum server, close the store on shutdown
//!
//! Also supports a `seed` subcommand that creates the demo account.

use tracing_subscriber::EnvFilter;
use vendorify::{auth::AppState, config::Config, routes, seed, storage::Store};

fn print_usage() {
    eprintln!("Usage: vendorify [seed]");
    eprintln!();
    eprintln!("Without arguments, start the web server.");
    eprintln!("  seed    create the demo account ({})", seed::DEMO_EMAIL);
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    let seed_only = match args.get(1).map(String::as_str) {
        None => false,
        Some("seed") if args.len() == 2 => true,
        _ => {
            print_usage();
            std::process::exit(1);
        }
    };

    // RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vendorify=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().expect("Failed to load config");
    let store = Store::open(&config.redis_url).expect("Invalid Redis URL");

    if seed_only {
        match seed::run(&store, config.hash_cost).await {
            Ok(user) => println!("Seeded {} (id {})", user.email, user.id),
            Err(e) => {
                eprintln!("Seed failed: {}", e);
                std::process::exit(1);
            }
        }
        store.close().await;
        return;
    }

    if config.jwt_secret_is_fallback {
        tracing::warn!("JWT_SECRET is not set, using insecure fallback");
    }

    tracing::info!(
        production = config.production,
        fallback_secret = config.jwt_secret_is_fallback,
        "Starting vendorify on {}",
        config.bind_addr
    );
    tracing::debug!(?config, "Loaded configuration");

    let bind_addr = config.bind_addr;
    let state = AppState::new(store.clone(), config);
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    store.close().await;
    tracing::info!("Server stopped");
}
