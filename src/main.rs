use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use givegate::store::journal::EventJournal;
use givegate::{api, cli, config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "givegate=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => run_server(cfg, port).await,
        Some(cli::Commands::Events { command }) => {
            let journal = EventJournal::open(&cfg.journal_path, cfg.journal_capacity);
            handle_events_command(&journal, command).await
        }
        None => {
            let port = cfg.port;
            run_server(cfg, port).await
        }
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

async fn run_server(cfg: config::Config, port: u16) -> anyhow::Result<()> {
    tracing::info!(path = %cfg.journal_path, "Opening event journal...");
    let state = Arc::new(AppState::from_config(cfg));

    let app = axum::Router::new()
        // Health endpoint (no auth)
        .route("/healthz", axum::routing::get(|| async { "ok" }))
        .nest("/api/v1", api::router(state.clone()))
        // Form payloads are small; anything bigger is abuse
        .layer(DefaultBodyLimit::max(256 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        // Restrict CORS to the site + dashboard origin (defaults to localhost for dev)
        .layer({
            use axum::http::Method;
            use tower_http::cors::AllowOrigin;
            let dashboard_origin = std::env::var("DASHBOARD_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string());
            CorsLayer::new()
                .allow_origin(AllowOrigin::predicate(move |origin, _| {
                    let origin_str = origin.to_str().unwrap_or("");
                    origin_str == dashboard_origin
                        || origin_str.starts_with("http://localhost:")
                        || origin_str.starts_with("http://127.0.0.1:")
                }))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    axum::http::HeaderName::from_static("content-type"),
                    axum::http::HeaderName::from_static("authorization"),
                    axum::http::HeaderName::from_static("x-admin-key"),
                ])
        })
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Givegate listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Middleware: injects a unique X-Request-Id into every response so clients
/// can correlate errors with gateway logs.
async fn request_id_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let req_id = uuid::Uuid::new_v4().to_string();
    let mut resp = next.run(req).await;
    if let Ok(val) = axum::http::HeaderValue::from_str(&req_id) {
        resp.headers_mut().insert("x-request-id", val);
    }
    resp
}

/// Middleware: injects security headers into every response.
async fn security_headers_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();

    headers.insert("X-Content-Type-Options", "nosniff".parse().unwrap());
    headers.insert("X-Frame-Options", "DENY".parse().unwrap());
    headers.insert("Cache-Control", "no-store".parse().unwrap());
    headers.insert("Referrer-Policy", "no-referrer".parse().unwrap());
    headers.remove("Server");

    resp
}

async fn handle_events_command(
    journal: &EventJournal,
    cmd: cli::EventCommands,
) -> anyhow::Result<()> {
    match cmd {
        cli::EventCommands::List { unread } => {
            let entries = journal.list().await;
            let entries: Vec<_> = entries.into_iter().filter(|e| !unread || !e.read).collect();
            if entries.is_empty() {
                println!("No events.");
                return Ok(());
            }
            println!("{:<16} {:<12} {:<6} {:<20} MESSAGE", "ID", "KIND", "READ", "RECEIVED");
            for e in entries {
                println!(
                    "{:<16} {:<12} {:<6} {:<20} {}",
                    e.id,
                    e.kind.to_string(),
                    e.read,
                    e.created_at.format("%Y-%m-%d %H:%M:%S"),
                    e.message
                );
            }
        }
        cli::EventCommands::Unread => {
            println!("{}", journal.unread_count().await);
        }
        cli::EventCommands::Read { id } => {
            if journal.mark_read(id).await {
                println!("Event {} marked read.", id);
            } else {
                println!("Event {} not found or already read.", id);
            }
        }
        cli::EventCommands::ReadAll => {
            let updated = journal.mark_all_read().await;
            println!("{} event(s) marked read.", updated);
        }
    }
    Ok(())
}
