mod cli;
mod cors;
mod prelude;
mod routes;
mod store;
mod upstream;

use std::{collections::HashSet, sync::Arc, time::Duration};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use clap::{Parser, crate_version};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    cli::Args, cors::CorsPolicy, prelude::*, store::Store, upstream::Upstream,
};

pub struct AppState {
    pub upstream: Upstream,
    pub store: Store,
    pub cors: CorsPolicy,
    pub premium_keys: HashSet<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    let args = Args::parse();
    info!(version = crate_version!(), args.bind_address, "starting…");

    let state = Arc::new(AppState {
        upstream: Upstream::try_new(args.upstream_url)?,
        store: Store::open(&args.db_path)?,
        cors: CorsPolicy::new(&args.allowed_origins)?,
        premium_keys: args.premium_keys.iter().map(|key| routes::normalize_key(key)).collect(),
    });

    let app = Router::new()
        .route("/", get(routes::get_root))
        .route("/feedback", post(routes::post_feedback))
        .route("/validate-premium", post(routes::post_validate_premium))
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::method_not_allowed)
        .layer(middleware::from_fn_with_state(Arc::clone(&state), cors::apply))
        .with_state(state)
        .layer((TraceLayer::new_for_http(), TimeoutLayer::new(Duration::from_secs(10))));

    let listener =
        TcpListener::bind(&args.bind_address).await.context("failed to bind to the address")?;
    info!("serving…");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

/// Per <https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs>.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
