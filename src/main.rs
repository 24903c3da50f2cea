// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Rolling-window statistics service.
//!
//! Serves batch ingest and window queries over HTTP. Configuration comes
//! from the environment (prefix `TICK_STATS_`), log filtering from
//! `TICK_STATS_LOG`.

use tick_stats::server::{router, AppState};
use tick_stats::Config;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
    registry::Registry,
};

macro_rules! die {
    ($fmt:literal, $($arg:tt)*) => {{
        eprintln!($fmt, $($arg)*);
        std::process::exit(1)
    }};

    ($msg:literal) => {{
        eprintln!($msg);
        std::process::exit(1)
    }};
}

#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

fn init_tracing() {
    // Bridge log crate macros to tracing (library code uses log::*)
    tracing_log::LogTracer::init().expect("Failed to set log tracer");

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("TICK_STATS_LOG")
        .from_env_lossy();

    let subscriber = Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact(),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        die!("INTERNAL ERROR: setting default tracing::subscriber failed");
    }

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing_panic::panic_hook(info);
        prev_hook(info); // daisy-chain to old panic hook
    }));
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => die!("Invalid configuration: {e}"),
    };

    info!(
        max_k = config.max_k,
        max_batch_size = config.max_batch_size,
        window_capacity = config.max_len(),
        "starting tick-stats"
    );

    let bind = config.bind.clone();
    let app = router(AppState::new(config));

    let listener = match tokio::net::TcpListener::bind(&bind).await {
        Ok(listener) => listener,
        Err(e) => die!("Cannot bind {bind}: {e}"),
    };

    info!("listening on {bind}");

    if let Err(e) = axum::serve(listener, app).await {
        die!("Server terminated abnormally: {e}");
    }
}
