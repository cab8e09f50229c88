use std::sync::Arc;

use anyhow::Context;
use remont_blog::{
    config::Config,
    content::{source, PublicDir},
    server::{self, AdminAuth, AppState},
    store::{MemorySessionStore, SqliteViewCounts},
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().context("usage: remont-blog <config.toml> [check]")?;
    let check_only = matches!(args.next().as_deref(), Some("check"));

    let config_text =
        std::fs::read_to_string(&config_path).with_context(|| format!("cannot read {config_path}"))?;
    let config = Config::from_toml(&config_text).with_context(|| format!("invalid config {config_path}"))?;

    let (content, load_errors) = source::load_dir(&config.content.root, &config.reading)?;
    let assets = PublicDir(config.content.public.to_path_buf());

    let problems = content.validate(&assets);
    for err in &problems {
        warn!(code = err.code(), "{err}");
    }
    let mut errors = load_errors;
    errors.extend(problems);
    info!(posts = content.len(), problems = errors.len(), "content loaded");

    if check_only {
        if errors.is_empty() {
            return Ok(());
        }
        error!("content check failed with {} problem(s)", errors.len());
        std::process::exit(1);
    }

    let views = SqliteViewCounts::open(&config.db.sqlite_file)
        .await
        .with_context(|| format!("cannot open {}", config.db.sqlite_file.display()))?;
    let sessions = Arc::new(MemorySessionStore::new());
    server::spawn_session_sweeper(
        sessions.clone(),
        std::time::Duration::from_secs(config.admin.sweep_interval_seconds),
    );

    let state = AppState {
        content: Arc::new(content),
        site: Arc::new(config.site),
        templates: Arc::new(server::templates()?),
        sessions,
        views: Arc::new(views),
        assets: Arc::new(assets),
        admin: Arc::new(AdminAuth {
            password: config.admin.password,
            session_ttl: time::Duration::minutes(config.admin.session_ttl_minutes),
        }),
    };
    let app = server::router(state, &config.content.public);

    let listener = TcpListener::bind(config.net.bind).await?;
    info!(bind = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("cannot listen for shutdown signal: {err}");
            }
        })
        .await?;

    Ok(())
}
