use kfitd::paths::AppPaths;
use kfitd::{router, Config};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kfitd=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {e}");
        return;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let paths = AppPaths::new()?;
    let config = Config::load(&paths.config_file())?;
    info!(
        config = %paths.config_file().display(),
        www = %config.www_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        "Configuration loaded"
    );
    if !config.www_dir.is_dir() {
        warn!("Static directory {} does not exist", config.www_dir.display());
    }
    if config.parallel && !cfg!(feature = "parallel") {
        warn!("parallel requested but kfitd was built without the `parallel` feature");
    }

    let listener = TcpListener::bind(&config.addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
