use capture_server::ServerConfig;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ServerConfig::from_env()?;
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, options = ?config.options, tls = config.tls, "listening");
    capture_server::run(listener, config).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
