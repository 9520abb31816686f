// --- Motor de Horarios - Archivo principal ---

use horarios::{Config, run_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("horarios=info")))
        .init();

    let config = Config::from_env()?;
    info!("=== Motor de Horarios (API) ===");
    info!("Iniciando servidor en http://{}", config.bind);
    run_server(config).await?;
    Ok(())
}
