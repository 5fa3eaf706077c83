//! `calmwing gateway` — Start the HTTP API server.

use calmwing_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::load().map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🛫 Calmwing Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Generator: {} ({})", config.generator, config.model);

    calmwing_gateway::serve(config).await?;

    Ok(())
}
