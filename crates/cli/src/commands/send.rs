//! `calmwing send` — Run one support interaction from the terminal.

use std::sync::Arc;

use calmwing_config::AppConfig;
use calmwing_core::support::SupportRequest;
use calmwing_engine::{Orchestrator, StateStore};
use calmwing_providers::MockGenerator;

pub async fn run(message: String, anxiety: i32, user: String, mock: bool) -> anyhow::Result<()> {
    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    let generator = if mock {
        Arc::new(MockGenerator::new()) as Arc<dyn calmwing_core::Generator>
    } else {
        calmwing_providers::build_generator(&config)?
    };

    let store = Arc::new(StateStore::new());
    let orchestrator = Orchestrator::new(store, generator)
        .with_fallback_flight(calmwing_flight::default_context());

    let envelope = orchestrator
        .process(SupportRequest {
            user_id: user,
            user_message: message,
            anxiety_level: anxiety,
            flight: None,
        })
        .await?;

    match &envelope.response_text {
        Some(text) => {
            println!("{}\n", text);
        }
        None => {
            if let Some(error) = &envelope.error {
                eprintln!("⚠️  {}\n", error.message);
            }
        }
    }

    println!(
        "mode: {}  anxiety: {}/10  trend: {}  elapsed: {}ms",
        envelope.mode, envelope.anxiety_level, envelope.trend, envelope.processing_time_ms
    );

    Ok(())
}
