//! Generator implementations for Calmwing.
//!
//! All generators implement the `calmwing_core::Generator` trait.
//! [`build_generator`] selects the right one from configuration.

pub mod anthropic;
pub mod mock;

use std::sync::Arc;

use calmwing_config::AppConfig;
use calmwing_core::error::Error;
use calmwing_core::generator::Generator;

pub use anthropic::AnthropicGenerator;
pub use mock::MockGenerator;

/// Build the configured generator.
///
/// `generator = "anthropic"` requires an API key; `"mock"` runs fully
/// offline with deterministic canned responses.
pub fn build_generator(config: &AppConfig) -> Result<Arc<dyn Generator>, Error> {
    match config.generator.as_str() {
        "anthropic" => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| Error::config("generator 'anthropic' requires an api_key"))?;
            let generator = AnthropicGenerator::new(api_key, &config.model)
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens);
            Ok(Arc::new(generator))
        }
        "mock" => Ok(Arc::new(MockGenerator::new())),
        other => Err(Error::config(format!("unknown generator '{}'", other))),
    }
}
