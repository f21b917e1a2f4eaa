//! Natural-language questions about the current analytics.
//!
//! A question is folded into a prompt built from the published snapshot and
//! handed to an [`AnswerGenerator`]. The Gemini client is the production
//! generator; [`DisabledGenerator`] stands in when no API key is configured.

pub mod generator;
pub mod prompt;

#[cfg(feature = "gemini")]
pub mod gemini;

pub use generator::{AnswerGenerator, DisabledGenerator, GenerationError};
pub use prompt::build_prompt;

#[cfg(feature = "gemini")]
pub use gemini::GeminiGenerator;

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AppConfig;

/// Pick the generator the configuration asks for.
pub fn generator_from_config(config: &AppConfig) -> Arc<dyn AnswerGenerator> {
    let Some(api_key) = config.assistant_api_key() else {
        info!("No Gemini API key configured; /ask is disabled");
        return Arc::new(DisabledGenerator);
    };

    #[cfg(feature = "gemini")]
    {
        let timeout = std::time::Duration::from_secs(config.assistant.timeout_secs);
        match GeminiGenerator::new(config.assistant.model.clone(), api_key)
            .with_base_url(config.assistant.base_url.clone())
            .with_timeout(timeout)
        {
            Ok(generator) => {
                info!(model = %config.assistant.model, "Gemini answer generator enabled");
                Arc::new(generator)
            }
            Err(e) => {
                warn!(error = %e, "Failed to initialize Gemini client; /ask is disabled");
                Arc::new(DisabledGenerator)
            }
        }
    }

    #[cfg(not(feature = "gemini"))]
    {
        let _ = api_key;
        warn!("Gemini API key configured but the `gemini` feature is not enabled");
        Arc::new(DisabledGenerator)
    }
}
