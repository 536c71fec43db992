// src/llm/retry.rs

use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use super::{GenerateError, TextGenerator};
use crate::config::GreenlightConfig;

/// Bounded retry around the generation call.
///
/// Only rate-limit failures are retried; anything else propagates on the
/// first attempt. The wait is a fixed delay between attempts, and once the
/// attempt budget is spent the caller gets a generic too-many-requests
/// error rather than the last API error.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &GreenlightConfig) -> Self {
        Self {
            max_attempts: config.retry_attempts,
            delay: config.retry_delay(),
        }
    }

    /// No waiting between attempts; for tests.
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
        }
    }

    pub async fn generate(
        &self,
        generator: &dyn TextGenerator,
        prompt: &str,
    ) -> Result<String, GenerateError> {
        for attempt in 1..=self.max_attempts {
            match generator.generate(prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_rate_limited() => {
                    warn!(
                        "Rate limited, waiting {:?} before retry ({}/{})",
                        self.delay, attempt, self.max_attempts
                    );
                    if attempt < self.max_attempts {
                        sleep(self.delay).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }

        Err(GenerateError::TooManyRequests)
    }
}
