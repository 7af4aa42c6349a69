use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay strategy between consecutive attempts for the same recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackoffPolicy {
    /// Retry immediately
    #[default]
    None,

    /// Constant delay
    Fixed { delay_ms: u64 },

    /// Exponentially growing delay, capped at `max_ms`
    Exponential {
        initial_ms: u64,
        max_ms: u64,
        #[serde(default = "default_multiplier")]
        multiplier: f64,
    },
}

fn default_multiplier() -> f64 {
    2.0
}

impl BackoffPolicy {
    pub fn fixed(delay: Duration) -> Self {
        BackoffPolicy::Fixed {
            delay_ms: delay.as_millis() as u64,
        }
    }

    pub fn exponential(initial: Duration, max: Duration) -> Self {
        BackoffPolicy::Exponential {
            initial_ms: initial.as_millis() as u64,
            max_ms: max.as_millis() as u64,
            multiplier: default_multiplier(),
        }
    }

    /// Fresh delay state for one recipient's retry loop
    pub fn start(&self) -> Backoff {
        Backoff {
            policy: self.clone(),
            waits: 0,
        }
    }

    /// Delay before the retry that follows `waits` earlier waits in the same
    /// loop. Exponential delays are capped at `max_ms`, including the first.
    pub fn delay_for(&self, waits: u32) -> Duration {
        match self {
            BackoffPolicy::None => Duration::ZERO,
            BackoffPolicy::Fixed { delay_ms } => Duration::from_millis(*delay_ms),
            BackoffPolicy::Exponential {
                initial_ms,
                max_ms,
                multiplier,
            } => {
                let exponent = i32::try_from(waits).unwrap_or(i32::MAX);
                let delay_ms = (*initial_ms as f64 * multiplier.powi(exponent)).min(*max_ms as f64);
                Duration::from_millis(delay_ms as u64)
            }
        }
    }

    /// Check the policy parameters, returning a description of the first problem
    pub fn validate(&self) -> Result<(), String> {
        match self {
            BackoffPolicy::None | BackoffPolicy::Fixed { .. } => Ok(()),
            BackoffPolicy::Exponential {
                initial_ms,
                max_ms,
                multiplier,
            } => {
                if initial_ms > max_ms {
                    return Err(format!(
                        "initial_ms ({initial_ms}) must be <= max_ms ({max_ms})"
                    ));
                }
                if !multiplier.is_finite() || *multiplier < 1.0 {
                    return Err(format!("multiplier ({multiplier}) must be >= 1.0"));
                }
                Ok(())
            }
        }
    }
}

/// Delay state for one recipient's retry loop.
///
/// Nothing waits before the first attempt; the retrier calls `wait` only
/// between attempts, so the first wait uses the policy's initial delay.
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    policy: BackoffPolicy,
    waits: u32,
}

impl Backoff {
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.policy.delay_for(self.waits);
        self.waits = self.waits.saturating_add(1);
        delay
    }

    pub fn reset(&mut self) {
        self.waits = 0;
    }

    /// Waits taken so far in this loop
    pub fn waits(&self) -> u32 {
        self.waits
    }

    /// Sleep for the next delay, if any
    pub async fn wait(&mut self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::debug!(
                delay_ms = delay.as_millis() as u64,
                waits = self.waits,
                "Backing off before retry"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
