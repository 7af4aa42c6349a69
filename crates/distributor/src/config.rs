use std::num::NonZeroUsize;
use std::time::Duration;

use airdrop_backoff::BackoffPolicy;
use airdrop_config::AirdropConfig;
use airdrop_types::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_RETRIES};

use crate::coordinator::DistributorError;

/// Configuration for a distribution run
#[derive(Clone, Debug, PartialEq)]
pub struct DistributorConfig {
    /// Maximum recipients per atomic submission
    pub batch_size: NonZeroUsize,

    /// Attempt ceiling for each recipient in each retry pass
    pub max_retries: u32,

    /// Delay between attempts for the same recipient
    pub backoff: BackoffPolicy,

    /// Deadline for a single submission to confirm
    pub submit_timeout: Duration,
}

impl DistributorConfig {
    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_submit_timeout(mut self, submit_timeout: Duration) -> Self {
        self.submit_timeout = submit_timeout;
        self
    }
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            batch_size: NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: BackoffPolicy::None,
            submit_timeout: Duration::from_secs(30),
        }
    }
}

impl TryFrom<&AirdropConfig> for DistributorConfig {
    type Error = DistributorError;

    fn try_from(config: &AirdropConfig) -> Result<Self, Self::Error> {
        let distribution = &config.distribution;
        let batch_size = NonZeroUsize::new(distribution.batch_size).ok_or_else(|| {
            DistributorError::InvalidConfig("batch_size must be greater than 0".to_string())
        })?;

        Ok(Self {
            batch_size,
            max_retries: distribution.max_retries,
            backoff: config.retry.backoff.clone(),
            submit_timeout: Duration::from_millis(distribution.submit_timeout_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DistributorConfig::default();
        assert_eq!(config.batch_size.get(), 10);
        assert_eq!(config.max_retries, 10);
        assert_eq!(config.backoff, BackoffPolicy::None);
    }

    #[test]
    fn test_from_airdrop_config() {
        let mut airdrop = AirdropConfig::default();
        airdrop.distribution.batch_size = 4;
        airdrop.distribution.max_retries = 3;
        airdrop.distribution.submit_timeout_ms = 1500;
        airdrop.retry.backoff = BackoffPolicy::fixed(Duration::from_millis(20));

        let config = DistributorConfig::try_from(&airdrop).unwrap();
        assert_eq!(config.batch_size.get(), 4);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.submit_timeout, Duration::from_millis(1500));
        assert_eq!(config.backoff, BackoffPolicy::Fixed { delay_ms: 20 });
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut airdrop = AirdropConfig::default();
        airdrop.distribution.batch_size = 0;

        assert!(matches!(
            DistributorConfig::try_from(&airdrop),
            Err(DistributorError::InvalidConfig(_))
        ));
    }
}
