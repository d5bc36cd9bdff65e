//! Periodic sweeping of expired revocation entries
//!
//! `TokenService::revoke` already sweeps after every revocation. This
//! service bounds the registry in quiet periods as well.

use std::sync::Arc;

use tl_shared::TokenSettings;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::RevocationStore;

/// Configuration for the revocation sweeper
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// How often to sweep (in seconds)
    pub interval_seconds: u64,
    /// Whether to run the background task at all
    pub enabled: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300,
            enabled: true,
        }
    }
}

impl SweeperConfig {
    /// Enabled only when revocation is on and the interval is non-zero
    pub fn from_settings(settings: &TokenSettings) -> Self {
        Self {
            interval_seconds: settings.sweep_interval_seconds,
            enabled: settings.enable_revocation && settings.sweep_interval_seconds > 0,
        }
    }
}

/// Removes revocation entries whose tokens have expired
pub struct RevocationSweeper<S: RevocationStore + 'static> {
    store: Arc<S>,
    config: SweeperConfig,
}

impl<S: RevocationStore + 'static> RevocationSweeper<S> {
    pub fn new(store: Arc<S>, config: SweeperConfig) -> Self {
        Self { store, config }
    }

    /// Run a single sweep cycle
    ///
    /// # Returns
    /// * `Ok(SweepResult)` - Summary; store failures are collected in `errors`
    /// * `Err(DomainError)` - Reserved for failures outside the store
    pub async fn run_sweep(&self) -> Result<SweepResult, DomainError> {
        if !self.config.enabled {
            return Ok(SweepResult::default());
        }

        let mut result = SweepResult::default();

        match self.store.sweep().await {
            Ok(count) => result.entries_removed = count,
            Err(e) => {
                error!("Failed to sweep revocation entries: {}", e);
                result.errors.push(format!("Sweep error: {}", e));
            }
        }

        match self.store.len().await {
            Ok(count) => result.entries_remaining = count,
            Err(e) => {
                error!("Failed to count revocation entries: {}", e);
                result.errors.push(format!("Count error: {}", e));
            }
        }

        if result.entries_removed > 0 {
            info!(
                "Revocation sweep removed {} entries, {} remaining",
                result.entries_removed, result.entries_remaining
            );
        }

        Ok(result)
    }

    /// Start sweeping on a tokio interval
    ///
    /// Returns `None` without spawning when the sweeper is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled || self.config.interval_seconds == 0 {
            warn!("Revocation sweeper is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Revocation sweeper started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_sweep().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!("Sweep completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Revocation sweep cycle failed: {}", e);
                    }
                }
            }
        }))
    }
}

/// Result of a sweep cycle
#[derive(Debug, Default)]
pub struct SweepResult {
    pub entries_removed: usize,
    pub entries_remaining: usize,
    pub errors: Vec<String>,
}

impl SweepResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
