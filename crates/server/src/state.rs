//! Shared server state.
//!
//! The cache and rate-limiter window live for exactly as long as the server
//! process and are owned here rather than living in ambient globals, so the
//! pipeline stays testable in isolation. Both sit behind async mutexes that
//! are only held across synchronous map/vector operations, never across the
//! provider call.

use tokio::sync::Mutex;
use websearch_client::SearchProvider;
use websearch_core::config::ConfigError;
use websearch_core::{AppConfig, InjectionFilter, SearchCache, SlidingWindow};

/// Everything a request needs, constructed once at startup.
pub struct AppState {
    pub config: AppConfig,
    pub provider: Box<dyn SearchProvider>,
    pub injection_filter: InjectionFilter,
    pub cache: Mutex<SearchCache>,
    pub limiter: Mutex<SlidingWindow>,
}

impl AppState {
    /// Build the server state from loaded configuration and a provider.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a configured injection pattern
    /// fails to compile.
    pub fn new(config: AppConfig, provider: Box<dyn SearchProvider>) -> Result<Self, ConfigError> {
        let injection_filter = InjectionFilter::new(&config.injection_patterns)?;
        let cache = Mutex::new(SearchCache::new(config.cache_enabled, config.cache_max_entries, config.cache_ttl()));
        let limiter = Mutex::new(SlidingWindow::new(config.rate_limit_window(), config.rate_limit_max));

        Ok(Self { config, provider, injection_filter, cache, limiter })
    }
}
