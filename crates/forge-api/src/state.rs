use crate::config::ApiConfig;
use crate::metrics::ApiMetrics;
use forge_quality::ValidationProfile;
use std::sync::Arc;

/// Shared, read-only handler state. Requests never write to it except
/// through the metric counters.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub profile: Arc<ValidationProfile>,
    pub metrics: Arc<ApiMetrics>,
}

impl AppState {
    pub fn new(config: ApiConfig, profile: ValidationProfile) -> Result<Self, prometheus::Error> {
        Ok(Self {
            config: Arc::new(config),
            profile: Arc::new(profile),
            metrics: Arc::new(ApiMetrics::new()?),
        })
    }
}
