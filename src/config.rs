//! Configuration for a profiler instance

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use crate::error::{ProfilerError, ProfilerResult};

pub const DEFAULT_REPORT_INTERVAL_SECS: u64 = 30;

/// Settings fixed for the life of a `SimpleProfiler`.
///
/// The output sink is not part of this struct; it is injected when the
/// profiler is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Batch counters restart once a section's cumulative sample count
    /// reaches this value. 0 disables batch windows.
    pub reset_after_sample_count: u64,
    /// Section whose total time is the denominator for percentages.
    /// Empty disables percentage reporting.
    pub enclosing_section_name: String,
    pub report_interval_secs: u64,
    /// Indent report lines by the depth a section was first started at.
    pub track_nesting: bool,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            reset_after_sample_count: 0,
            enclosing_section_name: String::new(),
            report_interval_secs: DEFAULT_REPORT_INTERVAL_SECS,
            track_nesting: true,
        }
    }
}

impl ProfilerConfig {
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    pub fn batch_rates_enabled(&self) -> bool {
        self.reset_after_sample_count > 0
    }

    pub fn enclosing_section(&self) -> Option<&str> {
        if self.enclosing_section_name.is_empty() {
            None
        } else {
            Some(&self.enclosing_section_name)
        }
    }

    pub fn validate(&self) -> ProfilerResult<()> {
        if !self.enclosing_section_name.is_empty() && self.enclosing_section_name.trim().is_empty() {
            return Err(ProfilerError::Configuration(
                "enclosing_section_name must be empty or non-blank".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> ProfilerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: ProfilerConfig = serde_json::from_str(&content)?;
        config.validate()?;

        tracing::info!("Profiler configuration loaded from {:?}", path);
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> ProfilerResult<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Profiler configuration saved to {:?}", path);
        Ok(())
    }
}

/// Create a configuration builder for easy setup
pub struct ConfigBuilder {
    config: ProfilerConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ProfilerConfig::default(),
        }
    }

    pub fn reset_after_sample_count(mut self, count: u64) -> Self {
        self.config.reset_after_sample_count = count;
        self
    }

    pub fn enclosing_section(mut self, name: impl Into<String>) -> Self {
        self.config.enclosing_section_name = name.into();
        self
    }

    pub fn report_interval_secs(mut self, secs: u64) -> Self {
        self.config.report_interval_secs = secs;
        self
    }

    pub fn track_nesting(mut self, enabled: bool) -> Self {
        self.config.track_nesting = enabled;
        self
    }

    pub fn build(self) -> ProfilerResult<ProfilerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
