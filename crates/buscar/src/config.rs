//! Runtime configuration.
//!
//! ```yaml
//! default_timeout_ms: 5000
//! scenario_timeout_ms: 30000
//! escape_selectors: true
//! test_id_attributes: [data-testid, data-test-id]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::locator::{LocateOptions, DEFAULT_TIMEOUT_MS};
use crate::options::OptionSet;
use crate::result::{BuscarError, BuscarResult};
use crate::selector::Quoting;

/// Default per-scenario deadline (30 seconds)
pub const DEFAULT_SCENARIO_TIMEOUT_MS: u64 = 30_000;

fn default_test_id_attributes() -> Vec<String> {
    vec!["data-testid".to_string(), "data-test-id".to_string()]
}

/// Buscar configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuscarConfig {
    /// Timeout applied to driver calls without a `timeout` option
    pub default_timeout_ms: u64,
    /// Deadline for a whole scenario
    pub scenario_timeout_ms: u64,
    /// Escape interpolated text; `false` interpolates it verbatim
    pub escape_selectors: bool,
    /// Attributes searched by test-id queries, in order
    pub test_id_attributes: Vec<String>,
}

impl Default for BuscarConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            scenario_timeout_ms: DEFAULT_SCENARIO_TIMEOUT_MS,
            escape_selectors: true,
            test_id_attributes: default_test_id_attributes(),
        }
    }
}

impl BuscarConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> BuscarResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_path(path: &Path) -> BuscarResult<Self> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Check invariants
    pub fn validate(&self) -> BuscarResult<()> {
        if self.scenario_timeout_ms == 0 {
            return Err(BuscarError::config("scenario_timeout_ms must be positive"));
        }
        if self.test_id_attributes.iter().any(|a| a.trim().is_empty()) {
            return Err(BuscarError::config("test_id_attributes must not contain empty names"));
        }
        Ok(())
    }

    /// Set the default driver timeout
    #[must_use]
    pub const fn with_default_timeout_ms(mut self, ms: u64) -> Self {
        self.default_timeout_ms = ms;
        self
    }

    /// Set the scenario deadline
    #[must_use]
    pub const fn with_scenario_timeout_ms(mut self, ms: u64) -> Self {
        self.scenario_timeout_ms = ms;
        self
    }

    /// Enable or disable selector escaping
    #[must_use]
    pub const fn with_escape_selectors(mut self, escape: bool) -> Self {
        self.escape_selectors = escape;
        self
    }

    /// Replace the test-id attributes
    #[must_use]
    pub fn with_test_id_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_id_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Quoting mode derived from `escape_selectors`
    #[must_use]
    pub const fn quoting(&self) -> Quoting {
        if self.escape_selectors {
            Quoting::Escaped
        } else {
            Quoting::Raw
        }
    }

    /// Driver options for a step, defaulting the timeout to `default_timeout_ms`
    #[must_use]
    pub fn locate_options(&self, options: Option<&OptionSet>) -> LocateOptions {
        LocateOptions::for_step(options, self.default_timeout_ms)
    }

    /// Scenario deadline as a duration
    #[must_use]
    pub const fn scenario_timeout(&self) -> Duration {
        Duration::from_millis(self.scenario_timeout_ms)
    }
}
