//! Scenario runner.
//!
//! Each scenario gets a fresh [`World`] (empty locator context), runs its
//! steps strictly in order under one deadline, and stops at the first
//! failing step. The world is dropped when the scenario ends.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::{timeout_at, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use super::schema::Scenario;
use crate::config::BuscarConfig;
use crate::context::World;
use crate::driver::PageDriver;
use crate::result::{BuscarError, BuscarResult};
use crate::steps::StepRegistry;

/// Result of running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Unique id of this run
    pub run_id: Uuid,
    /// Scenario name
    pub name: String,
    /// Whether every step passed
    pub passed: bool,
    /// Results of the steps that ran
    pub step_results: Vec<StepResult>,
    /// Total execution time
    pub total_time: Duration,
    /// Error message of the failing step
    pub error: Option<String>,
}

/// Result of executing a single step.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    /// Step text
    pub text: String,
    /// Whether step passed
    pub passed: bool,
    /// Step execution time
    pub duration: Duration,
    /// Error message if failed
    pub error: Option<String>,
}

/// Runs scenarios against a page driver.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    registry: Arc<StepRegistry>,
    config: Arc<BuscarConfig>,
}

impl ScenarioRunner {
    /// Create a runner with the given configuration
    pub fn new(config: BuscarConfig) -> BuscarResult<Self> {
        config.validate()?;
        Ok(Self {
            registry: Arc::new(StepRegistry::new()?),
            config: Arc::new(config),
        })
    }

    /// Configuration in effect
    #[must_use]
    pub fn config(&self) -> &BuscarConfig {
        &self.config
    }

    /// Run one scenario in a fresh world
    pub async fn run(&self, driver: Arc<dyn PageDriver>, scenario: &Scenario) -> ScenarioResult {
        let run_id = Uuid::new_v4();
        let start = Instant::now();
        let deadline = start + self.config.scenario_timeout();
        let mut world = World::new(driver, Arc::clone(&self.config));
        let mut step_results = Vec::with_capacity(scenario.steps.len());
        let mut error = None;

        info!(%run_id, scenario = %scenario.name, steps = scenario.steps.len(), "scenario started");

        for step in &scenario.steps {
            let step_start = Instant::now();
            let outcome = timeout_at(deadline, self.registry.run(&mut world, step))
                .await
                .unwrap_or(Err(BuscarError::Timeout {
                    ms: self.config.scenario_timeout_ms,
                }));
            let duration = step_start.elapsed();

            match outcome {
                Ok(()) => step_results.push(StepResult {
                    text: step.text().to_string(),
                    passed: true,
                    duration,
                    error: None,
                }),
                Err(e) => {
                    warn!(%run_id, step = step.text(), error = %e, "step failed");
                    let message = e.to_string();
                    step_results.push(StepResult {
                        text: step.text().to_string(),
                        passed: false,
                        duration,
                        error: Some(message.clone()),
                    });
                    error = Some(message);
                    break;
                }
            }
        }

        let passed = error.is_none();
        let total_time = start.elapsed();
        info!(%run_id, scenario = %scenario.name, passed, ?total_time, "scenario finished");

        ScenarioResult {
            run_id,
            name: scenario.name.clone(),
            passed,
            step_results,
            total_time,
            error,
        }
    }

    /// Run scenarios one after another, each in its own world
    pub async fn run_all(
        &self,
        driver: Arc<dyn PageDriver>,
        scenarios: &[Scenario],
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(self.run(Arc::clone(&driver), scenario).await);
        }
        results
    }
}
