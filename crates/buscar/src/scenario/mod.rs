//! YAML-driven scenarios.
//!
//! # Example
//!
//! ```yaml
//! name: "signup"
//! steps:
//!   - When I find element by label text "Email"
//!   - And I set value "a@b.com"
//!   - step: Then I see value "a@b.com"
//!     table:
//!       - [log, "true"]
//! ```

pub mod runner;
pub mod schema;

pub use runner::{ScenarioResult, ScenarioRunner, StepResult};
pub use schema::Scenario;
