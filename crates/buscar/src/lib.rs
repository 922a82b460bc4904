//! Buscar: semantic element queries for BDD browser tests.
//!
//! Buscar (Spanish: "to search") turns human-oriented step phrases such as
//! `When I find input by label text "Email"` into lazy locator handles and
//! keeps the most recent one as the scenario's *current subject*.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      BUSCAR Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Step text  │    │ Options    │    │ Selector   │            │
//! │   │ + table    │───►│ Normalizer │───►│ Compiler   │            │
//! │   └────────────┘    └────────────┘    └─────┬──────┘            │
//! │                                             ▼                   │
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Locator    │◄───│ Query      │◄───│ Label      │            │
//! │   │ Context    │    │ Executors  │    │ Resolution │            │
//! │   └────────────┘    └─────┬──────┘    └────────────┘            │
//! │                           ▼                                     │
//! │                     PageDriver (browser or MockPage)            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use buscar::prelude::*;
//!
//! # async fn demo(driver: Arc<dyn PageDriver>) -> BuscarResult<()> {
//! let runner = ScenarioRunner::new(BuscarConfig::default())?;
//! let scenario = Scenario::new(
//!     "signup",
//!     [
//!         "When I find input by label text \"Email\"",
//!         "And I set value \"a@b.com\"",
//!         "Then I see value \"a@b.com\"",
//!     ],
//! );
//! let result = runner.run(driver, &scenario).await;
//! assert!(result.passed);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod config;
mod context;
mod driver;
mod intent;
mod locator;
mod options;
mod result;
#[allow(clippy::needless_raw_string_hashes)]
mod selector;

/// Value actions and assertions on the current subject
pub mod actions;

/// Label association strategies
pub mod label;

/// Structured logging setup
pub mod logging;

/// In-memory page for tests without a browser
#[allow(clippy::missing_panics_doc)]
pub mod mock;

/// Query executors
pub mod queries;

/// YAML scenarios and the scenario runner
pub mod scenario;

/// Step phrase registry and dispatch
#[allow(clippy::needless_raw_string_hashes)]
pub mod steps;

pub use config::{BuscarConfig, DEFAULT_SCENARIO_TIMEOUT_MS};
pub use context::{LocatorContext, World};
pub use driver::{PageDriver, CHANGE_EVENT};
pub use intent::{QueryIntent, QueryKind, BUTTON_BASES, HEADING_TAGS};
pub use label::{resolve_label, LabelTarget, TieBreak};
pub use locator::{LocateOptions, LocatorHandle, LocatorStep, Nth, DEFAULT_TIMEOUT_MS};
pub use options::{
    OptionSet, OptionValue, FORCE, INCLUDE_SHADOW_DOM, LOG, PSEUDO_SELECTOR, TIMEOUT,
    WITHIN_SUBJECT,
};
pub use queries::Cardinality;
pub use result::{BuscarError, BuscarResult};
pub use scenario::{Scenario, ScenarioResult, ScenarioRunner, StepResult};
pub use selector::{
    compile, id_selector, quote, Alternative, AttributeOp, Criterion, PseudoSelector, Quoting,
    SelectorCompiler, ALTERNATIVE_SEPARATOR,
};
pub use steps::{MatchedStep, Step, StepAction, StepRegistry};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::actions::*;
    pub use super::config::*;
    pub use super::context::*;
    pub use super::driver::*;
    pub use super::intent::*;
    pub use super::label::*;
    pub use super::locator::*;
    pub use super::mock::{MockElement, MockPage};
    pub use super::options::*;
    pub use super::queries::attribute::*;
    pub use super::queries::chain::*;
    pub use super::queries::display_value::*;
    pub use super::queries::label::*;
    pub use super::queries::selector::*;
    pub use super::queries::text::*;
    pub use super::queries::{build_handle, execute, Cardinality};
    pub use super::result::*;
    pub use super::scenario::*;
    pub use super::selector::*;
    pub use super::steps::*;
}
