//! Locator context: the scenario's single "current subject" slot.
//!
//! Every query writes the slot; every chaining step, action and assertion
//! reads it. There is no history: writing replaces.
//!
//! The slot lives in a per-scenario [`World`], created empty when the
//! scenario starts and dropped when it ends.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::config::BuscarConfig;
use crate::driver::PageDriver;
use crate::locator::LocatorHandle;
use crate::result::{BuscarError, BuscarResult};

/// Single slot holding at most one live handle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorContext {
    current: Option<LocatorHandle>,
}

impl LocatorContext {
    /// Create an empty context
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Replace the current subject
    pub fn set(&mut self, handle: LocatorHandle) -> &LocatorHandle {
        trace!(subject = %handle, "locator context replaced");
        self.current.insert(handle)
    }

    /// The current subject, or a precondition error naming `operation`
    pub fn current(&self, operation: &str) -> BuscarResult<&LocatorHandle> {
        self.current
            .as_ref()
            .ok_or_else(|| BuscarError::precondition(operation))
    }

    /// The current subject, if any
    #[must_use]
    pub const fn get(&self) -> Option<&LocatorHandle> {
        self.current.as_ref()
    }

    /// Derive a new subject from the current one and store it
    pub fn replace_with(
        &mut self,
        operation: &str,
        derive: impl FnOnce(&LocatorHandle) -> LocatorHandle,
    ) -> BuscarResult<&LocatorHandle> {
        let next = derive(self.current(operation)?);
        Ok(self.set(next))
    }

    /// Empty the slot
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Whether no subject is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

/// Per-scenario state: driver, locator context and configuration
pub struct World {
    driver: Arc<dyn PageDriver>,
    context: LocatorContext,
    config: Arc<BuscarConfig>,
}

impl World {
    /// Create a world with an empty context
    #[must_use]
    pub fn new(driver: Arc<dyn PageDriver>, config: Arc<BuscarConfig>) -> Self {
        Self {
            driver,
            context: LocatorContext::new(),
            config,
        }
    }

    /// The page driver
    #[must_use]
    pub fn driver(&self) -> &dyn PageDriver {
        self.driver.as_ref()
    }

    /// The locator context
    #[must_use]
    pub const fn context(&self) -> &LocatorContext {
        &self.context
    }

    /// Mutable access to the locator context
    pub fn context_mut(&mut self) -> &mut LocatorContext {
        &mut self.context
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &BuscarConfig {
        &self.config
    }

    /// Scope for a query: the current subject when `within` is set, else the page root (`None`)
    pub fn scope(&self, within: bool, operation: &str) -> BuscarResult<Option<&LocatorHandle>> {
        if within {
            self.context.current(operation).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("context", &self.context)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
