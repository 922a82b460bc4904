//! Display-value queries.
//!
//! `get element by display value` tries inputs, then textareas, then
//! select options, and keeps the first strategy with a match.

use tracing::debug;

use crate::config::BuscarConfig;
use crate::context::World;
use crate::intent::QueryIntent;
use crate::locator::LocatorHandle;
use crate::options::OptionSet;
use crate::queries::log_options;
use crate::result::{BuscarError, BuscarResult};
use crate::selector::{Criterion, PseudoSelector, SelectorCompiler};

/// One place a display value can live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayValueStrategy {
    /// Visible `<input value="V">`
    Input,
    /// Visible `<textarea value="V">`
    Textarea,
    /// The `<select>` owning an `<option>` with text V
    Option,
}

/// Strategies in priority order
pub const DISPLAY_VALUE_STRATEGIES: [DisplayValueStrategy; 3] = [
    DisplayValueStrategy::Input,
    DisplayValueStrategy::Textarea,
    DisplayValueStrategy::Option,
];

impl DisplayValueStrategy {
    fn root(selector: String, options: Option<&OptionSet>, config: &BuscarConfig) -> LocatorHandle {
        LocatorHandle::root(selector).with_options(config.locate_options(options))
    }

    fn control(
        tag: &str,
        value: &str,
        options: Option<&OptionSet>,
        config: &BuscarConfig,
    ) -> LocatorHandle {
        let pseudo = QueryIntent::DisplayValue(value.to_string()).pseudo(options);
        let selector = SelectorCompiler::new()
            .quoting(config.quoting())
            .alternative(tag, Criterion::attr_eq("value", value))
            .pseudo(pseudo)
            .compile();
        Self::root(selector, options, config).first()
    }

    /// Handle whose count decides whether this strategy applies
    #[must_use]
    pub fn candidate(self, value: &str, options: Option<&OptionSet>, config: &BuscarConfig) -> LocatorHandle {
        match self {
            Self::Input | Self::Textarea => self.target(value, options, config),
            Self::Option => {
                let pseudo = options
                    .and_then(OptionSet::pseudo_selector)
                    .unwrap_or(PseudoSelector::None);
                let selector = SelectorCompiler::new()
                    .quoting(config.quoting())
                    .alternative("option", Criterion::has_text(value))
                    .pseudo(pseudo)
                    .compile();
                Self::root(selector, options, config)
            }
        }
    }

    /// Handle stored as the subject when this strategy applies
    #[must_use]
    pub fn target(self, value: &str, options: Option<&OptionSet>, config: &BuscarConfig) -> LocatorHandle {
        match self {
            Self::Input => Self::control("input", value, options, config),
            Self::Textarea => Self::control("textarea", value, options, config),
            Self::Option => {
                let selector = SelectorCompiler::new()
                    .quoting(config.quoting())
                    .alternative("option", Criterion::text(value))
                    .compile();
                Self::root(selector, options, config).closest("select")
            }
        }
    }
}

/// `When I get element by display value "V"`
pub async fn get_element_by_display_value<'w>(
    world: &'w mut World,
    value: &str,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    log_options("get element by display value", options);
    for strategy in DISPLAY_VALUE_STRATEGIES {
        let candidate = strategy.candidate(value, options, world.config());
        if world.driver().count(&candidate).await? > 0 {
            let handle = strategy.target(value, options, world.config());
            debug!(?strategy, value, selector = %handle, "display value resolved");
            return Ok(world.context_mut().set(handle));
        }
    }
    Err(BuscarError::resolution(
        "element by display value",
        value,
        "no input, textarea or select option has this value",
    ))
}

/// `When I find input|textarea|select by display value "V"`
pub async fn find_by_display_value<'w>(
    world: &'w mut World,
    strategy: DisplayValueStrategy,
    value: &str,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    log_options("find by display value", options);
    let handle = strategy.target(value, options, world.config());
    debug!(?strategy, value, selector = %handle, "query resolved");
    Ok(world.context_mut().set(handle))
}
