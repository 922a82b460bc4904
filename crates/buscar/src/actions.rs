//! Value actions and assertions on the current subject.
//!
//! These are thin pass-throughs to the [`PageDriver`](crate::PageDriver);
//! each one fails with a precondition error when no subject is set.

use tracing::debug;

use crate::context::World;
use crate::driver::CHANGE_EVENT;
use crate::options::OptionSet;
use crate::queries::log_options;
use crate::result::{BuscarError, BuscarResult};

fn force(options: Option<&OptionSet>) -> bool {
    options.is_some_and(OptionSet::force)
}

/// `When I set value "V"`: fill, then dispatch `change`
pub async fn set_value(world: &World, value: &str) -> BuscarResult<()> {
    let subject = world.context().current("set value")?;
    debug!(subject = %subject, value, "set value");
    world.driver().fill(subject, value, false).await?;
    world.driver().dispatch_event(subject, CHANGE_EVENT).await
}

/// `When I type "T"`; honours `force`
pub async fn type_text(world: &World, text: &str, options: Option<&OptionSet>) -> BuscarResult<()> {
    log_options("type", options);
    let subject = world.context().current("type")?;
    debug!(subject = %subject, text, "type");
    world.driver().fill(subject, text, force(options)).await
}

/// `When I clear`
pub async fn clear(world: &World, options: Option<&OptionSet>) -> BuscarResult<()> {
    log_options("clear", options);
    let subject = world.context().current("clear")?;
    debug!(subject = %subject, "clear");
    world.driver().fill(subject, "", force(options)).await
}

/// `Then I see value "V"`
pub async fn see_value(world: &World, expected: &str) -> BuscarResult<()> {
    let subject = world.context().current("see value")?;
    let actual = world.driver().input_value(subject).await?;
    if actual == expected {
        Ok(())
    } else {
        Err(BuscarError::assertion(format!(
            "expected value {expected:?}, found {actual:?} on {subject}"
        )))
    }
}

/// `Then I do not see value "V"`
pub async fn do_not_see_value(world: &World, unexpected: &str) -> BuscarResult<()> {
    let subject = world.context().current("do not see value")?;
    let actual = world.driver().input_value(subject).await?;
    if actual == unexpected {
        Err(BuscarError::assertion(format!(
            "expected value other than {unexpected:?} on {subject}"
        )))
    } else {
        Ok(())
    }
}
