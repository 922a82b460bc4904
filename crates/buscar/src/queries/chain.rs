//! Chaining primitives: derive a new subject from the current one.

use tracing::debug;

use crate::context::World;
use crate::locator::LocatorHandle;
use crate::result::{BuscarError, BuscarResult};

fn chain<'w>(
    world: &'w mut World,
    operation: &str,
    derive: impl FnOnce(&LocatorHandle) -> LocatorHandle,
) -> BuscarResult<&'w LocatorHandle> {
    let handle = world.context_mut().replace_with(operation, derive)?;
    debug!(operation, selector = %handle, "subject chained");
    Ok(handle)
}

/// `When I get children`
pub async fn get_children(world: &mut World) -> BuscarResult<&LocatorHandle> {
    chain(world, "get children", LocatorHandle::children)
}

/// `When I find closest element "S"`
pub async fn find_closest_element<'w>(
    world: &'w mut World,
    selector: &str,
) -> BuscarResult<&'w LocatorHandle> {
    chain(world, "find closest element", |h| h.closest(selector))
}

/// `When I get first element`
pub async fn get_first_element(world: &mut World) -> BuscarResult<&LocatorHandle> {
    chain(world, "get first element", LocatorHandle::first)
}

/// `When I get last element`
pub async fn get_last_element(world: &mut World) -> BuscarResult<&LocatorHandle> {
    chain(world, "get last element", LocatorHandle::last)
}

/// `When I get 2nd element`: `position` is 1-based
pub async fn get_nth_element(world: &mut World, position: usize) -> BuscarResult<&LocatorHandle> {
    world.context().current("get nth element")?;
    let index = position
        .checked_sub(1)
        .ok_or_else(|| BuscarError::invalid_options("element positions start at 1"))?;
    chain(world, "get nth element", |h| h.nth(index))
}

/// `When I get focused element`
pub async fn get_focused_element(world: &mut World) -> BuscarResult<&LocatorHandle> {
    chain(world, "get focused element", LocatorHandle::focused)
}
