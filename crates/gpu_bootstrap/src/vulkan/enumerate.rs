//! Count-then-fill enumeration
//!
//! Vulkan enumeration queries are called twice: once with no buffer to get
//! a count, then again with a buffer of that size. Drivers may report a
//! different number on the second call if their state changed in between.
//! A shrink is accepted and the buffer truncated. A growth (`VK_INCOMPLETE`)
//! keeps what fit in the first-sized buffer and is logged; there is no
//! re-query.

use ash::vk;

use super::{BootstrapError, BootstrapResult};

/// Run a count/fill query pair and collect the results
///
/// `query` follows the Vulkan convention: called with `None` it writes the
/// total into `count`; called with a buffer, `count` holds the buffer length
/// on entry and the number of written elements on return.
pub fn enumerate_two_call<T, F>(what: &'static str, mut query: F) -> BootstrapResult<Vec<T>>
where
    T: Default + Clone,
    F: FnMut(&mut u32, Option<&mut [T]>) -> vk::Result,
{
    let mut count = 0u32;
    match query(&mut count, None) {
        vk::Result::SUCCESS => {}
        status => return Err(BootstrapError::EnumerationFailed { what, status }),
    }

    let mut items = vec![T::default(); count as usize];
    if items.is_empty() {
        return Ok(items);
    }

    let mut written = count;
    match query(&mut written, Some(&mut items)) {
        vk::Result::SUCCESS => {}
        vk::Result::INCOMPLETE => {
            log::warn!(
                "{} count grew after it was queried; keeping the first {} entries",
                what,
                items.len()
            );
        }
        status => return Err(BootstrapError::EnumerationFailed { what, status }),
    }

    let written = (written as usize).min(items.len());
    if written < items.len() {
        log::debug!("{} count shrank from {} to {} between calls", what, items.len(), written);
        items.truncate(written);
    }

    Ok(items)
}
