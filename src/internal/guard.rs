//! Panic observation around user constructors.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::context::Context;
use crate::observer::Observers;

/// Runs a constructor, reporting panics to observers before re-raising them.
///
/// The panic payload is resumed untouched so callers see exactly what the
/// constructor raised.
pub(crate) fn construct_observed<T, F>(observers: &Observers, context: &Context, name: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    if !observers.has_observers() {
        return f();
    }

    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => {
            observers.construction_panicked(context, name, panic_message(payload.as_ref()));
            panic::resume_unwind(payload)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}
