use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{Cause, DomainError};

/// Run a collaborator call and turn any fault into a tagged [`DomainError`]
///
/// `tag` is one of the `DomainError` variant constructors, e.g.
/// `DomainError::FileAccess`. Both returned errors and panics are caught here;
/// nothing above this boundary sees an unconverted fault.
pub fn try_run<T, F>(operation: F, tag: fn(Cause) -> DomainError) -> Result<T, DomainError>
where
    F: FnOnce() -> anyhow::Result<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(operation)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(tag(Cause::from(err))),
        Err(payload) => Err(tag(panic_cause(payload))),
    }
}

fn panic_cause(payload: Box<dyn Any + Send>) -> Cause {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "operation panicked".to_string()
    };
    Cause::new(message)
}
