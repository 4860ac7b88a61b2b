//! The dispatch boundary: one request in, one outcome out
//!
//! Every invocation failure is converted to a status code plus payload
//! here; nothing crosses the socket unencoded. Panics inside handlers are
//! caught at this boundary and reported as `Exception` outcomes with a
//! diagnostic trace, so a misbehaving command cannot take down the
//! window manager.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::{self, AssertUnwindSafe};

use gable_protocol::{CallOutcome, CallRequest};

use crate::error::CommandError;
use crate::registry::CommandRegistry;

/// Resolve, invoke, and encode one command invocation
///
/// Unknown names short-circuit before any host state is touched. The host
/// context is borrowed exclusively for the duration of the call; callers
/// are responsible for serializing access across connections.
pub fn handle_call<C>(
    registry: &CommandRegistry<C>,
    ctx: &mut C,
    request: &CallRequest,
) -> CallOutcome {
    let Ok(command) = registry.resolve(&request.command) else {
        tracing::warn!(command = %request.command, "unknown command");
        return CallOutcome::error(format!("Unknown command: {}", request.command));
    };

    tracing::info!(
        command = %request.command,
        args = ?request.args,
        kwargs = ?request.kwargs,
        "dispatching command"
    );

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        command.invoke(ctx, &request.args, &request.kwargs)
    }));

    match result {
        Ok(Ok(value)) => CallOutcome::success(value),
        Ok(Err(CommandError::Failure(message))) => {
            tracing::warn!(command = %request.command, %message, "command failed");
            CallOutcome::error(message)
        }
        Ok(Err(error)) => fault(&request.command, format!("failed internally: {error}")),
        Err(payload) => fault(
            &request.command,
            format!("panicked: {}", panic_message(payload.as_ref())),
        ),
    }
}

/// Build an `Exception` outcome and log it server-side
fn fault(command: &str, cause: String) -> CallOutcome {
    let trace = format!(
        "command '{command}' {cause}\nbacktrace:\n{}",
        Backtrace::force_capture()
    );
    tracing::error!(command = %command, %trace, "command fault");
    CallOutcome::exception(trace)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}
