//! Deferred command invocations
//!
//! A [`CallSpec`] describes a command call without executing it: key
//! bindings and scripted sequences are built from these and submitted later
//! by orchestration code. An optional guard predicate restricts when the
//! spec is eligible, e.g. only while a particular layout is active.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use gable_protocol::CallRequest;

/// Guard predicate over the current host state
pub type Guard<C> = Arc<dyn Fn(&C) -> bool + Send + Sync>;

/// A deferred, optionally conditional command invocation
///
/// Pure value object: no I/O and no transport interaction. Callers are
/// expected to check [`CallSpec::is_eligible`] before submitting the
/// spec's request to a client.
pub struct CallSpec<C> {
    command: String,
    args: Vec<Value>,
    kwargs: Map<String, Value>,
    guard: Option<Guard<C>>,
}

impl<C> CallSpec<C> {
    /// Describe a call to `command` with the given arguments
    pub fn new(
        command: impl Into<String>,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Self {
        Self {
            command: command.into(),
            args,
            kwargs,
            guard: None,
        }
    }

    /// Attach or replace the guard predicate (builder-style)
    pub fn when<F>(mut self, guard: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Arc::new(guard));
        self
    }

    /// Whether this spec may be submitted given the current host state
    ///
    /// Always true when no guard is attached.
    pub fn is_eligible(&self, state: &C) -> bool {
        match &self.guard {
            Some(guard) => guard(state),
            None => true,
        }
    }

    /// Command name
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Positional arguments
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Keyword arguments
    pub fn kwargs(&self) -> &Map<String, Value> {
        &self.kwargs
    }

    /// Wire-form request for submission to a client
    pub fn request(&self) -> CallRequest {
        CallRequest::new(self.command.clone(), self.args.clone(), self.kwargs.clone())
    }
}

// Manual impl: `C` itself does not need to be `Clone`.
impl<C> Clone for CallSpec<C> {
    fn clone(&self) -> Self {
        Self {
            command: self.command.clone(),
            args: self.args.clone(),
            kwargs: self.kwargs.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<C> fmt::Debug for CallSpec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSpec")
            .field("command", &self.command)
            .field("args", &self.args)
            .field("kwargs", &self.kwargs)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}
