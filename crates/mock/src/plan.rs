//! Deferred-discipline planned invocations.
//!
//! A plan keeps the resolution state tests set on it and the cells of every
//! handle still waiting for an outcome. Setting a state settles all waiting
//! handles at once and applies to every call registered afterwards until the
//! state is set again. Settled handles are never revisited.

use std::fmt;
use std::sync::Arc;

use interplay_invocation::{Args, InvocationRecord};
use parking_lot::Mutex;
use tracing::debug;

use crate::handle::HandleCell;
use crate::matcher::ArgumentMatcher;
use crate::{Error, InvokeHandle, PlannedFault, Result};

/// Current resolution of a deferred plan.
#[derive(Clone)]
enum Resolution<T> {
	Unset,
	Value(T),
	Fault(PlannedFault),
	Canceled,
}

impl<T: Clone> Resolution<T> {
	fn outcome(&self) -> Option<Result<T>> {
		match self {
			Self::Unset => None,
			Self::Value(value) => Some(Ok(value.clone())),
			Self::Fault(fault) => Some(Err(Error::Faulted(fault.clone()))),
			Self::Canceled => Some(Err(Error::Canceled)),
		}
	}

	const fn label(&self) -> &'static str {
		match self {
			Self::Unset => "unset",
			Self::Value(_) => "result",
			Self::Fault(_) => "exception",
			Self::Canceled => "canceled",
		}
	}
}

struct PlanState<T> {
	resolution: Resolution<T>,
	pending: Vec<Arc<HandleCell<T>>>,
	invocations: Vec<InvocationRecord>,
}

struct PlanInner<T> {
	identifier: Option<String>,
	matcher: ArgumentMatcher,
	state: Mutex<PlanState<T>>,
}

/// A planned deferred invocation.
///
/// Returned by the `setup*` methods of
/// [`MockInvokeHandler`](crate::MockInvokeHandler). Clones share one plan.
/// Plans of `()` complete void calls via [`Self::set_void_result`].
pub struct PlannedInvocation<T> {
	inner: Arc<PlanInner<T>>,
}

impl<T> Clone for PlannedInvocation<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> PlannedInvocation<T> {
	pub(crate) fn new(identifier: Option<String>, matcher: ArgumentMatcher) -> Self {
		Self {
			inner: Arc::new(PlanInner {
				identifier,
				matcher,
				state: Mutex::new(PlanState {
					resolution: Resolution::Unset,
					pending: Vec::new(),
					invocations: Vec::new(),
				}),
			}),
		}
	}

	/// Identifier this plan answers, `None` for a catch-all.
	pub fn identifier(&self) -> Option<&str> {
		self.inner.identifier.as_deref()
	}

	/// Returns true for a catch-all plan.
	pub fn is_catch_all(&self) -> bool {
		self.inner.identifier.is_none()
	}

	/// Calls routed to this plan, in call order.
	pub fn invocations(&self) -> Vec<InvocationRecord> {
		self.inner.state.lock().invocations.clone()
	}

	/// Number of routed calls still waiting for an outcome.
	pub fn pending_count(&self) -> usize {
		self.inner.state.lock().pending.len()
	}

	pub(crate) fn matches(&self, args: &Args) -> bool {
		self.inner.matcher.matches(args)
	}
}

impl<T: Clone> PlannedInvocation<T> {
	/// Completes every waiting call with `value`, and every later call until
	/// the state is set again.
	pub fn set_result(&self, value: T) {
		self.resolve(Resolution::Value(value));
	}

	/// Faults every waiting and later call with `error`.
	///
	/// Returns the shared fault so tests can compare identity.
	pub fn set_exception<E>(&self, error: E) -> PlannedFault
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		let fault = PlannedFault::new(error);
		self.set_fault(fault.clone());
		fault
	}

	/// Faults every waiting and later call with an existing fault.
	pub fn set_fault(&self, fault: PlannedFault) {
		self.resolve(Resolution::Fault(fault));
	}

	/// Cancels every waiting and later call.
	pub fn set_canceled(&self) {
		self.resolve(Resolution::Canceled);
	}

	/// Attaches one call and returns its handle, settled right away unless the
	/// plan is still unset.
	pub(crate) fn register(&self, record: InvocationRecord) -> InvokeHandle<T> {
		let mut state = self.inner.state.lock();
		state.invocations.push(record);
		match state.resolution.outcome() {
			Some(outcome) => InvokeHandle::settled(outcome),
			None => {
				let (handle, cell) = InvokeHandle::pending();
				state.pending.push(cell);
				handle
			}
		}
	}

	fn resolve(&self, resolution: Resolution<T>) {
		let Some(outcome) = resolution.outcome() else {
			return;
		};
		let mut state = self.inner.state.lock();
		let pending = std::mem::take(&mut state.pending);
		debug!(
			identifier = self.identifier().unwrap_or("*"),
			resolution = resolution.label(),
			pending = pending.len(),
			"mock.plan.resolve"
		);
		state.resolution = resolution;
		drop(state);

		for cell in pending {
			cell.settle(outcome.clone());
		}
	}
}

impl PlannedInvocation<()> {
	/// Completes every waiting and later void call.
	pub fn set_void_result(&self) {
		self.set_result(());
	}
}

impl<T> fmt::Debug for PlannedInvocation<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.inner.state.lock();
		f.debug_struct("PlannedInvocation")
			.field("identifier", &self.inner.identifier)
			.field("invocations", &state.invocations.len())
			.field("pending", &state.pending.len())
			.finish()
	}
}

#[cfg(test)]
mod tests;
