//! Immediate-discipline planned invocations.
//!
//! The result is fixed when the plan is declared; every matching call returns
//! a clone of it synchronously.

use std::fmt;
use std::sync::Arc;

use interplay_invocation::{Args, InvocationRecord};
use parking_lot::Mutex;

use crate::matcher::ArgumentMatcher;

struct ImmediateInner<T> {
	identifier: Option<String>,
	matcher: ArgumentMatcher,
	result: T,
	invocations: Mutex<Vec<InvocationRecord>>,
}

/// A planned immediate invocation with a fixed result.
pub struct ImmediatePlannedInvocation<T> {
	inner: Arc<ImmediateInner<T>>,
}

impl<T> Clone for ImmediatePlannedInvocation<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> ImmediatePlannedInvocation<T> {
	pub(crate) fn new(identifier: Option<String>, result: T, matcher: ArgumentMatcher) -> Self {
		Self {
			inner: Arc::new(ImmediateInner {
				identifier,
				matcher,
				result,
				invocations: Mutex::new(Vec::new()),
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

	/// The fixed result.
	pub fn result(&self) -> &T {
		&self.inner.result
	}

	/// Calls routed to this plan, in call order.
	pub fn invocations(&self) -> Vec<InvocationRecord> {
		self.inner.invocations.lock().clone()
	}

	pub(crate) fn matches(&self, args: &Args) -> bool {
		self.inner.matcher.matches(args)
	}
}

impl<T: Clone> ImmediatePlannedInvocation<T> {
	pub(crate) fn register(&self, record: InvocationRecord) -> T {
		self.inner.invocations.lock().push(record);
		self.inner.result.clone()
	}
}

impl<T: fmt::Debug> fmt::Debug for ImmediatePlannedInvocation<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ImmediatePlannedInvocation")
			.field("identifier", &self.inner.identifier)
			.field("result", &self.inner.result)
			.field("invocations", &self.inner.invocations.lock().len())
			.finish()
	}
}
