//! Error types for dispatch, handle settlement and configuration.

use std::fmt;
use std::sync::Arc;

use interplay_invocation::InvocationRecord;
use thiserror::Error;

/// A test-authored error delivered to handles of a faulted plan.
///
/// Every handle receives a clone of the same shared instance, so tests can
/// check identity with [`PlannedFault::ptr_eq`].
#[derive(Clone)]
pub struct PlannedFault(Arc<dyn std::error::Error + Send + Sync>);

impl PlannedFault {
	/// Wraps an error.
	pub fn new<E>(error: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self(Arc::new(error))
	}

	/// Returns true if both faults share one error instance.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}

	/// Returns the inner error if it is an `E`.
	pub fn downcast_ref<E>(&self) -> Option<&E>
	where
		E: std::error::Error + 'static,
	{
		self.0.downcast_ref::<E>()
	}
}

impl fmt::Debug for PlannedFault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&*self.0, f)
	}
}

impl fmt::Display for PlannedFault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&*self.0, f)
	}
}

/// Errors surfaced by the mock runtime, either synchronously from dispatch or
/// through an [`InvokeHandle`](crate::InvokeHandle).
#[derive(Debug, Clone, Error)]
pub enum Error {
	/// Strict mode: no plan matched a deferred call.
	#[error("unplanned invocation: {}", .0.describe())]
	UnplannedInvocation(Box<InvocationRecord>),

	/// Strict mode: no plan matched an immediate call.
	#[error("unplanned immediate invocation: {}", .0.describe())]
	UnplannedImmediateInvocation(Box<InvocationRecord>),

	/// More than one identifier-scoped plan matched one call.
	#[error("{matches} planned invocations match {}", .invocation.describe())]
	AmbiguousInvocation {
		/// The call that could not be routed.
		invocation: Box<InvocationRecord>,
		/// Number of matching plans.
		matches: usize,
	},

	/// The matched plan was resolved with an error.
	#[error("planned invocation faulted: {0}")]
	Faulted(PlannedFault),

	/// The matched plan was canceled.
	#[error("planned invocation canceled")]
	Canceled,
}

impl Error {
	/// The offending call, for dispatch failures.
	pub fn invocation(&self) -> Option<&InvocationRecord> {
		match self {
			Self::UnplannedInvocation(record) | Self::UnplannedImmediateInvocation(record) => Some(record.as_ref()),
			Self::AmbiguousInvocation { invocation, .. } => Some(invocation.as_ref()),
			Self::Faulted(_) | Self::Canceled => None,
		}
	}

	/// The planned fault, for faulted handles.
	pub fn fault(&self) -> Option<&PlannedFault> {
		match self {
			Self::Faulted(fault) => Some(fault),
			_ => None,
		}
	}
}

/// Result type for mock runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when loading a [`MockConfig`](crate::MockConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unknown value.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}
