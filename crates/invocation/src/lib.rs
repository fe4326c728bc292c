//! Canonical invocation records for the interop test double.
//!
//! Every call that production code issues against the mocked runtime is
//! captured as an [`InvocationRecord`] before any plan matching happens.

mod arg;

pub use arg::{Arg, ArgValue, Args, IntoArgs};
use tokio_util::sync::CancellationToken;

/// Call discipline of an observed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationKind {
	/// Asynchronous call completed through a deferred handle.
	Deferred,
	/// Synchronous call returning a value directly.
	Immediate,
}

impl InvocationKind {
	/// Short label for tracing/logging.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Deferred => "deferred",
			Self::Immediate => "immediate",
		}
	}
}

/// An observed call: identifier, ordered arguments and, for deferred calls,
/// the cancellation token the caller passed along.
///
/// Records are immutable; clones share the argument values.
#[derive(Debug, Clone)]
pub struct InvocationRecord {
	kind: InvocationKind,
	identifier: String,
	arguments: Args,
	cancellation: Option<CancellationToken>,
}

impl InvocationRecord {
	/// Creates a deferred-call record.
	pub fn deferred(identifier: impl Into<String>, arguments: Args, cancellation: Option<CancellationToken>) -> Self {
		Self {
			kind: InvocationKind::Deferred,
			identifier: identifier.into(),
			arguments,
			cancellation,
		}
	}

	/// Creates an immediate-call record.
	pub fn immediate(identifier: impl Into<String>, arguments: Args) -> Self {
		Self {
			kind: InvocationKind::Immediate,
			identifier: identifier.into(),
			arguments,
			cancellation: None,
		}
	}

	/// Call discipline.
	pub const fn kind(&self) -> InvocationKind {
		self.kind
	}

	/// Identifier the call was made with.
	pub fn identifier(&self) -> &str {
		&self.identifier
	}

	/// Arguments in call order.
	pub fn arguments(&self) -> &Args {
		&self.arguments
	}

	/// Cancellation token passed with a deferred call. Always `None` for
	/// immediate calls.
	pub fn cancellation(&self) -> Option<&CancellationToken> {
		self.cancellation.as_ref()
	}

	/// Short description for tracing/logging.
	pub fn describe(&self) -> String {
		let args: Vec<String> = self.arguments.iter().map(|arg| format!("{arg:?}")).collect();
		format!("{}:{}({})", self.kind.as_str(), self.identifier, args.join(", "))
	}
}

#[cfg(test)]
mod tests;
