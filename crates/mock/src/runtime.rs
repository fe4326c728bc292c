//! Interop runtime surface consumed by production code, and its mock.

use interplay_invocation::{Args, IntoArgs};
use tokio_util::sync::CancellationToken;

use crate::{InvokeHandle, InvokeResult, MockInvokeHandler, Result};

/// Asynchronous call surface of an external runtime.
///
/// Every call returns a handle completing with the declared result type, or
/// fails right away when the runtime rejects it.
pub trait InteropRuntime {
	/// Calls `identifier` expecting a `T`.
	fn invoke_async<T: InvokeResult>(&self, identifier: &str, args: Args) -> Result<InvokeHandle<T>>;

	/// Calls `identifier` expecting a `T`, passing a cancellation token along.
	fn invoke_async_with_cancellation<T: InvokeResult>(&self, identifier: &str, cancellation: CancellationToken, args: Args) -> Result<InvokeHandle<T>>;

	/// Calls `identifier` expecting no result.
	fn invoke_void_async(&self, identifier: &str, args: Args) -> Result<InvokeHandle<()>>;

	/// Calls `identifier` expecting no result, passing a cancellation token
	/// along.
	fn invoke_void_async_with_cancellation(&self, identifier: &str, cancellation: CancellationToken, args: Args) -> Result<InvokeHandle<()>>;
}

/// Synchronous call surface of an external runtime living in the same
/// process.
pub trait InProcessRuntime: InteropRuntime {
	/// Calls `identifier` and returns its `T` result directly.
	fn invoke<T: InvokeResult>(&self, identifier: &str, args: Args) -> Result<T>;

	/// Calls `identifier` with up to three typed arguments passed without
	/// marshalling. Routed like [`invoke`](Self::invoke).
	fn invoke_unmarshalled<T: InvokeResult, A: IntoArgs>(&self, identifier: &str, args: A) -> Result<T> {
		self.invoke(identifier, args.into_args())
	}
}

/// Runtime adapter backed by a [`MockInvokeHandler`].
///
/// Holds a borrowed back-reference to the handler; it owns nothing.
#[derive(Debug, Clone, Copy)]
pub struct MockRuntime<'a> {
	handler: &'a MockInvokeHandler,
}

impl<'a> MockRuntime<'a> {
	pub(crate) const fn new(handler: &'a MockInvokeHandler) -> Self {
		Self { handler }
	}

	/// The handler calls are routed to.
	pub const fn handler(&self) -> &'a MockInvokeHandler {
		self.handler
	}
}

impl InteropRuntime for MockRuntime<'_> {
	fn invoke_async<T: InvokeResult>(&self, identifier: &str, args: Args) -> Result<InvokeHandle<T>> {
		self.handler.dispatch_async(identifier, args, None)
	}

	fn invoke_async_with_cancellation<T: InvokeResult>(&self, identifier: &str, cancellation: CancellationToken, args: Args) -> Result<InvokeHandle<T>> {
		self.handler.dispatch_async(identifier, args, Some(cancellation))
	}

	fn invoke_void_async(&self, identifier: &str, args: Args) -> Result<InvokeHandle<()>> {
		self.handler.dispatch_void_async(identifier, args, None)
	}

	fn invoke_void_async_with_cancellation(&self, identifier: &str, cancellation: CancellationToken, args: Args) -> Result<InvokeHandle<()>> {
		self.handler.dispatch_void_async(identifier, args, Some(cancellation))
	}
}

impl InProcessRuntime for MockRuntime<'_> {
	fn invoke<T: InvokeResult>(&self, identifier: &str, args: Args) -> Result<T> {
		self.handler.dispatch_sync(identifier, args)
	}
}
