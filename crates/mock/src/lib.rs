//! Test double for an asynchronous interop runtime.
//!
//! Production code issues named, argument-carrying invocations through the
//! [`InteropRuntime`] / [`InProcessRuntime`] traits. In tests those calls land
//! in a [`MockInvokeHandler`], which:
//! * records every call in a per-handler [`Ledger`]
//! * matches calls against planned invocations declared by the test
//! * answers deferred calls through [`InvokeHandle`]s the test settles later
//! * falls back to [`MockMode`] when nothing matches
//!
//! ```
//! use futures::FutureExt;
//! use interplay_mock::{InteropRuntime, MockInvokeHandler, MockMode, args};
//!
//! let mock = MockInvokeHandler::new(MockMode::Strict);
//! let plan = mock.setup::<u32>("answer", args![]);
//!
//! let handle = mock.to_runtime().invoke_async::<u32>("answer", args![]).unwrap();
//! assert!(handle.is_pending());
//!
//! plan.set_result(42);
//! assert_eq!(handle.now_or_never().map(Result::unwrap), Some(42));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod handle;
mod handler;
mod immediate;
mod key;
mod ledger;
mod matcher;
mod mode;
mod plan;
mod runtime;

pub use config::{AmbiguityPolicy, MockConfig};
pub use error::{ConfigError, Error, PlannedFault, Result};
pub use handle::{HandleStatus, InvokeHandle};
pub use handler::MockInvokeHandler;
pub use immediate::ImmediatePlannedInvocation;
pub use interplay_invocation::{Arg, Args, IntoArgs, InvocationKind, InvocationRecord, args};
pub use key::{InvokeResult, ResultKey};
pub use ledger::Ledger;
pub use matcher::ArgumentMatcher;
pub use mode::MockMode;
pub use plan::PlannedInvocation;
pub use runtime::{InProcessRuntime, InteropRuntime, MockRuntime};
pub use tokio_util::sync::CancellationToken;
