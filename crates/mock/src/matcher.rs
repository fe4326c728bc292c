use std::fmt;
use std::sync::Arc;

use interplay_invocation::Args;

/// Argument predicate of a planned invocation.
///
/// Evaluated afresh for every call; never cached.
#[derive(Clone)]
pub struct ArgumentMatcher(Arc<dyn Fn(&Args) -> bool + Send + Sync>);

impl ArgumentMatcher {
	/// Wraps a predicate.
	pub fn new(predicate: impl Fn(&Args) -> bool + Send + Sync + 'static) -> Self {
		Self(Arc::new(predicate))
	}

	/// Matches argument lists structurally equal to `expected`.
	pub fn sequence(expected: Args) -> Self {
		Self::new(move |args| args.sequence_eq(&expected))
	}

	/// Matches every argument list.
	pub fn any() -> Self {
		Self::new(|_| true)
	}

	/// Evaluates the predicate.
	pub fn matches(&self, args: &Args) -> bool {
		(self.0)(args)
	}
}

impl fmt::Debug for ArgumentMatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("ArgumentMatcher(..)")
	}
}

impl From<Args> for ArgumentMatcher {
	fn from(expected: Args) -> Self {
		Self::sequence(expected)
	}
}
