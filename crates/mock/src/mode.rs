use serde::Deserialize;

/// Behavior of the mock when no planned invocation matches a call.
///
/// Fixed when the handler is constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MockMode {
	/// Unmatched calls yield the result type's default value.
	#[default]
	Loose,
	/// Unmatched calls fail with an unplanned-invocation error.
	Strict,
}

impl MockMode {
	/// Short label for tracing/logging.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Loose => "loose",
			Self::Strict => "strict",
		}
	}
}
