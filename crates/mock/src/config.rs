//! Handler configuration.

use serde::Deserialize;

use crate::MockMode;
use crate::error::ConfigError;

/// What to do when more than one identifier-scoped plan matches a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
	/// Fail the call with [`Error::AmbiguousInvocation`](crate::Error::AmbiguousInvocation).
	#[default]
	Reject,
	/// Route to the earliest declared matching plan.
	FirstRegistered,
}

/// Configuration of a [`MockInvokeHandler`](crate::MockInvokeHandler).
///
/// Missing keys fall back to their defaults when parsed:
///
/// ```toml
/// mode = "strict"
/// ambiguity = "first_registered"
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MockConfig {
	/// Unmatched-call behavior.
	pub mode: MockMode,
	/// Overlapping-plan behavior.
	pub ambiguity: AmbiguityPolicy,
}

impl MockConfig {
	/// Loose mode, rejecting ambiguous plans.
	pub const fn loose() -> Self {
		Self {
			mode: MockMode::Loose,
			ambiguity: AmbiguityPolicy::Reject,
		}
	}

	/// Strict mode, rejecting ambiguous plans.
	pub const fn strict() -> Self {
		Self {
			mode: MockMode::Strict,
			ambiguity: AmbiguityPolicy::Reject,
		}
	}

	/// Replaces the mode.
	#[must_use]
	pub const fn with_mode(mut self, mode: MockMode) -> Self {
		self.mode = mode;
		self
	}

	/// Replaces the ambiguity policy.
	#[must_use]
	pub const fn with_ambiguity(mut self, ambiguity: AmbiguityPolicy) -> Self {
		self.ambiguity = ambiguity;
		self
	}

	/// Parses a TOML document.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::Toml`] on malformed input, unknown keys or
	/// unknown enum values.
	pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}
}

impl From<MockMode> for MockConfig {
	fn from(mode: MockMode) -> Self {
		Self::default().with_mode(mode)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_uses_defaults() {
		let config = MockConfig::from_toml("").expect("empty config should parse");
		assert_eq!(config, MockConfig::loose());
	}

	#[test]
	fn parses_all_keys() {
		let config = MockConfig::from_toml("mode = \"strict\"\nambiguity = \"first_registered\"\n").expect("config should parse");
		assert_eq!(config.mode, MockMode::Strict);
		assert_eq!(config.ambiguity, AmbiguityPolicy::FirstRegistered);
	}

	#[test]
	fn rejects_unknown_mode() {
		let err = MockConfig::from_toml("mode = \"lenient\"").expect_err("unknown mode must fail");
		assert!(matches!(err, ConfigError::Toml(_)));
	}

	#[test]
	fn rejects_unknown_key() {
		assert!(MockConfig::from_toml("timeout = 3").is_err());
	}

	#[test]
	fn builders_override_fields() {
		let config = MockConfig::strict().with_ambiguity(AmbiguityPolicy::FirstRegistered);
		assert_eq!(config.mode, MockMode::Strict);
		assert_eq!(MockConfig::from(MockMode::Strict), MockConfig::strict());
	}
}
