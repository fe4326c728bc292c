use std::collections::HashMap;

use interplay_invocation::{InvocationKind, InvocationRecord};

/// Every call observed by one handler, per discipline and identifier, in call
/// order. Matched and unmatched calls alike.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
	deferred: HashMap<String, Vec<InvocationRecord>>,
	immediate: HashMap<String, Vec<InvocationRecord>>,
}

impl Ledger {
	/// Creates an empty ledger.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends one record to the bucket of its discipline.
	pub fn record(&mut self, record: InvocationRecord) {
		self.bucket_mut(record.kind()).entry(record.identifier().to_owned()).or_default().push(record);
	}

	/// Records for `identifier`, empty when it was never called.
	pub fn invocations(&self, kind: InvocationKind, identifier: &str) -> &[InvocationRecord] {
		self.bucket(kind).get(identifier).map(Vec::as_slice).unwrap_or_default()
	}

	/// Identifiers seen for one discipline, sorted.
	pub fn identifiers(&self, kind: InvocationKind) -> Vec<&str> {
		let mut names: Vec<&str> = self.bucket(kind).keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	/// Total number of records for one discipline.
	pub fn len(&self, kind: InvocationKind) -> usize {
		self.bucket(kind).values().map(Vec::len).sum()
	}

	/// Returns true if no call of either discipline was recorded.
	pub fn is_empty(&self) -> bool {
		self.deferred.is_empty() && self.immediate.is_empty()
	}

	fn bucket(&self, kind: InvocationKind) -> &HashMap<String, Vec<InvocationRecord>> {
		match kind {
			InvocationKind::Deferred => &self.deferred,
			InvocationKind::Immediate => &self.immediate,
		}
	}

	fn bucket_mut(&mut self, kind: InvocationKind) -> &mut HashMap<String, Vec<InvocationRecord>> {
		match kind {
			InvocationKind::Deferred => &mut self.deferred,
			InvocationKind::Immediate => &mut self.immediate,
		}
	}
}
