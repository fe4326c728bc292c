//! Dispatch engine and setup surface of the mock runtime.
//!
//! Every call is appended to the [`Ledger`] and matched against the plan
//! tables under one lock. Precedence per call:
//!
//! 1. identifier-scoped plans of the same discipline and result key, in
//!    declaration order, subject to [`AmbiguityPolicy`];
//! 2. the catch-all plan for that discipline and result key;
//! 3. the [`MockMode`] fallback.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use interplay_invocation::{Args, InvocationKind, InvocationRecord};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::{AmbiguityPolicy, MockConfig};
use crate::immediate::ImmediatePlannedInvocation;
use crate::key::{InvokeResult, ResultKey};
use crate::ledger::Ledger;
use crate::matcher::ArgumentMatcher;
use crate::plan::PlannedInvocation;
use crate::runtime::MockRuntime;
use crate::{Error, InvokeHandle, MockMode, Result};

/// Type-erased view of a plan stored in the handler tables.
///
/// The concrete plan type is recovered by downcasting with the type implied
/// by the entry's [`ResultKey`], which was fixed at setup.
trait ErasedPlan: Send + Sync {
	fn matches(&self, args: &Args) -> bool;
	fn as_any(&self) -> &dyn Any;
}

impl<T: Send + Sync + 'static> ErasedPlan for PlannedInvocation<T> {
	fn matches(&self, args: &Args) -> bool {
		PlannedInvocation::matches(self, args)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

impl<T: Send + Sync + 'static> ErasedPlan for ImmediatePlannedInvocation<T> {
	fn matches(&self, args: &Args) -> bool {
		ImmediatePlannedInvocation::matches(self, args)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

struct PlanEntry {
	kind: InvocationKind,
	key: ResultKey,
	plan: Arc<dyn ErasedPlan>,
}

#[derive(Default)]
struct HandlerState {
	ledger: Ledger,
	/// Identifier-scoped plans in declaration order.
	planned: HashMap<String, Vec<PlanEntry>>,
	/// One slot per discipline and result key; last registration wins.
	catch_all: HashMap<(InvocationKind, ResultKey), Arc<dyn ErasedPlan>>,
}

impl HandlerState {
	fn find<P>(&self, kind: InvocationKind, key: ResultKey, record: &InvocationRecord, ambiguity: AmbiguityPolicy) -> Result<Option<P>>
	where
		P: Clone + 'static,
	{
		let matching: Vec<&PlanEntry> = self
			.planned
			.get(record.identifier())
			.into_iter()
			.flatten()
			.filter(|entry| entry.kind == kind && entry.key == key && entry.plan.matches(record.arguments()))
			.collect();

		let chosen = match matching.as_slice() {
			[] => None,
			[only] => Some(*only),
			[first, ..] => match ambiguity {
				AmbiguityPolicy::Reject => {
					return Err(Error::AmbiguousInvocation {
						invocation: Box::new(record.clone()),
						matches: matching.len(),
					});
				}
				AmbiguityPolicy::FirstRegistered => {
					warn!(invocation = %record.describe(), matches = matching.len(), "mock.dispatch.ambiguous");
					Some(*first)
				}
			},
		};

		let plan = match chosen {
			Some(entry) => Some(&entry.plan),
			None => self.catch_all.get(&(kind, key)),
		};
		Ok(plan.and_then(|plan| plan.as_any().downcast_ref::<P>()).cloned())
	}
}

/// The test double behind a mocked interop runtime.
///
/// Owns the ledger, the plan tables and the mode. Production code talks to it
/// through [`MockRuntime`], obtained from [`Self::to_runtime`]; tests declare
/// plans with the `setup*` methods and inspect calls afterwards.
pub struct MockInvokeHandler {
	config: MockConfig,
	state: Mutex<HandlerState>,
}

impl Default for MockInvokeHandler {
	fn default() -> Self {
		Self::with_config(MockConfig::default())
	}
}

impl MockInvokeHandler {
	/// Creates a handler in the given mode with default configuration.
	pub fn new(mode: MockMode) -> Self {
		Self::with_config(MockConfig::from(mode))
	}

	/// Creates a handler from a full configuration.
	pub fn with_config(config: MockConfig) -> Self {
		debug!(mode = config.mode.as_str(), ambiguity = ?config.ambiguity, "mock.handler.new");
		Self {
			config,
			state: Mutex::new(HandlerState::default()),
		}
	}

	/// Unmatched-call behavior.
	pub fn mode(&self) -> MockMode {
		self.config.mode
	}

	/// Active configuration.
	pub fn config(&self) -> MockConfig {
		self.config
	}

	/// Runtime adapter handed to production code.
	pub fn to_runtime(&self) -> MockRuntime<'_> {
		MockRuntime::new(self)
	}

	/// Plans deferred calls to `identifier` whose arguments equal `arguments`.
	pub fn setup<T>(&self, identifier: impl Into<String>, arguments: Args) -> PlannedInvocation<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.add_deferred(Some(identifier.into()), ResultKey::of::<T>(), ArgumentMatcher::sequence(arguments))
	}

	/// Plans deferred calls to `identifier` whose arguments pass `predicate`.
	pub fn setup_with<T>(&self, identifier: impl Into<String>, predicate: impl Fn(&Args) -> bool + Send + Sync + 'static) -> PlannedInvocation<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.add_deferred(Some(identifier.into()), ResultKey::of::<T>(), ArgumentMatcher::new(predicate))
	}

	/// Plans every deferred call expecting a `T` that no identifier-scoped plan
	/// answers. Replaces an earlier catch-all for `T`.
	pub fn setup_catch_all<T>(&self) -> PlannedInvocation<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.add_deferred(None, ResultKey::of::<T>(), ArgumentMatcher::any())
	}

	/// Plans void deferred calls to `identifier` whose arguments equal
	/// `arguments`.
	pub fn setup_void(&self, identifier: impl Into<String>, arguments: Args) -> PlannedInvocation<()> {
		self.add_deferred(Some(identifier.into()), ResultKey::Void, ArgumentMatcher::sequence(arguments))
	}

	/// Plans void deferred calls to `identifier` whose arguments pass
	/// `predicate`.
	pub fn setup_void_with(&self, identifier: impl Into<String>, predicate: impl Fn(&Args) -> bool + Send + Sync + 'static) -> PlannedInvocation<()> {
		self.add_deferred(Some(identifier.into()), ResultKey::Void, ArgumentMatcher::new(predicate))
	}

	/// Plans every void deferred call no identifier-scoped void plan answers.
	pub fn setup_void_catch_all(&self) -> PlannedInvocation<()> {
		self.add_deferred(None, ResultKey::Void, ArgumentMatcher::any())
	}

	/// Plans immediate calls to `identifier` whose arguments equal
	/// `arguments`, returning `result`.
	pub fn setup_immediate<T>(&self, identifier: impl Into<String>, result: T, arguments: Args) -> ImmediatePlannedInvocation<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.add_immediate(Some(identifier.into()), result, ArgumentMatcher::sequence(arguments))
	}

	/// Plans immediate calls to `identifier` whose arguments pass `predicate`,
	/// returning `result`.
	pub fn setup_immediate_with<T>(
		&self,
		identifier: impl Into<String>,
		result: T,
		predicate: impl Fn(&Args) -> bool + Send + Sync + 'static,
	) -> ImmediatePlannedInvocation<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.add_immediate(Some(identifier.into()), result, ArgumentMatcher::new(predicate))
	}

	/// Plans every immediate call expecting a `T` that no identifier-scoped
	/// plan answers.
	pub fn setup_immediate_catch_all<T>(&self, result: T) -> ImmediatePlannedInvocation<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.add_immediate(None, result, ArgumentMatcher::any())
	}

	/// Dispatches a deferred call expecting a `T`.
	///
	/// # Errors
	///
	/// - [`Error::UnplannedInvocation`] in strict mode when nothing matches.
	/// - [`Error::AmbiguousInvocation`] when several plans match under
	///   [`AmbiguityPolicy::Reject`].
	pub fn dispatch_async<T>(&self, identifier: &str, arguments: Args, cancellation: Option<CancellationToken>) -> Result<InvokeHandle<T>>
	where
		T: InvokeResult,
	{
		self.dispatch_deferred(ResultKey::of::<T>(), InvocationRecord::deferred(identifier, arguments, cancellation))
	}

	/// Dispatches a deferred call expecting no result.
	///
	/// # Errors
	///
	/// Same as [`Self::dispatch_async`].
	pub fn dispatch_void_async(&self, identifier: &str, arguments: Args, cancellation: Option<CancellationToken>) -> Result<InvokeHandle<()>> {
		self.dispatch_deferred(ResultKey::Void, InvocationRecord::deferred(identifier, arguments, cancellation))
	}

	/// Dispatches an immediate call expecting a `T`.
	///
	/// # Errors
	///
	/// - [`Error::UnplannedImmediateInvocation`] in strict mode when nothing
	///   matches.
	/// - [`Error::AmbiguousInvocation`] when several plans match under
	///   [`AmbiguityPolicy::Reject`].
	pub fn dispatch_sync<T>(&self, identifier: &str, arguments: Args) -> Result<T>
	where
		T: InvokeResult,
	{
		let record = InvocationRecord::immediate(identifier, arguments);
		trace!(identifier, args = record.arguments().len(), "mock.dispatch_sync");

		let mut state = self.state.lock();
		state.ledger.record(record.clone());
		let plan = state.find::<ImmediatePlannedInvocation<T>>(InvocationKind::Immediate, ResultKey::of::<T>(), &record, self.config.ambiguity)?;
		match plan {
			Some(plan) => Ok(plan.register(record)),
			None => {
				drop(state);
				self.fallback(record, Error::UnplannedImmediateInvocation)
			}
		}
	}

	/// Deferred calls observed for `identifier`, in call order.
	pub fn invocations(&self, identifier: &str) -> Vec<InvocationRecord> {
		self.state.lock().ledger.invocations(InvocationKind::Deferred, identifier).to_vec()
	}

	/// Immediate calls observed for `identifier`, in call order.
	pub fn immediate_invocations(&self, identifier: &str) -> Vec<InvocationRecord> {
		self.state.lock().ledger.invocations(InvocationKind::Immediate, identifier).to_vec()
	}

	/// Total number of deferred calls observed.
	pub fn invocation_count(&self) -> usize {
		self.state.lock().ledger.len(InvocationKind::Deferred)
	}

	/// Total number of immediate calls observed.
	pub fn immediate_invocation_count(&self) -> usize {
		self.state.lock().ledger.len(InvocationKind::Immediate)
	}

	/// Snapshot of the whole ledger.
	pub fn ledger(&self) -> Ledger {
		self.state.lock().ledger.clone()
	}

	fn dispatch_deferred<T>(&self, key: ResultKey, record: InvocationRecord) -> Result<InvokeHandle<T>>
	where
		T: InvokeResult,
	{
		trace!(identifier = record.identifier(), args = record.arguments().len(), void = key == ResultKey::Void, "mock.dispatch_async");

		let mut state = self.state.lock();
		state.ledger.record(record.clone());
		let plan = state.find::<PlannedInvocation<T>>(InvocationKind::Deferred, key, &record, self.config.ambiguity)?;
		match plan {
			Some(plan) => Ok(plan.register(record)),
			None => {
				drop(state);
				self.fallback(record, Error::UnplannedInvocation).map(|value| InvokeHandle::settled(Ok(value)))
			}
		}
	}

	fn fallback<T: Default>(&self, record: InvocationRecord, unplanned: fn(Box<InvocationRecord>) -> Error) -> Result<T> {
		match self.config.mode {
			MockMode::Loose => {
				trace!(identifier = record.identifier(), "mock.dispatch.default");
				Ok(T::default())
			}
			MockMode::Strict => {
				warn!(invocation = %record.describe(), "mock.dispatch.unplanned");
				Err(unplanned(Box::new(record)))
			}
		}
	}

	fn add_deferred<T>(&self, identifier: Option<String>, key: ResultKey, matcher: ArgumentMatcher) -> PlannedInvocation<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		let plan = PlannedInvocation::new(identifier.clone(), matcher);
		self.add_plan(InvocationKind::Deferred, key, identifier, Arc::new(plan.clone()));
		plan
	}

	fn add_immediate<T>(&self, identifier: Option<String>, result: T, matcher: ArgumentMatcher) -> ImmediatePlannedInvocation<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		let plan = ImmediatePlannedInvocation::new(identifier.clone(), result, matcher);
		self.add_plan(InvocationKind::Immediate, ResultKey::of::<T>(), identifier, Arc::new(plan.clone()));
		plan
	}

	fn add_plan(&self, kind: InvocationKind, key: ResultKey, identifier: Option<String>, plan: Arc<dyn ErasedPlan>) {
		let mut state = self.state.lock();
		match identifier {
			Some(identifier) => {
				debug!(identifier = identifier.as_str(), kind = kind.as_str(), ?key, "mock.setup");
				state.planned.entry(identifier).or_default().push(PlanEntry { kind, key, plan });
			}
			None => {
				let replaced = state.catch_all.insert((kind, key), plan).is_some();
				debug!(kind = kind.as_str(), ?key, replaced, "mock.setup.catch_all");
			}
		}
	}
}

impl fmt::Debug for MockInvokeHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.lock();
		f.debug_struct("MockInvokeHandler")
			.field("config", &self.config)
			.field("planned", &state.planned.values().map(Vec::len).sum::<usize>())
			.field("catch_all", &state.catch_all.len())
			.field("invocations", &state.ledger.len(InvocationKind::Deferred))
			.field("immediate_invocations", &state.ledger.len(InvocationKind::Immediate))
			.finish()
	}
}
