use futures::FutureExt;
use interplay_invocation::args;

use super::*;

fn plan() -> PlannedInvocation<u32> {
	PlannedInvocation::new(Some("func".into()), ArgumentMatcher::any())
}

fn call(plan: &PlannedInvocation<u32>) -> InvokeHandle<u32> {
	plan.register(InvocationRecord::deferred("func", args![], None))
}

#[test]
fn unset_plan_leaves_handles_pending() {
	let plan = plan();
	let handle = call(&plan);

	assert!(handle.is_pending());
	assert!(handle.clone().now_or_never().is_none());
	assert_eq!(plan.pending_count(), 1);
}

#[test]
fn set_result_settles_pending_and_later_calls() {
	let plan = plan();
	let early = call(&plan);
	plan.set_result(5);
	let late = call(&plan);

	assert_eq!(early.try_outcome().and_then(std::result::Result::ok), Some(5));
	assert_eq!(late.try_outcome().and_then(std::result::Result::ok), Some(5));
	assert_eq!(plan.pending_count(), 0);
}

#[test]
fn overwrite_is_not_retroactive() {
	let plan = plan();
	plan.set_result(1);
	let first = call(&plan);
	plan.set_result(2);
	let second = call(&plan);
	plan.set_canceled();
	let third = call(&plan);

	assert_eq!(first.try_outcome().and_then(std::result::Result::ok), Some(1));
	assert_eq!(second.try_outcome().and_then(std::result::Result::ok), Some(2));
	assert!(third.is_canceled());
}

#[test]
fn exception_reaches_every_handle_as_one_instance() {
	let plan = plan();
	let a = call(&plan);
	let fault = plan.set_exception(std::io::Error::other("TADA"));
	let b = call(&plan);

	for handle in [a, b] {
		assert!(handle.is_faulted());
		let err = handle.try_outcome().and_then(std::result::Result::err).expect("handle should fault");
		let got = err.fault().expect("fault payload");
		assert!(got.ptr_eq(&fault));
		assert_eq!(got.downcast_ref::<std::io::Error>().map(ToString::to_string).as_deref(), Some("TADA"));
	}
}

#[test]
fn invocations_are_recorded_in_order() {
	let plan = plan();
	plan.register(InvocationRecord::deferred("func", args!["first"], None));
	plan.register(InvocationRecord::deferred("func", args!["second"], None));

	let invocations = plan.invocations();
	assert_eq!(invocations.len(), 2);
	assert!(invocations[0].arguments()[0].is(&"first"));
	assert!(invocations[1].arguments()[0].is(&"second"));
}

#[test]
fn void_plan_completes_successfully() {
	let plan = PlannedInvocation::<()>::new(None, ArgumentMatcher::any());
	let handle = plan.register(InvocationRecord::deferred("f", args![], None));
	plan.set_void_result();

	assert!(plan.is_catch_all());
	assert!(handle.is_completed_successfully());
}
