use tokio_util::sync::CancellationToken;

use super::*;

#[test]
fn args_compare_by_type_and_value() {
	let lhs = args!["bar", 42];
	assert!(lhs.sequence_eq(&args!["bar", 42]));
	assert!(!lhs.sequence_eq(&args!["bar", 41]));
	assert!(!lhs.sequence_eq(&args!["bar"]));
	// 42i32 vs 42i64
	assert!(!lhs.sequence_eq(&args!["bar", 42i64]));
}

#[test]
fn str_and_string_are_distinct_values() {
	let arg = Arg::new("bar");
	assert!(arg.is(&"bar"));
	assert!(!arg.is(&String::from("bar")));
	assert_ne!(arg, Arg::new(String::from("bar")));
}

#[test]
fn downcast_exposes_inner_value() {
	let args = args![String::from("first"), 7u8];
	assert_eq!(args[0].downcast_ref::<String>().map(String::as_str), Some("first"));
	assert_eq!(args[1].downcast_ref::<u8>(), Some(&7));
	assert!(args[1].downcast_ref::<u16>().is_none());
}

#[test]
fn builder_and_macro_agree() {
	let built = Args::new().with("bar").with(42);
	assert_eq!(built, args!["bar", 42]);
	assert!(args![].is_empty());
}

#[test]
fn deferred_record_keeps_cancellation_token() {
	let token = CancellationToken::new();
	let record = InvocationRecord::deferred("fooFunc", args!["bar", "baz"], Some(token.clone()));

	assert_eq!(record.kind(), InvocationKind::Deferred);
	assert_eq!(record.identifier(), "fooFunc");
	assert!(record.arguments().sequence_eq(&args!["bar", "baz"]));

	let stored = record.cancellation().expect("token should be stored");
	assert!(!stored.is_cancelled());
	token.cancel();
	assert!(stored.is_cancelled(), "stored token must be the caller's token");
}

#[test]
fn immediate_record_has_no_token() {
	let record = InvocationRecord::immediate("func", args![1]);
	assert_eq!(record.kind(), InvocationKind::Immediate);
	assert!(record.cancellation().is_none());
}

#[test]
fn describe_lists_arguments() {
	let record = InvocationRecord::deferred("foo", args!["bar", 42], None);
	assert_eq!(record.describe(), "deferred:foo(\"bar\", 42)");
	assert_eq!(InvocationRecord::immediate("noop", Args::new()).describe(), "immediate:noop()");
}

#[test]
fn rewrapping_an_arg_does_not_nest_it() {
	let recorded = InvocationRecord::deferred("foo", args!["bar", 42], None);
	let args = recorded.arguments();

	let rebuilt = args![args[0].clone(), args[1].clone()];
	assert!(rebuilt.sequence_eq(args));
	assert!(rebuilt[0].is(&"bar"));
	assert_eq!(Args::new().with(args[1].clone()), args![42]);
	assert_eq!(Arg::new(Arg::new(7u8)), Arg::new(7u8));
}

#[test]
fn typed_tuples_convert_in_order() {
	assert!(().into_args().is_empty());
	assert_eq!(("bar",).into_args(), args!["bar"]);
	assert_eq!(("bar", 42, 'x').into_args(), args!["bar", 42, 'x']);
	assert_eq!(args![1].into_args(), args![1]);
}
