//! Opaque argument values carried by invocations.
//!
//! Arguments are never parsed or marshalled. They support equality against
//! another argument of the same concrete type, typed downcasts for
//! inspection, and `Debug` output for diagnostics.

use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Object-safe view over any comparable argument value.
///
/// Blanket-implemented for every `PartialEq + Debug + Send + Sync + 'static`
/// type; there is no reason to implement it by hand.
pub trait ArgValue: Any + fmt::Debug + Send + Sync {
	/// Compares against another erased value. Values of different concrete
	/// types are never equal.
	fn eq_value(&self, other: &dyn ArgValue) -> bool;

	/// Upcast used for downcasting.
	fn as_any(&self) -> &dyn Any;
}

impl<T> ArgValue for T
where
	T: PartialEq + fmt::Debug + Send + Sync + 'static,
{
	fn eq_value(&self, other: &dyn ArgValue) -> bool {
		other.as_any().downcast_ref::<T>().is_some_and(|other| self == other)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// One opaque argument value.
#[derive(Clone)]
pub struct Arg(Arc<dyn ArgValue>);

impl Arg {
	/// Wraps a value. An `Arg` passed in is returned as is, never nested.
	pub fn new<T>(value: T) -> Self
	where
		T: PartialEq + fmt::Debug + Send + Sync + 'static,
	{
		if let Some(arg) = (&value as &dyn Any).downcast_ref::<Arg>() {
			return arg.clone();
		}
		Self(Arc::new(value))
	}

	/// Returns the inner value if it is a `T`.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.as_any().downcast_ref::<T>()
	}

	/// Returns true if the inner value is a `T` equal to `value`.
	///
	/// `&'static str` and `String` are different types here: an argument
	/// built from `"bar"` is not equal to `String::from("bar")`.
	pub fn is<T>(&self, value: &T) -> bool
	where
		T: PartialEq + Any,
	{
		self.downcast_ref::<T>().is_some_and(|inner| inner == value)
	}
}

impl PartialEq for Arg {
	fn eq(&self, other: &Self) -> bool {
		self.0.eq_value(other.0.as_ref())
	}
}

impl fmt::Debug for Arg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&*self.0, f)
	}
}

/// Ordered argument list of one invocation.
#[derive(Clone, Default, PartialEq)]
pub struct Args(Vec<Arg>);

impl Args {
	/// Creates an empty argument list.
	pub const fn new() -> Self {
		Self(Vec::new())
	}

	/// Appends one value, builder-style.
	#[must_use]
	pub fn with<T>(mut self, value: T) -> Self
	where
		T: PartialEq + fmt::Debug + Send + Sync + 'static,
	{
		self.0.push(Arg::new(value));
		self
	}

	/// Appends one already-wrapped argument.
	pub fn push(&mut self, arg: Arg) {
		self.0.push(arg);
	}

	/// Structural sequence equality: same length, pairwise equal.
	pub fn sequence_eq(&self, other: &Args) -> bool {
		self.0.len() == other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a == b)
	}
}

impl Deref for Args {
	type Target = [Arg];

	fn deref(&self) -> &[Arg] {
		&self.0
	}
}

impl fmt::Debug for Args {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

impl From<Vec<Arg>> for Args {
	fn from(args: Vec<Arg>) -> Self {
		Self(args)
	}
}

impl FromIterator<Arg> for Args {
	fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a Args {
	type Item = &'a Arg;
	type IntoIter = std::slice::Iter<'a, Arg>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

/// Conversion of a typed argument tuple into an [`Args`] list.
pub trait IntoArgs {
	/// Erases every element, keeping order.
	fn into_args(self) -> Args;
}

impl IntoArgs for Args {
	fn into_args(self) -> Args {
		self
	}
}

impl IntoArgs for () {
	fn into_args(self) -> Args {
		Args::new()
	}
}

macro_rules! impl_into_args {
	($($name:ident),+) => {
		impl<$($name),+> IntoArgs for ($($name,)+)
		where
			$($name: PartialEq + fmt::Debug + Send + Sync + 'static),+
		{
			#[allow(non_snake_case, reason = "tuple fields bound by type name")]
			fn into_args(self) -> Args {
				let ($($name,)+) = self;
				Args::new()$(.with($name))+
			}
		}
	};
}

impl_into_args!(A0);
impl_into_args!(A0, A1);
impl_into_args!(A0, A1, A2);

/// Builds an [`Args`] list from literal values.
///
/// ```
/// use interplay_invocation::args;
///
/// let args = args!["bar", 42];
/// assert_eq!(args.len(), 2);
/// assert!(args[1].is(&42));
/// ```
#[macro_export]
macro_rules! args {
	() => {
		$crate::Args::new()
	};
	($($value:expr),+ $(,)?) => {
		$crate::Args::from(vec![$($crate::Arg::new($value)),+])
	};
}
