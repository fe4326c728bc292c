use std::any::TypeId;

/// Declared result type of a call or plan.
///
/// Void calls and typed calls never share a key, so a typed catch-all never
/// answers a void call and the other way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKey {
	/// The call expects no result.
	Void,
	/// The call expects a value of the given type.
	Typed(TypeId),
}

impl ResultKey {
	/// Key for calls declaring `T` as their result type.
	pub fn of<T: 'static>() -> Self {
		Self::Typed(TypeId::of::<T>())
	}
}

/// Bounds a value type must satisfy to be returned from a mocked call.
///
/// `Default` supplies the loose-mode fallback; `Clone` lets one planned
/// result reach every matching call.
pub trait InvokeResult: Clone + Default + Send + Sync + 'static {}

impl<T> InvokeResult for T where T: Clone + Default + Send + Sync + 'static {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn void_key_differs_from_unit_type() {
		assert_ne!(ResultKey::Void, ResultKey::of::<()>());
		assert_eq!(ResultKey::of::<String>(), ResultKey::of::<String>());
		assert_ne!(ResultKey::of::<String>(), ResultKey::of::<&'static str>());
	}
}
