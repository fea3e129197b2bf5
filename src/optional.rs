//! Present/absent wrapper used by selection operators.
//!
//! Operators such as [`element_at`](crate::observable::ObservableExt::element_at)
//! report "not found" with an absent [`Optional`] instead of an error, so the
//! error channel stays reserved for real failures.

use crate::error::EmptyOptionalError;

/// The outcome of a positional or filtered selection.
///
/// Immutable once built: the only ways to look inside are [`is_empty`],
/// [`get`] and the consuming conversions.
///
/// [`is_empty`]: Optional::is_empty
/// [`get`]: Optional::get
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Optional<T>(Option<T>);

impl<T> Optional<T> {
  /// A present optional wrapping `value`.
  pub fn of(value: T) -> Self { Optional(Some(value)) }

  /// An absent optional.
  pub fn empty() -> Self { Optional(None) }

  pub fn is_empty(&self) -> bool { self.0.is_none() }

  /// Borrow the wrapped value.
  ///
  /// # Errors
  /// [`EmptyOptionalError`] when the optional is absent.
  pub fn get(&self) -> Result<&T, EmptyOptionalError> { self.0.as_ref().ok_or(EmptyOptionalError) }

  /// Take the wrapped value out.
  ///
  /// # Errors
  /// [`EmptyOptionalError`] when the optional is absent.
  pub fn into_value(self) -> Result<T, EmptyOptionalError> { self.0.ok_or(EmptyOptionalError) }

  /// Keep the value only if `predicate` accepts it.
  ///
  /// The predicate is not called on an absent optional.
  pub fn filter<P>(self, predicate: P) -> Self
  where
    P: FnOnce(&T) -> bool,
  {
    Optional(self.0.filter(predicate))
  }

  /// Transform the value if present.
  pub fn map<U, F>(self, f: F) -> Optional<U>
  where
    F: FnOnce(T) -> U,
  {
    Optional(self.0.map(f))
  }

  pub fn into_option(self) -> Option<T> { self.0 }
}

impl<T> Default for Optional<T> {
  fn default() -> Self { Optional::empty() }
}

impl<T> From<Option<T>> for Optional<T> {
  fn from(value: Option<T>) -> Self { Optional(value) }
}

impl<T> From<Optional<T>> for Option<T> {
  fn from(value: Optional<T>) -> Self { value.0 }
}
