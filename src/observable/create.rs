use std::marker::PhantomData;

use crate::{observable::Observable, observer::Emitter};

/// Creates an observable from a function that drives an [`Emitter`].
///
/// The function runs again on every subscription. It should check
/// [`Emitter::is_closed`] if it produces many values, and should finish with
/// exactly one `error` or `complete` call.
///
/// ```
/// use rxsingle::prelude::*;
///
/// let source = create(|emitter: &mut dyn Emitter<i32, String>| {
///   emitter.next(1);
///   emitter.error("lost connection".to_string());
/// });
/// let settlement = source.subscribe(Observer::new()).block();
/// assert_eq!(settlement, Settlement::Failed("lost connection".to_string()));
/// ```
pub fn create<T, E, F>(f: F) -> Create<F, T, E>
where
  F: Fn(&mut dyn Emitter<T, E>),
{
  Create { f, _marker: PhantomData }
}

#[derive(Clone)]
pub struct Create<F, T, E> {
  f: F,
  _marker: PhantomData<fn() -> (T, E)>,
}

impl<F, T, E> Observable for Create<F, T, E>
where
  F: Fn(&mut dyn Emitter<T, E>),
{
  type Item = T;
  type Err = E;

  fn actual_subscribe(&self, emitter: &mut dyn Emitter<T, E>) { (self.f)(emitter) }
}
