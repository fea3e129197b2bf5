//! Prelude module for convenient imports

pub use crate::{
  backpressure::{self, BackpressureStrategy, Drain, Publisher},
  completion::{Completion, Settled, Settlement},
  error::{BackpressureError, EmptyOptionalError},
  observable::{
    create, empty, from_iter, of, throw_err, Create, Empty, FromIter, Observable, ObservableExt,
    Of, ThrowErr,
  },
  observer::{Emitter, Item, Observer, ObserverBuilder},
  optional::Optional,
  single::Single,
};
