//! Error types raised by the crate itself.
//!
//! Stream errors travel through the observer's error channel with whatever
//! type the producer chose; the types here only cover conditions the crate
//! detects on its own.

/// Returned by [`Optional::get`](crate::optional::Optional::get) when no value
/// is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no value present in optional")]
pub struct EmptyOptionalError;

/// Failures reported to a producer that publishes through a backpressure
/// channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackpressureError {
  /// The queue was full under [`BackpressureStrategy::Error`].
  ///
  /// [`BackpressureStrategy::Error`]: crate::backpressure::BackpressureStrategy::Error
  #[error("backpressure queue overflowed its capacity of {capacity}")]
  Overflow { capacity: usize },

  /// The consuming side is gone or the stream already terminated.
  #[error("backpressure channel is closed")]
  Closed,
}
