//! # rxsingle: a single-consumer observer with Single/Optional stages
//!
//! The crate centres on [`Observer`], the terminal end of a stream. It runs
//! user handlers for values, the terminal error and completion, accepts
//! exactly one terminal event, and lets a caller [`block`] until the stream
//! settles. A small operator set (`map`, `filter`, `element_at`) turns
//! arbitrary sequences into [`Single`] stages that deliver at most one value.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxsingle::prelude::*;
//!
//! let mut got = 0;
//! let settlement = from_iter(vec![1, 2, 3])
//!   .element_at(1)
//!   .present()
//!   .map(|v| v + 10)
//!   .subscribe(Observer::with_next(|v| got = v))
//!   .block();
//!
//! assert_eq!(settlement, Settlement::Done);
//! assert_eq!(got, 12);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observer`] | Terminal consumer; handlers plus a one-shot completion |
//! | [`Completion`] | Handle to wait, blocking or async, for the terminal event |
//! | [`Optional`] | Present/absent result of a selection |
//! | [`Single`] | Stage that delivers at most one value |
//! | [`BackpressureStrategy`] | Policy stored on the observer, enforced by producers |
//!
//! Handlers run synchronously on the producing thread. An observer expects a
//! single producer; to produce from another thread, keep its [`Completion`]
//! and move the observer, or feed it through a [`backpressure::channel`].
//!
//! [`Observer`]: observer::Observer
//! [`block`]: observer::Observer::block
//! [`Single`]: single::Single
//! [`Completion`]: completion::Completion
//! [`Optional`]: optional::Optional
//! [`BackpressureStrategy`]: backpressure::BackpressureStrategy

pub mod backpressure;
pub mod completion;
pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod optional;
pub mod prelude;
pub mod single;

pub use prelude::*;
